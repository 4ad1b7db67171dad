//! Extract a template-1 sheet and score it with the default suite

use bidlevel_eval::{evaluate, ExampleResult, RequestInputs, SuiteRegistry, SuiteReport, Verdict};
use bidlevel_extract::{extract, ExtractedRecord};
use bidlevel_grid::{CellValue, Grid};

const SUPPLIERS: [&str; 3] = ["Acme", "BidCo", "Cable Co"];

fn col_name(col: usize) -> char {
    (b'A' + col as u8) as char
}

/// A clean sheet: three suppliers, four items, every formula in place
fn sheet(items: usize) -> (Grid, Grid) {
    let mut values = vec![vec![CellValue::Empty; 21]; 34];
    let mut formulas = vec![vec![CellValue::Empty; 21]; 34];

    values[0][1] = "BID COMPARISON TEMPLATE".into();
    for (i, name) in SUPPLIERS.iter().enumerate() {
        values[1][3 + i * 3] = (*name).into();
    }

    for row in 3..3 + items {
        values[row][1] = format!("Part {}", row + 1).into();
        for i in 0..SUPPLIERS.len() {
            let start = 3 + i * 3;
            values[row][start] = format!("${}.00", 10 + i).into();
            values[row][start + 1] = "2".into();
            values[row][start + 2] = CellValue::Number(2.0 * (10 + i) as f64);
        }
    }

    for slot in 0..5 {
        let col = 5 + slot * 3;
        let total = col_name(col);
        for row in 3..26 {
            let (price, qty) = (col_name(col - 2), col_name(col - 1));
            formulas[row][col] = format!("={price}{0}*{qty}{0}", row + 1).into();
        }
        formulas[26][col] = format!("=SUM({total}4:{total}26)").into();
        formulas[28][col] = format!("={total}27*{total}28").into();
        formulas[30][col] = format!("={total}27+{total}29+{total}30").into();
    }

    for i in 0..SUPPLIERS.len() {
        let col = 5 + i * 3;
        values[26][col] = "$100.00".into();
        values[27][col] = "8%".into();
        values[28][col] = "$8.00".into();
        values[29][col] = "$0.00".into();
        values[30][col] = "$108.00".into();
    }

    (Grid::new(values), Grid::new(formulas))
}

fn three_documents() -> RequestInputs {
    RequestInputs::new()
        .with_message("Compare the attached bids")
        .with_documents(["acme.pdf", "bidco.pdf", "cableco.pdf"])
}

fn score(record: &ExtractedRecord, inputs: &RequestInputs) -> Vec<Verdict> {
    evaluate(&SuiteRegistry::with_defaults(), "template-1", inputs, record).unwrap()
}

fn verdict<'a>(verdicts: &'a [Verdict], name: &str) -> &'a Verdict {
    verdicts.iter().find(|v| v.evaluator == name).unwrap()
}

#[test]
fn test_clean_sheet_passes_everything() {
    let (values, formulas) = sheet(4);
    let record = extract(&values, &formulas);
    let verdicts = score(&record, &three_documents());

    assert_eq!(verdicts.len(), 6);
    for v in &verdicts {
        assert!(v.passed(), "{} failed: {:?}", v.evaluator, v.details);
        assert!(v.details.is_empty());
    }
}

#[test]
fn test_overwritten_formulas_are_named() {
    let (values, formulas) = sheet(4);
    let mut rows = formulas.into_rows();
    rows[26][5] = CellValue::Number(100.0);
    rows[30][8] = CellValue::Empty;
    let record = extract(&values, &Grid::new(rows));

    let verdicts = score(&record, &three_documents());
    let formulas = verdict(&verdicts, "formula_compliance");
    assert_eq!(formulas.score, 0);
    assert_eq!(
        formulas.details,
        vec![
            "Missing or invalid formula in cell F27",
            "Missing or invalid formula in cell I31",
        ]
    );
}

#[test]
fn test_supplier_count_mismatch() {
    let (values, formulas) = sheet(4);
    let record = extract(&values, &formulas);
    let inputs = RequestInputs::new().with_documents(["a.pdf", "b.pdf"]);

    let verdicts = score(&record, &inputs);
    let count = verdict(&verdicts, "supplier_count");
    assert_eq!(count.score, 0);
    let detail = count.details[0].to_lowercase();
    assert!(detail.contains("expected 2"));
    assert!(detail.contains("found 3"));
}

#[test]
fn test_too_few_items() {
    let (values, formulas) = sheet(2);
    let record = extract(&values, &formulas);

    let verdicts = score(&record, &three_documents());
    let items = verdict(&verdicts, "minimum_line_items");
    assert_eq!(items.score, 0);
    assert!(items.details[0].contains('3'));
    assert!(items.details[0].contains('2'));
}

#[test]
fn test_stray_content_and_value_errors() {
    let (values, formulas) = sheet(4);
    let mut rows = values.into_rows();
    rows[1][4] = "x".into();
    rows[33][3] = "leftover".into();
    rows[5][6] = "#VALUE!".into();
    let record = extract(&Grid::new(rows), &formulas);

    let verdicts = score(&record, &three_documents());

    let regions = verdict(&verdicts, "empty_regions");
    assert_eq!(regions.score, 0);
    assert_eq!(regions.details.len(), 2);
    assert!(regions
        .details
        .iter()
        .any(|d| d.contains("title_whitespace") && d.contains("E2")));
    assert!(regions
        .details
        .iter()
        .any(|d| d.contains("rows_after_32") && d.contains("D34")));

    let errors = verdict(&verdicts, "value_errors");
    assert_eq!(errors.details, vec!["#VALUE! error in cell G6"]);

    let items = verdict(&verdicts, "item_completeness");
    assert_eq!(
        items.details,
        vec!["Invalid price format for BidCo in item at row 6"]
    );
}

#[test]
fn test_evaluators_are_independent() {
    let (values, formulas) = sheet(2);
    let record = extract(&values, &formulas);
    let inputs = three_documents();

    let registry = SuiteRegistry::with_defaults();
    let full = registry.get("template-1").unwrap().run(&inputs, &record);

    let mut partial = bidlevel_eval::Suite::new("template-1");
    partial.add(Box::new(bidlevel_eval::MinimumLineItemsEvaluator::default()));
    partial.add(Box::new(bidlevel_eval::SupplierCountEvaluator));
    let subset = partial.run(&inputs, &record);

    assert_eq!(&subset[0], verdict(&full, "minimum_line_items"));
    assert_eq!(&subset[1], verdict(&full, "supplier_count"));
}

#[test]
fn test_report_over_batch() {
    let (values, formulas) = sheet(4);
    let good = extract(&values, &formulas);
    let (values, formulas) = sheet(1);
    let short = extract(&values, &formulas);

    let results = vec![
        ExampleResult::new("four-items", score(&good, &three_documents())),
        ExampleResult::new("one-item", score(&short, &three_documents())),
    ];
    let report = SuiteReport::new(results);

    assert_eq!(report.passed, 1);
    assert_eq!(report.failed, 1);
    let line_items = report
        .evaluators
        .iter()
        .find(|s| s.evaluator == "minimum_line_items")
        .unwrap();
    assert_eq!(line_items.pass_rate, 0.5);
}
