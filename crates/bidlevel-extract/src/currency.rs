//! Forgiving numeric parsing for currency-like cell content.
//!
//! Supplier sheets arrive with every formatting habit imaginable:
//! `$1,234.56`, `1 234,56 €`, `8.25%`, `(1,200.00)`, narrow no-break
//! spaces from locale-aware exports. Anything that cannot be read as a
//! finite number becomes `None`; parsing never fails.

use bidlevel_grid::CellValue;

const CURRENCY_SYMBOLS: &[char] = &['$', '€', '£', '¥'];

/// Parse a cell as an amount
pub fn parse_amount(cell: &CellValue) -> Option<f64> {
    match cell {
        CellValue::Number(n) if n.is_finite() => Some(*n),
        CellValue::Text(text) => clean_currency_text(text),
        _ => None,
    }
}

/// Parse an optional cell; an absent cell is `None`
pub fn parse_optional_amount(cell: Option<&CellValue>) -> Option<f64> {
    cell.and_then(parse_amount)
}

/// Strip currency formatting from text and convert it to a number
pub fn clean_currency_text(text: &str) -> Option<f64> {
    let mut text = text.trim();
    if text.is_empty() || text == "-" {
        return None;
    }

    // Accounting negatives: (1,234.00)
    let mut negative = false;
    if let Some(inner) = text.strip_prefix('(').and_then(|t| t.strip_suffix(')')) {
        negative = true;
        text = inner;
    }

    let mut cleaned: String = text
        .chars()
        .filter(|c| !c.is_whitespace() && !CURRENCY_SYMBOLS.contains(c) && *c != '%' && *c != '\'')
        .collect();

    if let Some(rest) = cleaned.strip_prefix('-') {
        negative = !negative;
        cleaned = rest.to_string();
    } else if let Some(rest) = cleaned.strip_prefix('+') {
        cleaned = rest.to_string();
    }

    let normalized = normalize_separators(&cleaned)?;
    let value: f64 = normalized.parse().ok()?;
    if !value.is_finite() {
        return None;
    }

    Some(if negative { -value } else { value })
}

/// Rewrite grouping and decimal marks into a plain `1234.56` form
fn normalize_separators(text: &str) -> Option<String> {
    if text.is_empty() {
        return None;
    }

    let commas = text.matches(',').count();
    let dots = text.matches('.').count();

    let result = match (commas, dots) {
        (0, 0) => text.to_string(),
        (_, _) if commas > 0 && dots > 0 => {
            // The right-most mark is the decimal separator
            let last_comma = text.rfind(',')?;
            let last_dot = text.rfind('.')?;
            if last_dot > last_comma {
                text.replace(',', "")
            } else {
                text.replace('.', "").replace(',', ".")
            }
        }
        (_, 0) => {
            if is_thousands_grouping(text, ',') {
                text.replace(',', "")
            } else if commas == 1 {
                text.replace(',', ".")
            } else {
                return None;
            }
        }
        (0, _) => {
            if dots == 1 {
                text.to_string()
            } else if is_thousands_grouping(text, '.') {
                text.replace('.', "")
            } else {
                return None;
            }
        }
        _ => unreachable!("both separators handled above"),
    };

    Some(result)
}

/// True when every group after `sep` is exactly three digits and the
/// leading group is a non-zero 1-3 digit number (`1,234,567`)
fn is_thousands_grouping(text: &str, sep: char) -> bool {
    let mut groups = text.split(sep);
    let head = groups.next().unwrap_or_default();

    let head_ok = !head.is_empty()
        && head.len() <= 3
        && head.chars().all(|c| c.is_ascii_digit())
        && head.chars().any(|c| c != '0');

    head_ok && groups.all(|g| g.len() == 3 && g.chars().all(|c| c.is_ascii_digit()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Option<f64> {
        clean_currency_text(text)
    }

    #[test]
    fn test_plain_numbers() {
        assert_eq!(parse("3"), Some(3.0));
        assert_eq!(parse("12.5"), Some(12.5));
        assert_eq!(parse("-4"), Some(-4.0));
    }

    #[test]
    fn test_dollar_with_thousands() {
        assert_eq!(parse("$1,234.56"), Some(1234.56));
        assert_eq!(parse("$ 12,000"), Some(12000.0));
        assert_eq!(parse("$1,234,567.89"), Some(1234567.89));
    }

    #[test]
    fn test_european_formats() {
        assert_eq!(parse("1.234,56 €"), Some(1234.56));
        assert_eq!(parse("12,5"), Some(12.5));
        assert_eq!(parse("0,500"), Some(0.5));
        assert_eq!(parse("1.234.567"), Some(1234567.0));
    }

    #[test]
    fn test_locale_spacing() {
        assert_eq!(parse("1\u{202f}234,56"), Some(1234.56));
        assert_eq!(parse("1\u{a0}234.56 $"), Some(1234.56));
    }

    #[test]
    fn test_percent() {
        assert_eq!(parse("8.25%"), Some(8.25));
        assert_eq!(parse("7 %"), Some(7.0));
    }

    #[test]
    fn test_accounting_negative() {
        assert_eq!(parse("(1,200.00)"), Some(-1200.0));
        assert_eq!(parse("-$45.10"), Some(-45.1));
    }

    #[test]
    fn test_unparsable_is_none() {
        assert_eq!(parse(""), None);
        assert_eq!(parse("   "), None);
        assert_eq!(parse("-"), None);
        assert_eq!(parse("TBD"), None);
        assert_eq!(parse("$"), None);
        assert_eq!(parse("1,2,3"), None);
        assert_eq!(parse("inf"), None);
        assert_eq!(parse("NaN"), None);
    }

    #[test]
    fn test_parse_amount_cells() {
        assert_eq!(parse_amount(&CellValue::Number(42.0)), Some(42.0));
        assert_eq!(parse_amount(&CellValue::Number(f64::NAN)), None);
        assert_eq!(parse_amount(&CellValue::Bool(true)), None);
        assert_eq!(parse_amount(&CellValue::Empty), None);
        assert_eq!(parse_amount(&CellValue::from("$9.99")), Some(9.99));
        assert_eq!(parse_optional_amount(None), None);
    }
}
