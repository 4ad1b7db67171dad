//! Request inputs the evaluators may consult.

use serde::{Deserialize, Serialize};

/// What the user asked for when the sheet was produced
///
/// Deserializes from a dataset example's `inputs` object, where the source
/// documents are listed under `pdf_paths`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestInputs {
    /// Chat message that produced the sheet
    pub message: String,
    /// Template selecting the evaluator suite
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    /// Spreadsheet the request targeted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_path: Option<String>,
    /// Source documents, one per expected supplier
    #[serde(alias = "pdf_paths")]
    pub document_paths: Vec<String>,
}

impl RequestInputs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_template(mut self, template_id: impl Into<String>) -> Self {
        self.template_id = Some(template_id.into());
        self
    }

    pub fn with_documents<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.document_paths = paths.into_iter().map(Into::into).collect();
        self
    }

    pub fn document_count(&self) -> usize {
        self.document_paths.len()
    }
}
