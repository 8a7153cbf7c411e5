use crate::field::Field;
use serde::Serialize;

/// Summary of a built index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    /// Distinct values of the `date` field.
    pub days: usize,
    pub news: usize,
    pub documents: usize,
    pub tokens: u64,
    pub fields: Vec<FieldStats>,
    pub multifield: bool,
    pub positional: bool,
    pub stemming: bool,
    pub permuterm: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldStats {
    pub field: Field,
    pub terms: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permuterms: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stems: Option<usize>,
}

impl IndexStats {
    pub fn field(&self, field: Field) -> Option<&FieldStats> { self.fields.iter().find(|f| f.field == field) }
}
