//! Soft failures recorded while normalizing. None of these stop a batch.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    #[error("Header not found in first {window} rows; using existing column labels.")]
    HeaderNotFound { window: usize },

    #[error("No amount columns found.")]
    RoleNotResolved { headers: Vec<String> },

    #[error("{count} unparseable value(s) ignored in '{column}'.")]
    UnparseableCells { column: String, count: usize },

    #[error("Totals for '{column}' overflowed; source excluded from totals.")]
    NonFiniteTotal { column: String },

    #[error("Failed to load {file}: {reason}")]
    LoadFailure { file: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let w = Warning::RoleNotResolved {
            headers: vec!["tarih".into()],
        };
        assert_eq!(w.to_string(), "No amount columns found.");

        let w = Warning::UnparseableCells {
            column: "tutar".into(),
            count: 2,
        };
        assert_eq!(w.to_string(), "2 unparseable value(s) ignored in 'tutar'.");
    }

    #[test]
    fn test_serializes_tagged() {
        let w = Warning::HeaderNotFound { window: 10 };
        let json = serde_json::to_string(&w).unwrap();
        assert_eq!(json, r#"{"kind":"header_not_found","window":10}"#);
    }
}
