//! Error types for record normalization, input reading, configuration, and
//! the audit driver.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
/// A single record could not be normalized into an `IssueRecord`.
pub enum RecordError {
    #[error("{} is malformed: {reason}", describe(.id))]
    Malformed { id: Option<u64>, reason: String },

    #[error("{} is missing required field '{field}'", describe(.id))]
    MissingField { id: Option<u64>, field: &'static str },

    #[error("{} has an invalid created_at timestamp '{value}'", describe(.id))]
    InvalidTimestamp { id: Option<u64>, value: String },
}

impl RecordError {
    /// Identifier of the offending record, when it could be read.
    pub fn id(&self) -> Option<u64> {
        match self {
            RecordError::Malformed { id, .. }
            | RecordError::MissingField { id, .. }
            | RecordError::InvalidTimestamp { id, .. } => *id,
        }
    }
}

fn describe(id: &Option<u64>) -> String {
    match id {
        Some(id) => format!("record #{id}"),
        None => "record without id".to_string(),
    }
}

#[derive(Error, Debug)]
pub enum InputError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("input is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("expected an array of records or pages, found {0}")]
    UnexpectedShape(&'static str),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML in {}: {source}", .path.display())]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid YAML in {}: {source}", .path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid --now timestamp '{0}' (expected RFC 3339)")]
    InvalidNow(String),
}

#[derive(Error, Debug)]
pub enum AuditError {
    #[error("aborting audit at input position {position}: {source}")]
    MalformedRecord {
        position: usize,
        #[source]
        source: RecordError,
    },
}

pub type Result<T, E = AuditError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_display_names_record() {
        let err = RecordError::MissingField {
            id: Some(42),
            field: "labels",
        };
        assert_eq!(
            err.to_string(),
            "record #42 is missing required field 'labels'"
        );
        assert_eq!(err.id(), Some(42));
    }

    #[test]
    fn test_abort_error_wraps_record_error() {
        let err = AuditError::MalformedRecord {
            position: 3,
            source: RecordError::MissingField {
                id: None,
                field: "number",
            },
        };
        assert_eq!(
            err.to_string(),
            "aborting audit at input position 3: record without id is missing required field 'number'"
        );
    }
}
