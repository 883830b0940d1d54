//! Record sources.
//!
//! The auditor does not fetch anything itself; it reads records that were
//! already dumped from the hosting API. Accepted layouts:
//! - a JSON array of records,
//! - a JSON array of pages (each page an array of records),
//! - newline-delimited JSON where each line is a record or a page.
//!
//! Input-level problems (unreadable file, invalid JSON) fail the whole read.
//! Per-record problems surface later as `RecordError` items so the driver
//! can apply its malformed-record policy.

use crate::error::{InputError, RecordError};
use crate::models::raw::normalize_value;
use crate::models::IssueRecord;
use serde_json::Value as Json;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Read records from `path`, or from stdin when `path` is `-`.
pub fn read_records(
    path: &Path,
) -> Result<impl Iterator<Item = Result<IssueRecord, RecordError>>, InputError> {
    let text = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .map_err(|source| InputError::Read {
                path: PathBuf::from("<stdin>"),
                source,
            })?;
        buf
    } else {
        fs::read_to_string(path).map_err(|source| InputError::Read {
            path: path.to_path_buf(),
            source,
        })?
    };
    parse_records(&text)
}

/// Split a document into raw record values; normalization stays lazy.
pub fn parse_records(
    text: &str,
) -> Result<impl Iterator<Item = Result<IssueRecord, RecordError>>, InputError> {
    let mut values: Vec<Json> = Vec::new();
    for doc in serde_json::Deserializer::from_str(text).into_iter::<Json>() {
        match doc? {
            Json::Array(items) => {
                for item in items {
                    match item {
                        Json::Array(page) => values.extend(page),
                        other => values.push(other),
                    }
                }
            }
            obj @ Json::Object(_) => values.push(obj),
            Json::Null => return Err(InputError::UnexpectedShape("null")),
            Json::Bool(_) => return Err(InputError::UnexpectedShape("a boolean")),
            Json::Number(_) => return Err(InputError::UnexpectedShape("a number")),
            Json::String(_) => return Err(InputError::UnexpectedShape("a string")),
        }
    }
    Ok(values.into_iter().map(normalize_value))
}
