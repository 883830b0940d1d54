//! Raw record schema and normalization.
//!
//! Accepts the hosting API's REST issue payload (`number`, `html_url`,
//! `pull_request`, `assignee.login`, `labels[].name`) as well as a flat
//! shape (`id`, `url`, `is_pull_request`, `assignee`, `labels` as strings).

use super::IssueRecord;
use crate::error::RecordError;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value as Json;

#[derive(Deserialize, Default)]
/// An issue or pull request exactly as the source delivered it.
pub struct RawIssue {
    #[serde(default)]
    pub number: Option<u64>,
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<String>,
    #[serde(default)]
    pub pull_request: Option<Json>,
    #[serde(default, alias = "isPullRequest")]
    pub is_pull_request: Option<bool>,
    #[serde(default)]
    pub assignee: Option<RawAssignee>,
    #[serde(default)]
    pub labels: Option<Vec<RawLabel>>,
}

#[derive(Deserialize)]
#[serde(untagged)]
pub enum RawAssignee {
    User { login: String },
    Login(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
pub enum RawLabel {
    Named { name: String },
    Bare(String),
}

impl RawLabel {
    fn into_name(self) -> String {
        match self {
            RawLabel::Named { name } | RawLabel::Bare(name) => name,
        }
    }
}

/// Parse and normalize one JSON value into an `IssueRecord`.
pub fn normalize_value(value: Json) -> Result<IssueRecord, RecordError> {
    if !value.is_object() {
        return Err(RecordError::Malformed {
            id: None,
            reason: format!("expected an object, found {}", json_kind(&value)),
        });
    }
    // Keep the id around so a type error elsewhere still names the record.
    let id = value
        .get("number")
        .or_else(|| value.get("id"))
        .and_then(Json::as_u64);
    let raw: RawIssue = serde_json::from_value(value).map_err(|e| RecordError::Malformed {
        id,
        reason: e.to_string(),
    })?;
    normalize(raw)
}

/// Validate required fields and deduplicate labels.
///
/// The REST `number` wins over `id`, and `html_url` over the API `url`.
pub fn normalize(raw: RawIssue) -> Result<IssueRecord, RecordError> {
    let id = raw.number.or(raw.id);
    let missing = |field: &'static str| RecordError::MissingField { id, field };

    let record_id = id.ok_or_else(|| missing("number"))?;
    let title = raw.title.ok_or_else(|| missing("title"))?;
    let url = raw.html_url.or(raw.url).ok_or_else(|| missing("html_url"))?;
    let created_raw = raw.created_at.ok_or_else(|| missing("created_at"))?;
    let created_at = DateTime::parse_from_rfc3339(&created_raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| RecordError::InvalidTimestamp {
            id,
            value: created_raw.clone(),
        })?;
    let raw_labels = raw.labels.ok_or_else(|| missing("labels"))?;

    let mut labels: Vec<String> = Vec::with_capacity(raw_labels.len());
    for name in raw_labels.into_iter().map(RawLabel::into_name) {
        if !labels.contains(&name) {
            labels.push(name);
        }
    }

    let is_pull_request = raw
        .is_pull_request
        .unwrap_or_else(|| raw.pull_request.is_some());
    let assignee = raw.assignee.map(|a| match a {
        RawAssignee::User { login } | RawAssignee::Login(login) => login,
    });

    Ok(IssueRecord {
        id: record_id,
        title,
        url,
        created_at,
        is_pull_request,
        assignee,
        labels,
    })
}

fn json_kind(v: &Json) -> &'static str {
    match v {
        Json::Null => "null",
        Json::Bool(_) => "boolean",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
}
