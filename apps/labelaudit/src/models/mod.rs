//! Shared data models for audit input records and report output.

pub mod raw;
pub mod rules;

use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq)]
/// A normalized issue or pull request ready for rule evaluation.
///
/// `labels` are case-sensitive and deduplicated, keeping the first
/// occurrence, so their order is the order the source listed them in.
pub struct IssueRecord {
    pub id: u64,
    pub title: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
    pub is_pull_request: bool,
    pub assignee: Option<String>,
    pub labels: Vec<String>,
}

impl IssueRecord {
    pub fn has_label(&self, name: &str) -> bool {
        self.labels.iter().any(|l| l == name)
    }

    pub fn source(&self) -> Source {
        Source {
            id: self.id,
            title: self.title.clone(),
            url: self.url.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// Identifying snapshot of the offending record.
pub struct Source {
    pub id: u64,
    pub title: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// Every derived fact the rules looked at, kept for auditability.
pub struct Context {
    pub labels: Vec<String>,
    pub assignee: Option<String>,
    pub is_pull_request: bool,
    pub version: Option<String>,
    /// All version-like labels; more than one means the record is mislabeled.
    pub version_candidates: Vec<String>,
    pub help_wanted: bool,
    pub triage: bool,
    pub question: bool,
    pub unanswered: bool,
    pub directions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// One report per record that failed at least one rule.
pub struct ProblemReport {
    pub age_days: i64,
    pub source: Source,
    pub problems: Vec<String>,
    pub context: Context,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
/// Aggregated counters for a single audit run.
pub struct Summary {
    pub scanned: usize,
    pub reported: usize,
    pub excluded: usize,
    pub aged_out: usize,
    pub malformed: usize,
    pub problems: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
/// Audit results container.
pub struct AuditResult {
    pub reports: Vec<ProblemReport>,
    pub summary: Summary,
}
