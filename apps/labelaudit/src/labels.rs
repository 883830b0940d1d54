//! Label facts derived once per record and shared by every rule.

use crate::models::rules::SecondaryLabel;
use crate::models::{Context, IssueRecord};
use regex::Regex;
use std::sync::LazyLock;

pub const TRIAGE: &str = "triage";
pub const HELP_WANTED: &str = "help wanted";
pub const QUESTION: &str = "question";
pub const UNANSWERED: &str = "unanswered";
pub const DIRECTIONS: [&str; 3] = ["bug", "enhancement", QUESTION];

/// Version-like labels such as `1.2.3` or `2.x.x`. Unanchored: `v1.4.x` counts.
static VERSION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+\.[\dx]+\.[\dx]+").unwrap());

pub fn is_version_label(name: &str) -> bool {
    VERSION_PATTERN.is_match(name)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelFacts {
    /// First version-like label in label order.
    pub version: Option<String>,
    pub version_candidates: Vec<String>,
    pub triage: bool,
    pub help_wanted: bool,
    pub question: bool,
    pub unanswered: bool,
    pub directions: Vec<String>,
    secondary: SecondaryLabel,
}

impl LabelFacts {
    pub fn derive(record: &IssueRecord, secondary: SecondaryLabel) -> Self {
        let version_candidates: Vec<String> = record
            .labels
            .iter()
            .filter(|l| is_version_label(l))
            .cloned()
            .collect();
        let directions = record
            .labels
            .iter()
            .filter(|l| DIRECTIONS.contains(&l.as_str()))
            .cloned()
            .collect();
        LabelFacts {
            version: version_candidates.first().cloned(),
            version_candidates,
            triage: record.has_label(TRIAGE),
            help_wanted: record.has_label(HELP_WANTED),
            question: record.has_label(QUESTION),
            unanswered: record.has_label(UNANSWERED),
            directions,
            secondary,
        }
    }

    pub fn has_version(&self) -> bool {
        self.version.is_some()
    }

    /// Whether the configured secondary label is present.
    pub fn secondary(&self) -> bool {
        match self.secondary {
            SecondaryLabel::Question => self.question,
            SecondaryLabel::Unanswered => self.unanswered,
        }
    }

    pub fn context(&self, record: &IssueRecord) -> Context {
        Context {
            labels: record.labels.clone(),
            assignee: record.assignee.clone(),
            is_pull_request: record.is_pull_request,
            version: self.version.clone(),
            version_candidates: self.version_candidates.clone(),
            help_wanted: self.help_wanted,
            triage: self.triage,
            question: self.question,
            unanswered: self.unanswered,
            directions: self.directions.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rstest::rstest;

    fn record(labels: &[&str]) -> IssueRecord {
        IssueRecord {
            id: 1,
            title: "t".into(),
            url: "u".into(),
            created_at: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
            is_pull_request: false,
            assignee: None,
            labels: labels.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[rstest]
    #[case::plain("1.2.3", true)]
    #[case::minor_wildcard("2.x.0", true)]
    #[case::both_wildcards("3.x.x", true)]
    #[case::prefixed("v1.4.x", true)]
    #[case::two_parts("1.2", false)]
    #[case::leading_wildcard("x.1.2", false)]
    #[case::word("bug", false)]
    fn test_version_pattern(#[case] label: &str, #[case] expected: bool) {
        assert_eq!(is_version_label(label), expected);
    }

    #[test]
    fn test_first_version_label_wins_and_all_are_kept() {
        let facts = LabelFacts::derive(&record(&["2.0.x", "bug", "1.9.3"]), SecondaryLabel::Question);
        assert_eq!(facts.version.as_deref(), Some("2.0.x"));
        assert_eq!(facts.version_candidates, vec!["2.0.x", "1.9.3"]);
    }

    #[test]
    fn test_directions_keep_label_order_and_are_case_sensitive() {
        let facts = LabelFacts::derive(
            &record(&["question", "Bug", "enhancement"]),
            SecondaryLabel::Question,
        );
        assert_eq!(facts.directions, vec!["question", "enhancement"]);
    }

    #[test]
    fn test_secondary_follows_configuration() {
        let rec = record(&["unanswered"]);
        assert!(!LabelFacts::derive(&rec, SecondaryLabel::Question).secondary());
        assert!(LabelFacts::derive(&rec, SecondaryLabel::Unanswered).secondary());
    }
}
