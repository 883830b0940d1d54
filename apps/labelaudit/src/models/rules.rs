//! Rule-set configuration.
//!
//! The label workflow changed several times, so every point where revisions
//! disagree is an explicit setting rather than a hard-coded branch:
//! - `direction`: whether triaged records are exempt from needing exactly one
//!   of `bug`/`enhancement`/`question`.
//! - `secondary`: which issue-only label (`question` or `unanswered`) counts
//!   alongside `triage` and the version label.
//! - `version_policy`: how version labels interact with assignment.
//! - `max_age_days`: skip records older than this many days.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
/// Version/assignment interaction.
pub enum VersionLabelPolicy {
    /// Versioned records need exactly one of an assignee or `help wanted`;
    /// unversioned records may have neither.
    #[default]
    Strict,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
/// When the direction-label rule applies.
pub enum DirectionRequirement {
    /// Every record needs exactly one direction label.
    Always,
    /// Records carrying `triage` skip the direction check.
    #[default]
    TriageExempt,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
/// Issue-only label paired with `triage` and the version label.
pub enum SecondaryLabel {
    #[default]
    Question,
    Unanswered,
}

impl SecondaryLabel {
    pub fn label(self) -> &'static str {
        match self {
            SecondaryLabel::Question => "question",
            SecondaryLabel::Unanswered => "unanswered",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
/// The rule variant to evaluate, fixed for the duration of a run.
pub struct RuleConfig {
    #[serde(default)]
    pub version_policy: VersionLabelPolicy,
    #[serde(default)]
    pub direction: DirectionRequirement,
    #[serde(default)]
    pub secondary: SecondaryLabel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_age_days: Option<u32>,
}
