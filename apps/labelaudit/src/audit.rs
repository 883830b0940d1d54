//! Label audit runner.
//!
//! `evaluate` checks one record against the configured rule set and is pure.
//! `run_audit` drives a record sequence: exclude list first, then malformed
//! handling, the age gate, and evaluation. Only records with at least one
//! problem produce a `ProblemReport`, in input order.

use crate::error::{AuditError, RecordError, Result};
use crate::labels::LabelFacts;
use crate::models::rules::{DirectionRequirement, RuleConfig, SecondaryLabel, VersionLabelPolicy};
use crate::models::{AuditResult, IssueRecord, ProblemReport, Summary};
use chrono::{DateTime, Duration, Utc};
use clap::ValueEnum;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

pub const MISSING_DIRECTION: &str = r#"Missing a "bug", "enhancement" or "question" label"#;
pub const TOO_MANY_DIRECTIONS: &str = r#"Too many "bug", "enhancement" and "question" labels"#;
pub const ASSIGNEE_AND_HELP_WANTED: &str =
    r#"Should not have both an assignee and a "help wanted" label"#;
pub const MISSING_ASSIGNEE_OR_HELP_WANTED: &str =
    r#"Missing an assignee or a "help wanted" label"#;
pub const MISSING_VERSION: &str = "Missing a version label";
pub const TRIAGE_AND_VERSION: &str = r#"Should not have both a "triage" and version label"#;
pub const MISSING_TRIAGE_OR_VERSION: &str = r#"Missing a "triage" or version label"#;

pub fn too_many_triage_labels(secondary: SecondaryLabel) -> String {
    format!(
        r#"Too many "triage", "{}" and version labels"#,
        secondary.label()
    )
}

pub fn missing_triage_label(secondary: SecondaryLabel) -> String {
    format!(
        r#"Missing a "triage", "{}" or version label"#,
        secondary.label()
    )
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
/// What the driver does with a record that failed normalization.
pub enum MalformedPolicy {
    /// Stop the run and report the offending record.
    #[default]
    Abort,
    /// Log a warning and continue with the next record.
    Skip,
}

#[derive(Debug, Clone, Default)]
/// Run-wide settings, immutable for the duration of an audit.
pub struct AuditOptions {
    pub rules: RuleConfig,
    pub exclude: BTreeSet<u64>,
    pub on_malformed: MalformedPolicy,
}

/// Evaluate every rule against `record` and return the problems found.
///
/// Rules run independently in a fixed order (direction, version/assignment,
/// triage/secondary), so one record can collect several problems.
pub fn evaluate(record: &IssueRecord, rules: &RuleConfig) -> Vec<String> {
    let facts = LabelFacts::derive(record, rules.secondary);
    check_all(record, &facts, rules)
}

fn check_all(record: &IssueRecord, facts: &LabelFacts, rules: &RuleConfig) -> Vec<String> {
    let mut problems = Vec::new();
    check_direction(facts, rules.direction, &mut problems);
    check_version(record, facts, rules.version_policy, &mut problems);
    check_triage(record, facts, rules.secondary, &mut problems);
    problems
}

/// Exactly one of `bug`/`enhancement`/`question`.
fn check_direction(facts: &LabelFacts, req: DirectionRequirement, out: &mut Vec<String>) {
    if req == DirectionRequirement::TriageExempt && facts.triage {
        return;
    }
    match facts.directions.len() {
        0 => out.push(MISSING_DIRECTION.to_string()),
        1 => {}
        _ => out.push(TOO_MANY_DIRECTIONS.to_string()),
    }
}

/// Versioned records need an assignee XOR `help wanted`; unversioned records
/// may have neither.
fn check_version(
    record: &IssueRecord,
    facts: &LabelFacts,
    policy: VersionLabelPolicy,
    out: &mut Vec<String>,
) {
    let assigned = record.assignee.is_some();
    match policy {
        VersionLabelPolicy::Strict => {
            if facts.has_version() {
                if assigned && facts.help_wanted {
                    out.push(ASSIGNEE_AND_HELP_WANTED.to_string());
                } else if !assigned && !facts.help_wanted {
                    out.push(MISSING_ASSIGNEE_OR_HELP_WANTED.to_string());
                }
            } else if assigned || facts.help_wanted {
                out.push(MISSING_VERSION.to_string());
            }
        }
    }
}

/// Pull requests need `triage` XOR a version label; issues need exactly one
/// of `triage`, the secondary label, or a version label.
fn check_triage(
    record: &IssueRecord,
    facts: &LabelFacts,
    secondary: SecondaryLabel,
    out: &mut Vec<String>,
) {
    if record.is_pull_request {
        match (facts.triage, facts.has_version()) {
            (true, true) => out.push(TRIAGE_AND_VERSION.to_string()),
            (false, false) => out.push(MISSING_TRIAGE_OR_VERSION.to_string()),
            _ => {}
        }
        return;
    }
    let present = [facts.triage, facts.secondary(), facts.has_version()]
        .into_iter()
        .filter(|b| *b)
        .count();
    match present {
        0 => out.push(missing_triage_label(secondary)),
        1 => {}
        _ => out.push(too_many_triage_labels(secondary)),
    }
}

/// Age gate with an injected clock. `None` disables the gate.
pub fn is_within_age(record: &IssueRecord, max_age_days: Option<u32>, now: DateTime<Utc>) -> bool {
    match max_age_days {
        Some(days) => now - record.created_at <= Duration::days(i64::from(days)),
        None => true,
    }
}

/// Evaluate a single record and build its report when it has problems.
pub fn audit_record(
    record: &IssueRecord,
    rules: &RuleConfig,
    now: DateTime<Utc>,
) -> Option<ProblemReport> {
    let facts = LabelFacts::derive(record, rules.secondary);
    let problems = check_all(record, &facts, rules);
    if problems.is_empty() {
        return None;
    }
    if facts.version_candidates.len() > 1 {
        debug!(
            id = record.id,
            candidates = ?facts.version_candidates,
            "multiple version labels; using the first"
        );
    }
    Some(ProblemReport {
        age_days: (now - record.created_at).num_days().max(0),
        source: record.source(),
        problems,
        context: facts.context(record),
    })
}

/// Run the audit over a record sequence.
///
/// Excluded ids are dropped before anything else, including malformed
/// records whose id could still be read. A malformed record either aborts
/// the run or is skipped according to `on_malformed`; an aborted run emits
/// no reports.
pub fn run_audit<I>(records: I, opts: &AuditOptions, now: DateTime<Utc>) -> Result<AuditResult>
where
    I: IntoIterator<Item = std::result::Result<IssueRecord, RecordError>>,
{
    let mut summary = Summary::default();
    let mut pending: Vec<IssueRecord> = Vec::new();
    for (position, item) in records.into_iter().enumerate() {
        summary.scanned += 1;
        let record = match item {
            Ok(record) => record,
            Err(err) => {
                if err.id().is_some_and(|id| opts.exclude.contains(&id)) {
                    debug!(position, error = %err, "ignoring malformed excluded record");
                    summary.excluded += 1;
                    continue;
                }
                match opts.on_malformed {
                    MalformedPolicy::Abort => {
                        return Err(AuditError::MalformedRecord {
                            position,
                            source: err,
                        })
                    }
                    MalformedPolicy::Skip => {
                        warn!(position, error = %err, "skipping malformed record");
                        summary.malformed += 1;
                        continue;
                    }
                }
            }
        };
        if opts.exclude.contains(&record.id) {
            debug!(id = record.id, "excluded");
            summary.excluded += 1;
            continue;
        }
        if !is_within_age(&record, opts.rules.max_age_days, now) {
            debug!(id = record.id, created_at = %record.created_at, "older than max age");
            summary.aged_out += 1;
            continue;
        }
        pending.push(record);
    }

    // Records are independent; collect keeps input order.
    let reports: Vec<ProblemReport> = pending
        .par_iter()
        .filter_map(|record| audit_record(record, &opts.rules, now))
        .collect();

    summary.reported = reports.len();
    summary.problems = reports.iter().map(|r| r.problems.len()).sum();
    info!(
        scanned = summary.scanned,
        reported = summary.reported,
        excluded = summary.excluded,
        aged_out = summary.aged_out,
        malformed = summary.malformed,
        "audit finished"
    );
    Ok(AuditResult { reports, summary })
}
