//! Output rendering for audit reports.
//!
//! Supports `human` (default), `json` (one pretty document with a summary)
//! and `ndjson` (one `ProblemReport` per line, nothing else on stdout).

use crate::models::rules::RuleConfig;
use crate::models::{AuditResult, ProblemReport};
use clap::ValueEnum;
use owo_colors::OwoColorize;
use serde::{Deserialize, Serialize};
use serde_json::json;
use serde_json::Value as JsonVal;
use std::io::{self, Write};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    #[default]
    Human,
    Json,
    Ndjson,
}

fn use_colors(output: OutputMode) -> bool {
    output == OutputMode::Human && std::env::var_os("NO_COLOR").is_none()
}

/// Print audit results to stdout in the requested format.
pub fn print_audit(res: &AuditResult, output: OutputMode) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_audit(&mut out, res, output, use_colors(output))
}

/// Write audit results to any sink.
pub fn write_audit<W: Write>(
    out: &mut W,
    res: &AuditResult,
    output: OutputMode,
    color: bool,
) -> io::Result<()> {
    match output {
        OutputMode::Json => {
            serde_json::to_writer_pretty(&mut *out, &compose_audit_json(res))?;
            writeln!(out)
        }
        OutputMode::Ndjson => {
            for report in &res.reports {
                serde_json::to_writer(&mut *out, report)?;
                writeln!(out)?;
            }
            Ok(())
        }
        OutputMode::Human => {
            for report in &res.reports {
                write_human_report(out, report, color)?;
            }
            let s = &res.summary;
            let summary = format!(
                "— Summary — reported={} problems={} scanned={} excluded={} aged_out={} malformed={}",
                s.reported, s.problems, s.scanned, s.excluded, s.aged_out, s.malformed
            );
            if color {
                writeln!(out, "{}", summary.bold())
            } else {
                writeln!(out, "{}", summary)
            }
        }
    }
}

fn write_human_report<W: Write>(out: &mut W, r: &ProblemReport, color: bool) -> io::Result<()> {
    let kind = if r.context.is_pull_request {
        "pull"
    } else {
        "issue"
    };
    let head = format!("#{} {}", r.source.id, r.source.title);
    if color {
        writeln!(
            out,
            "{} {} {}",
            format!("⟦{kind}⟧").blue().bold(),
            head.bold(),
            r.source.url.bright_black()
        )?;
    } else {
        writeln!(out, "⟦{kind}⟧ {} {}", head, r.source.url)?;
    }
    for p in &r.problems {
        if color {
            writeln!(out, "  {} {}", "✖".red(), p)?;
        } else {
            writeln!(out, "  ✖ {}", p)?;
        }
    }
    let labels = if r.context.labels.is_empty() {
        "(none)".to_string()
    } else {
        r.context.labels.join(", ")
    };
    let assignee = r.context.assignee.as_deref().unwrap_or("(none)");
    let line = format!(
        "  labels: {labels} · assignee: {assignee} · age: {}d",
        r.age_days
    );
    if color {
        writeln!(out, "{}", line.bright_black())?;
    } else {
        writeln!(out, "{}", line)?;
    }
    if r.context.version_candidates.len() > 1 {
        let note = format!(
            "  note: several version labels [{}]; using {}",
            r.context.version_candidates.join(", "),
            r.context.version.as_deref().unwrap_or_default()
        );
        if color {
            writeln!(out, "{}", note.yellow())?;
        } else {
            writeln!(out, "{}", note)?;
        }
    }
    Ok(())
}

/// Compose audit JSON object (pure) for testing/snapshot purposes.
pub fn compose_audit_json(res: &AuditResult) -> JsonVal {
    json!({
        "reports": res.reports,
        "summary": res.summary,
    })
}

/// Render the effective rule configuration as TOML for `labelaudit rules`.
pub fn render_rules(rules: &RuleConfig) -> String {
    toml::to_string(rules).unwrap_or_else(|e| format!("# failed to render rules: {e}\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Context, Source, Summary};

    fn sample() -> AuditResult {
        AuditResult {
            reports: vec![ProblemReport {
                age_days: 3,
                source: Source {
                    id: 7,
                    title: "Flaky test".into(),
                    url: "https://example.com/7".into(),
                },
                problems: vec!["Missing a version label".into()],
                context: Context {
                    labels: vec!["bug".into(), "2.x.x".into(), "1.0.0".into()],
                    assignee: Some("alice".into()),
                    is_pull_request: false,
                    version: Some("2.x.x".into()),
                    version_candidates: vec!["2.x.x".into(), "1.0.0".into()],
                    help_wanted: false,
                    triage: false,
                    question: false,
                    unanswered: false,
                    directions: vec!["bug".into()],
                },
            }],
            summary: Summary {
                scanned: 4,
                reported: 1,
                excluded: 1,
                aged_out: 0,
                malformed: 0,
                problems: 1,
            },
        }
    }

    fn render(output: OutputMode) -> String {
        let mut buf = Vec::new();
        write_audit(&mut buf, &sample(), output, false).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_compose_audit_json_shape() {
        let out = compose_audit_json(&sample());
        assert_eq!(out["summary"]["reported"], 1);
        assert_eq!(out["reports"][0]["source"]["id"], 7);
        assert_eq!(out["reports"][0]["context"]["version"], "2.x.x");
        assert_eq!(out["reports"][0]["problems"][0], "Missing a version label");
    }

    #[test]
    fn test_ndjson_is_one_report_per_line() {
        let text = render(OutputMode::Ndjson);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 1);
        let v: JsonVal = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(v["age_days"], 3);
        assert_eq!(v["context"]["assignee"], "alice");
    }

    #[test]
    fn test_human_lists_problems_and_version_note() {
        let text = render(OutputMode::Human);
        assert!(text.contains("⟦issue⟧ #7 Flaky test https://example.com/7"));
        assert!(text.contains("  ✖ Missing a version label"));
        assert!(text.contains("several version labels [2.x.x, 1.0.0]; using 2.x.x"));
        assert!(text.contains("reported=1 problems=1 scanned=4 excluded=1"));
    }

    #[test]
    fn test_render_rules_as_toml() {
        let text = render_rules(&RuleConfig::default());
        assert!(text.contains(r#"direction = "triage-exempt""#));
        assert!(text.contains(r#"secondary = "question""#));
    }
}
