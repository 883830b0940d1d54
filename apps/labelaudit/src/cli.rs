//! CLI argument parsing via `clap`.

use crate::audit::MalformedPolicy;
use crate::config::Overrides;
use crate::models::rules::{DirectionRequirement, SecondaryLabel};
use crate::output::OutputMode;
use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "labelaudit",
    version,
    about = "Flag inconsistent issue and pull request labels",
    long_about = "labelaudit — a small CLI that checks issue and pull request labels against the project's labeling workflow.\n\nRecords are read from a JSON dump of the hosting API's issue listing; nothing is fetched or modified.\n\nConfiguration precedence: CLI > labelaudit.toml > defaults.",
    after_help = "Examples:\n  gh api --paginate repos/OWNER/REPO/issues > issues.json && labelaudit audit --input issues.json\n  labelaudit audit --input issues.json --output ndjson --max-age-days 365\n  labelaudit rules --direction always --secondary unanswered",
    arg_required_else_help = true
)]
/// Top-level CLI options and subcommands.
pub struct Cli {
    #[arg(long, short, global = true, action = clap::ArgAction::SetTrue, help = "Enable debug logging on stderr")]
    pub verbose: bool,
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand)]
/// Supported subcommands.
pub enum Commands {
    /// Show version
    #[command(about = "Show version", long_about = "Print the current labelaudit version.")]
    Version,
    /// Audit labels of a record dump
    #[command(
        about = "Run label checks",
        long_about = "Check every issue and pull request in the input against the configured rule set and report those with problems. Exits 1 when any record is reported.",
        after_help = "Examples:\n  labelaudit audit --input issues.json\n  cat issues.ndjson | labelaudit audit --output json --exclude 42"
    )]
    Audit {
        #[command(flatten)]
        common: CommonArgs,
        #[arg(long, help = "Records file: JSON array, array of pages, or NDJSON; - for stdin (default: -)")]
        input: Option<String>,
        #[arg(long, value_enum, help = "Output mode: human|json|ndjson (default: human)")]
        output: Option<OutputMode>,
        #[arg(long = "exclude", value_name = "ID", help = "Record id to skip; repeatable, adds to the config list")]
        exclude: Vec<u64>,
        #[arg(long, value_enum, help = "On malformed records: abort|skip (default: abort)")]
        on_malformed: Option<MalformedPolicy>,
        #[arg(long, help = "Evaluation time as RFC 3339 (default: current time)")]
        now: Option<String>,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Exit 0 even when problems are reported")]
        exit_zero: bool,
    },
    /// Print the effective rule set
    #[command(
        about = "Show effective rules",
        long_about = "Print the rule configuration after merging CLI flags, labelaudit.toml, and defaults."
    )]
    Rules {
        #[command(flatten)]
        common: CommonArgs,
    },
}

#[derive(Args)]
/// Rule flags shared by `audit` and `rules`.
pub struct CommonArgs {
    #[arg(long, help = "Repository root (default: current dir)")]
    pub repo_root: Option<String>,
    #[arg(long, value_enum, help = "Direction label requirement: always|triage-exempt")]
    pub direction: Option<DirectionRequirement>,
    #[arg(long, value_enum, help = "Issue-only label paired with triage: question|unanswered")]
    pub secondary: Option<SecondaryLabel>,
    #[arg(long, help = "Skip records older than this many days")]
    pub max_age_days: Option<u32>,
}

impl CommonArgs {
    pub fn into_overrides(self) -> Overrides {
        Overrides {
            repo_root: self.repo_root,
            direction: self.direction,
            secondary: self.secondary,
            max_age_days: self.max_age_days,
            ..Overrides::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_audit_flags() {
        let cli = Cli::try_parse_from([
            "labelaudit",
            "audit",
            "--input",
            "issues.json",
            "--output",
            "ndjson",
            "--exclude",
            "4",
            "--exclude",
            "9",
            "--direction",
            "always",
            "--secondary",
            "unanswered",
            "--on-malformed",
            "skip",
            "--max-age-days",
            "365",
        ])
        .unwrap();
        let Commands::Audit {
            common,
            input,
            output,
            exclude,
            on_malformed,
            exit_zero,
            ..
        } = cli.cmd
        else {
            panic!("expected audit subcommand");
        };
        assert_eq!(input.as_deref(), Some("issues.json"));
        assert_eq!(output, Some(OutputMode::Ndjson));
        assert_eq!(exclude, vec![4, 9]);
        assert_eq!(on_malformed, Some(MalformedPolicy::Skip));
        assert!(!exit_zero);
        let ov = common.into_overrides();
        assert_eq!(ov.direction, Some(DirectionRequirement::Always));
        assert_eq!(ov.secondary, Some(SecondaryLabel::Unanswered));
        assert_eq!(ov.max_age_days, Some(365));
    }

    #[test]
    fn test_unknown_secondary_is_rejected() {
        let res = Cli::try_parse_from(["labelaudit", "rules", "--secondary", "answered"]);
        assert!(res.is_err());
    }
}
