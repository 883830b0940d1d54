//! Configuration discovery and effective settings resolution.
//!
//! labelaudit reads `labelaudit.toml|yaml|yml` from the repository root (or
//! closest ancestor) and merges it with CLI flags to produce an `Effective`
//! config. Defaults:
//! - `input`: `-` (stdin)
//! - `output`: `human`
//! - `exclude`: empty
//! - `on_malformed`: `abort`
//! - `rules.direction`: `triage-exempt`
//! - `rules.secondary`: `question`
//! - `rules.version_policy`: `strict`
//! - `rules.max_age_days`: unset (no age gate)
//!
//! Overrides precedence: CLI > config file > defaults. The exclude list is
//! the union of both sources.

use crate::audit::{AuditOptions, MalformedPolicy};
use crate::error::ConfigError;
use crate::models::rules::{DirectionRequirement, RuleConfig, SecondaryLabel, VersionLabelPolicy};
use crate::output::OutputMode;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_NAMES: [&str; 3] = ["labelaudit.toml", "labelaudit.yaml", "labelaudit.yml"];

#[derive(Debug, Default, Deserialize, Clone)]
/// Rule settings under `[rules]`.
pub struct RulesCfg {
    pub version_policy: Option<VersionLabelPolicy>,
    pub direction: Option<DirectionRequirement>,
    pub secondary: Option<SecondaryLabel>,
    pub max_age_days: Option<u32>,
}

#[derive(Debug, Default, Deserialize, Clone)]
/// Root configuration loaded from `labelaudit.toml|yaml`.
pub struct AuditConfig {
    pub input: Option<String>,
    pub output: Option<OutputMode>,
    #[serde(default)]
    pub exclude: Vec<u64>,
    pub on_malformed: Option<MalformedPolicy>,
    #[serde(default)]
    pub rules: Option<RulesCfg>,
}

#[derive(Debug, Default, Clone)]
/// Values supplied on the command line; `None` defers to config/defaults.
pub struct Overrides {
    pub repo_root: Option<String>,
    pub input: Option<String>,
    pub output: Option<OutputMode>,
    pub exclude: Vec<u64>,
    pub on_malformed: Option<MalformedPolicy>,
    pub direction: Option<DirectionRequirement>,
    pub secondary: Option<SecondaryLabel>,
    pub max_age_days: Option<u32>,
    pub now: Option<String>,
}

#[derive(Debug, Clone)]
/// Fully-resolved configuration used by commands after applying precedence.
pub struct Effective {
    pub repo_root: PathBuf,
    pub config_path: Option<PathBuf>,
    pub input: PathBuf,
    pub output: OutputMode,
    pub options: AuditOptions,
    pub now: DateTime<Utc>,
}

/// Walk upward from `start` to detect the repository root.
///
/// Stops when a `labelaudit.toml|yaml|yml` or a `.git` directory is found.
pub fn detect_repo_root(start: &Path) -> PathBuf {
    let mut cur = start;
    loop {
        if CONFIG_NAMES.iter().any(|n| cur.join(n).exists()) || cur.join(".git").exists() {
            return cur.to_path_buf();
        }
        match cur.parent() {
            Some(p) => cur = p,
            None => return start.to_path_buf(),
        }
    }
}

/// Locate the config file in `root`, if any.
pub fn find_config(root: &Path) -> Option<PathBuf> {
    CONFIG_NAMES
        .iter()
        .map(|n| root.join(n))
        .find(|p| p.is_file())
}

/// Load `AuditConfig` from `path`, choosing the parser by extension.
pub fn load_config(path: &Path) -> Result<AuditConfig, ConfigError> {
    let s = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let is_toml = path.extension().is_some_and(|e| e == "toml");
    if is_toml {
        toml::from_str(&s).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })
    } else {
        serde_yaml::from_str(&s).map_err(|source| ConfigError::Yaml {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Resolve `Effective` by merging CLI flags, discovered config, and defaults.
///
/// `clock` is used as the evaluation time unless `--now` overrides it.
pub fn resolve_effective(cli: Overrides, clock: DateTime<Utc>) -> Result<Effective, ConfigError> {
    let start = PathBuf::from(cli.repo_root.as_deref().unwrap_or("."));
    let repo_root = detect_repo_root(&start);
    let config_path = find_config(&repo_root);
    let cfg = match config_path.as_deref() {
        Some(p) => load_config(p)?,
        None => AuditConfig::default(),
    };
    let rules_cfg = cfg.rules.unwrap_or_default();

    let input = cli
        .input
        .or(cfg.input)
        .map(|s| resolve_input(&repo_root, &s))
        .unwrap_or_else(|| PathBuf::from("-"));
    let output = cli.output.or(cfg.output).unwrap_or_default();
    let on_malformed = cli.on_malformed.or(cfg.on_malformed).unwrap_or_default();

    let rules = RuleConfig {
        version_policy: rules_cfg.version_policy.unwrap_or_default(),
        direction: cli.direction.or(rules_cfg.direction).unwrap_or_default(),
        secondary: cli.secondary.or(rules_cfg.secondary).unwrap_or_default(),
        max_age_days: cli.max_age_days.or(rules_cfg.max_age_days),
    };

    let exclude: BTreeSet<u64> = cfg.exclude.into_iter().chain(cli.exclude).collect();

    let now = match cli.now {
        Some(s) => DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|_| ConfigError::InvalidNow(s))?,
        None => clock,
    };

    Ok(Effective {
        repo_root,
        config_path,
        input,
        output,
        options: AuditOptions {
            rules,
            exclude,
            on_malformed,
        },
        now,
    })
}

/// Config-relative input paths resolve against the repo root; `-` is stdin.
fn resolve_input(root: &Path, s: &str) -> PathBuf {
    let p = PathBuf::from(s);
    if s == "-" || p.is_absolute() {
        p
    } else {
        root.join(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::io::Write;
    use tempfile::tempdir;

    fn clock() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 1, 0, 0, 0).unwrap()
    }

    fn at(root: &Path) -> Overrides {
        Overrides {
            repo_root: root.to_str().map(str::to_string),
            ..Overrides::default()
        }
    }

    #[test]
    fn test_detect_and_load_toml() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        let mut f = fs::File::create(root.join("labelaudit.toml")).unwrap();
        writeln!(
            f,
            "{}",
            r#"
input = "issues.json"
output = "ndjson"
exclude = [12, 34]
on_malformed = "skip"
[rules]
direction = "always"
secondary = "unanswered"
max_age_days = 365
    "#
        )
        .unwrap();

        // Resolve using explicit repo_root to avoid global CWD races
        let eff = resolve_effective(at(root), clock()).unwrap();
        assert_eq!(eff.input, root.join("issues.json"));
        assert_eq!(eff.output, OutputMode::Ndjson);
        assert_eq!(eff.options.on_malformed, MalformedPolicy::Skip);
        assert_eq!(eff.options.rules.direction, DirectionRequirement::Always);
        assert_eq!(eff.options.rules.secondary, SecondaryLabel::Unanswered);
        assert_eq!(eff.options.rules.max_age_days, Some(365));
        assert!(eff.options.exclude.contains(&34));
        assert_eq!(eff.now, clock());
    }

    #[test]
    fn test_load_yaml_and_defaults() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("labelaudit.yaml"), "exclude: [7]\n").unwrap();

        let eff = resolve_effective(at(root), clock()).unwrap();
        assert_eq!(eff.config_path, Some(root.join("labelaudit.yaml")));
        assert_eq!(eff.input, PathBuf::from("-"));
        assert_eq!(eff.output, OutputMode::Human);
        assert_eq!(eff.options.on_malformed, MalformedPolicy::Abort);
        assert_eq!(eff.options.rules, RuleConfig::default());
        assert_eq!(eff.options.exclude.len(), 1);
    }

    #[test]
    fn test_cli_precedence_and_exclude_union() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(
            root.join("labelaudit.toml"),
            "output = \"json\"\nexclude = [1]\n[rules]\ndirection = \"always\"\n",
        )
        .unwrap();

        let cli = Overrides {
            output: Some(OutputMode::Human),
            exclude: vec![2],
            direction: Some(DirectionRequirement::TriageExempt),
            now: Some("2025-01-01T00:00:00Z".into()),
            ..at(root)
        };
        let eff = resolve_effective(cli, clock()).unwrap();
        assert_eq!(eff.output, OutputMode::Human);
        assert_eq!(
            eff.options.rules.direction,
            DirectionRequirement::TriageExempt
        );
        assert_eq!(eff.options.exclude.iter().copied().collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(eff.now, Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_repo_root_walks_up_to_git() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join(".git")).unwrap();
        fs::create_dir_all(root.join("a/b")).unwrap();
        assert_eq!(detect_repo_root(&root.join("a/b")), root.to_path_buf());
    }

    #[test]
    fn test_invalid_config_and_now_are_errors() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("labelaudit.toml"), "[rules]\nsecondary = \"maybe\"\n").unwrap();
        assert!(matches!(
            resolve_effective(at(root), clock()),
            Err(ConfigError::Toml { .. })
        ));

        fs::remove_file(root.join("labelaudit.toml")).unwrap();
        fs::create_dir_all(root.join(".git")).unwrap();
        let cli = Overrides {
            now: Some("last tuesday".into()),
            ..at(root)
        };
        assert!(matches!(
            resolve_effective(cli, clock()),
            Err(ConfigError::InvalidNow(_))
        ));
    }
}
