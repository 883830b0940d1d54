//! labelaudit CLI binary entry point.
//! Resolves configuration, runs the audit, and prints reports.

use chrono::Utc;
use clap::Parser;
use labelaudit::cli::{Cli, Commands};
use labelaudit::config::{self, Effective, Overrides};
use labelaudit::{audit, input, output, utils};
use std::io::IsTerminal;
use std::path::Path;

fn main() {
    let cli = Cli::parse();
    utils::init_logging(cli.verbose);
    match cli.cmd {
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::Rules { common } => {
            let eff = resolve_or_exit(common.into_overrides());
            print!("{}", output::render_rules(&eff.options.rules));
        }
        Commands::Audit {
            common,
            input: input_arg,
            output: output_arg,
            exclude,
            on_malformed,
            now,
            exit_zero,
        } => {
            let eff = resolve_or_exit(Overrides {
                input: input_arg,
                output: output_arg,
                exclude,
                on_malformed,
                now,
                ..common.into_overrides()
            });
            // Friendly note if no labelaudit config was found
            if eff.config_path.is_none() {
                eprintln!(
                    "{} No labelaudit.toml found; using defaults.",
                    utils::note_prefix()
                );
            }
            if eff.input == Path::new("-") && std::io::stdin().is_terminal() {
                eprintln!(
                    "{} Reading records from stdin (pass --input to read a file).",
                    utils::info_prefix()
                );
            }
            let records = input::read_records(&eff.input).unwrap_or_else(|e| exit_with(e));
            let result =
                audit::run_audit(records, &eff.options, eff.now).unwrap_or_else(|e| exit_with(e));
            if let Err(e) = output::print_audit(&result, eff.output) {
                exit_with(e);
            }
            if result.summary.reported > 0 && !exit_zero {
                std::process::exit(1);
            }
        }
    }
}

fn resolve_or_exit(overrides: Overrides) -> Effective {
    config::resolve_effective(overrides, Utc::now()).unwrap_or_else(|e| exit_with(e))
}

fn exit_with(err: impl std::fmt::Display) -> ! {
    eprintln!("{} {}", utils::error_prefix(), err);
    std::process::exit(2)
}
