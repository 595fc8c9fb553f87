//! Command-line interface for opdecl.
//!
//! Commands return a process exit code instead of exiting, so the binary and
//! the tests drive them the same way.

use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

mod check;
mod common;
mod generate;

/// Crate roots that `OPDECL_LOG=<level>` applies to.
const LOG_TARGETS: &[&str] = &["opdecl", "opdecl_cli", "opdecl_core"];

#[derive(Parser)]
#[command(
    name = "opdecl",
    version,
    about = "Generate C++ binding declarations from an operation registry"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate declarations for every concrete operation
    Generate(generate::GenerateArgs),
    /// Check that a generated file is up to date
    Check(check::CheckArgs),
}

/// Parse `args` (including the program name) and run the selected command.
pub fn run<I, T>(args: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    match Cli::try_parse_from(args) {
        Ok(cli) => match cli.command {
            Some(Commands::Generate(args)) => generate::run(args),
            Some(Commands::Check(args)) => check::run(args),
            None => {
                let mut cmd = Cli::command();
                let _ = cmd.print_help();
                println!();
                0
            }
        },
        Err(e) => {
            let code = e.exit_code();
            let _ = e.print();
            code
        }
    }
}

/// Install the stderr log subscriber.
///
/// `OPDECL_LOG` controls the level: "trace", "debug", "info", "warn", "error"
/// for all opdecl crates, or a full filter spec like "opdecl_core=trace".
pub fn init_tracing() {
    let filter = log_filter(std::env::var("OPDECL_LOG").ok().as_deref());

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_filter(EnvFilter::new(filter));

    if tracing_subscriber::registry()
        .with(fmt_layer)
        .try_init()
        .is_err()
    {
        eprintln!("Warning: tracing subscriber already initialized");
    }
}

fn log_filter(value: Option<&str>) -> String {
    match value {
        Some(level) if is_plain_level(level) => LOG_TARGETS
            .iter()
            .map(|target| format!("{target}={level}"))
            .collect::<Vec<_>>()
            .join(","),
        Some(spec) => spec.to_string(),
        None => log_filter(Some("info")),
    }
}

fn is_plain_level(s: &str) -> bool {
    matches!(
        s.to_ascii_lowercase().as_str(),
        "trace" | "debug" | "info" | "warn" | "error"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_filter_plain_level() {
        assert_eq!(
            log_filter(Some("debug")),
            "opdecl=debug,opdecl_cli=debug,opdecl_core=debug"
        );
    }

    #[test]
    fn test_log_filter_default_is_info() {
        assert_eq!(
            log_filter(None),
            "opdecl=info,opdecl_cli=info,opdecl_core=info"
        );
    }

    #[test]
    fn test_log_filter_full_spec_passes_through() {
        assert_eq!(log_filter(Some("opdecl_core=trace")), "opdecl_core=trace");
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }
}
