use clap::Args;
use similar::{ChangeTag, TextDiff};
use std::fmt::Write as _;
use std::fs;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::common::InputArgs;

/// Arguments of `opdecl check`.
#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Previously generated declarations to compare against
    #[arg(long = "against", short = 'a', value_name = "FILE")]
    pub against: PathBuf,
}

/// Run `opdecl check`, returning the process exit code.
///
/// Exits 0 when the file matches a fresh generation and 1 when it is stale or
/// anything fails.
pub fn run(args: CheckArgs) -> i32 {
    match run_inner(&args) {
        Ok(None) => {
            eprintln!("{} is up to date", args.against.display());
            0
        }
        Ok(Some(diff)) => {
            print!("{diff}");
            eprintln!(
                "{} is stale, regenerate it with `opdecl generate`",
                args.against.display()
            );
            1
        }
        Err(err) => {
            eprintln!("{err}");
            1
        }
    }
}

fn run_inner(args: &CheckArgs) -> Result<Option<String>, String> {
    let fresh = args.input.render()?;
    let existing = fs::read_to_string(&args.against)
        .map_err(|err| format!("Failed to read {}: {err}", args.against.display()))?;

    debug!(
        against = %args.against.display(),
        fresh_len = fresh.len(),
        existing_len = existing.len(),
        "Comparing declarations."
    );

    let color = io::stdout().is_terminal();
    Ok(render_diff(&args.against, &existing, &fresh, color))
}

/// ANSI escapes for the diff, or empty strings for plain output.
#[derive(Debug, Clone, Copy)]
struct Palette {
    header: &'static str,
    removed: &'static str,
    added: &'static str,
    reset: &'static str,
}

impl Palette {
    const COLOR: Self = Self {
        header: "\x1b[1m",
        removed: "\x1b[31m",
        added: "\x1b[32m",
        reset: "\x1b[0m",
    };

    const PLAIN: Self = Self {
        header: "",
        removed: "",
        added: "",
        reset: "",
    };
}

/// Unified diff from `existing` to `fresh`, or `None` when equal.
///
/// Colour codes are only added when `color` is set, so CI logs stay plain.
pub fn render_diff(path: &Path, existing: &str, fresh: &str, color: bool) -> Option<String> {
    if existing == fresh {
        return None;
    }

    let palette = if color { Palette::COLOR } else { Palette::PLAIN };
    let diff = TextDiff::from_lines(existing, fresh);
    let mut out = String::new();

    for (marker, label) in [("---", "current"), ("+++", "generated")] {
        let _ = writeln!(
            out,
            "{}{marker} {} ({label}){}",
            palette.header,
            path.display(),
            palette.reset
        );
    }

    let mut unified = diff.unified_diff();
    unified.context_radius(3);
    for hunk in unified.iter_hunks() {
        let _ = writeln!(out, "{}{}{}", palette.header, hunk.header(), palette.reset);
        for change in hunk.iter_changes() {
            let (sign, start, end) = match change.tag() {
                ChangeTag::Delete => ('-', palette.removed, palette.reset),
                ChangeTag::Insert => ('+', palette.added, palette.reset),
                ChangeTag::Equal => (' ', "", ""),
            };
            let line = change.value().strip_suffix('\n').unwrap_or(change.value());
            let _ = writeln!(out, "{start}{sign}{line}{end}");
        }
    }

    Some(out)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_equal_text_has_no_diff() {
        let text = "void invert( VOption *options = 0 );\n";
        assert!(render_diff(Path::new("ops.h"), text, text, true).is_none());
    }

    #[test]
    fn test_diff_marks_changed_lines() {
        let existing = "void abs( VOption *options = 0 );\nvoid invert( VOption *options = 0 );\n";
        let fresh = "void abs( VOption *options = 0 );\nVImage invert( VOption *options = 0 );\n";

        let diff = render_diff(Path::new("ops.h"), existing, fresh, false).unwrap();
        assert!(diff.contains("--- ops.h (current)"));
        assert!(diff.contains("+++ ops.h (generated)"));
        assert!(diff.contains("-void invert( VOption *options = 0 );"));
        assert!(diff.contains("+VImage invert( VOption *options = 0 );"));
        assert!(diff.contains(" void abs( VOption *options = 0 );"));
        assert!(diff.contains("@@ -1,2 +1,2 @@"));
    }

    #[test]
    fn test_plain_diff_has_no_escape_codes() {
        let diff = render_diff(Path::new("ops.h"), "a();\n", "b();\n", false).unwrap();
        assert!(!diff.contains('\x1b'));
        assert_eq!(
            diff,
            "--- ops.h (current)\n+++ ops.h (generated)\n@@ -1 +1 @@\n-a();\n+b();\n"
        );
    }

    #[test]
    fn test_colored_diff_wraps_changes() {
        let diff = render_diff(Path::new("ops.h"), "a();\n", "b();\n", true).unwrap();
        assert!(diff.contains("\x1b[1m--- ops.h (current)\x1b[0m\n"));
        assert!(diff.contains("\x1b[31m-a();\x1b[0m\n"));
        assert!(diff.contains("\x1b[32m+b();\x1b[0m\n"));
    }

    #[test]
    fn test_missing_trailing_newline_is_a_difference() {
        let diff = render_diff(Path::new("ops.h"), "a();", "a();\n", false).unwrap();
        assert!(diff.contains("-a();"));
        assert!(diff.contains("+a();"));
    }
}
