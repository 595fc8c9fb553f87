use clap::Args;
use std::fs;
use std::io;
use std::path::PathBuf;
use tracing::debug;

use opdecl_core::{WriterSink, generate};

use crate::common::InputArgs;

/// Arguments of `opdecl generate`.
#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Write declarations to this file instead of stdout
    #[arg(long = "output", short = 'o', value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Run `opdecl generate`, returning the process exit code.
pub fn run(args: GenerateArgs) -> i32 {
    match run_inner(&args) {
        Ok(count) => {
            match &args.output {
                Some(path) => eprintln!("Wrote {count} declarations to {}", path.display()),
                None => eprintln!("Generated {count} declarations"),
            }
            0
        }
        Err(err) => {
            eprintln!("{err}");
            1
        }
    }
}

fn run_inner(args: &GenerateArgs) -> Result<usize, String> {
    match &args.output {
        // A file is only written once the whole run has succeeded.
        Some(path) => {
            let text = args.input.render()?;
            let count = text.lines().count();

            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .map_err(|err| format!("Failed to create output directory: {err}"))?;
            }
            fs::write(path, &text)
                .map_err(|err| format!("Failed to write {}: {err}", path.display()))?;

            debug!(
                output = %path.display(),
                bytes = text.len(),
                "Declarations written."
            );
            Ok(count)
        }
        None => {
            let (registry, config) = args.input.load()?;
            let mut sink = WriterSink::new(io::stdout().lock());
            let report = generate(&registry, &config, &mut sink).map_err(|err| err.to_string())?;
            sink.flush().map_err(|err| err.to_string())?;
            Ok(report.emitted.len())
        }
    }
}
