#![allow(clippy::print_stderr)]

use anyhow::{Context, Result};
use clap::Parser;
use std::io::IsTerminal;
use std::time::Instant;

use quill_cli::args::CliArgs;
use quill_cli::driver;
use quill_cli::reporter::Reporter;

const EXIT_SUCCESS: i32 = 0;
const EXIT_DIAGNOSTICS_OUTPUTS_SKIPPED: i32 = 1;

fn main() -> Result<()> {
    // No-op unless QUILL_LOG or RUST_LOG is set.
    quill_cli::tracing_config::init_tracing();

    let args = CliArgs::parse();
    let cwd = std::env::current_dir().context("failed to resolve current directory")?;

    let start = Instant::now();
    let result = driver::compile(&args, &cwd)?;
    tracing::debug!(
        elapsed_ms = start.elapsed().as_millis() as u64,
        files = result.files_read.len(),
        emitted = result.emitted_files.len(),
        "compilation finished"
    );

    if !result.diagnostics.is_empty() {
        let pretty = args
            .pretty
            .unwrap_or_else(|| std::io::stderr().is_terminal());
        let reporter = Reporter::new(pretty);
        eprint!("{}", reporter.render(&result.diagnostics));
    }

    if result.has_errors() {
        std::process::exit(EXIT_DIAGNOSTICS_OUTPUTS_SKIPPED);
    }
    std::process::exit(EXIT_SUCCESS);
}
