//! # harvx
//!
//! **Tier 0 (CLI surface)**
//!
//! The `harvx` binary's command dispatcher. Parses `Cli`
//! (`harvx-config`), resolves the effective profile, wires a
//! `CancellationToken` to SIGINT, and runs the pipeline
//! (`harvx-core::run`) for the `generate` (default) and `preview`
//! subcommands. Every other subcommand in spec.md §4.13's hierarchy is
//! an external collaborator that consumes this same pipeline library
//! from its own crate; here they're parsed (so `--help` and shell
//! usage stay honest) and dispatched to `ErrorCode::NotImplemented`.

use std::io::Write;

use anyhow::Result;
use clap::Parser;
use harvx_config::{Cli, Commands, GenerateArgs, GlobalArgs};
use harvx_core::{HarvxError, PipelineOutcome};
use harvx_progress::Progress;
use harvx_report::ResponseEnvelope;
use harvx_walk::CancellationToken;

/// Parses `argv`, dispatches to the right subcommand, and returns the
/// process exit code. `main` only needs to call this and exit.
pub fn run() -> Result<i32> {
    let cli = Cli::parse_from(std::env::args_os());
    run_with(cli)
}

fn run_with(cli: Cli) -> Result<i32> {
    let cancel = install_cancellation_handler()?;

    match cli.command {
        None => run_generate(&cli.global, &cli.generate, &cancel, false),
        Some(Commands::Generate(args)) => run_generate(&cli.global, &args, &cancel, false),
        Some(Commands::Preview(args)) => run_generate(&cli.global, &args, &cancel, true),
        Some(Commands::Version) => {
            println!("harvx {}", env!("CARGO_PKG_VERSION"));
            Ok(0)
        }
        Some(other) => Ok(report_not_implemented(&cli.global, subcommand_name(&other))),
    }
}

/// Registers a `ctrlc` handler that flips the shared cancellation
/// token rather than terminating the process immediately, so every
/// in-flight stage gets the chance to honor it at its own checkpoint
/// (spec.md §5's 100ms bound).
///
/// `ctrlc::set_handler` can only succeed once per process; a second
/// registration (e.g. a second `run()` call in the same process, as
/// the test suite below does) returns an error that's safe to ignore —
/// the first handler is still installed and this invocation simply
/// gets its own, unwired token, which only matters for in-process
/// cancellation tests, not for the one-shot-process CLI.
fn install_cancellation_handler() -> Result<CancellationToken> {
    let cancel = CancellationToken::new();
    let for_handler = cancel.clone();
    let _ = ctrlc::set_handler(move || for_handler.cancel());
    Ok(cancel)
}

fn run_generate(
    global: &GlobalArgs,
    generate: &GenerateArgs,
    cancel: &CancellationToken,
    preview_only: bool,
) -> Result<i32> {
    let cwd = std::env::current_dir()?;
    let (mut config, config_warnings) = match harvx_config::build_effective_config(global, generate, &cwd) {
        Ok(v) => v,
        Err(e) => return Ok(emit_error(global.quiet, HarvxError::config_invalid(e), None)),
    };

    if preview_only {
        config.token_count_only = true;
        config.stdout = true;
    }

    let progress = Progress::new(!global.quiet && !config.json);
    progress.set_message("scanning repository...");

    let result = harvx_core::run(cancel, &config);
    progress.finish_and_clear();

    match result {
        Ok(outcome) => {
            for w in &config_warnings {
                eprintln!("warning: {w}");
            }
            for w in &outcome.warnings {
                eprintln!("warning: {w}");
            }
            if config.json || preview_only {
                print_json_summary(&outcome)?;
            } else if config.token_count_only {
                println!("{}", outcome.summary.total_tokens);
            } else if let Some(err) = &outcome.error {
                eprintln!("Error: {err}");
            } else if !config.quiet {
                print_human_summary(&outcome);
            }
            Ok(outcome.exit_code)
        }
        Err(err) => Ok(emit_error(global.quiet, err, None)),
    }
}

fn print_human_summary(outcome: &PipelineOutcome) {
    let s = &outcome.summary;
    eprintln!(
        "harvx: {} included, {} excluded, {} truncated, {} partial failure(s), {} tokens",
        s.total_included, s.total_excluded, s.total_truncated, s.partial_failures, s.total_tokens
    );
    if s.redaction.total_matches > 0 {
        eprintln!("harvx: {} secret(s) redacted", s.redaction.total_matches);
    }
}

fn print_json_summary(outcome: &PipelineOutcome) -> Result<()> {
    let data = serde_json::to_value(&outcome.summary)?;
    let envelope = ResponseEnvelope::success(data);
    let mut stdout = std::io::stdout();
    writeln!(stdout, "{}", envelope.to_json_pretty()?)?;
    Ok(())
}

fn emit_error(quiet: bool, err: HarvxError, envelope_for_json: Option<()>) -> i32 {
    let _ = envelope_for_json;
    if !quiet {
        eprintln!("Error: {err}");
    }
    err.exit_code()
}

fn report_not_implemented(global: &GlobalArgs, name: &str) -> i32 {
    let err = HarvxError::not_implemented(format!(
        "`{name}` is an external collaborator of the core pipeline and is not implemented here"
    ));
    emit_error(global.quiet, err, None)
}

fn subcommand_name(command: &Commands) -> &'static str {
    match command {
        Commands::Generate(_) => "generate",
        Commands::Preview(_) => "preview",
        Commands::Brief(_) => "brief",
        Commands::Slice(_) => "slice",
        Commands::ReviewSlice(_) => "review-slice",
        Commands::Workspace(_) => "workspace",
        Commands::Diff(_) => "diff",
        Commands::Verify(_) => "verify",
        Commands::Doctor(_) => "doctor",
        Commands::Mcp { .. } => "mcp serve",
        Commands::Profiles { .. } => "profiles",
        Commands::Config { .. } => "config",
        Commands::Version => "version",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn version_subcommand_returns_zero() {
        let cli = Cli::parse_from(["harvx", "version"]);
        assert_eq!(run_with(cli).unwrap(), 0);
    }

    #[test]
    fn external_collaborator_subcommand_reports_not_implemented() {
        let cli = Cli::parse_from(["harvx", "doctor"]);
        assert_eq!(run_with(cli).unwrap(), 1);
    }

    #[test]
    fn generate_on_empty_dir_writes_to_stdout_and_exits_zero() {
        let dir = tempfile::tempdir().unwrap();
        let cli = Cli::parse_from([
            "harvx",
            "generate",
            "--stdout",
            dir.path().to_str().unwrap(),
        ]);
        assert_eq!(run_with(cli).unwrap(), 0);
    }

    #[test]
    fn preview_prints_json_and_does_not_write_a_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.rs"), "fn a() {}\n").unwrap();
        let cli = Cli::parse_from(["harvx", "preview", dir.path().to_str().unwrap()]);
        assert_eq!(run_with(cli).unwrap(), 0);
    }

    #[test]
    fn nonexistent_root_reports_path_not_found_exit_code() {
        let cli = Cli::parse_from(["harvx", "generate", "--stdout", "/no/such/path/at/all"]);
        assert_eq!(run_with(cli).unwrap(), 1);
    }
}
