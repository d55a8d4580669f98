//! Wheel CLI
//!
//! Runs picker scenarios headlessly and prints resolved value tables.

mod report;
mod runner;
mod scenario;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use wheel_core::{PickerConfig, WheelPicker};

use crate::scenario::Scenario;

#[derive(Parser, Debug)]
#[command(name = "wheel")]
#[command(about = "Headless wheel picker runner", version)]
struct Cli {
    /// Log at debug level (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Execute a JSON scenario and emit a report
    Run(RunArgs),
    /// Print the index to value table of a configured picker
    Values(ValuesArgs),
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Picker configuration (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Scenario file (JSON)
    #[arg(short, long)]
    scenario: PathBuf,

    /// Write the report to this relative path instead of stdout
    #[arg(short, long)]
    report: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ValuesArgs {
    /// Picker configuration (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Maximum number of rows to print
    #[arg(short, long, default_value_t = 100)]
    limit: u32,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Run(args) => cmd_run(args),
        Command::Values(args) => cmd_values(args).map(|()| ExitCode::SUCCESS),
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<PickerConfig> {
    let Some(path) = path else {
        tracing::debug!("no config given, using defaults");
        return Ok(PickerConfig::default());
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    PickerConfig::from_toml_str(&raw)
        .with_context(|| format!("invalid config {}", path.display()))
}

fn cmd_run(args: RunArgs) -> Result<ExitCode> {
    let config = load_config(args.config.as_deref())?;
    let scenario = Scenario::from_path(&args.scenario)?;
    tracing::info!(
        scenario = %args.scenario.display(),
        steps = scenario.steps.len(),
        "running scenario"
    );

    let outcome = runner::run_loaded_scenario(&config, &scenario)?;
    match &args.report {
        Some(path) => {
            outcome
                .report()
                .write_to_path(path)
                .with_context(|| format!("failed to write report {}", path.display()))?;
            eprintln!("report written to {}", path.display());
        }
        None => outcome.report().write_to_writer(&mut std::io::stdout().lock())?,
    }

    Ok(if outcome.is_failed() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn cmd_values(args: ValuesArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let picker = WheelPicker::from_config(&config)?;
    let mut out = std::io::stdout().lock();
    write_values(&picker, args.limit, &mut out)
}

fn write_values<W: Write>(picker: &WheelPicker, limit: u32, out: &mut W) -> Result<()> {
    let space = picker.space();
    let (min, max) = (space.min() as i64, space.max() as i64);
    let shown = space.len().min(limit as i64);

    writeln!(
        out,
        "range {min}..={max}{}  selected {} ({:?})",
        if space.wraps() { " wrapping" } else { "" },
        picker.current_index(),
        picker.current_value()
    )?;
    for index in (min..).take(shown as usize) {
        // `index` stays within the i32 range
        let index = index as wheel_core::Index;
        let marker = if space.is_valid(index) { ' ' } else { 'x' };
        writeln!(out, "{marker} {index:>6}  {}", picker.value_of(index))?;
    }
    if space.len() > shown {
        writeln!(out, "... {} more", space.len() - shown)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_cli_parses_run_arguments() {
        let cli = Cli::parse_from([
            "wheel",
            "run",
            "--config",
            "picker.toml",
            "--scenario",
            "s.json",
            "--verbose",
        ]);
        assert!(cli.verbose);
        let Command::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.config, Some(PathBuf::from("picker.toml")));
        assert_eq!(args.scenario, PathBuf::from("s.json"));
        assert_eq!(args.report, None);
    }

    #[test]
    fn test_value_table_marks_invalid_rows() {
        let config = PickerConfig::from_toml_str(
            "adapter = \"five_minutes\"\nmin_valid = 2\nmax_valid = 3\n",
        )
        .expect("config");
        let picker = WheelPicker::from_config(&config).expect("picker");

        let mut out = Vec::new();
        write_values(&picker, 4, &mut out).expect("write");
        let text = String::from_utf8(out).expect("utf8");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "range 0..=11  selected 2 (\"10\")",
                "x      0  00",
                "x      1  05",
                "       2  10",
                "       3  15",
                "... 8 more",
            ]
        );
    }
}
