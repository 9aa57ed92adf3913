//! `context-slice` CLI
//!
//! Hosts the `slice` subcommand, which is the only one the core pipeline
//! fully implements (spec §6). `record` and `prompt` are owned by external
//! collaborators (the build orchestrator and the prompt assembler,
//! respectively) and are stubbed here with a usage error so the binary's
//! surface matches the documented contract without pretending to implement
//! work this crate doesn't do.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use context_slice_ir::domain::ports::SystemClock;
use context_slice_ir::pipeline;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "context-slice", about = "Context slice IR pipeline")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Record a scenario by driving the build orchestrator and instrumented run.
    Record {
        scenario: String,
        #[arg(long = "run-script")]
        run_script: Option<String>,
        #[arg(long)]
        namespace: Option<String>,
        #[arg(long)]
        port: Option<u16>,
        #[arg(long)]
        args: Option<String>,
        #[arg(long = "no-transforms")]
        no_transforms: bool,
    },
    /// Run the IR pipeline against `.context-slice/` and write the slice output files.
    Slice {
        #[arg(long)]
        verbose: bool,
        #[arg(long, default_value = ".context-slice")]
        dir: PathBuf,
    },
    /// Assemble a prompt from the packed slice and a task string.
    Prompt {
        task: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Command::Slice { verbose, dir } => run_slice(verbose, &dir),
        Command::Record { .. } => usage_error(
            "`record` drives the build orchestrator and runtime instrumentation agent, \
             neither of which this binary implements; see the adapter and orchestrator \
             collaborators",
        ),
        Command::Prompt { .. } => usage_error(
            "`prompt` assembles packed slice output with a task string via an external \
             collaborator not implemented by this binary",
        ),
    }
}

fn run_slice(verbose: bool, dir: &PathBuf) -> ExitCode {
    init_tracing(verbose);

    let clock = SystemClock;
    match pipeline::run(dir, &clock) {
        Ok(warnings) => {
            if verbose {
                for warning in &warnings {
                    eprintln!("warning[{}]: {}", warning.category(), warning);
                }
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error[{}]: {}", err.category(), err);
            ExitCode::FAILURE
        }
    }
}

fn usage_error(message: &str) -> ExitCode {
    eprintln!("error: {message}");
    ExitCode::from(2)
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("context_slice_ir={default_level}")));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
