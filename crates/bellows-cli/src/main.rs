mod error;
mod render;

use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::error::ErrorCode;
use crate::render::{RenderArgs, ScheduleArgs, run_render, run_schedule};

#[derive(Parser)]
#[command(name = "bellows", version, about = "Printable fold patterns for camera bellows", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Log debug detail to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Draw the bellows net as PNG, SVG, DXF or a PNG data URI
    Render(RenderArgs),
    /// Print the derived fold schedule as JSON
    Schedule(ScheduleArgs),
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

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ErrorCode::Usage.into(),
            };
        }
    };
    init_tracing(cli.verbose);

    let result = match cli.command {
        Command::Render(args) => run_render(args),
        Command::Schedule(args) => run_schedule(args),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            err.code.into()
        }
    }
}
