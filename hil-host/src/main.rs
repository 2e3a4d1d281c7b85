// src/main.rs - Bench CLI for the loopback HIL agent

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use hil_host::client::{DEFAULT_BAUD, DEFAULT_TIMEOUT};
use hil_host::suite::{self, SuiteOptions};
use hil_host::{ClientError, HilClient};
use hil_protocol::Reply;
use tracing_subscriber::EnvFilter;

/// Drive and validate a loopback HIL agent over its serial console
#[derive(Parser, Debug)]
#[command(name = "hil-host", version)]
struct Cli {
    /// Serial port of the agent (e.g. /dev/ttyACM0 or COM3)
    #[arg(short, long)]
    port: PathBuf,

    /// Baud rate
    #[arg(short, long, default_value_t = DEFAULT_BAUD)]
    baud: u32,

    /// Response timeout in milliseconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT.as_millis() as u64)]
    timeout_ms: u64,

    /// Log every byte exchanged
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the loopback validation suite
    Suite {
        /// Run the wire-removed check (disconnect the loopback first)
        #[arg(long)]
        manual: bool,
    },
    /// Send one command character and print the response line
    ///
    /// Exits non-zero unless the device answers `OK`.
    Send {
        command: char,
    },
    /// Print uptime and command count
    Status,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<ExitCode, ClientError> {
    let timeout = Duration::from_millis(cli.timeout_ms);
    let mut client = HilClient::open(&cli.port, cli.baud, timeout)?;

    match cli.command {
        Commands::Suite { manual } => {
            let options = SuiteOptions {
                manual,
                ..SuiteOptions::default()
            };
            let report = suite::run(&mut client, &options);
            tracing::info!("{} passed, {} failed", report.passed(), report.failed());
            Ok(if report.all_passed() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Commands::Send { command } => {
            let line = client.send_command(command)?;
            println!("{}", line);
            Ok(if Reply::parse(&line).is_ok() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Commands::Status => {
            let (uptime, count) = client.status()?;
            println!("uptime={}ms cmd_count={}", uptime, count);
            Ok(ExitCode::SUCCESS)
        }
    }
}
