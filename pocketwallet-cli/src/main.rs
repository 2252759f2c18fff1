//! `pocketwallet`: developer CLI for wallet files.
//!
//! Environment:
//!
//!   `POCKETWALLET_PASSWORD`   wallet password (avoids passing it on the command line)
//!   `RUST_LOG`                log filter, defaults to `warn`

use clap::{Parser, Subcommand};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "pocketwallet", version, about = "Create and inspect pocketwallet files")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create a new wallet file from a seed.
    Create(commands::create::CreateArgs),
    /// Print the wallet message in protobuf text format.
    Show(commands::show::ShowArgs),
    /// Summarize a wallet file.
    Info(commands::info::InfoArgs),
    /// Verify a wallet password.
    Check(commands::check::CheckArgs),
}

fn main() -> eyre::Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .try_init();

    let cli = Cli::parse();
    let output = match cli.command {
        Command::Create(args) => commands::create::run(&args)?,
        Command::Show(args) => commands::show::run(&args)?,
        Command::Info(args) => commands::info::run(&args)?,
        Command::Check(args) => commands::check::run(&args)?,
    };
    print!("{output}");
    Ok(())
}
