use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use clap::Args;
use eyre::WrapErr;
use pocketwallet_core::{parse_to_proto, proto::TextFormat};

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Wallet file to print.
    pub file: PathBuf,
}

/// Renders the raw message. Nothing is validated beyond the wire format, so
/// wallets this version cannot load are still shown.
pub fn run(args: &ShowArgs) -> eyre::Result<String> {
    let file = File::open(&args.file)
        .wrap_err_with(|| format!("opening {}", args.file.display()))?;
    let message = parse_to_proto(BufReader::new(file))?;
    Ok(message.to_text())
}
