use std::path::PathBuf;

use clap::Args;
use eyre::bail;
use secrecy::SecretString;

use super::load_wallet;

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Wallet file to verify.
    pub file: PathBuf,

    /// Password to check.
    #[arg(long, env = "POCKETWALLET_PASSWORD", hide_env_values = true)]
    pub password: String,
}

pub fn run(args: &CheckArgs) -> eyre::Result<String> {
    let wallet = load_wallet(&args.file)?;
    if !wallet.is_encrypted() {
        bail!("{} is not encrypted", args.file.display());
    }

    let password = SecretString::from(args.password.clone());
    if !wallet.check_password(&password)? {
        bail!("wrong password for {}", args.file.display());
    }
    Ok("password ok\n".to_string())
}
