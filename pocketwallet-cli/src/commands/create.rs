use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use eyre::{bail, WrapErr};
use pocketwallet_core::{write_wallet, DeterministicKey, ScryptCrypter, Wallet};
use rand::{rngs::OsRng, RngCore};
use secrecy::SecretString;

/// Length of generated seeds.
const GENERATED_SEED_SIZE: usize = 32;

#[derive(Debug, Args)]
pub struct CreateArgs {
    /// Wallet file to write.
    #[arg(long)]
    pub out: PathBuf,

    /// Hex encoded seed (16 to 64 bytes). A random seed is generated when omitted.
    #[arg(long)]
    pub seed: Option<String>,

    /// Encrypt the private keys with this password.
    #[arg(long, env = "POCKETWALLET_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Overwrite an existing file.
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: &CreateArgs) -> eyre::Result<String> {
    if args.out.exists() && !args.force {
        bail!("{} already exists, pass --force to overwrite", args.out.display());
    }

    let (seed, generated) = match &args.seed {
        Some(seed) => (hex::decode(seed).wrap_err("seed is not valid hex")?, false),
        None => {
            let mut seed = vec![0u8; GENERATED_SEED_SIZE];
            OsRng.fill_bytes(&mut seed);
            (seed, true)
        }
    };

    let mut wallet = Wallet::new(DeterministicKey::master_from_seed(&seed)?);
    if let Some(password) = &args.password {
        tracing::info!("encrypting wallet with scrypt");
        wallet.encrypt(
            Arc::new(ScryptCrypter::generate()),
            &SecretString::from(password.clone()),
        )?;
    }

    let file = File::create(&args.out)
        .wrap_err_with(|| format!("creating {}", args.out.display()))?;
    write_wallet(&wallet, BufWriter::new(file))?;
    tracing::info!("wrote {}", args.out.display());

    let mut output = format!(
        "created {} ({})\n",
        args.out.display(),
        if wallet.is_encrypted() { "encrypted" } else { "unencrypted" }
    );
    if generated {
        output.push_str(&format!("seed: {}\n", hex::encode(&seed)));
    }
    Ok(output)
}
