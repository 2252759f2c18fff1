use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use eyre::WrapErr;
use pocketwallet_core::{read_wallet, EncryptionPolicy, Wallet};

pub mod check;
pub mod create;
pub mod info;
pub mod show;

/// Opens `path` and decodes the wallet it contains.
pub fn load_wallet(path: &Path) -> eyre::Result<Wallet> {
    let file = File::open(path).wrap_err_with(|| format!("opening {}", path.display()))?;
    let wallet =
        read_wallet(BufReader::new(file)).wrap_err_with(|| format!("reading {}", path.display()))?;
    tracing::debug!(pockets = wallet.pockets().len(), "loaded {}", path.display());
    Ok(wallet)
}

/// Short human readable name of an encryption policy.
pub fn policy_label(policy: &EncryptionPolicy) -> String {
    match policy {
        EncryptionPolicy::Unencrypted => "unencrypted".to_string(),
        EncryptionPolicy::PinAes => "pin-aes".to_string(),
        EncryptionPolicy::ScryptAes(params) => format!(
            "scrypt-aes (n={}, r={}, p={})",
            params.n, params.r, params.p
        ),
        EncryptionPolicy::External { name } => format!("external ({name})"),
    }
}
