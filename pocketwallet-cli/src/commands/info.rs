use std::fmt::Write as _;
use std::path::PathBuf;

use clap::Args;
use pocketwallet_core::{Wallet, WalletPocket};
use serde::Serialize;

use super::{load_wallet, policy_label};

#[derive(Debug, Args)]
pub struct InfoArgs {
    /// Wallet file to summarize.
    pub file: PathBuf,

    /// Print JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
pub struct WalletInfo {
    pub version: u32,
    pub encryption: String,
    pub master_key_path: String,
    pub pockets: Vec<PocketInfo>,
}

#[derive(Debug, Serialize)]
pub struct PocketInfo {
    pub coin_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub account_path: String,
    pub encrypted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_seen_height: Option<u32>,
    pub transactions: usize,
}

impl From<&WalletPocket> for PocketInfo {
    fn from(pocket: &WalletPocket) -> Self {
        Self {
            coin_id: pocket.coin_id().to_string(),
            description: pocket.description().map(ToString::to_string),
            account_path: pocket.account_key().path_string(),
            encrypted: pocket.account_key().is_encrypted(),
            last_seen_height: pocket.last_seen_block().map(|block| block.height),
            transactions: pocket.transactions().len(),
        }
    }
}

impl From<&Wallet> for WalletInfo {
    fn from(wallet: &Wallet) -> Self {
        Self {
            version: wallet.version(),
            encryption: policy_label(&wallet.encryption_policy()),
            master_key_path: wallet.master_key().path_string(),
            pockets: wallet.pockets().iter().map(PocketInfo::from).collect(),
        }
    }
}

impl WalletInfo {
    fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "version:    {}", self.version);
        let _ = writeln!(out, "encryption: {}", self.encryption);
        let _ = writeln!(out, "master key: {}", self.master_key_path);
        let _ = writeln!(out, "pockets:    {}", self.pockets.len());
        for pocket in &self.pockets {
            let _ = write!(out, "  {} {}", pocket.coin_id, pocket.account_path);
            if let Some(description) = &pocket.description {
                let _ = write!(out, " \"{description}\"");
            }
            if let Some(height) = pocket.last_seen_height {
                let _ = write!(out, " @{height}");
            }
            let _ = writeln!(out, " ({} tx)", pocket.transactions);
        }
        out
    }
}

pub fn run(args: &InfoArgs) -> eyre::Result<String> {
    let wallet = load_wallet(&args.file)?;
    let info = WalletInfo::from(&wallet);
    if args.json {
        Ok(format!("{}\n", serde_json::to_string_pretty(&info)?))
    } else {
        Ok(info.render())
    }
}

#[cfg(test)]
mod tests {
    use pocketwallet_core::{write_wallet, BlockRef, ChildNumber, DeterministicKey, KeyMaterial};

    use super::*;

    fn write_sample(path: &std::path::Path) {
        let master = DeterministicKey::master_from_seed(&[2u8; 32]).unwrap();
        let account = DeterministicKey::new(
            vec![ChildNumber::new(44, true), ChildNumber::new(3, true)],
            [1u8; 32],
            Some(vec![2u8; 33]),
            KeyMaterial::PublicOnly,
        );
        let mut pocket = WalletPocket::new("dogecoin.main", account).with_description("tips");
        pocket.set_last_seen_block(Some(BlockRef {
            height: 42,
            hash: None,
        }));
        let mut wallet = Wallet::new(master);
        wallet.add_pocket(pocket);
        write_wallet(&wallet, std::fs::File::create(path).unwrap()).unwrap();
    }

    #[test]
    fn test_info_text() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("wallet.pb");
        write_sample(&file);

        let text = run(&InfoArgs { file, json: false }).unwrap();
        assert!(text.contains("encryption: unencrypted\n"));
        assert!(text.contains("master key: m\n"));
        assert!(text.contains("  dogecoin.main m/44'/3' \"tips\" @42 (0 tx)\n"));
    }

    #[test]
    fn test_info_json() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("wallet.pb");
        write_sample(&file);

        let output = run(&InfoArgs { file, json: true }).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["version"], 1);
        assert_eq!(value["pockets"][0]["coin_id"], "dogecoin.main");
        assert_eq!(value["pockets"][0]["last_seen_height"], 42);
        assert_eq!(value["pockets"][0]["encrypted"], false);
    }
}
