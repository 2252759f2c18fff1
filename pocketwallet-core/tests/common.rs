//! Common test utilities shared across integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use pocketwallet_core::{
    BlockRef, ChildNumber, DeterministicKey, KeyCrypter, ScryptCrypter, ScryptParameters, Wallet,
    WalletExtension, WalletPocket, WalletResult,
};

/// Deterministic seed so wallets compare equal across runs.
pub const SEED: [u8; 32] = [0x42; 32];

/// Scrypt crypter with a cost low enough for tests.
pub fn test_crypter() -> Arc<dyn KeyCrypter> {
    Arc::new(ScryptCrypter::new(ScryptParameters {
        salt: vec![0x01; 8],
        n: 16,
        r: 8,
        p: 1,
    }))
}

/// Builds a wallet with one pocket per coin identifier.
///
/// Account keys are keyed off the master key bytes so that two calls with the
/// same arguments return equal wallets.
pub fn wallet_with_pockets(coins: &[&str]) -> Wallet {
    let master = DeterministicKey::master_from_seed(&SEED).expect("master key");
    let mut wallet = Wallet::new(master);
    for (index, coin) in (0u32..).zip(coins) {
        let fill = u8::try_from(index + 1).expect("small pocket count");
        let account = DeterministicKey::master_from_seed(&[fill; 32]).expect("account key");
        let account = DeterministicKey::new(
            vec![ChildNumber::new(44, true), ChildNumber::new(index, true)],
            *account.chain_code(),
            None,
            account.material().clone(),
        );
        let mut pocket =
            WalletPocket::new(*coin, account).with_description(format!("{coin} pocket"));
        pocket.set_last_seen_block(Some(BlockRef {
            height: 500_000 + index,
            hash: Some(vec![fill; 32]),
        }));
        pocket.add_transaction(vec![0x01, 0x00, 0x00, 0x00]);
        wallet.add_pocket(pocket);
    }
    wallet
}

/// Extension storing an address book as raw bytes.
#[derive(Debug, Default)]
pub struct AddressBook {
    pub mandatory: bool,
    pub entries: Vec<u8>,
}

impl WalletExtension for AddressBook {
    fn extension_id(&self) -> String {
        "org.example.addressbook".to_string()
    }

    fn is_mandatory(&self) -> bool {
        self.mandatory
    }

    fn serialize(&self) -> Vec<u8> {
        self.entries.clone()
    }

    fn deserialize(&mut self, data: &[u8]) -> WalletResult<()> {
        self.entries = data.to_vec();
        Ok(())
    }
}
