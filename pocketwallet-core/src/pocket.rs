//! Per-currency sub-wallets.

use crate::crypto::{AesKey, KeyCrypter};
use crate::error::WalletResult;
use crate::keys::DeterministicKey;

/// Last block a pocket has processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockRef {
    /// Block height.
    pub height: u32,
    /// Block hash, if recorded.
    pub hash: Option<Vec<u8>>,
}

/// A per-currency sub-wallet holding its own account key and history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletPocket {
    coin_id: String,
    description: Option<String>,
    account_key: DeterministicKey,
    last_seen_block: Option<BlockRef>,
    transactions: Vec<Vec<u8>>,
}

impl WalletPocket {
    /// Creates an empty pocket for `coin_id` around its account key.
    #[must_use]
    pub fn new(coin_id: impl Into<String>, account_key: DeterministicKey) -> Self {
        Self {
            coin_id: coin_id.into(),
            description: None,
            account_key,
            last_seen_block: None,
            transactions: Vec::new(),
        }
    }

    /// Sets the user supplied label.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Identifier of the coin network.
    #[must_use]
    pub fn coin_id(&self) -> &str {
        &self.coin_id
    }

    /// User supplied label.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Account key the pocket derives its addresses from.
    #[must_use]
    pub const fn account_key(&self) -> &DeterministicKey {
        &self.account_key
    }

    /// Last block the pocket has processed.
    #[must_use]
    pub const fn last_seen_block(&self) -> Option<&BlockRef> {
        self.last_seen_block.as_ref()
    }

    /// Records the last processed block.
    pub fn set_last_seen_block(&mut self, block: Option<BlockRef>) {
        self.last_seen_block = block;
    }

    /// Raw transactions, oldest first.
    #[must_use]
    pub fn transactions(&self) -> &[Vec<u8>] {
        &self.transactions
    }

    /// Appends a raw transaction.
    pub fn add_transaction(&mut self, raw: Vec<u8>) {
        self.transactions.push(raw);
    }

    pub(crate) fn encrypt_keys(
        &mut self,
        crypter: &dyn KeyCrypter,
        key: &AesKey,
    ) -> WalletResult<()> {
        self.account_key = self.account_key.encrypt(crypter, key)?;
        Ok(())
    }

    pub(crate) fn decrypt_keys(
        &mut self,
        crypter: &dyn KeyCrypter,
        key: &AesKey,
    ) -> WalletResult<()> {
        self.account_key = self.account_key.decrypt(crypter, key)?;
        Ok(())
    }
}
