//! In-memory wallet.

use std::{fmt, sync::Arc};

use log::debug;
use secrecy::SecretString;

use crate::crypto::{EncryptionPolicy, KeyCrypter};
use crate::defaults::CURRENT_WALLET_VERSION;
use crate::error::{WalletError, WalletResult};
use crate::keys::DeterministicKey;
use crate::pocket::WalletPocket;

/// Additional state an application attaches to a wallet.
///
/// Extensions are registered on a wallet before it is read so that their
/// persisted data can be handed back to them.
pub trait WalletExtension: Send + Sync {
    /// Unique identifier, e.g. `org.example.contacts`.
    fn extension_id(&self) -> String;

    /// Whether a reader that does not know this extension must refuse the wallet.
    fn is_mandatory(&self) -> bool;

    /// Serializes the extension state.
    fn serialize(&self) -> Vec<u8>;

    /// Restores the extension state from persisted data.
    ///
    /// # Errors
    ///
    /// Returns an error if the data cannot be interpreted.
    fn deserialize(&mut self, data: &[u8]) -> WalletResult<()>;
}

/// A hierarchical deterministic wallet made of per-currency pockets.
pub struct Wallet {
    version: u32,
    master_key: DeterministicKey,
    crypter: Option<Arc<dyn KeyCrypter>>,
    pockets: Vec<WalletPocket>,
    extensions: Vec<Box<dyn WalletExtension>>,
}

impl Wallet {
    /// Creates an unencrypted wallet around its master key.
    #[must_use]
    pub fn new(master_key: DeterministicKey) -> Self {
        Self {
            version: CURRENT_WALLET_VERSION,
            master_key,
            crypter: None,
            pockets: Vec::new(),
            extensions: Vec::new(),
        }
    }

    /// Format version of the wallet.
    #[must_use]
    pub const fn version(&self) -> u32 {
        self.version
    }

    /// Overrides the format version.
    pub fn set_version(&mut self, version: u32) {
        self.version = version;
    }

    /// Root key of the hierarchy.
    #[must_use]
    pub const fn master_key(&self) -> &DeterministicKey {
        &self.master_key
    }

    /// Splits off the parts that survive reading another wallet into this one.
    pub(crate) fn into_parts(self) -> (u32, Vec<Box<dyn WalletExtension>>) {
        (self.version, self.extensions)
    }

    /// Crypter protecting the private keys, if any.
    #[must_use]
    pub const fn crypter(&self) -> Option<&Arc<dyn KeyCrypter>> {
        self.crypter.as_ref()
    }

    pub(crate) fn set_crypter(&mut self, crypter: Option<Arc<dyn KeyCrypter>>) {
        self.crypter = crypter;
    }

    /// Persistable description of the crypter.
    #[must_use]
    pub fn encryption_policy(&self) -> EncryptionPolicy {
        self.crypter
            .as_ref()
            .map_or(EncryptionPolicy::Unencrypted, |crypter| {
                crypter.encryption_policy()
            })
    }

    /// Whether the wallet has a crypter.
    #[must_use]
    pub const fn is_encrypted(&self) -> bool {
        self.crypter.is_some()
    }

    /// Appends a pocket; insertion order is preserved.
    pub fn add_pocket(&mut self, pocket: WalletPocket) {
        debug!("adding pocket for {}", pocket.coin_id());
        self.pockets.push(pocket);
    }

    /// Pockets in insertion order.
    #[must_use]
    pub fn pockets(&self) -> &[WalletPocket] {
        &self.pockets
    }

    /// First pocket for `coin_id`.
    #[must_use]
    pub fn pocket(&self, coin_id: &str) -> Option<&WalletPocket> {
        self.pockets.iter().find(|pocket| pocket.coin_id() == coin_id)
    }

    /// Registers an extension, replacing one with the same identifier.
    pub fn register_extension(&mut self, extension: Box<dyn WalletExtension>) {
        let id = extension.extension_id();
        if let Some(slot) = self
            .extensions
            .iter_mut()
            .find(|existing| existing.extension_id() == id)
        {
            *slot = extension;
        } else {
            self.extensions.push(extension);
        }
    }

    /// Registered extensions in registration order.
    #[must_use]
    pub fn extensions(&self) -> &[Box<dyn WalletExtension>] {
        &self.extensions
    }

    pub(crate) fn extension_mut(&mut self, id: &str) -> Option<&mut Box<dyn WalletExtension>> {
        self.extensions
            .iter_mut()
            .find(|extension| extension.extension_id() == id)
    }

    /// Encrypts every private key of the wallet under `password`.
    ///
    /// Either all keys are encrypted or the wallet is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`WalletError::Crypto`] if the wallet is already encrypted or
    /// encryption fails.
    pub fn encrypt(
        &mut self,
        crypter: Arc<dyn KeyCrypter>,
        password: &SecretString,
    ) -> WalletResult<()> {
        if self.crypter.is_some() {
            return Err(WalletError::Crypto("wallet is already encrypted".to_string()));
        }
        let key = crypter.derive_key(password)?;

        let master_key = self.master_key.encrypt(crypter.as_ref(), &key)?;
        let mut pockets = self.pockets.clone();
        for pocket in &mut pockets {
            pocket.encrypt_keys(crypter.as_ref(), &key)?;
        }

        self.master_key = master_key;
        self.pockets = pockets;
        self.crypter = Some(crypter);
        Ok(())
    }

    /// Decrypts every private key of the wallet and drops the crypter.
    ///
    /// # Errors
    ///
    /// Returns [`WalletError::Crypto`] if the wallet is not encrypted or the
    /// password is wrong.
    pub fn decrypt(&mut self, password: &SecretString) -> WalletResult<()> {
        let crypter = self
            .crypter
            .clone()
            .ok_or_else(|| WalletError::Crypto("wallet is not encrypted".to_string()))?;
        let key = crypter.derive_key(password)?;

        let master_key = self.master_key.decrypt(crypter.as_ref(), &key)?;
        let mut pockets = self.pockets.clone();
        for pocket in &mut pockets {
            pocket.decrypt_keys(crypter.as_ref(), &key)?;
        }

        self.master_key = master_key;
        self.pockets = pockets;
        self.crypter = None;
        Ok(())
    }

    /// Checks `password` against the encrypted master key.
    ///
    /// # Errors
    ///
    /// Returns [`WalletError::Crypto`] if the wallet is not encrypted or key
    /// stretching fails.
    pub fn check_password(&self, password: &SecretString) -> WalletResult<bool> {
        let crypter = self
            .crypter
            .as_ref()
            .ok_or_else(|| WalletError::Crypto("wallet is not encrypted".to_string()))?;
        let key = crypter.derive_key(password)?;
        Ok(self.master_key.decrypt(crypter.as_ref(), &key).is_ok())
    }
}

impl PartialEq for Wallet {
    fn eq(&self, other: &Self) -> bool {
        self.version == other.version
            && self.master_key == other.master_key
            && self.encryption_policy() == other.encryption_policy()
            && self.pockets == other.pockets
            && self.extensions.len() == other.extensions.len()
            && self
                .extensions
                .iter()
                .zip(&other.extensions)
                .all(|(a, b)| {
                    a.extension_id() == b.extension_id() && a.serialize() == b.serialize()
                })
    }
}

impl fmt::Debug for Wallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let extension_ids: Vec<String> = self
            .extensions
            .iter()
            .map(|extension| extension.extension_id())
            .collect();
        f.debug_struct("Wallet")
            .field("version", &self.version)
            .field("master_key", &self.master_key)
            .field("encryption_policy", &self.encryption_policy())
            .field("pockets", &self.pockets)
            .field("extensions", &extension_ids)
            .finish()
    }
}
