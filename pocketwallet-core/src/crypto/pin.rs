//! PIN crypter.
//!
//! PIN-derived keys carry no persisted parameters, so the wallet only records
//! that a PIN is in use.

use hkdf::Hkdf;
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;

use super::{AesKey, EncryptionPolicy, KeyCrypter};
use crate::defaults::{AES_KEY_SIZE, PIN_KEY_INFO};
use crate::error::{WalletError, WalletResult};

/// Derives an AES key from a PIN with HKDF-SHA256.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PinCrypter;

impl PinCrypter {
    /// Creates a PIN crypter.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl KeyCrypter for PinCrypter {
    fn encryption_policy(&self) -> EncryptionPolicy {
        EncryptionPolicy::PinAes
    }

    fn derive_key(&self, password: &SecretString) -> WalletResult<AesKey> {
        let pin = password.expose_secret();
        if pin.is_empty() {
            return Err(WalletError::Crypto("empty PIN".to_string()));
        }
        let hk = Hkdf::<Sha256>::new(None, pin.as_bytes());
        let mut key = [0u8; AES_KEY_SIZE];
        hk.expand(PIN_KEY_INFO, &mut key)
            .map_err(|err| WalletError::Crypto(err.to_string()))?;
        Ok(AesKey::from_bytes(key))
    }
}
