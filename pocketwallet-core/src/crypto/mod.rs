//! Key crypters and encryption policies.
//!
//! A crypter turns a password (or PIN) into an AES key and encrypts private
//! key material with it. The wallet holds at most one crypter; the persisted
//! form of a crypter is its [`EncryptionPolicy`].

use std::{fmt, sync::Arc};

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use rand::{rngs::OsRng, RngCore};
use secrecy::SecretString;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::defaults::{
    AES_IV_SIZE, AES_KEY_SIZE, DEFAULT_SCRYPT_N, DEFAULT_SCRYPT_P, DEFAULT_SCRYPT_R,
    SCRYPT_SALT_SIZE,
};
use crate::error::{WalletError, WalletResult};

mod password;
mod pin;

pub use password::ScryptCrypter;
pub use pin::PinCrypter;

/// Scrypt key-stretch parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScryptParameters {
    /// Random salt.
    pub salt: Vec<u8>,
    /// CPU/memory cost factor, a power of two.
    pub n: u64,
    /// Block size.
    pub r: u32,
    /// Parallelization factor.
    pub p: u32,
}

impl ScryptParameters {
    /// Default cost parameters with the given salt.
    #[must_use]
    pub const fn with_salt(salt: Vec<u8>) -> Self {
        Self {
            salt,
            n: DEFAULT_SCRYPT_N,
            r: DEFAULT_SCRYPT_R,
            p: DEFAULT_SCRYPT_P,
        }
    }

    /// Default cost parameters with a fresh random salt.
    #[must_use]
    pub fn random() -> Self {
        let mut salt = vec![0u8; SCRYPT_SALT_SIZE];
        OsRng.fill_bytes(&mut salt);
        Self::with_salt(salt)
    }
}

/// How the private keys of a wallet are protected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncryptionPolicy {
    /// Keys are stored in the clear.
    Unencrypted,
    /// Keys are encrypted under a PIN-derived AES key.
    PinAes,
    /// Keys are encrypted under an AES key stretched from a password.
    ScryptAes(ScryptParameters),
    /// A crypter implemented outside this crate. It can protect keys in
    /// memory but the wallet format has no way to persist it.
    External {
        /// Name the crypter reports for diagnostics.
        name: String,
    },
}

impl EncryptionPolicy {
    /// Builds the crypter that implements this policy.
    ///
    /// # Errors
    ///
    /// Returns [`WalletError::UnsupportedPolicy`] for external policies,
    /// which cannot be reconstructed from their description alone.
    pub fn crypter(&self) -> WalletResult<Option<Arc<dyn KeyCrypter>>> {
        match self {
            Self::Unencrypted => Ok(None),
            Self::PinAes => Ok(Some(Arc::new(PinCrypter::new()))),
            Self::ScryptAes(params) => Ok(Some(Arc::new(ScryptCrypter::new(params.clone())))),
            Self::External { name } => Err(WalletError::UnsupportedPolicy(name.clone())),
        }
    }
}

/// AES-256 key derived by a crypter.
///
/// # Security
///
/// - The key is zeroized on drop.
/// - The key is redacted from `Debug` output.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct AesKey([u8; AES_KEY_SIZE]);

impl AesKey {
    /// Creates a key from raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; AES_KEY_SIZE]) -> Self {
        Self(bytes)
    }

    /// Returns the raw key bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; AES_KEY_SIZE] {
        &self.0
    }
}

impl fmt::Debug for AesKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AesKey").field("key", &"[REDACTED]").finish()
    }
}

/// Encrypted private key material.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedData {
    /// Cipher IV.
    pub iv: Vec<u8>,
    /// Ciphertext including the authentication tag.
    pub ciphertext: Vec<u8>,
}

/// Encrypts and decrypts private key material.
///
/// Implementations only differ in how they derive the AES key; the cipher
/// itself (AES-256-GCM) is shared through the provided methods.
pub trait KeyCrypter: Send + Sync + fmt::Debug {
    /// Describes this crypter in persistable terms.
    fn encryption_policy(&self) -> EncryptionPolicy;

    /// Derives the AES key from a password or PIN.
    ///
    /// # Errors
    ///
    /// Returns [`WalletError::Crypto`] if key stretching fails.
    fn derive_key(&self, password: &SecretString) -> WalletResult<AesKey>;

    /// Encrypts `plaintext` under `key` with a fresh random IV.
    ///
    /// # Errors
    ///
    /// Returns [`WalletError::Crypto`] if encryption fails.
    fn encrypt(&self, plaintext: &[u8], key: &AesKey) -> WalletResult<EncryptedData> {
        let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
            .map_err(|err| WalletError::Crypto(err.to_string()))?;
        let mut iv = vec![0u8; AES_IV_SIZE];
        OsRng.fill_bytes(&mut iv);
        let ciphertext = cipher
            .encrypt(Nonce::from_slice(&iv), plaintext)
            .map_err(|err| WalletError::Crypto(err.to_string()))?;
        Ok(EncryptedData { iv, ciphertext })
    }

    /// Decrypts `data` under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`WalletError::Crypto`] if the IV is malformed or
    /// authentication fails, which usually means a wrong password.
    fn decrypt(&self, data: &EncryptedData, key: &AesKey) -> WalletResult<Zeroizing<Vec<u8>>> {
        if data.iv.len() != AES_IV_SIZE {
            return Err(WalletError::Crypto(format!(
                "iv length mismatch: expected {AES_IV_SIZE}, got {}",
                data.iv.len()
            )));
        }
        let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
            .map_err(|err| WalletError::Crypto(err.to_string()))?;
        cipher
            .decrypt(Nonce::from_slice(&data.iv), data.ciphertext.as_slice())
            .map(Zeroizing::new)
            .map_err(|_| {
                WalletError::Crypto("decryption failed (is the password correct?)".to_string())
            })
    }
}
