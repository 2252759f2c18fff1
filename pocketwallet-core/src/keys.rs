//! Hierarchical deterministic keys.
//!
//! Only the data a wallet needs to persist lives here: the position of a key
//! in the hierarchy (path and chain code) and its key material, which may be
//! plain, encrypted or absent. Child derivation belongs to the key chain.

use std::fmt;

use hmac::{Hmac, Mac};
use sha2::Sha512;
use zeroize::Zeroizing;

use crate::crypto::{AesKey, EncryptedData, KeyCrypter};
use crate::defaults::{CHAIN_CODE_SIZE, MASTER_HMAC_KEY, SEED_SIZE_RANGE};
use crate::error::{WalletError, WalletResult};

type HmacSha512 = Hmac<Sha512>;

/// High bit marking a hardened child number.
pub const HARDENED_BIT: u32 = 0x8000_0000;

/// One step of a derivation path.
///
/// The raw value folds the hardened flag into the high bit, exactly as it
/// is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChildNumber(u32);

impl ChildNumber {
    /// Creates a child number from an index and hardened flag.
    #[must_use]
    pub const fn new(index: u32, hardened: bool) -> Self {
        if hardened {
            Self(index | HARDENED_BIT)
        } else {
            Self(index & !HARDENED_BIT)
        }
    }

    /// Wraps a raw value, high bit included.
    #[must_use]
    pub const fn from_u32(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw value, high bit included.
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// Whether this is a hardened child.
    #[must_use]
    pub const fn is_hardened(self) -> bool {
        self.0 & HARDENED_BIT != 0
    }

    /// Index without the hardened bit.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0 & !HARDENED_BIT
    }
}

impl From<u32> for ChildNumber {
    fn from(raw: u32) -> Self {
        Self::from_u32(raw)
    }
}

impl fmt::Display for ChildNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_hardened() {
            write!(f, "{}'", self.index())
        } else {
            write!(f, "{}", self.index())
        }
    }
}

/// Private part of a key.
#[derive(Clone, PartialEq, Eq)]
pub enum KeyMaterial {
    /// Unencrypted private key bytes.
    Plain(Zeroizing<Vec<u8>>),
    /// Private key encrypted by the wallet crypter.
    Encrypted(EncryptedData),
    /// No private key, watch-only.
    PublicOnly,
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plain(_) => f.write_str("Plain([REDACTED])"),
            Self::Encrypted(data) => f.debug_tuple("Encrypted").field(data).finish(),
            Self::PublicOnly => f.write_str("PublicOnly"),
        }
    }
}

/// A key positioned in the deterministic hierarchy.
#[derive(Clone, PartialEq, Eq)]
pub struct DeterministicKey {
    path: Vec<ChildNumber>,
    chain_code: [u8; CHAIN_CODE_SIZE],
    public_key: Option<Vec<u8>>,
    material: KeyMaterial,
}

impl DeterministicKey {
    /// Assembles a key from its parts.
    #[must_use]
    pub const fn new(
        path: Vec<ChildNumber>,
        chain_code: [u8; CHAIN_CODE_SIZE],
        public_key: Option<Vec<u8>>,
        material: KeyMaterial,
    ) -> Self {
        Self {
            path,
            chain_code,
            public_key,
            material,
        }
    }

    /// Generates the BIP-32 master key for `seed`.
    ///
    /// # Errors
    ///
    /// Returns [`WalletError::Crypto`] if the seed length is outside 16..=64
    /// bytes or the seed yields an invalid key.
    pub fn master_from_seed(seed: &[u8]) -> WalletResult<Self> {
        if !SEED_SIZE_RANGE.contains(&seed.len()) {
            return Err(WalletError::Crypto(format!(
                "seed must be {}..={} bytes, got {}",
                SEED_SIZE_RANGE.start(),
                SEED_SIZE_RANGE.end(),
                seed.len()
            )));
        }

        let mut mac = HmacSha512::new_from_slice(MASTER_HMAC_KEY)
            .map_err(|err| WalletError::Crypto(err.to_string()))?;
        mac.update(seed);
        let output = Zeroizing::new(mac.finalize().into_bytes().to_vec());

        let (secret, chain) = output.split_at(32);
        if secret.iter().all(|&b| b == 0) {
            return Err(WalletError::Crypto("seed yields a zero master key".to_string()));
        }

        let mut chain_code = [0u8; CHAIN_CODE_SIZE];
        chain_code.copy_from_slice(chain);

        Ok(Self::new(
            Vec::new(),
            chain_code,
            None,
            KeyMaterial::Plain(Zeroizing::new(secret.to_vec())),
        ))
    }

    /// Derivation path from the root.
    #[must_use]
    pub fn path(&self) -> &[ChildNumber] {
        &self.path
    }

    /// Chain code used to derive children.
    #[must_use]
    pub const fn chain_code(&self) -> &[u8; CHAIN_CODE_SIZE] {
        &self.chain_code
    }

    /// Public key bytes, if known.
    #[must_use]
    pub fn public_key(&self) -> Option<&[u8]> {
        self.public_key.as_deref()
    }

    /// Private key material.
    #[must_use]
    pub const fn material(&self) -> &KeyMaterial {
        &self.material
    }

    /// Plain private key bytes, if the key is neither encrypted nor watch-only.
    #[must_use]
    pub fn secret_bytes(&self) -> Option<&[u8]> {
        match &self.material {
            KeyMaterial::Plain(secret) => Some(secret.as_slice()),
            _ => None,
        }
    }

    /// Whether the private key is encrypted.
    #[must_use]
    pub const fn is_encrypted(&self) -> bool {
        matches!(self.material, KeyMaterial::Encrypted(_))
    }

    /// Number of steps from the root.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.path.len()
    }

    /// Renders the path as `m/44'/0'/0'`.
    #[must_use]
    pub fn path_string(&self) -> String {
        let mut out = String::from("m");
        for child in &self.path {
            out.push('/');
            out.push_str(&child.to_string());
        }
        out
    }

    /// Returns a copy of this key with the private key encrypted.
    ///
    /// Watch-only keys are returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`WalletError::Crypto`] if the key is already encrypted or
    /// encryption fails.
    pub fn encrypt(&self, crypter: &dyn KeyCrypter, key: &AesKey) -> WalletResult<Self> {
        let material = match &self.material {
            KeyMaterial::Plain(secret) => KeyMaterial::Encrypted(crypter.encrypt(secret, key)?),
            KeyMaterial::Encrypted(_) => {
                return Err(WalletError::Crypto(format!(
                    "key {} is already encrypted",
                    self.path_string()
                )))
            }
            KeyMaterial::PublicOnly => KeyMaterial::PublicOnly,
        };
        Ok(Self {
            material,
            ..self.clone()
        })
    }

    /// Returns a copy of this key with the private key decrypted.
    ///
    /// Watch-only keys are returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`WalletError::Crypto`] if the key is not encrypted or the
    /// AES key is wrong.
    pub fn decrypt(&self, crypter: &dyn KeyCrypter, key: &AesKey) -> WalletResult<Self> {
        let material = match &self.material {
            KeyMaterial::Encrypted(data) => KeyMaterial::Plain(crypter.decrypt(data, key)?),
            KeyMaterial::Plain(_) => {
                return Err(WalletError::Crypto(format!(
                    "key {} is not encrypted",
                    self.path_string()
                )))
            }
            KeyMaterial::PublicOnly => KeyMaterial::PublicOnly,
        };
        Ok(Self {
            material,
            ..self.clone()
        })
    }
}

impl fmt::Debug for DeterministicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeterministicKey")
            .field("path", &self.path_string())
            .field("chain_code", &hex::encode(self.chain_code))
            .field("public_key", &self.public_key.as_ref().map(hex::encode))
            .field("material", &self.material)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use secrecy::SecretString;

    use super::*;
    use crate::crypto::PinCrypter;

    #[test]
    fn test_child_number_hardened_bit() {
        let hardened = ChildNumber::new(44, true);
        assert!(hardened.is_hardened());
        assert_eq!(hardened.index(), 44);
        assert_eq!(hardened.as_u32(), 0x8000_002c);
        assert_eq!(hardened.to_string(), "44'");

        let normal = ChildNumber::from(5u32);
        assert!(!normal.is_hardened());
        assert_eq!(normal.to_string(), "5");
    }

    #[test]
    fn test_path_string() {
        let key = DeterministicKey::new(
            vec![ChildNumber::new(44, true), ChildNumber::new(0, true), ChildNumber::from(7u32)],
            [0u8; CHAIN_CODE_SIZE],
            None,
            KeyMaterial::PublicOnly,
        );
        assert_eq!(key.path_string(), "m/44'/0'/7");
        assert_eq!(key.depth(), 3);
    }

    #[test]
    fn test_master_from_seed_bip32_vector() {
        // BIP-32 test vector 1
        let seed = hex::decode("000102030405060708090a0b0c0d0e0f").unwrap();
        let key = DeterministicKey::master_from_seed(&seed).unwrap();

        assert_eq!(
            hex::encode(key.secret_bytes().unwrap()),
            "e8f32e723decf4051aefac8e2c93c9c5b214313817cdb01a1494b917c8436b35"
        );
        assert_eq!(
            hex::encode(key.chain_code()),
            "873dff81c02f525623fd1fe5167eac3a55a049de3d314bb42ee227ffed37d508"
        );
        assert!(key.path().is_empty());
    }

    #[test]
    fn test_master_from_seed_rejects_short_seed() {
        assert!(matches!(
            DeterministicKey::master_from_seed(&[1u8; 8]),
            Err(WalletError::Crypto(_))
        ));
    }

    #[test]
    fn test_encrypt_decrypt_keeps_position() {
        let key = DeterministicKey::master_from_seed(&[3u8; 32]).unwrap();
        let crypter = PinCrypter::new();
        let aes = crypter.derive_key(&SecretString::from("4321")).unwrap();

        let encrypted = key.encrypt(&crypter, &aes).unwrap();
        assert!(encrypted.is_encrypted());
        assert!(encrypted.secret_bytes().is_none());
        assert_eq!(encrypted.chain_code(), key.chain_code());
        assert!(encrypted.encrypt(&crypter, &aes).is_err());

        let decrypted = encrypted.decrypt(&crypter, &aes).unwrap();
        assert_eq!(decrypted, key);
    }

    #[test]
    fn test_debug_redacts_secret() {
        let key = DeterministicKey::master_from_seed(&[3u8; 32]).unwrap();
        let rendered = format!("{key:?}");
        assert!(rendered.contains("Plain([REDACTED])"));
        assert!(!rendered.contains(&hex::encode(key.secret_bytes().unwrap())));
    }
}
