//! Key record encoding, shared by the master key and pocket account keys.

use std::sync::Arc;

use zeroize::Zeroizing;

use crate::crypto::{EncryptedData, KeyCrypter};
use crate::defaults::CHAIN_CODE_SIZE;
use crate::error::{WalletError, WalletResult};
use crate::keys::{ChildNumber, DeterministicKey, KeyMaterial};
use crate::proto::{self, key::Type as KeyType};

/// Converts keys to and from their wire records.
pub trait KeyChainCodec {
    /// Encodes the key material of `key`.
    ///
    /// The returned record is partial: it carries the raw material and a
    /// key type, the hierarchy fields are filled in by the caller.
    fn encode_key(&self, key: &DeterministicKey) -> proto::Key;

    /// Reconstructs a deterministic key from a complete record.
    ///
    /// When `parent` is given the record must describe a direct child of it.
    /// `crypter` is the wallet crypter and decides whether encrypted or plain
    /// material is expected.
    ///
    /// # Errors
    ///
    /// Returns [`WalletError::MalformedKeyRecord`] if required fields are
    /// missing or the record is inconsistent with `parent` or `crypter`.
    fn decode_deterministic_key(
        &self,
        record: &proto::Key,
        parent: Option<&DeterministicKey>,
        crypter: Option<&Arc<dyn KeyCrypter>>,
    ) -> WalletResult<DeterministicKey>;
}

/// Key chain codec for hierarchical deterministic keys.
#[derive(Debug, Clone, Copy, Default)]
pub struct HdKeyChainCodec;

impl KeyChainCodec for HdKeyChainCodec {
    fn encode_key(&self, key: &DeterministicKey) -> proto::Key {
        let mut record = proto::Key {
            r#type: Some(KeyType::Original as i32),
            public_key: key.public_key().map(<[u8]>::to_vec),
            ..proto::Key::default()
        };
        match key.material() {
            KeyMaterial::Plain(secret) => record.secret_bytes = Some(secret.to_vec()),
            KeyMaterial::Encrypted(data) => {
                record.r#type = Some(KeyType::EncryptedScryptAes as i32);
                record.encrypted_data = Some(proto::EncryptedData {
                    initialisation_vector: Some(data.iv.clone()),
                    encrypted_private_key: Some(data.ciphertext.clone()),
                });
            }
            KeyMaterial::PublicOnly => {}
        }
        record
    }

    fn decode_deterministic_key(
        &self,
        record: &proto::Key,
        parent: Option<&DeterministicKey>,
        crypter: Option<&Arc<dyn KeyCrypter>>,
    ) -> WalletResult<DeterministicKey> {
        if record.r#type != Some(KeyType::DeterministicKey as i32) {
            return Err(malformed(format!(
                "expected a DETERMINISTIC_KEY record, got type {:?}",
                record.r#type
            )));
        }

        let det = record
            .deterministic_key
            .as_ref()
            .ok_or_else(|| malformed("missing deterministic key data"))?;
        let chain_code = parse_chain_code(det.chain_code.as_deref())?;
        let path: Vec<ChildNumber> = det
            .path
            .iter()
            .copied()
            .map(ChildNumber::from_u32)
            .collect();

        if let Some(parent) = parent {
            let is_child = path.len() == parent.depth() + 1 && path.starts_with(parent.path());
            if !is_child {
                return Err(malformed(format!(
                    "key at {} is not a child of {}",
                    render_path(&path),
                    parent.path_string()
                )));
            }
        }

        let material = decode_material(record, crypter.is_some())?;

        Ok(DeterministicKey::new(
            path,
            chain_code,
            record.public_key.clone(),
            material,
        ))
    }
}

fn decode_material(record: &proto::Key, encrypted_wallet: bool) -> WalletResult<KeyMaterial> {
    if let Some(data) = &record.encrypted_data {
        if !encrypted_wallet {
            return Err(malformed("encrypted key in a wallet without encryption"));
        }
        let iv = data
            .initialisation_vector
            .clone()
            .ok_or_else(|| malformed("encrypted key without initialisation vector"))?;
        let ciphertext = data
            .encrypted_private_key
            .clone()
            .ok_or_else(|| malformed("encrypted key without ciphertext"))?;
        return Ok(KeyMaterial::Encrypted(EncryptedData { iv, ciphertext }));
    }

    if let Some(secret) = &record.secret_bytes {
        if encrypted_wallet {
            return Err(malformed("unencrypted key in an encrypted wallet"));
        }
        return Ok(KeyMaterial::Plain(Zeroizing::new(secret.clone())));
    }

    if record.public_key.is_some() {
        return Ok(KeyMaterial::PublicOnly);
    }

    Err(malformed("missing key material"))
}

fn parse_chain_code(bytes: Option<&[u8]>) -> WalletResult<[u8; CHAIN_CODE_SIZE]> {
    let bytes = bytes.ok_or_else(|| malformed("missing chain code"))?;
    <[u8; CHAIN_CODE_SIZE]>::try_from(bytes).map_err(|_| {
        malformed(format!(
            "chain code length mismatch: expected {CHAIN_CODE_SIZE}, got {}",
            bytes.len()
        ))
    })
}

fn render_path(path: &[ChildNumber]) -> String {
    std::iter::once("m".to_string())
        .chain(path.iter().map(ToString::to_string))
        .collect::<Vec<_>>()
        .join("/")
}

fn malformed(reason: impl Into<String>) -> WalletError {
    WalletError::MalformedKeyRecord(reason.into())
}
