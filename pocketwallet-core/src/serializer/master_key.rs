//! Deterministic key records: hierarchy fields on top of the key material.

use std::sync::Arc;

use crate::crypto::KeyCrypter;
use crate::error::{WalletError, WalletResult};
use crate::keys::DeterministicKey;
use crate::proto::{self, key::Type as KeyType};

use super::keychain::KeyChainCodec;

/// Encodes `key` as a complete deterministic key record.
///
/// The key-chain codec provides the material; the chain code and path are
/// copied verbatim and the discriminator is always `DETERMINISTIC_KEY`.
///
/// # Errors
///
/// Returns [`crate::WalletError::MalformedKeyRecord`] if the key has neither
/// private material nor a public key, since no reader could restore it.
pub fn encode_deterministic_key<K: KeyChainCodec + ?Sized>(
    codec: &K,
    key: &DeterministicKey,
) -> WalletResult<proto::Key> {
    let mut record = codec.encode_key(key);
    if record.secret_bytes.is_none()
        && record.encrypted_data.is_none()
        && record.public_key.is_none()
    {
        return Err(WalletError::MalformedKeyRecord(format!(
            "key {} has no material",
            key.path_string()
        )));
    }
    record.deterministic_key = Some(proto::DeterministicKey {
        chain_code: Some(key.chain_code().to_vec()),
        path: key.path().iter().map(|child| child.as_u32()).collect(),
    });
    record.r#type = Some(KeyType::DeterministicKey as i32);
    Ok(record)
}

/// Decodes the root key of a wallet.
///
/// # Errors
///
/// Returns [`crate::WalletError::MalformedKeyRecord`] if the record is
/// incomplete or inconsistent with `crypter`.
pub fn decode_master_key<K: KeyChainCodec + ?Sized>(
    codec: &K,
    record: &proto::Key,
    crypter: Option<&Arc<dyn KeyCrypter>>,
) -> WalletResult<DeterministicKey> {
    codec.decode_deterministic_key(record, None, crypter)
}
