//! Pocket messages.

use std::sync::Arc;

use crate::crypto::KeyCrypter;
use crate::error::{WalletError, WalletResult};
use crate::pocket::{BlockRef, WalletPocket};
use crate::proto;

use super::keychain::{HdKeyChainCodec, KeyChainCodec};
use super::master_key::encode_deterministic_key;

/// Converts pockets to and from their wire messages.
pub trait PocketCodec {
    /// Encodes a pocket.
    ///
    /// # Errors
    ///
    /// Returns an error if the pocket cannot be represented on the wire.
    fn encode_pocket(&self, pocket: &WalletPocket) -> WalletResult<proto::WalletPocket>;

    /// Decodes a pocket, using `crypter` to interpret encrypted key material.
    ///
    /// # Errors
    ///
    /// Returns an error if a required field is missing or the account key
    /// record is malformed.
    fn decode_pocket(
        &self,
        message: &proto::WalletPocket,
        crypter: Option<&Arc<dyn KeyCrypter>>,
    ) -> WalletResult<WalletPocket>;
}

/// Protobuf pocket codec, storing the account key with a key-chain codec.
#[derive(Debug, Clone, Default)]
pub struct PocketProtobufCodec<K = HdKeyChainCodec> {
    key_codec: K,
}

impl<K: KeyChainCodec> PocketProtobufCodec<K> {
    /// Creates a codec that stores account keys with `key_codec`.
    #[must_use]
    pub const fn new(key_codec: K) -> Self {
        Self { key_codec }
    }
}

impl<K: KeyChainCodec> PocketCodec for PocketProtobufCodec<K> {
    fn encode_pocket(&self, pocket: &WalletPocket) -> WalletResult<proto::WalletPocket> {
        let (height, hash) = match pocket.last_seen_block() {
            Some(block) => (Some(block.height), block.hash.clone()),
            None => (None, None),
        };
        Ok(proto::WalletPocket {
            network_identifier: Some(pocket.coin_id().to_string()),
            description: pocket.description().map(ToString::to_string),
            key: Some(encode_deterministic_key(&self.key_codec, pocket.account_key())?),
            last_seen_block_height: height,
            last_seen_block_hash: hash,
            transaction: pocket.transactions().to_vec(),
        })
    }

    fn decode_pocket(
        &self,
        message: &proto::WalletPocket,
        crypter: Option<&Arc<dyn KeyCrypter>>,
    ) -> WalletResult<WalletPocket> {
        let coin_id = message
            .network_identifier
            .as_deref()
            .ok_or_else(|| WalletError::decode_failure("pocket", "missing network identifier"))?;
        let key_record = message
            .key
            .as_ref()
            .ok_or_else(|| WalletError::decode_failure(coin_id, "missing account key"))?;
        let account_key = self
            .key_codec
            .decode_deterministic_key(key_record, None, crypter)?;

        let last_seen_block = match (message.last_seen_block_height, &message.last_seen_block_hash)
        {
            (Some(height), hash) => Some(BlockRef {
                height,
                hash: hash.clone(),
            }),
            (None, None) => None,
            (None, Some(_)) => {
                return Err(WalletError::decode_failure(coin_id, "block hash without height"))
            }
        };

        let mut pocket = WalletPocket::new(coin_id, account_key);
        if let Some(description) = &message.description {
            pocket = pocket.with_description(description.clone());
        }
        pocket.set_last_seen_block(last_seen_block);
        for raw in &message.transaction {
            pocket.add_transaction(raw.clone());
        }
        Ok(pocket)
    }
}

#[cfg(test)]
mod tests {
    use zeroize::Zeroizing;

    use super::*;
    use crate::keys::{ChildNumber, DeterministicKey, KeyMaterial};

    fn pocket() -> WalletPocket {
        let account = DeterministicKey::new(
            vec![ChildNumber::new(44, true), ChildNumber::new(2, true)],
            [0x42; 32],
            Some(vec![3u8; 33]),
            KeyMaterial::Plain(Zeroizing::new(vec![8u8; 32])),
        );
        let mut pocket = WalletPocket::new("litecoin.main", account).with_description("savings");
        pocket.set_last_seen_block(Some(BlockRef {
            height: 1_234_567,
            hash: Some(vec![0xab; 32]),
        }));
        pocket.add_transaction(vec![1, 2, 3]);
        pocket.add_transaction(vec![4, 5]);
        pocket
    }

    #[test]
    fn test_pocket_round_trip() {
        let codec = PocketProtobufCodec::<HdKeyChainCodec>::default();
        let original = pocket();
        let message = codec.encode_pocket(&original).unwrap();
        assert_eq!(message.network_identifier.as_deref(), Some("litecoin.main"));
        assert_eq!(message.transaction, vec![vec![1, 2, 3], vec![4, 5]]);

        let decoded = codec.decode_pocket(&message, None).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn test_missing_network_identifier() {
        let codec = PocketProtobufCodec::<HdKeyChainCodec>::default();
        let mut message = codec.encode_pocket(&pocket()).unwrap();
        message.network_identifier = None;
        assert!(matches!(
            codec.decode_pocket(&message, None),
            Err(WalletError::DecodeFailure { .. })
        ));
    }

    #[test]
    fn test_missing_account_key() {
        let codec = PocketProtobufCodec::<HdKeyChainCodec>::default();
        let mut message = codec.encode_pocket(&pocket()).unwrap();
        message.key = None;
        assert!(codec.decode_pocket(&message, None).is_err());
    }

    #[test]
    fn test_hash_without_height() {
        let codec = PocketProtobufCodec::<HdKeyChainCodec>::default();
        let mut message = codec.encode_pocket(&pocket()).unwrap();
        message.last_seen_block_height = None;
        assert!(codec.decode_pocket(&message, None).is_err());
    }
}
