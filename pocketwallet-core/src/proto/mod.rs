//! Wire schema for persisted wallets.
//!
//! The messages follow proto2 semantics: every singular field is optional on
//! the wire and presence is significant. Required-ness is enforced by the
//! serializer, not by the schema types, so that a missing field can be
//! reported with a precise error instead of a generic parse failure.
//!
//! ```text
//! message Wallet {
//!   enum EncryptionType {
//!     UNENCRYPTED = 1;
//!     ENCRYPTED_SCRYPT_AES = 2;
//!     ENCRYPTED_AES = 3;
//!   }
//!   optional uint32 version = 1;
//!   required Key master_key = 2;
//!   optional EncryptionType encryption_type = 3 [default = UNENCRYPTED];
//!   optional ScryptParameters encryption_parameters = 4;
//!   repeated WalletPocket pockets = 5;
//!   repeated Extension extension = 6;
//! }
//! ```

// Generated-style field attributes document the schema, not Rust identifiers
#![allow(clippy::doc_markdown)]

mod text;

pub use text::{escape_bytes, TextFormat, TextWriter};

/// Root wallet message.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Wallet {
    /// Format version. Absent in wallets written before versioning.
    #[prost(uint32, optional, tag = "1")]
    pub version: ::core::option::Option<u32>,
    /// Root deterministic key of the wallet.
    #[prost(message, optional, tag = "2")]
    pub master_key: ::core::option::Option<Key>,
    /// Encryption applied to private key material.
    #[prost(enumeration = "wallet::EncryptionType", optional, tag = "3")]
    pub encryption_type: ::core::option::Option<i32>,
    /// Key-stretch parameters, present iff `encryption_type` is scrypt.
    #[prost(message, optional, tag = "4")]
    pub encryption_parameters: ::core::option::Option<ScryptParameters>,
    /// Per-currency sub-wallets, in insertion order.
    #[prost(message, repeated, tag = "5")]
    pub pockets: ::prost::alloc::vec::Vec<WalletPocket>,
    /// Opaque extension payloads.
    #[prost(message, repeated, tag = "6")]
    pub extension: ::prost::alloc::vec::Vec<Extension>,
}

/// Nested types of [`Wallet`].
pub mod wallet {
    /// Encryption applied to the private keys of a wallet.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
    #[repr(i32)]
    pub enum EncryptionType {
        /// Keys are stored in the clear.
        Unencrypted = 1,
        /// Keys are encrypted with an AES key stretched from a password by scrypt.
        EncryptedScryptAes = 2,
        /// Keys are encrypted with an AES key derived from a PIN.
        EncryptedAes = 3,
    }

    impl EncryptionType {
        /// Name of the value as it appears in the schema.
        #[must_use]
        pub const fn as_str_name(&self) -> &'static str {
            match self {
                Self::Unencrypted => "UNENCRYPTED",
                Self::EncryptedScryptAes => "ENCRYPTED_SCRYPT_AES",
                Self::EncryptedAes => "ENCRYPTED_AES",
            }
        }
    }
}

/// A serialized key.
///
/// Plain keys carry `secret_bytes`, encrypted keys carry `encrypted_data`;
/// watch-only keys carry only `public_key`.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Key {
    /// Discriminator for the kind of key stored in this record.
    #[prost(enumeration = "key::Type", optional, tag = "1")]
    pub r#type: ::core::option::Option<i32>,
    /// Unencrypted private key bytes.
    #[prost(bytes = "vec", optional, tag = "2")]
    pub secret_bytes: ::core::option::Option<::prost::alloc::vec::Vec<u8>>,
    /// Public key bytes, if known.
    #[prost(bytes = "vec", optional, tag = "3")]
    pub public_key: ::core::option::Option<::prost::alloc::vec::Vec<u8>>,
    /// Encrypted private key bytes.
    #[prost(message, optional, tag = "6")]
    pub encrypted_data: ::core::option::Option<EncryptedData>,
    /// Hierarchy position of the key.
    #[prost(message, optional, tag = "7")]
    pub deterministic_key: ::core::option::Option<DeterministicKey>,
}

/// Nested types of [`Key`].
pub mod key {
    /// Kind of key stored in a [`Key`](super::Key) record.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
    #[repr(i32)]
    pub enum Type {
        /// Unencrypted simple key.
        Original = 1,
        /// Simple key encrypted under a crypter.
        EncryptedScryptAes = 2,
        /// Mnemonic seed material.
        DeterministicMnemonic = 3,
        /// Hierarchical deterministic key.
        DeterministicKey = 4,
    }

    impl Type {
        /// Name of the value as it appears in the schema.
        #[must_use]
        pub const fn as_str_name(&self) -> &'static str {
            match self {
                Self::Original => "ORIGINAL",
                Self::EncryptedScryptAes => "ENCRYPTED_SCRYPT_AES",
                Self::DeterministicMnemonic => "DETERMINISTIC_MNEMONIC",
                Self::DeterministicKey => "DETERMINISTIC_KEY",
            }
        }
    }
}

/// Position of a key in the deterministic hierarchy.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DeterministicKey {
    /// 32-byte chain code.
    #[prost(bytes = "vec", optional, tag = "1")]
    pub chain_code: ::core::option::Option<::prost::alloc::vec::Vec<u8>>,
    /// Child numbers from the root, hardened children have the high bit set.
    #[prost(uint32, repeated, packed = "false", tag = "2")]
    pub path: ::prost::alloc::vec::Vec<u32>,
}

/// Ciphertext of a private key.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct EncryptedData {
    /// Cipher IV.
    #[prost(bytes = "vec", optional, tag = "1")]
    pub initialisation_vector: ::core::option::Option<::prost::alloc::vec::Vec<u8>>,
    /// Ciphertext including the authentication tag.
    #[prost(bytes = "vec", optional, tag = "2")]
    pub encrypted_private_key: ::core::option::Option<::prost::alloc::vec::Vec<u8>>,
}

/// Scrypt key-stretch parameters.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ScryptParameters {
    /// Random salt.
    #[prost(bytes = "vec", optional, tag = "1")]
    pub salt: ::core::option::Option<::prost::alloc::vec::Vec<u8>>,
    /// CPU/memory cost factor.
    #[prost(uint64, optional, tag = "2")]
    pub n: ::core::option::Option<u64>,
    /// Block size.
    #[prost(uint32, optional, tag = "3")]
    pub r: ::core::option::Option<u32>,
    /// Parallelization factor.
    #[prost(uint32, optional, tag = "4")]
    pub p: ::core::option::Option<u32>,
}

/// A per-currency sub-wallet.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct WalletPocket {
    /// Identifier of the coin network, e.g. `bitcoin.main`.
    #[prost(string, optional, tag = "1")]
    pub network_identifier: ::core::option::Option<::prost::alloc::string::String>,
    /// User supplied label.
    #[prost(string, optional, tag = "2")]
    pub description: ::core::option::Option<::prost::alloc::string::String>,
    /// Account key the pocket derives its addresses from.
    #[prost(message, optional, tag = "3")]
    pub key: ::core::option::Option<Key>,
    /// Height of the last block the pocket has processed.
    #[prost(uint32, optional, tag = "4")]
    pub last_seen_block_height: ::core::option::Option<u32>,
    /// Hash of the last block the pocket has processed.
    #[prost(bytes = "vec", optional, tag = "5")]
    pub last_seen_block_hash: ::core::option::Option<::prost::alloc::vec::Vec<u8>>,
    /// Raw transactions, oldest first.
    #[prost(bytes = "vec", repeated, tag = "6")]
    pub transaction: ::prost::alloc::vec::Vec<::prost::alloc::vec::Vec<u8>>,
}

/// Data owned by a wallet extension.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Extension {
    /// Unique extension identifier.
    #[prost(string, optional, tag = "1")]
    pub id: ::core::option::Option<::prost::alloc::string::String>,
    /// Extension payload.
    #[prost(bytes = "vec", optional, tag = "2")]
    pub data: ::core::option::Option<::prost::alloc::vec::Vec<u8>>,
    /// A reader that does not know a mandatory extension must refuse the wallet.
    #[prost(bool, optional, tag = "3")]
    pub mandatory: ::core::option::Option<bool>,
}

#[cfg(test)]
mod tests {
    use prost::Message;

    use super::*;

    #[test]
    fn test_absent_fields_stay_absent() {
        let bytes = Wallet::default().encode_to_vec();
        assert!(bytes.is_empty());

        let decoded = Wallet::decode(bytes.as_slice()).unwrap();
        assert_eq!(decoded.version, None);
        assert_eq!(decoded.encryption_type, None);
        assert!(decoded.master_key.is_none());
    }

    #[test]
    fn test_path_is_not_packed() {
        let det = DeterministicKey {
            chain_code: None,
            path: vec![1, 2],
        };
        // Each element carries its own tag: (2 << 3) | varint
        assert_eq!(det.encode_to_vec(), vec![0x10, 0x01, 0x10, 0x02]);
    }

    #[test]
    fn test_unknown_encryption_type_is_preserved() {
        let wallet = Wallet {
            encryption_type: Some(42),
            ..Wallet::default()
        };
        let decoded = Wallet::decode(wallet.encode_to_vec().as_slice()).unwrap();
        assert_eq!(decoded.encryption_type, Some(42));
        assert!(wallet::EncryptionType::try_from(42).is_err());
    }
}
