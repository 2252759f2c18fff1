//! Wallet persistence in protocol buffer format.
//!
//! [`WalletSerializer`] maps a [`Wallet`] onto the wire [`proto::Wallet`]
//! message and back. Key material and pockets are handled by pluggable
//! codecs ([`KeyChainCodec`], [`PocketCodec`]); the serializer itself only
//! deals with the version gate, the encryption policy and the order in which
//! the parts of a wallet are assembled.
//!
//! Reading is all or nothing: any failure aborts the call and no partially
//! decoded wallet is returned.

use std::io::{Read, Write};
use std::sync::Arc;

use log::{debug, error, warn};
use prost::Message;

use crate::crypto::KeyCrypter;
use crate::defaults::MAX_SUPPORTED_WALLET_VERSION;
use crate::error::{WalletError, WalletResult};
use crate::pocket::WalletPocket;
use crate::proto::{self, TextFormat};
use crate::wallet::Wallet;

mod keychain;
mod master_key;
mod pocket;
mod policy;

pub use keychain::{HdKeyChainCodec, KeyChainCodec};
pub use master_key::{decode_master_key, encode_deterministic_key};
pub use pocket::{PocketCodec, PocketProtobufCodec};
pub use policy::{decode_policy, encode_policy};

/// Reads and writes wallets.
#[derive(Debug, Clone, Default)]
pub struct WalletSerializer<K = HdKeyChainCodec, P = PocketProtobufCodec<K>> {
    key_codec: K,
    pocket_codec: P,
}

impl<K: KeyChainCodec, P: PocketCodec> WalletSerializer<K, P> {
    /// Creates a serializer with custom key and pocket codecs.
    #[must_use]
    pub const fn new(key_codec: K, pocket_codec: P) -> Self {
        Self {
            key_codec,
            pocket_codec,
        }
    }

    /// Converts a wallet into its wire message.
    ///
    /// # Errors
    ///
    /// - [`WalletError::UnsupportedPolicy`] if the wallet crypter cannot be
    ///   persisted.
    /// - [`WalletError::MalformedKeyRecord`] if the master key has no
    ///   material at all.
    /// - Any error returned by the pocket codec.
    pub fn to_proto(&self, wallet: &Wallet) -> WalletResult<proto::Wallet> {
        let master_key = encode_deterministic_key(&self.key_codec, wallet.master_key())?;

        let (encryption_type, encryption_parameters) = encode_policy(&wallet.encryption_policy())
            .inspect_err(|err| error!("refusing to serialize wallet: {err}"))?;

        let pockets = wallet
            .pockets()
            .iter()
            .map(|pocket| self.pocket_codec.encode_pocket(pocket))
            .collect::<WalletResult<Vec<_>>>()?;

        let extension = wallet
            .extensions()
            .iter()
            .map(|extension| proto::Extension {
                id: Some(extension.extension_id()),
                data: Some(extension.serialize()),
                mandatory: Some(extension.is_mandatory()),
            })
            .collect();

        debug!(
            "encoded wallet v{} with {} pockets, encryption {}",
            wallet.version(),
            pockets.len(),
            encryption_type.as_str_name()
        );

        Ok(proto::Wallet {
            version: Some(wallet.version()),
            master_key: Some(master_key),
            encryption_type: Some(encryption_type as i32),
            encryption_parameters,
            pockets,
            extension,
        })
    }

    /// Writes the wallet to `writer` in binary form.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Self::to_proto`], or [`WalletError::Io`] if
    /// the writer fails.
    pub fn write_wallet(&self, wallet: &Wallet, mut writer: impl Write) -> WalletResult<()> {
        let bytes = self.wallet_to_bytes(wallet)?;
        writer.write_all(&bytes)?;
        writer.flush()?;
        Ok(())
    }

    /// Serializes the wallet to bytes.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Self::to_proto`].
    pub fn wallet_to_bytes(&self, wallet: &Wallet) -> WalletResult<Vec<u8>> {
        Ok(self.to_proto(wallet)?.encode_to_vec())
    }

    /// Renders the wallet as protobuf text format for diagnostics.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Self::to_proto`].
    pub fn wallet_to_text(&self, wallet: &Wallet) -> WalletResult<String> {
        Ok(self.to_proto(wallet)?.to_text())
    }

    /// Parses a wire message without interpreting it.
    ///
    /// # Errors
    ///
    /// Returns [`WalletError::UnreadableInput`] if the input cannot be read
    /// or is not a valid message.
    pub fn parse_to_proto(&self, mut reader: impl Read) -> WalletResult<proto::Wallet> {
        let mut buffer = Vec::new();
        reader
            .read_to_end(&mut buffer)
            .map_err(|err| WalletError::UnreadableInput(err.to_string()))?;
        Ok(proto::Wallet::decode(buffer.as_slice())?)
    }

    /// Reads a wallet from `reader`.
    ///
    /// # Errors
    ///
    /// Returns [`WalletError::UnreadableInput`] if the input cannot be parsed
    /// and the errors of [`Self::read_wallet_from_proto`] otherwise.
    pub fn read_wallet(&self, reader: impl Read) -> WalletResult<Wallet> {
        let message = self.parse_to_proto(reader)?;
        self.read_wallet_from_proto(&message, None)
    }

    /// Reads a wallet from an in-memory buffer.
    ///
    /// # Errors
    ///
    /// See [`Self::read_wallet`].
    pub fn read_wallet_bytes(&self, bytes: &[u8]) -> WalletResult<Wallet> {
        self.read_wallet(bytes)
    }

    /// Rebuilds a wallet from a parsed message.
    ///
    /// The result is always built around the decoded master key. When
    /// `existing` is given only its version and registered extensions carry
    /// over; the extensions receive their persisted data. Its master key,
    /// crypter and pockets are discarded so that the result never mixes key
    /// material from two wallets.
    ///
    /// # Errors
    ///
    /// - [`WalletError::FutureVersion`] if the wallet is newer than this reader.
    /// - [`WalletError::MissingParameters`] or
    ///   [`WalletError::UnsupportedEncryption`] for a bad encryption policy.
    /// - [`WalletError::MalformedKeyRecord`] for a bad master key.
    /// - [`WalletError::DecodeFailure`] if a pocket or extension fails.
    /// - [`WalletError::UnknownMandatoryExtension`] if the wallet needs an
    ///   extension that was not registered.
    pub fn read_wallet_from_proto(
        &self,
        message: &proto::Wallet,
        existing: Option<Wallet>,
    ) -> WalletResult<Wallet> {
        let found = message.version.unwrap_or(0);
        if found > MAX_SUPPORTED_WALLET_VERSION {
            return Err(WalletError::FutureVersion {
                found,
                supported: MAX_SUPPORTED_WALLET_VERSION,
            });
        }

        let policy = decode_policy(
            message.encryption_type,
            message.encryption_parameters.as_ref(),
        )?;
        let crypter = policy.crypter()?;

        let master_record = message
            .master_key
            .as_ref()
            .ok_or_else(|| WalletError::MalformedKeyRecord("missing master key".to_string()))?;
        let master_key = decode_master_key(&self.key_codec, master_record, crypter.as_ref())?;

        let pockets = self.decode_pockets(&message.pockets, crypter.as_ref())?;

        let mut wallet = Wallet::new(master_key);
        if let Some(existing) = existing {
            let (version, extensions) = existing.into_parts();
            wallet.set_version(version);
            for extension in extensions {
                wallet.register_extension(extension);
            }
        }
        wallet.set_crypter(crypter);
        if let Some(version) = message.version {
            wallet.set_version(version);
        }
        for pocket in pockets {
            wallet.add_pocket(pocket);
        }

        read_extensions(&mut wallet, &message.extension)?;

        debug!(
            "decoded wallet v{} with {} pockets",
            wallet.version(),
            wallet.pockets().len()
        );
        Ok(wallet)
    }

    fn decode_pockets(
        &self,
        messages: &[proto::WalletPocket],
        crypter: Option<&Arc<dyn KeyCrypter>>,
    ) -> WalletResult<Vec<WalletPocket>> {
        messages
            .iter()
            .enumerate()
            .map(|(index, message)| {
                self.pocket_codec
                    .decode_pocket(message, crypter)
                    .map_err(|err| WalletError::decode_failure(format!("pocket {index}"), err))
            })
            .collect()
    }
}

fn read_extensions(wallet: &mut Wallet, messages: &[proto::Extension]) -> WalletResult<()> {
    for message in messages {
        let id = message
            .id
            .as_deref()
            .ok_or_else(|| WalletError::decode_failure("extension", "missing id"))?;

        if let Some(extension) = wallet.extension_mut(id) {
            debug!("loading wallet extension {id}");
            extension
                .deserialize(message.data.as_deref().unwrap_or_default())
                .map_err(|err| WalletError::decode_failure(format!("extension {id}"), err))?;
        } else if message.mandatory.unwrap_or(false) {
            return Err(WalletError::UnknownMandatoryExtension(id.to_string()));
        } else {
            warn!("ignoring unknown wallet extension {id}");
        }
    }
    Ok(())
}

fn default_serializer() -> WalletSerializer {
    WalletSerializer::default()
}

/// Writes `wallet` to `writer` with the default codecs.
///
/// # Errors
///
/// See [`WalletSerializer::write_wallet`].
pub fn write_wallet(wallet: &Wallet, writer: impl Write) -> WalletResult<()> {
    default_serializer().write_wallet(wallet, writer)
}

/// Serializes `wallet` with the default codecs.
///
/// # Errors
///
/// See [`WalletSerializer::wallet_to_bytes`].
pub fn wallet_to_bytes(wallet: &Wallet) -> WalletResult<Vec<u8>> {
    default_serializer().wallet_to_bytes(wallet)
}

/// Renders `wallet` as protobuf text format.
///
/// # Errors
///
/// See [`WalletSerializer::wallet_to_text`].
pub fn wallet_to_text(wallet: &Wallet) -> WalletResult<String> {
    default_serializer().wallet_to_text(wallet)
}

/// Parses a wire message from `reader` without interpreting it.
///
/// # Errors
///
/// See [`WalletSerializer::parse_to_proto`].
pub fn parse_to_proto(reader: impl Read) -> WalletResult<proto::Wallet> {
    default_serializer().parse_to_proto(reader)
}

/// Reads a wallet from `reader` with the default codecs.
///
/// # Errors
///
/// See [`WalletSerializer::read_wallet`].
pub fn read_wallet(reader: impl Read) -> WalletResult<Wallet> {
    default_serializer().read_wallet(reader)
}

/// Reads a wallet from bytes with the default codecs.
///
/// # Errors
///
/// See [`WalletSerializer::read_wallet`].
pub fn read_wallet_bytes(bytes: &[u8]) -> WalletResult<Wallet> {
    default_serializer().read_wallet_bytes(bytes)
}

/// Rebuilds a wallet from a parsed message with the default codecs.
///
/// # Errors
///
/// See [`WalletSerializer::read_wallet_from_proto`].
pub fn read_wallet_from_proto(
    message: &proto::Wallet,
    existing: Option<Wallet>,
) -> WalletResult<Wallet> {
    default_serializer().read_wallet_from_proto(message, existing)
}
