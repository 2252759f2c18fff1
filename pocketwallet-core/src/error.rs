//! Error types for wallet persistence.

use thiserror::Error;

/// Result type for wallet operations.
pub type WalletResult<T> = Result<T, WalletError>;

/// Errors raised while persisting or restoring a wallet.
///
/// Every kind except [`WalletError::UnsupportedPolicy`] describes a problem
/// with the input and can be reported to the user; see
/// [`WalletError::is_recoverable`].
#[derive(Debug, Error)]
pub enum WalletError {
    /// The wallet was written by a newer version of the format.
    #[error("wallet version {found} is newer than the highest supported version {supported}")]
    FutureVersion {
        /// Version found in the message.
        found: u32,
        /// Highest version this reader understands.
        supported: u32,
    },

    /// Scrypt encryption declared without a complete parameter block.
    #[error("encryption parameters are missing")]
    MissingParameters,

    /// Encryption type outside the known set.
    #[error("unsupported encryption: {0}")]
    UnsupportedEncryption(i32),

    /// The wallet uses a crypter the format cannot persist.
    #[error("the wallet has encryption of type '{0}' which cannot be persisted")]
    UnsupportedPolicy(String),

    /// A key record is missing required fields or is inconsistent.
    #[error("malformed key record: {0}")]
    MalformedKeyRecord(String),

    /// The byte stream could not be parsed as a wallet message.
    #[error("could not parse input as a wallet: {0}")]
    UnreadableInput(String),

    /// A pocket or extension could not be decoded.
    #[error("failed to decode {context}: {reason}")]
    DecodeFailure {
        /// What was being decoded, e.g. `pocket 2`.
        context: String,
        /// Underlying reason.
        reason: String,
    },

    /// The wallet carries a mandatory extension nobody registered.
    #[error("unknown mandatory extension in wallet: {0}")]
    UnknownMandatoryExtension(String),

    /// Cryptographic failures (key stretching, AEAD).
    #[error("crypto error: {0}")]
    Crypto(String),

    /// Errors coming from the byte sink.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl WalletError {
    /// Returns `false` for errors that indicate a programming mistake rather
    /// than bad input.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        !matches!(self, Self::UnsupportedPolicy(_))
    }

    pub(crate) fn decode_failure(context: impl Into<String>, reason: impl ToString) -> Self {
        Self::DecodeFailure {
            context: context.into(),
            reason: reason.to_string(),
        }
    }
}

impl From<prost::DecodeError> for WalletError {
    fn from(error: prost::DecodeError) -> Self {
        Self::UnreadableInput(error.to_string())
    }
}
