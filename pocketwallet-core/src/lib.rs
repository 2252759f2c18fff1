#![deny(clippy::all, clippy::pedantic, clippy::nursery)]
//! Persistence for hierarchical deterministic multi-currency wallets.
//!
//! A [`Wallet`] holds a master key, an optional crypter and a list of
//! per-currency [`WalletPocket`]s. The [`serializer`] module maps it to a
//! versioned protocol buffer message and back, rejecting wallets written by
//! a newer version of the format.
//!
//! ```rust
//! use pocketwallet_core::{read_wallet_bytes, wallet_to_bytes, DeterministicKey, Wallet};
//!
//! let master = DeterministicKey::master_from_seed(&[7u8; 32]).unwrap();
//! let wallet = Wallet::new(master);
//!
//! let bytes = wallet_to_bytes(&wallet).unwrap();
//! assert_eq!(read_wallet_bytes(&bytes).unwrap(), wallet);
//! ```

mod crypto;
pub use crypto::*;

pub mod defaults;

mod error;
pub use error::*;

mod keys;
pub use keys::*;

pub mod logger;

mod pocket;
pub use pocket::*;

pub mod proto;

pub mod serializer;
pub use serializer::{
    parse_to_proto, read_wallet, read_wallet_bytes, read_wallet_from_proto, wallet_to_bytes,
    wallet_to_text, write_wallet, WalletSerializer,
};

mod wallet;
pub use wallet::*;
