//! Format constants and default parameters.

/// Version written by this implementation.
pub const CURRENT_WALLET_VERSION: u32 = 1;

/// Highest wallet version the reader accepts.
pub const MAX_SUPPORTED_WALLET_VERSION: u32 = 1;

/// Size of a BIP-32 chain code in bytes.
pub const CHAIN_CODE_SIZE: usize = 32;

/// Size of the AES-256 key produced by every crypter.
pub const AES_KEY_SIZE: usize = 32;

/// Size of the AES-GCM initialisation vector.
pub const AES_IV_SIZE: usize = 12;

/// Default scrypt cost factor.
pub const DEFAULT_SCRYPT_N: u64 = 16_384;

/// Default scrypt block size.
pub const DEFAULT_SCRYPT_R: u32 = 8;

/// Default scrypt parallelization.
pub const DEFAULT_SCRYPT_P: u32 = 1;

/// Length of freshly generated scrypt salts.
pub const SCRYPT_SALT_SIZE: usize = 8;

/// HMAC key for BIP-32 master key generation.
pub const MASTER_HMAC_KEY: &[u8] = b"Bitcoin seed";

/// Accepted seed length range for master key generation (BIP-32).
pub const SEED_SIZE_RANGE: std::ops::RangeInclusive<usize> = 16..=64;

/// Info label binding PIN-derived keys to their purpose.
pub const PIN_KEY_INFO: &[u8] = b"pocketwallet:pin-aes";
