//! Password crypter backed by scrypt.

use secrecy::{ExposeSecret, SecretString};

use super::{AesKey, EncryptionPolicy, KeyCrypter, ScryptParameters};
use crate::defaults::AES_KEY_SIZE;
use crate::error::{WalletError, WalletResult};

/// Stretches a password into an AES key with scrypt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScryptCrypter {
    params: ScryptParameters,
}

impl ScryptCrypter {
    /// Creates a crypter for the given parameters.
    #[must_use]
    pub const fn new(params: ScryptParameters) -> Self {
        Self { params }
    }

    /// Creates a crypter with default costs and a random salt.
    #[must_use]
    pub fn generate() -> Self {
        Self::new(ScryptParameters::random())
    }

    /// Returns the scrypt parameters.
    #[must_use]
    pub const fn params(&self) -> &ScryptParameters {
        &self.params
    }

    fn scrypt_params(&self) -> WalletResult<scrypt::Params> {
        let n = self.params.n;
        if n < 2 || !n.is_power_of_two() {
            return Err(WalletError::Crypto(format!(
                "scrypt cost factor must be a power of two greater than one, got {n}"
            )));
        }
        // n is a power of two below 2^64, so the exponent fits in a u8
        #[allow(clippy::cast_possible_truncation)]
        let log_n = n.trailing_zeros() as u8;
        scrypt::Params::new(log_n, self.params.r, self.params.p, AES_KEY_SIZE)
            .map_err(|err| WalletError::Crypto(format!("invalid scrypt parameters: {err}")))
    }
}

impl KeyCrypter for ScryptCrypter {
    fn encryption_policy(&self) -> EncryptionPolicy {
        EncryptionPolicy::ScryptAes(self.params.clone())
    }

    fn derive_key(&self, password: &SecretString) -> WalletResult<AesKey> {
        let params = self.scrypt_params()?;
        let mut key = [0u8; AES_KEY_SIZE];
        scrypt::scrypt(
            password.expose_secret().as_bytes(),
            &self.params.salt,
            &params,
            &mut key,
        )
        .map_err(|err| WalletError::Crypto(err.to_string()))?;
        Ok(AesKey::from_bytes(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap_crypter() -> ScryptCrypter {
        ScryptCrypter::new(ScryptParameters {
            salt: vec![0x01; 8],
            n: 16,
            r: 8,
            p: 1,
        })
    }

    #[test]
    fn test_derive_key_is_deterministic() {
        let crypter = cheap_crypter();
        let password = SecretString::from("correct horse");
        let a = crypter.derive_key(&password).unwrap();
        let b = crypter.derive_key(&password).unwrap();
        assert_eq!(a.as_bytes(), b.as_bytes());

        let other = crypter.derive_key(&SecretString::from("battery staple")).unwrap();
        assert_ne!(a.as_bytes(), other.as_bytes());
    }

    #[test]
    fn test_encrypt_decrypt() {
        let crypter = cheap_crypter();
        let key = crypter.derive_key(&SecretString::from("pw")).unwrap();
        let encrypted = crypter.encrypt(b"secret key bytes", &key).unwrap();
        assert_ne!(encrypted.ciphertext, b"secret key bytes".to_vec());

        let decrypted = crypter.decrypt(&encrypted, &key).unwrap();
        assert_eq!(decrypted.as_slice(), b"secret key bytes");
    }

    #[test]
    fn test_wrong_password_fails() {
        let crypter = cheap_crypter();
        let key = crypter.derive_key(&SecretString::from("pw")).unwrap();
        let encrypted = crypter.encrypt(b"secret", &key).unwrap();

        let wrong = crypter.derive_key(&SecretString::from("nope")).unwrap();
        assert!(matches!(
            crypter.decrypt(&encrypted, &wrong),
            Err(WalletError::Crypto(_))
        ));
    }

    #[test]
    fn test_rejects_non_power_of_two_cost() {
        let crypter = ScryptCrypter::new(ScryptParameters {
            salt: vec![0x01; 8],
            n: 1000,
            r: 8,
            p: 1,
        });
        assert!(matches!(
            crypter.derive_key(&SecretString::from("pw")),
            Err(WalletError::Crypto(_))
        ));
    }
}
