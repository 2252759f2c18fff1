//! Mapping between encryption policies and the wire encryption type.

use crate::crypto::{EncryptionPolicy, ScryptParameters};
use crate::error::{WalletError, WalletResult};
use crate::proto::{self, wallet::EncryptionType};

/// Encodes a policy as its wire encryption type and optional parameter block.
///
/// # Errors
///
/// Returns [`WalletError::UnsupportedPolicy`] for policies the format has no
/// representation for.
pub fn encode_policy(
    policy: &EncryptionPolicy,
) -> WalletResult<(EncryptionType, Option<proto::ScryptParameters>)> {
    match policy {
        EncryptionPolicy::Unencrypted => Ok((EncryptionType::Unencrypted, None)),
        // PIN-derived keys carry no persisted parameters
        EncryptionPolicy::PinAes => Ok((EncryptionType::EncryptedAes, None)),
        EncryptionPolicy::ScryptAes(params) => Ok((
            EncryptionType::EncryptedScryptAes,
            Some(proto::ScryptParameters {
                salt: Some(params.salt.clone()),
                n: Some(params.n),
                r: Some(params.r),
                p: Some(params.p),
            }),
        )),
        EncryptionPolicy::External { name } => Err(WalletError::UnsupportedPolicy(name.clone())),
    }
}

/// Decodes the wire encryption type and parameter block into a policy.
///
/// An absent type means the wallet predates the field and is unencrypted.
///
/// # Errors
///
/// - [`WalletError::MissingParameters`] if scrypt is declared without a
///   complete parameter block.
/// - [`WalletError::UnsupportedEncryption`] for unknown type values.
pub fn decode_policy(
    encryption_type: Option<i32>,
    params: Option<&proto::ScryptParameters>,
) -> WalletResult<EncryptionPolicy> {
    let Some(value) = encryption_type else {
        return Ok(EncryptionPolicy::Unencrypted);
    };

    match EncryptionType::try_from(value) {
        Ok(EncryptionType::Unencrypted) => Ok(EncryptionPolicy::Unencrypted),
        Ok(EncryptionType::EncryptedAes) => Ok(EncryptionPolicy::PinAes),
        Ok(EncryptionType::EncryptedScryptAes) => {
            let params = params.ok_or(WalletError::MissingParameters)?;
            Ok(EncryptionPolicy::ScryptAes(decode_scrypt_parameters(params)?))
        }
        Err(_) => Err(WalletError::UnsupportedEncryption(value)),
    }
}

fn decode_scrypt_parameters(params: &proto::ScryptParameters) -> WalletResult<ScryptParameters> {
    match (&params.salt, params.n, params.r, params.p) {
        (Some(salt), Some(n), Some(r), Some(p)) => Ok(ScryptParameters {
            salt: salt.clone(),
            n,
            r,
            p,
        }),
        _ => Err(WalletError::MissingParameters),
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    fn params() -> ScryptParameters {
        ScryptParameters {
            salt: vec![0x01; 8],
            n: 16_384,
            r: 8,
            p: 1,
        }
    }

    #[test_case(EncryptionPolicy::Unencrypted, EncryptionType::Unencrypted ; "unencrypted")]
    #[test_case(EncryptionPolicy::PinAes, EncryptionType::EncryptedAes ; "pin")]
    fn test_policies_without_parameters(policy: EncryptionPolicy, expected: EncryptionType) {
        let (encryption_type, block) = encode_policy(&policy).unwrap();
        assert_eq!(encryption_type, expected);
        assert!(block.is_none());

        let decoded = decode_policy(Some(encryption_type as i32), None).unwrap();
        assert_eq!(decoded, policy);
    }

    #[test]
    fn test_scrypt_parameters_copied_verbatim() {
        let policy = EncryptionPolicy::ScryptAes(params());
        let (encryption_type, block) = encode_policy(&policy).unwrap();
        assert_eq!(encryption_type, EncryptionType::EncryptedScryptAes);

        let block = block.unwrap();
        assert_eq!(block.salt.as_deref(), Some(&[0x01u8; 8][..]));
        assert_eq!(block.n, Some(16_384));
        assert_eq!(block.r, Some(8));
        assert_eq!(block.p, Some(1));

        let decoded = decode_policy(Some(encryption_type as i32), Some(&block)).unwrap();
        assert_eq!(decoded, policy);
    }

    #[test]
    fn test_external_policy_is_unsupported() {
        let policy = EncryptionPolicy::External {
            name: "smartcard".to_string(),
        };
        let err = encode_policy(&policy).unwrap_err();
        assert!(matches!(err, WalletError::UnsupportedPolicy(ref name) if name == "smartcard"));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_absent_type_is_unencrypted() {
        assert_eq!(decode_policy(None, None).unwrap(), EncryptionPolicy::Unencrypted);
    }

    #[test]
    fn test_scrypt_without_block_fails() {
        let result = decode_policy(Some(EncryptionType::EncryptedScryptAes as i32), None);
        assert!(matches!(result, Err(WalletError::MissingParameters)));
    }

    #[test_case(|p: &mut proto::ScryptParameters| p.salt = None ; "salt")]
    #[test_case(|p: &mut proto::ScryptParameters| p.n = None ; "n")]
    #[test_case(|p: &mut proto::ScryptParameters| p.r = None ; "r")]
    #[test_case(|p: &mut proto::ScryptParameters| p.p = None ; "p")]
    fn test_partial_block_fails(strip: fn(&mut proto::ScryptParameters)) {
        let (_, block) = encode_policy(&EncryptionPolicy::ScryptAes(params())).unwrap();
        let mut block = block.unwrap();
        strip(&mut block);

        let result = decode_policy(Some(EncryptionType::EncryptedScryptAes as i32), Some(&block));
        assert!(matches!(result, Err(WalletError::MissingParameters)));
    }

    #[test]
    fn test_unknown_type_fails() {
        assert!(matches!(
            decode_policy(Some(99), None),
            Err(WalletError::UnsupportedEncryption(99))
        ));
    }
}
