mod common;

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::sync::Arc;

use pocketwallet_core::proto;
use pocketwallet_core::serializer::{HdKeyChainCodec, PocketCodec, PocketProtobufCodec};
use pocketwallet_core::{
    parse_to_proto, read_wallet, read_wallet_bytes, read_wallet_from_proto, wallet_to_bytes,
    wallet_to_text, write_wallet, EncryptionPolicy, KeyCrypter, Wallet, WalletError,
    WalletPocket, WalletResult, WalletSerializer,
};
use prost::Message;
use secrecy::SecretString;

#[test]
fn test_encrypted_wallet_file_round_trip() -> eyre::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("wallet.pb");
    let password = SecretString::from("open sesame");

    let plain = common::wallet_with_pockets(&["bitcoin.main", "litecoin.main"]);
    let mut wallet = common::wallet_with_pockets(&["bitcoin.main", "litecoin.main"]);
    wallet.encrypt(common::test_crypter(), &password)?;

    write_wallet(&wallet, BufWriter::new(File::create(&path)?))?;
    let mut restored = read_wallet(BufReader::new(File::open(&path)?))?;

    assert_eq!(restored, wallet);
    assert!(matches!(
        restored.encryption_policy(),
        EncryptionPolicy::ScryptAes(ref params) if params.n == 16
    ));
    assert!(!restored.check_password(&SecretString::from("open barley"))?);

    restored.decrypt(&password)?;
    assert_eq!(restored, plain);
    assert_eq!(
        restored.pocket("litecoin.main").and_then(WalletPocket::description),
        Some("litecoin.main pocket")
    );
    Ok(())
}

#[test]
fn test_registered_extension_is_restored() -> eyre::Result<()> {
    let mut wallet = common::wallet_with_pockets(&["bitcoin.main"]);
    wallet.register_extension(Box::new(common::AddressBook {
        mandatory: true,
        entries: b"alice=1A1zP1".to_vec(),
    }));
    let bytes = wallet_to_bytes(&wallet)?;

    assert!(matches!(
        read_wallet_bytes(&bytes),
        Err(WalletError::UnknownMandatoryExtension(_))
    ));

    let mut existing = Wallet::new(pocketwallet_core::DeterministicKey::master_from_seed(
        &[9u8; 16],
    )?);
    existing.register_extension(Box::<common::AddressBook>::default());
    let restored = read_wallet_from_proto(&parse_to_proto(bytes.as_slice())?, Some(existing))?;

    assert_eq!(restored.extensions()[0].serialize(), b"alice=1A1zP1");
    assert_eq!(restored, wallet);
    Ok(())
}

#[test]
fn test_future_wallet_is_rejected() -> eyre::Result<()> {
    let bytes = wallet_to_bytes(&common::wallet_with_pockets(&[]))?;
    let mut message = proto::Wallet::decode(bytes.as_slice())?;
    message.version = Some(7);

    let err = read_wallet_bytes(&message.encode_to_vec()).unwrap_err();
    assert!(matches!(err, WalletError::FutureVersion { found: 7, supported: 1 }));
    assert!(err.is_recoverable());
    Ok(())
}

#[test]
fn test_text_form_lists_every_pocket() -> eyre::Result<()> {
    let wallet = common::wallet_with_pockets(&["bitcoin.main", "dogecoin.main"]);
    let text = wallet_to_text(&wallet)?;

    assert_eq!(text.matches("pockets {").count(), 2);
    assert!(text.contains("network_identifier: \"dogecoin.main\""));
    assert!(text.contains("description: \"bitcoin.main pocket\""));
    Ok(())
}

/// Pocket codec that only accepts main networks.
#[derive(Debug, Default)]
struct MainnetOnly {
    inner: PocketProtobufCodec,
}

impl PocketCodec for MainnetOnly {
    fn encode_pocket(&self, pocket: &WalletPocket) -> WalletResult<proto::WalletPocket> {
        self.inner.encode_pocket(pocket)
    }

    fn decode_pocket(
        &self,
        message: &proto::WalletPocket,
        crypter: Option<&Arc<dyn KeyCrypter>>,
    ) -> WalletResult<WalletPocket> {
        let pocket = self.inner.decode_pocket(message, crypter)?;
        if pocket.coin_id().ends_with(".main") {
            Ok(pocket)
        } else {
            Err(WalletError::MalformedKeyRecord(format!(
                "{} is not a main network",
                pocket.coin_id()
            )))
        }
    }
}

#[test]
fn test_custom_pocket_codec() -> eyre::Result<()> {
    let serializer = WalletSerializer::new(HdKeyChainCodec, MainnetOnly::default());
    let wallet = common::wallet_with_pockets(&["bitcoin.main", "bitcoin.test", "litecoin.main"]);
    let bytes = serializer.wallet_to_bytes(&wallet)?;

    match serializer.read_wallet_bytes(&bytes) {
        Err(WalletError::DecodeFailure { context, reason }) => {
            assert_eq!(context, "pocket 1");
            assert!(reason.contains("bitcoin.test"));
        }
        other => panic!("expected a decode failure, got {other:?}"),
    }

    // The stock codec has no such restriction
    assert_eq!(read_wallet_bytes(&bytes)?, wallet);
    Ok(())
}
