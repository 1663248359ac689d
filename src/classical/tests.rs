use super::*;
use sha2::digest::DynDigest;
use crate::config::{HashFamily, SwOpts};
use crate::csp::{
    DecrypterOpts, EncrypterOpts, HashOpts, KeyDerivOpts, KeyGenOpts, KeyImportOpts, SignerOpts,
};
use crate::error::{error_codes, CryptoError, CryptoResult};

fn persistent_adapter() -> SoftwareAdapter {
    SoftwareAdapter::new(&SwOpts {
        ephemeral: false,
        ..SwOpts::default()
    })
    .unwrap()
}

fn digest(adapter: &SoftwareAdapter, msg: &[u8]) -> Vec<u8> {
    adapter.hash(msg, &HashOpts::Sha256).unwrap()
}

#[test]
fn test_ecdsa_sign_verify() {
    let adapter = SoftwareAdapter::new(&SwOpts::default()).unwrap();
    let key = adapter.key_gen(&KeyGenOpts::Ecdsa { temporary: true }).unwrap();
    assert!(key.private());
    assert!(!key.symmetric());
    assert_eq!(key.algorithm(), "ECDSA-P256");

    let d = digest(&adapter, b"classical message");
    let signature = adapter.sign(&key, &d, None).unwrap();
    assert!(adapter.verify(&key, &signature, &d, None).unwrap());

    let public = key.public_key().unwrap();
    assert!(!public.private());
    assert!(adapter.verify(&public, &signature, &d, None).unwrap());

    let other = digest(&adapter, b"another message");
    assert!(!adapter.verify(&public, &signature, &other, None).unwrap());
    assert!(!adapter.verify(&public, &[], &d, None).unwrap());
}

#[test]
fn test_security_level_selects_curve() {
    let adapter = SoftwareAdapter::new(&SwOpts {
        security: 384,
        ..SwOpts::default()
    })
    .unwrap();
    let key = adapter.key_gen(&KeyGenOpts::Ecdsa { temporary: true }).unwrap();
    assert_eq!(key.algorithm(), "ECDSA-P384");
    assert_eq!(key.public_key().unwrap().bytes().unwrap().len(), 97);

    let d = adapter.hash(b"msg", &HashOpts::Default).unwrap();
    assert_eq!(d.len(), 48);
    let signature = adapter.sign(&key, &d, None).unwrap();
    assert!(adapter.verify(&key, &signature, &d, None).unwrap());
}

#[test]
fn test_sign_rejects_empty_digest_and_wrong_keys() {
    let adapter = SoftwareAdapter::new(&SwOpts::default()).unwrap();
    let key = adapter.key_gen(&KeyGenOpts::EcdsaP256 { temporary: true }).unwrap();

    assert!(matches!(
        adapter.sign(&key, &[], None),
        Err(CryptoError::InvalidParameter { .. })
    ));

    let public = key.public_key().unwrap();
    assert!(matches!(
        adapter.sign(&public, b"digest", None),
        Err(CryptoError::InvalidKeyMaterial { .. })
    ));

    let aes = adapter.key_gen(&KeyGenOpts::Aes256 { temporary: true }).unwrap();
    assert!(matches!(
        adapter.sign(&aes, b"digest", None),
        Err(CryptoError::InvalidKeyType { .. })
    ));
}

#[test]
fn test_signer_opts_digest_length() {
    let adapter = SoftwareAdapter::new(&SwOpts::default()).unwrap();
    let key = adapter.key_gen(&KeyGenOpts::EcdsaP256 { temporary: true }).unwrap();
    let d = digest(&adapter, b"msg");

    let sha256 = SignerOpts {
        hash: Some(HashOpts::Sha256),
    };
    assert!(adapter.sign(&key, &d, Some(&sha256)).is_ok());

    let sha384 = SignerOpts {
        hash: Some(HashOpts::Sha384),
    };
    assert!(matches!(
        adapter.sign(&key, &d, Some(&sha384)),
        Err(CryptoError::InvalidParameter { .. })
    ));
}

#[test]
fn test_hash_functions() {
    let adapter = SoftwareAdapter::new(&SwOpts::default()).unwrap();
    assert_eq!(adapter.hash(b"x", &HashOpts::Default).unwrap().len(), 32);
    assert_eq!(adapter.hash(b"x", &HashOpts::Sha384).unwrap().len(), 48);
    assert_eq!(adapter.hash(b"x", &HashOpts::Sha3_256).unwrap().len(), 32);
    assert_eq!(adapter.hash(b"x", &HashOpts::Sha3_384).unwrap().len(), 48);

    // SHA-256("abc")
    assert_eq!(
        hex::encode(adapter.hash(b"abc", &HashOpts::Sha256).unwrap()),
        "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );

    let sha3 = SoftwareAdapter::new(&SwOpts {
        hash: HashFamily::Sha3,
        ..SwOpts::default()
    })
    .unwrap();
    assert_eq!(
        sha3.hash(b"abc", &HashOpts::Default).unwrap(),
        sha3.hash(b"abc", &HashOpts::Sha3_256).unwrap()
    );
}

#[test]
fn test_incremental_hash_matches_one_shot() {
    let adapter = SoftwareAdapter::new(&SwOpts::default()).unwrap();
    let mut hasher = adapter.get_hash(&HashOpts::Sha256).unwrap();
    hasher.update(b"hello ");
    hasher.update(b"world");
    assert_eq!(
        hasher.finalize().into_vec(),
        adapter.hash(b"hello world", &HashOpts::Sha256).unwrap()
    );
}

#[test]
fn test_aes_encrypt_decrypt() {
    let adapter = SoftwareAdapter::new(&SwOpts::default()).unwrap();
    let key = adapter.key_gen(&KeyGenOpts::Aes256 { temporary: true }).unwrap();
    assert!(key.symmetric());

    let enc = EncrypterOpts {
        associated_data: Some(b"header".to_vec()),
    };
    let ciphertext = adapter.encrypt(&key, b"secret payload", &enc).unwrap();
    assert_eq!(ciphertext.len(), 12 + b"secret payload".len() + 16);

    let dec = DecrypterOpts {
        associated_data: Some(b"header".to_vec()),
    };
    assert_eq!(adapter.decrypt(&key, &ciphertext, &dec).unwrap(), b"secret payload");

    let wrong_aad = DecrypterOpts {
        associated_data: Some(b"other".to_vec()),
    };
    assert!(matches!(
        adapter.decrypt(&key, &ciphertext, &wrong_aad),
        Err(CryptoError::EncryptionError { .. })
    ));
    assert!(matches!(
        adapter.decrypt(&key, &ciphertext[..20], &dec),
        Err(CryptoError::InvalidParameter { .. })
    ));
}

#[test]
fn test_encrypt_rejects_ecdsa_key() {
    let adapter = SoftwareAdapter::new(&SwOpts::default()).unwrap();
    let key = adapter.key_gen(&KeyGenOpts::EcdsaP256 { temporary: true }).unwrap();
    assert!(matches!(
        adapter.encrypt(&key, b"data", &EncrypterOpts::default()),
        Err(CryptoError::InvalidKeyType { .. })
    ));
}

#[test]
fn test_hkdf_key_derivation() {
    let adapter = SoftwareAdapter::new(&SwOpts::default()).unwrap();
    let key = adapter.key_import(&[7u8; 32], &KeyImportOpts::Aes256 { temporary: true }).unwrap();

    let opts = KeyDerivOpts::HkdfSha256 {
        info: b"channel".to_vec(),
        temporary: true,
    };
    let first = adapter.key_deriv(&key, &opts).unwrap();
    let second = adapter.key_deriv(&key, &opts).unwrap();
    assert_eq!(first.ski(), second.ski());
    assert_ne!(first.ski(), key.ski());

    let other = adapter
        .key_deriv(
            &key,
            &KeyDerivOpts::HkdfSha256 {
                info: b"other".to_vec(),
                temporary: true,
            },
        )
        .unwrap();
    assert_ne!(first.ski(), other.ski());

    let ecdsa = adapter.key_gen(&KeyGenOpts::EcdsaP256 { temporary: true }).unwrap();
    assert!(matches!(
        adapter.key_deriv(&ecdsa, &opts),
        Err(CryptoError::UnsupportedOperation { .. })
    ));
}

#[test]
fn test_import_public_key() {
    let adapter = SoftwareAdapter::new(&SwOpts::default()).unwrap();
    let key = adapter.key_gen(&KeyGenOpts::EcdsaP256 { temporary: true }).unwrap();
    let point = key.public_key().unwrap().bytes().unwrap();

    let imported = adapter
        .key_import(&point, &KeyImportOpts::EcdsaPublicKey { temporary: true })
        .unwrap();
    assert_eq!(imported.ski(), key.ski());

    let d = digest(&adapter, b"msg");
    let signature = adapter.sign(&key, &d, None).unwrap();
    assert!(adapter.verify(&imported, &signature, &d, None).unwrap());

    assert!(adapter
        .key_import(&point[..40], &KeyImportOpts::EcdsaPublicKey { temporary: true })
        .is_err());
    assert!(adapter
        .key_import(&[], &KeyImportOpts::EcdsaPublicKey { temporary: true })
        .is_err());
}

#[test]
fn test_import_pkcs8_private_key() {
    let adapter = SoftwareAdapter::new(&SwOpts::default()).unwrap();
    for opts in [
        KeyGenOpts::EcdsaP256 { temporary: true },
        KeyGenOpts::EcdsaP384 { temporary: true },
    ] {
        let key = adapter.key_gen(&opts).unwrap();
        let pkcs8 = match &key {
            ClassicalKey::EcdsaPrivate(private) => private.pkcs8().clone(),
            other => panic!("unexpected key {:?}", other),
        };
        let imported = adapter
            .key_import(
                pkcs8.as_bytes(),
                &KeyImportOpts::EcdsaPkcs8PrivateKey { temporary: true },
            )
            .unwrap();
        assert_eq!(imported.ski(), key.ski());
        assert_eq!(imported.algorithm(), key.algorithm());
    }

    assert!(matches!(
        adapter.key_import(b"not a key", &KeyImportOpts::EcdsaPkcs8PrivateKey { temporary: true }),
        Err(CryptoError::InvalidKeyMaterial { .. })
    ));
}

#[test]
fn test_key_bytes_export_rules() {
    let adapter = SoftwareAdapter::new(&SwOpts::default()).unwrap();
    let key = adapter.key_gen(&KeyGenOpts::EcdsaP256 { temporary: true }).unwrap();
    assert!(key.bytes().is_err());
    assert_eq!(key.public_key().unwrap().bytes().unwrap()[0], 0x04);

    let aes = adapter.key_gen(&KeyGenOpts::Aes256 { temporary: true }).unwrap();
    assert!(aes.bytes().is_err());
    assert!(aes.public_key().is_err());
    assert!(!aes.has_post_quantum_component());

    let printed = format!("{:?}", key);
    assert!(printed.contains("REDACTED"));
}

#[test]
fn test_keystore_persistence() {
    let adapter = persistent_adapter();
    let key = adapter.key_gen(&KeyGenOpts::EcdsaP256 { temporary: false }).unwrap();
    let found = adapter.get_key(&key.ski()).unwrap();
    assert!(found.private());
    assert_eq!(found.ski(), key.ski());

    // the public projection does not displace the stored private key
    let point = key.public_key().unwrap().bytes().unwrap();
    adapter
        .key_import(&point, &KeyImportOpts::EcdsaPublicKey { temporary: false })
        .unwrap();
    assert!(adapter.get_key(&key.ski()).unwrap().private());

    let temporary = adapter.key_gen(&KeyGenOpts::EcdsaP256 { temporary: true }).unwrap();
    assert!(matches!(
        adapter.get_key(&temporary.ski()),
        Err(CryptoError::KeyNotFound { .. })
    ));
    assert!(matches!(
        adapter.get_key(&[]),
        Err(CryptoError::InvalidParameter { .. })
    ));
}

/// Store that refuses every write
struct RejectingKeyStore;

impl KeyStore for RejectingKeyStore {
    fn get_key(&self, ski: &[u8]) -> CryptoResult<ClassicalKey> {
        Err(CryptoError::key_not_found(ski))
    }

    fn store_key(&self, _key: &ClassicalKey) -> CryptoResult<()> {
        Err(CryptoError::invalid_state(
            "store_key",
            "key store is read-only",
            error_codes::KEY_STORE_FAILED,
        ))
    }
}

#[test]
fn test_keystore_failure_propagates() {
    let adapter = SoftwareAdapter::with_keystore(
        &SwOpts {
            ephemeral: false,
            ..SwOpts::default()
        },
        Box::new(RejectingKeyStore),
    )
    .unwrap();

    let err = adapter
        .key_gen(&KeyGenOpts::EcdsaP256 { temporary: false })
        .unwrap_err();
    assert_eq!(err.error_code(), error_codes::KEY_STORE_FAILED);

    let err = adapter
        .key_import(&[3u8; 32], &KeyImportOpts::Aes256 { temporary: false })
        .unwrap_err();
    assert_eq!(err.error_code(), error_codes::KEY_STORE_FAILED);

    // temporary keys never reach the store
    assert!(adapter.key_gen(&KeyGenOpts::EcdsaP256 { temporary: true }).is_ok());
}

#[test]
fn test_ephemeral_adapter_retains_nothing() {
    let adapter = SoftwareAdapter::new(&SwOpts::default()).unwrap();
    let key = adapter.key_gen(&KeyGenOpts::EcdsaP256 { temporary: false }).unwrap();
    assert!(matches!(
        adapter.get_key(&key.ski()),
        Err(CryptoError::KeyNotFound { .. })
    ));
}

#[test]
fn test_in_memory_keystore() {
    let store = InMemoryKeyStore::new();
    assert!(store.is_empty());
    let key = ClassicalKey::Aes(AesKey::new(&[1u8; 32]).unwrap());
    store.store_key(&key).unwrap();
    assert_eq!(store.len(), 1);
    assert_eq!(store.get_key(&key.ski()).unwrap().ski(), key.ski());
    assert!(store.get_key(&[0u8; 32]).is_err());
}

#[test]
fn test_invalid_security_level_rejected() {
    let result = SoftwareAdapter::new(&SwOpts {
        security: 512,
        ..SwOpts::default()
    });
    assert!(matches!(result, Err(CryptoError::ConfigError(_))));
}
