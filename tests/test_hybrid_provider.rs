//! Integration tests for the hybrid provider through its public API

use std::io::Write;

use hybrid_csp::hybrid::codec;
use hybrid_csp::prelude::*;

/// Build a provider the way a host would: from a configuration file
#[test]
fn test_provider_from_config_file() {
    let mut file = tempfile::NamedTempFile::new().expect("Failed to create config file");
    write!(
        file,
        r#"{{
            "Default": "HYBRID",
            "Hybrid": {{
                "PqAlgorithm": "ML-DSA-44",
                "SW": {{ "Hash": "SHA2", "Security": 256, "Ephemeral": false }}
            }}
        }}"#
    )
    .expect("Failed to write config file");

    let opts = FactoryOpts::from_file(file.path()).expect("Failed to load configuration");
    let factory = HybridFactory::new();
    let provider = factory.get(&opts).expect("Failed to build provider");
    assert_eq!(provider.pq_algorithm(), PqAlgorithm::MlDsa44);

    let key = provider
        .key_gen(&KeyGenOpts::Ecdsa { temporary: false })
        .expect("Failed to generate key");
    assert!(provider.get_key(&key.ski()).is_ok());
}

/// Endorsement-style flow: one party signs, another verifies with the public key only
#[test]
fn test_sign_and_verify_across_parties() {
    let factory = HybridFactory::new();
    let signer = factory.get(&FactoryOpts::default()).unwrap();
    let verifier = factory.get(&FactoryOpts::default()).unwrap();

    let key = signer.key_gen(&KeyGenOpts::Ecdsa { temporary: true }).unwrap();
    let public = key.public_key().unwrap();

    let messages = [b"Short message".to_vec(), vec![b'A'; 1000]];
    for message in &messages {
        let digest = signer.hash(message, &HashOpts::Sha256).unwrap();
        let signature = signer.sign(&key, &digest, None).unwrap();

        let digest_at_verifier = verifier.hash(message, &HashOpts::Sha256).unwrap();
        assert!(
            verifier.verify(&public, &signature, &digest_at_verifier, None).unwrap(),
            "signature over a {} byte message should verify",
            message.len()
        );
    }
}

/// A rejected signature and an unreadable one are reported differently
#[test]
fn test_rejection_is_distinct_from_error() {
    let provider = HybridFactory::new().get(&FactoryOpts::default()).unwrap();
    let key = provider.key_gen(&KeyGenOpts::Ecdsa { temporary: true }).unwrap();
    let digest = provider.hash(b"payload", &HashOpts::Sha256).unwrap();
    let signature = provider.sign(&key, &digest, None).unwrap();

    let mut tampered = signature.clone();
    let last = tampered.len() - 1;
    tampered[last] ^= 0x80;
    assert_eq!(provider.verify(&key, &tampered, &digest, None).unwrap(), false);

    let err = provider.verify(&key, &signature[..3], &digest, None).unwrap_err();
    assert_eq!(err.error_type(), "MalformedSignatureError");
    assert!(!err.user_friendly_message().is_empty());
}

/// Classical and hybrid identities behind one provider
#[test]
fn test_mixed_identities() {
    let provider = HybridFactory::new().get(&FactoryOpts::default()).unwrap();
    let hybrid = provider.key_gen(&KeyGenOpts::Ecdsa { temporary: true }).unwrap();
    let classical = Key::Classical(
        provider
            .adapter()
            .key_gen(&KeyGenOpts::EcdsaP256 { temporary: true })
            .unwrap(),
    );
    let digest = provider.hash(b"block", &HashOpts::Sha256).unwrap();

    let hybrid_signature = provider.sign(&hybrid, &digest, None).unwrap();
    let classical_signature = provider.sign(&classical, &digest, None).unwrap();
    assert!(hybrid_signature.len() > classical_signature.len());

    assert!(provider.verify(&hybrid, &hybrid_signature, &digest, None).unwrap());
    assert!(provider.verify(&classical, &classical_signature, &digest, None).unwrap());

    // a classical-only signature is not a hybrid signature
    match provider.verify(&hybrid, &classical_signature, &digest, None) {
        Ok(valid) => assert!(!valid),
        Err(err) => assert!(matches!(err, CryptoError::MalformedSignature { .. })),
    }
}

/// The blob layout is the documented length-prefixed concatenation
#[test]
fn test_signature_layout() {
    let provider = HybridFactory::new().get(&FactoryOpts::default()).unwrap();
    let key = provider.key_gen(&KeyGenOpts::Ecdsa { temporary: true }).unwrap();
    let digest = provider.hash(b"layout", &HashOpts::Sha256).unwrap();
    let signature = provider.sign(&key, &digest, None).unwrap();

    let declared = u32::from_be_bytes([signature[0], signature[1], signature[2], signature[3]]) as usize;
    let (classical, post_quantum) = codec::parse(&signature).unwrap();
    assert_eq!(classical.len(), declared);
    assert_eq!(classical[0], 0x30, "classical half is a DER sequence");
    assert_eq!(post_quantum.len(), signature.len() - 4 - declared);
    assert_eq!(post_quantum.len(), PqAlgorithm::MlDsa65.signature_size());
}
