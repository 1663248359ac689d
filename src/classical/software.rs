use aes_gcm::{
    aead::{Aead, AeadCore, KeyInit, OsRng, Payload},
    Aes256Gcm, Key as AesGcmKey, Nonce,
};
use hkdf::Hkdf;
use ring::rand::SystemRandom;
use ring::signature::EcdsaKeyPair;
use sha2::digest::DynDigest;
use sha2::{Sha256, Sha384};
use sha3::{Sha3_256, Sha3_384};
use zeroize::Zeroize;

use super::{
    AesKey, ClassicalKey, ClassicalSigningAdapter, DummyKeyStore, EcdsaCurve, EcdsaPrivateKey,
    EcdsaPublicKey, InMemoryKeyStore, KeyStore, AES_256_KEY_SIZE,
};
use crate::config::{HashFamily, SwOpts};
use crate::csp::{
    DecrypterOpts, EncrypterOpts, HashOpts, KeyDerivOpts, KeyGenOpts, KeyImportOpts, SignerOpts,
};
use crate::error::{error_codes, CryptoError, CryptoResult, Stage};
use crate::secure_memory::with_secure_scope;

/// AES-GCM nonce length
const NONCE_SIZE: usize = 12;
/// AES-GCM authentication tag length
const TAG_SIZE: usize = 16;

/// Software classical adapter.
///
/// ECDSA over P-256/P-384 with `ring`, SHA-2 and SHA-3 hashing, AES-256-GCM
/// encryption and HKDF-SHA256 derivation of AES keys. Keys that are not
/// temporary go to the configured key store; an ephemeral configuration uses
/// a store that keeps nothing.
pub struct SoftwareAdapter {
    opts: SwOpts,
    keystore: Box<dyn KeyStore>,
    rng: SystemRandom,
}

impl SoftwareAdapter {
    /// Build an adapter from its configuration block
    pub fn new(opts: &SwOpts) -> CryptoResult<Self> {
        let keystore: Box<dyn KeyStore> = if opts.ephemeral {
            Box::new(DummyKeyStore)
        } else {
            Box::new(InMemoryKeyStore::new())
        };
        Self::with_keystore(opts, keystore)
    }

    /// Build an adapter backed by a caller supplied key store
    pub fn with_keystore(opts: &SwOpts, keystore: Box<dyn KeyStore>) -> CryptoResult<Self> {
        opts.validate()?;
        log::debug!(
            "Software adapter: security {}, hash family {}, ephemeral {}",
            opts.security,
            opts.hash,
            opts.ephemeral
        );
        Ok(Self {
            opts: opts.clone(),
            keystore,
            rng: SystemRandom::new(),
        })
    }

    pub fn opts(&self) -> &SwOpts {
        &self.opts
    }

    fn default_curve(&self) -> CryptoResult<EcdsaCurve> {
        EcdsaCurve::from_security_level(self.opts.security).ok_or_else(|| {
            CryptoError::ConfigError(format!("unsupported security level {}", self.opts.security))
        })
    }

    /// Replace `HashOpts::Default` with the configured family and size
    fn resolve_hash(&self, opts: HashOpts) -> HashOpts {
        match (opts, self.opts.hash, self.opts.security) {
            (HashOpts::Default, HashFamily::Sha2, 384) => HashOpts::Sha384,
            (HashOpts::Default, HashFamily::Sha2, _) => HashOpts::Sha256,
            (HashOpts::Default, HashFamily::Sha3, 384) => HashOpts::Sha3_384,
            (HashOpts::Default, HashFamily::Sha3, _) => HashOpts::Sha3_256,
            (explicit, _, _) => explicit,
        }
    }

    fn persist(&self, key: ClassicalKey, temporary: bool) -> CryptoResult<ClassicalKey> {
        if !temporary {
            self.keystore.store_key(&key)?;
        }
        Ok(key)
    }

    fn generate_ecdsa(&self, curve: EcdsaCurve) -> CryptoResult<ClassicalKey> {
        let pkcs8 = EcdsaKeyPair::generate_pkcs8(curve.signing_algorithm(), &self.rng).map_err(|e| {
            CryptoError::key_generation_error(Stage::ClassicalKeyGeneration, &e.to_string())
        })?;
        let key = EcdsaPrivateKey::from_pkcs8(curve, pkcs8.as_ref()).map_err(|e| {
            CryptoError::key_generation_error(Stage::ClassicalKeyGeneration, &e.to_string())
        })?;
        Ok(ClassicalKey::EcdsaPrivate(key))
    }

    fn generate_aes(&self) -> CryptoResult<ClassicalKey> {
        let mut raw = Aes256Gcm::generate_key(OsRng);
        let key = AesKey::new(raw.as_slice());
        raw.as_mut_slice().zeroize();
        Ok(ClassicalKey::Aes(key?))
    }

    fn check_digest(&self, digest: &[u8], opts: Option<&SignerOpts>) -> CryptoResult<()> {
        if digest.is_empty() {
            return Err(CryptoError::invalid_parameter("digest", "non-empty", "empty"));
        }
        if let Some(hash) = opts.and_then(|o| o.hash) {
            let hash = self.resolve_hash(hash);
            if let Some(size) = hash.output_size() {
                if digest.len() != size {
                    return Err(CryptoError::invalid_parameter(
                        "digest",
                        &format!("{} bytes for {}", size, hash),
                        &format!("{} bytes", digest.len()),
                    ));
                }
            }
        }
        Ok(())
    }

    fn aes_key<'a>(&self, key: &'a ClassicalKey, operation: &str) -> CryptoResult<&'a AesKey> {
        match key {
            ClassicalKey::Aes(key) => Ok(key),
            _ => Err(CryptoError::invalid_key_type(operation, "AES-256 key")),
        }
    }
}

impl ClassicalSigningAdapter for SoftwareAdapter {
    fn key_gen(&self, opts: &KeyGenOpts) -> CryptoResult<ClassicalKey> {
        let key = match opts {
            KeyGenOpts::Ecdsa { .. } => self.generate_ecdsa(self.default_curve()?)?,
            KeyGenOpts::EcdsaP256 { .. } => self.generate_ecdsa(EcdsaCurve::P256)?,
            KeyGenOpts::EcdsaP384 { .. } => self.generate_ecdsa(EcdsaCurve::P384)?,
            KeyGenOpts::Aes256 { .. } => self.generate_aes()?,
        };
        log::debug!("Generated {} key", key.algorithm());
        self.persist(key, opts.temporary())
    }

    fn key_deriv(&self, key: &ClassicalKey, opts: &KeyDerivOpts) -> CryptoResult<ClassicalKey> {
        let source = match key {
            ClassicalKey::Aes(source) => source,
            ClassicalKey::EcdsaPrivate(_) | ClassicalKey::EcdsaPublic(_) => {
                return Err(CryptoError::unsupported_operation(
                    "key_deriv",
                    "ECDSA key re-randomization is not available in the software adapter",
                ))
            }
        };

        let derived = match opts {
            KeyDerivOpts::HkdfSha256 { info, .. } => {
                let hk = Hkdf::<Sha256>::new(None, source.as_bytes());
                let mut okm = [0u8; AES_256_KEY_SIZE];
                with_secure_scope(&mut okm, |okm| {
                    hk.expand(info, okm)
                        .map_err(|e| CryptoError::key_derivation_error("HKDF-SHA256", &e.to_string()))?;
                    AesKey::new(okm)
                })?
            }
        };
        self.persist(ClassicalKey::Aes(derived), opts.temporary())
    }

    fn key_import(&self, raw: &[u8], opts: &KeyImportOpts) -> CryptoResult<ClassicalKey> {
        if raw.is_empty() {
            return Err(CryptoError::invalid_parameter("raw", "non-empty key material", "empty"));
        }
        let key = match opts {
            KeyImportOpts::EcdsaPkcs8PrivateKey { .. } => {
                let key = EcdsaPrivateKey::from_pkcs8(EcdsaCurve::P256, raw)
                    .or_else(|_| EcdsaPrivateKey::from_pkcs8(EcdsaCurve::P384, raw))?;
                ClassicalKey::EcdsaPrivate(key)
            }
            KeyImportOpts::EcdsaPublicKey { .. } => {
                ClassicalKey::EcdsaPublic(EcdsaPublicKey::from_point(raw)?)
            }
            KeyImportOpts::Aes256 { .. } => ClassicalKey::Aes(AesKey::new(raw)?),
        };
        log::debug!("Imported {} key", key.algorithm());
        self.persist(key, opts.temporary())
    }

    fn get_key(&self, ski: &[u8]) -> CryptoResult<ClassicalKey> {
        if ski.is_empty() {
            return Err(CryptoError::invalid_parameter("ski", "non-empty", "empty"));
        }
        self.keystore.get_key(ski)
    }

    fn hash(&self, msg: &[u8], opts: &HashOpts) -> CryptoResult<Vec<u8>> {
        let mut hasher = self.get_hash(opts)?;
        hasher.update(msg);
        Ok(hasher.finalize().into_vec())
    }

    fn get_hash(&self, opts: &HashOpts) -> CryptoResult<Box<dyn DynDigest>> {
        let hasher: Box<dyn DynDigest> = match self.resolve_hash(*opts) {
            HashOpts::Sha256 => Box::new(Sha256::default()),
            HashOpts::Sha384 => Box::new(Sha384::default()),
            HashOpts::Sha3_256 => Box::new(Sha3_256::default()),
            HashOpts::Sha3_384 => Box::new(Sha3_384::default()),
            HashOpts::Default => {
                return Err(CryptoError::invalid_parameter(
                    "hash",
                    "a concrete hash function",
                    "unresolved default",
                ))
            }
        };
        Ok(hasher)
    }

    fn sign(
        &self,
        key: &ClassicalKey,
        digest: &[u8],
        opts: Option<&SignerOpts>,
    ) -> CryptoResult<Vec<u8>> {
        self.check_digest(digest, opts)?;
        match key {
            ClassicalKey::EcdsaPrivate(key) => key.sign(&self.rng, digest),
            ClassicalKey::EcdsaPublic(_) => Err(CryptoError::invalid_key_material(
                "sign",
                "an ECDSA public key cannot sign",
                error_codes::MISSING_PRIVATE_KEY,
            )),
            ClassicalKey::Aes(_) => Err(CryptoError::invalid_key_type("sign", "ECDSA private key")),
        }
    }

    fn verify(
        &self,
        key: &ClassicalKey,
        signature: &[u8],
        digest: &[u8],
        opts: Option<&SignerOpts>,
    ) -> CryptoResult<bool> {
        self.check_digest(digest, opts)?;
        let public = key
            .ecdsa_public()
            .ok_or_else(|| CryptoError::invalid_key_type("verify", "ECDSA key"))?;
        if signature.is_empty() {
            log::debug!("Rejected empty ECDSA signature");
            return Ok(false);
        }
        Ok(public.verify(digest, signature))
    }

    fn encrypt(
        &self,
        key: &ClassicalKey,
        plaintext: &[u8],
        opts: &EncrypterOpts,
    ) -> CryptoResult<Vec<u8>> {
        let key = self.aes_key(key, "encrypt")?;
        let cipher = Aes256Gcm::new(AesGcmKey::<Aes256Gcm>::from_slice(key.as_bytes()));
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let payload = Payload {
            msg: plaintext,
            aad: opts.associated_data.as_deref().unwrap_or(&[]),
        };
        let ciphertext = cipher.encrypt(&nonce, payload).map_err(|e| {
            CryptoError::encryption_error("AES-GCM encryption", &e.to_string(), error_codes::ENCRYPTION_FAILED)
        })?;

        let mut output = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
        output.extend_from_slice(nonce.as_slice());
        output.extend_from_slice(&ciphertext);
        Ok(output)
    }

    fn decrypt(
        &self,
        key: &ClassicalKey,
        ciphertext: &[u8],
        opts: &DecrypterOpts,
    ) -> CryptoResult<Vec<u8>> {
        let key = self.aes_key(key, "decrypt")?;
        if ciphertext.len() < NONCE_SIZE + TAG_SIZE {
            return Err(CryptoError::invalid_parameter(
                "ciphertext",
                &format!("at least {} bytes", NONCE_SIZE + TAG_SIZE),
                &format!("{} bytes", ciphertext.len()),
            ));
        }
        let (nonce, body) = ciphertext.split_at(NONCE_SIZE);
        let cipher = Aes256Gcm::new(AesGcmKey::<Aes256Gcm>::from_slice(key.as_bytes()));
        let payload = Payload {
            msg: body,
            aad: opts.associated_data.as_deref().unwrap_or(&[]),
        };
        cipher
            .decrypt(Nonce::from_slice(nonce), payload)
            .map_err(|_| {
                CryptoError::encryption_error(
                    "AES-GCM decryption",
                    "authentication failed",
                    error_codes::DECRYPTION_FAILED,
                )
            })
    }
}
