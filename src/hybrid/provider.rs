use sha2::digest::DynDigest;

use super::codec;
use super::HybridKeyPair;
use crate::classical::{ClassicalSigningAdapter, SoftwareAdapter};
use crate::config::HybridOpts;
use crate::csp::{
    Csp, DecrypterOpts, EncrypterOpts, HashOpts, Key, KeyDerivOpts, KeyGenOpts, KeyImportOpts,
    SignerOpts,
};
use crate::error::{error_codes, CryptoError, CryptoResult, Stage};
use crate::pqc::{with_signer, PqAlgorithm};

/// Hybrid ECDSA + ML-DSA cryptographic service provider.
///
/// # Key handling
///
/// `key_gen` with asymmetric options returns a [`Key::Hybrid`]: a classical
/// key from the adapter and a fresh ML-DSA key pair. Symmetric options are
/// handed to the adapter and return a [`Key::Classical`].
///
/// # Signatures
///
/// A hybrid signature is the combined blob of [`codec`](super::codec). It
/// verifies only if both the classical and the post-quantum signatures
/// verify; both are always checked.
///
/// # Fallback policy
///
/// A [`Key::Classical`] passed to `sign` or `verify` is served by the
/// classical adapter alone and produces or checks a plain classical
/// signature with no combined wire format. This lets a host mix hybrid and
/// classical identities behind one provider.
///
/// Every native post-quantum context is created for a single operation and
/// released before the call returns, so one provider can be shared freely
/// across threads.
pub struct HybridProvider<A: ClassicalSigningAdapter = SoftwareAdapter> {
    adapter: A,
    pq_algorithm: PqAlgorithm,
}

impl HybridProvider<SoftwareAdapter> {
    /// Provider backed by the software classical adapter
    pub fn new(opts: &HybridOpts) -> CryptoResult<Self> {
        opts.validate()?;
        let adapter = SoftwareAdapter::new(&opts.sw)?;
        Ok(Self::with_adapter(adapter, opts.algorithm()?))
    }
}

impl<A: ClassicalSigningAdapter> HybridProvider<A> {
    /// Provider over any classical adapter
    pub fn with_adapter(adapter: A, pq_algorithm: PqAlgorithm) -> Self {
        log::info!("Hybrid provider ready with {}", pq_algorithm);
        Self {
            adapter,
            pq_algorithm,
        }
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    pub fn pq_algorithm(&self) -> PqAlgorithm {
        self.pq_algorithm
    }

    fn hybrid_key_gen(&self, opts: &KeyGenOpts) -> CryptoResult<HybridKeyPair> {
        let classical = self
            .adapter
            .key_gen(opts)
            .map_err(|e| at_stage(e, Stage::ClassicalKeyGeneration, CryptoError::key_generation_error))?;
        if classical.symmetric() || !classical.private() {
            return Err(CryptoError::key_generation_error(
                Stage::ClassicalKeyGeneration,
                &format!("adapter returned a {} key without a private half", classical.algorithm()),
            ));
        }

        let (pq_public_key, pq_secret_key) = with_signer(self.pq_algorithm, None, |signer| {
            let public_key = signer.generate_key_pair()?;
            let secret_key = signer.export_secret_key()?;
            Ok((public_key, secret_key))
        })
        .map_err(|e| at_stage(e, Stage::PostQuantumKeyGeneration, CryptoError::key_generation_error))?;

        // the classical half was checked above, so only the post-quantum sizes can disagree here
        let key = HybridKeyPair::new(classical, self.pq_algorithm, pq_public_key, Some(pq_secret_key))
            .map_err(|e| at_stage(e, Stage::PostQuantumKeyGeneration, CryptoError::key_generation_error))?;

        log::info!(
            "Generated hybrid key {} ({} + {})",
            hex::encode(key.ski()),
            key.classical().algorithm(),
            key.pq_algorithm()
        );
        Ok(key)
    }

    fn hybrid_sign(
        &self,
        key: &HybridKeyPair,
        digest: &[u8],
        opts: Option<&SignerOpts>,
    ) -> CryptoResult<Vec<u8>> {
        if digest.is_empty() {
            return Err(CryptoError::invalid_parameter("digest", "non-empty", "empty"));
        }
        let secret_key = key.pq_secret_key().ok_or_else(|| {
            CryptoError::invalid_key_material(
                "sign",
                "hybrid key has no post-quantum private key",
                error_codes::MISSING_PRIVATE_KEY,
            )
        })?;

        let classical_signature = self
            .adapter
            .sign(key.classical(), digest, opts)
            .map_err(|e| at_stage(e, Stage::ClassicalSign, CryptoError::signing_error))?;

        let pq_signature = with_signer(key.pq_algorithm(), Some(secret_key.as_bytes()), |signer| {
            signer.sign(digest)
        })
        .map_err(|e| at_stage(e, Stage::PostQuantumSign, CryptoError::signing_error))?;

        codec::combine(&classical_signature, &pq_signature)
    }

    fn hybrid_verify(
        &self,
        key: &HybridKeyPair,
        signature: &[u8],
        digest: &[u8],
        opts: Option<&SignerOpts>,
    ) -> CryptoResult<bool> {
        if digest.is_empty() {
            return Err(CryptoError::invalid_parameter("digest", "non-empty", "empty"));
        }
        let (classical_signature, pq_signature) = codec::parse(signature)?;

        let classical_valid = self
            .adapter
            .verify(key.classical(), classical_signature, digest, opts)
            .map_err(|e| at_stage(e, Stage::ClassicalVerify, CryptoError::verification_error))?;

        let pq_valid = with_signer(key.pq_algorithm(), None, |verifier| {
            verifier.verify(digest, pq_signature, key.pq_public_key())
        })
        .map_err(|e| at_stage(e, Stage::PostQuantumVerify, CryptoError::verification_error))?;

        if !(classical_valid && pq_valid) {
            log::debug!(
                "Hybrid signature rejected for key {} (classical: {}, post-quantum: {})",
                hex::encode(key.ski()),
                classical_valid,
                pq_valid
            );
        }
        Ok(classical_valid && pq_valid)
    }
}

impl<A: ClassicalSigningAdapter> Csp for HybridProvider<A> {
    fn key_gen(&self, opts: &KeyGenOpts) -> CryptoResult<Key> {
        if opts.is_symmetric() {
            log::debug!("Delegating {} key generation to the classical adapter", opts);
            return self.adapter.key_gen(opts).map(Key::Classical);
        }
        self.hybrid_key_gen(opts).map(Key::Hybrid)
    }

    fn key_deriv(&self, key: &Key, opts: &KeyDerivOpts) -> CryptoResult<Key> {
        match key {
            Key::Classical(key) => self.adapter.key_deriv(key, opts).map(Key::Classical),
            Key::Hybrid(_) => Err(CryptoError::invalid_key_type("key_deriv", "classical key")),
        }
    }

    fn key_import(&self, raw: &[u8], opts: &KeyImportOpts) -> CryptoResult<Key> {
        self.adapter.key_import(raw, opts).map(Key::Classical)
    }

    /// Always a `Key::Classical`: the post-quantum half is not persisted
    fn get_key(&self, ski: &[u8]) -> CryptoResult<Key> {
        self.adapter.get_key(ski).map(Key::Classical)
    }

    fn hash(&self, msg: &[u8], opts: &HashOpts) -> CryptoResult<Vec<u8>> {
        self.adapter.hash(msg, opts)
    }

    fn get_hash(&self, opts: &HashOpts) -> CryptoResult<Box<dyn DynDigest>> {
        self.adapter.get_hash(opts)
    }

    fn sign(&self, key: &Key, digest: &[u8], opts: Option<&SignerOpts>) -> CryptoResult<Vec<u8>> {
        match key {
            Key::Hybrid(key) => self.hybrid_sign(key, digest, opts),
            Key::Classical(key) => {
                log::debug!("Classical-only signature for key {}", hex::encode(key.ski()));
                self.adapter.sign(key, digest, opts)
            }
        }
    }

    fn verify(
        &self,
        key: &Key,
        signature: &[u8],
        digest: &[u8],
        opts: Option<&SignerOpts>,
    ) -> CryptoResult<bool> {
        match key {
            Key::Hybrid(key) => self.hybrid_verify(key, signature, digest, opts),
            Key::Classical(key) => {
                log::debug!("Classical-only verification for key {}", hex::encode(key.ski()));
                self.adapter.verify(key, signature, digest, opts)
            }
        }
    }

    fn encrypt(&self, key: &Key, plaintext: &[u8], opts: &EncrypterOpts) -> CryptoResult<Vec<u8>> {
        match key {
            Key::Classical(key) => self.adapter.encrypt(key, plaintext, opts),
            Key::Hybrid(_) => Err(CryptoError::invalid_key_type("encrypt", "symmetric classical key")),
        }
    }

    fn decrypt(&self, key: &Key, ciphertext: &[u8], opts: &DecrypterOpts) -> CryptoResult<Vec<u8>> {
        match key {
            Key::Classical(key) => self.adapter.decrypt(key, ciphertext, opts),
            Key::Hybrid(_) => Err(CryptoError::invalid_key_type("decrypt", "symmetric classical key")),
        }
    }
}

/// Tag an error with the stage it happened in, unless it already carries it
fn at_stage(err: CryptoError, stage: Stage, wrap: fn(Stage, &str) -> CryptoError) -> CryptoError {
    if err.stage() == Some(stage) {
        err
    } else {
        wrap(stage, &err.to_string())
    }
}
