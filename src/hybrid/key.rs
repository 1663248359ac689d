use std::fmt;

use crate::classical::ClassicalKey;
use crate::error::{error_codes, CryptoError, CryptoResult};
use crate::pqc::PqAlgorithm;
use crate::secure_memory::SecureBytes;

/// A classical key and an ML-DSA key bound into one identity.
///
/// The SKI and `bytes()` come from the classical half only. The post-quantum
/// private key is kept as raw secret bytes and loaded into a fresh signer for
/// each signing operation.
#[derive(Clone)]
pub struct HybridKeyPair {
    classical: ClassicalKey,
    pq_algorithm: PqAlgorithm,
    pq_public_key: Vec<u8>,
    pq_secret_key: Option<SecureBytes>,
}

impl HybridKeyPair {
    /// Bind a classical key to a post-quantum key pair.
    ///
    /// Both halves must agree on whether private material is present.
    pub fn new(
        classical: ClassicalKey,
        pq_algorithm: PqAlgorithm,
        pq_public_key: Vec<u8>,
        pq_secret_key: Option<SecureBytes>,
    ) -> CryptoResult<Self> {
        if classical.symmetric() {
            return Err(CryptoError::invalid_key_type(
                "hybrid key construction",
                "asymmetric classical key",
            ));
        }
        if pq_public_key.len() != pq_algorithm.public_key_size() {
            return Err(CryptoError::invalid_parameter(
                "pq_public_key",
                &format!("{} bytes for {}", pq_algorithm.public_key_size(), pq_algorithm),
                &format!("{} bytes", pq_public_key.len()),
            ));
        }
        if let Some(secret) = &pq_secret_key {
            if secret.len() != pq_algorithm.secret_key_size() {
                return Err(CryptoError::invalid_parameter(
                    "pq_secret_key",
                    &format!("{} bytes for {}", pq_algorithm.secret_key_size(), pq_algorithm),
                    &format!("{} bytes", secret.len()),
                ));
            }
        }
        if classical.private() != pq_secret_key.is_some() {
            return Err(CryptoError::invalid_key_material(
                "hybrid key construction",
                "classical and post-quantum private material disagree",
                error_codes::INCONSISTENT_KEY_PAIR,
            ));
        }

        Ok(Self {
            classical,
            pq_algorithm,
            pq_public_key,
            pq_secret_key,
        })
    }

    /// Public-only hybrid key from a peer's published components
    pub fn from_public_components(
        classical: ClassicalKey,
        pq_algorithm: PqAlgorithm,
        pq_public_key: &[u8],
    ) -> CryptoResult<Self> {
        if classical.private() {
            return Err(CryptoError::invalid_key_type(
                "hybrid public key construction",
                "classical public key",
            ));
        }
        Self::new(classical, pq_algorithm, pq_public_key.to_vec(), None)
    }

    /// Copy of this key with private material stripped from both halves
    pub fn public_key(&self) -> CryptoResult<Self> {
        let classical = self.classical.public_key().map_err(|e| {
            CryptoError::key_derivation_error("public key projection", &e.to_string())
        })?;
        Ok(Self {
            classical,
            pq_algorithm: self.pq_algorithm,
            pq_public_key: self.pq_public_key.clone(),
            pq_secret_key: None,
        })
    }

    pub fn ski(&self) -> Vec<u8> {
        self.classical.ski()
    }

    pub fn bytes(&self) -> CryptoResult<Vec<u8>> {
        self.classical.bytes()
    }

    pub fn private(&self) -> bool {
        self.classical.private()
    }

    pub fn symmetric(&self) -> bool {
        false
    }

    /// Whether the post-quantum private key is present, i.e. the key can sign
    pub fn has_post_quantum_private_key(&self) -> bool {
        self.pq_secret_key.is_some()
    }

    pub fn has_post_quantum_component(&self) -> bool {
        true
    }

    pub fn classical(&self) -> &ClassicalKey {
        &self.classical
    }

    pub fn pq_algorithm(&self) -> PqAlgorithm {
        self.pq_algorithm
    }

    pub fn pq_public_key(&self) -> &[u8] {
        &self.pq_public_key
    }

    pub(crate) fn pq_secret_key(&self) -> Option<&SecureBytes> {
        self.pq_secret_key.as_ref()
    }
}

impl fmt::Debug for HybridKeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HybridKeyPair")
            .field("classical", &self.classical)
            .field("pq_algorithm", &self.pq_algorithm)
            .field("ski", &hex::encode(self.ski()))
            .field("pq_private", &self.has_post_quantum_private_key())
            .finish()
    }
}
