use std::fmt;

use oqs::sig::Sig;

use crate::error::{error_codes, CryptoError, CryptoResult, Stage};
use crate::pqc::PqAlgorithm;
use crate::secure_memory::SecureBytes;

/// Lifecycle state of a [`PostQuantumSigner`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignerState {
    /// Native context allocated, no private key held
    PublicOnly,
    /// Native context allocated and a private key is held
    WithPrivateKey,
    /// Native context released; the signer can no longer be used
    Cleaned,
}

impl fmt::Display for SignerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignerState::PublicOnly => write!(f, "PublicOnly"),
            SignerState::WithPrivateKey => write!(f, "WithPrivateKey"),
            SignerState::Cleaned => write!(f, "Cleaned"),
        }
    }
}

/// Owner of one native liboqs signature context.
///
/// A signer is created by [`PostQuantumSigner::init`], optionally loaded with
/// a private key, and released by [`PostQuantumSigner::clean`]. `clean` is
/// idempotent and is also run on drop, so the native context is freed on
/// every exit path of the code that created it. A signer is never shared
/// between threads; callers build a fresh one per operation.
pub struct PostQuantumSigner {
    algorithm: PqAlgorithm,
    sig: Option<Sig>,
    secret_key: Option<SecureBytes>,
    public_key: Option<Vec<u8>>,
    state: SignerState,
}

impl fmt::Debug for PostQuantumSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostQuantumSigner")
            .field("algorithm", &self.algorithm)
            .field("state", &self.state)
            .field("secret_key", &self.secret_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl Drop for PostQuantumSigner {
    fn drop(&mut self) {
        self.clean();
    }
}

/// Map a liboqs context allocation failure, keeping "disabled at build time" apart
pub(super) fn init_error(algorithm: PqAlgorithm, err: oqs::Error) -> CryptoError {
    let error_code = match err {
        oqs::Error::AlgorithmDisabled => error_codes::ALGORITHM_DISABLED,
        _ => error_codes::ALGORITHM_INIT_FAILED,
    };
    CryptoError::algorithm_init_error(algorithm.name(), &err.to_string(), error_code)
}

impl PostQuantumSigner {
    /// Allocate a native context for `algorithm`
    ///
    /// # Arguments
    ///
    /// * `algorithm` - The ML-DSA parameter set
    /// * `secret_key` - Optional previously exported private key to load
    ///
    /// # Returns
    ///
    /// An initialized signer, or `AlgorithmInitError` if liboqs rejects the
    /// algorithm (e.g. it was disabled at build time) or the key bytes
    pub fn init(algorithm: PqAlgorithm, secret_key: Option<&[u8]>) -> CryptoResult<Self> {
        let sig = Sig::new(algorithm.oqs_algorithm()).map_err(|e| init_error(algorithm, e))?;

        let (secret_key, state) = match secret_key {
            Some(bytes) => {
                if sig.secret_key_from_bytes(bytes).is_none() {
                    return Err(CryptoError::algorithm_init_error(
                        algorithm.name(),
                        &format!(
                            "secret key must be {} bytes, got {}",
                            algorithm.secret_key_size(),
                            bytes.len()
                        ),
                        error_codes::INVALID_SECRET_KEY_SIZE,
                    ));
                }
                (Some(SecureBytes::new(bytes)), SignerState::WithPrivateKey)
            }
            None => (None, SignerState::PublicOnly),
        };

        log::trace!("Initialized {} context ({})", algorithm, state);

        Ok(Self {
            algorithm,
            sig: Some(sig),
            secret_key,
            public_key: None,
            state,
        })
    }

    /// Like [`PostQuantumSigner::init`] but takes the liboqs algorithm name
    pub fn init_by_name(name: &str, secret_key: Option<&[u8]>) -> CryptoResult<Self> {
        let algorithm = PqAlgorithm::from_name(name).ok_or_else(|| {
            CryptoError::algorithm_init_error(
                name,
                "unknown or unsupported signature algorithm",
                error_codes::ALGORITHM_INIT_FAILED,
            )
        })?;
        Self::init(algorithm, secret_key)
    }

    pub fn algorithm(&self) -> PqAlgorithm {
        self.algorithm
    }

    pub fn state(&self) -> SignerState {
        self.state
    }

    /// Public key produced by [`PostQuantumSigner::generate_key_pair`], if any
    pub fn public_key(&self) -> Option<&[u8]> {
        self.public_key.as_deref()
    }

    fn context(&self, operation: &str) -> CryptoResult<&Sig> {
        self.sig.as_ref().ok_or_else(|| {
            CryptoError::invalid_state(
                operation,
                &self.state.to_string(),
                error_codes::SIGNER_CLEANED,
            )
        })
    }

    /// Generate a key pair, retain the private key and return the public key
    ///
    /// Only valid on a signer that holds no key material yet; a second call,
    /// or a call on a signer initialized with a private key, fails with
    /// `InvalidState`.
    pub fn generate_key_pair(&mut self) -> CryptoResult<Vec<u8>> {
        let (public_key, secret_key) = {
            let sig = self.context("generate_key_pair")?;
            if self.state != SignerState::PublicOnly {
                return Err(CryptoError::invalid_state(
                    "generate_key_pair",
                    &self.state.to_string(),
                    error_codes::SIGNER_ALREADY_KEYED,
                ));
            }
            sig.keypair().map_err(|e| {
                CryptoError::key_generation_error(
                    Stage::PostQuantumKeyGeneration,
                    &e.to_string(),
                )
            })?
        };

        let public_key = public_key.into_vec();
        self.secret_key = Some(SecureBytes::from(secret_key.into_vec()));
        self.public_key = Some(public_key.clone());
        self.state = SignerState::WithPrivateKey;
        Ok(public_key)
    }

    /// Copy out the private key held by this signer
    pub fn export_secret_key(&self) -> CryptoResult<SecureBytes> {
        self.context("export_secret_key")?;
        self.secret_key.clone().ok_or_else(|| {
            CryptoError::invalid_key_material(
                "export_secret_key",
                "signer holds no private key",
                error_codes::MISSING_PRIVATE_KEY,
            )
        })
    }

    /// Sign a message with the held private key
    ///
    /// # Arguments
    ///
    /// * `message` - The message (a digest, for the hybrid provider) to sign
    ///
    /// # Returns
    ///
    /// The signature, `InvalidKeyMaterial` if no private key is held, or
    /// `SigningError` wrapping a native failure
    pub fn sign(&self, message: &[u8]) -> CryptoResult<Vec<u8>> {
        let sig = self.context("sign")?;
        let secret = self.secret_key.as_ref().ok_or_else(|| {
            CryptoError::invalid_key_material(
                "post-quantum sign",
                "signer holds no private key",
                error_codes::MISSING_PRIVATE_KEY,
            )
        })?;

        let sk = sig.secret_key_from_bytes(secret.as_bytes()).ok_or_else(|| {
            CryptoError::signing_error(
                Stage::PostQuantumSign,
                "secret key rejected by the native library",
            )
        })?;

        let signature = sig
            .sign(message, sk)
            .map_err(|e| CryptoError::signing_error(Stage::PostQuantumSign, &e.to_string()))?;

        Ok(signature.into_vec())
    }

    /// Verify a signature against an explicit public key
    ///
    /// Does not need a private key. Returns `Ok(false)` for a signature that
    /// does not verify, and `VerificationError` when the check cannot run
    /// (malformed public key, released context).
    pub fn verify(&self, message: &[u8], signature: &[u8], public_key: &[u8]) -> CryptoResult<bool> {
        let sig = self.context("verify")?;

        let pk = sig.public_key_from_bytes(public_key).ok_or_else(|| {
            CryptoError::verification_error(
                Stage::PostQuantumVerify,
                &format!(
                    "{} public key must be {} bytes, got {}",
                    self.algorithm,
                    self.algorithm.public_key_size(),
                    public_key.len()
                ),
            )
        })?;

        let sig_obj = match sig.signature_from_bytes(signature) {
            Some(s) => s,
            None => {
                log::debug!(
                    "{} signature rejected: length {} exceeds maximum",
                    self.algorithm,
                    signature.len()
                );
                return Ok(false);
            }
        };

        match sig.verify(message, sig_obj, pk) {
            Ok(()) => Ok(true),
            Err(e) => {
                log::debug!("{} signature rejected: {}", self.algorithm, e);
                Ok(false)
            }
        }
    }

    /// Release the native context and zeroize any held private key
    ///
    /// Safe to call more than once.
    pub fn clean(&mut self) {
        if self.state == SignerState::Cleaned {
            return;
        }
        self.sig = None;
        self.secret_key = None;
        self.state = SignerState::Cleaned;
        log::trace!("Released {} context", self.algorithm);
    }
}

/// Run `f` with a freshly initialized signer that is cleaned afterwards.
///
/// The signer is released whether `f` succeeds, returns an error, or panics.
pub fn with_signer<F, R>(algorithm: PqAlgorithm, secret_key: Option<&[u8]>, f: F) -> CryptoResult<R>
where
    F: FnOnce(&mut PostQuantumSigner) -> CryptoResult<R>,
{
    let mut signer = PostQuantumSigner::init(algorithm, secret_key)?;
    let result = f(&mut signer);
    signer.clean();
    result
}
