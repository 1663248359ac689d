/*!
 * Hybrid Cryptographic Service Provider
 *
 * A cryptographic service provider that signs with a classical ECDSA key and
 * a post-quantum ML-DSA key at once. A hybrid signature is a single blob
 * holding both signatures and it verifies only when both halves verify.
 *
 * The pieces, leaves first:
 *
 * - `classical`: the classical adapter seam and its software implementation
 *   (ECDSA via `ring`, SHA-2/SHA-3, AES-256-GCM, HKDF)
 * - `pqc`: ML-DSA signing over liboqs with one native context per operation
 * - `hybrid::codec`: the combined signature wire format
 * - `hybrid`: the hybrid key pair, the provider facade and its factory
 * - `csp`: the provider trait, key variants and option types
 */

/// Common error types
pub mod error;

/// Zeroizing containers for secret bytes
pub mod secure_memory;

/// Provider configuration
pub mod config;

/// Post-quantum signatures
pub mod pqc;

/// Classical adapter
pub mod classical;

/// Provider interface
pub mod csp;

/// Hybrid signatures and the provider facade
pub mod hybrid;

pub use config::{FactoryOpts, HybridOpts, SwOpts};
pub use csp::{Csp, Key};
pub use error::{CryptoError, CryptoResult};
pub use hybrid::{HybridFactory, HybridKeyPair, HybridProvider};
pub use pqc::PqAlgorithm;

/// Initialize the native post-quantum library.
///
/// Calling it more than once is harmless. Operations initialize liboqs
/// lazily as well, so this only moves the one-time setup cost to a known
/// point such as process start.
///
/// # Example
///
/// ```
/// use hybrid_csp::prelude::*;
///
/// fn main() -> Result<(), CryptoError> {
///     init()?;
///
///     let provider = HybridFactory::new().get(&FactoryOpts::default())?;
///     let key = provider.key_gen(&KeyGenOpts::Ecdsa { temporary: true })?;
///     let digest = provider.hash(b"proposal", &HashOpts::Sha256)?;
///     let signature = provider.sign(&key, &digest, None)?;
///     assert!(provider.verify(&key.public_key()?, &signature, &digest, None)?);
///     Ok(())
/// }
/// ```
pub fn init() -> Result<(), CryptoError> {
    oqs::init();
    log::debug!("liboqs initialized");
    Ok(())
}

/// The types most callers need
pub mod prelude {
    pub use crate::classical::{ClassicalKey, ClassicalSigningAdapter, SoftwareAdapter};
    pub use crate::config::{FactoryOpts, HashFamily, HybridOpts, SwOpts};
    pub use crate::csp::{
        Csp, DecrypterOpts, EncrypterOpts, HashOpts, Key, KeyDerivOpts, KeyGenOpts, KeyImportOpts,
        SignerOpts,
    };
    pub use crate::error::{CryptoError, CryptoResult, Stage};
    pub use crate::hybrid::{HybridFactory, HybridKeyPair, HybridProvider};
    pub use crate::init;
    pub use crate::pqc::PqAlgorithm;
    pub use crate::secure_memory::SecureBytes;
}
