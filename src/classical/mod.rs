/*!
 * Classical cryptography
 *
 * The adapter seam the hybrid provider delegates every classical operation
 * through, and a software implementation of it on `ring`, RustCrypto hashes,
 * AES-256-GCM and HKDF.
 */

mod key;
mod keystore;
mod software;

pub use key::{AesKey, ClassicalKey, EcdsaCurve, EcdsaPrivateKey, EcdsaPublicKey, AES_256_KEY_SIZE};
pub use keystore::{DummyKeyStore, InMemoryKeyStore, KeyStore};
pub use software::SoftwareAdapter;

use sha2::digest::DynDigest;

use crate::csp::{
    DecrypterOpts, EncrypterOpts, HashOpts, KeyDerivOpts, KeyGenOpts, KeyImportOpts, SignerOpts,
};
use crate::error::CryptoResult;

/// Classical signing backend of the hybrid provider.
///
/// Mirrors the provider operations over classical keys only. The hybrid
/// provider hands it the classical half of hybrid keys and every key it does
/// not recognize as hybrid.
pub trait ClassicalSigningAdapter: Send + Sync {
    fn key_gen(&self, opts: &KeyGenOpts) -> CryptoResult<ClassicalKey>;

    fn key_deriv(&self, key: &ClassicalKey, opts: &KeyDerivOpts) -> CryptoResult<ClassicalKey>;

    fn key_import(&self, raw: &[u8], opts: &KeyImportOpts) -> CryptoResult<ClassicalKey>;

    fn get_key(&self, ski: &[u8]) -> CryptoResult<ClassicalKey>;

    fn hash(&self, msg: &[u8], opts: &HashOpts) -> CryptoResult<Vec<u8>>;

    fn get_hash(&self, opts: &HashOpts) -> CryptoResult<Box<dyn DynDigest>>;

    fn sign(
        &self,
        key: &ClassicalKey,
        digest: &[u8],
        opts: Option<&SignerOpts>,
    ) -> CryptoResult<Vec<u8>>;

    fn verify(
        &self,
        key: &ClassicalKey,
        signature: &[u8],
        digest: &[u8],
        opts: Option<&SignerOpts>,
    ) -> CryptoResult<bool>;

    fn encrypt(
        &self,
        key: &ClassicalKey,
        plaintext: &[u8],
        opts: &EncrypterOpts,
    ) -> CryptoResult<Vec<u8>>;

    fn decrypt(
        &self,
        key: &ClassicalKey,
        ciphertext: &[u8],
        opts: &DecrypterOpts,
    ) -> CryptoResult<Vec<u8>>;
}

#[cfg(test)]
mod tests;
