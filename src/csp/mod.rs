/*!
 * Cryptographic service provider interface
 *
 * The ten operations a host runtime calls on a provider, the tagged key value
 * they operate on, and their option types.
 */

mod key;
mod opts;

pub use key::Key;
pub use opts::{
    DecrypterOpts, EncrypterOpts, HashOpts, KeyDerivOpts, KeyGenOpts, KeyImportOpts, SignerOpts,
};

use sha2::digest::DynDigest;

use crate::error::CryptoResult;

/// A cryptographic service provider.
///
/// Implementations are shared by reference between threads; every operation
/// takes `&self`.
pub trait Csp: Send + Sync {
    /// Generate a key
    fn key_gen(&self, opts: &KeyGenOpts) -> CryptoResult<Key>;

    /// Derive a key from `key`
    fn key_deriv(&self, key: &Key, opts: &KeyDerivOpts) -> CryptoResult<Key>;

    /// Import a key from its raw representation
    fn key_import(&self, raw: &[u8], opts: &KeyImportOpts) -> CryptoResult<Key>;

    /// Look a stored key up by its subject key identifier.
    ///
    /// The hybrid provider persists only the classical half of a hybrid key,
    /// so this returns a `Key::Classical` for a hybrid SKI. Signing with it
    /// yields a classical-only signature, which does not verify against the
    /// hybrid public key. Hosts that need the hybrid identity back must keep
    /// the `HybridKeyPair` returned by `key_gen`.
    fn get_key(&self, ski: &[u8]) -> CryptoResult<Key>;

    fn hash(&self, msg: &[u8], opts: &HashOpts) -> CryptoResult<Vec<u8>>;

    /// Incremental hasher for the selected function
    fn get_hash(&self, opts: &HashOpts) -> CryptoResult<Box<dyn DynDigest>>;

    /// Sign a digest
    fn sign(&self, key: &Key, digest: &[u8], opts: Option<&SignerOpts>) -> CryptoResult<Vec<u8>>;

    /// Verify a signature over a digest.
    ///
    /// `Ok(false)` means the signature was checked and rejected; `Err` means
    /// it could not be checked.
    fn verify(
        &self,
        key: &Key,
        signature: &[u8],
        digest: &[u8],
        opts: Option<&SignerOpts>,
    ) -> CryptoResult<bool>;

    fn encrypt(&self, key: &Key, plaintext: &[u8], opts: &EncrypterOpts) -> CryptoResult<Vec<u8>>;

    fn decrypt(&self, key: &Key, ciphertext: &[u8], opts: &DecrypterOpts) -> CryptoResult<Vec<u8>>;
}
