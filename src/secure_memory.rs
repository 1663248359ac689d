//! Secure Memory Handling Utilities
//!
//! Containers for secret key material (ECDSA PKCS#8 documents, AES keys and
//! ML-DSA secret keys) that are zeroed when dropped and never printed.

use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A byte container for sensitive data that is zeroed when dropped.
///
/// Cloning produces an independent copy which zeroizes itself separately.
/// The `Debug` implementation only reports the length.
///
/// # Example
///
/// ```
/// use hybrid_csp::secure_memory::SecureBytes;
///
/// let key = SecureBytes::new(&[0x01, 0x02, 0x03, 0x04]);
/// assert_eq!(key.len(), 4);
/// // memory is zeroed when `key` goes out of scope
/// ```
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecureBytes {
    bytes: Vec<u8>,
}

impl SecureBytes {
    /// Create a new SecureBytes holding a copy of `data`
    pub fn new(data: &[u8]) -> Self {
        Self {
            bytes: data.to_vec(),
        }
    }

    /// Get a reference to the underlying bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl From<Vec<u8>> for SecureBytes {
    fn from(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }
}

impl From<&[u8]> for SecureBytes {
    fn from(data: &[u8]) -> Self {
        Self::new(data)
    }
}

impl AsRef<[u8]> for SecureBytes {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for SecureBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecureBytes")
            .field("len", &self.bytes.len())
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// Run `f` with access to `data` and zeroize `data` afterwards.
///
/// The data is zeroized on every exit path of the closure, including early
/// returns of a `Result` and unwinding panics.
///
/// # Example
///
/// ```
/// use hybrid_csp::secure_memory::with_secure_scope;
///
/// let mut okm = [0u8; 32];
/// let first = with_secure_scope(&mut okm, |k| {
///     k[0] = 7;
///     k[0]
/// });
/// assert_eq!(first, 7);
/// assert_eq!(okm, [0u8; 32]);
/// ```
pub fn with_secure_scope<T, F, R>(data: &mut T, f: F) -> R
where
    T: Zeroize,
    F: FnOnce(&mut T) -> R,
{
    struct ScopeGuard<'a, T: Zeroize> {
        data: &'a mut T,
    }

    impl<'a, T: Zeroize> Drop for ScopeGuard<'a, T> {
        fn drop(&mut self) {
            self.data.zeroize();
        }
    }

    let guard = ScopeGuard { data };
    f(&mut *guard.data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secure_bytes_debug_is_redacted() {
        let secret = SecureBytes::new(b"top secret key material");
        let printed = format!("{:?}", secret);
        assert!(printed.contains("REDACTED"));
        assert!(!printed.contains("top secret"));
    }

    #[test]
    fn test_secure_bytes_clone_is_independent() {
        let original = SecureBytes::from(vec![1u8, 2, 3]);
        let mut copy = original.clone();
        copy.zeroize();
        assert_eq!(original.as_bytes(), &[1, 2, 3]);
        assert!(copy.is_empty());
    }

    #[test]
    fn test_with_secure_scope_zeroizes_on_error() {
        let mut sensitive = vec![9u8; 16];
        let result: Result<(), &str> = with_secure_scope(&mut sensitive, |s| {
            assert_eq!(s[0], 9);
            Err("early exit")
        });
        assert!(result.is_err());
        assert!(sensitive.is_empty());
    }
}
