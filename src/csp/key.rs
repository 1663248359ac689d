use crate::classical::ClassicalKey;
use crate::error::CryptoResult;
use crate::hybrid::HybridKeyPair;

/// A key handled by the provider.
///
/// The provider never guesses what a key is from its contents: it branches on
/// this tag. `Classical` keys take the classical-only fallback path in
/// `sign`/`verify`, `Hybrid` keys take the dual-signature path.
#[derive(Debug, Clone)]
pub enum Key {
    Classical(ClassicalKey),
    Hybrid(HybridKeyPair),
}

impl Key {
    /// Whether this key carries a post-quantum component
    pub fn has_post_quantum_component(&self) -> bool {
        match self {
            Key::Classical(key) => key.has_post_quantum_component(),
            Key::Hybrid(key) => key.has_post_quantum_component(),
        }
    }

    /// Subject key identifier
    pub fn ski(&self) -> Vec<u8> {
        match self {
            Key::Classical(key) => key.ski(),
            Key::Hybrid(key) => key.ski(),
        }
    }

    pub fn bytes(&self) -> CryptoResult<Vec<u8>> {
        match self {
            Key::Classical(key) => key.bytes(),
            Key::Hybrid(key) => key.bytes(),
        }
    }

    pub fn symmetric(&self) -> bool {
        match self {
            Key::Classical(key) => key.symmetric(),
            Key::Hybrid(key) => key.symmetric(),
        }
    }

    pub fn private(&self) -> bool {
        match self {
            Key::Classical(key) => key.private(),
            Key::Hybrid(key) => key.private(),
        }
    }

    /// Public projection of this key, keeping its variant
    pub fn public_key(&self) -> CryptoResult<Key> {
        match self {
            Key::Classical(key) => key.public_key().map(Key::Classical),
            Key::Hybrid(key) => key.public_key().map(Key::Hybrid),
        }
    }

    pub fn as_hybrid(&self) -> Option<&HybridKeyPair> {
        match self {
            Key::Hybrid(key) => Some(key),
            Key::Classical(_) => None,
        }
    }

    pub fn as_classical(&self) -> Option<&ClassicalKey> {
        match self {
            Key::Classical(key) => Some(key),
            Key::Hybrid(_) => None,
        }
    }
}

impl From<ClassicalKey> for Key {
    fn from(key: ClassicalKey) -> Self {
        Key::Classical(key)
    }
}

impl From<HybridKeyPair> for Key {
    fn from(key: HybridKeyPair) -> Self {
        Key::Hybrid(key)
    }
}
