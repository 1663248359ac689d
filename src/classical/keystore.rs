use std::collections::HashMap;
use std::sync::RwLock;

use super::ClassicalKey;
use crate::error::{error_codes, CryptoError, CryptoResult};

/// Storage for classical keys indexed by SKI
pub trait KeyStore: Send + Sync {
    fn get_key(&self, ski: &[u8]) -> CryptoResult<ClassicalKey>;

    fn store_key(&self, key: &ClassicalKey) -> CryptoResult<()>;
}

/// Process-local key store.
///
/// A private key and its public projection share an SKI; once a private key
/// is stored a later public key with the same SKI does not replace it.
#[derive(Default)]
pub struct InMemoryKeyStore {
    keys: RwLock<HashMap<Vec<u8>, ClassicalKey>>,
}

impl InMemoryKeyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.keys.read().map(|keys| keys.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyStore for InMemoryKeyStore {
    fn get_key(&self, ski: &[u8]) -> CryptoResult<ClassicalKey> {
        let keys = self.keys.read().map_err(|_| {
            CryptoError::invalid_state("get_key", "key store lock poisoned", error_codes::KEY_STORE_FAILED)
        })?;
        keys.get(ski)
            .cloned()
            .ok_or_else(|| CryptoError::key_not_found(ski))
    }

    fn store_key(&self, key: &ClassicalKey) -> CryptoResult<()> {
        let mut keys = self.keys.write().map_err(|_| {
            CryptoError::invalid_state("store_key", "key store lock poisoned", error_codes::KEY_STORE_FAILED)
        })?;
        let ski = key.ski();
        let keep_existing = !key.private() && keys.get(&ski).map_or(false, ClassicalKey::private);
        if !keep_existing {
            log::debug!("Stored {} key {}", key.algorithm(), hex::encode(&ski));
            keys.insert(ski, key.clone());
        }
        Ok(())
    }
}

/// Store used in ephemeral mode: accepts every key and retains none
#[derive(Debug, Default, Clone, Copy)]
pub struct DummyKeyStore;

impl KeyStore for DummyKeyStore {
    fn get_key(&self, ski: &[u8]) -> CryptoResult<ClassicalKey> {
        Err(CryptoError::key_not_found(ski))
    }

    fn store_key(&self, _key: &ClassicalKey) -> CryptoResult<()> {
        Ok(())
    }
}
