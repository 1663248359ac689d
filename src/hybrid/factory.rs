use super::HybridProvider;
use crate::config::{FactoryOpts, PROVIDER_NAME};
use crate::error::{CryptoError, CryptoResult};

/// Builds hybrid providers from configuration.
///
/// The host keeps the returned provider and passes it where it is needed;
/// nothing is registered globally. [`name`](Self::name) is what a host plugin
/// boundary matches the configured provider name against.
#[derive(Debug, Default, Clone, Copy)]
pub struct HybridFactory;

impl HybridFactory {
    pub fn new() -> Self {
        Self
    }

    /// Provider name this factory answers to
    pub fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    /// Validate `opts` and construct a provider from its `Hybrid` block
    pub fn get(&self, opts: &FactoryOpts) -> CryptoResult<HybridProvider> {
        opts.validate()?;
        let hybrid = opts
            .hybrid
            .as_ref()
            .ok_or_else(|| CryptoError::ConfigError("missing Hybrid configuration block".to_string()))?;
        let provider = HybridProvider::new(hybrid)?;
        log::info!(
            "{} provider created (security {}, ephemeral {})",
            self.name(),
            hybrid.sw.security,
            hybrid.sw.ephemeral
        );
        Ok(provider)
    }
}
