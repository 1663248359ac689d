/*!
 * Provider Configuration
 *
 * The host hands the provider a configuration value shaped like the BCCSP
 * section of a Fabric `core.yaml`: a provider name plus a `Hybrid` block that
 * nests the software classical adapter's own `SW` block.
 */

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CryptoError, CryptoResult};
use crate::pqc::PqAlgorithm;

/// Name under which the hybrid provider is selected
pub const PROVIDER_NAME: &str = "HYBRID";

/// Hash family used by the software adapter for default hashing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HashFamily {
    #[serde(rename = "SHA2")]
    Sha2,
    #[serde(rename = "SHA3")]
    Sha3,
}

impl fmt::Display for HashFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HashFamily::Sha2 => write!(f, "SHA2"),
            HashFamily::Sha3 => write!(f, "SHA3"),
        }
    }
}

/// Configuration of the software classical adapter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct SwOpts {
    /// Hash family for `HashOpts::Default`
    pub hash: HashFamily,
    /// Security level in bits; selects both the default hash size and the
    /// curve for `KeyGenOpts::Ecdsa` (256 -> P-256, 384 -> P-384)
    pub security: u16,
    /// When true, non-temporary keys are not retained and `get_key` finds nothing
    pub ephemeral: bool,
}

impl Default for SwOpts {
    fn default() -> Self {
        Self {
            hash: HashFamily::Sha2,
            security: 256,
            ephemeral: true,
        }
    }
}

impl SwOpts {
    pub fn validate(&self) -> CryptoResult<()> {
        match self.security {
            256 | 384 => Ok(()),
            other => Err(CryptoError::ConfigError(format!(
                "unsupported security level {} (expected 256 or 384)",
                other
            ))),
        }
    }
}

/// Configuration of the hybrid provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct HybridOpts {
    /// liboqs name of the post-quantum signature algorithm
    pub pq_algorithm: String,
    /// Configuration handed to the classical adapter
    #[serde(rename = "SW")]
    pub sw: SwOpts,
}

impl Default for HybridOpts {
    fn default() -> Self {
        Self {
            pq_algorithm: PqAlgorithm::default().name().to_string(),
            sw: SwOpts::default(),
        }
    }
}

impl HybridOpts {
    /// Resolve the configured post-quantum algorithm
    pub fn algorithm(&self) -> CryptoResult<PqAlgorithm> {
        PqAlgorithm::from_name(&self.pq_algorithm).ok_or_else(|| {
            CryptoError::ConfigError(format!(
                "unknown post-quantum algorithm '{}'",
                self.pq_algorithm
            ))
        })
    }

    pub fn validate(&self) -> CryptoResult<()> {
        self.algorithm()?;
        self.sw.validate()
    }
}

/// Top-level provider selection and configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct FactoryOpts {
    /// Name of the provider the host wants
    pub default: String,
    pub hybrid: Option<HybridOpts>,
}

impl Default for FactoryOpts {
    fn default() -> Self {
        Self {
            default: PROVIDER_NAME.to_string(),
            hybrid: Some(HybridOpts::default()),
        }
    }
}

impl FactoryOpts {
    /// Parse a configuration from JSON
    ///
    /// # Arguments
    ///
    /// * `json` - JSON text with `Default` and `Hybrid` keys
    ///
    /// # Returns
    ///
    /// The validated configuration or a `ConfigError`
    pub fn from_json(json: &str) -> CryptoResult<Self> {
        let opts: FactoryOpts = serde_json::from_str(json)?;
        opts.validate()?;
        Ok(opts)
    }

    /// Read and parse a JSON configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> CryptoResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    pub fn validate(&self) -> CryptoResult<()> {
        if !self.default.eq_ignore_ascii_case(PROVIDER_NAME) {
            return Err(CryptoError::ConfigError(format!(
                "provider '{}' requested, this factory provides '{}'",
                self.default, PROVIDER_NAME
            )));
        }
        match &self.hybrid {
            Some(hybrid) => hybrid.validate(),
            None => Err(CryptoError::ConfigError(
                "missing Hybrid configuration block".to_string(),
            )),
        }
    }
}
