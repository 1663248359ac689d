use std::fmt;

use oqs::sig::Algorithm;
use serde::{Deserialize, Serialize};

/// ML-DSA (FIPS 204) parameter sets usable as the post-quantum half of a hybrid key
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum PqAlgorithm {
    /// ML-DSA-44 (NIST security category 2)
    MlDsa44,
    /// ML-DSA-65 (NIST security category 3, the Dilithium3 successor)
    #[default]
    MlDsa65,
    /// ML-DSA-87 (NIST security category 5)
    MlDsa87,
}

impl fmt::Display for PqAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl PqAlgorithm {
    pub const ALL: [PqAlgorithm; 3] = [
        PqAlgorithm::MlDsa44,
        PqAlgorithm::MlDsa65,
        PqAlgorithm::MlDsa87,
    ];

    /// The liboqs identifier of this algorithm
    pub fn name(&self) -> &'static str {
        match self {
            PqAlgorithm::MlDsa44 => "ML-DSA-44",
            PqAlgorithm::MlDsa65 => "ML-DSA-65",
            PqAlgorithm::MlDsa87 => "ML-DSA-87",
        }
    }

    /// Look up an algorithm by its liboqs identifier (case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|alg| alg.name().eq_ignore_ascii_case(name.trim()))
    }

    pub(crate) fn oqs_algorithm(&self) -> Algorithm {
        match self {
            PqAlgorithm::MlDsa44 => Algorithm::MlDsa44,
            PqAlgorithm::MlDsa65 => Algorithm::MlDsa65,
            PqAlgorithm::MlDsa87 => Algorithm::MlDsa87,
        }
    }

    /// Get the security category of this parameter set
    pub fn security_level(&self) -> u8 {
        match self {
            PqAlgorithm::MlDsa44 => 2,
            PqAlgorithm::MlDsa65 => 3,
            PqAlgorithm::MlDsa87 => 5,
        }
    }

    /// Get the public key size for this algorithm in bytes
    pub fn public_key_size(&self) -> usize {
        match self {
            PqAlgorithm::MlDsa44 => 1312,
            PqAlgorithm::MlDsa65 => 1952,
            PqAlgorithm::MlDsa87 => 2592,
        }
    }

    /// Get the secret key size for this algorithm in bytes
    pub fn secret_key_size(&self) -> usize {
        match self {
            PqAlgorithm::MlDsa44 => 2560,
            PqAlgorithm::MlDsa65 => 4032,
            PqAlgorithm::MlDsa87 => 4896,
        }
    }

    /// Get the signature size for this algorithm in bytes
    pub fn signature_size(&self) -> usize {
        match self {
            PqAlgorithm::MlDsa44 => 2420,
            PqAlgorithm::MlDsa65 => 3309,
            PqAlgorithm::MlDsa87 => 4627,
        }
    }
}
