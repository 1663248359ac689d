/*!
 * Error Handling for the Hybrid Cryptographic Service Provider
 *
 * Provides error types with error codes, the failing stage of a hybrid
 * operation, and user-friendly messages. A negative verification result is
 * never an error: `verify` returns `Ok(false)` for a rejected signature and
 * reserves `Err` for signatures that could not be checked at all.
 */

use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Stage of a hybrid operation at which a failure occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    ClassicalKeyGeneration,
    PostQuantumKeyGeneration,
    ClassicalSign,
    PostQuantumSign,
    ClassicalVerify,
    PostQuantumVerify,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::ClassicalKeyGeneration => write!(f, "classical key generation"),
            Stage::PostQuantumKeyGeneration => write!(f, "post-quantum key generation"),
            Stage::ClassicalSign => write!(f, "classical sign"),
            Stage::PostQuantumSign => write!(f, "post-quantum sign"),
            Stage::ClassicalVerify => write!(f, "classical verify"),
            Stage::PostQuantumVerify => write!(f, "post-quantum verify"),
        }
    }
}

/// Error type for all provider operations
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("Key generation failed: {stage} - {cause}")]
    KeyGenerationError {
        stage: Stage,
        cause: String,
        error_code: u32,
    },

    #[error("Signing failed: {stage} - {cause}")]
    SigningError {
        stage: Stage,
        cause: String,
        error_code: u32,
    },

    #[error("Verification could not be performed: {stage} - {cause}")]
    VerificationError {
        stage: Stage,
        cause: String,
        error_code: u32,
    },

    #[error("Malformed signature: {reason}")]
    MalformedSignature { reason: String, error_code: u32 },

    #[error("Invalid key type for {operation}: expected {expected}")]
    InvalidKeyType {
        operation: String,
        expected: String,
        error_code: u32,
    },

    #[error("Invalid key material for {operation}: {cause}")]
    InvalidKeyMaterial {
        operation: String,
        cause: String,
        error_code: u32,
    },

    #[error("Post-quantum algorithm initialization failed: {algorithm} - {cause}")]
    AlgorithmInitError {
        algorithm: String,
        cause: String,
        error_code: u32,
    },

    #[error("Invalid signer state: {operation} not allowed in state {state}")]
    InvalidState {
        operation: String,
        state: String,
        error_code: u32,
    },

    #[error("Key derivation failed: {operation} - {cause}")]
    KeyDerivationError {
        operation: String,
        cause: String,
        error_code: u32,
    },

    #[error("Symmetric cipher operation failed: {operation} - {cause}")]
    EncryptionError {
        operation: String,
        cause: String,
        error_code: u32,
    },

    #[error("Key not found: {ski}")]
    KeyNotFound { ski: String, error_code: u32 },

    #[error("Invalid parameter: {parameter} - {expected} - got {actual}")]
    InvalidParameter {
        parameter: String,
        expected: String,
        actual: String,
        error_code: u32,
    },

    #[error("Operation not supported: {operation} - {reason}")]
    UnsupportedOperation {
        operation: String,
        reason: String,
        error_code: u32,
    },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(String),
}

/// Error code constants for different error categories
pub mod error_codes {
    // Key generation errors: 1000-1999
    pub const CLASSICAL_KEY_GENERATION_FAILED: u32 = 1001;
    pub const PQ_KEY_GENERATION_FAILED: u32 = 1002;

    // Signing errors: 2000-2999
    pub const CLASSICAL_SIGNING_FAILED: u32 = 2001;
    pub const PQ_SIGNING_FAILED: u32 = 2002;
    pub const SIGNATURE_TOO_LARGE: u32 = 2003;

    // Verification errors: 3000-3999
    pub const CLASSICAL_VERIFICATION_FAILED: u32 = 3001;
    pub const PQ_VERIFICATION_FAILED: u32 = 3002;
    pub const SIGNATURE_TOO_SHORT: u32 = 3003;
    pub const SIGNATURE_LENGTH_EXCEEDS_BUFFER: u32 = 3004;

    // Key errors: 4000-4999
    pub const INVALID_KEY_TYPE: u32 = 4001;
    pub const MISSING_PRIVATE_KEY: u32 = 4002;
    pub const INCONSISTENT_KEY_PAIR: u32 = 4003;
    pub const KEY_DERIVATION_FAILED: u32 = 4004;
    pub const KEY_NOT_FOUND: u32 = 4005;
    pub const KEY_IMPORT_FAILED: u32 = 4006;
    pub const KEY_STORE_FAILED: u32 = 4007;

    // Native library errors: 5000-5999
    pub const ALGORITHM_INIT_FAILED: u32 = 5001;
    pub const ALGORITHM_DISABLED: u32 = 5002;
    pub const INVALID_SECRET_KEY_SIZE: u32 = 5003;
    pub const SIGNER_ALREADY_KEYED: u32 = 5004;
    pub const SIGNER_CLEANED: u32 = 5005;

    // Symmetric errors: 6000-6999
    pub const ENCRYPTION_FAILED: u32 = 6001;
    pub const DECRYPTION_FAILED: u32 = 6002;

    // Parameter errors: 9000-9999
    pub const UNSUPPORTED_OPERATION: u32 = 9001;
    pub const INVALID_PARAMETER: u32 = 9999;
}

impl CryptoError {
    /// Get the numeric error code for this error
    pub fn error_code(&self) -> u32 {
        match self {
            CryptoError::KeyGenerationError { error_code, .. } => *error_code,
            CryptoError::SigningError { error_code, .. } => *error_code,
            CryptoError::VerificationError { error_code, .. } => *error_code,
            CryptoError::MalformedSignature { error_code, .. } => *error_code,
            CryptoError::InvalidKeyType { error_code, .. } => *error_code,
            CryptoError::InvalidKeyMaterial { error_code, .. } => *error_code,
            CryptoError::AlgorithmInitError { error_code, .. } => *error_code,
            CryptoError::InvalidState { error_code, .. } => *error_code,
            CryptoError::KeyDerivationError { error_code, .. } => *error_code,
            CryptoError::EncryptionError { error_code, .. } => *error_code,
            CryptoError::KeyNotFound { error_code, .. } => *error_code,
            CryptoError::InvalidParameter { error_code, .. } => *error_code,
            CryptoError::UnsupportedOperation { error_code, .. } => *error_code,
            CryptoError::ConfigError(_) => 9101,
            CryptoError::IoError(_) => 9102,
        }
    }

    /// The stage of a hybrid operation that failed, if the error carries one
    pub fn stage(&self) -> Option<Stage> {
        match self {
            CryptoError::KeyGenerationError { stage, .. }
            | CryptoError::SigningError { stage, .. }
            | CryptoError::VerificationError { stage, .. } => Some(*stage),
            _ => None,
        }
    }

    /// Get a user-friendly error message
    pub fn user_friendly_message(&self) -> String {
        match self {
            CryptoError::KeyGenerationError { stage, .. } => {
                format!("Key generation failed during {}. No key was created.", stage)
            }
            CryptoError::SigningError { stage, .. } => {
                format!("Signing failed during {}. No signature was produced.", stage)
            }
            CryptoError::VerificationError { stage, .. } => {
                format!(
                    "The signature could not be checked ({}). This is not the same as an invalid signature.",
                    stage
                )
            }
            CryptoError::MalformedSignature { .. } => {
                "The signature is not a well-formed hybrid signature.".to_string()
            }
            CryptoError::InvalidKeyType { operation, .. } => {
                format!("The key supplied to '{}' has the wrong type.", operation)
            }
            CryptoError::InvalidKeyMaterial { operation, .. } => {
                format!(
                    "The key supplied to '{}' lacks the required private material.",
                    operation
                )
            }
            CryptoError::AlgorithmInitError { algorithm, .. } => {
                format!(
                    "The post-quantum algorithm '{}' could not be initialized. Check the liboqs build.",
                    algorithm
                )
            }
            CryptoError::InvalidState { operation, .. } => {
                format!("'{}' was called on a signer in the wrong state.", operation)
            }
            CryptoError::KeyDerivationError { operation, .. } => {
                format!("Key derivation '{}' failed.", operation)
            }
            CryptoError::EncryptionError { operation, .. } => {
                format!("Symmetric operation '{}' failed.", operation)
            }
            CryptoError::KeyNotFound { .. } => {
                "No key with the requested identifier is stored.".to_string()
            }
            CryptoError::InvalidParameter {
                parameter,
                expected,
                ..
            } => format!("Invalid parameter '{}'. Expected {}.", parameter, expected),
            CryptoError::UnsupportedOperation { operation, .. } => {
                format!("Operation '{}' is not supported.", operation)
            }
            CryptoError::ConfigError(_) => {
                "Provider configuration is invalid. Check the BCCSP section.".to_string()
            }
            CryptoError::IoError(_) => {
                "Input/output operation failed. Check file permissions.".to_string()
            }
        }
    }

    /// Get technical details for debugging
    pub fn technical_details(&self) -> HashMap<String, String> {
        let mut details = HashMap::new();
        details.insert("error_code".to_string(), self.error_code().to_string());
        details.insert("error_type".to_string(), self.error_type().to_string());
        if let Some(stage) = self.stage() {
            details.insert("stage".to_string(), stage.to_string());
        }
        details.insert("message".to_string(), self.to_string());
        details
    }

    /// Get the error category/type as a string
    pub fn error_type(&self) -> &'static str {
        match self {
            CryptoError::KeyGenerationError { .. } => "KeyGenerationError",
            CryptoError::SigningError { .. } => "SigningError",
            CryptoError::VerificationError { .. } => "VerificationError",
            CryptoError::MalformedSignature { .. } => "MalformedSignatureError",
            CryptoError::InvalidKeyType { .. } => "InvalidKeyType",
            CryptoError::InvalidKeyMaterial { .. } => "InvalidKeyMaterial",
            CryptoError::AlgorithmInitError { .. } => "AlgorithmInitError",
            CryptoError::InvalidState { .. } => "InvalidStateError",
            CryptoError::KeyDerivationError { .. } => "KeyDerivationError",
            CryptoError::EncryptionError { .. } => "EncryptionError",
            CryptoError::KeyNotFound { .. } => "KeyNotFound",
            CryptoError::InvalidParameter { .. } => "InvalidParameter",
            CryptoError::UnsupportedOperation { .. } => "UnsupportedOperation",
            CryptoError::ConfigError(_) => "ConfigError",
            CryptoError::IoError(_) => "IoError",
        }
    }
}

/// Convenience constructors for common error types
impl CryptoError {
    pub fn key_generation_error(stage: Stage, cause: &str) -> Self {
        let error_code = match stage {
            Stage::PostQuantumKeyGeneration => error_codes::PQ_KEY_GENERATION_FAILED,
            _ => error_codes::CLASSICAL_KEY_GENERATION_FAILED,
        };
        CryptoError::KeyGenerationError {
            stage,
            cause: cause.to_string(),
            error_code,
        }
    }

    pub fn signing_error(stage: Stage, cause: &str) -> Self {
        let error_code = match stage {
            Stage::PostQuantumSign => error_codes::PQ_SIGNING_FAILED,
            _ => error_codes::CLASSICAL_SIGNING_FAILED,
        };
        CryptoError::SigningError {
            stage,
            cause: cause.to_string(),
            error_code,
        }
    }

    pub fn verification_error(stage: Stage, cause: &str) -> Self {
        let error_code = match stage {
            Stage::PostQuantumVerify => error_codes::PQ_VERIFICATION_FAILED,
            _ => error_codes::CLASSICAL_VERIFICATION_FAILED,
        };
        CryptoError::VerificationError {
            stage,
            cause: cause.to_string(),
            error_code,
        }
    }

    pub fn malformed_signature(reason: &str, error_code: u32) -> Self {
        CryptoError::MalformedSignature {
            reason: reason.to_string(),
            error_code,
        }
    }

    pub fn invalid_key_type(operation: &str, expected: &str) -> Self {
        CryptoError::InvalidKeyType {
            operation: operation.to_string(),
            expected: expected.to_string(),
            error_code: error_codes::INVALID_KEY_TYPE,
        }
    }

    pub fn invalid_key_material(operation: &str, cause: &str, error_code: u32) -> Self {
        CryptoError::InvalidKeyMaterial {
            operation: operation.to_string(),
            cause: cause.to_string(),
            error_code,
        }
    }

    pub fn algorithm_init_error(algorithm: &str, cause: &str, error_code: u32) -> Self {
        CryptoError::AlgorithmInitError {
            algorithm: algorithm.to_string(),
            cause: cause.to_string(),
            error_code,
        }
    }

    pub fn invalid_state(operation: &str, state: &str, error_code: u32) -> Self {
        CryptoError::InvalidState {
            operation: operation.to_string(),
            state: state.to_string(),
            error_code,
        }
    }

    pub fn key_derivation_error(operation: &str, cause: &str) -> Self {
        CryptoError::KeyDerivationError {
            operation: operation.to_string(),
            cause: cause.to_string(),
            error_code: error_codes::KEY_DERIVATION_FAILED,
        }
    }

    pub fn encryption_error(operation: &str, cause: &str, error_code: u32) -> Self {
        CryptoError::EncryptionError {
            operation: operation.to_string(),
            cause: cause.to_string(),
            error_code,
        }
    }

    pub fn key_not_found(ski: &[u8]) -> Self {
        CryptoError::KeyNotFound {
            ski: hex::encode(ski),
            error_code: error_codes::KEY_NOT_FOUND,
        }
    }

    pub fn invalid_parameter(parameter: &str, expected: &str, actual: &str) -> Self {
        CryptoError::InvalidParameter {
            parameter: parameter.to_string(),
            expected: expected.to_string(),
            actual: actual.to_string(),
            error_code: error_codes::INVALID_PARAMETER,
        }
    }

    pub fn unsupported_operation(operation: &str, reason: &str) -> Self {
        CryptoError::UnsupportedOperation {
            operation: operation.to_string(),
            reason: reason.to_string(),
            error_code: error_codes::UNSUPPORTED_OPERATION,
        }
    }
}

// From implementations for automatic error conversion
impl From<std::io::Error> for CryptoError {
    fn from(err: std::io::Error) -> Self {
        CryptoError::IoError(format!("IO operation failed: {}", err))
    }
}

impl From<serde_json::Error> for CryptoError {
    fn from(err: serde_json::Error) -> Self {
        CryptoError::ConfigError(err.to_string())
    }
}

/// Result type alias for provider operations
pub type CryptoResult<T> = Result<T, CryptoError>;
