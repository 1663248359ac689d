//! Option values accepted by the provider operations

use std::fmt;

/// Key generation options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyGenOpts {
    /// ECDSA on the curve matching the configured security level
    Ecdsa { temporary: bool },
    /// ECDSA over NIST P-256
    EcdsaP256 { temporary: bool },
    /// ECDSA over NIST P-384
    EcdsaP384 { temporary: bool },
    /// 256-bit AES key
    Aes256 { temporary: bool },
}

impl KeyGenOpts {
    /// Temporary keys are never written to the key store
    pub fn temporary(&self) -> bool {
        match self {
            KeyGenOpts::Ecdsa { temporary }
            | KeyGenOpts::EcdsaP256 { temporary }
            | KeyGenOpts::EcdsaP384 { temporary }
            | KeyGenOpts::Aes256 { temporary } => *temporary,
        }
    }

    pub fn is_symmetric(&self) -> bool {
        matches!(self, KeyGenOpts::Aes256 { .. })
    }
}

impl fmt::Display for KeyGenOpts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyGenOpts::Ecdsa { .. } => write!(f, "ECDSA"),
            KeyGenOpts::EcdsaP256 { .. } => write!(f, "ECDSA-P256"),
            KeyGenOpts::EcdsaP384 { .. } => write!(f, "ECDSA-P384"),
            KeyGenOpts::Aes256 { .. } => write!(f, "AES-256"),
        }
    }
}

/// Key import options; each variant fixes how the raw bytes are read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyImportOpts {
    /// PKCS#8 DER encoded ECDSA private key (P-256 or P-384)
    EcdsaPkcs8PrivateKey { temporary: bool },
    /// Uncompressed SEC1 point; the curve follows from the length
    EcdsaPublicKey { temporary: bool },
    /// Raw 32-byte AES key
    Aes256 { temporary: bool },
}

impl KeyImportOpts {
    pub fn temporary(&self) -> bool {
        match self {
            KeyImportOpts::EcdsaPkcs8PrivateKey { temporary }
            | KeyImportOpts::EcdsaPublicKey { temporary }
            | KeyImportOpts::Aes256 { temporary } => *temporary,
        }
    }
}

/// Key derivation options
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyDerivOpts {
    /// HKDF-SHA256 expansion of a symmetric key with the given info string
    HkdfSha256 { info: Vec<u8>, temporary: bool },
}

impl KeyDerivOpts {
    pub fn temporary(&self) -> bool {
        match self {
            KeyDerivOpts::HkdfSha256 { temporary, .. } => *temporary,
        }
    }
}

/// Hash function selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashOpts {
    /// Family and size taken from the provider configuration
    Default,
    Sha256,
    Sha384,
    Sha3_256,
    Sha3_384,
}

impl HashOpts {
    /// Digest size in bytes; `None` for `Default`, which is resolved by the adapter
    pub fn output_size(&self) -> Option<usize> {
        match self {
            HashOpts::Default => None,
            HashOpts::Sha256 | HashOpts::Sha3_256 => Some(32),
            HashOpts::Sha384 | HashOpts::Sha3_384 => Some(48),
        }
    }
}

impl fmt::Display for HashOpts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HashOpts::Default => write!(f, "default"),
            HashOpts::Sha256 => write!(f, "SHA-256"),
            HashOpts::Sha384 => write!(f, "SHA-384"),
            HashOpts::Sha3_256 => write!(f, "SHA3-256"),
            HashOpts::Sha3_384 => write!(f, "SHA3-384"),
        }
    }
}

/// Signing and verification options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SignerOpts {
    /// Hash the caller used to produce the digest. When set, the digest
    /// length must equal that function's output size.
    pub hash: Option<HashOpts>,
}

/// Encryption options
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncrypterOpts {
    /// Data authenticated but not encrypted
    pub associated_data: Option<Vec<u8>>,
}

/// Decryption options; must carry the associated data used for encryption
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecrypterOpts {
    pub associated_data: Option<Vec<u8>>,
}
