use std::fmt;
use std::sync::Arc;

use ring::rand::SystemRandom;
use ring::signature::{
    self, EcdsaKeyPair, EcdsaSigningAlgorithm, EcdsaVerificationAlgorithm, KeyPair,
    UnparsedPublicKey,
};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::csp::HashOpts;
use crate::error::{error_codes, CryptoError, CryptoResult, Stage};
use crate::secure_memory::SecureBytes;

/// Domain separator mixed into symmetric key identifiers so an AES key can
/// never share an SKI with a public point of the same bytes.
const AES_SKI_PREFIX: u8 = 0x01;

pub const AES_256_KEY_SIZE: usize = 32;

/// NIST curves supported for ECDSA
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EcdsaCurve {
    P256,
    P384,
}

impl EcdsaCurve {
    /// Curve matching a security level in bits
    pub fn from_security_level(security: u16) -> Option<Self> {
        match security {
            256 => Some(EcdsaCurve::P256),
            384 => Some(EcdsaCurve::P384),
            _ => None,
        }
    }

    /// Length of the uncompressed SEC1 public point
    pub fn public_key_size(&self) -> usize {
        match self {
            EcdsaCurve::P256 => 65,
            EcdsaCurve::P384 => 97,
        }
    }

    /// Hash the curve's signing algorithm applies to its input
    pub fn hash(&self) -> HashOpts {
        match self {
            EcdsaCurve::P256 => HashOpts::Sha256,
            EcdsaCurve::P384 => HashOpts::Sha384,
        }
    }

    pub(crate) fn signing_algorithm(&self) -> &'static EcdsaSigningAlgorithm {
        match self {
            EcdsaCurve::P256 => &signature::ECDSA_P256_SHA256_ASN1_SIGNING,
            EcdsaCurve::P384 => &signature::ECDSA_P384_SHA384_ASN1_SIGNING,
        }
    }

    pub(crate) fn verification_algorithm(&self) -> &'static EcdsaVerificationAlgorithm {
        match self {
            EcdsaCurve::P256 => &signature::ECDSA_P256_SHA256_ASN1,
            EcdsaCurve::P384 => &signature::ECDSA_P384_SHA384_ASN1,
        }
    }
}

impl fmt::Display for EcdsaCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EcdsaCurve::P256 => write!(f, "P-256"),
            EcdsaCurve::P384 => write!(f, "P-384"),
        }
    }
}

/// ECDSA public key as an uncompressed SEC1 point
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EcdsaPublicKey {
    curve: EcdsaCurve,
    point: Vec<u8>,
}

impl EcdsaPublicKey {
    /// Parse an uncompressed point; the curve is inferred from its length
    pub fn from_point(point: &[u8]) -> CryptoResult<Self> {
        let curve = match point.len() {
            65 => EcdsaCurve::P256,
            97 => EcdsaCurve::P384,
            other => {
                return Err(CryptoError::invalid_parameter(
                    "public_key",
                    "65 or 97 byte uncompressed point",
                    &format!("{} bytes", other),
                ))
            }
        };
        if point[0] != 0x04 {
            return Err(CryptoError::invalid_key_material(
                "key import",
                "public point is not in uncompressed form",
                error_codes::KEY_IMPORT_FAILED,
            ));
        }
        Ok(Self {
            curve,
            point: point.to_vec(),
        })
    }

    pub fn curve(&self) -> EcdsaCurve {
        self.curve
    }

    pub fn point(&self) -> &[u8] {
        &self.point
    }

    /// Check an ASN.1 DER signature over `message`
    pub fn verify(&self, message: &[u8], signature: &[u8]) -> bool {
        UnparsedPublicKey::new(self.curve.verification_algorithm(), &self.point)
            .verify(message, signature)
            .is_ok()
    }
}

/// ECDSA private key.
///
/// Holds the PKCS#8 document it was loaded from in zeroizing memory and the
/// parsed ring key pair behind an `Arc` so clones share one parsed key.
#[derive(Clone)]
pub struct EcdsaPrivateKey {
    pkcs8: SecureBytes,
    key_pair: Arc<EcdsaKeyPair>,
    public: EcdsaPublicKey,
}

impl EcdsaPrivateKey {
    /// Parse a PKCS#8 v1 document for the given curve
    pub fn from_pkcs8(curve: EcdsaCurve, pkcs8: &[u8]) -> CryptoResult<Self> {
        let rng = SystemRandom::new();
        let key_pair = EcdsaKeyPair::from_pkcs8(curve.signing_algorithm(), pkcs8, &rng)
            .map_err(|e| {
                CryptoError::invalid_key_material(
                    "key import",
                    &format!("not a {} PKCS#8 key: {}", curve, e),
                    error_codes::KEY_IMPORT_FAILED,
                )
            })?;
        let public = EcdsaPublicKey {
            curve,
            point: key_pair.public_key().as_ref().to_vec(),
        };
        Ok(Self {
            pkcs8: SecureBytes::new(pkcs8),
            key_pair: Arc::new(key_pair),
            public,
        })
    }

    pub fn curve(&self) -> EcdsaCurve {
        self.public.curve
    }

    pub fn public(&self) -> &EcdsaPublicKey {
        &self.public
    }

    /// PKCS#8 encoding of this key
    pub fn pkcs8(&self) -> &SecureBytes {
        &self.pkcs8
    }

    /// Produce an ASN.1 DER signature over `message`
    pub fn sign(&self, rng: &SystemRandom, message: &[u8]) -> CryptoResult<Vec<u8>> {
        self.key_pair
            .sign(rng, message)
            .map(|sig| sig.as_ref().to_vec())
            .map_err(|e| CryptoError::signing_error(Stage::ClassicalSign, &e.to_string()))
    }
}

impl fmt::Debug for EcdsaPrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EcdsaPrivateKey")
            .field("curve", &self.public.curve)
            .field("public", &hex::encode(&self.public.point))
            .field("private", &"[REDACTED]")
            .finish()
    }
}

/// 256-bit AES key
#[derive(Clone)]
pub struct AesKey {
    key: SecureBytes,
}

impl AesKey {
    pub fn new(key: &[u8]) -> CryptoResult<Self> {
        if key.len() != AES_256_KEY_SIZE {
            return Err(CryptoError::invalid_parameter(
                "key",
                "32 bytes",
                &format!("{} bytes", key.len()),
            ));
        }
        Ok(Self {
            key: SecureBytes::new(key),
        })
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        self.key.as_bytes()
    }
}

impl fmt::Debug for AesKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AesKey").field("key", &"[REDACTED]").finish()
    }
}

/// A key owned by the classical adapter
#[derive(Debug, Clone)]
pub enum ClassicalKey {
    EcdsaPrivate(EcdsaPrivateKey),
    EcdsaPublic(EcdsaPublicKey),
    Aes(AesKey),
}

impl ClassicalKey {
    /// SHA-256 of the public point for ECDSA keys, of a prefixed key for AES
    pub fn ski(&self) -> Vec<u8> {
        let mut hasher = Sha256::new();
        match self {
            ClassicalKey::EcdsaPrivate(key) => hasher.update(&key.public.point),
            ClassicalKey::EcdsaPublic(key) => hasher.update(&key.point),
            ClassicalKey::Aes(key) => {
                hasher.update([AES_SKI_PREFIX]);
                hasher.update(key.as_bytes());
            }
        }
        hasher.finalize().to_vec()
    }

    /// Raw bytes of a public key. Private and symmetric keys do not export.
    pub fn bytes(&self) -> CryptoResult<Vec<u8>> {
        match self {
            ClassicalKey::EcdsaPublic(key) => Ok(key.point.clone()),
            ClassicalKey::EcdsaPrivate(_) => Err(CryptoError::unsupported_operation(
                "bytes",
                "private key export is not supported",
            )),
            ClassicalKey::Aes(_) => Err(CryptoError::unsupported_operation(
                "bytes",
                "symmetric key export is not supported",
            )),
        }
    }

    pub fn symmetric(&self) -> bool {
        matches!(self, ClassicalKey::Aes(_))
    }

    pub fn private(&self) -> bool {
        matches!(self, ClassicalKey::EcdsaPrivate(_) | ClassicalKey::Aes(_))
    }

    /// Always false; classical keys have no post-quantum half
    pub fn has_post_quantum_component(&self) -> bool {
        false
    }

    pub fn public_key(&self) -> CryptoResult<ClassicalKey> {
        match self {
            ClassicalKey::EcdsaPrivate(key) => Ok(ClassicalKey::EcdsaPublic(key.public.clone())),
            ClassicalKey::EcdsaPublic(key) => Ok(ClassicalKey::EcdsaPublic(key.clone())),
            ClassicalKey::Aes(_) => Err(CryptoError::unsupported_operation(
                "public_key",
                "symmetric keys have no public part",
            )),
        }
    }

    /// Public half of an ECDSA key, private or not
    pub fn ecdsa_public(&self) -> Option<&EcdsaPublicKey> {
        match self {
            ClassicalKey::EcdsaPrivate(key) => Some(&key.public),
            ClassicalKey::EcdsaPublic(key) => Some(key),
            ClassicalKey::Aes(_) => None,
        }
    }

    pub fn algorithm(&self) -> &'static str {
        match self.ecdsa_public().map(EcdsaPublicKey::curve) {
            Some(EcdsaCurve::P256) => "ECDSA-P256",
            Some(EcdsaCurve::P384) => "ECDSA-P384",
            None => "AES-256",
        }
    }
}
