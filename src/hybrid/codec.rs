//! Combined signature wire format
//!
//! `u32_be(len(classical)) || classical || post_quantum`
//!
//! The post-quantum part has no length of its own: it is everything after the
//! classical signature. The blob carries no algorithm identifier; the key pair
//! supplies that out of band.

use crate::error::{error_codes, CryptoError, CryptoResult};

/// Size of the big-endian classical signature length prefix
pub const LENGTH_PREFIX_SIZE: usize = 4;

/// Concatenate a classical and a post-quantum signature into one blob
pub fn combine(classical: &[u8], post_quantum: &[u8]) -> CryptoResult<Vec<u8>> {
    let length = length_prefix(classical.len())?;

    let mut blob = Vec::with_capacity(LENGTH_PREFIX_SIZE + classical.len() + post_quantum.len());
    blob.extend_from_slice(&length.to_be_bytes());
    blob.extend_from_slice(classical);
    blob.extend_from_slice(post_quantum);
    Ok(blob)
}

fn length_prefix(classical_len: usize) -> CryptoResult<u32> {
    u32::try_from(classical_len).map_err(|_| CryptoError::InvalidParameter {
        parameter: "classical_signature".to_string(),
        expected: "at most u32::MAX bytes".to_string(),
        actual: format!("{} bytes", classical_len),
        error_code: error_codes::SIGNATURE_TOO_LARGE,
    })
}

/// Split a combined blob into its classical and post-quantum signatures.
///
/// The returned slices borrow from `blob`. The declared length is checked
/// against the remaining bytes before anything is sliced.
pub fn parse(blob: &[u8]) -> CryptoResult<(&[u8], &[u8])> {
    if blob.len() < LENGTH_PREFIX_SIZE {
        return Err(CryptoError::malformed_signature(
            "too short",
            error_codes::SIGNATURE_TOO_SHORT,
        ));
    }

    let (prefix, body) = blob.split_at(LENGTH_PREFIX_SIZE);
    let mut length_bytes = [0u8; LENGTH_PREFIX_SIZE];
    length_bytes.copy_from_slice(prefix);
    let length = u32::from_be_bytes(length_bytes) as u64;

    if length > body.len() as u64 {
        return Err(CryptoError::malformed_signature(
            "length exceeds buffer",
            error_codes::SIGNATURE_LENGTH_EXCEEDS_BUFFER,
        ));
    }

    Ok(body.split_at(length as usize))
}
