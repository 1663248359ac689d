/*!
 * Post-quantum signing over liboqs
 *
 * ML-DSA parameter sets and a signer that owns one native liboqs context
 * for the duration of a single logical operation.
 */

mod algorithm;
mod signer;

pub use algorithm::PqAlgorithm;
pub use signer::{with_signer, PostQuantumSigner, SignerState};
