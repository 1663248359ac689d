//! Hybrid classical/post-quantum signatures
//!
//! Every hybrid signature carries an ECDSA signature and an ML-DSA signature
//! over the same digest, and is accepted only when both verify.

pub mod codec;
mod factory;
mod key;
mod provider;

pub use factory::HybridFactory;
pub use key::HybridKeyPair;
pub use provider::HybridProvider;
