#![no_main]

use std::sync::OnceLock;

use arbitrary::Arbitrary;
use hybrid_csp::prelude::*;
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct VerifyFuzzInput {
    digest: Vec<u8>,
    signature: Vec<u8>,
    flip_byte: u16,
}

struct Fixture {
    provider: HybridProvider,
    key: Key,
}

fn fixture() -> &'static Fixture {
    static FIXTURE: OnceLock<Fixture> = OnceLock::new();
    FIXTURE.get_or_init(|| {
        let provider = HybridFactory::new().get(&FactoryOpts::default()).unwrap();
        let key = provider.key_gen(&KeyGenOpts::Ecdsa { temporary: true }).unwrap();
        Fixture { provider, key }
    })
}

fuzz_target!(|input: VerifyFuzzInput| {
    let Fixture { provider, key } = fixture();

    // Fuzzed signatures never verify and never panic
    if let Ok(valid) = provider.verify(key, &input.signature, &input.digest, None) {
        assert!(!valid || input.signature.len() > 4);
    }

    // A real signature with one byte flipped is never accepted
    if input.digest.is_empty() {
        return;
    }
    if let Ok(mut signature) = provider.sign(key, &input.digest, None) {
        let index = input.flip_byte as usize % signature.len();
        signature[index] ^= 0x01;
        if let Ok(valid) = provider.verify(key, &signature, &input.digest, None) {
            assert!(!valid);
        }
    }
});
