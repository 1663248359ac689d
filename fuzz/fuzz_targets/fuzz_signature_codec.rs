#![no_main]

use hybrid_csp::hybrid::codec::{combine, parse, LENGTH_PREFIX_SIZE};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes must parse or fail cleanly
    if let Ok((classical, post_quantum)) = parse(data) {
        assert_eq!(LENGTH_PREFIX_SIZE + classical.len() + post_quantum.len(), data.len());

        // A parsed blob re-encodes to itself
        let blob = combine(classical, post_quantum).unwrap();
        assert_eq!(blob.as_slice(), data);
    }
});
