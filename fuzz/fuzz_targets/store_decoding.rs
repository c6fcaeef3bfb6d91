// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fuzz target for store file decoding.
//!
//! A store file is read back from disk, so its bytes are untrusted. Decoding
//! must return `Err` on anything malformed and never panic or allocate
//! unboundedly.

#![no_main]

use libfuzzer_sys::fuzz_target;
use simgram::store::file::StoreImage;
use simgram::store::header::{StoreFooter, StoreHeader};

fuzz_target!(|data: &[u8]| {
    // Property 1: raw garbage never panics
    let _ = StoreImage::decode(data);

    // Property 2: with a valid footer the CRC gate is passed, so the body
    // parsers see the garbage too
    if data.len() >= StoreHeader::SIZE {
        let mut bytes = data.to_vec();
        let footer = StoreFooter::new(StoreFooter::compute_crc32(&bytes));
        footer.write_to(&mut bytes);

        if let Ok(image) = StoreImage::decode(&bytes) {
            // Property 3: whatever decodes re-encodes to something that
            // decodes to the same image
            let reencoded = image.encode();
            let again = StoreImage::decode(&reencoded).expect("re-encoded image must decode");
            assert_eq!(image, again);
        }
    }
});
