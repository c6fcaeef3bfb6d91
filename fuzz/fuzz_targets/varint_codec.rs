// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fuzz target for varint (LEB128) and id-set decoding.

#![no_main]

use libfuzzer_sys::fuzz_target;
use simgram::store::encoding::{decode_id_set, decode_varint, encode_id_set, encode_varint};

fuzz_target!(|data: &[u8]| {
    if let Ok((value, consumed)) = decode_varint(data) {
        let mut reencoded = Vec::new();
        encode_varint(value, &mut reencoded);
        let (redecoded, reconsumed) =
            decode_varint(&reencoded).expect("Re-encoding of valid value should always decode");
        assert_eq!(value, redecoded);
        assert_eq!(reconsumed, reencoded.len());
        assert!(consumed <= 10 && consumed <= data.len());
    }

    // Decoded id sets are strictly increasing and inside the table
    if let Ok((ids, consumed)) = decode_id_set(data, 1000) {
        assert!(consumed <= data.len());
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
        assert!(ids.iter().all(|&id| id < 1000));

        let mut reencoded = Vec::new();
        encode_id_set(&ids, &mut reencoded);
        assert_eq!(decode_id_set(&reencoded, 1000).expect("valid set").0, ids);
    }
});
