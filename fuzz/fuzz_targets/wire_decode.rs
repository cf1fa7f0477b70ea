//! Fuzz target for wire frame decoding
//!
//! Feeds arbitrary bytes to the JSON line decoders to find:
//! - Parser crashes or panics
//! - Inputs that decode but fail to re-encode
//!
//! The fuzzer should NEVER panic. All invalid inputs should return an error.

#![no_main]

use harbor_proto::wire::{ClientFrame, ServerFrame};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(line) = std::str::from_utf8(data) else {
        return;
    };

    // Decoding must never panic, only return Err for invalid data.
    if let Ok(frame) = ClientFrame::decode(line) {
        // Anything that decoded must round-trip.
        let encoded = frame.encode_line().expect("re-encode of decoded client frame");
        let again = ClientFrame::decode(&encoded).expect("decode of re-encoded client frame");
        assert_eq!(frame.id, again.id);
    }

    if let Ok(frame) = ServerFrame::decode(line) {
        let encoded = frame.encode_line().expect("re-encode of decoded server frame");
        let _ = ServerFrame::decode(&encoded).expect("decode of re-encoded server frame");
    }
});
