#![no_main]

use wpan_frame::decode;

use libfuzzer_sys::{fuzz_target, Corpus};

fuzz_target!(|input: (u8, &[u8])| -> Corpus {
    let (declared_length, data) = input;

    if data.len() > 129 {
        return Corpus::Reject;
    }

    if let Ok(received) = decode(data, declared_length) {
        assert!(received.frame.payload.len() <= declared_length as usize);
    }

    Corpus::Keep
});
