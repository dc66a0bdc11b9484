#![no_main]

use wpan_frame::{decode, AddressingMode, DataRequest, FcsMode, FrameEncoder, TxOptions};

use libfuzzer_sys::arbitrary::{self, Arbitrary};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input<'a> {
    src_addr_mode: AddressingMode,
    src_pan_id: u16,
    src_address: u64,
    dst_addr_mode: AddressingMode,
    dst_pan_id: u16,
    dst_address: u64,
    intra_pan: bool,
    msdu: &'a [u8],
    tx_options: u8,
}

fuzz_target!(|input: Input<'_>| {
    let request = DataRequest {
        src_addr_mode: input.src_addr_mode,
        src_pan_id: input.src_pan_id,
        src_address: input.src_address,
        dst_addr_mode: input.dst_addr_mode,
        dst_pan_id: input.dst_pan_id,
        dst_address: input.dst_address,
        intra_pan: input.intra_pan,
        msdu: input.msdu,
        msdu_handle: 0,
        tx_options: TxOptions::from_bits_truncate(input.tx_options),
    };

    let mut encoder = FrameEncoder::new(FcsMode::Software);
    let Ok(psdu) = encoder.encode(&request) else {
        return;
    };

    let mut buffer = psdu.to_vec();
    buffer.extend_from_slice(&[0xff, 0x00]);

    let received = decode(&buffer, psdu.len() as u8).expect("encoded frame must decode");
    assert!(received.fcs_valid);
    assert_eq!(Ok(received.frame), request.to_frame(0));
});
