use crate::*;


/// Compare each expression with its expected value.
macro_rules! check {
    ($($left:expr => $right:expr),* $(,)?) => {
        $(
            assert_eq!($left, $right, stringify!($left));
        )*
    };
}
pub(crate) use check;

/// Decode a hex encoded PSDU with trailing LQI and RSSI octets.
pub(crate) fn decode_hex(input: &str, declared_length: u8) -> Result<ReceivedFrame> {
    let data = hex::decode(input).unwrap();
    decode(&data, declared_length)
}
