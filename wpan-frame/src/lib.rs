//! Frame model and codec for IEEE 802.15.4 MAC data frames.
//!
//! The crate has two layers:
//! - Zero-copy readers over a byte buffer, e.g. [`FrameControl`] and
//!   [`Ppdu`]. Each reader provides `new`, `check_len` and `new_unchecked`.
//! - Owned representations, e.g. [`MacHeader`] and [`Frame`], which are
//!   produced by [`decode`] and turned back into wire bytes by
//!   [`FrameEncoder`].
//!
//! ## Decoding a received frame
//!
//! Radios hand over the PSDU followed by the link quality indicator and the
//! received signal strength. The PHY length field is passed separately:
//!
//! ```
//! # use wpan_frame::{decode, Address};
//! let rx = [0x01, 0x00, 0x2a, 0xbe, 0xef, 0x12, 0x34, 0xff, 0xc4];
//! let received = decode(&rx, 7).unwrap();
//!
//! assert_eq!(received.frame.header.sequence_number, 0x2a);
//! assert_eq!(received.frame.header.dst_address, Address::Absent);
//! assert_eq!(&received.frame.payload[..], &[0xbe, 0xef]);
//! assert_eq!(received.link_quality, 0xff);
//! ```
//!
//! ## Encoding a data frame
//!
//! ```
//! # use wpan_frame::{AddressingMode, DataRequest, FcsMode, FrameEncoder, TxOptions};
//! let mut encoder = FrameEncoder::new(FcsMode::Software);
//! let request = DataRequest {
//!     dst_addr_mode: AddressingMode::Short,
//!     dst_pan_id: 0xabcd,
//!     dst_address: 0xffff,
//!     tx_options: TxOptions::ACKNOWLEDGED,
//!     msdu: &[0x2b, 0x00],
//!     ..Default::default()
//! };
//!
//! let psdu = encoder.encode(&request).unwrap();
//! assert_eq!(&psdu[..3], &[0x21, 0x08, 0x00]);
//! ```
//!
//! ## Frame versions
//!
//! By default frames follow the IEEE 802.15.4-2003 layout, where bits 12-13 of
//! the frame control field are reserved. The `ieee802154-2011` feature enables
//! the frame version field and the auxiliary security header. The security
//! header is only parsed and emitted, never verified.
#![no_std]
#![deny(missing_docs)]
#![deny(unsafe_code)]

#[cfg(any(feature = "std", test))]
#[macro_use]
extern crate std;

#[cfg(test)]
mod tests;

mod addressing;
pub use addressing::*;

// Only the 2011 frame layout carries the auxiliary security header.
#[cfg_attr(not(feature = "ieee802154-2011"), allow(dead_code))]
mod aux_sec_header;
pub use aux_sec_header::*;

mod codec;
pub use codec::*;

mod command;
pub use command::CommandId;

mod frame_control;
pub use frame_control::*;

mod ppdu;
pub use ppdu::*;

mod reader;
pub(crate) use reader::Reader;

mod repr;
pub use repr::*;

mod request;
pub use request::*;

/// The maximum PSDU size (in octets) the PHY shall be able to receive.
#[doc(alias = "aMaxPHYPacketSize")]
pub const MAX_PHY_PACKET_SIZE: usize = 127;

/// The length of the Frame Check Sequence in octets.
pub const FCS_LEN: usize = 2;

/// The PAN identifier used when a frame is addressed to every PAN.
pub const BROADCAST_PAN_ID: u16 = 0xffff;

/// An error that can occur when reading or writing an IEEE 802.15.4 frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The buffer ends before a field that should be present.
    Truncated,
    /// An addressing mode field holds the reserved value `0b01`.
    ReservedAddressingMode,
    /// The declared frame length does not fit the decoded header.
    MalformedLength,
    /// The frame does not fit in an IEEE 802.15.4 PSDU.
    FrameTooLong,
    /// An address does not match the addressing mode in the frame control.
    AddressingMismatch,
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Truncated => write!(f, "buffer too short"),
            Error::ReservedAddressingMode => write!(f, "reserved addressing mode"),
            Error::MalformedLength => write!(f, "malformed frame length"),
            Error::FrameTooLong => write!(f, "frame too long"),
            Error::AddressingMismatch => write!(f, "address does not match addressing mode"),
        }
    }
}

/// A type alias for `Result<T, wpan_frame::Error>`.
pub type Result<T> = core::result::Result<T, Error>;
