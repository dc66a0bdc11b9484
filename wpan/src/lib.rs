//! IEEE 802.15.4 PHY service layer.
//!
//! [`phy::Phy`] wires an upper layer and a radio driver together through
//! service access points, tracks the transceiver state, holds the PHY PIB and
//! turns data requests into PPDUs with [`frame`].
//!
//! The crate is `no_std`. Shared state lives behind a `critical-section`
//! mutex, so a `critical-section` implementation must be linked in.
#![no_std]

#[cfg(any(feature = "std", test))]
#[macro_use]
extern crate std;

#[macro_use]
pub(crate) mod utils;

pub use wpan_frame as frame;

pub mod mac;
pub mod phy;
pub mod time;

/// An error returned by the PHY service layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// A received frame could not be decoded.
    Frame(frame::Error),
    /// The service has no primitive for the requested role.
    UnsupportedRole,
    /// The pending transaction table is full.
    TransactionOverflow,
}

impl From<frame::Error> for Error {
    fn from(err: frame::Error) -> Self {
        Error::Frame(err)
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Frame(err) => write!(f, "frame error: {err}"),
            Error::UnsupportedRole => write!(f, "unsupported service role"),
            Error::TransactionOverflow => write!(f, "pending transaction table full"),
        }
    }
}
