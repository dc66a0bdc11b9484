pub use customizable::*;

use crate::time::Duration;

// PHY constants
/// The maximum PSDU size (in octets) the PHY shall be able to receive.
#[doc(alias = "aMaxPHYPacketSize")]
pub const MAX_PHY_PACKET_SIZE: u32 = 127;
/// RX-to-TX or TX-to-RX turnaround time (in symbol periods).
#[doc(alias = "aTurnaroundTime")]
pub const TURNAROUND_TIME: u32 = 12;
/// The symbol rate of IEEE 802.15.4 on 2.4 GHz (symbols/s)
pub const SYMBOL_RATE: u32 = 62_500;
/// The duration of one symbol on 2.4 GHz (µs/symbol)
pub const SYMBOL_PERIOD_US: u32 = 1_000_000 / SYMBOL_RATE;

// MAC constants
/// The number of symbols forming a superframe slot when the superframe order is
/// equal to zero.
#[doc(alias = "aBaseSlotDuration")]
pub const BASE_SLOT_DURATION: u32 = 60;
/// The number of slots contained in any superframe.
#[doc(alias = "aNumSuperframeSlots")]
pub const NUM_SUPERFRAME_SLOTS: u32 = 16;
/// The number of symbols forming a superframe when the superframe order is
/// equal to zero.
#[doc(alias = "aBaseSuperframeDuration")]
pub const BASE_SUPERFRAME_DURATION: u32 = BASE_SLOT_DURATION * NUM_SUPERFRAME_SLOTS;
/// The maximum value of the backoff exponent in the CSMA-CA algorithm.
#[doc(alias = "aMaxBE")]
pub const MAX_BE: u8 = 5;
/// The maximum number of octets added by the MAC sublayer to the MAC payload
/// of a beacon frame.
#[doc(alias = "aMaxBeaconOverhead")]
pub const MAX_BEACON_OVERHEAD: u32 = 75;
/// The maximum size, in octets, of a beacon payload.
#[doc(alias = "aMaxBeaconPayloadLength")]
pub const MAX_BEACON_PAYLOAD_LENGTH: u32 = MAX_PHY_PACKET_SIZE - MAX_BEACON_OVERHEAD;
/// The number of superframes in which a GTS descriptor exists in the beacon
/// frame of the PAN coordinator.
#[doc(alias = "aGTSDescPersistenceTime")]
pub const GTS_DESC_PERSISTENCE_TIME: u32 = 4;
/// The maximum number of octets added by the MAC sublayer to its payload
/// without security.
#[doc(alias = "aMaxFrameOverhead")]
pub const MAX_FRAME_OVERHEAD: u32 = 25;
/// The maximum number of CAP symbols in a beacon-enabled PAN, or symbols in a
/// nonbeacon-enabled PAN, to wait for a frame intended as a response to a
/// data request frame.
#[doc(alias = "aMaxFrameResponseTime")]
pub const MAX_FRAME_RESPONSE_TIME: u32 = 1220;
/// The maximum number of retries allowed after a transmission failure.
#[doc(alias = "aMaxFrameRetries")]
pub const MAX_FRAME_RETRIES: u8 = 3;
/// The number of consecutive lost beacons that will cause the MAC sublayer of a
/// receiving device to declare a loss of synchronization.
#[doc(alias = "aMaxLostBeacons")]
pub const MAX_LOST_BEACONS: u32 = 4;
/// The maximum number of octets that can be transmitted in the MAC payload.
#[doc(alias = "aMaxMACFrameSize")]
pub const MAX_MAC_FRAME_SIZE: u32 = MAX_PHY_PACKET_SIZE - MAX_FRAME_OVERHEAD;
/// The maximum size of an MPDU, in octets, that can be followed by a SIFS
/// period.
#[doc(alias = "aMaxSIFSFrameSize")]
pub const MAX_SIFS_FRAME_SIZE: u32 = 18;
/// The minimum number of symbols forming the CAP.
#[doc(alias = "aMinCAPLength")]
pub const MIN_CAP_LENGTH: u32 = 440;
/// The minimum number of symbols forming a LIFS period.
#[doc(alias = "aMinLIFSPeriod")]
pub const MIN_LIFS_PERIOD: u32 = 40;
/// The minimum number of symbols forming a SIFS period.
#[doc(alias = "aMinSIFSPeriod")]
pub const MIN_SIFS_PERIOD: u32 = 12;
/// The maximum number of symbols a device shall wait for a response command
/// to be available following a request command.
#[doc(alias = "aResponseWaitTime")]
pub const RESPONSE_WAIT_TIME: u32 = 32 * BASE_SUPERFRAME_DURATION;
/// The number of symbols forming the basic time period used by the CSMA-CA
/// algorithm.
#[doc(alias = "aUnitBackoffPeriod")]
pub const UNIT_BACKOFF_PERIOD: u32 = 20;

/// How long a coordinator keeps a transaction before discarding it.
///
/// The persistence time counts unit periods of [`BASE_SUPERFRAME_DURATION`]
/// symbols.
#[doc(alias = "macTransactionPersistenceTime")]
pub const fn transaction_persistence(unit_periods: u16) -> Duration {
    Duration::from_symbols(BASE_SUPERFRAME_DURATION * unit_periods as u32)
}

/// The persistence time used when none is configured.
pub const DEFAULT_TRANSACTION_PERSISTENCE: Duration =
    transaction_persistence(TRANSACTION_PERSISTENCE_TIME);


#[cfg(not(test))]
mod customizable {
    #![allow(unused)]
    include!(concat!(env!("OUT_DIR"), "/config.rs"));
}
