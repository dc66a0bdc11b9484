//! PHY Information Base.

use super::Status;
use crate::mac::constants::{
    DEFAULT_CCA_MODE, DEFAULT_CHANNEL, DEFAULT_CHANNELS_SUPPORTED, DEFAULT_TX_POWER,
};

/// The highest channel number.
pub const MAX_CHANNEL: u8 = 26;

/// The bits of the supported channels bitmap, one per channel.
pub const CHANNELS_MASK: u32 = (1 << (MAX_CHANNEL as u32 + 1)) - 1;

/// The highest value accepted for the transmit power and the CCA mode.
const MAX_OCTET_VALUE: u8 = 0xbf;

/// Identifier of a PHY PIB attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "fuzz", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PibAttributeId {
    /// `phyCurrentChannel`
    CurrentChannel,
    /// `phyChannelsSupported`
    ChannelsSupported,
    /// `phyTransmitPower`
    TransmitPower,
    /// `phyCCAMode`
    CcaMode,
    /// Any other identifier.
    Unknown(u8),
}

impl From<u8> for PibAttributeId {
    fn from(value: u8) -> Self {
        match value {
            0 => Self::CurrentChannel,
            1 => Self::ChannelsSupported,
            2 => Self::TransmitPower,
            3 => Self::CcaMode,
            id => Self::Unknown(id),
        }
    }
}

impl From<PibAttributeId> for u8 {
    fn from(id: PibAttributeId) -> Self {
        match id {
            PibAttributeId::CurrentChannel => 0,
            PibAttributeId::ChannelsSupported => 1,
            PibAttributeId::TransmitPower => 2,
            PibAttributeId::CcaMode => 3,
            PibAttributeId::Unknown(id) => id,
        }
    }
}

/// Tolerance on the nominal transmit power.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerTolerance {
    /// ±1 dB
    OneDb,
    /// ±3 dB
    ThreeDb,
    /// ±6 dB
    SixDb,
    /// Reserved code, never accepted by the PIB.
    Reserved,
}

/// The `phyTransmitPower` octet.
///
/// Bits 0-5 hold the nominal power in dBm as a signed 6-bit value, bits 6-7
/// the tolerance.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TxPower(u8);

impl TxPower {
    /// Create from the raw octet.
    pub const fn from_raw(raw: u8) -> Self {
        Self(raw)
    }

    /// Return the raw octet.
    pub const fn raw(&self) -> u8 {
        self.0
    }

    /// Return the nominal transmit power in dBm, between -32 and 31.
    pub const fn nominal_dbm(&self) -> i8 {
        // Move the 6-bit sign to bit 7, then shift back with sign extension.
        ((self.0 << 2) as i8) >> 2
    }

    /// Return the tolerance code.
    pub const fn tolerance(&self) -> PowerTolerance {
        match self.0 >> 6 {
            0b00 => PowerTolerance::OneDb,
            0b01 => PowerTolerance::ThreeDb,
            0b10 => PowerTolerance::SixDb,
            _ => PowerTolerance::Reserved,
        }
    }
}

/// PAN Information Base (PIB) specified by the PHY.
///
/// Every write is validated first. A rejected write leaves the stored value
/// untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Pib {
    current_channel: u8,
    channels_supported: u32,
    tx_power: TxPower,
    cca_mode: u8,
}

impl Default for Pib {
    fn default() -> Self {
        Self {
            current_channel: DEFAULT_CHANNEL,
            channels_supported: DEFAULT_CHANNELS_SUPPORTED & CHANNELS_MASK,
            tx_power: TxPower::from_raw(DEFAULT_TX_POWER),
            cca_mode: DEFAULT_CCA_MODE,
        }
    }
}

impl Pib {
    /// The channel used for all following transmissions and receptions.
    pub fn current_channel(&self) -> u8 {
        self.current_channel
    }

    /// Bitmap of the channels the radio supports; bit `n` is channel `n`.
    pub fn channels_supported(&self) -> u32 {
        self.channels_supported
    }

    /// Return `true` when `channel` is in the supported channels bitmap.
    pub fn is_channel_supported(&self, channel: u8) -> bool {
        channel <= MAX_CHANNEL && self.channels_supported & (1 << channel) != 0
    }

    /// The transmit power.
    pub fn tx_power(&self) -> TxPower {
        self.tx_power
    }

    /// The CCA mode.
    pub fn cca_mode(&self) -> u8 {
        self.cca_mode
    }

    /// Read an attribute, `None` for an unknown identifier.
    pub fn get(&self, attribute: PibAttributeId) -> Option<u32> {
        Some(match attribute {
            PibAttributeId::CurrentChannel => self.current_channel as u32,
            PibAttributeId::ChannelsSupported => self.channels_supported,
            PibAttributeId::TransmitPower => self.tx_power.raw() as u32,
            PibAttributeId::CcaMode => self.cca_mode as u32,
            PibAttributeId::Unknown(_) => return None,
        })
    }

    /// Check `value` against the range of `attribute` without storing it.
    pub fn validate(&self, attribute: PibAttributeId, value: u32) -> Status {
        let valid = match attribute {
            PibAttributeId::CurrentChannel => {
                u8::try_from(value).is_ok_and(|channel| self.is_channel_supported(channel))
            }
            PibAttributeId::ChannelsSupported => value & !CHANNELS_MASK == 0,
            PibAttributeId::TransmitPower | PibAttributeId::CcaMode => {
                value <= MAX_OCTET_VALUE as u32
            }
            PibAttributeId::Unknown(_) => return Status::UnsupportedAttribute,
        };

        if valid {
            Status::Success
        } else {
            Status::InvalidParameter
        }
    }

    /// Write an attribute.
    ///
    /// Returns [`Status::Success`] when stored, [`Status::InvalidParameter`]
    /// when out of range and [`Status::UnsupportedAttribute`] for an unknown
    /// identifier.
    pub fn set(&mut self, attribute: PibAttributeId, value: u32) -> Status {
        let status = self.validate(attribute, value);
        if status != Status::Success {
            return status;
        }

        // Validation bounds every octet attribute below 0x100.
        match attribute {
            PibAttributeId::CurrentChannel => self.current_channel = value as u8,
            PibAttributeId::ChannelsSupported => self.channels_supported = value,
            PibAttributeId::TransmitPower => self.tx_power = TxPower::from_raw(value as u8),
            PibAttributeId::CcaMode => self.cca_mode = value as u8,
            PibAttributeId::Unknown(_) => {}
        }

        Status::Success
    }
}
