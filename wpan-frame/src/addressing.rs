//! Addressing modes and addresses.

use super::{Error, Reader, Result};

/// An IEEE 802.15.4 address.
///
/// The octets are stored most significant first. On the wire they are sent
/// least significant first.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "fuzz", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Address {
    /// No address field is present.
    #[default]
    Absent,
    /// A 16-bit short address.
    Short([u8; 2]),
    /// A 64-bit extended address.
    Extended([u8; 8]),
}

impl Address {
    /// The broadcast address.
    pub const BROADCAST: Address = Address::Short([0xff; 2]);

    /// Create a short address from its integer value.
    pub const fn short(value: u16) -> Self {
        Self::Short(value.to_be_bytes())
    }

    /// Create an extended address from its integer value.
    pub const fn extended(value: u64) -> Self {
        Self::Extended(value.to_be_bytes())
    }

    /// Create an address of the given mode from a raw integer.
    ///
    /// Only the lower 16 bits are used for a short address. The reserved mode
    /// yields [`Address::Absent`].
    pub const fn from_raw(mode: AddressingMode, raw: u64) -> Self {
        match mode {
            AddressingMode::Short => Self::short(raw as u16),
            AddressingMode::Extended => Self::extended(raw),
            AddressingMode::Absent | AddressingMode::Reserved => Self::Absent,
        }
    }

    /// Return the address as an integer, `0` when absent.
    pub const fn to_raw(&self) -> u64 {
        match self {
            Address::Absent => 0,
            Address::Short(value) => u16::from_be_bytes(*value) as u64,
            Address::Extended(value) => u64::from_be_bytes(*value),
        }
    }

    /// Query whether the address is an unicast address.
    pub fn is_unicast(&self) -> bool {
        !self.is_broadcast()
    }

    /// Query whether this address is the broadcast address.
    pub fn is_broadcast(&self) -> bool {
        *self == Self::BROADCAST
    }

    /// Return the address octets, most significant first.
    pub const fn as_bytes(&self) -> &[u8] {
        match self {
            Address::Absent => &[],
            Address::Short(value) => value,
            Address::Extended(value) => value,
        }
    }

    /// Return the length of the address in octets.
    #[allow(clippy::len_without_is_empty)]
    pub const fn len(&self) -> usize {
        match self {
            Address::Absent => 0,
            Address::Short(_) => 2,
            Address::Extended(_) => 8,
        }
    }

    /// Returns `true` when no address is present.
    pub const fn is_absent(&self) -> bool {
        matches!(self, Address::Absent)
    }

    pub(crate) fn parse(reader: &mut Reader<'_>, mode: AddressingMode) -> Result<Self> {
        match mode {
            AddressingMode::Absent => Ok(Address::Absent),
            AddressingMode::Short => {
                let mut raw = reader.read_array::<2>()?;
                raw.reverse();
                Ok(Address::Short(raw))
            }
            AddressingMode::Extended => {
                let mut raw = reader.read_array::<8>()?;
                raw.reverse();
                Ok(Address::Extended(raw))
            }
            AddressingMode::Reserved => Err(Error::ReservedAddressingMode),
        }
    }

    pub(crate) fn emit<const N: usize>(&self, buffer: &mut heapless::Vec<u8, N>) -> Result<()> {
        for b in self.as_bytes().iter().rev() {
            buffer.push(*b).map_err(|_| Error::FrameTooLong)?;
        }
        Ok(())
    }
}

impl From<Address> for AddressingMode {
    fn from(value: Address) -> Self {
        match value {
            Address::Absent => AddressingMode::Absent,
            Address::Short(_) => AddressingMode::Short,
            Address::Extended(_) => AddressingMode::Extended,
        }
    }
}

impl core::fmt::Display for Address {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Address::Absent => write!(f, "absent"),
            Address::Short(value) => write!(f, "{:02x}:{:02x}", value[0], value[1]),
            Address::Extended(value) => write!(
                f,
                "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
                value[0], value[1], value[2], value[3], value[4], value[5], value[6], value[7]
            ),
        }
    }
}

/// IEEE 802.15.4 addressing mode.
#[derive(Debug, Default, Eq, PartialEq, Clone, Copy)]
#[cfg_attr(feature = "fuzz", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AddressingMode {
    /// PAN identifier and address fields are not present.
    #[default]
    Absent = 0b00,
    /// Reserved, never valid in a frame.
    Reserved = 0b01,
    /// The address field contains a 16-bit short address.
    Short = 0b10,
    /// The address field contains a 64-bit extended address.
    Extended = 0b11,
}

impl AddressingMode {
    /// Return the size of the address in octets.
    pub const fn size(&self) -> usize {
        match self {
            Self::Absent | Self::Reserved => 0,
            Self::Short => 2,
            Self::Extended => 8,
        }
    }
}

impl From<u8> for AddressingMode {
    fn from(value: u8) -> Self {
        match value & 0b11 {
            0b00 => Self::Absent,
            0b01 => Self::Reserved,
            0b10 => Self::Short,
            _ => Self::Extended,
        }
    }
}
