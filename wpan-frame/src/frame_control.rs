//! IEEE 802.15.4 Frame Control field readers and writers.

use super::AddressingMode;
use super::{Error, Result};

/// IEEE 802.15.4 frame type.
#[derive(Debug, Eq, PartialEq, Clone, Copy)]
#[cfg_attr(feature = "fuzz", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameType {
    /// Beacon frame.
    Beacon = 0b000,
    /// Data frame.
    Data = 0b001,
    /// Acknowledgment frame.
    Ack = 0b010,
    /// MAC command frame.
    MacCommand = 0b011,
    /// A reserved frame type.
    Unknown = 0b111,
}

impl From<u8> for FrameType {
    fn from(value: u8) -> Self {
        match value {
            0b000 => Self::Beacon,
            0b001 => Self::Data,
            0b010 => Self::Ack,
            0b011 => Self::MacCommand,
            _ => Self::Unknown,
        }
    }
}

/// IEEE 802.15.4 frame version.
#[cfg(feature = "ieee802154-2011")]
#[derive(Debug, Eq, PartialEq, Clone, Copy)]
#[cfg_attr(feature = "fuzz", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameVersion {
    /// Frame compatible with IEEE 802.15.4-2003.
    Ieee802154_2003 = 0b00,
    /// Frame introduced by IEEE 802.15.4-2006.
    Ieee802154_2006 = 0b01,
    /// A reserved frame version.
    Unknown = 0b11,
}

#[cfg(feature = "ieee802154-2011")]
impl From<u8> for FrameVersion {
    fn from(value: u8) -> Self {
        match value {
            0b00 => Self::Ieee802154_2003,
            0b01 => Self::Ieee802154_2006,
            _ => Self::Unknown,
        }
    }
}

mod field {
    pub const FRAME_TYPE: u16 = 0;
    pub const SECURITY_ENABLED: u16 = 3;
    pub const FRAME_PENDING: u16 = 4;
    pub const ACK_REQUEST: u16 = 5;
    pub const INTRA_PAN: u16 = 6;
    pub const DST_ADDRESSING_MODE: u16 = 10;
    #[cfg(feature = "ieee802154-2011")]
    pub const FRAME_VERSION: u16 = 12;
    pub const SRC_ADDRESSING_MODE: u16 = 14;
}

/// A reader/writer for the IEEE 802.15.4 Frame Control field.
pub struct FrameControl<T: AsRef<[u8]>> {
    buffer: T,
}

impl<T: AsRef<[u8]>> FrameControl<T> {
    /// Create a new [`FrameControl`] reader/writer from a given buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if the buffer is too short.
    pub fn new(buffer: T) -> Result<Self> {
        let fc = Self::new_unchecked(buffer);

        if !fc.check_len() {
            return Err(Error::Truncated);
        }

        Ok(fc)
    }

    /// Returns `false` if the buffer is too short to contain the Frame Control field.
    fn check_len(&self) -> bool {
        self.buffer.as_ref().len() >= 2
    }

    /// Create a new [`FrameControl`] reader/writer from a given buffer without length checking.
    pub fn new_unchecked(buffer: T) -> Self {
        Self { buffer }
    }

    /// Return the raw 16-bit value.
    pub fn raw(&self) -> u16 {
        let b = &self.buffer.as_ref()[..2];
        u16::from_le_bytes([b[0], b[1]])
    }

    fn bit(&self, shift: u16) -> bool {
        (self.raw() >> shift) & 0b1 == 1
    }

    /// Return the [`FrameType`] field.
    pub fn frame_type(&self) -> FrameType {
        FrameType::from(((self.raw() >> field::FRAME_TYPE) & 0b111) as u8)
    }

    /// Returns `true` when the security enabled field is set.
    pub fn security_enabled(&self) -> bool {
        self.bit(field::SECURITY_ENABLED)
    }

    /// Returns `true` when the frame pending field is set.
    pub fn frame_pending(&self) -> bool {
        self.bit(field::FRAME_PENDING)
    }

    /// Returns `true` when the acknowledgement request field is set.
    pub fn ack_request(&self) -> bool {
        self.bit(field::ACK_REQUEST)
    }

    /// Returns `true` when the intra-PAN field is set.
    ///
    /// The source PAN identifier is then elided and equal to the destination
    /// PAN identifier.
    pub fn intra_pan(&self) -> bool {
        self.bit(field::INTRA_PAN)
    }

    /// Return the Destination [`AddressingMode`].
    pub fn dst_addressing_mode(&self) -> AddressingMode {
        AddressingMode::from(((self.raw() >> field::DST_ADDRESSING_MODE) & 0b11) as u8)
    }

    /// Return the Source [`AddressingMode`].
    pub fn src_addressing_mode(&self) -> AddressingMode {
        AddressingMode::from(((self.raw() >> field::SRC_ADDRESSING_MODE) & 0b11) as u8)
    }

    /// Return the [`FrameVersion`].
    #[cfg(feature = "ieee802154-2011")]
    pub fn frame_version(&self) -> FrameVersion {
        FrameVersion::from(((self.raw() >> field::FRAME_VERSION) & 0b11) as u8)
    }
}

impl<T: AsRef<[u8]> + AsMut<[u8]>> FrameControl<T> {
    fn update(&mut self, shift: u16, mask: u16, value: u16) {
        let mut raw = self.raw();
        raw = (raw & !(mask << shift)) | ((value & mask) << shift);
        self.buffer.as_mut()[..2].copy_from_slice(&raw.to_le_bytes());
    }

    /// Set the frame type field.
    pub fn set_frame_type(&mut self, frame_type: FrameType) {
        self.update(field::FRAME_TYPE, 0b111, frame_type as u16);
    }

    /// Set the security enabled field.
    pub fn set_security_enabled(&mut self, security_enabled: bool) {
        self.update(field::SECURITY_ENABLED, 0b1, security_enabled as u16);
    }

    /// Set the frame pending field.
    pub fn set_frame_pending(&mut self, frame_pending: bool) {
        self.update(field::FRAME_PENDING, 0b1, frame_pending as u16);
    }

    /// Set the acknowledgement request field.
    pub fn set_ack_request(&mut self, ack_request: bool) {
        self.update(field::ACK_REQUEST, 0b1, ack_request as u16);
    }

    /// Set the intra-PAN field.
    pub fn set_intra_pan(&mut self, intra_pan: bool) {
        self.update(field::INTRA_PAN, 0b1, intra_pan as u16);
    }

    /// Set the destination addressing mode field.
    pub fn set_dst_addressing_mode(&mut self, addressing_mode: AddressingMode) {
        self.update(field::DST_ADDRESSING_MODE, 0b11, addressing_mode as u16);
    }

    /// Set the source addressing mode field.
    pub fn set_src_addressing_mode(&mut self, addressing_mode: AddressingMode) {
        self.update(field::SRC_ADDRESSING_MODE, 0b11, addressing_mode as u16);
    }

    /// Set the frame version field.
    #[cfg(feature = "ieee802154-2011")]
    pub fn set_frame_version(&mut self, frame_version: FrameVersion) {
        self.update(field::FRAME_VERSION, 0b11, frame_version as u16);
    }
}

impl<T: AsRef<[u8]>> core::fmt::Display for FrameControl<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        writeln!(f, "Frame Control")?;
        writeln!(f, "  type: {:?}", self.frame_type())?;
        writeln!(
            f,
            "  security enabled: {}",
            self.security_enabled() as usize
        )?;
        writeln!(f, "  frame pending: {}", self.frame_pending() as usize)?;
        writeln!(f, "  ack request: {}", self.ack_request() as usize)?;
        writeln!(f, "  intra pan: {}", self.intra_pan() as usize)?;
        writeln!(f, "  dst addressing mode: {:?}", self.dst_addressing_mode())?;
        writeln!(f, "  src addressing mode: {:?}", self.src_addressing_mode())?;
        #[cfg(feature = "ieee802154-2011")]
        writeln!(f, "  frame version: {:?}", self.frame_version())?;
        Ok(())
    }
}
