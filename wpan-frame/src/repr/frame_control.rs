use crate::{AddressingMode, FrameControl, FrameType};
#[cfg(feature = "ieee802154-2011")]
use crate::FrameVersion;

/// A high-level representation of the IEEE 802.15.4 Frame Control field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "fuzz", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FrameControlRepr {
    /// Frame type.
    pub frame_type: FrameType,
    /// Security enabled.
    pub security_enabled: bool,
    /// Frame pending.
    pub frame_pending: bool,
    /// Acknowledgment request.
    pub ack_request: bool,
    /// Intra-PAN, the source PAN identifier is elided.
    pub intra_pan: bool,
    /// Destination addressing mode.
    pub dst_addressing_mode: AddressingMode,
    /// Source addressing mode.
    pub src_addressing_mode: AddressingMode,
    /// Frame version.
    #[cfg(feature = "ieee802154-2011")]
    pub frame_version: FrameVersion,
}

impl FrameControlRepr {
    /// Parse an IEEE 802.15.4 Frame Control field.
    pub fn parse<T: AsRef<[u8]>>(fc: &FrameControl<T>) -> Self {
        Self {
            frame_type: fc.frame_type(),
            security_enabled: fc.security_enabled(),
            frame_pending: fc.frame_pending(),
            ack_request: fc.ack_request(),
            intra_pan: fc.intra_pan(),
            dst_addressing_mode: fc.dst_addressing_mode(),
            src_addressing_mode: fc.src_addressing_mode(),
            #[cfg(feature = "ieee802154-2011")]
            frame_version: fc.frame_version(),
        }
    }

    /// Return the length of the frame control field when emitted into a buffer.
    pub const fn buffer_len(&self) -> usize {
        2
    }

    /// Emit the frame control field into a buffer.
    pub fn emit<T: AsRef<[u8]> + AsMut<[u8]>>(&self, fc: &mut FrameControl<T>) {
        fc.set_frame_type(self.frame_type);
        fc.set_security_enabled(self.security_enabled);
        fc.set_frame_pending(self.frame_pending);
        fc.set_ack_request(self.ack_request);
        fc.set_intra_pan(self.intra_pan);
        fc.set_dst_addressing_mode(self.dst_addressing_mode);
        fc.set_src_addressing_mode(self.src_addressing_mode);
        #[cfg(feature = "ieee802154-2011")]
        fc.set_frame_version(self.frame_version);
    }

    /// Return the raw 16-bit value of the field.
    pub fn raw(&self) -> u16 {
        let mut buffer = [0u8; 2];
        self.emit(&mut FrameControl::new_unchecked(&mut buffer[..]));
        u16::from_le_bytes(buffer)
    }
}

impl Default for FrameControlRepr {
    fn default() -> Self {
        Self {
            frame_type: FrameType::Data,
            security_enabled: false,
            frame_pending: false,
            ack_request: false,
            intra_pan: false,
            dst_addressing_mode: AddressingMode::Absent,
            src_addressing_mode: AddressingMode::Absent,
            #[cfg(feature = "ieee802154-2011")]
            frame_version: FrameVersion::Ieee802154_2003,
        }
    }
}
