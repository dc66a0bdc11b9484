use crate::{CommandId, FrameType, MAX_PHY_PACKET_SIZE};

mod frame_control;
pub use frame_control::FrameControlRepr;

mod header;
pub use header::MacHeader;

/// The payload of a frame.
pub type Payload = heapless::Vec<u8, MAX_PHY_PACKET_SIZE>;

/// A high-level representation of an IEEE 802.15.4 MAC frame (MPDU).
///
/// A frame is built once per decode or encode and never changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Frame {
    /// The MAC header.
    pub header: MacHeader,
    /// The MAC payload.
    pub payload: Payload,
    /// The Frame Check Sequence.
    pub fcs: u16,
}

impl Frame {
    /// Return the MAC command identifier of a MAC command frame.
    pub fn command_id(&self) -> Option<CommandId> {
        match self.header.frame_control.frame_type {
            FrameType::MacCommand => self.payload.first().map(|id| CommandId::from(*id)),
            _ => None,
        }
    }

    /// Return the length of the frame on the wire, including the FCS.
    pub fn buffer_len(&self) -> usize {
        self.header.buffer_len() + self.payload.len() + crate::FCS_LEN
    }
}

/// A frame handed over by the radio, with reception metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReceivedFrame {
    /// The decoded frame.
    pub frame: Frame,
    /// Link quality indicator.
    pub link_quality: u8,
    /// Received signal strength indicator.
    pub rssi: u8,
    /// `true` when the FCS matches the content of the frame.
    pub fcs_valid: bool,
}
