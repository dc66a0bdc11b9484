//! Outgoing data requests.

#[cfg(feature = "ieee802154-2011")]
use crate::{AuxiliarySecurityHeaderRepr, FrameVersion};
use crate::{
    Address, AddressingMode, Error, Frame, FrameControlRepr, FrameType, MacHeader, Payload, Result,
};

bitflags::bitflags! {
    /// Transmission options of a data request.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct TxOptions: u8 {
        /// Acknowledged transmission.
        const ACKNOWLEDGED = 0x01;
        /// GTS transmission.
        const GTS = 0x02;
        /// Indirect transmission.
        const INDIRECT = 0x04;
        /// Security enabled transmission.
        const SECURITY_ENABLED = 0x08;
    }
}

impl Default for TxOptions {
    fn default() -> Self {
        Self::empty()
    }
}

/// A request to transfer an MSDU to a peer device.
///
/// Addresses are given as integers and interpreted according to their
/// addressing mode: the lower 16 bits for a short address, all 64 bits for an
/// extended one.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DataRequest<'p> {
    /// Source addressing mode.
    pub src_addr_mode: AddressingMode,
    /// Source PAN identifier.
    pub src_pan_id: u16,
    /// Source address.
    pub src_address: u64,
    /// Destination addressing mode.
    pub dst_addr_mode: AddressingMode,
    /// Destination PAN identifier.
    pub dst_pan_id: u16,
    /// Destination address.
    pub dst_address: u64,
    /// Send within the destination PAN, eliding the source PAN identifier.
    pub intra_pan: bool,
    /// The MSDU to transfer.
    pub msdu: &'p [u8],
    /// Handle used to match the confirm with this request.
    pub msdu_handle: u8,
    /// Transmission options.
    pub tx_options: TxOptions,
    /// Auxiliary security header used when [`TxOptions::SECURITY_ENABLED`]
    /// is set. The default header is used when `None`.
    #[cfg(feature = "ieee802154-2011")]
    pub security: Option<AuxiliarySecurityHeaderRepr>,
}

impl DataRequest<'_> {
    /// Return `true` when the frame carrying this request asks for an
    /// acknowledgment. Both acknowledged and GTS transmission do.
    pub fn ack_requested(&self) -> bool {
        self.tx_options
            .intersects(TxOptions::ACKNOWLEDGED | TxOptions::GTS)
    }

    /// Build the data frame carrying this request.
    ///
    /// Indirect transmission sets the frame pending field. A reserved
    /// addressing mode is replaced by [`AddressingMode::Absent`].
    pub fn to_frame(&self, sequence_number: u8) -> Result<Frame> {
        let dst_addr_mode = sanitize(self.dst_addr_mode);
        let src_addr_mode = sanitize(self.src_addr_mode);

        let security_enabled = self.tx_options.contains(TxOptions::SECURITY_ENABLED);

        let frame_control = FrameControlRepr {
            frame_type: FrameType::Data,
            security_enabled,
            frame_pending: self.tx_options.contains(TxOptions::INDIRECT),
            ack_request: self.ack_requested(),
            intra_pan: self.intra_pan,
            dst_addressing_mode: dst_addr_mode,
            src_addressing_mode: src_addr_mode,
            #[cfg(feature = "ieee802154-2011")]
            frame_version: if security_enabled {
                FrameVersion::Ieee802154_2006
            } else {
                FrameVersion::Ieee802154_2003
            },
        };

        let dst_address = Address::from_raw(dst_addr_mode, self.dst_address);
        let src_address = Address::from_raw(src_addr_mode, self.src_address);

        let dst_pan_id = (!dst_address.is_absent()).then_some(self.dst_pan_id);
        let src_pan_id = match (src_address.is_absent(), self.intra_pan) {
            (true, _) => None,
            (false, true) => dst_pan_id,
            (false, false) => Some(self.src_pan_id),
        };

        let header = MacHeader {
            frame_control,
            sequence_number,
            dst_pan_id,
            dst_address,
            src_pan_id,
            src_address,
            #[cfg(feature = "ieee802154-2011")]
            auxiliary_security_header: security_enabled
                .then(|| self.security.unwrap_or_default()),
        };

        let payload = Payload::from_slice(self.msdu).map_err(|_| Error::FrameTooLong)?;

        Frame::new(header, payload)
    }
}

fn sanitize(mode: AddressingMode) -> AddressingMode {
    match mode {
        AddressingMode::Reserved => AddressingMode::Absent,
        mode => mode,
    }
}
