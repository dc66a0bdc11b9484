use super::FrameControlRepr;
#[cfg(feature = "ieee802154-2011")]
use crate::AuxiliarySecurityHeaderRepr;
use crate::{Address, AddressingMode, Error, FrameControl, Reader, Result, BROADCAST_PAN_ID};

/// A high-level representation of the MAC header (MHR).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "fuzz", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MacHeader {
    /// The frame control field.
    pub frame_control: FrameControlRepr,
    /// The sequence number.
    pub sequence_number: u8,
    /// Destination PAN identifier, present when the destination address is.
    pub dst_pan_id: Option<u16>,
    /// Destination address.
    pub dst_address: Address,
    /// Source PAN identifier. With intra-PAN set, this is a copy of the
    /// destination PAN identifier and is not sent.
    pub src_pan_id: Option<u16>,
    /// Source address.
    pub src_address: Address,
    /// Auxiliary security header, present when security is enabled.
    #[cfg(feature = "ieee802154-2011")]
    pub auxiliary_security_header: Option<AuxiliarySecurityHeaderRepr>,
}

impl MacHeader {
    /// Parse a MAC header, leaving the reader on the first payload octet.
    pub(crate) fn parse(reader: &mut Reader<'_>) -> Result<Self> {
        let frame_control = FrameControlRepr::parse(&FrameControl::new(reader.read_slice(2)?)?);
        let sequence_number = reader.read_u8()?;

        let (dst_pan_id, dst_address) = match frame_control.dst_addressing_mode {
            AddressingMode::Absent => (None, Address::Absent),
            AddressingMode::Reserved => return Err(Error::ReservedAddressingMode),
            mode => {
                let pan_id = reader.read_u16_le()?;
                (Some(pan_id), Address::parse(reader, mode)?)
            }
        };

        let (src_pan_id, src_address) = match frame_control.src_addressing_mode {
            AddressingMode::Absent => (None, Address::Absent),
            AddressingMode::Reserved => return Err(Error::ReservedAddressingMode),
            mode => {
                let pan_id = if frame_control.intra_pan {
                    dst_pan_id
                } else {
                    Some(reader.read_u16_le()?)
                };
                (pan_id, Address::parse(reader, mode)?)
            }
        };

        #[cfg(feature = "ieee802154-2011")]
        let auxiliary_security_header = if frame_control.security_enabled {
            Some(AuxiliarySecurityHeaderRepr::parse(reader)?)
        } else {
            None
        };

        Ok(Self {
            frame_control,
            sequence_number,
            dst_pan_id,
            dst_address,
            src_pan_id,
            src_address,
            #[cfg(feature = "ieee802154-2011")]
            auxiliary_security_header,
        })
    }

    /// Check that the addresses agree with the addressing modes of the frame
    /// control field.
    pub fn validate(&self) -> Result<()> {
        let fc = &self.frame_control;

        if fc.dst_addressing_mode == AddressingMode::Reserved
            || fc.src_addressing_mode == AddressingMode::Reserved
        {
            return Err(Error::ReservedAddressingMode);
        }

        if AddressingMode::from(self.dst_address) != fc.dst_addressing_mode
            || AddressingMode::from(self.src_address) != fc.src_addressing_mode
        {
            return Err(Error::AddressingMismatch);
        }

        Ok(())
    }

    /// Return `true` when the source PAN identifier is sent.
    fn src_pan_id_present(&self) -> bool {
        !self.src_address.is_absent() && !self.frame_control.intra_pan
    }

    /// Return the length of the header when emitted into a buffer.
    pub fn buffer_len(&self) -> usize {
        let mut len = self.frame_control.buffer_len() + 1;

        if !self.dst_address.is_absent() {
            len += 2 + self.dst_address.len();
        }

        if !self.src_address.is_absent() {
            if self.src_pan_id_present() {
                len += 2;
            }
            len += self.src_address.len();
        }

        #[cfg(feature = "ieee802154-2011")]
        if let Some(header) = &self.auxiliary_security_header {
            if self.frame_control.security_enabled {
                len += header.buffer_len();
            }
        }

        len
    }

    /// Emit the header into a buffer.
    pub fn emit<const N: usize>(&self, buffer: &mut heapless::Vec<u8, N>) -> Result<()> {
        self.validate()?;

        let push = |buffer: &mut heapless::Vec<u8, N>, data: &[u8]| {
            buffer
                .extend_from_slice(data)
                .map_err(|_| Error::FrameTooLong)
        };

        push(buffer, &self.frame_control.raw().to_le_bytes())?;
        push(buffer, &[self.sequence_number])?;

        if !self.dst_address.is_absent() {
            let pan_id = self.dst_pan_id.unwrap_or(BROADCAST_PAN_ID);
            push(buffer, &pan_id.to_le_bytes())?;
            self.dst_address.emit(buffer)?;
        }

        if !self.src_address.is_absent() {
            if self.src_pan_id_present() {
                let pan_id = self.src_pan_id.unwrap_or(BROADCAST_PAN_ID);
                push(buffer, &pan_id.to_le_bytes())?;
            }
            self.src_address.emit(buffer)?;
        }

        #[cfg(feature = "ieee802154-2011")]
        if let Some(header) = &self.auxiliary_security_header {
            if self.frame_control.security_enabled {
                header.emit(buffer)?;
            }
        }

        Ok(())
    }
}
