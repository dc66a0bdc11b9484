//! PHY protocol data unit readers and writers.

use crate::{Error, FcsMode, Result, FCS_LEN, MAX_PHY_PACKET_SIZE};

/// The preamble sent before every PPDU.
pub const PREAMBLE: u32 = 0x0000_0000;

/// The Start-of-Frame Delimiter.
pub const SFD: u8 = 0xa7;

/// The length of the synchronization and PHY headers.
pub const PPDU_HEADER_LEN: usize = 6;

/// The maximum length of a PPDU in octets.
pub const MAX_PPDU_LEN: usize = PPDU_HEADER_LEN + MAX_PHY_PACKET_SIZE;

/// The octets of a PPDU.
pub type PpduBuffer = heapless::Vec<u8, MAX_PPDU_LEN>;

mod field {
    use core::ops::{Range, RangeFrom};

    pub const PREAMBLE: Range<usize> = 0..4;
    pub const SFD: usize = 4;
    pub const LENGTH: usize = 5;
    pub const PSDU: RangeFrom<usize> = 6..;
}

/// A reader for a PPDU.
pub struct Ppdu<T: AsRef<[u8]>> {
    buffer: T,
}

impl<T: AsRef<[u8]>> Ppdu<T> {
    /// Create a new [`Ppdu`] reader from a given buffer.
    ///
    /// # Errors
    ///
    /// Returns an error when the buffer is shorter than the PHY header or
    /// than the length the header announces.
    pub fn new(buffer: T) -> Result<Self> {
        let ppdu = Self::new_unchecked(buffer);

        if !ppdu.check_len() {
            return Err(Error::Truncated);
        }

        Ok(ppdu)
    }

    /// Returns `false` if the buffer is too short for the announced PSDU.
    pub fn check_len(&self) -> bool {
        let buffer = self.buffer.as_ref();
        buffer.len() >= PPDU_HEADER_LEN
            && buffer.len() >= PPDU_HEADER_LEN + self.frame_length() as usize
    }

    /// Create a new [`Ppdu`] reader without length checking.
    pub fn new_unchecked(buffer: T) -> Self {
        Self { buffer }
    }

    /// Return the preamble.
    pub fn preamble(&self) -> u32 {
        let b = &self.buffer.as_ref()[field::PREAMBLE];
        u32::from_le_bytes([b[0], b[1], b[2], b[3]])
    }

    /// Return the Start-of-Frame Delimiter.
    pub fn sfd(&self) -> u8 {
        self.buffer.as_ref()[field::SFD]
    }

    /// Return the frame length field, the reserved bit masked out.
    pub fn frame_length(&self) -> u8 {
        self.buffer.as_ref()[field::LENGTH] & 0x7f
    }

    /// Return the PSDU.
    pub fn psdu(&self) -> &[u8] {
        &self.buffer.as_ref()[field::PSDU][..self.frame_length() as usize]
    }
}

/// Build a PPDU around a PSDU.
///
/// With [`FcsMode::Hardware`] the PSDU does not carry the FCS yet, so the
/// length field accounts for the two octets the radio appends.
pub fn emit_ppdu(psdu: &[u8], fcs_mode: FcsMode) -> Result<PpduBuffer> {
    let frame_length = match fcs_mode {
        FcsMode::Hardware => psdu.len() + FCS_LEN,
        FcsMode::Software => psdu.len(),
    };

    if frame_length > MAX_PHY_PACKET_SIZE {
        return Err(Error::FrameTooLong);
    }

    let mut buffer = PpduBuffer::new();
    buffer
        .extend_from_slice(&PREAMBLE.to_le_bytes())
        .map_err(|_| Error::FrameTooLong)?;
    buffer.push(SFD).map_err(|_| Error::FrameTooLong)?;
    buffer
        .push(frame_length as u8)
        .map_err(|_| Error::FrameTooLong)?;
    buffer
        .extend_from_slice(psdu)
        .map_err(|_| Error::FrameTooLong)?;

    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emit_and_read() {
        let psdu = [0x01, 0x00, 0x05, 0xbe, 0xef];
        let buffer = emit_ppdu(&psdu, FcsMode::Hardware).unwrap();

        assert_eq!(
            &buffer[..],
            &[0x00, 0x00, 0x00, 0x00, 0xa7, 0x07, 0x01, 0x00, 0x05, 0xbe, 0xef]
        );

        // The FCS is not in the buffer yet.
        assert!(Ppdu::new(&buffer[..]).is_err());

        let buffer = emit_ppdu(&psdu, FcsMode::Software).unwrap();
        let ppdu = Ppdu::new(&buffer[..]).unwrap();
        assert_eq!(ppdu.preamble(), PREAMBLE);
        assert_eq!(ppdu.sfd(), SFD);
        assert_eq!(ppdu.frame_length(), 5);
        assert_eq!(ppdu.psdu(), &psdu);
    }

    #[test]
    fn reserved_bit_is_ignored() {
        let buffer = [0x00, 0x00, 0x00, 0x00, 0xa7, 0x81, 0x42];
        let ppdu = Ppdu::new(&buffer).unwrap();
        assert_eq!(ppdu.frame_length(), 1);
        assert_eq!(ppdu.psdu(), &[0x42]);
    }

    #[test]
    fn too_long() {
        assert_eq!(
            emit_ppdu(&[0u8; 126], FcsMode::Hardware),
            Err(Error::FrameTooLong)
        );
        assert_eq!(emit_ppdu(&[0u8; 127], FcsMode::Software).unwrap().len(), 133);
    }
}
