//! Decoding received frames and encoding data frames.

use crate::{
    DataRequest, Error, Frame, MacHeader, Payload, Reader, ReceivedFrame, Result, FCS_LEN,
    MAX_PHY_PACKET_SIZE,
};

/// The octets of a PSDU, as handed to the radio.
pub type Psdu = heapless::Vec<u8, MAX_PHY_PACKET_SIZE>;

/// The length of a MAC header without any addressing field.
const MIN_HEADER_LEN: usize = 3;

/// Calculate the Frame Check Sequence over `data`.
#[inline]
pub fn calculate_fcs(data: &[u8]) -> u16 {
    // The FCS field contains a 16-bit ITU-T CRC, using the x^16 + x^12 + x^5 + 1 polynomial.
    // Unlike most CRCs, the initial and final values are both 0x0000, instead of 0xFFFF as
    // defined by the ITU-T CRC-16 standard.
    const CRC_16_IEEE802154: crc::Algorithm<u16> = crc::Algorithm {
        width: 16,
        poly: 0x1021,
        init: 0x0000,
        refin: true,
        refout: true,
        xorout: 0x0000,
        check: 0x2189,
        residue: 0x0000,
    };
    crc::Crc::<u16>::new(&CRC_16_IEEE802154).checksum(data)
}

/// Where the Frame Check Sequence of an outgoing frame comes from.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FcsMode {
    /// The radio appends the FCS while transmitting.
    #[default]
    Hardware,
    /// The encoder appends the FCS.
    Software,
}

impl Frame {
    /// Create a frame, computing its Frame Check Sequence.
    pub fn new(header: MacHeader, payload: Payload) -> Result<Self> {
        let mut frame = Self {
            header,
            payload,
            fcs: 0,
        };
        let content = frame.emit(FcsMode::Hardware)?;
        frame.fcs = calculate_fcs(&content);
        Ok(frame)
    }

    /// Emit the frame into a PSDU.
    ///
    /// With [`FcsMode::Software`] the FCS is appended, otherwise room is left
    /// for the radio to append it.
    pub fn emit(&self, fcs_mode: FcsMode) -> Result<Psdu> {
        if self.buffer_len() > MAX_PHY_PACKET_SIZE {
            return Err(Error::FrameTooLong);
        }

        let mut psdu = Psdu::new();
        self.header.emit(&mut psdu)?;
        psdu.extend_from_slice(&self.payload)
            .map_err(|_| Error::FrameTooLong)?;

        if fcs_mode == FcsMode::Software {
            let fcs = calculate_fcs(&psdu);
            psdu.extend_from_slice(&fcs.to_le_bytes())
                .map_err(|_| Error::FrameTooLong)?;
        }

        Ok(psdu)
    }
}

/// Decode a frame received from the radio.
///
/// `buffer` starts with the first octet of the frame control field and holds
/// the PSDU followed by the link quality indicator and the signal strength.
/// `declared_length` is the PHY frame length field: the number of PSDU octets,
/// FCS included.
///
/// Field presence and position depend on values read before them, so the
/// header is walked in order. On error nothing is returned.
pub fn decode(buffer: &[u8], declared_length: u8) -> Result<ReceivedFrame> {
    let declared_length = declared_length as usize;

    if buffer.len() < MIN_HEADER_LEN {
        return Err(Error::Truncated);
    }

    if declared_length > MAX_PHY_PACKET_SIZE {
        return Err(Error::MalformedLength);
    }

    let mut reader = Reader::new(buffer);
    let header = MacHeader::parse(&mut reader)?;
    let header_len = reader.position();

    let payload_len = declared_length
        .checked_sub(header_len + FCS_LEN)
        .ok_or(Error::MalformedLength)?;

    let payload = reader.read_slice(payload_len)?;
    let fcs = reader.read_u16_le()?;
    let link_quality = reader.read_u8()?;
    let rssi = reader.read_u8()?;

    let fcs_valid = calculate_fcs(&buffer[..header_len + payload_len]) == fcs;

    Ok(ReceivedFrame {
        frame: Frame {
            header,
            payload: Payload::from_slice(payload).map_err(|_| Error::MalformedLength)?,
            fcs,
        },
        link_quality,
        rssi,
        fcs_valid,
    })
}

/// Encodes data requests into PSDUs.
///
/// The encoder owns the data sequence number. It starts at `0`, is
/// incremented once per successful encode and wraps after `255`.
#[derive(Debug, Default)]
pub struct FrameEncoder {
    sequence_number: u8,
    fcs_mode: FcsMode,
}

impl FrameEncoder {
    /// Create a new encoder.
    pub const fn new(fcs_mode: FcsMode) -> Self {
        Self {
            sequence_number: 0,
            fcs_mode,
        }
    }

    /// Return the sequence number the next frame will carry.
    pub fn sequence_number(&self) -> u8 {
        self.sequence_number
    }

    /// Return the FCS mode.
    pub fn fcs_mode(&self) -> FcsMode {
        self.fcs_mode
    }

    /// Encode a data request into a PSDU.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FrameTooLong`] when the frame does not fit in a PSDU.
    /// The sequence number is left untouched in that case.
    pub fn encode(&mut self, request: &DataRequest<'_>) -> Result<Psdu> {
        let frame = request.to_frame(self.sequence_number)?;
        let psdu = frame.emit(self.fcs_mode)?;
        self.sequence_number = self.sequence_number.wrapping_add(1);
        Ok(psdu)
    }
}
