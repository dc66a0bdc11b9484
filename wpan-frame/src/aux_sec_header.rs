//! Auxiliary Security Header fields.
//!
//! The header is handled structurally: security levels and key identifiers
//! are read and written, but no frame is ever authenticated or decrypted.

use super::{Error, Reader, Result};

/// The Security Control field.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "fuzz", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SecurityControl(u8);

impl SecurityControl {
    /// Create a Security Control field from its raw value.
    pub const fn from_raw(value: u8) -> Self {
        Self(value)
    }

    /// Create a Security Control field from its sub-fields.
    pub const fn new(level: SecurityLevel, mode: KeyIdentifierMode) -> Self {
        Self((level as u8 & 0b111) | ((mode as u8 & 0b11) << 3))
    }

    /// Return the raw value.
    pub const fn raw(&self) -> u8 {
        self.0
    }

    /// Return the security level field.
    pub fn security_level(&self) -> SecurityLevel {
        SecurityLevel::from(self.0 & 0b111)
    }

    /// Return the key identifier mode field.
    pub fn key_identifier_mode(&self) -> KeyIdentifierMode {
        KeyIdentifierMode::from((self.0 >> 3) & 0b11)
    }
}

/// Security levels.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "fuzz", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SecurityLevel {
    /// No security.
    #[default]
    None = 0,
    /// Authentication with a 32-bit MIC.
    Mic32 = 1,
    /// Authentication with a 64-bit MIC.
    Mic64 = 2,
    /// Authentication with a 128-bit MIC.
    Mic128 = 3,
    /// Encryption only.
    Enc = 4,
    /// Encryption and a 32-bit MIC.
    EncMic32 = 5,
    /// Encryption and a 64-bit MIC.
    EncMic64 = 6,
    /// Encryption and a 128-bit MIC.
    EncMic128 = 7,
}

impl SecurityLevel {
    /// Return `true` when confidentiality is enabled.
    pub fn data_confidentiality(&self) -> bool {
        (*self as u8) & 0b100 != 0
    }

    /// Return the MIC length in octets.
    pub fn mic_length(&self) -> usize {
        match *self as u8 & 0b11 {
            1 => 4,
            2 => 8,
            3 => 16,
            _ => 0,
        }
    }
}

impl From<u8> for SecurityLevel {
    fn from(value: u8) -> Self {
        match value & 0b111 {
            0 => Self::None,
            1 => Self::Mic32,
            2 => Self::Mic64,
            3 => Self::Mic128,
            4 => Self::Enc,
            5 => Self::EncMic32,
            6 => Self::EncMic64,
            _ => Self::EncMic128,
        }
    }
}

/// Key Identifier modes.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "fuzz", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyIdentifierMode {
    /// The key is determined implicitly from the originator and recipient.
    #[default]
    Implicit = 0b00,
    /// A 1-octet key index.
    Index = 0b01,
    /// A 4-octet key source and a 1-octet key index.
    Source4 = 0b10,
    /// An 8-octet key source and a 1-octet key index.
    Source8 = 0b11,
}

impl KeyIdentifierMode {
    /// Return the length of the Key Identifier field in octets.
    pub const fn key_identifier_len(&self) -> usize {
        match self {
            Self::Implicit => 0,
            Self::Index => 1,
            Self::Source4 => 5,
            Self::Source8 => 9,
        }
    }
}

impl From<u8> for KeyIdentifierMode {
    fn from(value: u8) -> Self {
        match value & 0b11 {
            0b00 => Self::Implicit,
            0b01 => Self::Index,
            0b10 => Self::Source4,
            _ => Self::Source8,
        }
    }
}

/// The Key Identifier field.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "fuzz", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyIdentifier {
    /// No key identifier.
    #[default]
    Implicit,
    /// Key index.
    Index(u8),
    /// 4-octet key source, sent least significant first, and key index.
    Source4 {
        /// Key source.
        source: u32,
        /// Key index.
        index: u8,
    },
    /// 8-octet key source, sent least significant first, and key index.
    Source8 {
        /// Key source.
        source: u64,
        /// Key index.
        index: u8,
    },
}

impl KeyIdentifier {
    /// Return the matching [`KeyIdentifierMode`].
    pub const fn mode(&self) -> KeyIdentifierMode {
        match self {
            Self::Implicit => KeyIdentifierMode::Implicit,
            Self::Index(_) => KeyIdentifierMode::Index,
            Self::Source4 { .. } => KeyIdentifierMode::Source4,
            Self::Source8 { .. } => KeyIdentifierMode::Source8,
        }
    }

    /// Return the key index, if any.
    pub const fn index(&self) -> Option<u8> {
        match self {
            Self::Implicit => None,
            Self::Index(index) | Self::Source4 { index, .. } | Self::Source8 { index, .. } => {
                Some(*index)
            }
        }
    }
}

/// A high-level representation of the Auxiliary Security Header.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "fuzz", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AuxiliarySecurityHeaderRepr {
    /// Security level in use.
    pub security_level: SecurityLevel,
    /// Frame counter.
    pub frame_counter: u32,
    /// Key identifier, its variant selects the key identifier mode.
    pub key_identifier: KeyIdentifier,
}

impl AuxiliarySecurityHeaderRepr {
    /// Return the Security Control field for this header.
    pub fn security_control(&self) -> SecurityControl {
        SecurityControl::new(self.security_level, self.key_identifier.mode())
    }

    /// Parse the header.
    pub(crate) fn parse(reader: &mut Reader<'_>) -> Result<Self> {
        let control = SecurityControl::from_raw(reader.read_u8()?);
        let frame_counter = reader.read_u32_le()?;

        let key_identifier = match control.key_identifier_mode() {
            KeyIdentifierMode::Implicit => KeyIdentifier::Implicit,
            KeyIdentifierMode::Index => KeyIdentifier::Index(reader.read_u8()?),
            KeyIdentifierMode::Source4 => KeyIdentifier::Source4 {
                source: reader.read_u32_le()?,
                index: reader.read_u8()?,
            },
            KeyIdentifierMode::Source8 => KeyIdentifier::Source8 {
                source: u64::from_le_bytes(reader.read_array()?),
                index: reader.read_u8()?,
            },
        };

        Ok(Self {
            security_level: control.security_level(),
            frame_counter,
            key_identifier,
        })
    }

    /// Return the length of the header when emitted into a buffer.
    pub fn buffer_len(&self) -> usize {
        1 + 4 + self.key_identifier.mode().key_identifier_len()
    }

    /// Emit the header into a buffer.
    pub(crate) fn emit<const N: usize>(&self, buffer: &mut heapless::Vec<u8, N>) -> Result<()> {
        buffer
            .push(self.security_control().raw())
            .map_err(|_| Error::FrameTooLong)?;
        extend(buffer, &self.frame_counter.to_le_bytes())?;

        match self.key_identifier {
            KeyIdentifier::Implicit => Ok(()),
            KeyIdentifier::Index(index) => extend(buffer, &[index]),
            KeyIdentifier::Source4 { source, index } => {
                extend(buffer, &source.to_le_bytes())?;
                extend(buffer, &[index])
            }
            KeyIdentifier::Source8 { source, index } => {
                extend(buffer, &source.to_le_bytes())?;
                extend(buffer, &[index])
            }
        }
    }
}

fn extend<const N: usize>(buffer: &mut heapless::Vec<u8, N>, data: &[u8]) -> Result<()> {
    buffer
        .extend_from_slice(data)
        .map_err(|_| Error::FrameTooLong)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn security_control() {
        let control = SecurityControl::from_raw(0b0001_0101);
        assert_eq!(control.security_level(), SecurityLevel::EncMic32);
        assert_eq!(control.key_identifier_mode(), KeyIdentifierMode::Source4);
        assert!(control.security_level().data_confidentiality());
        assert_eq!(control.security_level().mic_length(), 4);

        assert_eq!(
            SecurityControl::new(SecurityLevel::EncMic32, KeyIdentifierMode::Source4),
            control
        );
    }

    #[test]
    fn key_identifier_lengths() {
        assert_eq!(KeyIdentifierMode::Implicit.key_identifier_len(), 0);
        assert_eq!(KeyIdentifierMode::Index.key_identifier_len(), 1);
        assert_eq!(KeyIdentifierMode::Source4.key_identifier_len(), 5);
        assert_eq!(KeyIdentifierMode::Source8.key_identifier_len(), 9);
    }

    #[test]
    fn parse_each_key_identifier_mode() {
        let cases: [(&[u8], KeyIdentifier); 4] = [
            (&[0x01, 0x01, 0x00, 0x00, 0x00], KeyIdentifier::Implicit),
            (
                &[0x09, 0x01, 0x00, 0x00, 0x00, 0x07],
                KeyIdentifier::Index(7),
            ),
            (
                &[0x11, 0x01, 0x00, 0x00, 0x00, 0x04, 0x03, 0x02, 0x01, 0x07],
                KeyIdentifier::Source4 {
                    source: 0x0102_0304,
                    index: 7,
                },
            ),
            (
                &[
                    0x19, 0x01, 0x00, 0x00, 0x00, 0x08, 0x07, 0x06, 0x05, 0x04, 0x03, 0x02, 0x01,
                    0x07,
                ],
                KeyIdentifier::Source8 {
                    source: 0x0102_0304_0506_0708,
                    index: 7,
                },
            ),
        ];

        for (bytes, key_identifier) in cases {
            let mut reader = Reader::new(bytes);
            let header = AuxiliarySecurityHeaderRepr::parse(&mut reader).unwrap();
            assert_eq!(header.security_level, SecurityLevel::Mic32);
            assert_eq!(header.frame_counter, 1);
            assert_eq!(header.key_identifier, key_identifier);
            assert_eq!(reader.position(), bytes.len());
            assert_eq!(header.buffer_len(), bytes.len());

            let mut buffer: heapless::Vec<u8, 16> = heapless::Vec::new();
            header.emit(&mut buffer).unwrap();
            assert_eq!(&buffer[..], bytes);
        }
    }

    #[test]
    fn parse_truncated_key_identifier() {
        let mut reader = Reader::new(&[0x19, 0x01, 0x00, 0x00, 0x00, 0x08, 0x07]);
        assert_eq!(
            AuxiliarySecurityHeaderRepr::parse(&mut reader),
            Err(Error::Truncated)
        );
    }
}
