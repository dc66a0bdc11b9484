use colored::*;
use wpan_frame::{decode, Address, Error};

struct Writer<'b> {
    buffer: &'b mut String,
    indent: usize,
}

impl<'b> Writer<'b> {
    fn new(buffer: &'b mut String) -> Self {
        Self { buffer, indent: 0 }
    }

    fn increase_indent(&mut self) {
        self.indent += 2;
    }

    fn decrease_indent(&mut self) {
        self.indent -= 2;
    }

    fn write(&mut self, s: String) {
        self.buffer.push_str(&" ".repeat(self.indent));
        self.buffer.push_str(&s);
    }

    fn writeln(&mut self, s: String) {
        self.write(s);
        self.buffer.push('\n');
    }

    fn section(&mut self, title: &str) {
        self.writeln(title.underline().bold().to_string());
    }

    fn field(&mut self, name: &str, value: impl std::fmt::Display) {
        self.writeln(format!("{}: {}", name.bold(), value));
    }
}

/// Why an input could not be printed.
#[derive(Debug)]
pub enum ParseError {
    /// The input is not valid hex.
    Hex(hex::FromHexError),
    /// The input is too short to hold the link quality and signal strength.
    MissingLinkInfo,
    /// The frame could not be decoded.
    Frame(Error),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::Hex(err) => write!(f, "invalid hex input: {err}"),
            ParseError::MissingLinkInfo => write!(f, "input too short"),
            ParseError::Frame(err) => write!(f, "invalid frame: {err}"),
        }
    }
}

impl std::error::Error for ParseError {}

impl From<Error> for ParseError {
    fn from(err: Error) -> Self {
        ParseError::Frame(err)
    }
}

pub struct FrameParser {}

impl FrameParser {
    /// Parse a hex encoded PSDU followed by the LQI and RSSI octets.
    ///
    /// Without `declared_length` the PSDU is taken to be everything but the
    /// last two octets.
    pub fn parse_hex(input: &str, declared_length: Option<u8>) -> Result<String, ParseError> {
        let data = hex::decode(input.trim()).map_err(ParseError::Hex)?;
        let declared_length = match declared_length {
            Some(length) => length,
            None => data
                .len()
                .checked_sub(2)
                .and_then(|len| u8::try_from(len).ok())
                .ok_or(ParseError::MissingLinkInfo)?,
        };
        Self::parse(&data, declared_length)
    }

    pub fn parse(input: &[u8], declared_length: u8) -> Result<String, ParseError> {
        let received = decode(input, declared_length)?;
        let frame = &received.frame;
        let header = &frame.header;
        let fc = &header.frame_control;

        let mut buffer = String::new();
        let mut w = Writer::new(&mut buffer);

        // -----------------------------------------------------------------
        // Frame Control
        // -----------------------------------------------------------------
        w.section("Frame Control");
        w.increase_indent();
        w.field("frame type", format!("{:?}", fc.frame_type).bright_blue());
        w.field("security", fc.security_enabled as usize);
        w.field("frame pending", fc.frame_pending as usize);
        w.field("ack request", fc.ack_request as usize);
        w.field("intra pan", fc.intra_pan as usize);
        w.field("dst addressing mode", format!("{:?}", fc.dst_addressing_mode));
        w.field("src addressing mode", format!("{:?}", fc.src_addressing_mode));
        #[cfg(feature = "ieee802154-2011")]
        w.field(
            "frame version",
            format!("{} ({:?})", fc.frame_version as usize, fc.frame_version),
        );
        w.decrease_indent();

        // -----------------------------------------------------------------
        // Sequence Number
        // -----------------------------------------------------------------
        w.section("Sequence Number");
        w.increase_indent();
        w.field("sequence number", header.sequence_number);
        w.decrease_indent();

        // -----------------------------------------------------------------
        // Addressing
        // -----------------------------------------------------------------
        if !header.dst_address.is_absent() || !header.src_address.is_absent() {
            w.section("Addressing");
            w.increase_indent();

            if let Some(dst_pan_id) = header.dst_pan_id {
                w.field("dst pan id", format!("{dst_pan_id:x}"));
            }

            if !header.dst_address.is_absent() {
                w.field("dst addr", describe(&header.dst_address));
            }

            if let Some(src_pan_id) = header.src_pan_id {
                w.field(
                    "src pan id",
                    format!(
                        "{src_pan_id:x}{}",
                        if fc.intra_pan { " (intra pan)" } else { "" }
                    ),
                );
            }

            if !header.src_address.is_absent() {
                w.field("src addr", describe(&header.src_address));
            }
            w.decrease_indent();
        }

        // -----------------------------------------------------------------
        // Auxiliary Security Header
        // -----------------------------------------------------------------
        #[cfg(feature = "ieee802154-2011")]
        {
            if let Some(security) = &header.auxiliary_security_header {
                w.section("Auxiliary Security Header");
                w.increase_indent();
                w.field("security level", format!("{:?}", security.security_level));
                w.field("frame counter", security.frame_counter);
                w.field("key identifier", format!("{:?}", security.key_identifier));
                w.decrease_indent();
            }
        }

        // -----------------------------------------------------------------
        // Payload
        // -----------------------------------------------------------------
        if !frame.payload.is_empty() {
            w.section("Payload");
            w.increase_indent();
            if let Some(id) = frame.command_id() {
                w.field("command", format!("{id:?}"));
            }
            w.writeln(format!("{:x?}", &frame.payload[..]));
            w.decrease_indent();
        }

        // -----------------------------------------------------------------
        // FCS
        // -----------------------------------------------------------------
        w.section("FCS");
        w.increase_indent();
        w.field(
            "fcs",
            format!(
                "{:04x} {}",
                frame.fcs,
                if received.fcs_valid {
                    "(valid)".green()
                } else {
                    "(invalid)".red()
                }
            ),
        );
        w.decrease_indent();

        // -----------------------------------------------------------------
        // Link
        // -----------------------------------------------------------------
        w.section("Link");
        w.increase_indent();
        w.field("link quality", received.link_quality);
        w.field("rssi", received.rssi);

        Ok(buffer)
    }
}

fn describe(address: &Address) -> String {
    format!(
        "{}{}",
        address,
        if address.is_broadcast() {
            " (broadcast)"
        } else {
            ""
        }
    )
}
