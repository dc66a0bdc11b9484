use super::{Error, Result};

/// A bounds-checked cursor over a received buffer.
///
/// Every read advances the cursor by the width of the field. A read past the
/// end of the buffer fails with [`Error::Truncated`] and leaves the cursor
/// where it was.
pub(crate) struct Reader<'b> {
    buffer: &'b [u8],
    offset: usize,
}

impl<'b> Reader<'b> {
    pub fn new(buffer: &'b [u8]) -> Self {
        Self { buffer, offset: 0 }
    }

    /// Number of octets consumed so far.
    pub fn position(&self) -> usize {
        self.offset
    }

    pub fn read_slice(&mut self, len: usize) -> Result<&'b [u8]> {
        let end = self.offset.checked_add(len).ok_or(Error::Truncated)?;
        let slice = self.buffer.get(self.offset..end).ok_or(Error::Truncated)?;
        self.offset = end;
        Ok(slice)
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut raw = [0u8; N];
        raw.copy_from_slice(self.read_slice(N)?);
        Ok(raw)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_array::<1>()?[0])
    }

    pub fn read_u16_le(&mut self) -> Result<u16> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    pub fn read_u32_le(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }
}
