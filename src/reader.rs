use crate::error::{DecodeError, DecodeResult};

/// Forward-only big-endian cursor over class-file bytes.
#[derive(Debug)]
pub struct ClassReader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> ClassReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    /// Bytes consumed so far.
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    fn take<const N: usize>(&mut self) -> DecodeResult<[u8; N]> {
        let bytes = self.read_bytes(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> DecodeResult<u8> {
        Ok(self.take::<1>()?[0])
    }

    pub fn read_u16(&mut self) -> DecodeResult<u16> {
        self.take().map(u16::from_be_bytes)
    }

    pub fn read_u32(&mut self) -> DecodeResult<u32> {
        self.take().map(u32::from_be_bytes)
    }

    pub fn read_u64(&mut self) -> DecodeResult<u64> {
        self.take().map(u64::from_be_bytes)
    }

    /// Reads a u16 count followed by that many u16 values.
    pub fn read_u16_table(&mut self) -> DecodeResult<Vec<u16>> {
        let n = self.read_u16()?;
        (0..n).map(|_| self.read_u16()).collect()
    }

    pub fn read_bytes(&mut self, n: usize) -> DecodeResult<&'a [u8]> {
        let available = self.remaining();
        if n > available {
            return Err(DecodeError::UnexpectedEof {
                offset: self.offset,
                needed: n,
                available,
            });
        }
        let bytes = &self.data[self.offset..self.offset + n];
        self.offset += n;
        Ok(bytes)
    }
}
