use std::io;
use std::io::{Read, Write};

use crate::error::Error;
use crate::logger;

/// A fixed width integer that is stored little-endian on disk.
pub trait LittleEndianField: Sized + Copy {
    const WIDTH: usize;

    fn write_le(self, bytes: &mut [u8]);

    fn read_le(bytes: &[u8]) -> Self;
}

impl LittleEndianField for u16 {
    const WIDTH: usize = 2;

    fn write_le(self, bytes: &mut [u8]) {
        bytes.copy_from_slice(&self.to_le_bytes());
    }

    fn read_le(bytes: &[u8]) -> Self {
        u16::from_le_bytes([bytes[0], bytes[1]])
    }
}

impl LittleEndianField for u32 {
    const WIDTH: usize = 4;

    fn write_le(self, bytes: &mut [u8]) {
        bytes.copy_from_slice(&self.to_le_bytes());
    }

    fn read_le(bytes: &[u8]) -> Self {
        u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
    }
}

impl LittleEndianField for i32 {
    const WIDTH: usize = 4;

    fn write_le(self, bytes: &mut [u8]) {
        bytes.copy_from_slice(&self.to_le_bytes());
    }

    fn read_le(bytes: &[u8]) -> Self {
        i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
    }
}

/// Writes named header fields to a Writer and keeps track of
/// how many bytes have been emitted so far.
pub struct FieldWriter<'a, T: Write> {
    /// the underlying output stream
    writer: &'a mut T,
    /// number of bytes written since construction
    offset: u64,
}

impl<'a, T: Write> FieldWriter<'a, T> {
    pub fn new(writer: &'a mut T) -> FieldWriter<'a, T> {
        FieldWriter { writer, offset: 0 }
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn write_bytes(&mut self, name: &'static str, bytes: &[u8]) -> crate::Result<()> {
        logger::log_field(name, self.offset, bytes);
        self.writer
            .write_all(bytes)
            .map_err(|e| Error::FailedToWriteField(name, e))?;
        self.offset += bytes.len() as u64;
        Ok(())
    }

    pub fn write_field<F: LittleEndianField>(
        &mut self,
        name: &'static str,
        value: F,
    ) -> crate::Result<()> {
        let mut buffer = [0; 4];
        let bytes = &mut buffer[..F::WIDTH];
        value.write_le(bytes);
        self.write_bytes(name, bytes)
    }

    pub fn write_zeros(&mut self, name: &'static str, count: usize) -> crate::Result<()> {
        self.write_bytes(name, &vec![0; count])
    }

    pub fn flush(&mut self) -> crate::Result<()> {
        self.writer
            .flush()
            .map_err(|e| Error::FailedToWriteField("flush", e))
    }
}

/// Reads named header fields from a Reader and keeps track of
/// how many bytes have been consumed so far.
pub struct FieldReader<'a, T: Read> {
    /// the underlying input stream
    reader: &'a mut T,
    /// number of bytes consumed since construction
    offset: u64,
}

impl<'a, T: Read> FieldReader<'a, T> {
    pub fn new(reader: &'a mut T) -> FieldReader<'a, T> {
        FieldReader { reader, offset: 0 }
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn read_bytes(&mut self, name: &'static str, bytes: &mut [u8]) -> crate::Result<()> {
        self.reader.read_exact(bytes).map_err(|e| match e.kind() {
            io::ErrorKind::UnexpectedEof => Error::UnexpectedEndOfFile(name),
            _ => Error::FailedToReadField(name, e),
        })?;
        logger::log_field(name, self.offset, bytes);
        self.offset += bytes.len() as u64;
        Ok(())
    }

    pub fn read_array<const N: usize>(&mut self, name: &'static str) -> crate::Result<[u8; N]> {
        let mut bytes = [0; N];
        self.read_bytes(name, &mut bytes)?;
        Ok(bytes)
    }

    pub fn read_field<F: LittleEndianField>(&mut self, name: &'static str) -> crate::Result<F> {
        let mut buffer = [0; 4];
        let bytes = &mut buffer[..F::WIDTH];
        self.read_bytes(name, bytes)?;
        Ok(F::read_le(bytes))
    }

    pub fn skip(&mut self, name: &'static str, count: usize) -> crate::Result<()> {
        let mut trash = vec![0; count];
        self.read_bytes(name, &mut trash)
    }
}
