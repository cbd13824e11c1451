//! Output sinks for sentinel encoding.
//!
//! Encoding is written once against [`std::io::Write`]. Offsets are computed
//! by running it into a [`ByteCounter`], the real bytes by running it into a
//! buffer or file.

use std::io::{self, Write};

use crate::{Error, Result};

/// Sink that discards bytes and counts them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ByteCounter {
    offset: u64,
}

impl ByteCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of bytes written so far.
    pub fn offset(&self) -> u64 {
        self.offset
    }
}

impl Write for ByteCounter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.offset += buf.len() as u64;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Little-endian primitives of the sentinel format.
pub trait WireWrite: Write {
    fn put_u8(&mut self, value: u8) -> Result<()> {
        self.write_all(&[value])?;
        Ok(())
    }

    fn put_u16(&mut self, value: u16) -> Result<()> {
        self.write_all(&value.to_le_bytes())?;
        Ok(())
    }

    fn put_u32(&mut self, value: u32) -> Result<()> {
        self.write_all(&value.to_le_bytes())?;
        Ok(())
    }

    fn put_u64(&mut self, value: u64) -> Result<()> {
        self.write_all(&value.to_le_bytes())?;
        Ok(())
    }

    /// Write a u16 count, rejecting values that do not fit.
    fn put_count(&mut self, what: &'static str, len: usize) -> Result<()> {
        let count = u16::try_from(len).map_err(|_| Error::LengthOverflow { what, len })?;
        self.put_u16(count)
    }

    /// Write a u16 length prefix followed by the raw bytes.
    fn put_str(&mut self, what: &'static str, value: &str) -> Result<()> {
        self.put_count(what, value.len())?;
        self.write_all(value.as_bytes())?;
        Ok(())
    }
}

impl<W: Write + ?Sized> WireWrite for W {}
