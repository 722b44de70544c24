//! Byte-level seams for the codec.
//!
//! Encoding and decoding are written once against [`ByteSink`] and
//! [`ByteSource`]; the buffer seam (`Vec<u8>` / [`SliceSource`]) and the
//! stream seam ([`StreamSink`] / [`StreamSource`]) share that single code
//! path, so both produce identical bytes for the same message.

use crate::error::{Error, ParseErrorKind, Result};
use std::io;

/// Destination for encoded bytes.
pub trait ByteSink {
    /// Write a single byte.
    fn write(&mut self, byte: u8) -> Result<()>;

    /// Write a run of bytes.
    fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
        for &byte in bytes {
            self.write(byte)?;
        }
        Ok(())
    }
}

impl ByteSink for Vec<u8> {
    #[inline]
    fn write(&mut self, byte: u8) -> Result<()> {
        self.push(byte);
        Ok(())
    }

    #[inline]
    fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
        self.extend_from_slice(bytes);
        Ok(())
    }
}

impl<A: smallvec::Array<Item = u8>> ByteSink for smallvec::SmallVec<A> {
    #[inline]
    fn write(&mut self, byte: u8) -> Result<()> {
        self.push(byte);
        Ok(())
    }

    #[inline]
    fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
        self.extend_from_slice(bytes);
        Ok(())
    }
}

/// Sink adapter over any [`std::io::Write`], counting bytes written.
pub struct StreamSink<W: io::Write> {
    inner: W,
    written: usize,
}

impl<W: io::Write> StreamSink<W> {
    /// Wrap a writer.
    pub fn new(inner: W) -> Self {
        Self { inner, written: 0 }
    }

    /// Total bytes written so far.
    pub fn written(&self) -> usize {
        self.written
    }

    /// Unwrap the inner writer.
    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: io::Write> ByteSink for StreamSink<W> {
    fn write(&mut self, byte: u8) -> Result<()> {
        self.inner.write_all(&[byte])?;
        self.written += 1;
        Ok(())
    }

    fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
        self.inner.write_all(bytes)?;
        self.written += bytes.len();
        Ok(())
    }
}

/// Source of bytes for decoding.
///
/// `position` is the count of consumed bytes since the source was created;
/// constructed-region decoding uses it to detect under- and overshoot of a
/// declared length, and parse errors report it as the offending offset.
pub trait ByteSource {
    /// Consume one byte.
    fn read(&mut self) -> Result<u8>;

    /// Look at the next byte without consuming it.
    fn peek(&mut self) -> Result<u8>;

    /// Count of bytes consumed so far.
    fn position(&self) -> usize;

    /// Fill `buf` exactly.
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        for slot in buf.iter_mut() {
            *slot = self.read()?;
        }
        Ok(())
    }
}

/// Source over an in-memory buffer.
pub struct SliceSource<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> SliceSource<'a> {
    /// Create a source over a byte slice.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    /// Check if all input has been consumed.
    pub fn is_empty(&self) -> bool {
        self.offset >= self.data.len()
    }
}

impl ByteSource for SliceSource<'_> {
    #[inline]
    fn read(&mut self) -> Result<u8> {
        if self.offset >= self.data.len() {
            return Err(Error::parse(self.offset, ParseErrorKind::ShortPayload));
        }
        let byte = self.data[self.offset];
        self.offset += 1;
        Ok(byte)
    }

    #[inline]
    fn peek(&mut self) -> Result<u8> {
        if self.offset >= self.data.len() {
            return Err(Error::parse(self.offset, ParseErrorKind::ShortPayload));
        }
        Ok(self.data[self.offset])
    }

    #[inline]
    fn position(&self) -> usize {
        self.offset
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        if self.remaining() < buf.len() {
            return Err(Error::parse(self.offset, ParseErrorKind::ShortPayload));
        }
        buf.copy_from_slice(&self.data[self.offset..self.offset + buf.len()]);
        self.offset += buf.len();
        Ok(())
    }
}

/// Source adapter over any [`std::io::Read`], with one byte of lookahead.
pub struct StreamSource<R: io::Read> {
    inner: R,
    lookahead: Option<u8>,
    consumed: usize,
}

impl<R: io::Read> StreamSource<R> {
    /// Wrap a reader.
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            lookahead: None,
            consumed: 0,
        }
    }

    fn fetch(&mut self) -> Result<u8> {
        let mut byte = [0u8; 1];
        match self.inner.read_exact(&mut byte) {
            Ok(()) => Ok(byte[0]),
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                Err(Error::parse(self.consumed, ParseErrorKind::ShortPayload))
            }
            Err(e) => Err(Error::Io(e)),
        }
    }
}

impl<R: io::Read> ByteSource for StreamSource<R> {
    fn read(&mut self) -> Result<u8> {
        let byte = match self.lookahead.take() {
            Some(byte) => byte,
            None => self.fetch()?,
        };
        self.consumed += 1;
        Ok(byte)
    }

    fn peek(&mut self) -> Result<u8> {
        if let Some(byte) = self.lookahead {
            return Ok(byte);
        }
        let byte = self.fetch()?;
        self.lookahead = Some(byte);
        Ok(byte)
    }

    fn position(&self) -> usize {
        self.consumed
    }
}
