//! BER length codec.
//!
//! Length encoding follows X.690 Section 8.1.3:
//! - Short form: single byte, bit 8 = 0, values 0-127
//! - Long form: initial byte (bit 8 = 1, bits 7-1 = octet count), followed
//!   by that many big-endian value octets
//! - Indefinite form (0x80): rejected, aligned with net-snmp behavior
//!
//! Non-minimal long-form encodings are accepted on decode (X.690 Section
//! 8.1.3.5 Note 2) but never produced on encode.

use crate::ber::io::{ByteSink, ByteSource};
use crate::error::{Error, ParseErrorKind, Result};

/// Maximum length accepted on decode.
///
/// 2MB is far larger than any realistic SNMP message; this is a sanity cap
/// at the BER layer, not a protocol limit.
pub const MAX_LENGTH: usize = 0x200000;

/// Returns the number of bytes a length value occupies on the wire.
#[inline]
pub const fn encoded_len(len: usize) -> usize {
    if len <= 0x7F {
        1
    } else if len <= 0xFF {
        2
    } else if len <= 0xFFFF {
        3
    } else if len <= 0xFF_FFFF {
        4
    } else {
        5
    }
}

/// Encode a length, short form below 128, minimal long form otherwise.
pub fn encode<S: ByteSink>(len: usize, sink: &mut S) -> Result<()> {
    if len <= 0x7F {
        return sink.write(len as u8);
    }

    let octets = encoded_len(len) - 1;
    sink.write(0x80 | octets as u8)?;
    for i in (0..octets).rev() {
        sink.write((len >> (i * 8)) as u8)?;
    }
    Ok(())
}

/// Decode a length.
///
/// Fails with `MalformedLength` on the indefinite form, a zero-octet long
/// form, more than four length octets, a length above [`MAX_LENGTH`], or
/// truncated input.
pub fn decode<R: ByteSource>(src: &mut R) -> Result<usize> {
    let start = src.position();
    let first = src
        .read()
        .map_err(|_| Error::parse(start, ParseErrorKind::MalformedLength))?;

    if first == 0x80 {
        // Indefinite form
        return Err(Error::parse(start, ParseErrorKind::MalformedLength));
    }

    if first & 0x80 == 0 {
        return Ok(first as usize);
    }

    let octets = (first & 0x7F) as usize;
    if octets > 4 {
        return Err(Error::parse(start, ParseErrorKind::MalformedLength));
    }

    let mut len: usize = 0;
    for _ in 0..octets {
        let byte = src
            .read()
            .map_err(|_| Error::parse(start, ParseErrorKind::MalformedLength))?;
        len = (len << 8) | byte as usize;
    }

    if len > MAX_LENGTH {
        return Err(Error::parse(start, ParseErrorKind::MalformedLength));
    }

    Ok(len)
}
