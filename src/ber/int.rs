//! Minimal integer content codecs.
//!
//! Signed and unsigned encodings are deliberately separate functions: the
//! signed form strips redundant sign octets under two's-complement rules and
//! sign-extends on decode, while the unsigned form strips leading zeros but
//! prepends one when the top bit would otherwise read as a sign.

use crate::ber::io::{ByteSink, ByteSource};
use crate::error::{Error, ParseErrorKind, Result};

/// Content bytes needed for a signed i32 in minimal form.
#[inline]
pub const fn signed_len(value: i32) -> usize {
    let bytes = value.to_be_bytes();
    let mut start = 0;
    if value >= 0 {
        // Skip leading 0x00 bytes while the next byte's MSB stays clear
        while start < 3 && bytes[start] == 0x00 && bytes[start + 1] & 0x80 == 0 {
            start += 1;
        }
    } else {
        // Skip leading 0xFF bytes while the next byte's MSB stays set
        while start < 3 && bytes[start] == 0xFF && bytes[start + 1] & 0x80 != 0 {
            start += 1;
        }
    }
    4 - start
}

/// Content bytes needed for an unsigned u32 in minimal form.
///
/// Always at least 1; one extra 0x00 when the top content bit would be set.
#[inline]
pub const fn unsigned32_len(value: u32) -> usize {
    if value == 0 {
        return 1;
    }
    let significant = (32 - value.leading_zeros() as usize).div_ceil(8);
    let top = (value >> ((significant - 1) * 8)) as u8;
    if top & 0x80 != 0 {
        significant + 1
    } else {
        significant
    }
}

/// Content bytes needed for an unsigned u64 in minimal form.
#[inline]
pub const fn unsigned64_len(value: u64) -> usize {
    if value == 0 {
        return 1;
    }
    let significant = (64 - value.leading_zeros() as usize).div_ceil(8);
    let top = (value >> ((significant - 1) * 8)) as u8;
    if top & 0x80 != 0 {
        significant + 1
    } else {
        significant
    }
}

/// Write a signed i32 as minimal big-endian content bytes.
pub fn encode_signed<S: ByteSink>(value: i32, sink: &mut S) -> Result<()> {
    let len = signed_len(value);
    let bytes = value.to_be_bytes();
    sink.write_all(&bytes[4 - len..])
}

/// Write an unsigned u32 as minimal big-endian content bytes.
pub fn encode_unsigned32<S: ByteSink>(value: u32, sink: &mut S) -> Result<()> {
    let len = unsigned32_len(value);
    let mut bytes = [0u8; 5];
    bytes[1..].copy_from_slice(&value.to_be_bytes());
    sink.write_all(&bytes[5 - len..])
}

/// Write an unsigned u64 as minimal big-endian content bytes.
pub fn encode_unsigned64<S: ByteSink>(value: u64, sink: &mut S) -> Result<()> {
    let len = unsigned64_len(value);
    let mut bytes = [0u8; 9];
    bytes[1..].copy_from_slice(&value.to_be_bytes());
    sink.write_all(&bytes[9 - len..])
}

/// Read `len` content bytes as a sign-extended i32.
///
/// Payloads over 4 bytes are truncated to the leading 4, with a warning;
/// this matches net-snmp's permissive overflow handling.
pub fn decode_signed<R: ByteSource>(src: &mut R, len: usize) -> Result<i32> {
    if len > 4 {
        tracing::warn!(
            ber.offset = src.position(),
            ber.length = len,
            "integer too long, truncating to 4 bytes"
        );
    }

    let mut value: i32 = if len > 0 && src.peek()? & 0x80 != 0 {
        -1
    } else {
        0
    };

    for i in 0..len {
        let byte = src.read()?;
        if i < 4 {
            value = (value << 8) | byte as i32;
        }
    }

    Ok(value)
}

/// Read `len` content bytes as an unsigned u32.
///
/// Payloads over 5 bytes (one permissible leading zero plus four value
/// bytes) are truncated, with a warning.
pub fn decode_unsigned32<R: ByteSource>(src: &mut R, len: usize) -> Result<u32> {
    if len > 5 {
        tracing::warn!(
            ber.offset = src.position(),
            ber.length = len,
            "unsigned integer too long, truncating"
        );
    }

    let mut value: u32 = 0;
    for i in 0..len {
        let byte = src.read()?;
        if i < 5 {
            value = (value << 8) | byte as u32;
        }
    }

    Ok(value)
}

/// Read `len` content bytes as an unsigned u64.
///
/// Unlike the 32-bit decoders there is no truncation escape hatch here:
/// a payload over 9 bytes cannot fit a Counter64 and is rejected outright.
pub fn decode_unsigned64<R: ByteSource>(src: &mut R, len: usize) -> Result<u64> {
    if len > 9 {
        return Err(Error::parse(
            src.position(),
            ParseErrorKind::Integer64TooLong { length: len },
        ));
    }

    let mut value: u64 = 0;
    for _ in 0..len {
        value = (value << 8) | src.read()? as u64;
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ber::io::SliceSource;

    fn enc_signed(value: i32) -> Vec<u8> {
        let mut out = Vec::new();
        encode_signed(value, &mut out).unwrap();
        out
    }

    fn enc_u32(value: u32) -> Vec<u8> {
        let mut out = Vec::new();
        encode_unsigned32(value, &mut out).unwrap();
        out
    }

    fn enc_u64(value: u64) -> Vec<u8> {
        let mut out = Vec::new();
        encode_unsigned64(value, &mut out).unwrap();
        out
    }

    #[test]
    fn test_signed_minimal() {
        assert_eq!(enc_signed(0), vec![0x00]);
        assert_eq!(enc_signed(1), vec![0x01]);
        assert_eq!(enc_signed(127), vec![0x7F]);
        assert_eq!(enc_signed(128), vec![0x00, 0x80]);
        assert_eq!(enc_signed(256), vec![0x01, 0x00]);
        assert_eq!(enc_signed(i32::MAX), vec![0x7F, 0xFF, 0xFF, 0xFF]);
        assert_eq!(enc_signed(-1), vec![0xFF]);
        assert_eq!(enc_signed(-128), vec![0x80]);
        assert_eq!(enc_signed(-129), vec![0xFF, 0x7F]);
        assert_eq!(enc_signed(i32::MIN), vec![0x80, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn test_unsigned32_minimal() {
        assert_eq!(enc_u32(0), vec![0x00]);
        assert_eq!(enc_u32(127), vec![0x7F]);
        assert_eq!(enc_u32(128), vec![0x00, 0x80]);
        assert_eq!(enc_u32(255), vec![0x00, 0xFF]);
        assert_eq!(enc_u32(256), vec![0x01, 0x00]);
        assert_eq!(enc_u32(u32::MAX), vec![0x00, 0xFF, 0xFF, 0xFF, 0xFF]);
    }

    #[test]
    fn test_unsigned64_minimal() {
        assert_eq!(enc_u64(0), vec![0x00]);
        assert_eq!(enc_u64(127), vec![0x7F]);
        assert_eq!(enc_u64(128), vec![0x00, 0x80]);
        assert_eq!(
            enc_u64(u64::MAX),
            vec![0x00, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF]
        );
    }

    #[test]
    fn test_signed_decode_sign_extends() {
        let cases: &[(&[u8], i32)] = &[
            (&[0x00], 0),
            (&[0x7F], 127),
            (&[0x00, 0x80], 128),
            (&[0xFF], -1),
            (&[0x80], -128),
            (&[0xFF, 0x7F], -129),
            // Non-minimal forms decode permissively
            (&[0x00, 0x01], 1),
            (&[0xFF, 0xFF], -1),
        ];
        for (bytes, expected) in cases {
            let mut src = SliceSource::new(bytes);
            assert_eq!(decode_signed(&mut src, bytes.len()).unwrap(), *expected);
        }
    }

    #[test]
    fn test_roundtrip() {
        for value in [0i32, 1, -1, 127, 128, -128, -129, 32767, -32768, i32::MAX, i32::MIN] {
            let bytes = enc_signed(value);
            assert_eq!(bytes.len(), signed_len(value));
            let mut src = SliceSource::new(&bytes);
            assert_eq!(decode_signed(&mut src, bytes.len()).unwrap(), value);
        }
        for value in [0u32, 1, 127, 128, 255, 256, 65535, u32::MAX] {
            let bytes = enc_u32(value);
            assert_eq!(bytes.len(), unsigned32_len(value));
            let mut src = SliceSource::new(&bytes);
            assert_eq!(decode_unsigned32(&mut src, bytes.len()).unwrap(), value);
        }
        for value in [0u64, 1, 127, 128, u32::MAX as u64, u64::MAX] {
            let bytes = enc_u64(value);
            assert_eq!(bytes.len(), unsigned64_len(value));
            let mut src = SliceSource::new(&bytes);
            assert_eq!(decode_unsigned64(&mut src, bytes.len()).unwrap(), value);
        }
    }

    #[test]
    fn test_decode_truncated_input() {
        let mut src = SliceSource::new(&[0x01]);
        assert!(decode_signed(&mut src, 2).is_err());
    }

    #[test]
    fn test_unsigned64_oversized_rejected() {
        let data = [0u8; 12];
        let mut src = SliceSource::new(&data);
        assert!(matches!(
            decode_unsigned64(&mut src, 10),
            Err(Error::Parse {
                kind: ParseErrorKind::Integer64TooLong { length: 10 },
                ..
            })
        ));

        // 9 bytes (leading zero plus eight value bytes) is the maximum
        let mut src = SliceSource::new(&data);
        assert_eq!(decode_unsigned64(&mut src, 9).unwrap(), 0);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn signed_len_matches_encoder(value: i32) {
                prop_assert_eq!(enc_signed(value).len(), signed_len(value));
            }

            #[test]
            fn signed_roundtrips(value: i32) {
                let bytes = enc_signed(value);
                let mut src = SliceSource::new(&bytes);
                prop_assert_eq!(decode_signed(&mut src, bytes.len()).unwrap(), value);
            }

            #[test]
            fn unsigned32_roundtrips(value: u32) {
                let bytes = enc_u32(value);
                prop_assert_eq!(bytes.len(), unsigned32_len(value));
                let mut src = SliceSource::new(&bytes);
                prop_assert_eq!(decode_unsigned32(&mut src, bytes.len()).unwrap(), value);
            }

            #[test]
            fn unsigned64_roundtrips(value: u64) {
                let bytes = enc_u64(value);
                prop_assert_eq!(bytes.len(), unsigned64_len(value));
                let mut src = SliceSource::new(&bytes);
                prop_assert_eq!(decode_unsigned64(&mut src, bytes.len()).unwrap(), value);
            }
        }
    }
}
