//! Object Identifier (OID) type.
//!
//! OIDs are stored as `SmallVec<[u32; 16]>` to avoid heap allocation for
//! common OIDs. The textual surface is plain dotted-decimal with no leading
//! or trailing dot.

use crate::ber::io::ByteSink;
use crate::error::{Error, OidErrorKind, ParseErrorKind, Result};
use smallvec::SmallVec;
use std::fmt;

/// Maximum number of arcs (subidentifiers) allowed in an OID.
///
/// Per RFC 2578 Section 3.5: "there are at most 128 sub-identifiers in a
/// value". Enforced during BER decoding via [`Oid::from_ber()`].
pub const MAX_OID_LEN: usize = 128;

/// Object Identifier.
///
/// Stored as a sequence of arc values (u32). Uses SmallVec to avoid
/// heap allocation for OIDs with 16 or fewer arcs.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Oid {
    arcs: SmallVec<[u32; 16]>,
}

impl Oid {
    /// Create an empty OID.
    pub fn empty() -> Self {
        Self {
            arcs: SmallVec::new(),
        }
    }

    /// Create an OID from arc values.
    pub fn new(arcs: impl IntoIterator<Item = u32>) -> Self {
        Self {
            arcs: arcs.into_iter().collect(),
        }
    }

    /// Create an OID from a slice of arcs.
    pub fn from_slice(arcs: &[u32]) -> Self {
        Self {
            arcs: SmallVec::from_slice(arcs),
        }
    }

    /// Parse an OID from dotted notation (e.g., "1.3.6.1.2.1.1.1.0").
    ///
    /// Parses the string format but does **not** validate arc constraints;
    /// call [`validate()`](Self::validate) for that, which message building
    /// does before emitting the OID onto the wire.
    pub fn parse(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Ok(Self::empty());
        }

        let mut arcs = SmallVec::new();

        for part in s.split('.') {
            let arc: u32 = part.parse().map_err(|_| {
                Error::invalid_oid_with_input(OidErrorKind::InvalidArc, s.to_string())
            })?;
            arcs.push(arc);
        }

        Ok(Self { arcs })
    }

    /// Get the arc values.
    pub fn arcs(&self) -> &[u32] {
        &self.arcs
    }

    /// Get the number of arcs.
    pub fn len(&self) -> usize {
        self.arcs.len()
    }

    /// Check if the OID is empty.
    pub fn is_empty(&self) -> bool {
        self.arcs.is_empty()
    }

    /// Validate arcs per X.690 Section 8.19.4.
    ///
    /// - arc1 must be 0, 1, or 2
    /// - arc2 must be <= 39 when arc1 is 0 or 1
    /// - arc2 can be any value when arc1 is 2
    pub fn validate(&self) -> Result<()> {
        if self.arcs.is_empty() {
            return Ok(());
        }

        let arc1 = self.arcs[0];
        if arc1 > 2 {
            return Err(Error::invalid_oid(OidErrorKind::InvalidFirstArc(arc1)));
        }

        if self.arcs.len() >= 2 {
            let arc2 = self.arcs[1];
            if arc1 < 2 && arc2 >= 40 {
                return Err(Error::invalid_oid(OidErrorKind::InvalidSecondArc {
                    first: arc1,
                    second: arc2,
                }));
            }
        }

        Ok(())
    }

    /// Number of content bytes this OID occupies in BER (V of the TLV).
    ///
    /// The first two arcs collapse into one subidentifier of `40*a + b`;
    /// every subidentifier is base-128 encoded.
    pub fn content_len(&self) -> usize {
        if self.arcs.is_empty() {
            return 0;
        }

        let head = if self.arcs.len() >= 2 {
            self.arcs[0] * 40 + self.arcs[1]
        } else {
            self.arcs[0] * 40
        };

        let mut len = base128_len(head);
        if self.arcs.len() > 2 {
            for &arc in &self.arcs[2..] {
                len += base128_len(arc);
            }
        }
        len
    }

    /// Write the BER content bytes (no tag, no length) to a sink.
    pub fn encode_content<S: ByteSink>(&self, sink: &mut S) -> Result<()> {
        if self.arcs.is_empty() {
            return Ok(());
        }

        let head = if self.arcs.len() >= 2 {
            self.arcs[0] * 40 + self.arcs[1]
        } else {
            self.arcs[0] * 40
        };
        encode_subidentifier(sink, head)?;

        if self.arcs.len() > 2 {
            for &arc in &self.arcs[2..] {
                encode_subidentifier(sink, arc)?;
            }
        }
        Ok(())
    }

    /// Encode the BER content bytes into a stack-friendly buffer.
    pub fn to_ber(&self) -> SmallVec<[u8; 64]> {
        let mut bytes = SmallVec::new();
        // Memory-backed sinks never fail.
        self.encode_content(&mut bytes).expect("infallible sink");
        bytes
    }

    /// Decode from BER content bytes.
    ///
    /// Enforces [`MAX_OID_LEN`] per RFC 2578 Section 3.5.
    pub fn from_ber(data: &[u8]) -> Result<Self> {
        if data.is_empty() {
            return Ok(Self::empty());
        }

        let mut arcs = SmallVec::new();

        // The first subidentifier packs the first two arcs as 40*a + b.
        let (head, consumed) = decode_subidentifier(data)?;
        if head < 40 {
            arcs.push(0);
            arcs.push(head);
        } else if head < 80 {
            arcs.push(1);
            arcs.push(head - 40);
        } else {
            arcs.push(2);
            arcs.push(head - 80);
        }

        let mut i = consumed;
        while i < data.len() {
            let (arc, used) = decode_subidentifier(&data[i..])?;
            arcs.push(arc);
            i += used;

            if arcs.len() > MAX_OID_LEN {
                return Err(Error::invalid_oid(OidErrorKind::TooManyArcs {
                    count: arcs.len(),
                    max: MAX_OID_LEN,
                }));
            }
        }

        Ok(Self { arcs })
    }
}

/// Returns the number of bytes needed for base-128 variable-length encoding.
#[inline]
const fn base128_len(value: u32) -> usize {
    if value < 0x80 {
        1
    } else if value < 0x4000 {
        2
    } else if value < 0x200000 {
        3
    } else if value < 0x10000000 {
        4
    } else {
        5
    }
}

/// Encode a subidentifier in base-128, MSB-first, continuation bit on all
/// groups but the last.
fn encode_subidentifier<S: ByteSink>(sink: &mut S, value: u32) -> Result<()> {
    let groups = base128_len(value);
    for i in (0..groups).rev() {
        let mut byte = ((value >> (i * 7)) & 0x7F) as u8;
        if i > 0 {
            byte |= 0x80;
        }
        sink.write(byte)?;
    }
    Ok(())
}

/// Decode a subidentifier, returning (value, bytes_consumed).
fn decode_subidentifier(data: &[u8]) -> Result<(u32, usize)> {
    let mut value: u32 = 0;
    let mut i = 0;

    loop {
        if i >= data.len() {
            return Err(Error::parse(i, ParseErrorKind::ShortPayload));
        }

        let byte = data[i];
        i += 1;

        if value > (u32::MAX >> 7) {
            return Err(Error::invalid_oid(OidErrorKind::SubidentifierOverflow));
        }

        value = (value << 7) | ((byte & 0x7F) as u32);

        if byte & 0x80 == 0 {
            break;
        }
    }

    Ok((value, i))
}

impl fmt::Debug for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Oid({})", self)
    }
}

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for arc in &self.arcs {
            if !first {
                write!(f, ".")?;
            }
            write!(f, "{}", arc)?;
            first = false;
        }
        Ok(())
    }
}

impl std::str::FromStr for Oid {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl From<&[u32]> for Oid {
    fn from(arcs: &[u32]) -> Self {
        Self::from_slice(arcs)
    }
}

impl<const N: usize> From<[u32; N]> for Oid {
    fn from(arcs: [u32; N]) -> Self {
        Self::new(arcs)
    }
}

impl PartialOrd for Oid {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Oid {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.arcs.cmp(&other.arcs)
    }
}

/// Macro to create an OID from arc literals.
///
/// ```
/// use snmp_wire::oid;
///
/// let sys_name = oid!(1, 3, 6, 1, 2, 1, 1, 5, 0);
/// assert_eq!(sys_name.to_string(), "1.3.6.1.2.1.1.5.0");
/// ```
#[macro_export]
macro_rules! oid {
    ($($arc:expr),* $(,)?) => {
        $crate::oid::Oid::from_slice(&[$($arc),*])
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let oid = Oid::parse("1.3.6.1.2.1.1.1.0").unwrap();
        assert_eq!(oid.arcs(), &[1, 3, 6, 1, 2, 1, 1, 1, 0]);
        assert_eq!(oid.to_string(), "1.3.6.1.2.1.1.1.0");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Oid::parse("1.3.x.1").is_err());
        assert!(Oid::parse("1..3").is_err());
        assert!(Oid::parse(".1.3").is_err());
        assert!(Oid::parse("1.3.").is_err());
    }

    #[test]
    fn test_ber_content() {
        // 1.3.6.1 encodes as 2B 06 01
        let oid = oid!(1, 3, 6, 1);
        let ber = oid.to_ber();
        assert_eq!(&ber[..], &[0x2B, 0x06, 0x01]);
        assert_eq!(oid.content_len(), 3);
    }

    #[test]
    fn test_large_arc_encoding() {
        // 54858 = 0xD64A needs three base-128 groups: 83 AC 4A
        let oid = Oid::parse("1.3.6.1.4.1.54858.81.1.1.1.0").unwrap();
        let ber = oid.to_ber();
        assert_eq!(
            &ber[..],
            &[0x2B, 0x06, 0x01, 0x04, 0x01, 0x83, 0xAC, 0x4A, 0x51, 0x01, 0x01, 0x01, 0x00]
        );
        assert_eq!(oid.content_len(), 13);
    }

    #[test]
    fn test_from_ber_roundtrip() {
        let cases = [
            "1.3.6.1.2.1.1.5.0",
            "1.3.6.1.4.1.54858.81.1.1.1.0",
            "0.39",
            "1.0",
            "2.999.1",
            "1.3.6.1.2.1.2.2.1.8.4096",
        ];
        for s in cases {
            let oid = Oid::parse(s).unwrap();
            let ber = oid.to_ber();
            let back = Oid::from_ber(&ber).unwrap();
            assert_eq!(oid, back, "roundtrip failed for {}", s);
        }
    }

    #[test]
    fn test_from_ber_truncated_subidentifier() {
        // Continuation bit set on the final byte
        assert!(Oid::from_ber(&[0x2B, 0x83, 0xAC]).is_err());
    }

    #[test]
    fn test_max_arcs_enforced() {
        let long: Vec<u32> = std::iter::once(1)
            .chain(std::iter::once(3))
            .chain(0..127)
            .collect();
        let oid = Oid::new(long);
        assert!(oid.len() > MAX_OID_LEN);
        let ber = oid.to_ber();
        assert!(Oid::from_ber(&ber).is_err());

        // Exactly 128 arcs is fine
        let ok: Vec<u32> = std::iter::once(1)
            .chain(std::iter::once(3))
            .chain(0..126)
            .collect();
        let oid = Oid::new(ok);
        assert_eq!(oid.len(), MAX_OID_LEN);
        assert!(Oid::from_ber(&oid.to_ber()).is_ok());
    }

    #[test]
    fn test_validate() {
        assert!(Oid::parse("1.3.6.1").unwrap().validate().is_ok());
        assert!(Oid::from_slice(&[3, 0]).validate().is_err());
        assert!(Oid::from_slice(&[0, 40]).validate().is_err());
        assert!(Oid::from_slice(&[2, 999]).validate().is_ok());
        assert!(Oid::empty().validate().is_ok());
    }

    #[test]
    fn test_ordering() {
        let a = oid!(1, 3, 6, 1);
        let b = oid!(1, 3, 6, 1, 0);
        let c = oid!(1, 3, 7);
        assert!(a < b);
        assert!(b < c);
    }
}
