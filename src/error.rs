//! Error types for snmp-wire.
//!
//! All errors are `#[non_exhaustive]` to allow adding new variants without breaking changes.

/// Result type alias using the library's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// BER parse error kinds.
///
/// These cover byte-level failures: the input could not be read as a
/// well-formed TLV stream. Shape problems in an otherwise well-formed
/// message are [`StructureErrorKind`] instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ParseErrorKind {
    /// Long-form tag did not terminate, or no byte was available for one.
    MalformedTag,
    /// Indefinite length form, oversized length, or truncated length bytes.
    MalformedLength,
    /// Declared length exceeds the bytes available, or a child decode underflowed.
    ShortPayload,
    /// Child decodes overshot a constructed region's declared length.
    TrailingBytes,
    /// A tag matched none of the recognized variants.
    UnknownTag { class: u8, number: u32 },
    /// Counter64 payload longer than 9 bytes (one leading zero plus eight
    /// value bytes).
    Integer64TooLong { length: usize },
}

impl std::fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MalformedTag => write!(f, "malformed tag"),
            Self::MalformedLength => write!(f, "malformed length"),
            Self::ShortPayload => write!(f, "input ended before declared length"),
            Self::TrailingBytes => write!(f, "content overran declared length"),
            Self::UnknownTag { class, number } => {
                write!(f, "unknown tag (class 0x{:02X}, number {})", class, number)
            }
            Self::Integer64TooLong { length } => {
                write!(f, "integer64 too long: {} bytes", length)
            }
        }
    }
}

/// Message structure error kinds.
///
/// Raised when BER decoding succeeded but the decoded tree does not have the
/// shape of an SNMP message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum StructureErrorKind {
    /// Outermost object was not a SEQUENCE.
    NotASequence,
    /// Unknown SNMP version.
    UnknownVersion(i32),
    /// PDU tag was not one of the recognized PDU types.
    UnknownPduType(u32),
    /// A PDU or message field had the wrong BER type.
    WrongFieldType { field: &'static str },
    /// A required PDU or message field was missing.
    MissingField { field: &'static str },
    /// An extra child followed the variable bindings.
    ExtraField { field: &'static str },
    /// A field value was outside its permitted range.
    ValueOutOfRange { field: &'static str },
    /// GetBulkRequest carried in a version 1 message.
    BulkRequestInV1,
    /// Version 1 Trap shape carried in a v2c message.
    TrapInV2c,
    /// A VarBind was not a two-element (name, value) sequence.
    InvalidVarBind,
}

impl std::fmt::Display for StructureErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotASequence => write!(f, "message is not a SEQUENCE"),
            Self::UnknownVersion(v) => write!(f, "unknown SNMP version: {}", v),
            Self::UnknownPduType(t) => write!(f, "unknown PDU type: 0x{:02X}", t),
            Self::WrongFieldType { field } => write!(f, "wrong BER type for {}", field),
            Self::MissingField { field } => write!(f, "missing {}", field),
            Self::ExtraField { field } => write!(f, "unexpected data after {}", field),
            Self::ValueOutOfRange { field } => write!(f, "{} out of range", field),
            Self::BulkRequestInV1 => write!(f, "GetBulkRequest not valid in SNMPv1"),
            Self::TrapInV2c => write!(f, "v1 Trap PDU not valid in SNMPv2c"),
            Self::InvalidVarBind => write!(f, "variable binding is not a (name, value) pair"),
        }
    }
}

/// Build-side error kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum EncodeErrorKind {
    /// GetBulkRequest cannot be encoded into a version 1 message.
    BulkRequestInV1,
    /// The v1 Trap shape cannot be encoded into a v2c message.
    TrapInV2c,
}

impl std::fmt::Display for EncodeErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BulkRequestInV1 => write!(f, "GetBulkRequest not valid in SNMPv1"),
            Self::TrapInV2c => write!(f, "v1 Trap PDU not valid in SNMPv2c"),
        }
    }
}

/// OID validation error kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum OidErrorKind {
    /// Invalid arc value in dotted notation.
    InvalidArc,
    /// First arc must be 0, 1, or 2.
    InvalidFirstArc(u32),
    /// Second arc too large for first arc value.
    InvalidSecondArc { first: u32, second: u32 },
    /// OID has too many arcs (exceeds MAX_OID_LEN).
    TooManyArcs { count: usize, max: usize },
    /// Subidentifier overflowed 32 bits during decoding.
    SubidentifierOverflow,
}

impl std::fmt::Display for OidErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidArc => write!(f, "invalid arc value"),
            Self::InvalidFirstArc(v) => write!(f, "first arc must be 0, 1, or 2, got {}", v),
            Self::InvalidSecondArc { first, second } => {
                write!(f, "second arc {} too large for first arc {}", second, first)
            }
            Self::TooManyArcs { count, max } => {
                write!(f, "OID has {} arcs, exceeds maximum {}", count, max)
            }
            Self::SubidentifierOverflow => write!(f, "subidentifier overflow"),
        }
    }
}

/// SNMP error status codes (RFC 3416).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorStatus {
    NoError,
    TooBig,
    NoSuchName,
    BadValue,
    ReadOnly,
    GenErr,
    NoAccess,
    WrongType,
    WrongLength,
    WrongEncoding,
    WrongValue,
    NoCreation,
    InconsistentValue,
    ResourceUnavailable,
    CommitFailed,
    UndoFailed,
    AuthorizationError,
    NotWritable,
    InconsistentName,
    /// Unknown/future error status code.
    Unknown(i32),
}

impl ErrorStatus {
    /// Create from raw status code.
    pub fn from_i32(value: i32) -> Self {
        match value {
            0 => Self::NoError,
            1 => Self::TooBig,
            2 => Self::NoSuchName,
            3 => Self::BadValue,
            4 => Self::ReadOnly,
            5 => Self::GenErr,
            6 => Self::NoAccess,
            7 => Self::WrongType,
            8 => Self::WrongLength,
            9 => Self::WrongEncoding,
            10 => Self::WrongValue,
            11 => Self::NoCreation,
            12 => Self::InconsistentValue,
            13 => Self::ResourceUnavailable,
            14 => Self::CommitFailed,
            15 => Self::UndoFailed,
            16 => Self::AuthorizationError,
            17 => Self::NotWritable,
            18 => Self::InconsistentName,
            other => Self::Unknown(other),
        }
    }

    /// Convert to raw status code.
    pub fn as_i32(&self) -> i32 {
        match self {
            Self::NoError => 0,
            Self::TooBig => 1,
            Self::NoSuchName => 2,
            Self::BadValue => 3,
            Self::ReadOnly => 4,
            Self::GenErr => 5,
            Self::NoAccess => 6,
            Self::WrongType => 7,
            Self::WrongLength => 8,
            Self::WrongEncoding => 9,
            Self::WrongValue => 10,
            Self::NoCreation => 11,
            Self::InconsistentValue => 12,
            Self::ResourceUnavailable => 13,
            Self::CommitFailed => 14,
            Self::UndoFailed => 15,
            Self::AuthorizationError => 16,
            Self::NotWritable => 17,
            Self::InconsistentName => 18,
            Self::Unknown(code) => *code,
        }
    }

    /// Rewrite a v2c status code for a version 1 message per RFC 2089 Section 2.1.
    ///
    /// v1 managers only understand codes 0-5, so the SNMPv2 codes collapse
    /// onto their closest v1 equivalents and anything not otherwise named
    /// (including [`Unknown`](Self::Unknown) codes) collapses to `GenErr`.
    /// Codes already in the v1 range pass through unchanged, so the rewrite
    /// is idempotent and always lands in the v1 range.
    pub fn to_v1(self) -> Self {
        match self {
            Self::NoError
            | Self::TooBig
            | Self::NoSuchName
            | Self::BadValue
            | Self::ReadOnly
            | Self::GenErr => self,
            Self::WrongValue
            | Self::WrongEncoding
            | Self::WrongType
            | Self::WrongLength
            | Self::InconsistentValue => Self::BadValue,
            Self::NoAccess
            | Self::NotWritable
            | Self::NoCreation
            | Self::InconsistentName
            | Self::AuthorizationError => Self::NoSuchName,
            // ResourceUnavailable, CommitFailed, UndoFailed, and any code
            // outside the named table
            _ => Self::GenErr,
        }
    }
}

impl std::fmt::Display for ErrorStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoError => write!(f, "noError"),
            Self::TooBig => write!(f, "tooBig"),
            Self::NoSuchName => write!(f, "noSuchName"),
            Self::BadValue => write!(f, "badValue"),
            Self::ReadOnly => write!(f, "readOnly"),
            Self::GenErr => write!(f, "genErr"),
            Self::NoAccess => write!(f, "noAccess"),
            Self::WrongType => write!(f, "wrongType"),
            Self::WrongLength => write!(f, "wrongLength"),
            Self::WrongEncoding => write!(f, "wrongEncoding"),
            Self::WrongValue => write!(f, "wrongValue"),
            Self::NoCreation => write!(f, "noCreation"),
            Self::InconsistentValue => write!(f, "inconsistentValue"),
            Self::ResourceUnavailable => write!(f, "resourceUnavailable"),
            Self::CommitFailed => write!(f, "commitFailed"),
            Self::UndoFailed => write!(f, "undoFailed"),
            Self::AuthorizationError => write!(f, "authorizationError"),
            Self::NotWritable => write!(f, "notWritable"),
            Self::InconsistentName => write!(f, "inconsistentName"),
            Self::Unknown(code) => write!(f, "unknown({})", code),
        }
    }
}

/// Library error type.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// BER parse error.
    #[error("parse error at offset {offset}: {kind}")]
    Parse { offset: usize, kind: ParseErrorKind },

    /// Well-formed BER whose shape is not a valid SNMP message.
    #[error("structure error: {kind}")]
    Structure { kind: StructureErrorKind },

    /// Message build error.
    #[error("encode error: {kind}")]
    Encode { kind: EncodeErrorKind },

    /// A constructed container exceeded the configured child ceiling.
    #[error("container capacity {limit} exceeded")]
    CapacityExceeded { limit: usize },

    /// Invalid OID format.
    #[error("invalid OID: {kind}")]
    InvalidOid {
        kind: OidErrorKind,
        input: Option<Box<str>>, // Only allocated when parsing string input
    },

    /// I/O error on the stream seam.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a parse error.
    pub fn parse(offset: usize, kind: ParseErrorKind) -> Self {
        Self::Parse { offset, kind }
    }

    /// Create a structure error.
    pub fn structure(kind: StructureErrorKind) -> Self {
        Self::Structure { kind }
    }

    /// Create an encode error.
    pub fn encode(kind: EncodeErrorKind) -> Self {
        Self::Encode { kind }
    }

    /// Create an invalid OID error from a kind (no input string).
    pub fn invalid_oid(kind: OidErrorKind) -> Self {
        Self::InvalidOid { kind, input: None }
    }

    /// Create an invalid OID error with the input string that failed.
    pub fn invalid_oid_with_input(kind: OidErrorKind, input: impl Into<Box<str>>) -> Self {
        Self::InvalidOid {
            kind,
            input: Some(input.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_roundtrip() {
        for code in 0..=18 {
            assert_eq!(ErrorStatus::from_i32(code).as_i32(), code);
        }
        assert_eq!(ErrorStatus::from_i32(99), ErrorStatus::Unknown(99));
    }

    #[test]
    fn test_v1_rewrite_table() {
        use ErrorStatus::*;
        assert_eq!(WrongValue.to_v1(), BadValue);
        assert_eq!(WrongEncoding.to_v1(), BadValue);
        assert_eq!(WrongType.to_v1(), BadValue);
        assert_eq!(WrongLength.to_v1(), BadValue);
        assert_eq!(InconsistentValue.to_v1(), BadValue);
        assert_eq!(NoAccess.to_v1(), NoSuchName);
        assert_eq!(NotWritable.to_v1(), NoSuchName);
        assert_eq!(NoCreation.to_v1(), NoSuchName);
        assert_eq!(InconsistentName.to_v1(), NoSuchName);
        assert_eq!(AuthorizationError.to_v1(), NoSuchName);
        assert_eq!(ResourceUnavailable.to_v1(), GenErr);
        assert_eq!(CommitFailed.to_v1(), GenErr);
        assert_eq!(UndoFailed.to_v1(), GenErr);
        // codes outside the named table collapse to genErr
        assert_eq!(Unknown(19).to_v1(), GenErr);
        assert_eq!(Unknown(99).to_v1(), GenErr);
        // v1 codes pass through
        assert_eq!(NoError.to_v1(), NoError);
        assert_eq!(TooBig.to_v1(), TooBig);
        assert_eq!(NoSuchName.to_v1(), NoSuchName);
        assert_eq!(BadValue.to_v1(), BadValue);
        assert_eq!(ReadOnly.to_v1(), ReadOnly);
        assert_eq!(GenErr.to_v1(), GenErr);
    }

    #[test]
    fn test_v1_rewrite_idempotent() {
        for code in (0..=20).chain([99, 255, i32::MAX]) {
            let status = ErrorStatus::from_i32(code);
            assert_eq!(status.to_v1().to_v1(), status.to_v1());
        }
    }

    #[test]
    fn test_v1_rewrite_closes_into_v1_range() {
        // Quantified over unknown codes too, not just the named table
        for code in (0..=30).chain([99, 255, i32::MAX, -1]) {
            let mapped = ErrorStatus::from_i32(code).to_v1();
            assert!(
                (0..=5).contains(&mapped.as_i32()),
                "{:?} not in v1 range",
                mapped
            );
        }
    }
}
