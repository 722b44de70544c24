//! BER tag (identifier octets) codec.
//!
//! Tag encoding follows X.690 Section 8.1.2:
//! - Bits 7-6: Class (00=Universal, 01=Application, 10=Context-specific, 11=Private)
//! - Bit 5: Primitive (0) or Constructed (1)
//! - Bits 4-0: Tag number (0-30, or 0x1F to select the long form)
//!
//! The long form carries the number in big-endian 7-bit groups with the high
//! bit set on every group but the last. SNMP needs it for exactly one type:
//! the Opaque-wrapped float, whose identifier is the two bytes `9F 78`.

use crate::ber::io::{ByteSink, ByteSource};
use crate::error::{Error, ParseErrorKind, Result};

/// Tag class (bits 7-6 of the leading identifier octet).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Class {
    Universal = 0x00,
    Application = 0x40,
    Context = 0x80,
    Private = 0xC0,
}

impl Class {
    /// Extract the class from a leading identifier octet.
    pub const fn from_octet(octet: u8) -> Self {
        match octet & 0xC0 {
            0x00 => Class::Universal,
            0x40 => Class::Application,
            0x80 => Class::Context,
            _ => Class::Private,
        }
    }

    /// The class bits, positioned for the leading octet.
    pub const fn bits(self) -> u8 {
        self as u8
    }
}

/// Tag form (bit 5 of the leading identifier octet).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Form {
    Primitive = 0x00,
    Constructed = 0x20,
}

impl Form {
    /// Extract the form from a leading identifier octet.
    pub const fn from_octet(octet: u8) -> Self {
        if octet & 0x20 != 0 {
            Form::Constructed
        } else {
            Form::Primitive
        }
    }

    /// The form bit, positioned for the leading octet.
    pub const fn bits(self) -> u8 {
        self as u8
    }
}

/// A BER tag: class, form, and tag number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tag {
    class: Class,
    form: Form,
    number: u32,
}

impl Tag {
    pub const BOOLEAN: Tag = Tag::new(Class::Universal, Form::Primitive, 0x01);
    pub const INTEGER: Tag = Tag::new(Class::Universal, Form::Primitive, 0x02);
    pub const OCTET_STRING: Tag = Tag::new(Class::Universal, Form::Primitive, 0x04);
    pub const NULL: Tag = Tag::new(Class::Universal, Form::Primitive, 0x05);
    pub const OBJECT_IDENTIFIER: Tag = Tag::new(Class::Universal, Form::Primitive, 0x06);
    pub const SEQUENCE: Tag = Tag::new(Class::Universal, Form::Constructed, 0x10); // 0x30

    // Application-wide SNMP types
    pub const IP_ADDRESS: Tag = Tag::new(Class::Application, Form::Primitive, 0x00); // 0x40
    pub const COUNTER32: Tag = Tag::new(Class::Application, Form::Primitive, 0x01); // 0x41
    pub const GAUGE32: Tag = Tag::new(Class::Application, Form::Primitive, 0x02); // 0x42
    pub const TIMETICKS: Tag = Tag::new(Class::Application, Form::Primitive, 0x03); // 0x43
    pub const OPAQUE: Tag = Tag::new(Class::Application, Form::Primitive, 0x04); // 0x44
    pub const COUNTER64: Tag = Tag::new(Class::Application, Form::Primitive, 0x06); // 0x46
    pub const FLOAT: Tag = Tag::new(Class::Application, Form::Primitive, 0x08); // 0x48

    // Exception values (context-specific, primitive)
    pub const NO_SUCH_OBJECT: Tag = Tag::new(Class::Context, Form::Primitive, 0x00); // 0x80
    pub const NO_SUCH_INSTANCE: Tag = Tag::new(Class::Context, Form::Primitive, 0x01); // 0x81
    pub const END_OF_MIB_VIEW: Tag = Tag::new(Class::Context, Form::Primitive, 0x02); // 0x82

    // PDU tags (context-specific, constructed)
    pub const GET_REQUEST: Tag = Tag::new(Class::Context, Form::Constructed, 0x00); // 0xA0
    pub const GET_NEXT_REQUEST: Tag = Tag::new(Class::Context, Form::Constructed, 0x01); // 0xA1
    pub const GET_RESPONSE: Tag = Tag::new(Class::Context, Form::Constructed, 0x02); // 0xA2
    pub const SET_REQUEST: Tag = Tag::new(Class::Context, Form::Constructed, 0x03); // 0xA3
    pub const TRAP_V1: Tag = Tag::new(Class::Context, Form::Constructed, 0x04); // 0xA4
    pub const GET_BULK_REQUEST: Tag = Tag::new(Class::Context, Form::Constructed, 0x05); // 0xA5
    pub const INFORM_REQUEST: Tag = Tag::new(Class::Context, Form::Constructed, 0x06); // 0xA6
    pub const TRAP_V2: Tag = Tag::new(Class::Context, Form::Constructed, 0x07); // 0xA7
    pub const REPORT: Tag = Tag::new(Class::Context, Form::Constructed, 0x08); // 0xA8

    /// Floating point inside an Opaque envelope; wire bytes `9F 78`.
    pub const OPAQUE_FLOAT: Tag = Tag::new(Class::Context, Form::Primitive, 0x78);

    /// Create a tag.
    pub const fn new(class: Class, form: Form, number: u32) -> Self {
        Self {
            class,
            form,
            number,
        }
    }

    /// Tag class.
    pub const fn class(&self) -> Class {
        self.class
    }

    /// Tag form.
    pub const fn form(&self) -> Form {
        self.form
    }

    /// Tag number.
    pub const fn number(&self) -> u32 {
        self.number
    }

    /// Check if the tag marks a constructed encoding.
    pub const fn is_constructed(&self) -> bool {
        matches!(self.form, Form::Constructed)
    }

    /// Number of identifier octets this tag occupies on the wire.
    pub const fn encoded_len(&self) -> usize {
        if self.number < 0x1F {
            1
        } else {
            // leading octet plus one octet per 7-bit group
            let mut groups = 0;
            let mut n = self.number;
            loop {
                groups += 1;
                n >>= 7;
                if n == 0 {
                    break;
                }
            }
            1 + groups
        }
    }

    /// Encode the identifier octets.
    pub fn encode<S: ByteSink>(&self, sink: &mut S) -> Result<()> {
        let head = self.class.bits() | self.form.bits();
        if self.number < 0x1F {
            sink.write(head | self.number as u8)
        } else {
            sink.write(head | 0x1F)?;
            let groups = self.encoded_len() - 1;
            for i in (0..groups).rev() {
                let mut byte = ((self.number >> (i * 7)) & 0x7F) as u8;
                if i > 0 {
                    byte |= 0x80;
                }
                sink.write(byte)?;
            }
            Ok(())
        }
    }

    /// Decode identifier octets.
    ///
    /// Fails with `MalformedTag` when the input ends mid-tag or a long-form
    /// number overflows 32 bits.
    pub fn decode<R: ByteSource>(src: &mut R) -> Result<Self> {
        let start = src.position();
        let head = src
            .read()
            .map_err(|_| Error::parse(start, ParseErrorKind::MalformedTag))?;

        let class = Class::from_octet(head);
        let form = Form::from_octet(head);
        let mut number = (head & 0x1F) as u32;

        if number == 0x1F {
            number = 0;
            loop {
                let byte = src
                    .read()
                    .map_err(|_| Error::parse(start, ParseErrorKind::MalformedTag))?;
                if number > (u32::MAX >> 7) {
                    return Err(Error::parse(start, ParseErrorKind::MalformedTag));
                }
                number = (number << 7) | (byte & 0x7F) as u32;
                if byte & 0x80 == 0 {
                    break;
                }
            }
        }

        Ok(Self {
            class,
            form,
            number,
        })
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.number < 0x1F {
            let octet = self.class.bits() | self.form.bits() | self.number as u8;
            write!(f, "0x{:02X}", octet)
        } else {
            write!(f, "{:?}/{:?}/{}", self.class, self.form, self.number)
        }
    }
}
