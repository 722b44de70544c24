//! BER (Basic Encoding Rules) codec for SNMP.
//!
//! This module provides encoding and decoding of the BER subset SNMP uses,
//! following X.690 with permissive parsing aligned with net-snmp behavior.
//! Layering, leaves first: tag, length, integer content codecs, the
//! sink/source seams, and the [`object::BerObject`] model on top.

pub mod int;
pub mod io;
pub mod length;
pub mod object;
pub mod tag;

pub use io::{ByteSink, ByteSource, SliceSource, StreamSink, StreamSource};
pub use object::{BerObject, Sequence};
pub use tag::{Class, Form, Tag};
