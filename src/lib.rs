//! # snmp-wire
//!
//! BER codec and message assembly for SNMP v1/v2c.
//!
//! The crate serializes and deserializes the SNMP messages carried in a
//! datagram: typed BER primitives (integers, octet strings, OIDs, counters,
//! gauges, time ticks, opaque-wrapped floats), constructed containers, and
//! the PDU shapes of both protocol versions, including the v1 Trap preamble
//! and GetBulkRequest's repurposed error fields. It does not open sockets,
//! resolve MIB names, or implement SNMPv3 security; hand the bytes to your
//! transport and the parsed [`Message`] to your application.
//!
//! # Example
//!
//! ```
//! use snmp_wire::{Message, PduType, VarBind, Version, oid};
//!
//! let mut request = Message::new(Version::V2c, &b"public"[..], PduType::GetRequest);
//! request.set_request_id(1);
//! request.push(VarBind::null(oid!(1, 3, 6, 1, 2, 1, 1, 5, 0)));
//!
//! let datagram = request.to_bytes().unwrap();
//! let parsed = Message::from_bytes(&datagram).unwrap();
//! assert_eq!(parsed, request);
//! ```

pub mod ber;
pub mod error;
pub mod message;
pub mod oid;
pub mod varbind;
pub mod version;

pub use ber::{BerObject, Sequence, Tag};
pub use error::{Error, ErrorStatus, Result};
pub use message::{GenericTrap, Message, Pdu, PduType, TrapFields};
pub use oid::Oid;
pub use varbind::{VarBind, VarBindList};
pub use version::Version;

/// Well-known UDP ports. The crate does not open sockets; these are exported
/// for the transport layer's convenience.
pub mod port {
    /// Agents listen here for requests.
    pub const SNMP: u16 = 161;
    /// Managers listen here for Trap, InformRequest and SNMPv2-Trap messages.
    pub const TRAP: u16 = 162;
}
