//! SNMP message and PDU model.
//!
//! A [`Message`] is the outer SEQUENCE `[version, community, pdu]`; the pdu
//! is a context-tagged SEQUENCE whose internal layout depends on its kind:
//! the generic request/response header, the GetBulkRequest header with its
//! repurposed error fields, or the five-field v1 Trap preamble.
//!
//! Building assembles the BER object tree, sizes it, and encodes through
//! either seam; parsing decodes the whole tree through the tag-driven
//! factory and then destructures it, moving the variable bindings out of the
//! transient pdu container without copying.

use crate::ber::io::{SliceSource, StreamSink, StreamSource};
use crate::ber::object::{BerObject, Sequence};
use crate::ber::tag::Tag;
use crate::error::{EncodeErrorKind, Error, ErrorStatus, Result, StructureErrorKind};
use crate::oid;
use crate::oid::Oid;
use crate::varbind::{VarBind, VarBindList};
use crate::version::Version;
use bytes::Bytes;
use std::io;

/// sysUpTime.0, the mandatory first varbind of v2c notifications.
pub fn sys_uptime_oid() -> Oid {
    oid!(1, 3, 6, 1, 2, 1, 1, 3, 0)
}

/// snmpTrapOID.0, the mandatory second varbind of v2c notifications.
pub fn snmp_trap_oid() -> Oid {
    oid!(1, 3, 6, 1, 6, 3, 1, 1, 4, 1, 0)
}

/// Centiseconds since the first clock query in this process.
fn uptime_centiseconds() -> u32 {
    use std::sync::OnceLock;
    use std::time::Instant;

    static EPOCH: OnceLock<Instant> = OnceLock::new();
    let epoch = *EPOCH.get_or_init(Instant::now);
    (epoch.elapsed().as_millis() / 10) as u32
}

/// PDU kind, one per context-constructed tag 0xA0-0xA8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PduType {
    GetRequest,
    GetNextRequest,
    GetResponse,
    SetRequest,
    /// Version 1 trap, with its own five-field preamble.
    Trap,
    GetBulkRequest,
    InformRequest,
    SnmpV2Trap,
    Report,
}

impl PduType {
    /// The context-constructed tag for this PDU kind.
    pub const fn as_tag(self) -> Tag {
        match self {
            PduType::GetRequest => Tag::GET_REQUEST,
            PduType::GetNextRequest => Tag::GET_NEXT_REQUEST,
            PduType::GetResponse => Tag::GET_RESPONSE,
            PduType::SetRequest => Tag::SET_REQUEST,
            PduType::Trap => Tag::TRAP_V1,
            PduType::GetBulkRequest => Tag::GET_BULK_REQUEST,
            PduType::InformRequest => Tag::INFORM_REQUEST,
            PduType::SnmpV2Trap => Tag::TRAP_V2,
            PduType::Report => Tag::REPORT,
        }
    }

    /// Map a decoded tag back to a PDU kind.
    pub fn from_tag(tag: Tag) -> Option<Self> {
        match tag {
            Tag::GET_REQUEST => Some(PduType::GetRequest),
            Tag::GET_NEXT_REQUEST => Some(PduType::GetNextRequest),
            Tag::GET_RESPONSE => Some(PduType::GetResponse),
            Tag::SET_REQUEST => Some(PduType::SetRequest),
            Tag::TRAP_V1 => Some(PduType::Trap),
            Tag::GET_BULK_REQUEST => Some(PduType::GetBulkRequest),
            Tag::INFORM_REQUEST => Some(PduType::InformRequest),
            Tag::TRAP_V2 => Some(PduType::SnmpV2Trap),
            Tag::REPORT => Some(PduType::Report),
            _ => None,
        }
    }

    /// Notifications get the sysUpTime/snmpTrapOID preamble treatment.
    pub const fn is_notification(self) -> bool {
        matches!(
            self,
            PduType::Trap | PduType::InformRequest | PduType::SnmpV2Trap
        )
    }
}

impl std::fmt::Display for PduType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PduType::GetRequest => "GetRequest",
            PduType::GetNextRequest => "GetNextRequest",
            PduType::GetResponse => "GetResponse",
            PduType::SetRequest => "SetRequest",
            PduType::Trap => "Trap",
            PduType::GetBulkRequest => "GetBulkRequest",
            PduType::InformRequest => "InformRequest",
            PduType::SnmpV2Trap => "SNMPv2-Trap",
            PduType::Report => "Report",
        };
        f.write_str(name)
    }
}

/// Generic trap codes for the v1 Trap PDU (RFC 1157).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GenericTrap {
    #[default]
    ColdStart,
    WarmStart,
    LinkDown,
    LinkUp,
    AuthenticationFailure,
    EgpNeighborLoss,
    EnterpriseSpecific,
}

impl GenericTrap {
    /// Create from the wire code.
    pub const fn from_i32(value: i32) -> Option<Self> {
        match value {
            0 => Some(Self::ColdStart),
            1 => Some(Self::WarmStart),
            2 => Some(Self::LinkDown),
            3 => Some(Self::LinkUp),
            4 => Some(Self::AuthenticationFailure),
            5 => Some(Self::EgpNeighborLoss),
            6 => Some(Self::EnterpriseSpecific),
            _ => None,
        }
    }

    /// Convert to the wire code.
    pub const fn as_i32(self) -> i32 {
        self as i32
    }
}

impl std::fmt::Display for GenericTrap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::ColdStart => "coldStart",
            Self::WarmStart => "warmStart",
            Self::LinkDown => "linkDown",
            Self::LinkUp => "linkUp",
            Self::AuthenticationFailure => "authenticationFailure",
            Self::EgpNeighborLoss => "egpNeighborLoss",
            Self::EnterpriseSpecific => "enterpriseSpecific",
        };
        f.write_str(name)
    }
}

/// The five-field preamble of the v1 Trap PDU.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TrapFields {
    /// Enterprise OID identifying the trap's origin.
    pub enterprise: Oid,
    /// Network address of the agent.
    pub agent_addr: [u8; 4],
    /// Generic trap code.
    pub generic_trap: GenericTrap,
    /// Enterprise-specific trap code.
    pub specific_trap: i32,
    /// Time since agent startup, in centiseconds.
    pub timestamp: u32,
}

/// PDU-kind-specific fields.
///
/// The C++ ancestry of this layout overlaid the three shapes in a union;
/// here each shape owns its fields outright.
#[derive(Debug, Clone, PartialEq)]
pub enum Pdu {
    /// Get/GetNext/GetResponse/Set/Inform/SNMPv2-Trap/Report header.
    Generic {
        error_status: ErrorStatus,
        error_index: u8,
    },
    /// GetBulkRequest header; the error fields carry the bulk parameters.
    Bulk {
        non_repeaters: u8,
        max_repetitions: u8,
    },
    /// v1 Trap preamble.
    Trap(TrapFields),
}

/// An SNMP v1/v2c message.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    version: Version,
    community: Bytes,
    pdu_type: PduType,
    request_id: i32,
    pdu: Pdu,
    varbinds: VarBindList,
    /// Pinned sysUpTime for v2c notifications; live clock when unset.
    sys_uptime: Option<u32>,
}

impl Message {
    /// Create a message with an empty binding list.
    ///
    /// The request id defaults to a random 32-bit value; override with
    /// [`set_request_id`](Self::set_request_id) for deterministic tests.
    pub fn new(version: Version, community: impl Into<Bytes>, pdu_type: PduType) -> Self {
        let pdu = match pdu_type {
            PduType::GetBulkRequest => Pdu::Bulk {
                non_repeaters: 0,
                max_repetitions: 0,
            },
            PduType::Trap => Pdu::Trap(TrapFields::default()),
            _ => Pdu::Generic {
                error_status: ErrorStatus::NoError,
                error_index: 0,
            },
        };

        Self {
            version,
            community: community.into(),
            pdu_type,
            request_id: rand::random(),
            pdu,
            varbinds: VarBindList::new(),
            sys_uptime: None,
        }
    }

    /// Create a v1 Trap message.
    pub fn trap(community: impl Into<Bytes>, fields: TrapFields) -> Self {
        let mut message = Self::new(Version::V1, community, PduType::Trap);
        message.pdu = Pdu::Trap(fields);
        message
    }

    /// Protocol version.
    pub fn version(&self) -> Version {
        self.version
    }

    /// Community string.
    pub fn community(&self) -> &Bytes {
        &self.community
    }

    /// PDU kind.
    pub fn pdu_type(&self) -> PduType {
        self.pdu_type
    }

    /// Request id. Zero for parsed v1 Traps, which carry none.
    pub fn request_id(&self) -> i32 {
        self.request_id
    }

    /// Set the request id.
    pub fn set_request_id(&mut self, request_id: i32) {
        self.request_id = request_id;
    }

    /// PDU-kind-specific fields.
    pub fn pdu(&self) -> &Pdu {
        &self.pdu
    }

    /// Error status; `NoError` for bulk and trap PDUs.
    pub fn error_status(&self) -> ErrorStatus {
        match &self.pdu {
            Pdu::Generic { error_status, .. } => *error_status,
            _ => ErrorStatus::NoError,
        }
    }

    /// Error index; zero for bulk and trap PDUs.
    pub fn error_index(&self) -> u8 {
        match &self.pdu {
            Pdu::Generic { error_index, .. } => *error_index,
            _ => 0,
        }
    }

    /// Set the error fields of a generic PDU.
    ///
    /// On a version 1 message the status is first rewritten per RFC 2089
    /// Section 2.1, so v2c-only codes never reach a v1 peer. Has no effect
    /// on bulk and trap PDUs.
    pub fn set_error(&mut self, status: ErrorStatus, index: u8) {
        if let Pdu::Generic {
            error_status,
            error_index,
        } = &mut self.pdu
        {
            *error_status = match self.version {
                Version::V1 => status.to_v1(),
                Version::V2c => status,
            };
            *error_index = index;
        }
    }

    /// GetBulkRequest parameters, if this is a bulk message.
    pub fn bulk(&self) -> Option<(u8, u8)> {
        match &self.pdu {
            Pdu::Bulk {
                non_repeaters,
                max_repetitions,
            } => Some((*non_repeaters, *max_repetitions)),
            _ => None,
        }
    }

    /// Set the GetBulkRequest parameters. Has no effect on other PDU kinds.
    pub fn set_bulk(&mut self, non_repeaters: u8, max_repetitions: u8) {
        if let Pdu::Bulk {
            non_repeaters: nr,
            max_repetitions: mr,
        } = &mut self.pdu
        {
            *nr = non_repeaters;
            *mr = max_repetitions;
        }
    }

    /// Trap preamble fields, if this is a v1 Trap message.
    pub fn trap_fields(&self) -> Option<&TrapFields> {
        match &self.pdu {
            Pdu::Trap(fields) => Some(fields),
            _ => None,
        }
    }

    /// Replace the Trap preamble. Has no effect on other PDU kinds.
    pub fn set_trap_fields(&mut self, fields: TrapFields) {
        if let Pdu::Trap(current) = &mut self.pdu {
            *current = fields;
        }
    }

    /// Pin the sysUpTime value written into v2c notifications at build time.
    ///
    /// When unset, build samples the process uptime clock instead.
    pub fn set_sys_uptime(&mut self, centiseconds: u32) {
        self.sys_uptime = Some(centiseconds);
    }

    /// The variable bindings.
    pub fn varbinds(&self) -> &VarBindList {
        &self.varbinds
    }

    /// Mutable access to the variable bindings.
    pub fn varbinds_mut(&mut self) -> &mut VarBindList {
        &mut self.varbinds
    }

    /// Move the variable bindings out of the message.
    pub fn take_varbinds(&mut self) -> VarBindList {
        std::mem::take(&mut self.varbinds)
    }

    /// Append a variable binding.
    pub fn push(&mut self, varbind: VarBind) {
        self.varbinds.push(varbind);
    }

    /// Prepend the two varbinds every InformRequest and SNMPv2-Trap must
    /// open with: `sysUpTime.0` (placeholder, refreshed at build) and
    /// `snmpTrapOID.0`.
    pub fn push_notification_preamble(&mut self, trap_oid: Oid) {
        self.varbinds.insert(
            0,
            VarBind::new(sys_uptime_oid(), BerObject::TimeTicks(0)),
        );
        self.varbinds.insert(
            1,
            VarBind::new(snmp_trap_oid(), BerObject::ObjectIdentifier(trap_oid)),
        );
    }

    /// Total encoded size of the message in bytes.
    pub fn encoded_len(&self) -> Result<usize> {
        Ok(self.to_object()?.encoded_len())
    }

    /// Encode into a freshly allocated, exactly-sized buffer.
    pub fn to_bytes(&self) -> Result<Bytes> {
        let tree = self.to_object()?;
        let size = tree.encoded_len();
        let mut buf = Vec::with_capacity(size);
        tree.encode(&mut buf)?;
        debug_assert_eq!(buf.len(), size);
        Ok(Bytes::from(buf))
    }

    /// Encode directly into a byte stream; returns the bytes written.
    pub fn write_to<W: io::Write>(&self, writer: W) -> Result<usize> {
        let tree = self.to_object()?;
        let mut sink = StreamSink::new(writer);
        tree.encode(&mut sink)?;
        Ok(sink.written())
    }

    /// Parse a message from a datagram buffer.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let mut src = SliceSource::new(data);
        let obj = BerObject::decode(&mut src)?;
        Self::from_object(obj)
    }

    /// Parse a message from a byte stream.
    pub fn read_from<R: io::Read>(reader: R) -> Result<Self> {
        let mut src = StreamSource::new(reader);
        let obj = BerObject::decode(&mut src)?;
        Self::from_object(obj)
    }

    /// Assemble the BER object tree for this message.
    fn to_object(&self) -> Result<Sequence> {
        match (self.version, self.pdu_type) {
            (Version::V1, PduType::GetBulkRequest) => {
                return Err(Error::encode(EncodeErrorKind::BulkRequestInV1));
            }
            (Version::V2c, PduType::Trap) => {
                return Err(Error::encode(EncodeErrorKind::TrapInV2c));
            }
            _ => {}
        }

        let mut pdu = Sequence::with_tag(self.pdu_type.as_tag());
        match &self.pdu {
            Pdu::Trap(fields) => {
                pdu.push(BerObject::ObjectIdentifier(fields.enterprise.clone()))?;
                pdu.push(BerObject::IpAddress(fields.agent_addr))?;
                pdu.push(BerObject::Integer(fields.generic_trap.as_i32()))?;
                pdu.push(BerObject::Integer(fields.specific_trap))?;
                pdu.push(BerObject::TimeTicks(fields.timestamp))?;
            }
            Pdu::Bulk {
                non_repeaters,
                max_repetitions,
            } => {
                pdu.push(BerObject::Integer(self.request_id))?;
                pdu.push(BerObject::Integer(i32::from(*non_repeaters)))?;
                pdu.push(BerObject::Integer(i32::from(*max_repetitions)))?;
            }
            Pdu::Generic {
                error_status,
                error_index,
            } => {
                pdu.push(BerObject::Integer(self.request_id))?;
                pdu.push(BerObject::Integer(error_status.as_i32()))?;
                pdu.push(BerObject::Integer(i32::from(*error_index)))?;
            }
        }

        let mut varbinds = self.varbinds.clone();
        if matches!(
            self.pdu_type,
            PduType::InformRequest | PduType::SnmpV2Trap
        ) {
            // Build time is authoritative for the notification timestamp.
            if let Some(first) = varbinds.get_mut(0) {
                if *first.name() == sys_uptime_oid() {
                    first.value = BerObject::TimeTicks(
                        self.sys_uptime.unwrap_or_else(uptime_centiseconds),
                    );
                }
            }
        }
        pdu.push(varbinds.into_object()?)?;

        let mut outer = Sequence::new();
        outer.push(BerObject::Integer(self.version.as_i32()))?;
        outer.push(BerObject::OctetString(self.community.clone()))?;
        outer.push(BerObject::Sequence(pdu))?;
        Ok(outer)
    }

    /// Destructure a decoded object tree into a message.
    fn from_object(obj: BerObject) -> Result<Self> {
        let BerObject::Sequence(outer) = obj else {
            return Err(Error::structure(StructureErrorKind::NotASequence));
        };
        if outer.tag() != Tag::SEQUENCE {
            return Err(Error::structure(StructureErrorKind::NotASequence));
        }
        if outer.len() != 3 {
            return Err(Error::structure(if outer.len() < 3 {
                StructureErrorKind::MissingField { field: "pdu" }
            } else {
                StructureErrorKind::ExtraField { field: "pdu" }
            }));
        }

        let mut children = outer.into_children().into_iter();

        let version_raw = children
            .next()
            .and_then(|o| o.as_i32())
            .ok_or(Error::structure(StructureErrorKind::WrongFieldType {
                field: "version",
            }))?;
        let version = Version::from_i32(version_raw)
            .ok_or(Error::structure(StructureErrorKind::UnknownVersion(version_raw)))?;

        let community = match children.next() {
            Some(BerObject::OctetString(data)) => data,
            _ => {
                return Err(Error::structure(StructureErrorKind::WrongFieldType {
                    field: "community",
                }));
            }
        };

        let pdu_seq = match children.next() {
            Some(BerObject::Sequence(seq)) if seq.tag() != Tag::SEQUENCE => seq,
            Some(other) => {
                return Err(Error::structure(StructureErrorKind::UnknownPduType(
                    other.tag().number(),
                )));
            }
            None => {
                return Err(Error::structure(StructureErrorKind::MissingField {
                    field: "pdu",
                }));
            }
        };

        let pdu_tag = pdu_seq.tag();
        let pdu_type = PduType::from_tag(pdu_tag).ok_or(Error::structure(
            StructureErrorKind::UnknownPduType(pdu_tag.number()),
        ))?;

        match (version, pdu_type) {
            (Version::V1, PduType::GetBulkRequest) => {
                return Err(Error::structure(StructureErrorKind::BulkRequestInV1));
            }
            (Version::V2c, PduType::Trap) => {
                return Err(Error::structure(StructureErrorKind::TrapInV2c));
            }
            _ => {}
        }

        let expected = if pdu_type == PduType::Trap { 6 } else { 4 };
        if pdu_seq.len() != expected {
            return Err(Error::structure(if pdu_seq.len() < expected {
                StructureErrorKind::MissingField {
                    field: "variable bindings",
                }
            } else {
                StructureErrorKind::ExtraField {
                    field: "variable bindings",
                }
            }));
        }

        let mut fields = pdu_seq.into_children().into_iter();

        let (request_id, pdu) = if pdu_type == PduType::Trap {
            let enterprise = match fields.next() {
                Some(BerObject::ObjectIdentifier(oid)) => oid,
                _ => {
                    return Err(Error::structure(StructureErrorKind::WrongFieldType {
                        field: "enterprise",
                    }));
                }
            };
            let agent_addr = match fields.next() {
                Some(BerObject::IpAddress(addr)) => addr,
                _ => {
                    return Err(Error::structure(StructureErrorKind::WrongFieldType {
                        field: "agent-addr",
                    }));
                }
            };
            let generic_raw = fields
                .next()
                .and_then(|o| o.as_i32())
                .ok_or(Error::structure(StructureErrorKind::WrongFieldType {
                    field: "generic-trap",
                }))?;
            let generic_trap = GenericTrap::from_i32(generic_raw).ok_or(Error::structure(
                StructureErrorKind::ValueOutOfRange {
                    field: "generic-trap",
                },
            ))?;
            let specific_trap = fields
                .next()
                .and_then(|o| o.as_i32())
                .ok_or(Error::structure(StructureErrorKind::WrongFieldType {
                    field: "specific-trap",
                }))?;
            let timestamp = match fields.next() {
                Some(BerObject::TimeTicks(ticks)) => ticks,
                _ => {
                    return Err(Error::structure(StructureErrorKind::WrongFieldType {
                        field: "time-stamp",
                    }));
                }
            };

            (
                0,
                Pdu::Trap(TrapFields {
                    enterprise,
                    agent_addr,
                    generic_trap,
                    specific_trap,
                    timestamp,
                }),
            )
        } else {
            let request_id = fields
                .next()
                .and_then(|o| o.as_i32())
                .ok_or(Error::structure(StructureErrorKind::WrongFieldType {
                    field: "request-id",
                }))?;

            let second = fields
                .next()
                .and_then(|o| o.as_i32())
                .ok_or(Error::structure(StructureErrorKind::WrongFieldType {
                    field: "error-status",
                }))?;
            let third = fields
                .next()
                .and_then(|o| o.as_i32())
                .ok_or(Error::structure(StructureErrorKind::WrongFieldType {
                    field: "error-index",
                }))?;

            let pdu = if pdu_type == PduType::GetBulkRequest {
                let non_repeaters = u8::try_from(second).map_err(|_| {
                    Error::structure(StructureErrorKind::ValueOutOfRange {
                        field: "non-repeaters",
                    })
                })?;
                let max_repetitions = u8::try_from(third).map_err(|_| {
                    Error::structure(StructureErrorKind::ValueOutOfRange {
                        field: "max-repetitions",
                    })
                })?;
                Pdu::Bulk {
                    non_repeaters,
                    max_repetitions,
                }
            } else {
                let error_index = u8::try_from(third).map_err(|_| {
                    Error::structure(StructureErrorKind::ValueOutOfRange {
                        field: "error-index",
                    })
                })?;
                Pdu::Generic {
                    error_status: ErrorStatus::from_i32(second),
                    error_index,
                }
            };

            (request_id, pdu)
        };

        // The remaining child is the binding list; move it out by value.
        let varbinds = match fields.next() {
            Some(obj) => VarBindList::from_object(obj)?,
            None => {
                return Err(Error::structure(StructureErrorKind::MissingField {
                    field: "variable bindings",
                }));
            }
        };

        Ok(Self {
            version,
            community,
            pdu_type,
            request_id,
            pdu,
            varbinds,
            sys_uptime: None,
        })
    }
}

impl std::fmt::Display for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} community={}",
            self.version,
            self.pdu_type,
            String::from_utf8_lossy(&self.community)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oid;

    fn roundtrip(message: &Message) -> Message {
        let bytes = message.to_bytes().unwrap();
        Message::from_bytes(&bytes).unwrap()
    }

    #[test]
    fn test_get_request_roundtrip() {
        let mut message = Message::new(Version::V2c, &b"public"[..], PduType::GetRequest);
        message.set_request_id(0x1234);
        message.push(VarBind::null(oid!(1, 3, 6, 1, 2, 1, 1, 5, 0)));

        let back = roundtrip(&message);
        assert_eq!(back, message);
        assert_eq!(back.request_id(), 0x1234);
        assert_eq!(back.error_status(), ErrorStatus::NoError);
        assert_eq!(back.varbinds().len(), 1);
    }

    #[test]
    fn test_bulk_roundtrip() {
        let mut message = Message::new(Version::V2c, &b"public"[..], PduType::GetBulkRequest);
        message.set_request_id(7);
        message.set_bulk(1, 10);
        message.push(VarBind::null(oid!(1, 3, 6, 1, 2, 1)));

        let back = roundtrip(&message);
        assert_eq!(back.bulk(), Some((1, 10)));
        assert_eq!(back, message);
    }

    #[test]
    fn test_trap_roundtrip() {
        let mut message = Message::trap(
            &b"public"[..],
            TrapFields {
                enterprise: oid!(1, 3, 6, 1, 4, 1, 121),
                agent_addr: [192, 168, 2, 2],
                generic_trap: GenericTrap::EnterpriseSpecific,
                specific_trap: 3,
                timestamp: 1234,
            },
        );
        message.push(VarBind::new(
            oid!(1, 3, 6, 1, 4, 1, 121, 1, 0),
            BerObject::Integer(1),
        ));

        let bytes = message.to_bytes().unwrap();
        let back = Message::from_bytes(&bytes).unwrap();
        assert_eq!(back.pdu_type(), PduType::Trap);
        assert_eq!(back.version(), Version::V1);
        let fields = back.trap_fields().unwrap();
        assert_eq!(fields.enterprise, oid!(1, 3, 6, 1, 4, 1, 121));
        assert_eq!(fields.agent_addr, [192, 168, 2, 2]);
        assert_eq!(fields.generic_trap, GenericTrap::EnterpriseSpecific);
        assert_eq!(fields.specific_trap, 3);
        assert_eq!(fields.timestamp, 1234);
    }

    #[test]
    fn test_set_error_rewrites_on_v1() {
        let mut message = Message::new(Version::V1, &b"public"[..], PduType::GetResponse);
        message.set_error(ErrorStatus::WrongValue, 1);
        assert_eq!(message.error_status(), ErrorStatus::BadValue);

        message.set_error(ErrorStatus::NoAccess, 1);
        assert_eq!(message.error_status(), ErrorStatus::NoSuchName);

        message.set_error(ErrorStatus::ResourceUnavailable, 1);
        assert_eq!(message.error_status(), ErrorStatus::GenErr);

        message.set_error(ErrorStatus::NoSuchName, 2);
        assert_eq!(message.error_status(), ErrorStatus::NoSuchName);
        assert_eq!(message.error_index(), 2);
    }

    #[test]
    fn test_set_error_unknown_code_collapses_on_v1() {
        let mut message = Message::new(Version::V1, &b"public"[..], PduType::GetResponse);
        message.set_error(ErrorStatus::Unknown(99), 1);
        assert_eq!(message.error_status(), ErrorStatus::GenErr);
        assert!(message.error_status().as_i32() <= 5);
    }

    #[test]
    fn test_set_error_passthrough_on_v2c() {
        let mut message = Message::new(Version::V2c, &b"public"[..], PduType::GetResponse);
        message.set_error(ErrorStatus::WrongValue, 1);
        assert_eq!(message.error_status(), ErrorStatus::WrongValue);
    }

    #[test]
    fn test_bulk_rejected_in_v1() {
        let mut message = Message::new(Version::V1, &b"public"[..], PduType::GetBulkRequest);
        message.set_bulk(0, 5);
        assert!(matches!(
            message.to_bytes(),
            Err(Error::Encode {
                kind: EncodeErrorKind::BulkRequestInV1
            })
        ));

        // And the equivalent wire form is rejected on parse
        let mut v2 = Message::new(Version::V2c, &b"public"[..], PduType::GetBulkRequest);
        v2.set_request_id(1);
        let bytes = v2.to_bytes().unwrap().to_vec();
        let mut bad = bytes.clone();
        // version INTEGER is at offset 2..5; flip its value byte to 0 (V1)
        assert_eq!(bad[2], 0x02);
        bad[4] = 0x00;
        assert!(matches!(
            Message::from_bytes(&bad),
            Err(Error::Structure {
                kind: StructureErrorKind::BulkRequestInV1
            })
        ));
    }

    #[test]
    fn test_trap_rejected_in_v2c() {
        let mut message = Message::trap(&b"public"[..], TrapFields::default());
        message.version = Version::V2c;
        assert!(matches!(
            message.to_bytes(),
            Err(Error::Encode {
                kind: EncodeErrorKind::TrapInV2c
            })
        ));
    }

    #[test]
    fn test_notification_preamble_refresh() {
        let mut message = Message::new(Version::V2c, &b"public"[..], PduType::SnmpV2Trap);
        message.set_request_id(9);
        message.push_notification_preamble(oid!(1, 3, 6, 1, 6, 3, 1, 1, 5, 1));
        message.set_sys_uptime(4242);

        let back = roundtrip(&message);
        assert_eq!(back.varbinds().len(), 2);
        assert_eq!(*back.varbinds()[0].name(), sys_uptime_oid());
        assert_eq!(back.varbinds()[0].value(), &BerObject::TimeTicks(4242));
        assert_eq!(*back.varbinds()[1].name(), snmp_trap_oid());
        assert_eq!(
            back.varbinds()[1].value().as_oid().unwrap(),
            &oid!(1, 3, 6, 1, 6, 3, 1, 1, 5, 1)
        );
    }

    #[test]
    fn test_notification_uptime_is_live_when_unpinned() {
        let mut message = Message::new(Version::V2c, &b"c"[..], PduType::InformRequest);
        message.push_notification_preamble(oid!(1, 3, 6, 1, 4, 1, 9, 0, 1));

        let back = roundtrip(&message);
        // The placeholder zero must have been replaced by a clock sample.
        assert!(matches!(
            back.varbinds()[0].value(),
            BerObject::TimeTicks(_)
        ));
    }

    #[test]
    fn test_build_is_idempotent() {
        let mut message = Message::new(Version::V2c, &b"public"[..], PduType::GetRequest);
        message.set_request_id(5);
        message.push(VarBind::null(oid!(1, 3, 6, 1, 2, 1, 1, 1, 0)));

        let first = message.to_bytes().unwrap();
        let second = message.to_bytes().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_seams_are_byte_identical() {
        let mut message = Message::new(Version::V2c, &b"private"[..], PduType::SetRequest);
        message.set_request_id(77);
        message.push(VarBind::new(
            oid!(1, 3, 6, 1, 2, 1, 1, 4, 0),
            BerObject::from("admin@example.net"),
        ));

        let buffered = message.to_bytes().unwrap();
        let mut streamed = Vec::new();
        let written = message.write_to(&mut streamed).unwrap();
        assert_eq!(written, buffered.len());
        assert_eq!(&streamed[..], &buffered[..]);
        assert_eq!(message.encoded_len().unwrap(), buffered.len());
    }

    #[test]
    fn test_read_from_stream() {
        let mut message = Message::new(Version::V2c, &b"public"[..], PduType::GetNextRequest);
        message.set_request_id(3);
        message.push(VarBind::null(oid!(1, 3, 6, 1, 2, 1, 1)));

        let bytes = message.to_bytes().unwrap();
        let back = Message::read_from(&bytes[..]).unwrap();
        assert_eq!(back, message);
    }

    #[test]
    fn test_unknown_version_rejected() {
        let mut message = Message::new(Version::V2c, &b"public"[..], PduType::GetRequest);
        message.set_request_id(1);
        let mut bytes = message.to_bytes().unwrap().to_vec();
        bytes[4] = 0x03;
        assert!(matches!(
            Message::from_bytes(&bytes),
            Err(Error::Structure {
                kind: StructureErrorKind::UnknownVersion(3)
            })
        ));
    }

    #[test]
    fn test_report_pdu_roundtrip() {
        let mut message = Message::new(Version::V2c, &b"public"[..], PduType::Report);
        message.set_request_id(11);
        message.push(VarBind::new(
            oid!(1, 3, 6, 1, 6, 3, 15, 1, 1, 4, 0),
            BerObject::Counter32(2),
        ));
        assert_eq!(roundtrip(&message), message);
    }
}
