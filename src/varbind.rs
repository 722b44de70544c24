//! Variable binding (VarBind) types.
//!
//! A VarBind pairs an OID name with a BER value; a VarBindList is the
//! ordered run of VarBinds a PDU carries.

use crate::ber::io::{ByteSink, ByteSource};
use crate::ber::length;
use crate::ber::object::{BerObject, Sequence};
use crate::ber::tag::Tag;
use crate::error::{Error, ParseErrorKind, Result, StructureErrorKind};
use crate::oid::Oid;

/// Variable binding - an OID-value pair.
#[derive(Debug, Clone, PartialEq)]
pub struct VarBind {
    /// The object identifier naming the variable.
    pub name: Oid,
    /// The bound value.
    pub value: BerObject,
}

impl VarBind {
    /// Create a new VarBind.
    pub fn new(name: Oid, value: impl Into<BerObject>) -> Self {
        Self {
            name,
            value: value.into(),
        }
    }

    /// Create a VarBind with a NULL value (for GET requests).
    pub fn null(name: Oid) -> Self {
        Self {
            name,
            value: BerObject::Null,
        }
    }

    /// The variable's name.
    pub fn name(&self) -> &Oid {
        &self.name
    }

    /// The bound value.
    pub fn value(&self) -> &BerObject {
        &self.value
    }

    /// Content bytes of the binding's SEQUENCE (V of the TLV).
    pub fn content_len(&self) -> usize {
        let name_content = self.name.content_len();
        let name_tlv = 1 + length::encoded_len(name_content) + name_content;
        name_tlv + self.value.encoded_len()
    }

    /// Total encoded size (T + L + V).
    pub fn encoded_len(&self) -> usize {
        let content = self.content_len();
        1 + length::encoded_len(content) + content
    }

    /// Encode to BER.
    pub fn encode<S: ByteSink>(&self, sink: &mut S) -> Result<()> {
        self.name.validate()?;
        Tag::SEQUENCE.encode(sink)?;
        length::encode(self.content_len(), sink)?;

        let name_content = self.name.content_len();
        Tag::OBJECT_IDENTIFIER.encode(sink)?;
        length::encode(name_content, sink)?;
        self.name.encode_content(sink)?;

        self.value.encode(sink)
    }

    /// Decode from BER.
    pub fn decode<R: ByteSource>(src: &mut R) -> Result<Self> {
        let obj = BerObject::decode(src)?;
        Self::from_object(obj)
    }

    /// Destructure a decoded SEQUENCE into a VarBind.
    pub fn from_object(obj: BerObject) -> Result<Self> {
        let BerObject::Sequence(seq) = obj else {
            return Err(Error::structure(StructureErrorKind::InvalidVarBind));
        };
        if seq.tag() != Tag::SEQUENCE || seq.len() != 2 {
            return Err(Error::structure(StructureErrorKind::InvalidVarBind));
        }

        let mut children = seq.into_children();
        let (Some(value), Some(name_obj)) = (children.pop(), children.pop()) else {
            return Err(Error::structure(StructureErrorKind::InvalidVarBind));
        };
        let BerObject::ObjectIdentifier(name) = name_obj else {
            return Err(Error::structure(StructureErrorKind::InvalidVarBind));
        };

        Ok(Self { name, value })
    }

    /// Convert into the generic object form.
    pub fn into_object(self) -> Result<BerObject> {
        let mut seq = Sequence::new();
        seq.push(BerObject::ObjectIdentifier(self.name))?;
        seq.push(self.value)?;
        Ok(BerObject::Sequence(seq))
    }
}

impl std::fmt::Display for VarBind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} = {}", self.name, self.value)
    }
}

/// Ordered list of variable bindings.
///
/// Insertion order is preserved and observable on the wire.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VarBindList {
    items: Vec<VarBind>,
}

impl VarBindList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Append a binding.
    pub fn push(&mut self, varbind: VarBind) {
        self.items.push(varbind);
    }

    /// Insert a binding at `index`, shifting the rest down.
    pub fn insert(&mut self, index: usize, varbind: VarBind) {
        self.items.insert(index, varbind);
    }

    /// Number of bindings.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Binding at `index`.
    pub fn get(&self, index: usize) -> Option<&VarBind> {
        self.items.get(index)
    }

    /// Mutable binding at `index`.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut VarBind> {
        self.items.get_mut(index)
    }

    /// Iterate over bindings.
    pub fn iter(&self) -> std::slice::Iter<'_, VarBind> {
        self.items.iter()
    }

    /// Content bytes of the list's SEQUENCE (V of the TLV).
    pub fn content_len(&self) -> usize {
        self.items.iter().map(VarBind::encoded_len).sum()
    }

    /// Total encoded size (T + L + V).
    pub fn encoded_len(&self) -> usize {
        let content = self.content_len();
        1 + length::encoded_len(content) + content
    }

    /// Encode to BER.
    pub fn encode<S: ByteSink>(&self, sink: &mut S) -> Result<()> {
        Tag::SEQUENCE.encode(sink)?;
        length::encode(self.content_len(), sink)?;
        for varbind in &self.items {
            varbind.encode(sink)?;
        }
        Ok(())
    }

    /// Decode from BER.
    pub fn decode<R: ByteSource>(src: &mut R) -> Result<Self> {
        let tag = Tag::decode(src)?;
        if tag != Tag::SEQUENCE {
            return Err(Error::structure(StructureErrorKind::WrongFieldType {
                field: "variable bindings",
            }));
        }
        let len = length::decode(src)?;
        let start = src.position();

        let mut items = Vec::new();
        while src.position() - start < len {
            items.push(VarBind::decode(src)?);
            if src.position() - start > len {
                return Err(Error::parse(src.position(), ParseErrorKind::TrailingBytes));
            }
        }

        Ok(Self { items })
    }

    /// Destructure a decoded SEQUENCE into a typed list.
    ///
    /// This is the parse path's ownership transfer: the children move out of
    /// the transient pdu container and into the list.
    pub fn from_object(obj: BerObject) -> Result<Self> {
        let BerObject::Sequence(seq) = obj else {
            return Err(Error::structure(StructureErrorKind::WrongFieldType {
                field: "variable bindings",
            }));
        };
        if seq.tag() != Tag::SEQUENCE {
            return Err(Error::structure(StructureErrorKind::WrongFieldType {
                field: "variable bindings",
            }));
        }

        let items = seq
            .into_children()
            .into_iter()
            .map(VarBind::from_object)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { items })
    }

    /// Convert into the generic object form.
    pub fn into_object(self) -> Result<BerObject> {
        let mut seq = Sequence::new();
        for varbind in self.items {
            seq.push(varbind.into_object()?)?;
        }
        Ok(BerObject::Sequence(seq))
    }
}

impl std::ops::Index<usize> for VarBindList {
    type Output = VarBind;

    fn index(&self, index: usize) -> &VarBind {
        &self.items[index]
    }
}

impl<'a> IntoIterator for &'a VarBindList {
    type Item = &'a VarBind;
    type IntoIter = std::slice::Iter<'a, VarBind>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for VarBindList {
    type Item = VarBind;
    type IntoIter = std::vec::IntoIter<VarBind>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl FromIterator<VarBind> for VarBindList {
    fn from_iter<T: IntoIterator<Item = VarBind>>(iter: T) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ber::io::SliceSource;
    use crate::oid;
    use bytes::Bytes;

    fn roundtrip(vb: &VarBind) -> VarBind {
        let mut buf = Vec::new();
        vb.encode(&mut buf).unwrap();
        assert_eq!(buf.len(), vb.encoded_len());
        let mut src = SliceSource::new(&buf);
        VarBind::decode(&mut src).unwrap()
    }

    #[test]
    fn test_varbind_roundtrip() {
        let vb = VarBind::new(oid!(1, 3, 6, 1), BerObject::Integer(42));
        assert_eq!(roundtrip(&vb), vb);
    }

    #[test]
    fn test_varbind_null_constructor() {
        let vb = VarBind::null(oid!(1, 3, 6, 1, 2, 1, 1, 1, 0));
        assert_eq!(vb.value, BerObject::Null);
        assert_eq!(roundtrip(&vb), vb);
    }

    #[test]
    fn test_varbind_exception_values() {
        for value in [
            BerObject::NoSuchObject,
            BerObject::NoSuchInstance,
            BerObject::EndOfMibView,
        ] {
            let vb = VarBind::new(oid!(1, 3, 6, 1, 2, 1, 1, 1, 0), value);
            let back = roundtrip(&vb);
            assert_eq!(back, vb);
            assert!(back.value.is_exception());
        }
    }

    #[test]
    fn test_varbind_wire_form() {
        let vb = VarBind::null(oid!(1, 3, 6, 1, 2, 1, 1, 5, 0));
        let mut buf = Vec::new();
        vb.encode(&mut buf).unwrap();
        assert_eq!(
            buf,
            vec![
                0x30, 0x0C, 0x06, 0x08, 0x2B, 0x06, 0x01, 0x02, 0x01, 0x01, 0x05, 0x00, 0x05, 0x00
            ]
        );
    }

    #[test]
    fn test_varbind_rejects_non_oid_name() {
        // SEQUENCE { INTEGER 1, NULL }
        let bytes = [0x30, 0x05, 0x02, 0x01, 0x01, 0x05, 0x00];
        let mut src = SliceSource::new(&bytes);
        assert!(VarBind::decode(&mut src).is_err());
    }

    #[test]
    fn test_list_roundtrip_preserves_order() {
        let list: VarBindList = [
            VarBind::new(oid!(1, 3, 6, 1, 2, 1, 1, 1, 0), BerObject::from("router")),
            VarBind::new(oid!(1, 3, 6, 1, 2, 1, 1, 3, 0), BerObject::TimeTicks(123456)),
            VarBind::new(oid!(1, 3, 6, 1, 2, 1, 1, 99, 0), BerObject::NoSuchObject),
            VarBind::new(
                oid!(1, 3, 6, 1, 2, 1, 1, 7, 0),
                BerObject::Counter64(u64::MAX),
            ),
            VarBind::new(
                oid!(1, 3, 6, 1, 2, 1, 1, 6, 0),
                BerObject::IpAddress([192, 168, 1, 1]),
            ),
        ]
        .into_iter()
        .collect();

        let mut buf = Vec::new();
        list.encode(&mut buf).unwrap();
        assert_eq!(buf.len(), list.encoded_len());

        let mut src = SliceSource::new(&buf);
        let back = VarBindList::decode(&mut src).unwrap();
        assert_eq!(back, list);
        assert_eq!(back[0].value.as_str(), Some("router"));
        assert!(back[2].value.is_exception());
    }

    #[test]
    fn test_empty_list() {
        let list = VarBindList::new();
        let mut buf = Vec::new();
        list.encode(&mut buf).unwrap();
        assert_eq!(buf, vec![0x30, 0x00]);

        let mut src = SliceSource::new(&buf);
        assert!(VarBindList::decode(&mut src).unwrap().is_empty());
    }

    #[test]
    fn test_object_conversion_roundtrip() {
        let list: VarBindList = [
            VarBind::new(oid!(1, 3, 6, 1), BerObject::Integer(1)),
            VarBind::new(
                oid!(1, 3, 6, 2),
                BerObject::OctetString(Bytes::from_static(b"x")),
            ),
        ]
        .into_iter()
        .collect();

        let obj = list.clone().into_object().unwrap();
        let back = VarBindList::from_object(obj).unwrap();
        assert_eq!(back, list);
    }

    #[test]
    fn test_display() {
        let vb = VarBind::new(oid!(1, 3, 6, 1), BerObject::Integer(42));
        assert_eq!(vb.to_string(), "1.3.6.1 = 42");
    }
}
