use crate::error::CodecError;
use derive_more::{Deref, From};
use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

#[derive(From, Deref, Clone, Copy)]
pub struct NodeTypeInt(u8);
impl From<NodeType> for NodeTypeInt {
    fn from(node_type: NodeType) -> Self {
        Self(node_type as u8)
    }
}

/// Node types are mapped to integers by hand so that reordering the enum never changes the wire format.
#[repr(u8)]
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, FromPrimitive, Debug)]
pub enum NodeType {
    Unit = 0,
    Bool = 1,
    I64 = 2,
    U64 = 3,
    F64 = 4,
    Str = 5,
    Bytes = 6,
    Seq = 7,
    Map = 8,
    Some = 9,
    Record = 10,
    Variant = 11,
    Shared = 12,
    BackRef = 13,
}
impl TryFrom<NodeTypeInt> for NodeType {
    type Error = CodecError;
    fn try_from(int: NodeTypeInt) -> Result<Self, CodecError> {
        NodeType::from_u8(int.0)
            .ok_or_else(|| CodecError::Format(format!("Unknown node type {}", int.0)))
    }
}
