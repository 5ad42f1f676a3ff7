use crate::error::CodecError;
use crate::serde::{GraphReader, NodeType};
use crate::types::Deser;
use std::io::Read;
use std::mem;

/// A node decoded without knowing the Rust type it was written from.
///
/// Shared objects keep their handles, and back-references stay markers;
/// the tree is a faithful picture of the stream, not a rebuilt graph.
#[derive(PartialEq, Clone, Debug)]
pub enum Node {
    Unit,
    Bool(bool),
    I64(i64),
    U64(u64),
    F64(f64),
    Str(String),
    Bytes(Vec<u8>),
    Seq(Vec<Node>),
    Map(Vec<(Node, Node)>),
    Some(Box<Node>),
    Record {
        type_name: String,
        fields: Vec<(String, Node)>,
    },
    Variant {
        type_name: String,
        variant: String,
        payload: Box<Node>,
    },
    Shared {
        handle: u32,
        pointee: Box<Node>,
    },
    BackRef(u32),
}

/// The result of inspecting a whole stream.
#[derive(PartialEq, Clone, Debug)]
pub struct Inspected {
    pub type_name: String,
    pub root: Node,
}

impl Node {
    pub fn node_type(&self) -> NodeType {
        match self {
            Self::Unit => NodeType::Unit,
            Self::Bool(_) => NodeType::Bool,
            Self::I64(_) => NodeType::I64,
            Self::U64(_) => NodeType::U64,
            Self::F64(_) => NodeType::F64,
            Self::Str(_) => NodeType::Str,
            Self::Bytes(_) => NodeType::Bytes,
            Self::Seq(_) => NodeType::Seq,
            Self::Map(_) => NodeType::Map,
            Self::Some(_) => NodeType::Some,
            Self::Record { .. } => NodeType::Record,
            Self::Variant { .. } => NodeType::Variant,
            Self::Shared { .. } => NodeType::Shared,
            Self::BackRef(_) => NodeType::BackRef,
        }
    }

    /// Looks up a record field by name.
    pub fn field(&self, name: &str) -> Option<&Node> {
        match self {
            Self::Record { fields, .. } => fields
                .iter()
                .find_map(|(field_name, node)| (field_name == name).then_some(node)),
            _ => None,
        }
    }

    /// Skips through `Shared` wrappers to the pointee.
    pub fn pointee(&self) -> &Node {
        match self {
            Self::Shared { pointee, .. } => pointee.pointee(),
            _ => self,
        }
    }

    fn deser_body<R: Read>(r: &mut GraphReader<R>, node_type: NodeType) -> Result<Self, CodecError> {
        let node = match node_type {
            NodeType::Unit => Self::Unit,
            NodeType::Bool => {
                let [int] = r.take::<1>()?;
                match int {
                    0 => Self::Bool(false),
                    1 => Self::Bool(true),
                    _ => return Err(CodecError::Format(format!("invalid bool byte {int}"))),
                }
            }
            NodeType::I64 => {
                Self::I64(i64::from_le_bytes(r.take::<{ mem::size_of::<i64>() }>()?))
            }
            NodeType::U64 => {
                Self::U64(u64::from_le_bytes(r.take::<{ mem::size_of::<u64>() }>()?))
            }
            NodeType::F64 => {
                let bits = u64::from_le_bytes(r.take::<{ mem::size_of::<u64>() }>()?);
                Self::F64(f64::from_bits(bits))
            }
            NodeType::Str => Self::Str(r.take_str_body()?),
            NodeType::Bytes => Self::Bytes(r.take_byte_body("byte buffer")?),
            NodeType::Seq => {
                let len = r.take_len("sequence")?;
                r.enter()?;
                let mut members = vec![];
                for _ in 0..len {
                    members.push(Self::deser(r)?);
                }
                r.leave();
                Self::Seq(members)
            }
            NodeType::Map => {
                let len = r.take_len("map")?;
                r.enter()?;
                let mut entries = vec![];
                for _ in 0..len {
                    let k = Self::deser(r)?;
                    let v = Self::deser(r)?;
                    entries.push((k, v));
                }
                r.leave();
                Self::Map(entries)
            }
            NodeType::Some => {
                r.enter()?;
                let inner = Self::deser(r)?;
                r.leave();
                Self::Some(Box::new(inner))
            }
            NodeType::Record => {
                let type_name = r.take_str_body()?;
                let len = r.take_len("record")?;
                r.enter()?;
                let mut fields = vec![];
                for _ in 0..len {
                    let name = r.take_str_body()?;
                    let node = Self::deser(r)?;
                    fields.push((name, node));
                }
                r.leave();
                Self::Record { type_name, fields }
            }
            NodeType::Variant => {
                let type_name = r.take_str_body()?;
                let variant = r.take_str_body()?;
                r.enter()?;
                let payload = Self::deser(r)?;
                r.leave();
                Self::Variant {
                    type_name,
                    variant,
                    payload: Box::new(payload),
                }
            }
            NodeType::Shared => {
                let handle = r.take_handle()?;
                r.inspect_shared(handle)?;
                r.enter()?;
                let pointee = Self::deser(r)?;
                r.leave();
                Self::Shared {
                    handle: *handle,
                    pointee: Box::new(pointee),
                }
            }
            NodeType::BackRef => {
                let handle = r.take_handle()?;
                r.inspect_back_ref(handle)?;
                Self::BackRef(*handle)
            }
        };
        Ok(node)
    }
}

impl Deser for Node {
    fn deser<R: Read>(r: &mut GraphReader<R>) -> Result<Self, CodecError> {
        let node_type = r.take_node_type()?;
        Self::deser_body(r, node_type)
    }
}
