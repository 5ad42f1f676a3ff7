use crate::config::CodecConfig;
use crate::error::CodecError;
use crate::serde::{BodyLen, Handle, NodeType, NodeTypeInt, MAGIC, VERSION};
use crate::types::{Deser, Dynamic, SharedPtr};
use std::any;
use std::io::Read;
use std::mem;
use tracing::trace;

/// Upper bound on capacity reserved from a length read off the wire, before any member is read.
const PREALLOC_LIMIT: usize = 1024;

enum Slot {
    /// The body is being decoded and no stand-in exists yet.
    Open { type_name: &'static str },
    Ready(Dynamic),
    /// Seen by the schema-less reader, which does not build objects.
    Inspected,
}

/// Reads one object graph out of `R`.
///
/// The handle table holds a strong pointer to every shared object for the reader's lifetime,
/// so weak pointers decoded before their strong owner stay upgradable until decoding ends.
pub struct GraphReader<R: Read> {
    r: R,
    r_len: usize,
    config: CodecConfig,
    depth: usize,
    slots: Vec<Slot>,
}

impl<R: Read> GraphReader<R> {
    pub fn new(r: R, config: CodecConfig) -> Self {
        Self {
            r,
            r_len: 0,
            config,
            depth: 0,
            slots: vec![],
        }
    }

    pub fn r_len(&self) -> usize {
        self.r_len
    }

    pub fn shared_count(&self) -> usize {
        self.slots.len()
    }

    /* Raw input. */

    pub(super) fn take<const LEN: usize>(&mut self) -> Result<[u8; LEN], CodecError> {
        let mut buf = [0u8; LEN];
        self.r.read_exact(&mut buf).map_err(CodecError::from_read)?;
        self.r_len += LEN;
        Ok(buf)
    }
    pub(super) fn take_u32(&mut self) -> Result<u32, CodecError> {
        Ok(u32::from_le_bytes(self.take::<{ mem::size_of::<u32>() }>()?))
    }
    pub(super) fn take_len(&mut self, what: &str) -> Result<usize, CodecError> {
        let int = self.take_u32()?;
        let len = BodyLen::from_wire(int, self.config.max_len, what)?;
        Ok(*len as usize)
    }
    pub(super) fn take_byte_body(&mut self, what: &str) -> Result<Vec<u8>, CodecError> {
        let len = self.take_len(what)?;
        let mut buf = Vec::with_capacity(len.min(PREALLOC_LIMIT));
        (&mut self.r)
            .take(len as u64)
            .read_to_end(&mut buf)
            .map_err(CodecError::from_read)?;
        if buf.len() != len {
            return Err(CodecError::Format(format!(
                "truncated {what}: expected {len} bytes, found {}",
                buf.len()
            )));
        }
        self.r_len += len;
        Ok(buf)
    }
    pub(super) fn take_str_body(&mut self) -> Result<String, CodecError> {
        let buf = self.take_byte_body("string")?;
        String::from_utf8(buf).map_err(|e| CodecError::Format(format!("invalid utf-8: {e}")))
    }
    pub(super) fn take_handle(&mut self) -> Result<Handle, CodecError> {
        self.take_u32().map(Handle::from)
    }

    pub(crate) fn take_node_type(&mut self) -> Result<NodeType, CodecError> {
        let [int] = self.take::<1>()?;
        NodeType::try_from(NodeTypeInt::from(int))
    }

    fn expect_node_type(&mut self, exp: NodeType, exp_desc: &str) -> Result<(), CodecError> {
        let act = self.take_node_type()?;
        if act != exp {
            return Err(Self::unexpected(exp_desc, act));
        }
        Ok(())
    }
    pub(crate) fn unexpected(exp_desc: &str, act: NodeType) -> CodecError {
        CodecError::type_mismatch(exp_desc, format!("{act:?} node"))
    }

    pub(super) fn enter(&mut self) -> Result<(), CodecError> {
        if self.depth >= self.config.max_depth {
            return Err(CodecError::Format(format!(
                "nesting exceeds max depth {}",
                self.config.max_depth
            )));
        }
        self.depth += 1;
        Ok(())
    }
    pub(super) fn leave(&mut self) {
        self.depth -= 1;
    }

    /// Reads the stream header and returns the root type name.
    pub(crate) fn deser_header(&mut self) -> Result<String, CodecError> {
        let magic = self.take::<{ MAGIC.len() }>()?;
        if magic != MAGIC {
            return Err(CodecError::Format(format!("bad magic {magic:02x?}")));
        }
        let [version] = self.take::<1>()?;
        if version != VERSION {
            return Err(CodecError::Format(format!(
                "unsupported version {version}, expected {VERSION}"
            )));
        }
        self.take_str_body()
    }

    /* Scalars. */

    pub fn deser_unit(&mut self) -> Result<(), CodecError> {
        self.expect_node_type(NodeType::Unit, "()")
    }
    pub fn deser_bool(&mut self) -> Result<bool, CodecError> {
        self.expect_node_type(NodeType::Bool, "bool")?;
        let [int] = self.take::<1>()?;
        match int {
            0 => Ok(false),
            1 => Ok(true),
            _ => Err(CodecError::Format(format!("invalid bool byte {int}"))),
        }
    }
    pub fn deser_i64(&mut self) -> Result<i64, CodecError> {
        self.expect_node_type(NodeType::I64, "signed integer")?;
        Ok(i64::from_le_bytes(self.take::<{ mem::size_of::<i64>() }>()?))
    }
    pub fn deser_u64(&mut self) -> Result<u64, CodecError> {
        self.expect_node_type(NodeType::U64, "unsigned integer")?;
        Ok(u64::from_le_bytes(self.take::<{ mem::size_of::<u64>() }>()?))
    }
    pub fn deser_f64(&mut self) -> Result<f64, CodecError> {
        self.expect_node_type(NodeType::F64, "float")?;
        let bits = u64::from_le_bytes(self.take::<{ mem::size_of::<u64>() }>()?);
        Ok(f64::from_bits(bits))
    }
    pub fn deser_str(&mut self) -> Result<String, CodecError> {
        self.expect_node_type(NodeType::Str, "string")?;
        self.take_str_body()
    }
    pub fn deser_bytes(&mut self) -> Result<Vec<u8>, CodecError> {
        self.expect_node_type(NodeType::Bytes, "byte buffer")?;
        self.take_byte_body("byte buffer")
    }

    /* Composites. */

    pub fn deser_option<T: Deser>(&mut self) -> Result<Option<T>, CodecError> {
        match self.take_node_type()? {
            NodeType::Unit => Ok(None),
            NodeType::Some => {
                self.enter()?;
                let inner = T::deser(self)?;
                self.leave();
                Ok(Some(inner))
            }
            act => Err(Self::unexpected(any::type_name::<Option<T>>(), act)),
        }
    }

    pub fn deser_seq<T: Deser>(&mut self) -> Result<Vec<T>, CodecError> {
        self.deser_seq_with(|r, len| {
            let mut members = Vec::with_capacity(len.min(PREALLOC_LIMIT));
            for _ in 0..len {
                members.push(T::deser(r)?);
            }
            Ok(members)
        })
    }

    /// Reads a sequence of heterogeneous members. `f` receives the member count and must read that many nodes.
    pub fn deser_seq_with<T>(
        &mut self,
        f: impl FnOnce(&mut Self, usize) -> Result<T, CodecError>,
    ) -> Result<T, CodecError> {
        self.expect_node_type(NodeType::Seq, "sequence")?;
        let len = self.take_len("sequence")?;
        self.enter()?;
        let t = f(self, len)?;
        self.leave();
        Ok(t)
    }

    pub fn deser_map<K: Deser, V: Deser>(&mut self) -> Result<Vec<(K, V)>, CodecError> {
        self.expect_node_type(NodeType::Map, "map")?;
        let len = self.take_len("map")?;
        self.enter()?;
        let mut entries = Vec::with_capacity(len.min(PREALLOC_LIMIT));
        for _ in 0..len {
            let k = K::deser(self)?;
            let v = V::deser(self)?;
            entries.push((k, v));
        }
        self.leave();
        Ok(entries)
    }

    /// Reads a record header and checks it against the expected type name and field count.
    pub fn deser_record<'r>(
        &'r mut self,
        type_name: &'static str,
        fields_count: usize,
    ) -> Result<RecordReader<'r, R>, CodecError> {
        self.expect_node_type(NodeType::Record, type_name)?;
        let act_type = self.take_str_body()?;
        if act_type != type_name {
            return Err(CodecError::type_mismatch(type_name, act_type));
        }
        let act_count = self.take_len("record")?;
        if act_count != fields_count {
            return Err(CodecError::type_mismatch(
                format!("{type_name} with {fields_count} fields"),
                format!("{act_type} with {act_count} fields"),
            ));
        }
        self.enter()?;
        Ok(RecordReader {
            r: self,
            type_name,
            remaining: fields_count,
        })
    }

    /// Reads a variant header. Returns the variant name, and a reader for the payload.
    pub fn deser_variant<'r>(
        &'r mut self,
        type_name: &'static str,
    ) -> Result<(String, VariantReader<'r, R>), CodecError> {
        self.expect_node_type(NodeType::Variant, type_name)?;
        let act_type = self.take_str_body()?;
        if act_type != type_name {
            return Err(CodecError::type_mismatch(type_name, act_type));
        }
        let variant = self.take_str_body()?;
        self.enter()?;
        Ok((variant, VariantReader { r: self, type_name }))
    }

    /* Shared pointers. */

    pub fn deser_shared<P>(&mut self) -> Result<P, CodecError>
    where
        P: SharedPtr,
        P::Pointee: Deser,
    {
        let node_type = self.take_node_type()?;
        self.deser_shared_after(node_type)
    }

    /// Like [`GraphReader::deser_shared`], for callers that have already consumed the node type.
    pub fn deser_shared_after<P>(&mut self, node_type: NodeType) -> Result<P, CodecError>
    where
        P: SharedPtr,
        P::Pointee: Deser,
    {
        match node_type {
            NodeType::BackRef => {
                let handle = self.take_handle()?;
                self.resolve(handle)
            }
            NodeType::Shared => {
                let handle = self.take_handle()?;
                self.register_next(handle)?;
                let type_name = any::type_name::<P>();
                trace!(handle = *handle, type_name, "decoding shared object");

                self.enter()?;
                let ptr = match P::Pointee::vacant() {
                    Some(vacant) => {
                        let ptr = P::new(vacant);
                        self.slots.push(Slot::Ready(Dynamic::new(ptr.clone())));
                        let body = P::Pointee::deser(self)?;
                        ptr.pointee().refill(body);
                        ptr
                    }
                    None => {
                        self.slots.push(Slot::Open { type_name });
                        let body = P::Pointee::deser(self)?;
                        let ptr = P::new(body);
                        self.slots[handle.index()] = Slot::Ready(Dynamic::new(ptr.clone()));
                        ptr
                    }
                };
                self.leave();
                Ok(ptr)
            }
            act => Err(Self::unexpected(any::type_name::<P>(), act)),
        }
    }

    fn register_next(&self, handle: Handle) -> Result<(), CodecError> {
        if handle.index() != self.slots.len() {
            return Err(CodecError::Format(format!(
                "shared handle {} out of order, expected {}",
                *handle,
                self.slots.len()
            )));
        }
        Ok(())
    }

    fn resolve<P: SharedPtr>(&self, handle: Handle) -> Result<P, CodecError> {
        match self.slots.get(handle.index()) {
            None => Err(CodecError::Format(format!(
                "back-reference to unknown handle {}",
                *handle
            ))),
            Some(Slot::Open { type_name }) => Err(CodecError::Format(format!(
                "back-reference to {type_name} (handle {}) while its body is still being decoded",
                *handle
            ))),
            Some(Slot::Inspected) => Err(CodecError::Format(format!(
                "handle {} was not decoded as an object",
                *handle
            ))),
            Some(Slot::Ready(dynamic)) => dynamic.cast_ref::<P>().cloned(),
        }
    }

    /* Schema-less reading. */

    pub(super) fn inspect_shared(&mut self, handle: Handle) -> Result<(), CodecError> {
        self.register_next(handle)?;
        self.slots.push(Slot::Inspected);
        Ok(())
    }
    pub(super) fn inspect_back_ref(&self, handle: Handle) -> Result<(), CodecError> {
        if handle.index() >= self.slots.len() {
            return Err(CodecError::Format(format!(
                "back-reference to unknown handle {}",
                *handle
            )));
        }
        Ok(())
    }
}

/// Reads the fields of one record. Obtained from [`GraphReader::deser_record`].
pub struct RecordReader<'r, R: Read> {
    r: &'r mut GraphReader<R>,
    type_name: &'static str,
    remaining: usize,
}

impl<'r, R: Read> RecordReader<'r, R> {
    pub fn field<T: Deser>(&mut self, name: &str) -> Result<T, CodecError> {
        if self.remaining == 0 {
            return Err(CodecError::type_mismatch(
                format!("{}.{name}", self.type_name),
                "no more fields",
            ));
        }
        self.remaining -= 1;
        let act = self.r.take_str_body()?;
        if act != name {
            return Err(CodecError::type_mismatch(
                format!("{}.{name}", self.type_name),
                format!("{}.{act}", self.type_name),
            ));
        }
        T::deser(&mut *self.r)
    }

    pub fn finish(self) -> Result<(), CodecError> {
        if self.remaining != 0 {
            return Err(CodecError::type_mismatch(
                format!("all fields of {} read", self.type_name),
                format!("{} unread", self.remaining),
            ));
        }
        self.r.leave();
        Ok(())
    }
}

/// Reads the payload of one variant. Obtained from [`GraphReader::deser_variant`].
pub struct VariantReader<'r, R: Read> {
    r: &'r mut GraphReader<R>,
    type_name: &'static str,
}

impl<'r, R: Read> VariantReader<'r, R> {
    pub fn payload<T: Deser>(self) -> Result<T, CodecError> {
        let payload = T::deser(&mut *self.r)?;
        self.r.leave();
        Ok(payload)
    }

    pub fn unknown(self, variant: &str) -> CodecError {
        CodecError::type_mismatch(
            format!("a variant of {}", self.type_name),
            format!("{}::{variant}", self.type_name),
        )
    }
}
