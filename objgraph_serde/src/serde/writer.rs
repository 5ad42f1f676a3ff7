use crate::config::CodecConfig;
use crate::error::CodecError;
use crate::serde::{BodyLen, Handle, NodeType, NodeTypeInt, MAGIC, VERSION};
use crate::types::Ser;
use derive_more::Deref;
use std::any;
use std::collections::HashMap;
use std::io::Write;
use tracing::trace;

#[derive(Deref, PartialEq, Eq, Clone, Copy, Debug)]
pub struct WriteLen(usize);

struct HandleEntry {
    handle: Handle,
    /// The pointee's body is still being written.
    open: bool,
    cyclic: bool,
    type_name: &'static str,
}

/// Writes one object graph into `W`.
///
/// Shared allocations are keyed by address. Every pointer being written is borrowed from the root
/// for the whole call, so no allocation can be freed and its address reused mid-stream.
pub struct GraphWriter<W: Write> {
    w: W,
    w_len: usize,
    config: CodecConfig,
    depth: usize,
    handles: HashMap<usize, HandleEntry>,
}

impl<W: Write> GraphWriter<W> {
    pub fn new(w: W, config: CodecConfig) -> Self {
        Self {
            w,
            w_len: 0,
            config,
            depth: 0,
            handles: HashMap::new(),
        }
    }

    pub fn w_len(&self) -> WriteLen {
        WriteLen(self.w_len)
    }

    pub fn shared_count(&self) -> usize {
        self.handles.len()
    }

    pub fn flush(&mut self) -> Result<(), CodecError> {
        self.w.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.w
    }

    /* Raw output. */

    fn put(&mut self, buf: &[u8]) -> Result<(), CodecError> {
        self.w.write_all(buf)?;
        self.w_len += buf.len();
        Ok(())
    }
    fn put_node_type(&mut self, node_type: NodeType) -> Result<(), CodecError> {
        self.put(&NodeTypeInt::from(node_type).to_le_bytes())
    }
    fn put_len(&mut self, len: usize, what: &str) -> Result<(), CodecError> {
        let len = BodyLen::new_checked(len, self.config.max_len, what)?;
        self.put(&len.to_le_bytes())
    }
    fn put_str_body(&mut self, s: &str) -> Result<(), CodecError> {
        self.put_len(s.len(), "string")?;
        self.put(s.as_bytes())
    }
    fn put_handle(&mut self, handle: Handle) -> Result<(), CodecError> {
        self.put(&handle.to_le_bytes())
    }

    fn enter(&mut self) -> Result<(), CodecError> {
        if self.depth >= self.config.max_depth {
            return Err(CodecError::LimitExceeded(format!(
                "nesting exceeds max depth {}",
                self.config.max_depth
            )));
        }
        self.depth += 1;
        Ok(())
    }
    fn leave(&mut self) {
        self.depth -= 1;
    }

    pub(crate) fn ser_header(&mut self, root_type: &str) -> Result<(), CodecError> {
        self.put(&MAGIC)?;
        self.put(&[VERSION])?;
        self.put_str_body(root_type)
    }

    /* Scalars. */

    pub fn ser_unit(&mut self) -> Result<(), CodecError> {
        self.put_node_type(NodeType::Unit)
    }
    pub fn ser_bool(&mut self, b: bool) -> Result<(), CodecError> {
        self.put_node_type(NodeType::Bool)?;
        self.put(&[u8::from(b)])
    }
    pub fn ser_i64(&mut self, i: i64) -> Result<(), CodecError> {
        self.put_node_type(NodeType::I64)?;
        self.put(&i.to_le_bytes())
    }
    pub fn ser_u64(&mut self, u: u64) -> Result<(), CodecError> {
        self.put_node_type(NodeType::U64)?;
        self.put(&u.to_le_bytes())
    }
    pub fn ser_f64(&mut self, f: f64) -> Result<(), CodecError> {
        self.put_node_type(NodeType::F64)?;
        self.put(&f.to_bits().to_le_bytes())
    }
    pub fn ser_str(&mut self, s: &str) -> Result<(), CodecError> {
        self.put_node_type(NodeType::Str)?;
        self.put_str_body(s)
    }
    pub fn ser_bytes(&mut self, b: &[u8]) -> Result<(), CodecError> {
        self.put_node_type(NodeType::Bytes)?;
        self.put_len(b.len(), "byte buffer")?;
        self.put(b)
    }

    /* Composites. */

    pub fn ser_some<T: Ser>(&mut self, inner: &T) -> Result<(), CodecError> {
        self.put_node_type(NodeType::Some)?;
        self.enter()?;
        inner.ser(self)?;
        self.leave();
        Ok(())
    }

    pub fn ser_seq<'a, T, I>(&mut self, members: I) -> Result<(), CodecError>
    where
        T: 'a + Ser,
        I: IntoIterator<Item = &'a T>,
        I::IntoIter: ExactSizeIterator,
    {
        let members = members.into_iter();
        self.ser_seq_with(members.len(), |w| {
            for member in members {
                member.ser(w)?;
            }
            Ok(())
        })
    }

    /// Writes a sequence of heterogeneous members. `f` must write exactly `len` nodes.
    pub fn ser_seq_with(
        &mut self,
        len: usize,
        f: impl FnOnce(&mut Self) -> Result<(), CodecError>,
    ) -> Result<(), CodecError> {
        self.put_node_type(NodeType::Seq)?;
        self.put_len(len, "sequence")?;
        self.enter()?;
        f(self)?;
        self.leave();
        Ok(())
    }

    pub fn ser_map<'a, K, V, I>(&mut self, entries: I) -> Result<(), CodecError>
    where
        K: 'a + Ser,
        V: 'a + Ser,
        I: IntoIterator<Item = (&'a K, &'a V)>,
        I::IntoIter: ExactSizeIterator,
    {
        let entries = entries.into_iter();
        self.put_node_type(NodeType::Map)?;
        self.put_len(entries.len(), "map")?;
        self.enter()?;
        for (k, v) in entries {
            k.ser(self)?;
            v.ser(self)?;
        }
        self.leave();
        Ok(())
    }

    pub fn ser_record<'w>(
        &'w mut self,
        type_name: &'static str,
        fields_count: usize,
    ) -> Result<RecordWriter<'w, W>, CodecError> {
        self.put_node_type(NodeType::Record)?;
        self.put_str_body(type_name)?;
        self.put_len(fields_count, "record")?;
        self.enter()?;
        Ok(RecordWriter {
            w: self,
            type_name,
            remaining: fields_count,
        })
    }

    pub fn ser_variant<T: Ser>(
        &mut self,
        type_name: &str,
        variant: &str,
        payload: &T,
    ) -> Result<(), CodecError> {
        self.put_node_type(NodeType::Variant)?;
        self.put_str_body(type_name)?;
        self.put_str_body(variant)?;
        self.enter()?;
        payload.ser(self)?;
        self.leave();
        Ok(())
    }

    /* Shared pointers. */

    /// Writes the pointee at `addr` on first sight, and a back-reference thereafter.
    pub fn ser_shared<T: Ser>(&mut self, addr: usize, pointee: &T) -> Result<(), CodecError> {
        if let Some(entry) = self.handles.get(&addr) {
            if entry.open && !entry.cyclic {
                return Err(CodecError::NotCapturable(format!(
                    "{} is reachable from its own body but has no interior mutability to rebuild it",
                    entry.type_name
                )));
            }
            let handle = entry.handle;
            self.put_node_type(NodeType::BackRef)?;
            return self.put_handle(handle);
        }

        let handle = u32::try_from(self.handles.len())
            .map(Handle::from)
            .map_err(|_| CodecError::LimitExceeded(String::from("too many shared objects")))?;
        let type_name = any::type_name::<T>();
        trace!(handle = *handle, type_name, "registering shared object");
        self.handles.insert(
            addr,
            HandleEntry {
                handle,
                open: true,
                cyclic: T::CYCLIC,
                type_name,
            },
        );

        self.put_node_type(NodeType::Shared)?;
        self.put_handle(handle)?;
        self.enter()?;
        pointee.ser(self)?;
        self.leave();

        if let Some(entry) = self.handles.get_mut(&addr) {
            entry.open = false;
        }
        Ok(())
    }
}

/// Writes the fields of one record. Obtained from [`GraphWriter::ser_record`].
pub struct RecordWriter<'w, W: Write> {
    w: &'w mut GraphWriter<W>,
    type_name: &'static str,
    remaining: usize,
}

impl<'w, W: Write> RecordWriter<'w, W> {
    pub fn field<T: Ser>(&mut self, name: &str, value: &T) -> Result<(), CodecError> {
        if self.remaining == 0 {
            return Err(CodecError::NotCapturable(format!(
                "{} writes more fields than it declared",
                self.type_name
            )));
        }
        self.remaining -= 1;
        self.w.put_str_body(name)?;
        value.ser(&mut *self.w)
    }

    pub fn finish(self) -> Result<(), CodecError> {
        if self.remaining != 0 {
            return Err(CodecError::NotCapturable(format!(
                "{} writes {} fewer fields than it declared",
                self.type_name, self.remaining
            )));
        }
        self.w.leave();
        Ok(())
    }
}
