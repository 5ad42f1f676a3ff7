//! Self-describing binary encoding of object graphs.
//!
//! A value is written together with its type names, field names and reference topology,
//! so it can be rebuilt without an external schema. Values reachable through `Rc`/`Arc`
//! are written once and referenced by handle afterwards, which preserves sharing,
//! and lets cycles through `RefCell`/`Mutex` round-trip.
//!
//! ```
//! use objgraph_serde::{decode, encode, impl_record};
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! #[derive(Default)]
//! struct Square {
//!     name: String,
//!     next: Option<Rc<RefCell<Square>>>,
//! }
//! impl_record!(Square { name, next });
//!
//! let a = Rc::new(RefCell::new(Square { name: String::from("a1"), next: None }));
//! let b = Rc::new(RefCell::new(Square { name: String::from("b1"), next: Some(a.clone()) }));
//! a.borrow_mut().next = Some(b.clone());
//!
//! let bytes = encode(&a).unwrap();
//! let a2: Rc<RefCell<Square>> = decode(&bytes).unwrap().unwrap();
//! let b2 = a2.borrow().next.clone().unwrap();
//! assert_eq!(b2.borrow().name, "b1");
//! assert!(Rc::ptr_eq(b2.borrow().next.as_ref().unwrap(), &a2));
//!
//! # a.borrow_mut().next = None;
//! # a2.borrow_mut().next = None;
//! ```

mod config;
mod error;
pub mod serde;
pub mod types;

pub use config::CodecConfig;
pub use error::{CodecError, ErrorKind};
pub use serde::{Inspected, Node, WriteLen};
pub use types::{cast, ByteBuf, Deser, Dynamic, Ser, Serializable};

use crate::serde::{GraphReader, GraphWriter};
use std::io::{Read, Write};
use tracing::debug;

/// Encoder and decoder bound to one [`CodecConfig`].
#[derive(Clone, Copy, Default, Debug)]
pub struct Codec {
    config: CodecConfig,
}

impl Codec {
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    pub fn encode<T: Serializable>(&self, value: &T) -> Result<Vec<u8>, CodecError> {
        let mut buf = vec![];
        self.encode_to(value, &mut buf)?;
        Ok(buf)
    }

    pub fn encode_to<T: Serializable, W: Write>(
        &self,
        value: &T,
        w: W,
    ) -> Result<WriteLen, CodecError> {
        let type_name = T::type_name();
        let mut gw = GraphWriter::new(w, self.config);
        gw.ser_header(&type_name)?;
        value.ser(&mut gw)?;
        gw.flush()?;
        debug!(
            %type_name,
            w_len = *gw.w_len(),
            shared = gw.shared_count(),
            "encoded object graph"
        );
        Ok(gw.w_len())
    }

    /// Decodes a whole buffer. An empty buffer is the absent value.
    pub fn decode<T: Serializable>(&self, buf: &[u8]) -> Result<Option<T>, CodecError> {
        if buf.is_empty() {
            return Ok(None);
        }
        let mut rest = buf;
        let t = self.decode_from(&mut rest)?;
        if !rest.is_empty() {
            return Err(CodecError::Format(format!(
                "{} trailing bytes after root",
                rest.len()
            )));
        }
        Ok(Some(t))
    }

    pub fn decode_opt<T: Serializable>(&self, buf: Option<&[u8]>) -> Result<Option<T>, CodecError> {
        match buf {
            None => Ok(None),
            Some(buf) => self.decode(buf),
        }
    }

    /// Like [`Codec::decode`], but an empty buffer is a format error.
    pub fn decode_some<T: Serializable>(&self, buf: &[u8]) -> Result<T, CodecError> {
        self.decode(buf)?
            .ok_or_else(|| CodecError::Format(String::from("No data")))
    }

    /// Decodes one stream from `r`, leaving any bytes after it unread.
    pub fn decode_from<T: Serializable, R: Read>(&self, r: R) -> Result<T, CodecError> {
        let mut gr = GraphReader::new(r, self.config);
        let act_type = gr.deser_header()?;
        let exp_type = T::type_name();
        if act_type != exp_type {
            return Err(CodecError::type_mismatch(exp_type, act_type));
        }
        let t = T::deser(&mut gr)?;
        debug!(
            type_name = %exp_type,
            r_len = gr.r_len(),
            shared = gr.shared_count(),
            "decoded object graph"
        );
        Ok(t)
    }

    /// Decodes a whole buffer without knowing its type. An empty buffer is the absent value.
    pub fn inspect(&self, buf: &[u8]) -> Result<Option<Inspected>, CodecError> {
        if buf.is_empty() {
            return Ok(None);
        }
        let mut rest = buf;
        let mut gr = GraphReader::new(&mut rest, self.config);
        let type_name = gr.deser_header()?;
        let root = Node::deser(&mut gr)?;
        debug!(%type_name, r_len = gr.r_len(), "inspected object graph");
        drop(gr);
        if !rest.is_empty() {
            return Err(CodecError::Format(format!(
                "{} trailing bytes after root",
                rest.len()
            )));
        }
        Ok(Some(Inspected { type_name, root }))
    }
}

pub fn encode<T: Serializable>(value: &T) -> Result<Vec<u8>, CodecError> {
    Codec::default().encode(value)
}

pub fn encode_to<T: Serializable, W: Write>(value: &T, w: W) -> Result<WriteLen, CodecError> {
    Codec::default().encode_to(value, w)
}

pub fn decode<T: Serializable>(buf: &[u8]) -> Result<Option<T>, CodecError> {
    Codec::default().decode(buf)
}

pub fn decode_opt<T: Serializable>(buf: Option<&[u8]>) -> Result<Option<T>, CodecError> {
    Codec::default().decode_opt(buf)
}

pub fn decode_some<T: Serializable>(buf: &[u8]) -> Result<T, CodecError> {
    Codec::default().decode_some(buf)
}

pub fn decode_from<T: Serializable, R: Read>(r: R) -> Result<T, CodecError> {
    Codec::default().decode_from(r)
}

pub fn inspect(buf: &[u8]) -> Result<Option<Inspected>, CodecError> {
    Codec::default().inspect(buf)
}
