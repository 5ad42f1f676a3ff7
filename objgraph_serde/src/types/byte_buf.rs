use crate::error::CodecError;
use crate::serde::{GraphReader, GraphWriter};
use crate::types::{Deser, Ser, Serializable};
use derive_more::{Deref, DerefMut, From, Into};
use std::borrow::Cow;
use std::io::{Read, Write};

/// A byte string written as one `Bytes` node, rather than as a sequence of integers as a `Vec<u8>` would be.
#[derive(From, Into, Deref, DerefMut, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Default, Debug)]
pub struct ByteBuf(pub Vec<u8>);

impl Ser for ByteBuf {
    fn ser<W: Write>(&self, w: &mut GraphWriter<W>) -> Result<(), CodecError> {
        w.ser_bytes(&self.0)
    }
}
impl Deser for ByteBuf {
    fn deser<R: Read>(r: &mut GraphReader<R>) -> Result<Self, CodecError> {
        r.deser_bytes().map(Self)
    }
}
impl Serializable for ByteBuf {
    fn type_name() -> Cow<'static, str> {
        Cow::Borrowed("ByteBuf")
    }
}
