use crate::error::CodecError;
use crate::serde::{GraphReader, GraphWriter};
use std::borrow::Cow;
use std::io::{Read, Write};

pub trait Ser {
    /// Whether a shared pointee of this type may be referenced from within its own body.
    /// Only types that offer [`Deser::vacant`] can be rebuilt that way.
    const CYCLIC: bool = false;

    fn ser<W: Write>(&self, w: &mut GraphWriter<W>) -> Result<(), CodecError>;
}

pub trait Deser: Sized {
    fn deser<R: Read>(r: &mut GraphReader<R>) -> Result<Self, CodecError>;

    /// A stand-in that is allocated before the body is decoded,
    /// so that back-references inside the body can resolve to it.
    fn vacant() -> Option<Self> {
        None
    }

    /// Moves a decoded body into a stand-in previously returned by [`Deser::vacant`].
    fn refill(&self, _body: Self) {}
}

/* trait Serializable */
pub trait Serializable: Ser + Deser + 'static {
    /// Name recorded in the stream header and checked on decode.
    fn type_name() -> Cow<'static, str>;
}
