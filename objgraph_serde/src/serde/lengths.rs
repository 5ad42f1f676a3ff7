use crate::error::CodecError;
use derive_more::{Deref, From};

/// Length of a string or byte body, or member count of a sequence, map or record.
#[derive(Deref, Clone, Copy, Debug)]
pub struct BodyLen(u32);
impl BodyLen {
    pub fn new_checked(len: usize, max_len: u32, what: &str) -> Result<Self, CodecError> {
        match u32::try_from(len) {
            Ok(int) if int <= max_len => Ok(Self(int)),
            _ => Err(CodecError::LimitExceeded(format!(
                "{what} of length {len} exceeds limit {max_len}"
            ))),
        }
    }
    pub fn from_wire(int: u32, max_len: u32, what: &str) -> Result<Self, CodecError> {
        if int > max_len {
            return Err(CodecError::Format(format!(
                "{what} of length {int} exceeds limit {max_len}"
            )));
        }
        Ok(Self(int))
    }
}

/// Identity of a shared allocation within one stream.
#[derive(From, Deref, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Debug)]
pub struct Handle(u32);
impl Handle {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}
