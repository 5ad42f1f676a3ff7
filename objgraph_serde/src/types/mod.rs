mod byte_buf;
mod collections;
mod dynamic;
mod macros;
mod pointers;
mod primitives;
mod serializable;

pub use byte_buf::*;
pub use dynamic::*;
pub use pointers::*;
pub use serializable::*;
