//! # Serialization format
//!
//! A stream holds exactly one object graph. It starts with a header naming the root type,
//! followed by the root node.
//!
//! Every node starts with `node_type`, which is encoded in `u8`.
//! All integers are little-endian.
//!
//! Scalars have fixed body lengths, which are not encoded.
//! Strings and byte buffers encode their body length; sequences and maps encode their member count.
//!
//! Shared pointers (`Rc`, `Arc`, `Weak`) are written once, as a `Shared` node carrying a handle.
//! Every later occurrence of the same allocation is a `BackRef` node carrying only that handle.
//! Handles count up from zero in the order the writer first meets each allocation,
//! so the reader can rebuild its handle table without an index.
//! A `BackRef` may point at a `Shared` node whose body is still open; this is how cycles are encoded.
//!
//! ```text
//! struct Stream {
//!     magic:              [u8; 4],    // "OGRF"
//!     version:            u8,
//!     root_type_len:      u32,
//!     root_type:          [u8; root_type_len],
//!     root:               Node,
//! }
//!
//! struct Node::Unit {
//!     node_type:          u8,
//! }
//!
//! struct Node::Bool {
//!     node_type:          u8,
//!     node_body:          u8,
//! }
//!
//! struct Node::I64 or Node::U64 or Node::F64 {
//!     node_type:          u8,
//!     node_body:          [u8; 8],
//! }
//!
//! struct Node::Str or Node::Bytes {
//!     node_type:          u8,
//!     node_body_len:      u32,
//!     node_body:          [u8; node_body_len],
//! }
//!
//! struct Node::Seq {
//!     node_type:          u8,
//!     members_count:      u32,
//!     member_0:           Node,
//!     ...
//! }
//!
//! struct Node::Map {
//!     node_type:          u8,
//!     members_count:      u32,
//!     key_0:              Node,
//!     value_0:            Node,
//!     ...
//! }
//!
//! struct Node::Some {
//!     node_type:          u8,
//!     inner:              Node,
//! }
//!
//! struct Node::Record {
//!     node_type:          u8,
//!     type_len:           u32,
//!     type:               [u8; type_len],
//!     fields_count:       u32,
//!     field_0: {
//!         name_len:           u32,
//!         name:               [u8; name_len],
//!         value:              Node,
//!     },
//!     ...
//! }
//!
//! struct Node::Variant {
//!     node_type:          u8,
//!     type_len:           u32,
//!     type:               [u8; type_len],
//!     variant_len:        u32,
//!     variant:            [u8; variant_len],
//!     payload:            Node,
//! }
//!
//! struct Node::Shared {
//!     node_type:          u8,
//!     handle:             u32,
//!     pointee:            Node,
//! }
//!
//! struct Node::BackRef {
//!     node_type:          u8,
//!     handle:             u32,
//! }
//! ```

mod inspect;
mod lengths;
mod node_type;
mod reader;
mod writer;


pub use inspect::*;
pub use lengths::*;
pub use node_type::*;
pub use reader::*;
pub use writer::*;

pub const MAGIC: [u8; 4] = *b"OGRF";
pub const VERSION: u8 = 1;
