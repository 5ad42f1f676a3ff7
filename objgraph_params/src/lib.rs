//! Typed parameter storage on top of `objgraph_serde`.
//!
//! Each parameter type has at most one stored value, kept in encoded form and keyed by type name,
//! so the whole store can be handed to and reloaded from a plain `(name, blob)` table.

mod store;

pub use store::*;
