//! Declarative XML-to-record mapping.
//!
//! Each record type declares a [`Schema`]: which child elements fill scalar
//! attributes, which build nested records, which wrapper elements are
//! flattened into the current record, and which namespaces are read at all.
//! The [`walker`] interprets those tables over a [`tree`] read with
//! `quick-xml`.

pub mod names;
pub mod schema;
pub mod tree;
pub mod value;
pub mod walker;

pub use schema::{Mapping, ParseMode, RecordKind, Rule, Schema};
pub use tree::{Element, Node, Tree};
pub use value::{append, store, FromValue, Scalar, Value};
pub use walker::{parse, walk, Record};
