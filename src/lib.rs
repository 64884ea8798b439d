//! leafdb - path-addressed access to file-backed hierarchical documents
//!
//! A document is a tree of maps, lists and scalar leaves owned by a
//! persistence layer ([`File`]). [`Node`]s are lightweight handles that
//! address a location in that tree by key path and resolve it afresh on
//! every access.
//!
//! ```ignore
//! use leafdb::{Node, Value};
//!
//! let root = Node::open("settings.json")?;
//! root.set("volume", 3)?;
//! root.get("volume")?.add_assign(1)?;
//! root.save()?;
//! ```
//!
//! Modules:
//! - `value`: document data model and literal syntax
//! - `codec`: on-disk formats
//! - `encryption`: password protection at rest
//! - `file`: persistence layer and its options
//! - `node`: path-addressed views
//! - `observability`: lifecycle events via `tracing`

pub mod codec;
pub mod encryption;
pub mod errors;
pub mod file;
pub mod node;
pub mod observability;
pub mod value;

pub use codec::{infer_format, Format};
pub use errors::{Error, ErrorCode, Result};
pub use file::{File, FileConfig, FileOptions, DEFAULT_SALT};
pub use node::Node;
pub use value::{BinaryOp, Link, Map, Value};
