//! Sub-documents stored as values
//!
//! [`Node::link`] turns a node's persistence layer into a [`Link`] that
//! can be written into another document. Reopening is lazy: the backing
//! file is only touched when [`Link::open`] is called.

use super::Node;
use crate::errors::{Error, Result};
use crate::file::FileOptions;
use crate::value::{Link, Value};

impl Node {
    /// Captures this node's persistence layer as a link.
    ///
    /// The path is not kept; a link always reopens at the root. File-backed
    /// documents keep only their name and format.
    pub fn link(&self) -> Link {
        let file = self.file.borrow();
        match file.name() {
            Some(name) => Link::to_file(name, file.format()),
            None => Link::inline(file.data().clone(), file.format()),
        }
    }

    /// Opens the link stored at this node
    pub fn follow_link(&self) -> Result<Node> {
        let link = self.with_value(|value| value.as_link().cloned())?;
        match link {
            Some(link) => link.open(),
            None => Err(Error::not_a_node(&self.path)),
        }
    }
}

impl Link {
    /// Reopens the sub-document as a root node
    pub fn open(&self) -> Result<Node> {
        self.open_with(FileOptions::default())
    }

    /// Reopens with explicit options; the link's format always wins
    pub fn open_with(&self, options: FileOptions) -> Result<Node> {
        let options = options.with_format(self.format);
        match (&self.name, &self.document) {
            (Some(name), _) => Node::open_with(name, options),
            (None, Some(document)) => Ok(Node::from_value_with((**document).clone(), options)),
            (None, None) => Ok(Node::from_value_with(Value::empty(), options)),
        }
    }
}
