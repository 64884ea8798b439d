//! Path-addressed views over a document
//!
//! A [`Node`] is a shared handle to a [`File`] plus a key path. It never
//! stores the value it points at: every read and write walks the document
//! from the root again, so all nodes over the same file observe each
//! other's mutations immediately.
//!
//! ```ignore
//! let root = Node::from_value(serde_json::json!({"a": 1, "b": {"c": 2}}));
//! assert_eq!(root.get("b")?.get("c")?.value()?, Value::Int(2));
//! root.get("b")?.set("c", 5)?;
//! ```
//!
//! Nodes are `!Send`; a file and its nodes live on one thread.

mod arith;
mod link;
mod query;

use std::cell::{Ref, RefCell, RefMut};
use std::cmp::Ordering;
use std::fmt;
use std::path::Path;
use std::rc::Rc;

use crate::codec::Format;
use crate::errors::{describe_path, Error, Result};
use crate::file::{File, FileConfig, FileOptions};
use crate::value::{parse_index, Value};

/// Handle to a location inside a document
#[derive(Clone)]
pub struct Node {
    file: Rc<RefCell<File>>,
    path: Vec<String>,
}

impl Node {
    // ==================
    // Construction
    // ==================

    /// Empty in-memory document
    pub fn new() -> Self {
        Self::from_value(Value::empty())
    }

    /// Opens a file-backed document with default options
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(path, FileOptions::default())
    }

    pub fn open_with(path: impl AsRef<Path>, options: FileOptions) -> Result<Self> {
        Ok(Self::from_file(File::open(path, options)?))
    }

    /// In-memory document with no backing file
    pub fn from_value(value: impl Into<Value>) -> Self {
        Self::from_value_with(value, FileOptions::default())
    }

    pub fn from_value_with(value: impl Into<Value>, options: FileOptions) -> Self {
        Self::from_file(File::in_memory(value.into(), options))
    }

    /// Root node over an existing persistence layer
    pub fn from_file(file: File) -> Self {
        Self {
            file: Rc::new(RefCell::new(file)),
            path: Vec::new(),
        }
    }

    /// Opens the file named by a JSON config (see [`FileConfig`])
    pub fn from_config(path: impl AsRef<Path>) -> Result<Self> {
        let config = FileConfig::from_json_file(path)?;
        Self::open_with(config.path, config.options)
    }

    fn at(&self, path: Vec<String>) -> Self {
        Self {
            file: Rc::clone(&self.file),
            path,
        }
    }

    fn child_path(&self, name: &str) -> Vec<String> {
        let mut path = self.path.clone();
        path.push(name.to_string());
        path
    }

    // ==================
    // Identity
    // ==================

    /// Key path from the document root
    pub fn path(&self) -> &[String] {
        &self.path
    }

    pub fn is_root(&self) -> bool {
        self.path.is_empty()
    }

    /// Returns true if both nodes share one persistence layer
    pub fn same_file(&self, other: &Node) -> bool {
        Rc::ptr_eq(&self.file, &other.file)
    }

    /// Borrows the persistence layer.
    ///
    /// # Panics
    ///
    /// Panics if the layer is mutably borrowed.
    pub fn file(&self) -> Ref<'_, File> {
        self.file.borrow()
    }

    /// Mutably borrows the persistence layer.
    ///
    /// # Panics
    ///
    /// Panics if the layer is already borrowed.
    pub fn file_mut(&self) -> RefMut<'_, File> {
        self.file.borrow_mut()
    }

    /// Last path segment; for the root, the backing file name or `"None"`
    pub fn display_name(&self) -> String {
        match self.path.last() {
            Some(name) => name.clone(),
            None => self
                .file
                .borrow()
                .name()
                .map(|name| name.display().to_string())
                .unwrap_or_else(|| "None".to_string()),
        }
    }

    // ==================
    // Access
    // ==================

    /// Runs `f` against the live value without cloning it
    pub fn with_value<R>(&self, f: impl FnOnce(&Value) -> R) -> Result<R> {
        let file = self.file.borrow();
        let value = file.get_nested(&self.path)?;
        Ok(f(value))
    }

    /// Clone of the value at this path
    pub fn value(&self) -> Result<Value> {
        self.with_value(Value::clone)
    }

    fn with_container<R>(&self, f: impl FnOnce(&Value) -> R) -> Result<R> {
        let file = self.file.borrow();
        let value = file.get_nested(&self.path)?;
        if !value.is_container() {
            return Err(Error::not_a_node(&self.path));
        }
        Ok(f(value))
    }

    /// Applies `f` to the container at this path, then autosaves
    fn mutate_container<R>(&self, f: impl FnOnce(&mut Value) -> Result<R>) -> Result<R> {
        let mut file = self.file.borrow_mut();
        let target = file.get_nested_mut(&self.path)?;
        if !target.is_container() {
            return Err(Error::not_a_node(&self.path));
        }
        let result = f(target)?;
        file.autosave_if_enabled()?;
        Ok(result)
    }

    /// Navigates to an existing child
    pub fn get(&self, name: &str) -> Result<Node> {
        let found = self.with_container(|value| value.has_child(name))?;
        if !found {
            return Err(Error::name_not_found(&self.child_path(name)));
        }
        Ok(self.at(self.child_path(name)))
    }

    /// Navigates to several children, one node per name
    pub fn get_many<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<Node>> {
        names.iter().map(|name| self.get(name.as_ref())).collect()
    }

    /// Writes `value` under `name`, creating or overwriting it
    pub fn set(&self, name: &str, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        self.mutate_container(|target| Ok(target.insert_child(name, value)?))
    }

    /// Writes a copy of `value` under each name
    pub fn set_many<S: AsRef<str>>(&self, names: &[S], value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        self.mutate_container(|target| {
            for name in names {
                target.insert_child(name.as_ref(), value.clone())?;
            }
            Ok(())
        })
    }

    /// Removes this node from its parent.
    ///
    /// On the root the document is replaced with an empty map.
    pub fn delete(&self) -> Result<()> {
        let mut file = self.file.borrow_mut();
        match self.path.split_last() {
            None => file.set_data(Value::empty()),
            Some((last, parent)) => {
                file.get_nested_mut(parent)?
                    .remove_child(last)
                    .ok_or_else(|| Error::name_not_found(&self.path))?;
            }
        }
        file.autosave_if_enabled()
    }

    /// Removes each named child; nothing is removed if any is missing
    pub fn delete_children<S: AsRef<str>>(&self, names: &[S]) -> Result<()> {
        self.mutate_container(|target| {
            let keys: Vec<&str> = names.iter().map(AsRef::as_ref).collect();
            if let Some(missing) = keys.iter().find(|key| !target.has_child(key)) {
                return Err(Error::name_not_found(&self.child_path(missing)));
            }
            if let Value::List(items) = &mut *target {
                let mut indices: Vec<usize> =
                    keys.iter().filter_map(|key| parse_index(key)).collect();
                // remove from the back so earlier indices stay valid
                indices.sort_unstable_by(|a, b| b.cmp(a));
                indices.dedup();
                for index in indices {
                    items.remove(index);
                }
                return Ok(());
            }
            for key in keys {
                target.remove_child(key);
            }
            Ok(())
        })
    }

    /// Membership among the immediate children
    pub fn has(&self, name: &str) -> Result<bool> {
        self.with_container(|value| value.has_child(name))
    }

    pub fn has_all<S: AsRef<str>>(&self, names: &[S]) -> Result<bool> {
        self.with_container(|value| names.iter().all(|name| value.has_child(name.as_ref())))
    }

    pub fn has_any<S: AsRef<str>>(&self, names: &[S]) -> Result<bool> {
        self.with_container(|value| names.iter().any(|name| value.has_child(name.as_ref())))
    }

    /// Immediate child names in container order
    pub fn names(&self) -> Result<Vec<String>> {
        self.with_container(|value| value.child_names().unwrap_or_default())
    }

    /// Immediate children as nodes
    pub fn children(&self) -> Result<Vec<Node>> {
        Ok(self
            .names()?
            .into_iter()
            .map(|name| self.at(self.child_path(&name)))
            .collect())
    }

    /// `(name, value)` pairs one level deep
    pub fn items(&self) -> Result<Vec<(String, Value)>> {
        self.with_container(|value| match value {
            Value::Map(map) => map.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
            Value::List(items) => items
                .iter()
                .enumerate()
                .map(|(i, v)| (i.to_string(), v.clone()))
                .collect(),
            _ => Vec::new(),
        })
    }

    /// Compares dereferenced values, surfacing resolution errors
    pub fn try_cmp(&self, other: &Node) -> Result<Option<Ordering>> {
        let lhs = self.value()?;
        let rhs = other.value()?;
        Ok(lhs.partial_cmp(&rhs))
    }

    // ==================
    // Persistence
    // ==================

    pub fn save(&self) -> Result<()> {
        self.file.borrow_mut().save()
    }

    pub fn save_as(&self, path: impl AsRef<Path>) -> Result<()> {
        self.file.borrow_mut().save_as(path)
    }

    pub fn reload(&self) -> Result<()> {
        self.file.borrow_mut().reload()
    }

    pub fn switch_to_file(&self, path: impl AsRef<Path>, format: Option<Format>) -> Result<()> {
        self.file.borrow_mut().switch_to_file(path, format)
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node({})", describe_path(&self.path))
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self
            .file
            .try_borrow()
            .ok()
            .and_then(|file| file.name().map(Path::to_path_buf));
        f.debug_struct("Node")
            .field("path", &describe_path(&self.path))
            .field("file", &name)
            .finish()
    }
}

/// Unresolvable nodes are never equal
impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        match (self.value(), other.value()) {
            (Ok(lhs), Ok(rhs)) => lhs == rhs,
            _ => false,
        }
    }
}

impl PartialEq<Value> for Node {
    fn eq(&self, other: &Value) -> bool {
        self.with_value(|value| value == other).unwrap_or(false)
    }
}

impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.try_cmp(other).ok().flatten()
    }
}

/// Yields `(name, value)` pairs; yields nothing if the node does not
/// resolve to a container. Use [`Node::items`] to see the error.
impl IntoIterator for &Node {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.items().unwrap_or_default().into_iter()
    }
}
