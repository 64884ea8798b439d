//! In-place arithmetic on leaf nodes
//!
//! Each operator resolves the parent container, replaces the addressed
//! value with `old <op> rhs` and returns the new value. The write goes
//! through the same autosave policy as [`Node::set`].

use super::Node;
use crate::errors::{Error, Result};
use crate::value::{BinaryOp, Value};

impl Node {
    /// Replaces this node's value with `value <op> rhs`
    pub fn apply_assign(&self, op: BinaryOp, rhs: impl Into<Value>) -> Result<Value> {
        let (last, parent_path) = self.path.split_last().ok_or(Error::RootHasNoParent)?;
        let rhs = rhs.into();

        let mut file = self.file.borrow_mut();
        let parent = file.get_nested_mut(parent_path)?;
        if !parent.is_container() {
            return Err(Error::not_a_node(parent_path));
        }
        let slot = parent
            .child_mut(last)
            .ok_or_else(|| Error::name_not_found(&self.path))?;

        let updated = slot.apply(op, &rhs)?;
        *slot = updated.clone();
        file.autosave_if_enabled()?;
        Ok(updated)
    }

    /// `+=`
    pub fn add_assign(&self, rhs: impl Into<Value>) -> Result<Value> {
        self.apply_assign(BinaryOp::Add, rhs)
    }

    /// `-=`
    pub fn sub_assign(&self, rhs: impl Into<Value>) -> Result<Value> {
        self.apply_assign(BinaryOp::Sub, rhs)
    }

    /// `*=`
    pub fn mul_assign(&self, rhs: impl Into<Value>) -> Result<Value> {
        self.apply_assign(BinaryOp::Mul, rhs)
    }

    /// `/=`, always producing a float
    pub fn div_assign(&self, rhs: impl Into<Value>) -> Result<Value> {
        self.apply_assign(BinaryOp::Div, rhs)
    }

    /// `//=`
    pub fn floor_div_assign(&self, rhs: impl Into<Value>) -> Result<Value> {
        self.apply_assign(BinaryOp::FloorDiv, rhs)
    }

    /// `%=`
    pub fn rem_assign(&self, rhs: impl Into<Value>) -> Result<Value> {
        self.apply_assign(BinaryOp::Rem, rhs)
    }

    /// `**=`
    pub fn pow_assign(&self, rhs: impl Into<Value>) -> Result<Value> {
        self.apply_assign(BinaryOp::Pow, rhs)
    }
}
