//! Child queries
//!
//! Both queries scan the immediate children of a container in order and
//! return nodes, not values.

use super::Node;
use crate::errors::Result;
use crate::value::Value;

impl Node {
    /// Children holding every `(key, value)` pair of `criteria`.
    ///
    /// A child without one of the keys does not match.
    pub fn where_eq<K: AsRef<str>>(&self, criteria: &[(K, Value)]) -> Result<Vec<Node>> {
        let matching = self.with_container(|container| {
            container
                .child_names()
                .unwrap_or_default()
                .into_iter()
                .filter(|name| {
                    container.child(name).map_or(false, |child| {
                        criteria
                            .iter()
                            .all(|(key, expected)| child.child(key.as_ref()) == Some(expected))
                    })
                })
                .collect::<Vec<_>>()
        })?;
        Ok(matching
            .into_iter()
            .map(|name| self.at(self.child_path(&name)))
            .collect())
    }

    /// Children having any of `names` as their own child.
    ///
    /// A child is listed once per name it has, so matches on several
    /// names repeat it.
    pub fn containing<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<Node>> {
        let matching = self.with_container(|container| {
            let mut found = Vec::new();
            for name in container.child_names().unwrap_or_default() {
                if let Some(child) = container.child(&name) {
                    for wanted in names {
                        if child.has_child(wanted.as_ref()) {
                            found.push(name.clone());
                        }
                    }
                }
            }
            found
        })?;
        Ok(matching
            .into_iter()
            .map(|name| self.at(self.child_path(&name)))
            .collect())
    }
}
