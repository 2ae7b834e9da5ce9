use std::fmt;

use crate::key::{AnyKey, CodingKey};

/// Ordered list of keys locating a position inside a nested structure.
///
/// Paths are immutable: every container captures its own path when it is
/// created, and a nested container's path is its parent's path plus exactly
/// one key.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct CodingPath {
    keys: Vec<AnyKey>,
}

impl CodingPath {
    /// The empty path (top-level value).
    pub fn root() -> Self {
        Self::default()
    }

    /// A new path with `key` appended.
    pub fn appending<K: CodingKey + ?Sized>(&self, key: &K) -> Self {
        let mut keys = Vec::with_capacity(self.keys.len() + 1);
        keys.extend_from_slice(&self.keys);
        keys.push(AnyKey::of(key));
        Self { keys }
    }

    pub fn keys(&self) -> &[AnyKey] {
        &self.keys
    }

    pub fn last(&self) -> Option<&AnyKey> {
        self.keys.last()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl From<Vec<AnyKey>> for CodingPath {
    fn from(keys: Vec<AnyKey>) -> Self {
        Self { keys }
    }
}

impl fmt::Display for CodingPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.keys.is_empty() {
            return write!(f, "<root>");
        }
        for (i, key) in self.keys.iter().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            write!(f, "{}", key.string_value())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appending_adds_exactly_one_key() {
        let a = CodingPath::root().appending(&AnyKey::string("a"));
        let ab = a.appending(&AnyKey::string("b"));
        assert_eq!(a.len(), 1);
        assert_eq!(ab.keys(), &[AnyKey::string("a"), AnyKey::string("b")]);
        assert_eq!(ab.last(), Some(&AnyKey::string("b")));
    }

    #[test]
    fn appending_leaves_parent_untouched() {
        let parent = CodingPath::from(vec![AnyKey::string("a")]);
        let _child = parent.appending(&AnyKey::index(0));
        assert_eq!(parent.len(), 1);
    }

    #[test]
    fn display() {
        assert_eq!(CodingPath::root().to_string(), "<root>");
        let path = CodingPath::root()
            .appending(&AnyKey::string("items"))
            .appending(&AnyKey::index(2))
            .appending(&AnyKey::string("name"));
        assert_eq!(path.to_string(), "items.Index 2.name");
    }
}
