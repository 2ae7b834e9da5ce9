use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Key into a [`UserInfo`] map.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CodingUserInfoKey(String);

impl CodingUserInfoKey {
    pub fn new(raw_value: impl Into<String>) -> Self {
        Self(raw_value.into())
    }

    pub fn raw_value(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CodingUserInfoKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque context data supplied by the caller of a top-level encode or
/// decode. Read-only for the duration of the traversal.
#[derive(Clone, Default)]
pub struct UserInfo {
    entries: HashMap<CodingUserInfoKey, Arc<dyn Any + Send + Sync>>,
}

impl UserInfo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, replacing any previous value under `key`.
    pub fn insert<T: Any + Send + Sync>(&mut self, key: CodingUserInfoKey, value: T) {
        self.entries.insert(key, Arc::new(value));
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with<T: Any + Send + Sync>(mut self, key: CodingUserInfoKey, value: T) -> Self {
        self.insert(key, value);
        self
    }

    /// Look up a value of type `T`.
    ///
    /// Returns `None` if the key is absent or holds a different type.
    pub fn get<T: Any>(&self, key: &CodingUserInfoKey) -> Option<&T> {
        self.entries.get(key).and_then(|v| v.downcast_ref::<T>())
    }

    pub fn contains_key(&self, key: &CodingUserInfoKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for UserInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&CodingUserInfoKey> = self.entries.keys().collect();
        keys.sort();
        f.debug_struct("UserInfo").field("keys", &keys).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_lookup() {
        let version = CodingUserInfoKey::new("version");
        let info = UserInfo::new().with(version.clone(), 3u32);

        assert_eq!(info.get::<u32>(&version), Some(&3));
        assert_eq!(info.get::<String>(&version), None);
        assert!(info.contains_key(&version));
        assert_eq!(info.len(), 1);
    }

    #[test]
    fn missing_key() {
        let info = UserInfo::new();
        assert!(info.is_empty());
        assert_eq!(info.get::<u32>(&CodingUserInfoKey::new("absent")), None);
    }
}
