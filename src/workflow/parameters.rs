use ahash::RandomState;
use indexmap::IndexMap;
use indexmap::map::Entry;
use serde::{Deserialize, Deserializer, Serialize};

/// An insertion-ordered map from parameter name to `V`.
///
/// Serializes as a plain object whose keys appear in insertion order, so
/// generated templates come out byte-for-byte identical between runs.
/// `null` deserializes to an empty map.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct ParameterMap<V>(IndexMap<String, V, RandomState>);

impl<V> ParameterMap<V> {
    pub fn new() -> Self {
        Self(IndexMap::default())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Inserts `value` under `key`, returning the previous value.
    /// An existing key keeps its original position.
    pub fn insert(&mut self, key: impl Into<String>, value: V) -> Option<V> {
        self.0.insert(key.into(), value)
    }

    /// Inserts `value` under `key` only if the key is not taken yet.
    /// On conflict the map is left untouched and the key is handed back.
    pub fn insert_unique(&mut self, key: impl Into<String>, value: V) -> Result<(), String> {
        match self.0.entry(key.into()) {
            Entry::Occupied(entry) => Err(entry.key().clone()),
            Entry::Vacant(entry) => {
                entry.insert(value);
                Ok(())
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl<V> Default for ParameterMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

// Equality follows iteration order, since order is observable once serialized.
impl<V: PartialEq> PartialEq for ParameterMap<V> {
    fn eq(&self, other: &Self) -> bool {
        self.0.iter().eq(other.0.iter())
    }
}

impl<K: Into<String>, V> FromIterator<(K, V)> for ParameterMap<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl<V> IntoIterator for ParameterMap<V> {
    type Item = (String, V);
    type IntoIter = indexmap::map::IntoIter<String, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for ParameterMap<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let map = Option::<IndexMap<String, V, RandomState>>::deserialize(deserializer)?;
        Ok(Self(map.unwrap_or_default()))
    }
}
