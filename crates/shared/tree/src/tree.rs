use crate::error::{TreeError, TreeErrorExt};
use crate::value::Value;
use indexmap::IndexMap;
use serde::de::{self, Deserialize, Deserializer, MapAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;

/// An ordered, nested mapping from string keys to [`Value`]s.
///
/// Trees are plain data: they carry no reference to the class they were extracted from,
/// so they can be edited, serialized and replayed freely. Key order is insertion order
/// and survives serialization.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigTree {
    entries: IndexMap<String, Value>,
}

impl ConfigTree {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.entries.get_mut(key)
    }

    /// Returns the subtree stored under `key`, if that entry is a tree.
    #[must_use]
    pub fn get_tree(&self, key: &str) -> Option<&Self> {
        self.get(key).and_then(Value::as_tree)
    }

    /// Inserts or replaces an entry. A replaced entry keeps its position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(key.into(), value.into())
    }

    /// Removes an entry, preserving the order of the remaining ones.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.shift_remove(key)
    }

    pub fn retain(&mut self, mut keep: impl FnMut(&str, &mut Value) -> bool) {
        self.entries.retain(|key, value| keep(key, value));
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut Value> {
        self.entries.values_mut()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Looks up a dotted path such as `renderer_LSTMRenderer_args.hidden_size`.
    #[must_use]
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let mut current = self.get(segments.next()?)?;
        for segment in segments {
            current = current.as_tree()?.get(segment)?;
        }
        Some(current)
    }

    /// Sets the value at a dotted path, creating intermediate trees that do not exist yet.
    ///
    /// # Errors
    /// Returns [`TreeError::Path`] if the path is empty or crosses an existing entry that
    /// is not a tree.
    pub fn set_path(&mut self, path: &str, value: impl Into<Value>) -> Result<(), TreeError> {
        let segments: Vec<&str> = path.split('.').collect();
        if segments.iter().any(|segment| segment.is_empty()) {
            return Err(TreeError::Path {
                message: format!("'{path}' has an empty segment").into(),
                context: None,
            });
        }

        let Some((last, parents)) = segments.split_last() else {
            return Err(TreeError::Path { message: "empty path".into(), context: None });
        };

        let mut current = self;
        for (depth, segment) in parents.iter().enumerate() {
            let slot = current
                .entries
                .entry((*segment).to_owned())
                .or_insert_with(|| Value::Tree(Self::new()));
            current = slot.as_tree_mut().ok_or_else(|| TreeError::Path {
                message: format!("'{}' is not a tree", segments[..=depth].join(".")).into(),
                context: Some(format!("Setting '{path}'").into()),
            })?;
        }
        current.insert(*last, value);
        Ok(())
    }

    /// Deep-merges `other` into `self`: subtrees present on both sides are merged
    /// recursively, every other entry of `other` replaces or extends `self`.
    pub fn merge(&mut self, other: &Self) {
        for (key, incoming) in &other.entries {
            match (self.entries.get_mut(key), incoming) {
                (Some(Value::Tree(existing)), Value::Tree(update)) => existing.merge(update),
                _ => {
                    self.entries.insert(key.clone(), incoming.clone());
                },
            }
        }
    }

    /// Parses a tree from YAML. An empty document yields an empty tree.
    ///
    /// # Errors
    /// Returns [`TreeError::Yaml`] if the text is not YAML or its top level is not a mapping.
    pub fn from_yaml(text: &str) -> Result<Self, TreeError> {
        if text.trim().is_empty() {
            return Ok(Self::new());
        }
        serde_yaml::from_str(text).context("Parsing YAML config tree")
    }

    /// # Errors
    /// Returns [`TreeError::Yaml`] if a value cannot be represented.
    pub fn to_yaml(&self) -> Result<String, TreeError> {
        serde_yaml::to_string(self).context("Writing YAML config tree")
    }

    /// # Errors
    /// Returns [`TreeError::Json`] if the text is not JSON or its top level is not an object.
    pub fn from_json(text: &str) -> Result<Self, TreeError> {
        serde_json::from_str(text).context("Parsing JSON config tree")
    }

    /// Pretty-printed JSON.
    ///
    /// # Errors
    /// Returns [`TreeError::Internal`] naming the dotted path of the first NaN or infinite
    /// float, which JSON cannot represent, and [`TreeError::Json`] if serialization fails.
    pub fn to_json(&self) -> Result<String, TreeError> {
        if let Some(path) = self.first_non_finite("") {
            return Err(TreeError::Internal {
                message: "JSON cannot represent NaN or infinite floats".into(),
                context: Some(format!("Writing JSON config tree at '{path}'").into()),
            });
        }
        serde_json::to_string_pretty(self).context("Writing JSON config tree")
    }

    fn first_non_finite(&self, prefix: &str) -> Option<String> {
        self.entries.iter().find_map(|(key, value)| {
            let path = if prefix.is_empty() { key.clone() } else { format!("{prefix}.{key}") };
            non_finite_in(value, path)
        })
    }
}

fn non_finite_in(value: &Value, path: String) -> Option<String> {
    match value {
        Value::Float(x) if !x.is_finite() => Some(path),
        Value::List(items) => items
            .iter()
            .enumerate()
            .find_map(|(i, item)| non_finite_in(item, format!("{path}[{i}]"))),
        Value::Tree(tree) => tree.first_non_finite(&path),
        _ => None,
    }
}

impl fmt::Display for ConfigTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (key, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{key}: {value}")?;
        }
        f.write_str("}")
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for ConfigTree {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self { entries: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect() }
    }
}

impl IntoIterator for ConfigTree {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl Serialize for ConfigTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ConfigTree {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(TreeVisitor)
    }
}

pub(crate) struct TreeVisitor;

impl<'de> Visitor<'de> for TreeVisitor {
    type Value = ConfigTree;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a mapping with string keys")
    }

    fn visit_unit<E: de::Error>(self) -> Result<ConfigTree, E> {
        Ok(ConfigTree::new())
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<ConfigTree, A::Error> {
        let mut entries = IndexMap::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((key, value)) = map.next_entry::<String, Value>()? {
            entries.insert(key, value);
        }
        Ok(ConfigTree { entries })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config_tree;

    #[test]
    fn removal_preserves_order() {
        let mut tree = config_tree! { "a" => 1, "b" => 2, "c" => 3 };
        tree.remove("b");
        assert_eq!(tree.keys().collect::<Vec<_>>(), ["a", "c"]);
    }

    #[test]
    fn set_path_creates_intermediate_trees() {
        let mut tree = ConfigTree::new();
        tree.set_path("raysampler_args.n_pts_per_ray", 64).unwrap();
        assert_eq!(tree.get_path("raysampler_args.n_pts_per_ray"), Some(&Value::Int(64)));
    }

    #[test]
    fn set_path_refuses_to_descend_into_scalars() {
        let mut tree = config_tree! { "a" => 1 };
        let err = tree.set_path("a.b", 2).unwrap_err();
        assert!(matches!(err, TreeError::Path { .. }));
        assert!(tree.set_path("a..b", 2).is_err());
    }

    #[test]
    fn merge_is_deep_and_appends_new_keys() {
        let mut base = config_tree! {
            "a_class_type" => "A1",
            "a_A1_args" => config_tree! { "m" => 3, "k" => 1 },
        };
        let update = config_tree! {
            "a_A1_args" => config_tree! { "m" => 7 },
            "extra" => true,
        };
        base.merge(&update);

        assert_eq!(base.get_path("a_A1_args.m"), Some(&Value::Int(7)));
        assert_eq!(base.get_path("a_A1_args.k"), Some(&Value::Int(1)));
        assert_eq!(base.keys().collect::<Vec<_>>(), ["a_class_type", "a_A1_args", "extra"]);
    }

    #[test]
    fn empty_yaml_is_an_empty_tree() {
        assert!(ConfigTree::from_yaml("").unwrap().is_empty());
        assert!(ConfigTree::from_yaml("- 1\n- 2\n").is_err());
    }

    #[test]
    fn displays_inline() {
        let tree = config_tree! { "m" => 3, "n" => config_tree! { "x" => "2" } };
        assert_eq!(tree.to_string(), "{m: 3, n: {x: 2}}");
    }
}
