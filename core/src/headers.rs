//! Ordered header list with case-insensitive names.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const CONTENT_TYPE: &str = "Content-Type";
pub const ACCEPT: &str = "Accept";

/// A list of `(name, value)` pairs, at most one entry per name.
///
/// Names compare ignoring ASCII case; the spelling of the first insertion is
/// kept. Serializes as a JSON/TOML map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, String>", into = "BTreeMap<String, String>")]
pub struct Headers(Vec<(String, String)>);

impl Headers {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Headers every new client starts with.
    pub fn defaults() -> Self {
        Self::new()
            .with(CONTENT_TYPE, "application/json")
            .with(ACCEPT, "application/json, text/plain, */*, multipart/form-data")
    }

    /// Set `name` to `value`, returning the previous value if there was one.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let name = name.into();
        let value = value.into();
        match self.position(&name) {
            Some(idx) => Some(std::mem::replace(&mut self.0[idx].1, value)),
            None => {
                self.0.push((name, value));
                None
            }
        }
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.position(name).map(|idx| self.0[idx].1.as_str())
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.position(name).map(|idx| self.0.remove(idx).1)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Apply `other` on top of `self`; entries of `other` win.
    pub fn merge(&mut self, other: &Headers) {
        for (name, value) in other.iter() {
            self.insert(name, value);
        }
    }

    /// Like `merge`, leaving `self` untouched.
    pub fn merged(&self, other: &Headers) -> Headers {
        let mut out = self.clone();
        out.merge(other);
        out
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.0.iter().position(|(n, _)| n.eq_ignore_ascii_case(name))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = Headers::new();
        for (name, value) in iter {
            headers.insert(name, value);
        }
        headers
    }
}

impl<K: Into<String>, V: Into<String>, const N: usize> From<[(K, V); N]> for Headers {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl From<BTreeMap<String, String>> for Headers {
    fn from(map: BTreeMap<String, String>) -> Self {
        map.into_iter().collect()
    }
}

impl From<Headers> for BTreeMap<String, String> {
    fn from(headers: Headers) -> Self {
        headers.0.into_iter().collect()
    }
}

impl IntoIterator for Headers {
    type Item = (String, String);
    type IntoIter = std::vec::IntoIter<(String, String)>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_carry_json_content_type_and_accept() {
        let headers = Headers::defaults();
        assert_eq!(headers.get("content-type"), Some("application/json"));
        assert_eq!(
            headers.get("Accept"),
            Some("application/json, text/plain, */*, multipart/form-data")
        );
        assert_eq!(headers.len(), 2);
    }

    #[test]
    fn insert_replaces_ignoring_case() {
        let mut headers = Headers::new();
        assert_eq!(headers.insert("X-Token", "a"), None);
        assert_eq!(headers.insert("x-token", "b").as_deref(), Some("a"));
        assert_eq!(headers.len(), 1);
        assert_eq!(headers.iter().next(), Some(("X-Token", "b")));
    }

    #[test]
    fn merge_lets_other_win_and_keeps_unrelated_keys() {
        let mut headers = Headers::defaults();
        headers.merge(&Headers::from([("Content-Type", "text/plain"), ("Authorization", "Bearer t")]));
        assert_eq!(headers.get("Content-Type"), Some("text/plain"));
        assert_eq!(headers.get("Authorization"), Some("Bearer t"));
        assert!(headers.contains("accept"));
        assert_eq!(headers.len(), 3);
    }

    #[test]
    fn merged_leaves_original_untouched() {
        let base = Headers::defaults();
        let out = base.merged(&Headers::from([("Accept", "text/plain")]));
        assert_eq!(out.get("Accept"), Some("text/plain"));
        assert_eq!(base, Headers::defaults());
    }

    #[test]
    fn remove_ignores_case() {
        let mut headers = Headers::defaults();
        assert_eq!(headers.remove("CONTENT-TYPE").as_deref(), Some("application/json"));
        assert!(!headers.contains("Content-Type"));
    }

    #[test]
    fn deserializes_from_map() {
        let headers: Headers = serde_json::from_str(r#"{"X-Api-Key":"k"}"#).unwrap();
        assert_eq!(headers.get("x-api-key"), Some("k"));
        let back = serde_json::to_value(&headers).unwrap();
        assert_eq!(back["X-Api-Key"], "k");
    }
}
