//! Internal data structures
//!
//! Defines the credential value objects shared by the harvester, the retry
//! controller, the cache and the persistence layer.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// An ordered mapping of cookie names to values.
///
/// Lookup is by name, but the set remembers insertion order so that both
/// serialized forms (the `"name=value; name=value"` header string and the
/// persisted JSON document) reproduce the order the browser reported.
///
/// An unvalidated set may be missing the platform's required identifier keys;
/// callers that care use [`CredentialSet::missing_keys`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CredentialSet {
    entries: Vec<(String, String)>,
}

impl CredentialSet {
    /// Create an empty credential set
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a cookie, replacing any existing value in place
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Look up a cookie value by name
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Whether a cookie with the given name is present
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| n == name)
    }

    /// Number of cookies in the set
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the set holds no cookies at all
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(name, value)` pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Serialize to the composite `Cookie` header form consumed downstream
    pub fn header_string(&self) -> String {
        self.entries
            .iter()
            .map(|(n, v)| format!("{n}={v}"))
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// Return the required keys this set is missing, preserving their order
    pub fn missing_keys<'a>(&self, required: &'a [String]) -> Vec<&'a str> {
        required
            .iter()
            .filter(|name| !self.contains(name))
            .map(String::as_str)
            .collect()
    }
}

impl FromIterator<(String, String)> for CredentialSet {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut set = Self::new();
        for (name, value) in iter {
            set.insert(name, value);
        }
        set
    }
}

impl Serialize for CredentialSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for CredentialSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SetVisitor;

        impl<'de> Visitor<'de> for SetVisitor {
            type Value = CredentialSet;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of cookie names to values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut set = CredentialSet::new();
                while let Some((name, value)) = access.next_entry::<String, String>()? {
                    set.insert(name, value);
                }
                Ok(set)
            }
        }

        deserializer.deserialize_map(SetVisitor)
    }
}

/// The boolean result shape every credential operation returns.
///
/// `success` mirrors "has cookies": a bundle built from an empty set is a
/// failure, anything else is a success. There is no partial state beyond
/// that.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialBundle {
    /// Whether the operation yielded any cookies
    pub success: bool,
    /// The composite `"name=value; name=value"` header string (empty on failure)
    pub cookie_header: String,
    /// The harvested cookies (empty on failure)
    pub cookies: CredentialSet,
}

impl CredentialBundle {
    /// Build a bundle from a harvested set; success is "set is non-empty"
    pub fn from_cookies(cookies: CredentialSet) -> Self {
        Self {
            success: !cookies.is_empty(),
            cookie_header: cookies.header_string(),
            cookies,
        }
    }

    /// The failure bundle: no cookies, empty header
    pub fn empty() -> Self {
        Self {
            success: false,
            cookie_header: String::new(),
            cookies: CredentialSet::new(),
        }
    }
}

impl Default for CredentialBundle {
    fn default() -> Self {
        Self::empty()
    }
}
