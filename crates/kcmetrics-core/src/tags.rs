//! Counter tags and tag value sanitizing.

use std::borrow::Cow;

pub const REALM_TAG: &str = "realm";
pub const PROVIDER_TAG: &str = "provider";
pub const CLIENT_ID_TAG: &str = "client.id";
pub const ERROR_TAG: &str = "error";
pub const RESOURCE_TAG: &str = "resource";
pub const EVENT_TAG: &str = "event";
pub const IDP_TAG: &str = "idp";

/// Provider tag value for logins handled by the server's own accounts.
pub const PROVIDER_KEYCLOAK_OPENID: &str = "keycloak";

/// Substitute tag value for identifiers that would explode cardinality.
pub const UNKNOWN: &str = "unknown";

/// Map an absent attribute to the empty string.
///
/// Every tag value goes through this before reaching a registry, so no
/// series is ever created with a missing value.
#[must_use]
pub fn null_to_empty(value: Option<&str>) -> &str {
    value.unwrap_or("")
}

/// A single key/value pair attached to a counter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag {
    pub key: Cow<'static, str>,
    pub value: String,
}

impl Tag {
    #[must_use]
    pub fn new(key: impl Into<Cow<'static, str>>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Ordered set of tags.
///
/// Insertion order is kept for presentation. Adding a key that is already
/// present replaces its value in place, so keys are unique.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tags(Vec<Tag>);

impl Tags {
    #[must_use]
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    /// Returns these tags plus `key=value`.
    #[must_use]
    pub fn and(mut self, key: impl Into<Cow<'static, str>>, value: impl Into<String>) -> Self {
        self.insert(Tag::new(key, value));
        self
    }

    /// Insert a tag, replacing the value of an existing tag with the same key.
    pub fn insert(&mut self, tag: Tag) {
        match self.0.iter_mut().find(|existing| existing.key == tag.key) {
            Some(existing) => existing.value = tag.value,
            None => self.0.push(tag),
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|tag| tag.key == key)
            .map(|tag| tag.value.as_str())
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tag> {
        self.0.iter()
    }

    /// Tag keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|tag| tag.key.as_ref())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Order-independent identity of this tag set, sorted by key.
    #[must_use]
    pub fn canonical(&self) -> Vec<(String, String)> {
        let mut pairs: Vec<(String, String)> = self
            .0
            .iter()
            .map(|tag| (tag.key.to_string(), tag.value.clone()))
            .collect();
        pairs.sort();
        pairs
    }
}

impl<K, V> FromIterator<(K, V)> for Tags
where
    K: Into<Cow<'static, str>>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tags = Tags::empty();
        for (key, value) in iter {
            tags.insert(Tag::new(key, value));
        }
        tags
    }
}

impl<'a> IntoIterator for &'a Tags {
    type Item = &'a Tag;
    type IntoIter = std::slice::Iter<'a, Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
