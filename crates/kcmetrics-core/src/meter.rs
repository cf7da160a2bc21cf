//! Identity of a counter series.

use std::borrow::Cow;

use crate::tags::{Tag, Tags};

/// Name, tags and presentation hints of one counter series.
///
/// Two ids denote the same series when their names and canonical tag sets
/// are equal; description and base unit do not take part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeterId {
    pub name: Cow<'static, str>,
    pub tags: Tags,
    pub description: Option<&'static str>,
    pub base_unit: Option<&'static str>,
}

impl MeterId {
    /// Start building a counter id.
    #[must_use]
    pub fn counter(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            tags: Tags::empty(),
            description: None,
            base_unit: None,
        }
    }

    #[must_use]
    pub fn tag(mut self, key: impl Into<Cow<'static, str>>, value: impl Into<String>) -> Self {
        self.tags.insert(Tag::new(key, value));
        self
    }

    #[must_use]
    pub fn tags(mut self, tags: Tags) -> Self {
        for tag in tags.iter() {
            self.tags.insert(tag.clone());
        }
        self
    }

    #[must_use]
    pub fn description(mut self, description: &'static str) -> Self {
        self.description = Some(description);
        self
    }

    #[must_use]
    pub fn base_unit(mut self, base_unit: &'static str) -> Self {
        self.base_unit = Some(base_unit);
        self
    }

    /// Key identifying the series regardless of tag order.
    #[must_use]
    pub fn series_key(&self) -> (String, Vec<(String, String)>) {
        (self.name.to_string(), self.tags.canonical())
    }
}
