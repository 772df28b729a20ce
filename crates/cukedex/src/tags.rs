//! Ordered, de-duplicated tag sets.
//!
//! Tag order is irrelevant to filtering but preserved for display, so the
//! set is a `Vec` with membership checks rather than a hash set. Feature
//! files rarely carry more than a handful of tags per construct.

use serde::Serialize;

/// Case-sensitive tags in first-seen order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TagSet(Vec<String>);

impl TagSet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tag, returning `false` when it was already present.
    pub fn insert(&mut self, tag: impl Into<String>) -> bool {
        let tag = tag.into();
        if self.contains(&tag) {
            return false;
        }
        self.0.push(tag);
        true
    }

    /// Add every tag from `additions` not already present.
    pub fn extend_from(&mut self, additions: &Self) {
        for tag in additions.iter() {
            self.insert(tag);
        }
    }

    /// Return the union of two sets: `self` first, then new tags from `other`.
    ///
    /// # Examples
    ///
    /// ```
    /// use cukedex::TagSet;
    ///
    /// let feature = TagSet::from_iter(["@billing", "@slow"]);
    /// let scenario = TagSet::from_iter(["@slow", "@wip"]);
    /// let merged = feature.union(&scenario);
    /// assert_eq!(merged.as_slice(), ["@billing", "@slow", "@wip"]);
    /// ```
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        let mut merged = self.clone();
        merged.extend_from(other);
        merged
    }

    /// Whether the set contains `tag`.
    #[must_use]
    pub fn contains(&self, tag: &str) -> bool {
        self.0.iter().any(|existing| existing == tag)
    }

    /// Whether the two sets share at least one tag.
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        other.iter().any(|tag| self.contains(tag))
    }

    /// Whether every tag of `other` is in `self`.
    #[must_use]
    pub fn is_superset_of(&self, other: &Self) -> bool {
        other.iter().all(|tag| self.contains(tag))
    }

    /// Iterate over the tags in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Borrow the tags as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Number of tags.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for TagSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        for tag in iter {
            set.insert(tag);
        }
        set
    }
}

impl<'a> IntoIterator for &'a TagSet {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Prefix `@` onto a tag supplied without one.
///
/// Filter configuration is often written as bare names (`wip`), while tags
/// read from feature files always carry the sentinel.
#[must_use]
pub fn normalise_tag(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with('@') {
        trimmed.to_string()
    } else {
        format!("@{trimmed}")
    }
}
