//! Tag-based admission rules for parsed constructs.
//!
//! A [`TagFilter`] combines up to three independent criteria with logical
//! AND:
//!
//! - `none`: reject a candidate carrying any of these tags;
//! - `any`: require at least one of these tags;
//! - `all`: require every one of these tags.
//!
//! An empty criterion is unspecified and always satisfied, so the default
//! filter accepts everything.

use serde::Deserialize;
use thiserror::Error;

use crate::tags::{TagSet, normalise_tag};

/// Errors raised while building a filter from command-line expressions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    /// A comma list mixed negated (`~@a`) and plain (`@b`) tags.
    #[error("tag expression `{0}` mixes negated and plain tags")]
    MixedExpression(String),
    /// An expression contained no tag.
    #[error("empty tag expression")]
    EmptyExpression,
}

/// Conjunction of tag exclusion and inclusion criteria.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TagFilter {
    none: TagSet,
    any: TagSet,
    all: TagSet,
}

impl TagFilter {
    /// A filter that accepts every candidate.
    #[must_use]
    pub fn unfiltered() -> Self {
        Self::default()
    }

    /// Reject candidates carrying any of `tags`.
    #[must_use]
    pub fn with_none<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        extend_normalised(&mut self.none, tags);
        self
    }

    /// Require candidates to carry at least one of `tags`.
    #[must_use]
    pub fn with_any<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        extend_normalised(&mut self.any, tags);
        self
    }

    /// Require candidates to carry every one of `tags`.
    #[must_use]
    pub fn with_all<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        extend_normalised(&mut self.all, tags);
        self
    }

    /// Tags that exclude a candidate.
    #[must_use]
    pub fn none(&self) -> &TagSet {
        &self.none
    }

    /// Tags of which a candidate needs at least one.
    #[must_use]
    pub fn any(&self) -> &TagSet {
        &self.any
    }

    /// Tags a candidate needs all of.
    #[must_use]
    pub fn all(&self) -> &TagSet {
        &self.all
    }

    /// Whether no criterion is specified.
    #[must_use]
    pub fn is_unfiltered(&self) -> bool {
        self.none.is_empty() && self.any.is_empty() && self.all.is_empty()
    }

    /// Decide whether a candidate with `tags` survives.
    ///
    /// # Examples
    ///
    /// ```
    /// use cukedex::{TagFilter, TagSet};
    ///
    /// let filter = TagFilter::unfiltered()
    ///     .with_all(["@outline"])
    ///     .with_none(["@example_set"]);
    /// assert!(filter.accepts(&TagSet::from_iter(["@outline"])));
    /// assert!(!filter.accepts(&TagSet::from_iter(["@outline", "@example_set"])));
    /// assert!(!filter.accepts(&TagSet::new()));
    /// ```
    #[must_use]
    pub fn accepts(&self, tags: &TagSet) -> bool {
        let excluded = tags.intersects(&self.none);
        let any_met = self.any.is_empty() || tags.intersects(&self.any);
        let all_met = tags.is_superset_of(&self.all);
        !excluded && any_met && all_met
    }

    /// Build a filter from cucumber-style `--tags` expressions.
    ///
    /// Each expression contributes to one criterion:
    ///
    /// - `~@a` or `~@a,~@b` adds to `none`;
    /// - `@a,@b` adds to `any`;
    /// - a single `@a` adds to `all`.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::MixedExpression`] when one comma list mixes
    /// negated and plain tags, and [`FilterError::EmptyExpression`] for an
    /// expression with no tags.
    ///
    /// # Examples
    ///
    /// ```
    /// use cukedex::TagFilter;
    ///
    /// let filter = TagFilter::from_expressions(["~@wip", "@fast,@smoke", "@billing"])?;
    /// assert_eq!(filter.none().as_slice(), ["@wip"]);
    /// assert_eq!(filter.any().as_slice(), ["@fast", "@smoke"]);
    /// assert_eq!(filter.all().as_slice(), ["@billing"]);
    /// # Ok::<(), cukedex::FilterError>(())
    /// ```
    pub fn from_expressions<I, S>(expressions: I) -> Result<Self, FilterError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut filter = Self::unfiltered();
        for expression in expressions {
            filter.apply_expression(expression.as_ref())?;
        }
        Ok(filter)
    }

    fn apply_expression(&mut self, expression: &str) -> Result<(), FilterError> {
        let terms: Vec<&str> = expression
            .split(',')
            .map(str::trim)
            .filter(|term| !term.is_empty())
            .collect();
        let negated = terms.iter().filter(|term| term.starts_with('~')).count();
        match (terms.as_slice(), negated) {
            ([], _) => Err(FilterError::EmptyExpression),
            (_, count) if count == terms.len() => {
                extend_normalised(
                    &mut self.none,
                    terms.iter().map(|term| term.trim_start_matches('~')),
                );
                Ok(())
            }
            (_, count) if count > 0 => Err(FilterError::MixedExpression(expression.to_string())),
            ([single], _) => {
                extend_normalised(&mut self.all, [single]);
                Ok(())
            }
            (many, _) => {
                extend_normalised(&mut self.any, many);
                Ok(())
            }
        }
    }

    /// Merge another filter's criteria into this one.
    #[must_use]
    pub fn merged(mut self, other: &Self) -> Self {
        self.none.extend_from(&other.none);
        self.any.extend_from(&other.any);
        self.all.extend_from(&other.all);
        self
    }
}

fn extend_normalised<I, S>(target: &mut TagSet, tags: I)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    for tag in tags {
        target.insert(normalise_tag(tag.as_ref()));
    }
}

/// One tag or a list of tags, as accepted by configuration files.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    /// A single tag, treated as a one-element list.
    One(String),
    /// A list of tags.
    Many(Vec<String>),
}

impl OneOrMany {
    /// The tags as a list.
    #[must_use]
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Self::One(tag) => vec![tag],
            Self::Many(tags) => tags,
        }
    }
}

/// Serialized filter configuration with optional `any`, `all` and `none`
/// keys.
///
/// # Examples
///
/// ```
/// use cukedex::{TagFilter, TagFilterConfig};
///
/// let config: TagFilterConfig =
///     serde_json::from_str(r#"{"none": "@wip", "all": ["@a", "b"]}"#)?;
/// let filter = TagFilter::from(config);
/// assert_eq!(filter.none().as_slice(), ["@wip"]);
/// assert_eq!(filter.all().as_slice(), ["@a", "@b"]);
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TagFilterConfig {
    /// Accept only candidates carrying at least one of these tags.
    #[serde(default)]
    pub any: Option<OneOrMany>,
    /// Accept only candidates carrying all of these tags.
    #[serde(default)]
    pub all: Option<OneOrMany>,
    /// Reject candidates carrying any of these tags.
    #[serde(default)]
    pub none: Option<OneOrMany>,
}

impl From<TagFilterConfig> for TagFilter {
    fn from(config: TagFilterConfig) -> Self {
        let values = |value: Option<OneOrMany>| value.map(OneOrMany::into_vec).unwrap_or_default();
        Self::unfiltered()
            .with_any(values(config.any))
            .with_all(values(config.all))
            .with_none(values(config.none))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn tags(values: &[&str]) -> TagSet {
        values.iter().copied().collect()
    }

    #[rstest]
    #[case(&[])]
    #[case(&["@wip"])]
    #[case(&["@a", "@b", "@c"])]
    fn unfiltered_accepts_everything(#[case] candidate: &[&str]) {
        let filter = TagFilter::unfiltered();
        assert!(filter.is_unfiltered());
        assert!(filter.accepts(&tags(candidate)));
    }

    #[rstest]
    #[case(&["@wip"], false)]
    #[case(&["@wip", "@fast"], false)]
    #[case(&["@fast"], true)]
    #[case(&[], true)]
    fn none_rejects_any_intersection(#[case] candidate: &[&str], #[case] expected: bool) {
        let filter = TagFilter::unfiltered().with_none(["@wip"]);
        assert_eq!(filter.accepts(&tags(candidate)), expected);
    }

    #[rstest]
    #[case(&["@a"], true)]
    #[case(&["@b", "@z"], true)]
    #[case(&["@z"], false)]
    #[case(&[], false)]
    fn any_requires_an_intersection(#[case] candidate: &[&str], #[case] expected: bool) {
        let filter = TagFilter::unfiltered().with_any(["@a", "@b"]);
        assert_eq!(filter.accepts(&tags(candidate)), expected);
    }

    #[rstest]
    #[case(&["@a", "@b"], true)]
    #[case(&["@b", "@a", "@c"], true)]
    #[case(&["@a"], false)]
    fn all_requires_a_superset(#[case] candidate: &[&str], #[case] expected: bool) {
        let filter = TagFilter::unfiltered().with_all(["@a", "@b"]);
        assert_eq!(filter.accepts(&tags(candidate)), expected);
    }

    #[test]
    fn criteria_combine_with_and() {
        let filter = TagFilter::unfiltered()
            .with_any(["@scenario", "@outline"])
            .with_none(["@feature"]);
        assert!(!filter.accepts(&tags(&["@feature", "@scenario"])));
        assert!(filter.accepts(&tags(&["@scenario"])));
        assert!(!filter.accepts(&tags(&["@other"])));
    }

    #[test]
    fn accepts_matches_the_decision_rule_exhaustively() {
        let universe = ["@a", "@b", "@c"];
        let subsets: Vec<TagSet> = (0u8..8)
            .map(|mask| {
                universe
                    .iter()
                    .enumerate()
                    .filter(|(bit, _)| mask & (1 << bit) != 0)
                    .map(|(_, tag)| *tag)
                    .collect()
            })
            .collect();
        for none in &subsets {
            for any in &subsets {
                for all in &subsets {
                    let filter = TagFilter::unfiltered()
                        .with_none(none.iter())
                        .with_any(any.iter())
                        .with_all(all.iter());
                    for candidate in &subsets {
                        let expected = (none.is_empty() || !candidate.intersects(none))
                            && (any.is_empty() || candidate.intersects(any))
                            && (all.is_empty() || candidate.is_superset_of(all));
                        assert_eq!(filter.accepts(candidate), expected);
                    }
                }
            }
        }
    }

    #[rstest]
    #[case(&["~@wip"], &["@wip"], &[], &[])]
    #[case(&["~@wip,~@slow"], &["@wip", "@slow"], &[], &[])]
    #[case(&["@a,@b"], &[], &["@a", "@b"], &[])]
    #[case(&["@a", "@b"], &[], &[], &["@a", "@b"])]
    #[case(&["wip"], &[], &[], &["@wip"])]
    fn builds_from_expressions(
        #[case] expressions: &[&str],
        #[case] none: &[&str],
        #[case] any: &[&str],
        #[case] all: &[&str],
    ) {
        let filter = TagFilter::from_expressions(expressions)
            .unwrap_or_else(|err| panic!("expressions should parse: {err}"));
        assert_eq!(filter.none(), &tags(none));
        assert_eq!(filter.any(), &tags(any));
        assert_eq!(filter.all(), &tags(all));
    }

    #[test]
    fn rejects_mixed_expressions() {
        assert_eq!(
            TagFilter::from_expressions(["@a,~@b"]),
            Err(FilterError::MixedExpression("@a,~@b".into()))
        );
    }

    #[test]
    fn rejects_empty_expressions() {
        assert_eq!(
            TagFilter::from_expressions([" , "]),
            Err(FilterError::EmptyExpression)
        );
    }

    #[test]
    fn config_accepts_scalars_and_lists() {
        let config: TagFilterConfig =
            serde_json::from_str(r#"{"any": "@wip", "all": ["@example_set", "@outline"]}"#)
                .unwrap_or_else(|err| panic!("config should deserialize: {err}"));
        let filter = TagFilter::from(config);
        assert_eq!(filter.any(), &tags(&["@wip"]));
        assert_eq!(filter.all(), &tags(&["@example_set", "@outline"]));
        assert!(filter.none().is_empty());
    }

    #[test]
    fn merged_unions_each_criterion() {
        let left = TagFilter::unfiltered().with_any(["@a"]).with_none(["@x"]);
        let right = TagFilter::unfiltered().with_any(["@b"]).with_all(["@c"]);
        let merged = left.merged(&right);
        assert_eq!(merged.any(), &tags(&["@a", "@b"]));
        assert_eq!(merged.all(), &tags(&["@c"]));
        assert_eq!(merged.none(), &tags(&["@x"]));
    }
}
