//! Tag sets and the tag filter.
//!
//! A [`TagFilter`] maps tag names to acceptable value fragments. An entity
//! matches when every filtered name is present and, for names with
//! fragments, at least one fragment occurs in the entity's value ignoring
//! case. Names are combined with AND, fragments of one name with OR.
//!
//! A filter may also bound the area enclosed by a way (`way_area>N`,
//! `way_area<N`, in square metres). Area bounds are not tags: they are
//! checked against geometry during aggregation.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::entity::Category;

/// OpenStreetMap-style tags, ordered by tag name.
pub type Tags = BTreeMap<String, String>;

/// Tags that only ever appear on point-like entities.
const NODE_ONLY_TAGS: [&str; 2] = ["capital", "ele"];
/// Tags that never appear on point-like entities.
const NON_NODE_TAGS: [&str; 1] = ["tracktype"];

const WAY_AREA_ABOVE: &str = "way_area>";
const WAY_AREA_BELOW: &str = "way_area<";

/// Errors returned while building a [`TagFilter`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TagFilterError {
    /// A filter entry had an empty tag name.
    #[error("tag filter entries must name a tag")]
    EmptyTagName,
    /// A `tag=value` argument had no `=` separator.
    #[error("tag without value: {argument} (use {argument}= to match any value)")]
    MissingValue { argument: String },
    /// A `way_area>N` or `way_area<N` bound was not a finite number.
    #[error("way area bound must be a finite number of square metres: {argument}")]
    InvalidWayArea { argument: String },
}

/// Exclusive bounds on the area enclosed by a way, in square metres.
///
/// # Examples
/// ```
/// use osmf_core::AreaBounds;
///
/// let bounds = AreaBounds { min: Some(100.0), max: Some(500.0) };
/// assert!(bounds.admits(250.0));
/// assert!(!bounds.admits(100.0));
/// assert!(AreaBounds::default().is_unbounded());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AreaBounds {
    /// Areas must be strictly greater than this.
    pub min: Option<f64>,
    /// Areas must be strictly less than this.
    pub max: Option<f64>,
}

impl AreaBounds {
    #[must_use]
    pub const fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    /// Whether `area` lies strictly between the bounds that are set.
    #[must_use]
    pub fn admits(&self, area: f64) -> bool {
        self.min.is_none_or(|min| area > min) && self.max.is_none_or(|max| area < max)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct TagPredicate {
    name: String,
    any_value: bool,
    /// Lowercased value fragments.
    fragments: Vec<String>,
}

impl TagPredicate {
    fn accepts(&self, value: &str) -> bool {
        if self.any_value {
            return true;
        }
        let value = value.to_lowercase();
        self.fragments
            .iter()
            .any(|fragment| value.contains(fragment.as_str()))
    }
}

/// Predicate over an entity's tags.
///
/// # Examples
/// ```
/// use osmf_core::TagFilter;
///
/// # fn main() -> Result<(), osmf_core::TagFilterError> {
/// let filter = TagFilter::parse(["amenity=cafe", "name="])?;
/// assert!(filter.matches([("amenity", "Cafe Deluxe"), ("name", "Deluxe")]));
/// assert!(!filter.matches([("amenity", "cafe")]));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagFilter {
    /// Sorted by name, names unique.
    predicates: Vec<TagPredicate>,
    area: AreaBounds,
}

impl TagFilter {
    /// A filter that accepts every entity.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Require ways to enclose more than `min` square metres.
    #[must_use]
    pub fn area_above(mut self, min: f64) -> Self {
        self.area.min = Some(min);
        self
    }

    /// Require ways to enclose less than `max` square metres.
    #[must_use]
    pub fn area_below(mut self, max: f64) -> Self {
        self.area.max = Some(max);
        self
    }

    /// Require `name`, accepting any of `values` as a case-insensitive
    /// substring. An empty `values` list only requires presence.
    ///
    /// Calling this repeatedly for the same name widens the accepted values.
    pub fn require<I, S>(mut self, name: &str, values: I) -> Result<Self, TagFilterError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if name.is_empty() {
            return Err(TagFilterError::EmptyTagName);
        }
        let fragments: Vec<String> = values
            .into_iter()
            .map(|value| value.as_ref().to_lowercase())
            .collect();
        let any_value = fragments.is_empty();
        match self
            .predicates
            .binary_search_by(|predicate| predicate.name.as_str().cmp(name))
        {
            Ok(position) => {
                if let Some(predicate) = self.predicates.get_mut(position) {
                    predicate.any_value |= any_value;
                    predicate.fragments.extend(fragments);
                }
            }
            Err(position) => self.predicates.insert(
                position,
                TagPredicate {
                    name: name.to_owned(),
                    any_value,
                    fragments,
                },
            ),
        }
        Ok(self)
    }

    /// Parse `tag=value`, `way_area>N` and `way_area<N` arguments.
    ///
    /// `tag=` matches any value; repeating a tag accepts any of its values.
    /// A repeated area bound replaces the earlier one.
    pub fn parse<I, S>(arguments: I) -> Result<Self, TagFilterError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        arguments.into_iter().try_fold(Self::new(), |filter, argument| {
            let argument = argument.as_ref();
            if let Some(bound) = argument.strip_prefix(WAY_AREA_ABOVE) {
                return Ok(filter.area_above(parse_area(argument, bound)?));
            }
            if let Some(bound) = argument.strip_prefix(WAY_AREA_BELOW) {
                return Ok(filter.area_below(parse_area(argument, bound)?));
            }
            let (name, value) =
                argument
                    .split_once('=')
                    .ok_or_else(|| TagFilterError::MissingValue {
                        argument: argument.to_owned(),
                    })?;
            if value.is_empty() {
                filter.require(name, std::iter::empty::<&str>())
            } else {
                filter.require(name, [value])
            }
        })
    }

    /// Whether the filter accepts everything.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty() && self.area.is_unbounded()
    }

    /// Bounds on the area enclosed by reported ways.
    #[must_use]
    pub const fn area_bounds(&self) -> AreaBounds {
        self.area
    }

    /// Filtered tag names in ascending order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.predicates.iter().map(|predicate| predicate.name.as_str())
    }

    /// Evaluate the tag predicates against borrowed `(name, value)` pairs.
    ///
    /// Area bounds take no part; see [`TagFilter::area_bounds`].
    #[must_use]
    pub fn matches<'a, T>(&self, tags: T) -> bool
    where
        T: IntoIterator<Item = (&'a str, &'a str)>,
    {
        if self.predicates.is_empty() {
            return true;
        }
        let mut satisfied = vec![false; self.predicates.len()];
        let mut remaining = self.predicates.len();
        for (name, value) in tags {
            let Ok(position) = self
                .predicates
                .binary_search_by(|predicate| predicate.name.as_str().cmp(name))
            else {
                continue;
            };
            let (Some(done), Some(predicate)) =
                (satisfied.get_mut(position), self.predicates.get(position))
            else {
                continue;
            };
            if !*done && predicate.accepts(value) {
                *done = true;
                remaining -= 1;
                if remaining == 0 {
                    return true;
                }
            }
        }
        false
    }

    /// Evaluate the tag predicates against an owned tag set.
    #[must_use]
    pub fn matches_tags(&self, tags: &Tags) -> bool {
        self.matches(tags.iter().map(|(name, value)| (name.as_str(), value.as_str())))
    }

    /// Whether entities of `category` can satisfy this filter at all.
    ///
    /// Some tags are, by mapping convention, only used on nodes (`capital`,
    /// `ele`) or never on nodes (`tracktype`). Nodes enclose no area, so any
    /// area bound skips them too.
    #[must_use]
    pub fn evaluates(&self, category: Category) -> bool {
        let has_any = |names: &[&str]| self.names().any(|name| names.contains(&name));
        match category {
            Category::Node => self.area.is_unbounded() && !has_any(&NON_NODE_TAGS),
            Category::Way | Category::Relation => !has_any(&NODE_ONLY_TAGS),
        }
    }
}

fn parse_area(argument: &str, bound: &str) -> Result<f64, TagFilterError> {
    bound
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|area| area.is_finite())
        .ok_or_else(|| TagFilterError::InvalidWayArea {
            argument: argument.to_owned(),
        })
}
