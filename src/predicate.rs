//! Search criteria against the media library.
//!
//! A [`Predicate`] is one `property <comparison> value` filter. Predicates
//! know how to derive follow-up "search hints" from their own value: an
//! artist credit naming three people hints at each person separately, and
//! at songs whose title or composer mentions them.

use crate::text;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Fragments shorter than this are not promoted to title/composer searches.
const MIN_CROSS_HINT_CHARS: usize = 2;

/// Which song field a predicate filters on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Property {
    Artist,
    Composer,
    AlbumTitle,
    AlbumArtist,
    Genre,
    UserGrouping,
    Title,
    AlbumPersistentId,
}

impl Property {
    /// Stable key used in identifiers and labels.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Artist => "artist",
            Self::Composer => "composer",
            Self::AlbumTitle => "albumTitle",
            Self::AlbumArtist => "albumArtist",
            Self::Genre => "genre",
            Self::UserGrouping => "userGrouping",
            Self::Title => "title",
            Self::AlbumPersistentId => "albumPersistentID",
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// The value a predicate matches against.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredicateValue {
    Text(String),
    Identifier(u64),
}

impl PredicateValue {
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Identifier(_) => None,
        }
    }

    /// Whitespace-only text is blank. Identifiers never are.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Text(text) => text.trim().is_empty(),
            Self::Identifier(_) => false,
        }
    }
}

impl From<&str> for PredicateValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<String> for PredicateValue {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<u64> for PredicateValue {
    fn from(id: u64) -> Self {
        Self::Identifier(id)
    }
}

impl fmt::Display for PredicateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Identifier(id) => write!(f, "#{id}"),
        }
    }
}

/// Exact or substring match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    #[default]
    EqualTo,
    Contains,
}

impl Comparison {
    /// Case-insensitive comparison of a song field against a target.
    #[must_use]
    pub fn matches(self, field: &str, target: &str) -> bool {
        self.matches_lowercase(field, &target.to_lowercase())
    }

    /// [`Comparison::matches`] for a target that is already lowercase,
    /// so scans can lowercase it once rather than once per song.
    #[must_use]
    pub fn matches_lowercase(self, field: &str, lowercase_target: &str) -> bool {
        let field = field.to_lowercase();
        match self {
            Self::EqualTo => field == lowercase_target,
            Self::Contains => field.contains(lowercase_target),
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::EqualTo => "equalTo",
            Self::Contains => "contains",
        })
    }
}

/// One search criterion.
///
/// Identity is `(property, value, comparison)`; the display label is not
/// part of it, so two predicates differing only by label are equal and
/// hash the same.
#[derive(Debug, Clone)]
pub struct Predicate {
    property: Property,
    value: PredicateValue,
    comparison: Comparison,
    label: Option<String>,
}

impl Predicate {
    #[must_use]
    pub fn new(property: Property, value: impl Into<PredicateValue>, comparison: Comparison) -> Self {
        Self {
            property,
            value: value.into(),
            comparison,
            label: None,
        }
    }

    #[must_use]
    pub fn equal_to(property: Property, value: impl Into<PredicateValue>) -> Self {
        Self::new(property, value, Comparison::EqualTo)
    }

    #[must_use]
    pub fn contains(property: Property, value: impl Into<PredicateValue>) -> Self {
        Self::new(property, value, Comparison::Contains)
    }

    /// Same criterion with a display label override.
    #[must_use]
    pub fn with_label(self, label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..self
        }
    }

    #[must_use]
    pub const fn property(&self) -> Property {
        self.property
    }

    #[must_use]
    pub const fn value(&self) -> &PredicateValue {
        &self.value
    }

    #[must_use]
    pub const fn comparison(&self) -> Comparison {
        self.comparison
    }

    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Stable key derived from the identity fields only.
    #[must_use]
    pub fn id(&self) -> String {
        let value = match &self.value {
            PredicateValue::Text(text) => format!("text={text}"),
            PredicateValue::Identifier(id) => format!("id={id}"),
        };
        format!("{}:{}:{value}", self.property, self.comparison)
    }

    /// Label override, else `property: value` for text, else `<unknown>`.
    #[must_use]
    pub fn friendly_label(&self) -> String {
        if let Some(label) = &self.label {
            return label.clone();
        }
        match &self.value {
            PredicateValue::Text(text) => format!("{}: {text}", self.property),
            PredicateValue::Identifier(_) => "<unknown>".to_string(),
        }
    }

    /// Same value, different field and comparison.
    fn retarget(&self, property: Property, comparison: Comparison) -> Self {
        Self::new(property, self.value.clone(), comparison)
    }

    /// Predicates one level deeper than this one.
    ///
    /// - genre: each sub-genre, when the genre names more than one
    /// - artist: each sub-artist when there are several, plus every
    ///   sub-artist of 2+ characters as a title and a composer search
    /// - composer: each sub-artist when there are several, plus every
    ///   sub-artist of 2+ characters as an artist search
    ///
    /// Identifier values and other properties have no hints.
    #[must_use]
    pub fn next_search_hints(&self) -> Vec<Self> {
        match self.property {
            Property::Genre => self.sub_genre_hints(1),
            Property::Artist => {
                let relaxed = self.sub_artist_hints(0, MIN_CROSS_HINT_CHARS);
                let mut hints = self.sub_artist_hints(1, 0);
                hints.extend(
                    relaxed
                        .iter()
                        .map(|hint| hint.retarget(Property::Title, Comparison::Contains)),
                );
                hints.extend(
                    relaxed
                        .iter()
                        .map(|hint| hint.retarget(Property::Composer, hint.comparison)),
                );
                hints
            }
            Property::Composer => {
                let mut hints = self.sub_artist_hints(1, 0);
                hints.extend(
                    self.sub_artist_hints(0, MIN_CROSS_HINT_CHARS)
                        .iter()
                        .map(|hint| hint.retarget(Property::Artist, hint.comparison)),
                );
                hints
            }
            _ => Vec::new(),
        }
    }

    fn sub_genre_hints(&self, required_min_items: usize) -> Vec<Self> {
        let Some(genre) = self.value.as_text() else {
            return Vec::new();
        };
        let fragments = text::split_into_sub_genres(genre);
        self.fragments_to_hints(fragments, required_min_items)
    }

    fn sub_artist_hints(&self, required_min_items: usize, min_chars: usize) -> Vec<Self> {
        let Some(credit) = self.value.as_text() else {
            return Vec::new();
        };
        let fragments = text::split_into_sub_artists(credit)
            .into_iter()
            .filter(|fragment| fragment.chars().count() >= min_chars)
            .collect();
        self.fragments_to_hints(fragments, required_min_items)
    }

    fn fragments_to_hints(&self, fragments: Vec<String>, required_min_items: usize) -> Vec<Self> {
        if fragments.len() <= required_min_items {
            return Vec::new();
        }
        fragments
            .into_iter()
            .map(|fragment| Self::contains(self.property, fragment))
            .collect()
    }
}

impl PartialEq for Predicate {
    fn eq(&self, other: &Self) -> bool {
        self.property == other.property
            && self.value == other.value
            && self.comparison == other.comparison
    }
}

impl Eq for Predicate {}

impl Hash for Predicate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.property.hash(state);
        self.value.hash(state);
        self.comparison.hash(state);
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.friendly_label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn has(hints: &[Predicate], property: Property, value: &str) -> bool {
        hints.contains(&Predicate::contains(property, value))
    }

    #[test]
    fn test_identity_ignores_label() {
        let plain = Predicate::contains(Property::Artist, "Foo");
        let labelled = Predicate::contains(Property::Artist, "Foo").with_label("Artist Foo");

        assert_eq!(plain, labelled);
        assert_eq!(plain.id(), labelled.id());

        let set: HashSet<Predicate> = [plain, labelled].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_identity_distinguishes_fields() {
        let base = Predicate::contains(Property::Artist, "Foo");

        assert_ne!(base, Predicate::equal_to(Property::Artist, "Foo"));
        assert_ne!(base, Predicate::contains(Property::Composer, "Foo"));
        assert_ne!(base, Predicate::contains(Property::Artist, "foo"));
        assert_ne!(base.id(), Predicate::equal_to(Property::Artist, "Foo").id());
        assert_ne!(
            Predicate::equal_to(Property::AlbumPersistentId, 42u64).id(),
            Predicate::equal_to(Property::AlbumPersistentId, "42").id()
        );
    }

    #[test]
    fn test_friendly_label() {
        assert_eq!(
            Predicate::contains(Property::Genre, "House").friendly_label(),
            "genre: House"
        );
        assert_eq!(
            Predicate::contains(Property::Genre, "House")
                .with_label("More House")
                .friendly_label(),
            "More House"
        );
        assert_eq!(
            Predicate::equal_to(Property::AlbumPersistentId, 7u64).friendly_label(),
            "<unknown>"
        );
    }

    #[test]
    fn test_comparison_matches_case_insensitively() {
        assert!(Comparison::EqualTo.matches("Foo Bar", "foo bar"));
        assert!(!Comparison::EqualTo.matches("Foo Bar", "foo"));
        assert!(Comparison::Contains.matches("Foo Bar", "BAR"));
        assert!(!Comparison::Contains.matches("Foo", "Bar"));
    }

    #[test]
    fn test_lowercase_target_is_taken_as_is() {
        assert!(Comparison::EqualTo.matches_lowercase("Foo Bar", "foo bar"));
        assert!(Comparison::Contains.matches_lowercase("DJ FOO", "foo"));
        // Only the field is folded here.
        assert!(!Comparison::Contains.matches_lowercase("foo", "FOO"));
    }

    #[test]
    fn test_genre_hints() {
        let hints = Predicate::contains(Property::Genre, "hoge (fuga / piyo)").next_search_hints();
        assert_eq!(
            hints,
            vec![
                Predicate::contains(Property::Genre, "hoge"),
                Predicate::contains(Property::Genre, "fuga"),
                Predicate::contains(Property::Genre, "piyo"),
            ]
        );

        // A single genre has nothing to split.
        assert!(Predicate::contains(Property::Genre, "Techno").next_search_hints().is_empty());
    }

    #[test]
    fn test_artist_hints_fan_out_to_title_and_composer() {
        let hints = Predicate::equal_to(Property::Artist, "Alpha feat. Beta").next_search_hints();

        assert!(has(&hints, Property::Artist, "Alpha"));
        assert!(has(&hints, Property::Artist, "Beta"));
        assert!(has(&hints, Property::Title, "Alpha"));
        assert!(has(&hints, Property::Title, "Beta"));
        assert!(has(&hints, Property::Composer, "Alpha"));
        assert!(has(&hints, Property::Composer, "Beta"));
        assert_eq!(hints.len(), 6);
    }

    #[test]
    fn test_single_artist_still_hints_title_and_composer() {
        let hints = Predicate::contains(Property::Artist, "Solo").next_search_hints();
        assert_eq!(
            hints,
            vec![
                Predicate::contains(Property::Title, "Solo"),
                Predicate::contains(Property::Composer, "Solo"),
            ]
        );
    }

    #[test]
    fn test_short_fragments_not_promoted_across_properties() {
        let hints = Predicate::contains(Property::Artist, "A feat. B").next_search_hints();
        // Split into artists regardless of length...
        assert_eq!(
            hints,
            vec![
                Predicate::contains(Property::Artist, "A"),
                Predicate::contains(Property::Artist, "B"),
            ]
        );

        // ...but only the long fragment is promoted.
        let hints = Predicate::contains(Property::Artist, "A & Bee").next_search_hints();
        assert!(has(&hints, Property::Artist, "A"));
        assert!(has(&hints, Property::Title, "Bee"));
        assert!(!has(&hints, Property::Title, "A"));
        assert!(!has(&hints, Property::Composer, "A"));
    }

    #[test]
    fn test_composer_hints_swap_roles() {
        let hints = Predicate::contains(Property::Composer, "Kay / Ell").next_search_hints();
        assert_eq!(
            hints,
            vec![
                Predicate::contains(Property::Composer, "Kay"),
                Predicate::contains(Property::Composer, "Ell"),
                Predicate::contains(Property::Artist, "Kay"),
                Predicate::contains(Property::Artist, "Ell"),
            ]
        );
    }

    #[test]
    fn test_no_hints_for_identifiers_or_other_properties() {
        assert!(Predicate::equal_to(Property::AlbumPersistentId, 1u64)
            .next_search_hints()
            .is_empty());
        assert!(Predicate::equal_to(Property::Artist, 1u64)
            .next_search_hints()
            .is_empty());
        assert!(Predicate::equal_to(Property::AlbumTitle, "A / B")
            .next_search_hints()
            .is_empty());
    }

    #[test]
    fn test_blank_values() {
        assert!(PredicateValue::from("   ").is_blank());
        assert!(PredicateValue::from("").is_blank());
        assert!(!PredicateValue::from("x").is_blank());
        assert!(!PredicateValue::from(0u64).is_blank());
    }
}
