//! Text heuristics for credit strings.
//!
//! Library metadata crams several people into one field ("A feat. B",
//! "X & Y (Z)") and hides remixers inside titles ("Song (DJ Foo Remix)").
//! These functions pull the individual names back out so each one can
//! become its own search criterion.
//!
//! Every function returns trimmed, non-empty fragments in the order they
//! appear, with later duplicates dropped.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;
use std::hash::Hash;

/// Multi-character separators between collaborating artists.
/// Applied in this order, before the single-character ones.
const ARTIST_SEPARATORS: [&str; 5] = [" x ", " X ", " from ", " feat. ", " Feat. "];

const ARTIST_DELIMITERS: [char; 5] = [',', '&', '/', '・', '×'];

const PARENTHESES: [char; 2] = ['(', ')'];

lazy_static! {
    /// `<names> Remix)` style credits, terminated by `)`, `]` or `-`.
    static ref REMIXERS_PATTERN: Regex = Regex::new(
        r"(?i)(?P<remixers>[^(\[-]*) (?:Remix|Refix|Re-fix|Rework|Bootleg|Boot)\s*[)\]-]"
    )
    .expect("remixers pattern is valid");

    /// `feat. <names>` style credits, running up to the next bracket.
    /// The keyword must start a word, so "afeat. b" is not a credit.
    static ref FEATURED_PATTERN: Regex = Regex::new(
        r"(?i)\b(?:feat\.?|featuring|ft\.?|prod\.)\s+(?P<featured>[^()\[\]]*)"
    )
    .expect("featured artists pattern is valid");
}

/// Order-preserving deduplication: keeps the first occurrence of each item.
pub fn unique<T, I>(items: I) -> Vec<T>
where
    T: Eq + Hash + Clone,
    I: IntoIterator<Item = T>,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

/// Trim, drop empties, dedupe.
fn clean_fragments<'a>(fragments: impl Iterator<Item = &'a str>) -> Vec<String> {
    unique(
        fragments
            .map(str::trim)
            .filter(|fragment| !fragment.is_empty())
            .map(str::to_owned),
    )
}

/// Split an artist credit into the individual artists it names.
///
/// ```
/// use digger::text::split_into_sub_artists;
///
/// assert_eq!(split_into_sub_artists("a (b), c (d) from x"), ["a", "b", "c", "d", "x"]);
/// assert_eq!(split_into_sub_artists("Solo Artist"), ["Solo Artist"]);
/// ```
#[must_use]
pub fn split_into_sub_artists(s: &str) -> Vec<String> {
    if s.is_empty() {
        return Vec::new();
    }

    let mut parts: Vec<&str> = vec![s];
    for separator in ARTIST_SEPARATORS {
        parts = parts
            .into_iter()
            .flat_map(|part| part.split(separator))
            .collect();
    }

    clean_fragments(
        parts
            .into_iter()
            .flat_map(|part| part.split(PARENTHESES))
            .flat_map(|part| part.split(ARTIST_DELIMITERS)),
    )
}

/// Split a genre into its sub-genres, e.g. `"hoge (fuga / piyo)"`.
#[must_use]
pub fn split_into_sub_genres(s: &str) -> Vec<String> {
    if s.is_empty() {
        return Vec::new();
    }

    clean_fragments(s.split(PARENTHESES).flat_map(|part| part.split('/')))
}

/// Names credited for a remix, rework or bootleg inside a title.
///
/// ```
/// use digger::text::extract_remixers_credit;
///
/// assert_eq!(extract_remixers_credit("hoge (DJ Nantoka Remix)"), ["DJ Nantoka"]);
/// ```
#[must_use]
pub fn extract_remixers_credit(s: &str) -> Vec<String> {
    clean_fragments(
        REMIXERS_PATTERN
            .captures_iter(s)
            .filter_map(|caps| caps.name("remixers"))
            .map(|m| m.as_str()),
    )
}

/// Names following `feat.`, `ft.`, `featuring` or `Prod.` inside a title.
#[must_use]
pub fn extract_featured_artists(s: &str) -> Vec<String> {
    clean_fragments(
        FEATURED_PATTERN
            .captures_iter(s)
            .filter_map(|caps| caps.name("featured"))
            .map(|m| m.as_str()),
    )
}
