//! Relevance scoring for dug-up songs.
//!
//! Every `(song, predicate)` hit is merged into an [`Aggregate`] keyed by song
//! id. A song's score is the sum of the weights of every predicate that found
//! it, so a song reached through the album, the artist and a featured credit
//! outranks one reached through the genre alone.

use crate::predicate::{Predicate, Property};
use crate::song::Song;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Per-property weight of a single match.
///
/// Broad criteria count for less: a shared genre says little on its own.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelevanceWeights {
    pub user_grouping: f64,
    pub genre: f64,
    /// Everything else: artist, composer, album, title.
    pub other: f64,
}

impl Default for RelevanceWeights {
    fn default() -> Self {
        Self {
            user_grouping: 0.5,
            genre: 0.2,
            other: 1.0,
        }
    }
}

impl RelevanceWeights {
    #[must_use]
    pub const fn weight(&self, property: Property) -> f64 {
        match property {
            Property::UserGrouping => self.user_grouping,
            Property::Genre => self.genre,
            _ => self.other,
        }
    }
}

/// A song found by one predicate.
#[derive(Debug, Clone)]
pub struct SongWithPredicate {
    pub song: Song,
    pub predicate: Predicate,
}

/// A song with every predicate that found it.
#[derive(Debug, Clone)]
pub struct ScoredSong {
    pub song: Song,
    /// All matches in arrival order, repeats included.
    pub matched: Vec<Predicate>,
    pub score: f64,
}

/// Matches per weight class.
///
/// Scores are computed from these counts in a fixed order, so two songs
/// matched by the same properties get bit-identical scores whatever order
/// their matches arrived in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct MatchCounts {
    other: u32,
    user_grouping: u32,
    genre: u32,
}

impl MatchCounts {
    fn add(&mut self, property: Property) {
        match property {
            Property::UserGrouping => self.user_grouping += 1,
            Property::Genre => self.genre += 1,
            _ => self.other += 1,
        }
    }

    fn score(self, weights: &RelevanceWeights) -> f64 {
        f64::from(self.other) * weights.other
            + f64::from(self.user_grouping) * weights.user_grouping
            + f64::from(self.genre) * weights.genre
    }
}

/// Sum of weights over `matched`. Independent of the order of `matched`.
#[must_use]
pub fn calculate_score(matched: &[Predicate], weights: &RelevanceWeights) -> f64 {
    let mut counts = MatchCounts::default();
    for predicate in matched {
        counts.add(predicate.property());
    }
    counts.score(weights)
}

#[derive(Debug, Clone)]
struct Entry {
    scored: ScoredSong,
    counts: MatchCounts,
}

/// Running `song id -> ScoredSong` map.
///
/// Merging is insert-or-append per song, so neither the matches kept nor
/// the scores depend on the order hits arrive in.
#[derive(Debug, Clone, Default)]
pub struct Aggregate {
    weights: RelevanceWeights,
    entries: HashMap<u64, Entry>,
}

impl Aggregate {
    #[must_use]
    pub fn new(weights: RelevanceWeights) -> Self {
        Self {
            weights,
            entries: HashMap::new(),
        }
    }

    /// Fold a batch of hits in.
    pub fn merge(&mut self, hits: impl IntoIterator<Item = SongWithPredicate>) {
        for SongWithPredicate { song, predicate } in hits {
            let property = predicate.property();
            let entry = self.entries.entry(song.id).or_insert_with(|| Entry {
                scored: ScoredSong {
                    song,
                    matched: Vec::new(),
                    score: 0.0,
                },
                counts: MatchCounts::default(),
            });
            entry.scored.matched.push(predicate);
            entry.counts.add(property);
            entry.scored.score = entry.counts.score(&self.weights);
        }
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
    pub fn get(&self, song_id: u64) -> Option<&ScoredSong> {
        self.entries.get(&song_id).map(|entry| &entry.scored)
    }

    /// Songs by descending score, ties in random order.
    #[must_use]
    pub fn into_ranked(self) -> Vec<ScoredSong> {
        self.into_ranked_with_rng(&mut rand::thread_rng())
    }

    /// [`Aggregate::into_ranked`] with a caller-provided RNG.
    ///
    /// Shuffles first, then stable-sorts by score: equal scores keep the
    /// shuffled order, everything else is strictly by score.
    #[must_use]
    pub fn into_ranked_with_rng<R: Rng + ?Sized>(self, rng: &mut R) -> Vec<ScoredSong> {
        let mut ranked: Vec<ScoredSong> = self.entries.into_values().map(|entry| entry.scored).collect();
        ranked.shuffle(rng);
        ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        ranked
    }
}
