//! # Digging Engine
//!
//! Finds songs related to a seed song:
//!
//! 1. Derive predicates from the seed ([`derive_initial_predicates`])
//! 2. Look every predicate up in the [`MediaStore`], in parallel
//! 3. Optionally repeat from the songs just found, `depth - 1` more times
//! 4. Rank everything found by summed predicate weight, seed removed
//!
//! Rounds run one after another; lookups within a round run concurrently on
//! the rayon pool and are merged only once the whole round is back, so the
//! aggregate is never shared between threads.
//!
//! A failing lookup counts as "no songs" for that predicate. Digging itself
//! cannot fail.

use crate::algorithm::{Aggregate, RelevanceWeights, ScoredSong, SongWithPredicate};
use crate::expand::{derive_initial_predicates, derive_predicates_for_songs};
use crate::predicate::Predicate;
use crate::song::Song;
use crate::store::MediaStore;
use crate::text;
use log::{debug, info, trace, warn};
use rayon::prelude::*;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// How far and how wide to dig.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DigOptions {
    /// Also search by user grouping and genre.
    pub include_genre_and_grouping: bool,
    /// Number of expansion rounds. 0 is treated as 1.
    pub depth: usize,
    /// Keep only the best `limit` songs.
    pub limit: Option<usize>,
}

impl Default for DigOptions {
    fn default() -> Self {
        Self {
            include_genre_and_grouping: false,
            depth: 1,
            limit: None,
        }
    }
}

/// Shared stop signal for a running dig.
///
/// Once raised, pending lookups are skipped and no new round starts; the
/// dig returns whatever it has found so far.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag {
    flag: Arc<AtomicBool>,
}

impl CancelFlag {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Ranked songs plus every predicate that was searched for.
#[derive(Debug, Clone, Default)]
pub struct DiggingResult {
    /// Best match first. Never contains the seed.
    pub ranked: Vec<ScoredSong>,
    /// All predicates issued across rounds, first-seen order, no repeats.
    pub predicates: Vec<Predicate>,
}

impl DiggingResult {
    pub fn songs(&self) -> impl Iterator<Item = &Song> {
        self.ranked.iter().map(|scored| &scored.song)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ranked.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ranked.is_empty()
    }
}

/// The digging engine, bound to one store.
pub struct Digger<'a> {
    store: &'a dyn MediaStore,
    weights: RelevanceWeights,
    cancel: Option<CancelFlag>,
}

impl<'a> Digger<'a> {
    #[must_use]
    pub fn new(store: &'a dyn MediaStore) -> Self {
        Self {
            store,
            weights: RelevanceWeights::default(),
            cancel: None,
        }
    }

    #[must_use]
    pub fn with_weights(mut self, weights: RelevanceWeights) -> Self {
        self.weights = weights;
        self
    }

    #[must_use]
    pub fn with_cancel_flag(mut self, cancel: CancelFlag) -> Self {
        self.cancel = Some(cancel);
        self
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancelFlag::is_cancelled)
    }

    /// Dig for songs related to `seed`.
    #[must_use]
    pub fn dig(&self, seed: &Song, options: &DigOptions) -> DiggingResult {
        let depth = options.depth.max(1);
        let flag = options.include_genre_and_grouping;
        info!(
            "Digging from `{}' (id {}), depth {depth}, genre/grouping: {flag}",
            seed.display_name(),
            seed.id
        );

        let mut aggregate = Aggregate::new(self.weights);
        let mut used: Vec<Predicate> = Vec::new();
        let mut frontier: Vec<Song> = Vec::new();

        for round in 1..=depth {
            if self.is_cancelled() {
                info!("Dig cancelled before round {round}");
                break;
            }

            let predicates = if round == 1 {
                derive_initial_predicates(seed, flag)
            } else {
                derive_predicates_for_songs(&frontier, flag)
            };
            if predicates.is_empty() {
                debug!("Round {round}: nothing left to search for");
                break;
            }

            let hits = self.query_multi_predicates(&predicates);
            debug!(
                "Round {round}: {} predicates, {} hits",
                predicates.len(),
                hits.len()
            );

            frontier = distinct_songs(&hits);
            used.extend(predicates);
            aggregate.merge(hits);
        }

        let mut ranked = aggregate.into_ranked();
        ranked.retain(|scored| scored.song.id != seed.id);
        if let Some(limit) = options.limit {
            ranked.truncate(limit);
        }

        let predicates = text::unique(used);
        info!(
            "Found {} related songs with {} predicates",
            ranked.len(),
            predicates.len()
        );
        DiggingResult { ranked, predicates }
    }

    /// One lookup per predicate, in parallel; all hits once every lookup is back.
    fn query_multi_predicates(&self, predicates: &[Predicate]) -> Vec<SongWithPredicate> {
        let per_predicate: Vec<Vec<SongWithPredicate>> = predicates
            .par_iter()
            .map(|predicate| {
                self.lookup(predicate)
                    .into_iter()
                    .map(|song| SongWithPredicate {
                        song,
                        predicate: predicate.clone(),
                    })
                    .collect()
            })
            .collect();

        per_predicate.into_iter().flatten().collect()
    }

    /// Music songs matching `predicate`. Errors become an empty list.
    fn lookup(&self, predicate: &Predicate) -> Vec<Song> {
        if self.is_cancelled() {
            return Vec::new();
        }

        match self.store.query_predicate(predicate) {
            Ok(songs) => {
                let songs: Vec<Song> = songs.into_iter().filter(Song::is_music).collect();
                trace!("{}: {} songs", predicate.friendly_label(), songs.len());
                songs
            }
            Err(err) => {
                warn!("Lookup for `{}' failed: {err:#}", predicate.friendly_label());
                Vec::new()
            }
        }
    }
}

/// Dig with default weights; see [`Digger::dig`].
#[must_use]
pub fn dig(
    store: &dyn MediaStore,
    seed: &Song,
    include_genre_and_grouping: bool,
    depth: usize,
) -> DiggingResult {
    Digger::new(store).dig(
        seed,
        &DigOptions {
            include_genre_and_grouping,
            depth,
            limit: None,
        },
    )
}

fn distinct_songs(hits: &[SongWithPredicate]) -> Vec<Song> {
    let mut seen = HashSet::new();
    hits.iter()
        .filter(|hit| seen.insert(hit.song.id))
        .map(|hit| hit.song.clone())
        .collect()
}
