//! Finds songs related to a seed song from library metadata alone.
//!
//! Core modules:
//! - [`text`] - Splitting credit strings into individual names
//! - [`predicate`] - Search criteria and their follow-up hints
//! - [`expand`] - Seed song to search criteria
//! - [`dig`] - The digging engine: fan-out lookups, rounds, ranking
//! - [`algorithm`] - Relevance scoring and tie-shuffled ranking
//! - [`store`] - The [`store::MediaStore`] seam and the in-memory store
//! - [`db`] - SQLite-backed store
//!
//! ### Supporting Modules
//!
//! - [`song`] - Song metadata
//! - [`config`] - Data directory and digging defaults
//! - [`cli`] - Command-line interface definitions with clap integration
//! - [`completion`] - Shell completion generation
//!
//! ## Quick Start Example
//!
//! ```
//! use digger::dig::{DigOptions, Digger};
//! use digger::song::Song;
//! use digger::store::MemoryStore;
//!
//! let song = |id: u64, title: &str, artist: &str| Song {
//!     id,
//!     title: Some(title.to_string()),
//!     artist: Some(artist.to_string()),
//!     ..Song::default()
//! };
//! let store = MemoryStore::from_songs(vec![
//!     song(1, "Night Drive (DJ Foo Remix)", "Main"),
//!     song(2, "Sunrise", "DJ Foo"),
//!     song(3, "Elsewhere", "Nobody"),
//! ]);
//!
//! let result = Digger::new(&store).dig(&song(1, "Night Drive (DJ Foo Remix)", "Main"), &DigOptions::default());
//! let ids: Vec<u64> = result.songs().map(|s| s.id).collect();
//! assert_eq!(ids, vec![2]);
//! ```
//!
//! ## Error Handling
//!
//! Store and configuration functions return `anyhow::Result`. Digging
//! itself never fails: a lookup that errors is logged and counts as no
//! match.

pub mod algorithm;
pub mod cli;
pub mod completion;
pub mod config;
pub mod db;
pub mod dig;
pub mod expand;
pub mod predicate;
pub mod song;
pub mod store;
pub mod text;
