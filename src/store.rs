//! # Media Store Module
//!
//! The digging engine never reads a library directly. It goes through the
//! [`MediaStore`] trait, which answers two questions: "which songs match this
//! field/value/comparison?" and "which playlists, albums, artists, genres
//! or groupings exist?".
//!
//! Two implementations ship with the crate:
//!
//! - [`MemoryStore`]: a [`Library`] held in memory, usually loaded from a JSON dump
//! - [`crate::db::SqliteStore`]: the same data in a SQLite database
//!
//! Both match text case-insensitively: `EqualTo` compares the whole field,
//! `Contains` looks for a substring. `AlbumPersistentId` compares the song's
//! album identifier against an identifier value.

use crate::predicate::{Comparison, Predicate, PredicateValue, Property};
use crate::song::Song;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

/// Kinds of song collections a store can list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionType {
    Playlist,
    Album,
    Artist,
    Genre,
    UserGrouping,
}

impl CollectionType {
    pub const ALL: [Self; 5] = [
        Self::Playlist,
        Self::Album,
        Self::Artist,
        Self::Genre,
        Self::UserGrouping,
    ];

    /// Song field the collection groups by. `None` for playlists.
    #[must_use]
    pub const fn property(self) -> Option<Property> {
        match self {
            Self::Playlist => None,
            Self::Album => Some(Property::AlbumTitle),
            Self::Artist => Some(Property::Artist),
            Self::Genre => Some(Property::Genre),
            Self::UserGrouping => Some(Property::UserGrouping),
        }
    }
}

/// A named group of songs.
#[derive(Debug, Clone)]
pub struct SongsCollection {
    pub id: String,
    pub name: String,
    pub kind: CollectionType,
    pub items: Vec<Song>,
}

impl SongsCollection {
    /// Exact-match predicate selecting this collection's songs by its
    /// grouping field. Playlists have none.
    #[must_use]
    pub fn filter_predicate(&self) -> Option<Predicate> {
        self.kind
            .property()
            .map(|property| Predicate::equal_to(property, self.name.as_str()))
    }
}

/// The library seen by the digging engine.
///
/// Implementations must be shareable across threads: one dig issues many
/// lookups in parallel.
pub trait MediaStore: Send + Sync {
    /// Songs whose `property` matches `value` under `comparison`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store cannot be read. An empty
    /// match is `Ok(vec![])`, not an error.
    fn query_songs(
        &self,
        property: Property,
        value: &PredicateValue,
        comparison: Comparison,
    ) -> Result<Vec<Song>>;

    /// All collections of the given kind.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store cannot be read.
    fn query_collections(&self, kind: CollectionType) -> Result<Vec<SongsCollection>>;

    /// The song with persistent id `id`, if the store has it.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store cannot be read.
    fn song_by_id(&self, id: u64) -> Result<Option<Song>>;

    /// Shorthand for [`MediaStore::query_songs`] with a predicate's fields.
    ///
    /// # Errors
    ///
    /// Same as [`MediaStore::query_songs`].
    fn query_predicate(&self, predicate: &Predicate) -> Result<Vec<Song>> {
        self.query_songs(predicate.property(), predicate.value(), predicate.comparison())
    }
}

/// One `property <comparison> value` test, with text lowercased up front.
struct SongFilter<'a> {
    property: Property,
    value: &'a PredicateValue,
    comparison: Comparison,
    lowercase_text: Option<String>,
}

impl<'a> SongFilter<'a> {
    fn new(property: Property, value: &'a PredicateValue, comparison: Comparison) -> Self {
        Self {
            property,
            value,
            comparison,
            lowercase_text: value.as_text().map(str::to_lowercase),
        }
    }

    fn matches(&self, song: &Song) -> bool {
        match (self.property, self.value) {
            (Property::AlbumPersistentId, PredicateValue::Identifier(id)) => song.album_id == Some(*id),
            (Property::AlbumPersistentId, PredicateValue::Text(_)) | (_, PredicateValue::Identifier(_)) => {
                false
            }
            (property, PredicateValue::Text(_)) => match (song.field(property), &self.lowercase_text) {
                (Some(field), Some(target)) => self.comparison.matches_lowercase(field, target),
                _ => false,
            },
        }
    }
}

/// Resolve a seed song from user input: a song id, else the first music
/// song whose title contains `query`.
///
/// # Errors
///
/// Propagates store errors.
pub fn find_seed(store: &dyn MediaStore, query: &str) -> Result<Option<Song>> {
    if let Ok(id) = query.trim().parse::<u64>() {
        if let Some(song) = store.song_by_id(id)? {
            return Ok(Some(song));
        }
    }

    Ok(store
        .query_songs(Property::Title, &query.into(), Comparison::Contains)?
        .into_iter()
        .find(Song::is_music))
}

/// Group songs by the field `kind` collects on, sorted by name.
/// Songs with a blank or missing value are left out. Playlists are not
/// derived from song fields, so [`CollectionType::Playlist`] yields nothing.
#[must_use]
pub fn group_songs(songs: impl IntoIterator<Item = Song>, kind: CollectionType) -> Vec<SongsCollection> {
    let Some(property) = kind.property() else {
        return Vec::new();
    };

    let mut groups: BTreeMap<String, Vec<Song>> = BTreeMap::new();
    for song in songs {
        let Some(name) = song.field(property).map(str::to_owned) else {
            continue;
        };
        if name.trim().is_empty() {
            continue;
        }
        groups.entry(name).or_default().push(song);
    }

    groups
        .into_iter()
        .map(|(name, items)| SongsCollection {
            id: name.clone(),
            name,
            kind,
            items,
        })
        .collect()
}

/// A playlist as stored in a library dump.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Playlist {
    pub id: u64,
    pub name: String,
    /// Song ids in playlist order.
    #[serde(default)]
    pub song_ids: Vec<u64>,
}

/// Everything a store knows: songs and playlists.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Library {
    #[serde(default)]
    pub songs: Vec<Song>,
    #[serde(default)]
    pub playlists: Vec<Playlist>,
}

impl Library {
    /// Parse a library from its JSON form.
    ///
    /// # Errors
    ///
    /// Returns an error if `json` is not a valid library document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Invalid library JSON")
    }

    /// Read a library JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_path(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read library file {}", path.display()))?;
        Self::from_json_str(&json)
            .with_context(|| format!("Failed to parse library file {}", path.display()))
    }
}

/// In-memory [`MediaStore`]. Every query scans the whole library.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    library: Library,
}

impl MemoryStore {
    #[must_use]
    pub fn new(library: Library) -> Self {
        Self { library }
    }

    /// Store over songs only, no playlists.
    #[must_use]
    pub fn from_songs(songs: Vec<Song>) -> Self {
        Self::new(Library {
            songs,
            playlists: Vec::new(),
        })
    }

    /// Load a JSON library dump.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        Ok(Self::new(Library::from_path(path)?))
    }

    #[must_use]
    pub fn library(&self) -> &Library {
        &self.library
    }

    fn playlists(&self) -> Vec<SongsCollection> {
        let by_id: HashMap<u64, &Song> = self.library.songs.iter().map(|song| (song.id, song)).collect();

        self.library
            .playlists
            .iter()
            .map(|playlist| SongsCollection {
                id: playlist.id.to_string(),
                name: playlist.name.clone(),
                kind: CollectionType::Playlist,
                items: playlist
                    .song_ids
                    .iter()
                    .filter_map(|id| by_id.get(id).map(|song| (*song).clone()))
                    .collect(),
            })
            .collect()
    }
}

impl MediaStore for MemoryStore {
    fn query_songs(
        &self,
        property: Property,
        value: &PredicateValue,
        comparison: Comparison,
    ) -> Result<Vec<Song>> {
        let filter = SongFilter::new(property, value, comparison);
        Ok(self
            .library
            .songs
            .iter()
            .filter(|song| filter.matches(song))
            .cloned()
            .collect())
    }

    fn query_collections(&self, kind: CollectionType) -> Result<Vec<SongsCollection>> {
        Ok(match kind {
            CollectionType::Playlist => self.playlists(),
            _ => group_songs(self.library.songs.iter().cloned(), kind),
        })
    }

    fn song_by_id(&self, id: u64) -> Result<Option<Song>> {
        Ok(self.library.songs.iter().find(|song| song.id == id).cloned())
    }
}
