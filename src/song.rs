use crate::predicate::Property;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// Kind of library item. Only [`MediaType::Music`] takes part in digging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaType {
    #[default]
    Music,
    Podcast,
    AudioBook,
    MusicVideo,
    Other,
}

impl MediaType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Music => "music",
            Self::Podcast => "podcast",
            Self::AudioBook => "audio_book",
            Self::MusicVideo => "music_video",
            Self::Other => "other",
        }
    }

    /// Unknown names map to [`MediaType::Other`].
    #[must_use]
    pub fn parse(name: &str) -> Self {
        match name {
            "music" => Self::Music,
            "podcast" => Self::Podcast,
            "audio_book" => Self::AudioBook,
            "music_video" => Self::MusicVideo,
            _ => Self::Other,
        }
    }
}

/// Read-only view of a library track.
///
/// Owned by whatever store produced it. Two songs are the same song when
/// their `id`s match, whatever the rest of the metadata says.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Song {
    /// Persistent identifier, stable across queries.
    pub id: u64,
    pub title: Option<String>,
    pub artist: Option<String>,
    pub composer: Option<String>,
    pub album_title: Option<String>,
    pub album_artist: Option<String>,
    /// Persistent identifier of the album.
    pub album_id: Option<u64>,
    pub genre: Option<String>,
    /// Free-form grouping tag set by the user.
    pub user_grouping: Option<String>,
    #[serde(default)]
    pub media_type: MediaType,
}

impl Song {
    /// Text field a predicate on `property` reads.
    /// `None` for missing fields and for [`Property::AlbumPersistentId`].
    #[must_use]
    pub fn field(&self, property: Property) -> Option<&str> {
        match property {
            Property::Artist => self.artist.as_deref(),
            Property::Composer => self.composer.as_deref(),
            Property::AlbumTitle => self.album_title.as_deref(),
            Property::AlbumArtist => self.album_artist.as_deref(),
            Property::Genre => self.genre.as_deref(),
            Property::UserGrouping => self.user_grouping.as_deref(),
            Property::Title => self.title.as_deref(),
            Property::AlbumPersistentId => None,
        }
    }

    #[must_use]
    pub fn is_music(&self) -> bool {
        self.media_type == MediaType::Music
    }

    /// `Artist - Title` for listings.
    #[must_use]
    pub fn display_name(&self) -> String {
        format!(
            "{} - {}",
            self.artist.as_deref().unwrap_or("Unknown"),
            self.title.as_deref().unwrap_or("Unknown")
        )
    }
}

impl PartialEq for Song {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Song {}

impl Hash for Song {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
