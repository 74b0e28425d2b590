//! Seed song to search criteria.
//!
//! Reads a song's metadata and turns every useful field into a
//! [`Predicate`], then adds one level of search hints on top.

use crate::predicate::{Predicate, Property};
use crate::song::Song;
use crate::text;
use rayon::prelude::*;

/// Initial predicate set for digging from `song`.
///
/// 1. Remixer and featured-artist credits in the title, as exact artist matches
/// 2. Album title (exact), artist, composer and album artist (substring)
/// 3. With `include_genre_and_grouping`: user grouping and genre (substring)
/// 4. Each of those followed by its [`Predicate::next_search_hints`]
///
/// Blank values are dropped and duplicates removed, keeping first-seen order.
/// A song with no usable metadata yields an empty set.
#[must_use]
pub fn derive_initial_predicates(song: &Song, include_genre_and_grouping: bool) -> Vec<Predicate> {
    let title = song.title.as_deref().unwrap_or_default();

    let mut criteria: Vec<Predicate> = text::extract_remixers_credit(title)
        .into_iter()
        .chain(text::extract_featured_artists(title))
        .map(|name| Predicate::equal_to(Property::Artist, name))
        .collect();

    criteria.extend([
        Predicate::equal_to(Property::AlbumTitle, field(song.album_title.as_deref())),
        Predicate::contains(Property::Artist, field(song.artist.as_deref())),
        Predicate::contains(Property::Composer, field(song.composer.as_deref())),
        Predicate::contains(Property::AlbumArtist, field(song.album_artist.as_deref())),
    ]);

    if include_genre_and_grouping {
        criteria.extend([
            Predicate::contains(Property::UserGrouping, field(song.user_grouping.as_deref())),
            Predicate::contains(Property::Genre, field(song.genre.as_deref())),
        ]);
    }

    text::unique(
        criteria
            .into_iter()
            .flat_map(|predicate| {
                let hints = predicate.next_search_hints();
                std::iter::once(predicate).chain(hints)
            })
            .filter(|predicate| !predicate.value().is_blank()),
    )
}

/// Union of [`derive_initial_predicates`] over `songs`, in song order.
#[must_use]
pub fn derive_predicates_for_songs(songs: &[Song], include_genre_and_grouping: bool) -> Vec<Predicate> {
    let per_song: Vec<Vec<Predicate>> = songs
        .par_iter()
        .map(|song| derive_initial_predicates(song, include_genre_and_grouping))
        .collect();

    text::unique(per_song.into_iter().flatten())
}

fn field(value: Option<&str>) -> &str {
    value.unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predicate::Comparison;

    fn song() -> Song {
        Song {
            id: 1,
            title: Some("Night Drive feat. Guest (DJ Foo Remix)".to_string()),
            artist: Some("Main".to_string()),
            composer: Some("Writer".to_string()),
            album_title: Some("Album".to_string()),
            album_artist: Some("Main".to_string()),
            genre: Some("House / Techno".to_string()),
            user_grouping: Some("Late".to_string()),
            ..Song::default()
        }
    }

    #[test]
    fn test_title_credits_come_first() {
        let predicates = derive_initial_predicates(&song(), false);

        assert_eq!(predicates[0], Predicate::equal_to(Property::Artist, "DJ Foo"));
        // Hints follow the predicate they came from.
        assert_eq!(predicates[1], Predicate::contains(Property::Title, "DJ Foo"));
        assert!(predicates.contains(&Predicate::equal_to(Property::Artist, "Guest")));
    }

    #[test]
    fn test_metadata_fields_become_predicates() {
        let predicates = derive_initial_predicates(&song(), false);

        for expected in [
            Predicate::equal_to(Property::AlbumTitle, "Album"),
            Predicate::contains(Property::Artist, "Main"),
            Predicate::contains(Property::Composer, "Writer"),
            Predicate::contains(Property::AlbumArtist, "Main"),
            Predicate::contains(Property::Title, "Main"),
            Predicate::contains(Property::Artist, "Writer"),
        ] {
            assert!(predicates.contains(&expected), "missing {expected:?}");
        }

        assert!(!predicates
            .iter()
            .any(|p| matches!(p.property(), Property::Genre | Property::UserGrouping)));
    }

    #[test]
    fn test_genre_and_grouping_flag() {
        let predicates = derive_initial_predicates(&song(), true);

        for expected in [
            Predicate::contains(Property::UserGrouping, "Late"),
            Predicate::contains(Property::Genre, "House / Techno"),
            Predicate::contains(Property::Genre, "House"),
            Predicate::contains(Property::Genre, "Techno"),
        ] {
            assert!(predicates.contains(&expected), "missing {expected:?}");
        }
    }

    #[test]
    fn test_no_duplicates_or_blanks() {
        let predicates = derive_initial_predicates(&song(), true);

        assert_eq!(predicates, text::unique(predicates.clone()));
        assert!(predicates.iter().all(|p| !p.value().is_blank()));
        let album_titles = predicates
            .iter()
            .filter(|p| p.property() == Property::AlbumTitle)
            .count();
        assert_eq!(album_titles, 1);
    }

    #[test]
    fn test_empty_metadata_yields_nothing() {
        let empty = Song {
            id: 9,
            artist: Some("   ".to_string()),
            ..Song::default()
        };
        assert!(derive_initial_predicates(&empty, true).is_empty());
    }

    #[test]
    fn test_featured_credit_in_artist_field_is_split() {
        let seed = Song {
            id: 2,
            artist: Some("A feat. B".to_string()),
            ..Song::default()
        };

        // Single-letter names are searched as artists only.
        let predicates = derive_initial_predicates(&seed, false);
        assert_eq!(
            predicates,
            vec![
                Predicate::new(Property::Artist, "A feat. B", Comparison::Contains),
                Predicate::contains(Property::Artist, "A"),
                Predicate::contains(Property::Artist, "B"),
            ]
        );
    }

    #[test]
    fn test_union_over_songs() {
        let first = Song {
            id: 1,
            artist: Some("Shared".to_string()),
            ..Song::default()
        };
        let second = Song {
            id: 2,
            artist: Some("Shared".to_string()),
            album_title: Some("Other".to_string()),
            ..Song::default()
        };

        let union = derive_predicates_for_songs(&[first.clone(), second], false);
        let single = derive_initial_predicates(&first, false);

        assert_eq!(&union[..single.len()], &single[..]);
        assert!(union.contains(&Predicate::equal_to(Property::AlbumTitle, "Other")));
        assert_eq!(union, text::unique(union.clone()));
    }
}
