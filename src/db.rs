//! SQLite-backed library.
//!
//! Holds the same data as a [`Library`] JSON dump in three tables
//! (`songs`, `playlists`, `playlist_items`) and serves it through
//! [`SqliteStore`]. Persistent ids are `u64`; SQLite integers are `i64`, so
//! ids are stored bit-for-bit and converted back on read.

use crate::predicate::{Comparison, PredicateValue, Property};
use crate::song::{MediaType, Song};
use crate::store::{group_songs, CollectionType, Library, MediaStore, SongsCollection};
use anyhow::{bail, Context, Result};
use log::{debug, info, trace};
use rusqlite::{params, Connection, Row};
use std::path::{Path, PathBuf};

const SONG_COLUMNS: &str = "id, title, artist, composer, album_title, album_artist, album_id, \
                            genre, user_grouping, media_type";

#[allow(clippy::cast_possible_wrap)]
const fn to_sql_id(id: u64) -> i64 {
    id as i64
}

#[allow(clippy::cast_sign_loss)]
const fn from_sql_id(id: i64) -> u64 {
    id as u64
}

/// Column a text predicate on `property` reads. `None` for identifier properties.
const fn text_column(property: Property) -> Option<&'static str> {
    match property {
        Property::Artist => Some("artist"),
        Property::Composer => Some("composer"),
        Property::AlbumTitle => Some("album_title"),
        Property::AlbumArtist => Some("album_artist"),
        Property::Genre => Some("genre"),
        Property::UserGrouping => Some("user_grouping"),
        Property::Title => Some("title"),
        Property::AlbumPersistentId => None,
    }
}

/// Open (or create) the database at `db_path`.
///
/// # Errors
///
/// Returns an error if SQLite refuses the connection.
pub fn connect(db_path: &Path) -> Result<Connection> {
    Connection::open(db_path)
        .with_context(|| format!("SQLite connection refused. DB location: {}", db_path.display()))
}

/// Create the tables if they don't exist yet.
///
/// # Errors
///
/// Returns an error if a `CREATE` statement fails.
pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS songs (
            id            INTEGER PRIMARY KEY,
            title         TEXT,
            artist        TEXT,
            composer      TEXT,
            album_title   TEXT,
            album_artist  TEXT,
            album_id      INTEGER,
            genre         TEXT,
            user_grouping TEXT,
            media_type    TEXT NOT NULL DEFAULT 'music'
        );
        CREATE TABLE IF NOT EXISTS playlists (
            id   INTEGER PRIMARY KEY,
            name TEXT NOT NULL
        );
        CREATE TABLE IF NOT EXISTS playlist_items (
            playlist_id INTEGER NOT NULL REFERENCES playlists(id),
            song_id     INTEGER NOT NULL REFERENCES songs(id),
            position    INTEGER NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_songs_album_id ON songs(album_id);
        CREATE INDEX IF NOT EXISTS idx_playlist_items ON playlist_items(playlist_id, position);",
    )
    .context("Failed to create library tables")
}

/// Number of songs in the database.
///
/// # Errors
///
/// Returns an error if the count query fails.
pub fn song_count(conn: &Connection) -> Result<u64> {
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM songs", [], |row| row.get(0))
        .context("Could not count songs")?;
    Ok(u64::try_from(count).unwrap_or_default())
}

/// Write a whole library in one transaction. Returns the number of songs written.
///
/// Refuses to touch a non-empty database unless `force` is set, in which
/// case the old content is replaced.
///
/// # Errors
///
/// Returns an error if the database already holds songs and `force` is not
/// set, or if any statement fails.
pub fn import_library(conn: &mut Connection, library: &Library, force: bool) -> Result<usize> {
    init_schema(conn)?;

    let existing = song_count(conn)?;
    if existing > 0 && !force {
        bail!("Database already contains {existing} songs. Use --force to replace them.");
    }

    let tx = conn.transaction()?;
    if existing > 0 {
        info!("Replacing {existing} existing songs");
        tx.execute_batch("DELETE FROM playlist_items; DELETE FROM playlists; DELETE FROM songs;")
            .context("Failed to clear old library")?;
    }

    {
        let mut stmt = tx.prepare(
            "INSERT OR REPLACE INTO songs (id, title, artist, composer, album_title, album_artist,
                album_id, genre, user_grouping, media_type)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        )?;

        for song in &library.songs {
            stmt.execute(params![
                to_sql_id(song.id),
                song.title,
                song.artist,
                song.composer,
                song.album_title,
                song.album_artist,
                song.album_id.map(to_sql_id),
                song.genre,
                song.user_grouping,
                song.media_type.as_str(),
            ])
            .with_context(|| format!("Failed to INSERT song: {song:?}"))?;
        }
    }

    {
        let mut playlist_stmt = tx.prepare("INSERT OR REPLACE INTO playlists (id, name) VALUES (?1, ?2)")?;
        let mut item_stmt = tx.prepare(
            "INSERT INTO playlist_items (playlist_id, song_id, position) VALUES (?1, ?2, ?3)",
        )?;

        for playlist in &library.playlists {
            playlist_stmt
                .execute(params![to_sql_id(playlist.id), playlist.name])
                .with_context(|| format!("Failed to INSERT playlist `{}`", playlist.name))?;

            for (position, song_id) in playlist.song_ids.iter().enumerate() {
                item_stmt.execute(params![
                    to_sql_id(playlist.id),
                    to_sql_id(*song_id),
                    i64::try_from(position).unwrap_or(i64::MAX),
                ])?;
            }
        }
    }

    tx.commit().context("Committing library import failed")?;
    debug!(
        "Imported {} songs and {} playlists",
        library.songs.len(),
        library.playlists.len()
    );
    Ok(library.songs.len())
}

fn song_from_row(row: &Row<'_>) -> rusqlite::Result<Song> {
    let media_type: String = row.get(9)?;
    Ok(Song {
        id: from_sql_id(row.get(0)?),
        title: row.get(1)?,
        artist: row.get(2)?,
        composer: row.get(3)?,
        album_title: row.get(4)?,
        album_artist: row.get(5)?,
        album_id: row.get::<_, Option<i64>>(6)?.map(from_sql_id),
        genre: row.get(7)?,
        user_grouping: row.get(8)?,
        media_type: MediaType::parse(&media_type),
    })
}

fn collect_songs<P: rusqlite::Params>(conn: &Connection, sql: &str, params: P) -> Result<Vec<Song>> {
    let mut stmt = conn
        .prepare(sql)
        .with_context(|| format!("Invalid SQL statement: {sql}"))?;

    let song_iter = stmt
        .query_map(params, song_from_row)
        .context("Cannot query songs.")?;

    let mut songs = Vec::new();
    for song in song_iter {
        songs.push(song.context("Queried song could not be read.")?);
    }
    Ok(songs)
}

/// Every song, in id order.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn retrieve_all_songs(conn: &Connection) -> Result<Vec<Song>> {
    collect_songs(conn, &format!("SELECT {SONG_COLUMNS} FROM songs ORDER BY id"), [])
}

/// [`MediaStore`] over a SQLite library file.
///
/// Each lookup opens its own connection, so lookups can run on any thread.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    db_path: PathBuf,
}

impl SqliteStore {
    /// Store over an existing database. The schema is created if missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialised.
    pub fn open(db_path: &Path) -> Result<Self> {
        let conn = connect(db_path)?;
        init_schema(&conn)?;
        Ok(Self {
            db_path: db_path.to_path_buf(),
        })
    }

    #[must_use]
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    fn playlists(&self, conn: &Connection) -> Result<Vec<SongsCollection>> {
        let mut stmt = conn.prepare("SELECT id, name FROM playlists ORDER BY name")?;
        let playlists = stmt
            .query_map([], |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?)))?
            .collect::<rusqlite::Result<Vec<_>>>()
            .context("Cannot query playlists.")?;

        let items_sql = format!(
            "SELECT {} FROM playlist_items i JOIN songs s ON s.id = i.song_id
             WHERE i.playlist_id = ?1 ORDER BY i.position",
            SONG_COLUMNS
                .split(", ")
                .map(|column| format!("s.{}", column.trim()))
                .collect::<Vec<_>>()
                .join(", ")
        );

        playlists
            .into_iter()
            .map(|(id, name)| {
                let items = collect_songs(conn, &items_sql, [id])?;
                Ok(SongsCollection {
                    id: from_sql_id(id).to_string(),
                    name,
                    kind: CollectionType::Playlist,
                    items,
                })
            })
            .collect()
    }
}

impl MediaStore for SqliteStore {
    fn query_songs(
        &self,
        property: Property,
        value: &PredicateValue,
        comparison: Comparison,
    ) -> Result<Vec<Song>> {
        let conn = connect(&self.db_path)?;
        trace!("SQLite lookup {property} {comparison} {value}");

        match (text_column(property), value) {
            (None, PredicateValue::Identifier(id)) => collect_songs(
                &conn,
                &format!("SELECT {SONG_COLUMNS} FROM songs WHERE album_id = ?1 ORDER BY id"),
                [to_sql_id(*id)],
            ),
            (Some(column), PredicateValue::Text(text)) => {
                let filter = match comparison {
                    Comparison::EqualTo => format!("lower({column}) = lower(?1)"),
                    Comparison::Contains => format!("instr(lower({column}), lower(?1)) > 0"),
                };
                collect_songs(
                    &conn,
                    &format!("SELECT {SONG_COLUMNS} FROM songs WHERE {filter} ORDER BY id"),
                    [text],
                )
            }
            // Value kind doesn't fit the property.
            _ => Ok(Vec::new()),
        }
    }

    fn query_collections(&self, kind: CollectionType) -> Result<Vec<SongsCollection>> {
        let conn = connect(&self.db_path)?;
        match kind {
            CollectionType::Playlist => self.playlists(&conn),
            _ => Ok(group_songs(retrieve_all_songs(&conn)?, kind)),
        }
    }

    fn song_by_id(&self, id: u64) -> Result<Option<Song>> {
        let conn = connect(&self.db_path)?;
        let songs = collect_songs(
            &conn,
            &format!("SELECT {SONG_COLUMNS} FROM songs WHERE id = ?1"),
            [to_sql_id(id)],
        )?;
        Ok(songs.into_iter().next())
    }
}
