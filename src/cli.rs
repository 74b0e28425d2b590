//! # Command-Line Interface Module
//!
//! Clap derive definitions for the `digger` binary.
//!
//! ## Commands
//!
//! - `import`: load a JSON library dump into the SQLite library
//! - `dig`: find songs related to a seed song
//! - `expand`: show the search criteria a seed song produces
//! - `text`: run one of the credit-splitting heuristics
//! - `collections`: list playlists, albums, artists, genres or user groupings
//! - `completion`: print a shell completion script
//!
//! ## Examples
//!
//! ```bash
//! digger import ~/library.json
//! digger dig "Night Drive" --depth 2 --genre
//! digger --library ~/library.json expand 1042
//! digger text artists "A feat. B & C"
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Shell types supported for completion generation
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

/// Which heuristic the `text` command runs.
#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
pub enum Heuristic {
    /// Split an artist credit into artists
    Artists,
    /// Split a genre into sub-genres
    Genres,
    /// Remixer credits in a title
    Remixers,
    /// Featured artists in a title
    Featured,
}

/// Collection kinds for the `collections` command.
#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
pub enum CollectionKind {
    Playlist,
    Album,
    Artist,
    Genre,
    Grouping,
}

/// Main application arguments structure.
#[derive(Parser)]
#[command(name = "digger")]
#[command(about = "Digger: find related songs in your music library")]
#[command(version)]
pub struct Args {
    /// SQLite library to read (defaults to the data directory)
    #[arg(long, global = true, env = "DIGGER_DB", conflicts_with = "library", value_hint = clap::ValueHint::FilePath)]
    pub db: Option<PathBuf>,

    /// Read a JSON library dump instead of the SQLite library
    #[arg(long, global = true, value_hint = clap::ValueHint::FilePath)]
    pub library: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Import a JSON library dump into the SQLite library
    ///
    /// The dump holds `songs` and `playlists` arrays. Importing into a
    /// library that already has songs requires --force, which replaces
    /// everything.
    Import {
        /// JSON library file
        #[arg(value_hint = clap::ValueHint::FilePath)]
        path: PathBuf,

        /// Replace an existing library
        #[arg(long)]
        force: bool,
    },

    /// Find songs related to a seed song
    ///
    /// The seed is a song id, or the first song whose title contains the
    /// given text. Results are ranked by how many criteria found them.
    Dig {
        /// Song id or title fragment
        #[arg(value_hint = clap::ValueHint::Other)]
        song: String,

        /// Number of expansion rounds
        #[arg(short, long)]
        depth: Option<usize>,

        /// Also search by genre and user grouping
        #[arg(short, long)]
        genre: bool,

        /// Show at most this many songs
        #[arg(short, long)]
        limit: Option<usize>,

        /// Show scores and the criteria that matched
        #[arg(short, long)]
        verbose: bool,
    },

    /// Show the search criteria derived from a song
    Expand {
        /// Song id or title fragment
        #[arg(value_hint = clap::ValueHint::Other)]
        song: String,

        /// Include genre and user grouping criteria
        #[arg(short, long)]
        genre: bool,
    },

    /// Run a credit-splitting heuristic on some text
    Text {
        #[arg(value_enum)]
        heuristic: Heuristic,

        /// Text to analyse
        input: String,
    },

    /// List playlists, albums, artists, genres or user groupings
    Collections {
        #[arg(value_enum)]
        kind: CollectionKind,
    },

    /// Generate shell completions
    Completion {
        #[arg(value_enum)]
        shell: Shell,
    },
}
