//! # Digger
//!
//! Finds songs related to a seed song by digging through the library's
//! metadata: shared albums, artists, remixers, featured artists, composers
//! and optionally genres and groupings.
//!
//! ## Usage
//!
//! ```bash
//! # Build the SQLite library from a JSON dump
//! digger import ~/library.json
//!
//! # Dig two rounds deep from a song
//! digger dig "Night Drive" --depth 2 --verbose
//!
//! # Work straight from the JSON dump
//! digger --library ~/library.json expand 1042
//! ```

use anyhow::{bail, Result};
use clap::{CommandFactory, Parser};
use digger::config::{self, DigConfig};
use digger::dig::{DiggingResult, Digger};
use digger::store::{self, CollectionType, Library, MediaStore, MemoryStore};
use digger::{cli, completion, db, expand, text};
use log::{debug, info};
use std::path::PathBuf;

fn db_path(args: &cli::Args) -> Result<PathBuf> {
    match &args.db {
        Some(path) => Ok(path.clone()),
        None => config::get_db_path(),
    }
}

/// The store every read-only command works against.
fn open_store(args: &cli::Args) -> Result<Box<dyn MediaStore>> {
    if let Some(path) = &args.library {
        debug!("Reading library dump {}", path.display());
        return Ok(Box::new(MemoryStore::from_json_file(path)?));
    }

    let path = db_path(args)?;
    if !path.exists() {
        bail!(
            "No library at {}. Run `digger import <library.json>` first, or pass --library.",
            path.display()
        );
    }
    debug!("Opening SQLite library {}", path.display());
    Ok(Box::new(db::SqliteStore::open(&path)?))
}

fn resolve_seed(store: &dyn MediaStore, query: &str) -> Result<digger::song::Song> {
    match store::find_seed(store, query)? {
        Some(song) => Ok(song),
        None => bail!("No song matches `{query}'"),
    }
}

fn print_result(result: &DiggingResult, verbose: bool) {
    if verbose {
        println!("🔍 {} criteria searched", result.predicates.len());
        println!("✅ Found {} songs", result.len());
    }

    for (i, scored) in result.ranked.iter().enumerate() {
        if verbose {
            let matched: Vec<String> = scored.matched.iter().map(|p| p.friendly_label()).collect();
            println!(
                "  {}. {} (score: {:.2}) [{}]",
                i + 1,
                scored.song.display_name(),
                scored.score,
                matched.join("; ")
            );
        } else {
            println!("{}", scored.song.display_name());
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let args = cli::Args::parse();

    match &args.command {
        cli::Command::Import { path, force } => {
            let db_path = db_path(&args)?;
            info!("Importing {} into {}", path.display(), db_path.display());
            let library = Library::from_path(path)?;
            let mut conn = db::connect(&db_path)?;
            let imported = db::import_library(&mut conn, &library, *force)?;
            println!("Imported {imported} songs into {}", db_path.display());
        }
        cli::Command::Dig {
            song,
            depth,
            genre,
            limit,
            verbose,
        } => {
            let config = DigConfig::load()?;
            let mut options = config.dig_options();
            if let Some(depth) = depth {
                options.depth = *depth;
            }
            if *genre {
                options.include_genre_and_grouping = true;
            }
            if limit.is_some() {
                options.limit = *limit;
            }

            let store = open_store(&args)?;
            let seed = resolve_seed(store.as_ref(), song)?;
            if *verbose {
                println!("🎵 Digging from {} (id {})", seed.display_name(), seed.id);
            }

            let result = Digger::new(store.as_ref())
                .with_weights(config.weights)
                .dig(&seed, &options);
            print_result(&result, *verbose);
        }
        cli::Command::Expand { song, genre } => {
            let store = open_store(&args)?;
            let seed = resolve_seed(store.as_ref(), song)?;
            for predicate in expand::derive_initial_predicates(&seed, *genre) {
                println!("{} ({})", predicate.friendly_label(), predicate.comparison());
            }
        }
        cli::Command::Text { heuristic, input } => {
            let fragments = match heuristic {
                cli::Heuristic::Artists => text::split_into_sub_artists(input),
                cli::Heuristic::Genres => text::split_into_sub_genres(input),
                cli::Heuristic::Remixers => text::extract_remixers_credit(input),
                cli::Heuristic::Featured => text::extract_featured_artists(input),
            };
            for fragment in fragments {
                println!("{fragment}");
            }
        }
        cli::Command::Collections { kind } => {
            let kind = match kind {
                cli::CollectionKind::Playlist => CollectionType::Playlist,
                cli::CollectionKind::Album => CollectionType::Album,
                cli::CollectionKind::Artist => CollectionType::Artist,
                cli::CollectionKind::Genre => CollectionType::Genre,
                cli::CollectionKind::Grouping => CollectionType::UserGrouping,
            };
            let store = open_store(&args)?;
            for collection in store.query_collections(kind)? {
                println!("{} ({} songs)", collection.name, collection.items.len());
            }
        }
        cli::Command::Completion { shell } => {
            let mut cmd = cli::Args::command();
            completion::generate_completions(completion::shell_to_completion_shell(*shell), &mut cmd);
        }
    }

    Ok(())
}
