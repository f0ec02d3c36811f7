//! CLI module - Command-line interface for planetstream
//!
//! This module provides a structured CLI using clap for argument parsing.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::*;

/// planetstream - streaming catalogue backend
/// Storefront API and admin back office for movies, series, anime and manga
#[derive(Parser)]
#[command(name = "planetstream")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP API
    #[command(alias = "daemon")]
    Serve,

    /// Create default config file
    Init,

    /// List managed titles
    #[command(alias = "ls", alias = "l")]
    List {
        /// Only pinned titles
        #[arg(long)]
        pinned: bool,
    },

    /// Search TMDB and MyAnimeList
    #[command(alias = "s")]
    Search {
        /// Search query
        #[arg(required = true)]
        query: Vec<String>,
    },

    /// Import a title from TMDB or MyAnimeList
    Import {
        /// Provider: "tmdb" or "mal"
        source: String,
        /// Provider id
        id: String,
        /// TMDB kind ("movie" or "tv")
        #[arg(long, default_value = "movie")]
        kind: String,
        /// Save the draft as a managed title
        #[arg(long)]
        save: bool,
    },

    /// Remove a managed title
    #[command(alias = "rm", alias = "r")]
    Remove {
        /// Title id or TMDB id
        id: String,
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },

    /// Pin or unpin a managed title
    Pin {
        /// Title id or TMDB id
        id: String,
    },

    /// Show the release planning board
    #[command(alias = "p")]
    Planning {
        /// TOUS, ANIMES, FILMS, VOSTFR or VF
        #[arg(default_value = "TOUS")]
        filter: String,
        /// Weeks from the current one
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        week: i64,
        /// Title filter
        #[arg(long)]
        search: Option<String>,
    },

    /// Show how ad zones resolve
    Ads {
        /// Single zone to render as HTML
        zone: Option<String>,
        /// Resolve for the mobile layout
        #[arg(long)]
        mobile: bool,
    },

    /// Export every document as one JSON file
    Export {
        /// Output file, stdout when omitted
        output: Option<PathBuf>,
    },

    /// Restore documents from an export file
    Restore {
        /// Export file
        input: PathBuf,
    },

    /// Hash a password for `admin.password_hash`
    HashPassword {
        /// Password, read from stdin when omitted
        password: Option<String>,
    },
}
