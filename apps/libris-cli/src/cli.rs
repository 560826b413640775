//! Command line arguments.
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use libris_core::types::{Filters, SearchMode};

/// libris - catalog search with keyword, full-text and semantic fallback
#[derive(Parser, Debug)]
#[command(name = "libris", author, version, about, long_about = None)]
pub struct Cli {
    /// Catalog file or directory (defaults to `data.catalog_path`)
    #[arg(long, global = true, env = "LIBRIS_CATALOG")]
    pub catalog: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build the text index and the vector table from the catalog
    Index {
        /// Only read the first N catalog files of a directory
        #[arg(long)]
        limit_files: Option<usize>,
    },
    /// Compute missing embeddings and rewrite the catalog file
    Embed {
        /// Regenerate embeddings for every published entry
        #[arg(long)]
        all: bool,
    },
    /// Run a search through the strategy chain
    Search(SearchArgs),
    /// Title, author and tag suggestions for a prefix
    Suggest { query: String },
}

#[derive(clap::Args, Debug)]
pub struct SearchArgs {
    pub query: String,

    #[arg(long, value_enum, default_value_t = CliMode::Auto)]
    pub mode: CliMode,

    #[arg(long)]
    pub limit: Option<usize>,

    #[arg(long, default_value_t = 0)]
    pub offset: usize,

    /// Restrict to a category (repeatable, any-of)
    #[arg(long = "category")]
    pub categories: Vec<String>,

    #[arg(long)]
    pub language: Option<String>,

    #[arg(long)]
    pub year: Option<i32>,

    #[arg(long)]
    pub file_type: Option<String>,

    /// Include unpublished entries
    #[arg(long)]
    pub include_unpublished: bool,

    /// Print the response as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CliMode {
    Auto,
    Semantic,
    /// Alias of semantic
    Vector,
    /// Alias of semantic
    Ai,
}

impl From<CliMode> for SearchMode {
    fn from(mode: CliMode) -> Self {
        match mode {
            CliMode::Auto => SearchMode::Auto,
            CliMode::Semantic | CliMode::Vector | CliMode::Ai => SearchMode::Semantic,
        }
    }
}

impl SearchArgs {
    pub fn filters(&self) -> Filters {
        Filters {
            categories: self.categories.clone(),
            language: self.language.clone(),
            year: self.year,
            file_type: self.file_type.clone(),
            published_only: !self.include_unpublished,
        }
    }
}
