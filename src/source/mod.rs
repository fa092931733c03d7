pub mod sample;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use compact_str::CompactString;
use serde::Deserialize;
use thiserror::Error;

use crate::model::Item;

pub use sample::sample_items;

pub type Result<T> = std::result::Result<T, SourceError>;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid item document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("duplicate ticker: {0}")]
    DuplicateTicker(CompactString),
}

/// Accepted document shapes: a bare item array, or a settings file with a
/// `tickers` array next to unrelated keys.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ItemDocument {
    List(Vec<Item>),
    Config { tickers: Vec<Item> },
}

/// Parse items from a JSON document.
pub fn parse_items(text: &str) -> Result<Vec<Item>> {
    let items = match serde_json::from_str::<ItemDocument>(text)? {
        ItemDocument::List(items) => items,
        ItemDocument::Config { tickers } => tickers,
    };

    let mut seen = HashSet::with_capacity(items.len());
    for item in &items {
        if !seen.insert(item.ticker.as_str()) {
            return Err(SourceError::DuplicateTicker(item.ticker.clone()));
        }
    }

    Ok(items)
}

/// Read and parse an item document from disk.
pub fn load_items(path: &Path) -> Result<Vec<Item>> {
    let text = std::fs::read_to_string(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let items = parse_items(&text)?;
    tracing::info!("Loaded {} items from {}", items.len(), path.display());
    Ok(items)
}

/// Parse a `WIDTHxHEIGHT` size such as `1200x800`.
pub fn parse_size(text: &str) -> Option<(u32, u32)> {
    let (w, h) = text.trim().split_once(|c: char| c == 'x' || c == 'X')?;
    Some((w.trim().parse().ok()?, h.trim().parse().ok()?))
}
