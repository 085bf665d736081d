/*!
 * Glossary loading and size limiting.
 *
 * A glossary is a list of forced or hinted source → target term pairs passed
 * to the translation backend with every batch. It is loaded once per command
 * and never changes afterwards.
 */

use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::file_utils::FileManager;

/// One source → target term pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlossaryEntry {
    /// Term in the source language
    #[serde(rename = "src", alias = "Src", alias = "SRC", alias = "source")]
    pub source: String,

    /// Term in the target language
    #[serde(rename = "dst", alias = "Dst", alias = "DST", alias = "target")]
    pub target: String,

    /// Literal substitution when true, translation hint otherwise
    #[serde(default, alias = "Exact", alias = "EXACT")]
    pub exact: bool,
}

impl GlossaryEntry {
    pub fn new(source: impl Into<String>, target: impl Into<String>, exact: bool) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            exact,
        }
    }
}

/// Load a glossary from a JSON array of `{ "src", "dst", "exact" }` objects.
///
/// A missing or unparseable file yields an empty glossary with a warning.
/// Pairs with a blank source or target are dropped.
pub fn load_glossary<P: AsRef<Path>>(path: P) -> Vec<GlossaryEntry> {
    let path = path.as_ref();
    if !FileManager::file_exists(path) {
        warn!("[glossary] File not found: {:?}. Using an empty glossary.", path);
        return Vec::new();
    }

    let content = match FileManager::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            warn!("[glossary] {:#}. Using an empty glossary.", e);
            return Vec::new();
        }
    };

    parse_glossary(&content).unwrap_or_else(|e| {
        warn!("[glossary] Invalid JSON in {:?}: {}. Using an empty glossary.", path, e);
        Vec::new()
    })
}

/// Parse glossary JSON, dropping blank pairs
pub fn parse_glossary(json: &str) -> Result<Vec<GlossaryEntry>, serde_json::Error> {
    let items: Vec<GlossaryEntry> = serde_json::from_str(json)?;
    let entries: Vec<GlossaryEntry> = items
        .into_iter()
        .filter(|e| !e.source.trim().is_empty() && !e.target.trim().is_empty())
        .collect();

    info!("[glossary] Loaded terms: {}", entries.len());
    Ok(entries)
}

/// Bound the glossary to `max_pairs` entries, keeping the first ones in input order
pub fn enforce_limit(entries: Vec<GlossaryEntry>, max_pairs: usize) -> Vec<GlossaryEntry> {
    if entries.len() <= max_pairs {
        return entries;
    }

    let dropped = entries.len() - max_pairs;
    warn!(
        "[glossary] Too many pairs: {} > {}. Dropped {}.",
        entries.len(),
        max_pairs,
        dropped
    );

    let mut entries = entries;
    entries.truncate(max_pairs);
    entries
}
