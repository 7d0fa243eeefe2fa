//! Ingredient normalizer — reference dictionary of canonical ingredient names
//!
//! The dictionary maps each standard ingredient name to the spellings users
//! and the lookup endpoint actually produce. It is loaded once per session
//! and read-only afterwards.
//!
//! # Wire format
//!
//! ```json
//! { "zutaten": [ { "standard": "Banane", "eingabe": ["banane", "bananen"] } ] }
//! ```
//!
//! # Guarantees
//!
//! - **Case/trim-insensitive**: `" Banane "` and `"banane"` match the same entry
//! - **First entry wins**: an input listed under two entries maps to the earlier one
//! - **Never fails the caller**: a missing dictionary rejects every token for
//!   validity and passes every token through canonicalization unchanged

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::{Error, Result};

// ── Types ──────────────────────────────────────────────────

/// One canonical ingredient and its accepted spellings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceEntry {
    #[serde(rename = "standard")]
    pub standard_form: String,
    #[serde(rename = "eingabe")]
    pub accepted_inputs: Vec<String>,
}

#[derive(Deserialize)]
struct RawDictionary {
    zutaten: Vec<ReferenceEntry>,
}

/// Ordered, immutable list of reference entries
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceDictionary {
    entries: Vec<ReferenceEntry>,
    // match key -> index of the first entry accepting it
    index: HashMap<String, usize>,
}

/// Comparison key for tokens and accepted inputs
fn match_key(text: &str) -> String {
    text.trim().to_lowercase()
}

impl ReferenceDictionary {
    /// Build a dictionary, dropping entries that accept no input at all
    pub fn new(entries: Vec<ReferenceEntry>) -> Self {
        let entries: Vec<ReferenceEntry> = entries
            .into_iter()
            .filter(|entry| {
                if entry.accepted_inputs.is_empty() {
                    warn!(standard = %entry.standard_form, "dropping dictionary entry without accepted inputs");
                    false
                } else {
                    true
                }
            })
            .collect();

        let mut index = HashMap::new();
        for (position, entry) in entries.iter().enumerate() {
            for input in &entry.accepted_inputs {
                index.entry(match_key(input)).or_insert(position);
            }
        }

        ReferenceDictionary { entries, index }
    }

    /// Parse the `{ "zutaten": [...] }` document
    pub fn from_json(text: &str) -> Result<Self> {
        let raw: RawDictionary =
            serde_json::from_str(text).map_err(|e| Error::Dictionary(e.to_string()))?;
        Ok(Self::new(raw.zutaten))
    }

    /// Read and parse a dictionary file
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Dictionary(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&text)
    }

    pub fn entries(&self) -> &[ReferenceEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether any entry accepts `token`
    pub fn contains(&self, token: &str) -> bool {
        self.index.contains_key(&match_key(token))
    }

    /// Standard form of the first entry accepting `token`
    pub fn standard_form_of(&self, token: &str) -> Option<&str> {
        self.index
            .get(&match_key(token))
            .map(|&position| self.entries[position].standard_form.as_str())
    }
}

// ── Normalizer ─────────────────────────────────────────────

/// Where the reference dictionary is read from
#[derive(Debug, Clone, PartialEq)]
pub enum DictionarySource {
    File(PathBuf),
    Url(String),
}

impl DictionarySource {
    /// `http://` and `https://` locations are fetched, anything else is a path
    pub fn parse(location: &str) -> Self {
        if location.starts_with("http://") || location.starts_with("https://") {
            DictionarySource::Url(location.to_string())
        } else {
            DictionarySource::File(PathBuf::from(location))
        }
    }
}

impl std::fmt::Display for DictionarySource {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            DictionarySource::File(path) => write!(f, "{}", path.display()),
            DictionarySource::Url(url) => write!(f, "{}", url),
        }
    }
}

/// Membership test and canonicalization over a possibly-absent dictionary
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Normalizer {
    dictionary: Option<ReferenceDictionary>,
}

impl Normalizer {
    pub fn new(dictionary: ReferenceDictionary) -> Self {
        Normalizer {
            dictionary: Some(dictionary),
        }
    }

    /// Normalizer whose dictionary never arrived
    pub fn unavailable() -> Self {
        Normalizer { dictionary: None }
    }

    /// Parse dictionary JSON, degrading to unavailable on failure
    pub fn from_json(text: &str) -> Self {
        Self::from_result(ReferenceDictionary::from_json(text), "inline")
    }

    /// Read a dictionary file, degrading to unavailable on failure
    pub fn load_file(path: &Path) -> Self {
        Self::from_result(
            ReferenceDictionary::from_file(path),
            &path.display().to_string(),
        )
    }

    /// Fetch the dictionary from `source`, degrading to unavailable on failure
    #[cfg(feature = "client")]
    pub async fn load(source: &DictionarySource) -> Self {
        match source {
            DictionarySource::File(path) => Self::load_file(path),
            DictionarySource::Url(url) => {
                Self::from_result(fetch_dictionary(url).await, url)
            }
        }
    }

    fn from_result(result: Result<ReferenceDictionary>, origin: &str) -> Self {
        match result {
            Ok(dictionary) => {
                info!(origin, entries = dictionary.len(), "ingredient dictionary loaded");
                Self::new(dictionary)
            }
            Err(e) => {
                error!(origin, error = %e, "ingredient dictionary unavailable");
                Self::unavailable()
            }
        }
    }

    pub fn is_available(&self) -> bool {
        self.dictionary.is_some()
    }

    pub fn dictionary(&self) -> Option<&ReferenceDictionary> {
        self.dictionary.as_ref()
    }

    /// Case- and trim-insensitive membership test; `false` without a dictionary
    pub fn is_valid(&self, token: &str) -> bool {
        self.dictionary
            .as_ref()
            .is_some_and(|dictionary| dictionary.contains(token))
    }

    /// Replace each token by its standard form; unmatched tokens pass through
    ///
    /// Without a dictionary the input is returned unchanged so nothing is
    /// dropped before the dictionary is ready.
    pub fn canonicalize<S: AsRef<str>>(&self, tokens: &[S]) -> Vec<String> {
        tokens
            .iter()
            .map(|token| {
                let token = token.as_ref();
                self.dictionary
                    .as_ref()
                    .and_then(|dictionary| dictionary.standard_form_of(token))
                    .unwrap_or(token)
                    .to_string()
            })
            .collect()
    }
}

#[cfg(feature = "client")]
async fn fetch_dictionary(url: &str) -> Result<ReferenceDictionary> {
    let response = reqwest::get(url).await?.error_for_status()?;
    let text = response.text().await?;
    ReferenceDictionary::from_json(&text)
}
