// src/antonym/mod.rs
//! Antonym lookup against a frozen lexical database.

pub mod wordnet;

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::{AnalyzerError, Result};

pub use wordnet::WordNet;

/// Read-only antonym source shared across requests.
pub trait AntonymSource: Send + Sync {
    /// First antonym found for `word`, lower-cased, or `None`.
    fn antonym_of(&self, word: &str) -> Option<String>;

    fn name(&self) -> &'static str;
}

/// Plain word → antonym map, e.g. exported from a larger database.
#[derive(Debug, Clone, Default)]
pub struct AntonymTable {
    map: HashMap<String, String>,
}

impl AntonymTable {
    pub fn new<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map = pairs
            .into_iter()
            .map(|(k, v)| (k.into().to_lowercase(), v.into().to_lowercase()))
            .collect();
        Self { map }
    }

    /// Load `{ "good": "bad", ... }` from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)
            .map_err(|e| AnalyzerError::artifact(path.display().to_string(), e))?;
        let map: HashMap<String, String> = serde_json::from_str(&data)
            .map_err(|e| AnalyzerError::artifact(path.display().to_string(), e))?;
        Ok(Self::new(map))
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl AntonymSource for AntonymTable {
    fn antonym_of(&self, word: &str) -> Option<String> {
        self.map.get(word).cloned()
    }

    fn name(&self) -> &'static str {
        "table"
    }
}

/// Never finds an antonym; every negated word gets the marker prefix.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAntonyms;

impl AntonymSource for NoAntonyms {
    fn antonym_of(&self, _word: &str) -> Option<String> {
        None
    }

    fn name(&self) -> &'static str {
        "none"
    }
}
