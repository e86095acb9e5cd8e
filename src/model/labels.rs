// src/model/labels.rs
//! Ordered emotion labels, index-aligned with the classifier output.

use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::error::{AnalyzerError, Result};

#[derive(Deserialize)]
#[serde(untagged)]
enum LabelArtifact {
    List(Vec<String>),
    Encoder { classes: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelTable {
    labels: Vec<String>,
}

impl LabelTable {
    /// Non-empty list of distinct labels.
    pub fn new(labels: Vec<String>) -> Result<Self> {
        if labels.is_empty() {
            return Err(AnalyzerError::artifact("labels", "label table is empty"));
        }
        {
            let mut seen = HashSet::new();
            if let Some(dup) = labels.iter().find(|l| !seen.insert(l.as_str())) {
                return Err(AnalyzerError::artifact("labels", format!("duplicate label '{dup}'")));
            }
        }
        Ok(Self { labels })
    }

    /// Either `["anger", ...]` or `{"classes": ["anger", ...]}`.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let label = path.display().to_string();
        let data = fs::read_to_string(path).map_err(|e| AnalyzerError::artifact(&label, e))?;
        let raw: LabelArtifact =
            serde_json::from_str(&data).map_err(|e| AnalyzerError::artifact(&label, e))?;
        let labels = match raw {
            LabelArtifact::List(v) => v,
            LabelArtifact::Encoder { classes } => classes,
        };
        Self::new(labels).map_err(|e| AnalyzerError::artifact(label, e))
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&str> {
        self.labels.get(idx).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_artifact_shapes_load() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.json");
        let b = dir.path().join("b.json");
        fs::write(&a, r#"["anger","joy"]"#).unwrap();
        fs::write(&b, r#"{"classes":["anger","joy"]}"#).unwrap();
        let ta = LabelTable::from_json_file(&a).unwrap();
        assert_eq!(ta, LabelTable::from_json_file(&b).unwrap());
        assert_eq!(ta.get(1), Some("joy"));
        assert_eq!(ta.get(2), None);
    }

    #[test]
    fn rejects_empty_and_duplicates() {
        assert!(LabelTable::new(vec![]).is_err());
        assert!(LabelTable::new(vec!["joy".into(), "joy".into()]).is_err());
    }
}
