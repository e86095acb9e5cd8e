// src/model/tfidf.rs
//! TF-IDF transform with a fixed vocabulary, exported from a fitted
//! scikit-learn `TfidfVectorizer` as JSON.

use regex::Regex;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use super::Vectorizer;
use crate::error::{AnalyzerError, Result};

const DEFAULT_TOKEN_PATTERN: &str = r"(?u)\b\w\w+\b";

fn default_true() -> bool {
    true
}
fn default_token_pattern() -> String {
    DEFAULT_TOKEN_PATTERN.to_string()
}
fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}
fn default_norm() -> Option<Norm> {
    Some(Norm::L2)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    L1,
    L2,
}

#[derive(Debug, Clone, Deserialize)]
struct TfidfArtifact {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f32>,
    #[serde(default = "default_true")]
    lowercase: bool,
    #[serde(default = "default_token_pattern")]
    token_pattern: String,
    #[serde(default = "default_ngram_range")]
    ngram_range: (usize, usize),
    #[serde(default = "default_norm")]
    norm: Option<Norm>,
    #[serde(default)]
    sublinear_tf: bool,
}

#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f32>,
    lowercase: bool,
    token_re: Regex,
    ngram_range: (usize, usize),
    norm: Option<Norm>,
    sublinear_tf: bool,
}

impl TfidfVectorizer {
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let label = path.display().to_string();
        let data = fs::read_to_string(path).map_err(|e| AnalyzerError::artifact(&label, e))?;
        Self::from_json_str(&data).map_err(|e| match e {
            AnalyzerError::ArtifactLoad { reason, .. } => AnalyzerError::artifact(label, reason),
            other => AnalyzerError::artifact(label, other),
        })
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        let a: TfidfArtifact =
            serde_json::from_str(s).map_err(|e| AnalyzerError::artifact("vectorizer", e))?;

        if a.idf.is_empty() {
            return Err(AnalyzerError::artifact("vectorizer", "empty idf vector"));
        }
        if let Some((term, &i)) = a.vocabulary.iter().find(|&(_, &i)| i >= a.idf.len()) {
            return Err(AnalyzerError::artifact(
                "vectorizer",
                format!("term '{term}' has index {i} outside dimension {}", a.idf.len()),
            ));
        }
        let (min_n, max_n) = a.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(AnalyzerError::artifact(
                "vectorizer",
                format!("invalid ngram_range ({min_n}, {max_n})"),
            ));
        }
        let token_re = Regex::new(&a.token_pattern)
            .map_err(|e| AnalyzerError::artifact("vectorizer", e))?;

        Ok(Self {
            vocabulary: a.vocabulary,
            idf: a.idf,
            lowercase: a.lowercase,
            token_re,
            ngram_range: a.ngram_range,
            norm: a.norm,
            sublinear_tf: a.sublinear_tf,
        })
    }

    fn terms(&self, text: &str) -> Vec<String> {
        let text = if self.lowercase {
            text.to_lowercase()
        } else {
            text.to_string()
        };
        let tokens: Vec<&str> = self.token_re.find_iter(&text).map(|m| m.as_str()).collect();

        let (min_n, max_n) = self.ngram_range;
        let mut out = Vec::new();
        for n in min_n..=max_n {
            if n > tokens.len() {
                break;
            }
            for w in tokens.windows(n) {
                out.push(w.join(" "));
            }
        }
        out
    }
}

impl Vectorizer for TfidfVectorizer {
    fn dim(&self) -> usize {
        self.idf.len()
    }

    fn vectorize(&self, text: &str) -> Result<Vec<f32>> {
        let mut v = vec![0.0f32; self.idf.len()];
        for term in self.terms(text) {
            if let Some(&i) = self.vocabulary.get(&term) {
                v[i] += 1.0;
            }
        }

        for (i, x) in v.iter_mut().enumerate() {
            if *x > 0.0 {
                if self.sublinear_tf {
                    *x = 1.0 + x.ln();
                }
                *x *= self.idf[i];
            }
        }

        let norm = match self.norm {
            Some(Norm::L2) => v.iter().map(|x| x * x).sum::<f32>().sqrt(),
            Some(Norm::L1) => v.iter().map(|x| x.abs()).sum::<f32>(),
            None => 0.0,
        };
        if norm > 0.0 {
            v.iter_mut().for_each(|x| *x /= norm);
        }
        Ok(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn counts_times_idf_then_l2() {
        let v = TfidfVectorizer::from_json_str(
            r#"{"vocabulary":{"bad":0,"movie":1,"neg_good":2},"idf":[2.0,1.0,3.0]}"#,
        )
        .unwrap();
        assert_eq!(v.dim(), 3);
        let x = v.vectorize("bad movie movie unknown").unwrap();
        // raw = [2, 2, 0], norm = sqrt(8)
        let n = 8f32.sqrt();
        assert!(approx(x[0], 2.0 / n) && approx(x[1], 2.0 / n) && x[2] == 0.0);

        let y = v.vectorize("neg_good").unwrap();
        assert!(approx(y[2], 1.0));
    }

    #[test]
    fn empty_text_is_zero_vector() {
        let v = TfidfVectorizer::from_json_str(r#"{"vocabulary":{"joy":0},"idf":[1.0]}"#).unwrap();
        assert_eq!(v.vectorize("").unwrap(), vec![0.0]);
    }

    #[test]
    fn bigrams_and_sublinear_tf() {
        let v = TfidfVectorizer::from_json_str(
            r#"{"vocabulary":{"so":0,"so happy":1},"idf":[1.0,1.0],
                "token_pattern":"\\w+","ngram_range":[1,2],"norm":null,"sublinear_tf":true}"#,
        )
        .unwrap();
        let x = v.vectorize("so happy so happy").unwrap();
        assert!(approx(x[0], 1.0 + 2f32.ln()));
        assert!(approx(x[1], 1.0 + 2f32.ln()));
    }

    #[test]
    fn rejects_out_of_range_vocabulary() {
        let err = TfidfVectorizer::from_json_str(r#"{"vocabulary":{"joy":3},"idf":[1.0]}"#);
        assert!(matches!(err, Err(AnalyzerError::ArtifactLoad { .. })));
    }
}
