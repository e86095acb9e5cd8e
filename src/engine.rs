// src/engine.rs
//! Prediction orchestrator.
//!
//! `InferenceContext` owns every frozen artifact (vectorizer, classifier,
//! label table, antonym source) and is built once at startup. It holds no
//! mutable state, so one instance can be shared behind an `Arc` by any number
//! of concurrent callers; each call gets its own negation state.

use anyhow::Context as _;
use metrics::histogram;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::antonym::{AntonymSource, AntonymTable, NoAntonyms, WordNet};
use crate::config::{AppConfig, ArtifactsConfig};
use crate::error::{AnalyzerError, Result};
use crate::lexicon::{sentiment_for, Sentiment, CORRECTION_CHOICES};
use crate::model::{Classifier, DenseNetwork, LabelTable, TfidfVectorizer, Vectorizer};
use crate::normalize::{Normalizer, NormalizerOptions};
use crate::tokenizer::NegationTokenizer;

/// Short SHA-256 prefix used in logs instead of user text.
pub(crate) fn anon_hash(text: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    let digest = hasher.finalize();
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

/// Raw orchestrator output.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    /// Capitalized label, e.g. `Joy`.
    pub emotion: String,
    pub sentiment: Sentiment,
    /// Index-aligned with the label table.
    pub probabilities: Vec<f32>,
}

/// Label → probability pairs in label-table order. Serializes as a JSON
/// object that keeps this order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Probabilities(Vec<(String, f32)>);

impl Probabilities {
    pub fn get(&self, label: &str) -> Option<f32> {
        self.0.iter().find(|(l, _)| l == label).map(|(_, p)| *p)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f32)> {
        self.0.iter().map(|(l, p)| (l.as_str(), *p))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for Probabilities {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (label, p) in &self.0 {
            map.serialize_entry(label, p)?;
        }
        map.end()
    }
}

/// Caller-facing result of `analyze`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    pub emotion: String,
    pub sentiment: Sentiment,
    pub probabilities: Probabilities,
}

/// Index of the largest value; the lowest index wins ties and NaN never wins.
/// Unlike numpy's `argmax`, which returns the first NaN index, NaN slots are
/// skipped; an all-NaN vector yields `None`.
pub fn argmax(values: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &v) in values.iter().enumerate() {
        if v.is_nan() {
            continue;
        }
        match best {
            Some((_, b)) if v <= b => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}

/// First character upper-cased, the rest lower-cased.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

pub struct InferenceContext {
    normalizer: Normalizer,
    tokenizer: NegationTokenizer,
    vectorizer: Box<dyn Vectorizer>,
    classifier: Box<dyn Classifier>,
    labels: LabelTable,
}

impl InferenceContext {
    /// Assemble a context from already-loaded artifacts, checking that their
    /// dimensions line up.
    pub fn new(
        normalizer: Normalizer,
        antonyms: Arc<dyn AntonymSource>,
        vectorizer: Box<dyn Vectorizer>,
        classifier: Box<dyn Classifier>,
        labels: LabelTable,
    ) -> Result<Self> {
        if vectorizer.dim() != classifier.input_dim() {
            return Err(AnalyzerError::artifact(
                "model",
                format!(
                    "vectorizer produces {} features, classifier expects {}",
                    vectorizer.dim(),
                    classifier.input_dim()
                ),
            ));
        }
        if labels.len() != classifier.output_dim() {
            return Err(AnalyzerError::artifact(
                "labels",
                format!(
                    "{} labels for {} classifier outputs",
                    labels.len(),
                    classifier.output_dim()
                ),
            ));
        }
        Ok(Self {
            normalizer,
            tokenizer: NegationTokenizer::new(antonyms),
            vectorizer,
            classifier,
            labels,
        })
    }

    /// Load every artifact named in the config. Any failure is fatal.
    pub fn from_config(cfg: &AppConfig) -> anyhow::Result<Self> {
        Self::from_artifacts(&cfg.artifacts, cfg.normalizer)
    }

    pub fn from_artifacts(
        artifacts: &ArtifactsConfig,
        opts: NormalizerOptions,
    ) -> anyhow::Result<Self> {
        let antonyms = load_antonyms(artifacts)?;
        let vectorizer = TfidfVectorizer::from_json_file(&artifacts.vectorizer)
            .context("loading vectorizer")?;
        let classifier =
            DenseNetwork::from_json_file(&artifacts.model).context("loading classifier")?;
        let labels = LabelTable::from_json_file(&artifacts.labels).context("loading labels")?;

        let ctx = Self::new(
            Normalizer::new(opts),
            antonyms,
            Box::new(vectorizer),
            Box::new(classifier),
            labels,
        )?;
        info!(
            features = ctx.vectorizer.dim(),
            labels = ctx.labels.len(),
            antonyms = ctx.tokenizer.antonym_source().name(),
            "inference context ready"
        );
        Ok(ctx)
    }

    pub fn labels(&self) -> &LabelTable {
        &self.labels
    }

    /// Capitalized labels a user may choose from when correcting a
    /// prediction: the model's labels plus the fixed choices.
    pub fn correction_choices(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for l in self.labels.iter().map(capitalize).chain(CORRECTION_CHOICES.iter().map(|s| s.to_string())) {
            if !out.contains(&l) {
                out.push(l);
            }
        }
        out
    }

    /// Normalize then tokenize; the string handed to the vectorizer.
    pub fn preprocess(&self, text: &str) -> String {
        let normalized = self.normalizer.normalize(text);
        self.tokenizer.clean_text(&normalized)
    }

    pub fn predict_emotion(&self, text: &str) -> Result<Prediction> {
        let started = Instant::now();
        let clean = self.preprocess(text);
        let features = self.vectorizer.vectorize(&clean)?;
        let probabilities = self.classifier.predict(&features)?;

        if probabilities.len() != self.labels.len() {
            return Err(AnalyzerError::Inference(format!(
                "classifier returned {} values for {} labels",
                probabilities.len(),
                self.labels.len()
            )));
        }
        let idx = argmax(&probabilities)
            .ok_or_else(|| AnalyzerError::Inference("no finite probability".to_string()))?;
        let raw = self
            .labels
            .get(idx)
            .ok_or_else(|| AnalyzerError::Inference(format!("label index {idx} out of range")))?;

        let emotion = capitalize(raw);
        let sentiment = sentiment_for(&emotion);

        let ms = started.elapsed().as_secs_f64() * 1000.0;
        histogram!("analyze_duration_ms").record(ms);
        debug!(
            id = %anon_hash(text),
            tokens = clean.split_whitespace().count(),
            %emotion,
            %sentiment,
            ms,
            "prediction"
        );

        Ok(Prediction {
            emotion,
            sentiment,
            probabilities,
        })
    }

    /// Caller-facing analysis. Callers reject empty or whitespace-only text
    /// before calling; this method does not.
    pub fn analyze(&self, text: &str) -> Result<Analysis> {
        let p = self.predict_emotion(text)?;
        let probabilities = Probabilities(
            self.labels
                .iter()
                .map(str::to_string)
                .zip(p.probabilities)
                .collect(),
        );
        Ok(Analysis {
            emotion: p.emotion,
            sentiment: p.sentiment,
            probabilities,
        })
    }
}

fn load_antonyms(artifacts: &ArtifactsConfig) -> anyhow::Result<Arc<dyn AntonymSource>> {
    if let Some(dir) = &artifacts.wordnet_dir {
        let wn = WordNet::open(dir).with_context(|| format!("opening WordNet at {}", dir.display()))?;
        return Ok(Arc::new(wn));
    }
    if let Some(p) = &artifacts.antonyms_json {
        return Ok(Arc::new(load_table(p)?));
    }
    warn!("no antonym database configured; negated words will only get the marker prefix");
    Ok(Arc::new(NoAntonyms))
}

fn load_table(p: &Path) -> anyhow::Result<AntonymTable> {
    AntonymTable::from_json_file(p).with_context(|| format!("loading antonyms from {}", p.display()))
}
