// src/config/app.rs
use anyhow::{anyhow, bail, Context, Result};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::normalize::NormalizerOptions;

pub const DEFAULT_CONFIG_PATH: &str = "config/analyzer.toml";
pub const DEFAULT_ARTIFACTS_DIR: &str = "demo/artifacts";

pub const ENV_CONFIG_PATH: &str = "ANALYZER_CONFIG_PATH";
pub const ENV_ARTIFACTS_DIR: &str = "ANALYZER_ARTIFACTS_DIR";
pub const ENV_FEEDBACK_BACKEND: &str = "FEEDBACK_BACKEND";
pub const ENV_MONGO_API_KEY: &str = "MONGO_DATA_API_KEY";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub artifacts: ArtifactsConfig,
    #[serde(default)]
    pub normalizer: NormalizerOptions,
    #[serde(default)]
    pub feedback: FeedbackConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArtifactsConfig {
    pub vectorizer: PathBuf,
    pub model: PathBuf,
    pub labels: PathBuf,
    /// WordNet `dict/` directory; takes precedence over `antonyms_json`.
    #[serde(default)]
    pub wordnet_dir: Option<PathBuf>,
    #[serde(default)]
    pub antonyms_json: Option<PathBuf>,
}

impl ArtifactsConfig {
    /// Standard file names inside one directory.
    pub fn in_dir<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        let wordnet = dir.join("wordnet");
        let antonyms = dir.join("antonyms.json");
        Self {
            vectorizer: dir.join("vectorizer.json"),
            model: dir.join("model.json"),
            labels: dir.join("labels.json"),
            wordnet_dir: wordnet.is_dir().then_some(wordnet),
            antonyms_json: antonyms.is_file().then_some(antonyms),
        }
    }
}

impl Default for ArtifactsConfig {
    fn default() -> Self {
        Self::in_dir(DEFAULT_ARTIFACTS_DIR)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackBackend {
    #[default]
    Disabled,
    File,
    Mongo,
}

impl std::str::FromStr for FeedbackBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "disabled" | "off" | "none" => Ok(Self::Disabled),
            "file" | "jsonl" => Ok(Self::File),
            "mongo" | "mongodb" => Ok(Self::Mongo),
            other => Err(anyhow!("unknown feedback backend '{other}'")),
        }
    }
}

fn default_feedback_path() -> PathBuf {
    PathBuf::from("feedback.jsonl")
}
fn default_data_source() -> String {
    "Cluster0".to_string()
}
fn default_database() -> String {
    "admin1234".to_string()
}
fn default_collection() -> String {
    "user_feedback".to_string()
}
fn default_timeout_secs() -> u64 {
    5
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeedbackConfig {
    #[serde(default)]
    pub backend: FeedbackBackend,
    /// JSON-lines file for the `file` backend.
    #[serde(default = "default_feedback_path")]
    pub path: PathBuf,
    /// Data API base URL, e.g. `https://data.mongodb-api.com/app/<id>/endpoint/data/v1`.
    #[serde(default)]
    pub url: Option<String>,
    /// "ENV" means: read from MONGO_DATA_API_KEY
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_data_source")]
    pub data_source: String,
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default = "default_collection")]
    pub collection: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            backend: FeedbackBackend::Disabled,
            path: default_feedback_path(),
            url: None,
            api_key: None,
            data_source: default_data_source(),
            database: default_database(),
            collection: default_collection(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl AppConfig {
    /// Load using env var + fallbacks:
    /// 1) $ANALYZER_CONFIG_PATH (must exist)
    /// 2) config/analyzer.toml
    /// 3) built-in defaults
    ///
    /// Env overrides are applied afterwards.
    pub fn load() -> Result<Self> {
        let mut cfg = match env::var(ENV_CONFIG_PATH) {
            Ok(p) => {
                let pb = PathBuf::from(p);
                if !pb.exists() {
                    bail!("{ENV_CONFIG_PATH} points to non-existent path {}", pb.display());
                }
                Self::load_from_file(&pb)?
            }
            Err(_) => {
                let p = PathBuf::from(DEFAULT_CONFIG_PATH);
                if p.exists() {
                    Self::load_from_file(&p)?
                } else {
                    Self::default()
                }
            }
        };
        cfg.apply_env_overrides()?;
        cfg.resolve_secrets()?;
        Ok(cfg)
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading analyzer config from {}", path.display()))?;
        Self::from_toml_str(&content).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(dir) = env::var(ENV_ARTIFACTS_DIR) {
            if !dir.trim().is_empty() {
                self.artifacts = ArtifactsConfig::in_dir(dir.trim());
            }
        }
        if let Ok(b) = env::var(ENV_FEEDBACK_BACKEND) {
            self.feedback.backend = b.parse()?;
        }
        Ok(())
    }

    fn resolve_secrets(&mut self) -> Result<()> {
        let fb = &mut self.feedback;
        if fb.backend != FeedbackBackend::Mongo {
            return Ok(());
        }
        let wants_env = fb
            .api_key
            .as_deref()
            .map(|k| k.trim().eq_ignore_ascii_case("env"))
            .unwrap_or(true);
        if wants_env {
            let key = env::var(ENV_MONGO_API_KEY)
                .map_err(|_| anyhow!("Missing {ENV_MONGO_API_KEY} env var"))?;
            fb.api_key = Some(key);
        }
        if fb.url.as_deref().map(str::trim).unwrap_or_default().is_empty() {
            bail!("feedback backend 'mongo' requires feedback.url");
        }
        Ok(())
    }
}
