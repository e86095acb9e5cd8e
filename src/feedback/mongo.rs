// src/feedback/mongo.rs
//! MongoDB Atlas Data API sink (`POST {base}/action/insertOne`).
//! No retries: feedback is best-effort.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

use super::{FeedbackRecord, FeedbackSink};
use crate::config::FeedbackConfig;

#[derive(Clone)]
pub struct MongoDataApiSink {
    base_url: String,
    api_key: String,
    data_source: String,
    database: String,
    collection: String,
    client: Client,
    timeout: Duration,
}

impl MongoDataApiSink {
    pub fn new(base_url: String, api_key: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            data_source: "Cluster0".to_string(),
            database: "admin1234".to_string(),
            collection: "user_feedback".to_string(),
            client: Client::new(),
            timeout: Duration::from_secs(5),
        }
    }

    pub fn from_config(cfg: &FeedbackConfig) -> Result<Self> {
        let url = cfg
            .url
            .clone()
            .ok_or_else(|| anyhow!("mongo feedback sink needs a url"))?;
        let key = cfg
            .api_key
            .clone()
            .ok_or_else(|| anyhow!("mongo feedback sink needs an api key"))?;
        Ok(Self::new(url, key)
            .with_target(&cfg.data_source, &cfg.database, &cfg.collection)
            .with_timeout(cfg.timeout_secs))
    }

    pub fn with_target(mut self, data_source: &str, database: &str, collection: &str) -> Self {
        self.data_source = data_source.to_string();
        self.database = database.to_string();
        self.collection = collection.to_string();
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/action/insertOne", self.base_url)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InsertOne<'a> {
    data_source: &'a str,
    database: &'a str,
    collection: &'a str,
    document: &'a FeedbackRecord,
}

#[async_trait]
impl FeedbackSink for MongoDataApiSink {
    async fn save(&self, record: &FeedbackRecord) -> Result<()> {
        let body = InsertOne {
            data_source: &self.data_source,
            database: &self.database,
            collection: &self.collection,
            document: record,
        };
        let rsp = self
            .client
            .post(self.endpoint())
            .timeout(self.timeout)
            .header("api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| anyhow!("Data API request failed: {e}"))?;
        rsp.error_for_status_ref()
            .map_err(|e| anyhow!("Data API HTTP error: {e}"))?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "mongo"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_body_shape() {
        let rec = FeedbackRecord::new("t", "Joy", "Sad");
        let body = InsertOne {
            data_source: "Cluster0",
            database: "db",
            collection: "c",
            document: &rec,
        };
        let v = serde_json::to_value(&body).unwrap();
        assert_eq!(v["dataSource"], "Cluster0");
        assert_eq!(v["document"]["Actual"], "Sad");
    }

    #[test]
    fn endpoint_strips_trailing_slash() {
        let s = MongoDataApiSink::new("https://x.invalid/data/v1/".into(), "k".into());
        assert_eq!(s.endpoint(), "https://x.invalid/data/v1/action/insertOne");
    }

    #[tokio::test]
    async fn unreachable_store_is_an_error() {
        let s = MongoDataApiSink::new("http://127.0.0.1:9".into(), "k".into()).with_timeout(1);
        assert!(s.save(&FeedbackRecord::new("t", "Joy", "Sad")).await.is_err());
    }
}
