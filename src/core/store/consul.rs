//! Consul KV store over the agent's HTTP API.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use reqwest::blocking::{Client, Response};
use reqwest::{Method, StatusCode, Url};
use serde::Deserialize;
use tracing::debug;

use super::{base_url, http_client, Store};
use crate::core::types::{KvPair, KvPairs};
use crate::error::{StoreError, StoreResult};

/// Consul KV client.
#[derive(Debug, Clone)]
pub struct Consul {
    base: String,
    client: Client,
}

#[derive(Deserialize)]
struct KvEntry {
    #[serde(rename = "Key")]
    key: String,
    #[serde(rename = "Value")]
    value: Option<String>,
}

impl Consul {
    pub fn new(endpoint: &str) -> StoreResult<Self> {
        Ok(Self {
            base: base_url(endpoint),
            client: http_client()?,
        })
    }

    /// KV URL for `key`, one percent-encoded path segment per `/` part.
    fn url(&self, key: &str, query: &str) -> StoreResult<Url> {
        let invalid = |reason: String| StoreError::Request {
            endpoint: self.base.clone(),
            reason,
        };

        let mut url = Url::parse(&self.base).map_err(|e| invalid(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| invalid("endpoint cannot be a base URL".to_string()))?
            .pop_if_empty()
            .extend(["v1", "kv"])
            .extend(key.trim_start_matches('/').split('/'));
        url.set_query(Some(query).filter(|q| !q.is_empty()));
        Ok(url)
    }

    fn request(&self, method: Method, url: Url, body: Option<&[u8]>) -> StoreResult<Response> {
        let mut builder = self.client.request(method, url);
        if let Some(body) = body {
            builder = builder.body(body.to_vec());
        }
        builder.send().map_err(|e| StoreError::Request {
            endpoint: self.base.clone(),
            reason: e.to_string(),
        })
    }
}

impl Store for Consul {
    fn get(&self, key: &str) -> StoreResult<Vec<u8>> {
        let response = self.request(Method::GET, self.url(key, "raw")?, None)?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(StoreError::NotFound(key.to_string())),
            status if status.is_success() => response
                .bytes()
                .map(|bytes| bytes.to_vec())
                .map_err(|e| StoreError::Response(format!("read body: {e}"))),
            status => {
                let body = response.text().unwrap_or_default();
                Err(StoreError::Response(format!("get {key}: {status} {body}")))
            }
        }
    }

    fn set(&self, key: &str, value: &[u8]) -> StoreResult<()> {
        let response = self.request(Method::PUT, self.url(key, "")?, Some(value))?;
        let status = response.status();
        let body = response.text().unwrap_or_default();

        if !status.is_success() {
            return Err(StoreError::Response(format!("put {key}: {status} {body}")));
        }
        // consul answers `false` when the write was not applied
        if body.trim() != "true" {
            return Err(StoreError::Response(format!("put {key}: not applied")));
        }

        debug!(key, bytes = value.len(), "value written");
        Ok(())
    }

    fn list(&self, prefix: &str) -> StoreResult<KvPairs> {
        let response = self.request(Method::GET, self.url(prefix, "recurse")?, None)?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(Vec::new()),
            status if status.is_success() => {
                let body = response.text().unwrap_or_default();
                let entries: Vec<KvEntry> = serde_json::from_str(&body).map_err(|e| {
                    StoreError::Response(format!("failed to decode key list: {e}"))
                })?;
                decode_entries(entries)
            }
            status => {
                let body = response.text().unwrap_or_default();
                Err(StoreError::Response(format!(
                    "list {prefix}: {status} {body}"
                )))
            }
        }
    }
}

/// Turn consul's JSON entries into pairs, skipping folder markers.
fn decode_entries(entries: Vec<KvEntry>) -> StoreResult<KvPairs> {
    entries
        .into_iter()
        .filter(|entry| !entry.key.ends_with('/'))
        .map(|entry| {
            let value = match entry.value {
                Some(encoded) => STANDARD.decode(encoded.as_bytes()).map_err(|e| {
                    StoreError::Response(format!("invalid value for {}: {e}", entry.key))
                })?,
                None => Vec::new(),
            };
            Ok(KvPair::new(entry.key, value))
        })
        .collect()
}
