//! etcd store over the v3 JSON gateway.
//!
//! The gateway speaks the gRPC KV API as JSON, with keys and values carried
//! as base64 strings. Prefix listing uses a `range_end` one past the prefix.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{base_url, http_client, Store};
use crate::core::types::{KvPair, KvPairs};
use crate::error::{StoreError, StoreResult};

/// etcd v3 client.
#[derive(Debug, Clone)]
pub struct Etcd {
    base: String,
    client: Client,
}

#[derive(Serialize)]
struct RangeRequest {
    key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    range_end: Option<String>,
}

#[derive(Serialize)]
struct PutRequest {
    key: String,
    value: String,
}

#[derive(Deserialize)]
struct RangeResponse {
    #[serde(default)]
    kvs: Vec<RangeEntry>,
}

#[derive(Deserialize)]
struct RangeEntry {
    key: String,
    #[serde(default)]
    value: String,
}

impl Etcd {
    pub fn new(endpoint: &str) -> StoreResult<Self> {
        Ok(Self {
            base: base_url(endpoint),
            client: http_client()?,
        })
    }

    fn post<B: Serialize>(&self, path: &str, body: &B) -> StoreResult<String> {
        let url = format!("{}{}", self.base, path);
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .map_err(|e| StoreError::Request {
                endpoint: self.base.clone(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        let body = response.text().unwrap_or_default();
        if !status.is_success() {
            return Err(StoreError::Response(format!("{path}: {status} {body}")));
        }
        Ok(body)
    }

    fn range(&self, request: &RangeRequest) -> StoreResult<KvPairs> {
        let body = self.post("/v3/kv/range", request)?;
        let response: RangeResponse = serde_json::from_str(&body)
            .map_err(|e| StoreError::Response(format!("failed to decode range response: {e}")))?;
        response.kvs.into_iter().map(decode_entry).collect()
    }
}

impl Store for Etcd {
    fn get(&self, key: &str) -> StoreResult<Vec<u8>> {
        let request = RangeRequest {
            key: STANDARD.encode(key),
            range_end: None,
        };
        self.range(&request)?
            .into_iter()
            .next()
            .map(|pair| pair.value)
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }

    fn set(&self, key: &str, value: &[u8]) -> StoreResult<()> {
        let request = PutRequest {
            key: STANDARD.encode(key),
            value: STANDARD.encode(value),
        };
        self.post("/v3/kv/put", &request)?;
        debug!(key, bytes = value.len(), "value written");
        Ok(())
    }

    fn list(&self, prefix: &str) -> StoreResult<KvPairs> {
        let (key, range_end) = prefix_range(prefix.as_bytes());
        let request = RangeRequest {
            key: STANDARD.encode(key),
            range_end: Some(STANDARD.encode(range_end)),
        };
        self.range(&request)
    }
}

fn decode_entry(entry: RangeEntry) -> StoreResult<KvPair> {
    let key = STANDARD
        .decode(entry.key.as_bytes())
        .map_err(|e| StoreError::Response(format!("invalid key encoding: {e}")))?;
    let key = String::from_utf8(key)
        .map_err(|e| StoreError::Response(format!("key is not utf-8: {e}")))?;
    let value = STANDARD
        .decode(entry.value.as_bytes())
        .map_err(|e| StoreError::Response(format!("invalid value for {key}: {e}")))?;
    Ok(KvPair::new(key, value))
}

/// `[key, range_end)` covering every key that starts with `prefix`.
///
/// A `\0` bound means "no bound" to etcd, so an empty prefix (or one made
/// only of `0xff` bytes) lists to the end of the keyspace.
fn prefix_range(prefix: &[u8]) -> (Vec<u8>, Vec<u8>) {
    let start = if prefix.is_empty() {
        vec![0]
    } else {
        prefix.to_vec()
    };

    let mut end = prefix.to_vec();
    while let Some(last) = end.pop() {
        if last < 0xff {
            end.push(last + 1);
            return (start, end);
        }
    }
    (start, vec![0])
}
