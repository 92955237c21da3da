//! HTTP icon store.
//!
//! Talks to the icon library server:
//! - `GET {base}/api/icons` returns an object of records keyed by id
//! - `POST {base}/api/icons/{id}` upserts one record (JSON body)
//! - `DELETE {base}/api/icons/{id}` removes one record

use std::collections::HashMap;
use std::time::Duration;

use lumen_common::IconId;
use reqwest::{Client, Response, StatusCode};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::record::IconRecord;
use crate::store::{IconStore, StoreError, StoreResult};

/// Timeout for establishing a connection.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(2);

/// Store backed by the icon library HTTP API.
#[derive(Debug, Clone)]
pub struct HttpIconStore {
    client: Client,
    base_url: String,
}

impl HttpIconStore {
    /// Creates a store for the server at `base_url` with a per-request timeout.
    pub fn new(base_url: &str, timeout: Duration) -> StoreResult<Self> {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(timeout)
            .build()?;
        Ok(Self::with_client(base_url, client))
    }

    /// Creates a store using an existing client.
    #[must_use]
    pub fn with_client(base_url: &str, client: Client) -> Self {
        Self {
            client,
            base_url: base_url.trim().trim_end_matches('/').to_string(),
        }
    }

    /// Base URL without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn icons_url(&self) -> String {
        format!("{}/api/icons", self.base_url)
    }

    fn icon_url(&self, id: &IconId) -> String {
        format!("{}/api/icons/{id}", self.base_url)
    }

    /// Reads the body of a successful response, or turns the response into
    /// a status error.
    async fn body_text(response: Response) -> StoreResult<String> {
        let status = response.status();
        let body = response.text().await?;
        if status.is_success() {
            Ok(body)
        } else {
            warn!("Icon store answered {status}: {body}");
            Err(StoreError::Status {
                status: status.as_u16(),
                body,
            })
        }
    }
}

/// Decodes a listing record by record, skipping entries that are not objects.
fn decode_listing(body: &str) -> StoreResult<HashMap<IconId, IconRecord>> {
    let raw: HashMap<String, Value> = serde_json::from_str(body)?;
    let mut records = HashMap::with_capacity(raw.len());
    for (key, value) in raw {
        if !value.is_object() {
            warn!(key = %key, "Skipping malformed icon record");
            continue;
        }
        match serde_json::from_value::<IconRecord>(value) {
            Ok(mut record) => {
                record.normalize_id(&key);
                records.insert(IconId::from_raw(key), record);
            },
            Err(e) => warn!(key = %key, "Skipping undecodable icon record: {e}"),
        }
    }
    Ok(records)
}

/// Picks the stored record out of an upsert response, falling back to the
/// record that was sent when the server only acknowledges.
fn decode_saved(body: &str, sent: &IconRecord) -> IconRecord {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return sent.clone();
    };
    let is_record = value.get("frames").is_some() || value.get("grid").is_some();
    if !is_record {
        return sent.clone();
    }
    match serde_json::from_value::<IconRecord>(value) {
        Ok(mut record) => {
            record.normalize_id(sent.id.as_str());
            record
        },
        Err(_) => sent.clone(),
    }
}

impl IconStore for HttpIconStore {
    fn name(&self) -> &str {
        "http"
    }

    async fn list_all(&self) -> StoreResult<HashMap<IconId, IconRecord>> {
        let url = self.icons_url();
        debug!("GET {url}");
        let response = self.client.get(&url).send().await?;
        let body = Self::body_text(response).await?;
        let records = decode_listing(&body)?;
        info!("Loaded {} icons from {}", records.len(), self.base_url);
        Ok(records)
    }

    async fn save(&self, record: &IconRecord) -> StoreResult<IconRecord> {
        let url = self.icon_url(&record.id);
        debug!("POST {url}");
        let response = self.client.post(&url).json(record).send().await?;
        let body = Self::body_text(response).await?;
        info!(id = %record.id, "Saved icon");
        Ok(decode_saved(&body, record))
    }

    async fn delete(&self, id: &IconId) -> StoreResult<()> {
        let url = self.icon_url(id);
        debug!("DELETE {url}");
        let response = self.client.delete(&url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound(id.clone()));
        }
        Self::body_text(response).await?;
        info!(id = %id, "Deleted icon");
        Ok(())
    }
}
