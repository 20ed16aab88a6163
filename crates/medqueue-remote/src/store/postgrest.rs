//! PostgREST-compatible hosted queue table
//!
//! Rows are read and written over the REST interface; change notifications
//! come from the realtime websocket (see `realtime.rs`).

use std::sync::Arc;
use std::time::Duration;

use medqueue_core::prelude::*;
use medqueue_core::{EntryId, EntryPatch, NewQueueEntry, QueueEntry};
use reqwest::{Method, RequestBuilder, Response};
use tokio::sync::mpsc;
use url::Url;

use super::{realtime, ChangeFeed, QueueStore};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Connection settings for a hosted table
#[derive(Debug, Clone)]
pub struct PostgrestConfig {
    pub base_url: Url,
    pub api_key: String,
    pub table: String,
    /// Open the realtime channel on `subscribe`; otherwise the feed is idle
    pub realtime: bool,
}

impl PostgrestConfig {
    pub fn new(
        url: &str,
        api_key: impl Into<String>,
        table: impl Into<String>,
        realtime: bool,
    ) -> Result<Self> {
        let base_url = Url::parse(url)
            .map_err(|e| Error::ConfigInvalid {
                message: format!("remote.url '{url}': {e}"),
            })?;
        Ok(Self {
            base_url,
            api_key: api_key.into(),
            table: table.into(),
            realtime,
        })
    }

    /// `<base>/rest/v1/<table>`
    pub fn table_url(&self) -> String {
        format!(
            "{}/rest/v1/{}",
            self.base_url.as_str().trim_end_matches('/'),
            self.table
        )
    }
}

/// Queue table served by a PostgREST endpoint
#[derive(Debug, Clone)]
pub struct PostgrestStore {
    client: reqwest::Client,
    config: Arc<PostgrestConfig>,
}

impl PostgrestStore {
    pub fn new(config: PostgrestConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &PostgrestConfig {
        &self.config
    }

    fn request(&self, method: Method) -> RequestBuilder {
        self.client
            .request(method, self.config.table_url())
            .header("apikey", &self.config.api_key)
            .bearer_auth(&self.config.api_key)
    }

    fn by_id(&self, method: Method, id: EntryId) -> RequestBuilder {
        self.request(method).query(&[("id", format!("eq.{id}"))])
    }
}

/// Turn a non-2xx response into an error built by `make`
async fn check_status(response: Response, make: fn(String) -> Error) -> Result<Response> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(make(format!("{status}: {body}")))
}

fn read_error(message: String) -> Error {
    Error::remote_read(message)
}

fn write_error(message: String) -> Error {
    Error::remote_write(message)
}

impl QueueStore for PostgrestStore {
    async fn fetch_ordered(&self) -> Result<Vec<QueueEntry>> {
        let response = self
            .request(Method::GET)
            .query(&[("select", "*"), ("order", "created_at.asc")])
            .send()
            .await
            .map_err(|e| Error::remote_read(e.to_string()))?;
        let response = check_status(response, read_error).await?;

        response
            .json::<Vec<QueueEntry>>()
            .await
            .map_err(|e| Error::remote_read(format!("unexpected queue payload: {e}")))
    }

    async fn insert(&self, entry: &NewQueueEntry) -> Result<EntryId> {
        let response = self
            .request(Method::POST)
            .header("Prefer", "return=representation")
            .json(entry)
            .send()
            .await
            .map_err(|e| Error::remote_write(e.to_string()))?;
        let response = check_status(response, write_error).await?;

        let rows: Vec<QueueEntry> = response
            .json()
            .await
            .map_err(|e| Error::remote_write(format!("unexpected insert reply: {e}")))?;
        rows.first()
            .map(|row| row.id)
            .ok_or_else(|| Error::remote_write("insert returned no row"))
    }

    async fn update(&self, id: EntryId, patch: &EntryPatch) -> Result<()> {
        let response = self
            .by_id(Method::PATCH, id)
            .json(patch)
            .send()
            .await
            .map_err(|e| Error::remote_write(e.to_string()))?;
        check_status(response, write_error).await?;
        Ok(())
    }

    async fn delete(&self, id: EntryId) -> Result<()> {
        let response = self
            .by_id(Method::DELETE, id)
            .send()
            .await
            .map_err(|e| Error::remote_write(e.to_string()))?;
        check_status(response, write_error).await?;
        Ok(())
    }

    async fn subscribe(&self) -> Result<ChangeFeed> {
        if !self.config.realtime {
            info!("realtime disabled, queue will only refresh on startup");
            return Ok(ChangeFeed::idle());
        }

        let ws_url = realtime::socket_url(&self.config.base_url, &self.config.api_key)?;
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(realtime::run(
            ws_url,
            self.config.api_key.clone(),
            self.config.table.clone(),
            tx,
        ));
        Ok(ChangeFeed::with_task(rx, task))
    }
}
