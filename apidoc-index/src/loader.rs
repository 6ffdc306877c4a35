//! Document Loader
//!
//! Fetches the root document (HTTP GET or file read), pre-fetches every
//! external document it references, and builds a [`Snapshot`]. A load either
//! yields a complete snapshot or an error; nothing is retried.

use crate::error::LoadError;
use crate::reference::external_locations;
use crate::snapshot::Snapshot;
use crate::source::Location;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;

/// HTTP settings for the loader.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Whole-request timeout for each document fetch
    pub http_timeout: Duration,
    pub user_agent: String,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            http_timeout: Duration::from_secs(30),
            user_agent: concat!("apidoc-index/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Retrieves documents and turns them into snapshots.
#[derive(Debug, Clone)]
pub struct DocumentLoader {
    client: reqwest::Client,
}

impl DocumentLoader {
    pub fn new(config: &LoaderConfig) -> Result<Self, LoadError> {
        let client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(LoadError::Client)?;
        Ok(Self { client })
    }

    /// Load from a URL or filesystem path.
    pub async fn load(&self, source: &str) -> Result<Snapshot, LoadError> {
        let location = Location::parse(source)?;
        tracing::info!("Loading OpenAPI document from {}", location);

        let raw = self.fetch(&location).await?;
        self.load_value(raw, Some(location)).await
    }

    /// Build a snapshot from an already fetched document. Without a
    /// `location`, external references cannot be followed.
    pub async fn load_value(
        &self,
        raw: Value,
        location: Option<Location>,
    ) -> Result<Snapshot, LoadError> {
        let externals = self.fetch_externals(&raw, location.as_ref()).await?;
        let snapshot = Snapshot::build(&raw, location, &externals)?;

        let doc = snapshot.resolved();
        tracing::info!(
            "Loaded \"{}\" (OpenAPI {}): {} paths, {} operations",
            doc.info.title,
            doc.version(),
            doc.paths.len(),
            snapshot.operation_count()
        );
        Ok(snapshot)
    }

    async fn fetch_externals(
        &self,
        raw: &Value,
        root: Option<&Location>,
    ) -> Result<HashMap<Location, Value>, LoadError> {
        let mut documents = HashMap::new();
        let mut pending = external_locations(raw, root)?;

        while let Some(location) = pending.pop() {
            if Some(&location) == root || documents.contains_key(&location) {
                continue;
            }
            tracing::debug!("Fetching referenced document {}", location);
            let value = self.fetch(&location).await?;
            pending.extend(external_locations(&value, Some(&location))?);
            documents.insert(location, value);
        }

        Ok(documents)
    }

    async fn fetch(&self, location: &Location) -> Result<Value, LoadError> {
        let bytes = match location {
            Location::Url(url) => {
                let http_error = |source| LoadError::Http {
                    url: url.to_string(),
                    source,
                };
                let response = self
                    .client
                    .get(url.clone())
                    .send()
                    .await
                    .map_err(http_error)?;
                let status = response.status();
                if !status.is_success() {
                    return Err(LoadError::HttpStatus {
                        url: url.to_string(),
                        status: status.as_u16(),
                    });
                }
                response.bytes().await.map_err(http_error)?.to_vec()
            }
            Location::File(path) => tokio::fs::read(path)
                .await
                .map_err(|source| LoadError::Io {
                    path: path.clone(),
                    source,
                })?,
        };

        serde_json::from_slice(&bytes).map_err(|source| LoadError::Json {
            location: location.to_string(),
            source,
        })
    }
}
