//! API Index Service
//!
//! Owns the loader and the current snapshot slot. Each instance is
//! independent, so several documents can be held in one process.
//!
//! A load builds a complete [`Snapshot`] off to the side and installs it
//! with a single swap. Queries take one `Arc` clone at the start and answer
//! from it, so a concurrent reload never mixes two document versions inside
//! one query.

use crate::error::{IndexError, Result};
use crate::loader::{DocumentLoader, LoaderConfig};
use crate::snapshot::Snapshot;
use crate::views::{ApiDetail, ApiGroup, ApiInfo, ApiSearchResult};
use parking_lot::RwLock;
use serde_json::Value;
use std::sync::Arc;

pub struct ApiIndex {
    loader: DocumentLoader,
    current: RwLock<Option<Arc<Snapshot>>>,
}

impl ApiIndex {
    pub fn new(loader: DocumentLoader) -> Self {
        Self {
            loader,
            current: RwLock::new(None),
        }
    }

    pub fn with_config(config: &LoaderConfig) -> Result<Self> {
        Ok(Self::new(DocumentLoader::new(config)?))
    }

    /// Load `source` and make it the current snapshot. On failure the
    /// previous snapshot stays in place.
    pub async fn load(&self, source: &str) -> Result<Arc<Snapshot>> {
        let snapshot = self.loader.load(source).await?;
        Ok(self.install(snapshot))
    }

    /// Load an already fetched document and make it current.
    pub async fn load_value(&self, raw: Value) -> Result<Arc<Snapshot>> {
        let snapshot = self.loader.load_value(raw, None).await?;
        Ok(self.install(snapshot))
    }

    /// Replace the current snapshot.
    pub fn install(&self, snapshot: Snapshot) -> Arc<Snapshot> {
        let snapshot = Arc::new(snapshot);
        *self.current.write() = Some(Arc::clone(&snapshot));
        snapshot
    }

    /// The current snapshot, if any load has succeeded.
    pub fn snapshot(&self) -> Option<Arc<Snapshot>> {
        self.current.read().clone()
    }

    pub fn is_loaded(&self) -> bool {
        self.current.read().is_some()
    }

    fn require(&self) -> Result<Arc<Snapshot>> {
        self.snapshot().ok_or(IndexError::NotLoaded)
    }

    pub fn list_groups(&self) -> Result<Vec<ApiGroup>> {
        Ok(self.require()?.groups())
    }

    pub fn list_group_apis(&self, group_name: &str) -> Result<Vec<ApiInfo>> {
        self.require()?.group_apis(group_name)
    }

    /// Detail lookup is advisory: no snapshot, unknown path and unknown
    /// method all give `None`.
    pub fn get_detail(&self, path: &str, method: &str) -> Option<ApiDetail> {
        self.snapshot()?.detail(path, method)
    }

    /// Empty when nothing is loaded or nothing matches.
    pub fn search(&self, keyword: &str) -> Vec<ApiSearchResult> {
        self.snapshot()
            .map(|snapshot| snapshot.search(keyword))
            .unwrap_or_default()
    }
}
