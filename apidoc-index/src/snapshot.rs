//! Document Snapshot and Queries
//!
//! A snapshot pairs the two decoded forms of one document version:
//!
//! - `resolved`: references left intact, read by group listing and search
//! - `dereferenced`: every `$ref` under `paths` expanded, read by the detail view
//!
//! Both are built together in [`Snapshot::build`] and never change
//! afterwards. Groups, members, details and search hits are recomputed from
//! the snapshot on every call.

use crate::document::{HttpMethod, OpenApiDocument};
use crate::error::{IndexError, LoadError, Result};
use crate::reference::Dereferencer;
use crate::search;
use crate::source::Location;
use crate::views::{ApiDetail, ApiGroup, ApiInfo, ApiSearchResult};
use serde_json::Value;
use std::collections::HashMap;

/// Group that collects operations declaring no tags.
pub const DEFAULT_GROUP: &str = "default";

/// Immutable view of one loaded document.
#[derive(Debug, Clone)]
pub struct Snapshot {
    source: Option<Location>,
    resolved: OpenApiDocument,
    dereferenced: OpenApiDocument,
}

impl Snapshot {
    /// Decode and dereference `raw`. `externals` holds every document the
    /// raw tree references by location, keyed as [`Location::join`] yields.
    pub fn build(
        raw: &Value,
        source: Option<Location>,
        externals: &HashMap<Location, Value>,
    ) -> std::result::Result<Self, LoadError> {
        let resolved = OpenApiDocument::from_value(raw)?;
        let expanded = Dereferencer::new(raw, source.as_ref(), externals).dereference_paths()?;
        let dereferenced = OpenApiDocument::from_value(&expanded)?;

        Ok(Self {
            source,
            resolved,
            dereferenced,
        })
    }

    /// Where the document came from, if it was loaded from a location.
    pub fn source(&self) -> Option<&Location> {
        self.source.as_ref()
    }

    pub fn resolved(&self) -> &OpenApiDocument {
        &self.resolved
    }

    pub fn dereferenced(&self) -> &OpenApiDocument {
        &self.dereferenced
    }

    pub fn operation_count(&self) -> usize {
        self.resolved.operations().count()
    }

    /// Group operations by tag in first-encounter order.
    ///
    /// An operation appears once in every group it is tagged with; untagged
    /// operations go to [`DEFAULT_GROUP`].
    pub fn groups(&self) -> Vec<ApiGroup> {
        let mut groups: Vec<ApiGroup> = Vec::new();
        let mut positions: HashMap<&str, usize> = HashMap::new();

        for (path, item) in self.resolved.paths.iter() {
            if item.is_reference_only() {
                tracing::trace!("Skipping reference path item {}", path);
                continue;
            }

            for (method, operation) in &item.operations {
                let info = ApiInfo::new(path, *method, operation);
                let tags: Vec<&str> = match operation.tag_names() {
                    [] => vec![DEFAULT_GROUP],
                    names => names.iter().map(String::as_str).collect(),
                };

                for tag in tags {
                    let index = *positions.entry(tag).or_insert_with(|| {
                        groups.push(ApiGroup {
                            name: tag.to_string(),
                            description: self.resolved.tag_description(tag).map(str::to_string),
                            apis: Vec::new(),
                        });
                        groups.len() - 1
                    });
                    groups[index].apis.push(info.clone());
                }
            }
        }

        groups
    }

    /// Operations of the group named exactly `name`.
    pub fn group_apis(&self, name: &str) -> Result<Vec<ApiInfo>> {
        self.groups()
            .into_iter()
            .find(|group| group.name == name)
            .map(|group| group.apis)
            .ok_or_else(|| IndexError::GroupNotFound(name.to_string()))
    }

    /// Full detail for one operation, or `None` when the path or method is
    /// not in the document. `method` is matched ignoring case.
    pub fn detail(&self, path: &str, method: &str) -> Option<ApiDetail> {
        let method = HttpMethod::parse(method)?;
        let operation = self.dereferenced.operation(path, method)?;
        Some(ApiDetail::new(path, method, operation))
    }

    /// Keyword search over path, summary, tags and description.
    pub fn search(&self, keyword: &str) -> Vec<ApiSearchResult> {
        search::search(&self.resolved, keyword)
    }
}
