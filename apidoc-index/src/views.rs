//! Query Result Records
//!
//! Plain serializable views computed from a snapshot on every query. Field
//! names serialize in camelCase to match the tool output shapes; strings are
//! copied verbatim from the document except for the upper-cased method.

use crate::document::{HttpMethod, Operation, RefOr};
use serde::Serialize;
use serde_json::{Map, Value};

/// One operation as listed inside a group.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiInfo {
    pub path: String,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl ApiInfo {
    pub(crate) fn new(path: &str, method: HttpMethod, operation: &Operation) -> Self {
        Self {
            path: path.to_string(),
            method: method.as_upper().to_string(),
            summary: operation.summary.clone(),
            description: operation.description.clone(),
            tags: operation.tags.clone(),
        }
    }
}

/// A tag and the operations carrying it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiGroup {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub apis: Vec<ApiInfo>,
}

impl ApiGroup {
    pub fn summary(&self) -> ApiGroupSummary {
        ApiGroupSummary {
            name: self.name.clone(),
            description: self.description.clone(),
            api_count: self.apis.len(),
        }
    }
}

/// Group listing entry: `{name, description?, apiCount}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiGroupSummary {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub api_count: usize,
}

/// Full operation detail taken from the dereferenced document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiDetail {
    pub path: String,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<RefOr<Value>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_body: Option<RefOr<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responses: Option<Map<String, Value>>,
}

impl ApiDetail {
    pub(crate) fn new(path: &str, method: HttpMethod, operation: &Operation) -> Self {
        Self {
            path: path.to_string(),
            method: method.as_upper().to_string(),
            summary: operation.summary.clone(),
            description: operation.description.clone(),
            tags: operation.tags.clone(),
            parameters: operation.parameters.clone(),
            request_body: operation.request_body.clone(),
            responses: operation.responses.clone(),
        }
    }
}

/// A search hit with its relevance score.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiSearchResult {
    pub path: String,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    pub score: u32,
}

/// Compact operation entry: `{path, method, summary?, description?}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiSummary {
    pub path: String,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl From<&ApiInfo> for ApiSummary {
    fn from(api: &ApiInfo) -> Self {
        Self {
            path: api.path.clone(),
            method: api.method.clone(),
            summary: api.summary.clone(),
            description: api.description.clone(),
        }
    }
}

impl From<&ApiSearchResult> for ApiSummary {
    fn from(hit: &ApiSearchResult) -> Self {
        Self {
            path: hit.path.clone(),
            method: hit.method.clone(),
            summary: hit.summary.clone(),
            description: hit.description.clone(),
        }
    }
}
