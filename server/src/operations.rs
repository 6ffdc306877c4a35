//! Tool Dispatch
//!
//! The four query operations shared by the CLI and the MCP server. Each
//! operation runs against the index's current snapshot and projects the
//! result into the compact tool output shape.

use crate::error::{ToolError, ToolResult};
use apidoc_index::{ApiIndex, ApiSummary};
use serde_json::Value;

pub const LIST_API_GROUPS: &str = "listApiGroups";
pub const LIST_GROUP_APIS: &str = "listGroupApis";
pub const GET_API_DETAIL: &str = "getApiDetail";
pub const SEARCH_APIS: &str = "searchApis";

/// One query request, independent of the surface it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiOperation {
    ListApiGroups,
    ListGroupApis { group_name: String },
    GetApiDetail { path: String, method: String },
    SearchApis { keyword: String },
}

impl ApiOperation {
    /// Build an operation from an MCP tool name and its arguments object.
    pub fn from_tool_call(name: &str, args: &Value) -> ToolResult<Self> {
        match name {
            LIST_API_GROUPS => Ok(Self::ListApiGroups),
            LIST_GROUP_APIS => Ok(Self::ListGroupApis {
                group_name: string_arg(args, "groupName")?,
            }),
            GET_API_DETAIL => Ok(Self::GetApiDetail {
                path: string_arg(args, "path")?,
                method: string_arg(args, "method")?,
            }),
            SEARCH_APIS => Ok(Self::SearchApis {
                keyword: string_arg(args, "keyword")?,
            }),
            other => Err(ToolError::UnknownTool(other.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::ListApiGroups => LIST_API_GROUPS,
            Self::ListGroupApis { .. } => LIST_GROUP_APIS,
            Self::GetApiDetail { .. } => GET_API_DETAIL,
            Self::SearchApis { .. } => SEARCH_APIS,
        }
    }

    /// Run against the current snapshot and return the tool output.
    pub fn execute(&self, index: &ApiIndex) -> ToolResult<Value> {
        tracing::debug!("Executing {}", self.name());

        let value = match self {
            Self::ListApiGroups => {
                let groups: Vec<_> = index.list_groups()?.iter().map(|g| g.summary()).collect();
                serde_json::to_value(groups)?
            }
            Self::ListGroupApis { group_name } => {
                let apis: Vec<ApiSummary> = index
                    .list_group_apis(group_name)?
                    .iter()
                    .map(ApiSummary::from)
                    .collect();
                serde_json::to_value(apis)?
            }
            Self::GetApiDetail { path, method } => {
                let detail =
                    index
                        .get_detail(path, method)
                        .ok_or_else(|| ToolError::ApiNotFound {
                            path: path.clone(),
                            method: method.to_uppercase(),
                        })?;
                serde_json::to_value(detail)?
            }
            Self::SearchApis { keyword } => {
                let hits: Vec<ApiSummary> =
                    index.search(keyword).iter().map(ApiSummary::from).collect();
                serde_json::to_value(hits)?
            }
        };

        Ok(value)
    }
}

fn string_arg(args: &Value, key: &'static str) -> ToolResult<String> {
    args.get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or(ToolError::MissingParameter(key))
}
