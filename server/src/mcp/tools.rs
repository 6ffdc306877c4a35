//! MCP Tool Definitions

use super::protocol::{PropertySchema, Tool, ToolInputSchema};
use crate::operations::{GET_API_DETAIL, LIST_API_GROUPS, LIST_GROUP_APIS, SEARCH_APIS};
use std::collections::BTreeMap;

/// Get all available tools
pub fn get_all_tools() -> Vec<Tool> {
    vec![
        list_api_groups_tool(),
        list_group_apis_tool(),
        get_api_detail_tool(),
        search_apis_tool(),
    ]
}

// Helper to create property schema
fn string_prop(description: &str) -> PropertySchema {
    PropertySchema {
        property_type: "string".to_string(),
        description: Some(description.to_string()),
    }
}

fn tool(name: &str, description: &str, params: &[(&str, &str)]) -> Tool {
    let properties: BTreeMap<String, PropertySchema> = params
        .iter()
        .map(|(key, desc)| (key.to_string(), string_prop(desc)))
        .collect();
    let required = params.iter().map(|(key, _)| key.to_string()).collect();

    Tool {
        name: name.to_string(),
        description: Some(description.to_string()),
        input_schema: ToolInputSchema {
            schema_type: "object".to_string(),
            properties,
            required,
        },
    }
}

fn list_api_groups_tool() -> Tool {
    tool(LIST_API_GROUPS, "List all available API groups", &[])
}

fn list_group_apis_tool() -> Tool {
    tool(
        LIST_GROUP_APIS,
        "List all APIs in the specified group",
        &[("groupName", "API group name, for example: user, product")],
    )
}

fn get_api_detail_tool() -> Tool {
    tool(
        GET_API_DETAIL,
        "Get detailed information of the specified API",
        &[("path", "API path"), ("method", "HTTP method")],
    )
}

fn search_apis_tool() -> Tool {
    tool(
        SEARCH_APIS,
        "Search APIs by keyword across path, summary, tags and description",
        &[("keyword", "Search keyword")],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_tools_have_object_schemas() {
        let tools = get_all_tools();
        let names: Vec<_> = tools.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["listApiGroups", "listGroupApis", "getApiDetail", "searchApis"]
        );
        assert!(tools.iter().all(|t| t.input_schema.schema_type == "object"));
    }

    #[test]
    fn test_detail_tool_requires_path_and_method() {
        let tool = get_api_detail_tool();
        assert_eq!(tool.input_schema.required, vec!["path", "method"]);

        let json = serde_json::to_value(&tool).unwrap();
        assert_eq!(json["inputSchema"]["properties"]["method"]["type"], "string");
    }

    #[test]
    fn test_no_argument_tool_serializes_empty_properties() {
        let json = serde_json::to_value(list_api_groups_tool()).unwrap();
        assert_eq!(json["inputSchema"]["properties"], serde_json::json!({}));
        assert!(json["inputSchema"].get("required").is_none());
    }
}
