//! Command-line surface
//!
//! `apidoc-mcp <SOURCE> <COMMAND>` runs one query and prints it as JSON, or
//! `apidoc-mcp <SOURCE> serve` speaks MCP over stdio.

use crate::operations::ApiOperation;
use apidoc_index::LoaderConfig;
use clap::{Parser, Subcommand, ValueEnum};
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(name = "apidoc-mcp")]
#[command(about = "Query OpenAPI documents from the command line or over MCP")]
#[command(version)]
pub struct Args {
    /// HTTP timeout in seconds when fetching the document
    #[arg(long, env = "APIDOC_HTTP_TIMEOUT", default_value_t = 30)]
    pub http_timeout: u64,

    /// API document URL (http/https) or local file path
    pub source: String,

    #[command(subcommand)]
    pub command: Command,
}

impl Args {
    pub fn loader_config(&self) -> LoaderConfig {
        LoaderConfig {
            http_timeout: Duration::from_secs(self.http_timeout),
            ..LoaderConfig::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// List all available API groups
    #[command(name = "listApiGroups")]
    ListApiGroups,

    /// List all APIs in the specified group
    #[command(name = "listGroupApis")]
    ListGroupApis {
        #[arg(long = "groupName")]
        group_name: String,
    },

    /// Get detailed information of the specified API
    #[command(name = "getApiDetail")]
    GetApiDetail {
        #[arg(long)]
        path: String,
        #[arg(long)]
        method: String,
    },

    /// Search APIs by keyword
    #[command(name = "searchApis")]
    SearchApis {
        #[arg(long)]
        keyword: String,
    },

    /// Serve the query tools over MCP (stdio)
    Serve {
        /// When to re-read the source document
        #[arg(long, value_enum, env = "APIDOC_RELOAD", default_value_t = ReloadPolicy::PerCall)]
        reload: ReloadPolicy,
    },
}

impl Command {
    /// The one-shot query this command runs; `None` for `serve`.
    pub fn operation(&self) -> Option<ApiOperation> {
        match self {
            Command::ListApiGroups => Some(ApiOperation::ListApiGroups),
            Command::ListGroupApis { group_name } => Some(ApiOperation::ListGroupApis {
                group_name: group_name.clone(),
            }),
            Command::GetApiDetail { path, method } => Some(ApiOperation::GetApiDetail {
                path: path.clone(),
                method: method.clone(),
            }),
            Command::SearchApis { keyword } => Some(ApiOperation::SearchApis {
                keyword: keyword.clone(),
            }),
            Command::Serve { .. } => None,
        }
    }

    /// Log filter used when `RUST_LOG` is not set. One-shot commands stay
    /// quiet so only the result and errors reach the terminal.
    pub fn default_log_filter(&self) -> &'static str {
        match self {
            Command::Serve { .. } => "apidoc_mcp=info,apidoc_index=info",
            _ => "apidoc_mcp=warn,apidoc_index=warn",
        }
    }
}

/// Document reload behaviour of the MCP server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReloadPolicy {
    /// Re-read the source before every tool call
    PerCall,
    /// Load once at startup and serve that snapshot
    Once,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn test_parse_list_group_apis() {
        let args =
            Args::try_parse_from(["apidoc-mcp", "./swagger.json", "listGroupApis", "--groupName", "user"])
                .unwrap();
        assert_eq!(args.source, "./swagger.json");
        assert_eq!(
            args.command.operation(),
            Some(ApiOperation::ListGroupApis {
                group_name: "user".to_string()
            })
        );
    }

    #[test]
    fn test_parse_get_api_detail() {
        let args = Args::try_parse_from([
            "apidoc-mcp",
            "https://api.example.com/swagger.json",
            "getApiDetail",
            "--path",
            "/orders",
            "--method",
            "post",
        ])
        .unwrap();
        assert_eq!(
            args.command,
            Command::GetApiDetail {
                path: "/orders".to_string(),
                method: "post".to_string()
            }
        );
    }

    #[test]
    fn test_parse_serve_defaults_to_per_call() {
        let args = Args::try_parse_from(["apidoc-mcp", "spec.json", "serve"]).unwrap();
        assert_eq!(
            args.command,
            Command::Serve {
                reload: ReloadPolicy::PerCall
            }
        );
        assert!(args.command.operation().is_none());

        let args =
            Args::try_parse_from(["apidoc-mcp", "spec.json", "serve", "--reload", "once"]).unwrap();
        assert_eq!(
            args.command,
            Command::Serve {
                reload: ReloadPolicy::Once
            }
        );
    }

    #[test]
    fn test_http_timeout_flag() {
        let args = Args::try_parse_from([
            "apidoc-mcp",
            "--http-timeout",
            "5",
            "spec.json",
            "listApiGroups",
        ])
        .unwrap();
        assert_eq!(args.loader_config().http_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_missing_command_is_usage_error() {
        let err = Args::try_parse_from(["apidoc-mcp", "spec.json"]).unwrap_err();
        assert_ne!(err.exit_code(), 0);
    }

    #[test]
    fn test_unknown_command_is_rejected() {
        let err = Args::try_parse_from(["apidoc-mcp", "spec.json", "deleteApi"]).unwrap_err();
        assert_ne!(err.exit_code(), 0);
        assert!(err.to_string().contains("deleteApi"));
    }

    #[test]
    fn test_missing_flag_is_rejected() {
        let err = Args::try_parse_from(["apidoc-mcp", "spec.json", "searchApis"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_default_log_filter() {
        let serve = Command::Serve {
            reload: ReloadPolicy::Once,
        };
        assert_eq!(serve.default_log_filter(), "apidoc_mcp=info,apidoc_index=info");
        assert_eq!(
            Command::ListApiGroups.default_log_filter(),
            "apidoc_mcp=warn,apidoc_index=warn"
        );
    }
}
