//! Typed OpenAPI Document Model
//!
//! The raw JSON tree is decoded once at load time into these types so the
//! query engine never re-checks node shapes. Only the parts the queries read
//! are typed; schema, parameter and response bodies stay as
//! [`serde_json::Value`].
//!
//! Map order is the document order (serde_json is built with
//! `preserve_order`), which is what makes group and search output stable.

use crate::error::LoadError;
use serde::de::{self, Deserializer, IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// HTTP methods that may appear as operation keys under a path item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Put,
    Post,
    Delete,
    Options,
    Head,
    Patch,
    Trace,
}

impl HttpMethod {
    pub const ALL: [HttpMethod; 8] = [
        HttpMethod::Get,
        HttpMethod::Put,
        HttpMethod::Post,
        HttpMethod::Delete,
        HttpMethod::Options,
        HttpMethod::Head,
        HttpMethod::Patch,
        HttpMethod::Trace,
    ];

    /// Match a path-item key exactly. Documents spell methods in lower case.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.as_str() == key)
    }

    /// Parse a caller-supplied method name, ignoring case.
    pub fn parse(method: &str) -> Option<Self> {
        Self::from_key(&method.trim().to_lowercase())
    }

    /// Lower-case key as used inside documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Put => "put",
            HttpMethod::Post => "post",
            HttpMethod::Delete => "delete",
            HttpMethod::Options => "options",
            HttpMethod::Head => "head",
            HttpMethod::Patch => "patch",
            HttpMethod::Trace => "trace",
        }
    }

    /// Upper-case name as returned to callers.
    pub fn as_upper(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Put => "PUT",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Head => "HEAD",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Trace => "TRACE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_upper())
    }
}

/// A `{"$ref": "..."}` node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reference {
    #[serde(rename = "$ref")]
    pub reference: String,
}

/// Either a reference node or an inline value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RefOr<T> {
    Ref(Reference),
    Item(T),
}

impl<T> RefOr<T> {
    pub fn is_ref(&self) -> bool {
        matches!(self, RefOr::Ref(_))
    }
}

/// Document `info` block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Info {
    pub title: String,
    pub version: String,
    pub description: Option<String>,
}

/// Entry of the top-level `tags` declaration list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagDeclaration {
    pub name: String,
    pub description: Option<String>,
}

/// One HTTP operation under a path item.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    pub tags: Option<Vec<String>>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub parameters: Option<Vec<RefOr<Value>>>,
    pub request_body: Option<RefOr<Value>>,
    pub responses: Option<Map<String, Value>>,
}

impl Operation {
    /// Tags carried by the operation, empty when none are declared.
    pub fn tag_names(&self) -> &[String] {
        self.tags.as_deref().unwrap_or(&[])
    }
}

/// A path item: an optional `$ref` plus its operations in document order.
///
/// Keys other than the eight HTTP methods (`$ref`, `parameters`, `servers`,
/// `summary`, extensions) never produce operations.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PathItem {
    pub reference: Option<String>,
    pub operations: Vec<(HttpMethod, Operation)>,
}

impl PathItem {
    pub fn operation(&self, method: HttpMethod) -> Option<&Operation> {
        self.operations
            .iter()
            .find(|(m, _)| *m == method)
            .map(|(_, op)| op)
    }

    /// A path item that is only a pointer to another definition.
    pub fn is_reference_only(&self) -> bool {
        self.reference.is_some() && self.operations.is_empty()
    }
}

impl<'de> Deserialize<'de> for PathItem {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PathItemVisitor;

        impl<'de> Visitor<'de> for PathItemVisitor {
            type Value = PathItem;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a path item object")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<PathItem, A::Error> {
                let mut item = PathItem::default();
                while let Some(key) = map.next_key::<String>()? {
                    if key == "$ref" {
                        item.reference = Some(map.next_value()?);
                    } else if let Some(method) = HttpMethod::from_key(&key) {
                        let operation: Operation = map.next_value().map_err(|e| {
                            de::Error::custom(format!("operation `{}`: {}", key, e))
                        })?;
                        item.operations.push((method, operation));
                    } else {
                        map.next_value::<IgnoredAny>()?;
                    }
                }
                Ok(item)
            }
        }

        deserializer.deserialize_map(PathItemVisitor)
    }
}

/// The `paths` object as an ordered list of entries.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Paths(Vec<(String, PathItem)>);

impl Paths {
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PathItem)> {
        self.0.iter().map(|(path, item)| (path.as_str(), item))
    }

    pub fn get(&self, path: &str) -> Option<&PathItem> {
        self.0.iter().find(|(p, _)| p == path).map(|(_, item)| item)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de> Deserialize<'de> for Paths {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PathsVisitor;

        impl<'de> Visitor<'de> for PathsVisitor {
            type Value = Paths;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a paths object")
            }

            fn visit_unit<E: de::Error>(self) -> Result<Paths, E> {
                Ok(Paths::default())
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Paths, A::Error> {
                let mut entries = Vec::new();
                while let Some(path) = map.next_key::<String>()? {
                    // Null path items carry nothing.
                    let item: Option<PathItem> = map
                        .next_value()
                        .map_err(|e| de::Error::custom(format!("path `{}`: {}", path, e)))?;
                    if let Some(item) = item {
                        entries.push((path, item));
                    }
                }
                Ok(Paths(entries))
            }
        }

        deserializer.deserialize_any(PathsVisitor)
    }
}

/// Decoded OpenAPI (3.0/3.1) or Swagger (2.0) document.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OpenApiDocument {
    pub openapi: Option<String>,
    pub swagger: Option<String>,
    pub info: Info,
    #[serde(default)]
    pub tags: Vec<TagDeclaration>,
    #[serde(default)]
    pub paths: Paths,
}

impl OpenApiDocument {
    /// Validate the version marker and decode the typed tree.
    pub fn from_value(raw: &Value) -> Result<Self, LoadError> {
        check_version(raw)?;
        Self::deserialize(raw).map_err(|e| LoadError::InvalidDocument(e.to_string()))
    }

    /// Declared spec version, e.g. `3.0.3` or `2.0`.
    pub fn version(&self) -> &str {
        self.openapi
            .as_deref()
            .or(self.swagger.as_deref())
            .unwrap_or_default()
    }

    /// Description of a top-level tag declaration, matched by exact name.
    pub fn tag_description(&self, name: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|t| t.name == name)
            .and_then(|t| t.description.as_deref())
    }

    /// Every operation in document scan order.
    pub fn operations(&self) -> impl Iterator<Item = (&str, HttpMethod, &Operation)> {
        self.paths.iter().flat_map(|(path, item)| {
            item.operations
                .iter()
                .map(move |(method, op)| (path, *method, op))
        })
    }

    pub fn operation(&self, path: &str, method: HttpMethod) -> Option<&Operation> {
        self.paths.get(path)?.operation(method)
    }
}

fn check_version(raw: &Value) -> Result<(), LoadError> {
    let root = raw
        .as_object()
        .ok_or_else(|| LoadError::InvalidDocument("document root is not an object".to_string()))?;

    match (root.get("openapi"), root.get("swagger")) {
        (Some(Value::String(version)), _) => {
            let mut parts = version.split('.');
            match (parts.next(), parts.next()) {
                (Some("3"), Some("0")) | (Some("3"), Some("1")) => Ok(()),
                _ => Err(LoadError::UnsupportedVersion(version.clone())),
            }
        }
        (None, Some(Value::String(version))) if version == "2.0" => Ok(()),
        (None, Some(Value::String(version))) => Err(LoadError::UnsupportedVersion(version.clone())),
        (Some(other), _) | (None, Some(other)) => Err(LoadError::InvalidDocument(format!(
            "version marker must be a string, got {}",
            other
        ))),
        (None, None) => Err(LoadError::InvalidDocument(
            "not a valid OpenAPI definition: missing `openapi` or `swagger` field".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn minimal(paths: Value) -> Value {
        json!({
            "openapi": "3.0.3",
            "info": {"title": "Test", "version": "1.0.0"},
            "paths": paths
        })
    }

    #[test]
    fn test_http_method_parse_is_case_insensitive() {
        assert_eq!(HttpMethod::parse("POST"), Some(HttpMethod::Post));
        assert_eq!(HttpMethod::parse("Get"), Some(HttpMethod::Get));
        assert_eq!(HttpMethod::parse("fetch"), None);
        assert_eq!(HttpMethod::Delete.to_string(), "DELETE");
    }

    #[test]
    fn test_paths_keep_document_order() {
        let doc = OpenApiDocument::from_value(&minimal(json!({
            "/zeta": {"get": {}},
            "/alpha": {"post": {}, "get": {}},
        })))
        .unwrap();

        let scanned: Vec<_> = doc
            .operations()
            .map(|(path, method, _)| format!("{} {}", method, path))
            .collect();
        assert_eq!(scanned, vec!["GET /zeta", "POST /alpha", "GET /alpha"]);
    }

    #[test]
    fn test_non_method_keys_are_not_operations() {
        let doc = OpenApiDocument::from_value(&minimal(json!({
            "/pets": {
                "summary": "Pets",
                "parameters": [{"name": "x", "in": "query"}],
                "servers": [{"url": "http://localhost"}],
                "x-internal": {"flag": true},
                "get": {"summary": "List"}
            }
        })))
        .unwrap();

        let item = doc.paths.get("/pets").unwrap();
        assert_eq!(item.operations.len(), 1);
        assert_eq!(item.operations[0].0, HttpMethod::Get);
    }

    #[test]
    fn test_reference_only_path_item() {
        let doc = OpenApiDocument::from_value(&minimal(json!({
            "/shared": {"$ref": "#/components/pathItems/Shared"}
        })))
        .unwrap();

        let item = doc.paths.get("/shared").unwrap();
        assert!(item.is_reference_only());
        assert_eq!(doc.operations().count(), 0);
    }

    #[test]
    fn test_null_path_item_is_skipped() {
        let doc = OpenApiDocument::from_value(&minimal(json!({"/gone": null}))).unwrap();
        assert!(doc.paths.is_empty());
    }

    #[test]
    fn test_malformed_operation_is_rejected() {
        let err = OpenApiDocument::from_value(&minimal(json!({"/pets": {"get": "nope"}})))
            .unwrap_err();
        assert!(matches!(err, LoadError::InvalidDocument(_)));
        assert!(err.to_string().contains("/pets"));
    }

    #[test]
    fn test_non_string_tag_is_rejected() {
        let err = OpenApiDocument::from_value(&minimal(json!({"/pets": {"get": {"tags": [1]}}})))
            .unwrap_err();
        assert!(matches!(err, LoadError::InvalidDocument(_)));
    }

    #[test]
    fn test_version_gate() {
        let mut raw = minimal(json!({}));
        raw["openapi"] = json!("4.0.0");
        assert!(matches!(
            OpenApiDocument::from_value(&raw),
            Err(LoadError::UnsupportedVersion(v)) if v == "4.0.0"
        ));

        let swagger = json!({"swagger": "2.0", "info": {"title": "T", "version": "1"}});
        assert_eq!(OpenApiDocument::from_value(&swagger).unwrap().version(), "2.0");

        let none = json!({"info": {"title": "T", "version": "1"}});
        assert!(matches!(
            OpenApiDocument::from_value(&none),
            Err(LoadError::InvalidDocument(_))
        ));
    }

    #[test]
    fn test_missing_info_is_rejected() {
        let raw = json!({"openapi": "3.1.0", "paths": {}});
        assert!(matches!(
            OpenApiDocument::from_value(&raw),
            Err(LoadError::InvalidDocument(_))
        ));
    }

    #[test]
    fn test_tag_description_lookup() {
        let mut raw = minimal(json!({}));
        raw["tags"] = json!([{"name": "pet", "description": "Pet operations"}, {"name": "store"}]);
        let doc = OpenApiDocument::from_value(&raw).unwrap();
        assert_eq!(doc.tag_description("pet"), Some("Pet operations"));
        assert_eq!(doc.tag_description("store"), None);
        assert_eq!(doc.tag_description("Pet"), None);
    }

    #[test]
    fn test_parameters_decode_as_ref_or_inline() {
        let doc = OpenApiDocument::from_value(&minimal(json!({
            "/pets/{id}": {"get": {"parameters": [
                {"$ref": "#/components/parameters/Id"},
                {"name": "verbose", "in": "query"}
            ]}}
        })))
        .unwrap();

        let op = doc.operation("/pets/{id}", HttpMethod::Get).unwrap();
        let params = op.parameters.as_ref().unwrap();
        assert!(params[0].is_ref());
        assert!(!params[1].is_ref());
    }
}
