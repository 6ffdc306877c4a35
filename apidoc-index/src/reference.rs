//! `$ref` Dereferencing
//!
//! Expands every reference node into a copy of its target so the detail view
//! can hand out self-contained parameter, request body and response trees.
//!
//! - Local references (`#/components/...`) resolve inside the document that
//!   contains them.
//! - External references (`common.json#/Pet`) resolve against documents the
//!   loader fetched beforehand; see [`external_locations`].
//! - A reference that re-enters its own expansion chain stays a `$ref` node.
//!
//! Targets whose expansion never hits a cycle are expanded once and cloned
//! on reuse. Output size is capped by a node budget, since a chain of
//! schemas that each reference the next one twice doubles at every level.

use crate::error::LoadError;
use crate::source::Location;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// A resolved reference target: owning document plus JSON Pointer.
type TargetKey = (Option<Location>, String);

/// Default cap on the number of JSON nodes one dereference may produce.
pub const DEFAULT_NODE_LIMIT: usize = 2_000_000;

/// Decode the JSON Pointer part of a `$ref`.
fn decode_fragment(fragment: &str) -> Option<String> {
    urlencoding::decode(fragment).ok().map(|pointer| pointer.into_owned())
}

/// Split `location#fragment`; either side may be empty.
fn split_reference(reference: &str) -> (&str, &str) {
    match reference.split_once('#') {
        Some((location, fragment)) => (location, fragment),
        None => (reference, ""),
    }
}

/// Collect the external document locations referenced anywhere in `value`.
///
/// Fails when a document without a location (a pre-fetched value) contains
/// an external reference, since there is nothing to resolve it against.
pub fn external_locations(
    value: &Value,
    base: Option<&Location>,
) -> Result<Vec<Location>, LoadError> {
    let mut found = Vec::new();
    collect_external(value, base, &mut found)?;
    Ok(found)
}

fn collect_external(
    value: &Value,
    base: Option<&Location>,
    found: &mut Vec<Location>,
) -> Result<(), LoadError> {
    match value {
        Value::Object(map) => {
            if let Some(Value::String(reference)) = map.get("$ref") {
                let (location, _) = split_reference(reference);
                if !location.is_empty() {
                    let base = base.ok_or_else(|| {
                        LoadError::UnresolvedReference(format!(
                            "{} (external reference without a source location)",
                            reference
                        ))
                    })?;
                    let target = base.join(location)?;
                    if !found.contains(&target) {
                        found.push(target);
                    }
                }
            }
            for child in map.values() {
                collect_external(child, base, found)?;
            }
        }
        Value::Array(items) => {
            for child in items {
                collect_external(child, base, found)?;
            }
        }
        _ => {}
    }
    Ok(())
}

/// Mutable state of one dereference pass.
#[derive(Default)]
struct Expansion {
    chain: Vec<TargetKey>,
    cache: HashMap<TargetKey, (Value, usize)>,
    nodes: usize,
    cycles: usize,
}

/// Expands references across a root document and its fetched externals.
pub struct Dereferencer<'a> {
    root: &'a Value,
    root_location: Option<&'a Location>,
    externals: &'a HashMap<Location, Value>,
    node_limit: usize,
}

impl<'a> Dereferencer<'a> {
    pub fn new(
        root: &'a Value,
        root_location: Option<&'a Location>,
        externals: &'a HashMap<Location, Value>,
    ) -> Self {
        Self {
            root,
            root_location,
            externals,
            node_limit: DEFAULT_NODE_LIMIT,
        }
    }

    pub fn with_node_limit(mut self, node_limit: usize) -> Self {
        self.node_limit = node_limit;
        self
    }

    /// Produce a copy of the root with every reachable `$ref` expanded.
    pub fn dereference(&self) -> Result<Value, LoadError> {
        let current = self.root_location.cloned();
        self.expand(self.root, &current, &mut Expansion::default())
    }

    /// Produce a copy of the root where only the `paths` member is
    /// expanded. Components nothing under `paths` uses are left alone.
    pub fn dereference_paths(&self) -> Result<Value, LoadError> {
        let mut out = self.root.clone();
        if let (Some(paths), Value::Object(map)) = (self.root.get("paths"), &mut out) {
            let current = self.root_location.cloned();
            let expanded = self.expand(paths, &current, &mut Expansion::default())?;
            map.insert("paths".to_string(), expanded);
        }
        Ok(out)
    }

    fn document(&self, location: &Option<Location>) -> Option<&'a Value> {
        match location {
            None => Some(self.root),
            Some(loc) if Some(loc) == self.root_location => Some(self.root),
            Some(loc) => self.externals.get(loc),
        }
    }

    fn charge(&self, state: &mut Expansion, nodes: usize) -> Result<(), LoadError> {
        state.nodes += nodes;
        if state.nodes > self.node_limit {
            return Err(LoadError::ExpansionLimit(self.node_limit));
        }
        Ok(())
    }

    fn expand(
        &self,
        value: &Value,
        current: &Option<Location>,
        state: &mut Expansion,
    ) -> Result<Value, LoadError> {
        match value {
            Value::Object(map) => {
                if let Some(Value::String(reference)) = map.get("$ref") {
                    return self.expand_reference(reference, map, current, state);
                }
                self.charge(state, 1)?;
                let mut out = Map::with_capacity(map.len());
                for (key, child) in map {
                    out.insert(key.clone(), self.expand(child, current, state)?);
                }
                Ok(Value::Object(out))
            }
            Value::Array(items) => {
                self.charge(state, 1)?;
                items
                    .iter()
                    .map(|child| self.expand(child, current, state))
                    .collect::<Result<Vec<_>, _>>()
                    .map(Value::Array)
            }
            other => {
                self.charge(state, 1)?;
                Ok(other.clone())
            }
        }
    }

    fn expand_reference(
        &self,
        reference: &str,
        node: &Map<String, Value>,
        current: &Option<Location>,
        state: &mut Expansion,
    ) -> Result<Value, LoadError> {
        let unresolved = || LoadError::UnresolvedReference(reference.to_string());

        let (location, fragment) = split_reference(reference);
        let target_location = if location.is_empty() {
            current.clone()
        } else {
            let base = current.as_ref().ok_or_else(unresolved)?;
            Some(base.join(location)?)
        };

        let pointer = decode_fragment(fragment).ok_or_else(unresolved)?;
        if !pointer.is_empty() && !pointer.starts_with('/') {
            return Err(unresolved());
        }

        let key = (target_location, pointer);
        if state.chain.contains(&key) {
            tracing::debug!("Circular reference left in place: {}", reference);
            state.cycles += 1;
            self.charge(state, 1)?;
            return Ok(Value::Object(node.clone()));
        }

        let cached_nodes = state.cache.get(&key).map(|(_, nodes)| *nodes);
        let mut expanded = match cached_nodes {
            Some(nodes) => {
                self.charge(state, nodes)?;
                state.cache[&key].0.clone()
            }
            None => self.expand_target(key, state, unresolved)?,
        };

        // Sibling keys next to `$ref` override the target's.
        if let Value::Object(target_map) = &mut expanded {
            for (sibling, child) in node.iter().filter(|(k, _)| k.as_str() != "$ref") {
                target_map.insert(sibling.clone(), self.expand(child, current, state)?);
            }
        }

        Ok(expanded)
    }

    /// Expand a target that is neither on the chain nor cached, and cache
    /// the result when no cycle was met on the way.
    fn expand_target(
        &self,
        key: TargetKey,
        state: &mut Expansion,
        unresolved: impl Fn() -> LoadError,
    ) -> Result<Value, LoadError> {
        let target = self
            .document(&key.0)
            .and_then(|doc| doc.pointer(&key.1))
            .ok_or_else(unresolved)?;

        let (nodes_before, cycles_before) = (state.nodes, state.cycles);
        let target_location = key.0.clone();
        state.chain.push(key);
        let expanded = self.expand(target, &target_location, state);
        let key = state.chain.pop();
        let expanded = expanded?;

        if let Some(key) = key.filter(|_| state.cycles == cycles_before) {
            state
                .cache
                .insert(key, (expanded.clone(), state.nodes - nodes_before));
        }
        Ok(expanded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::path::PathBuf;

    fn deref(root: &Value) -> Result<Value, LoadError> {
        let externals = HashMap::new();
        Dereferencer::new(root, None, &externals).dereference()
    }

    #[test]
    fn test_local_reference_is_inlined() {
        let root = json!({
            "paths": {"/pets": {"get": {"responses": {"200": {"$ref": "#/components/responses/Ok"}}}}},
            "components": {"responses": {"Ok": {"description": "fine"}}}
        });
        let out = deref(&root).unwrap();
        assert_eq!(
            out["paths"]["/pets"]["get"]["responses"]["200"],
            json!({"description": "fine"})
        );
    }

    #[test]
    fn test_nested_references_are_expanded() {
        let root = json!({
            "a": {"$ref": "#/defs/B"},
            "defs": {
                "B": {"type": "object", "properties": {"c": {"$ref": "#/defs/C"}}},
                "C": {"type": "string"}
            }
        });
        let out = deref(&root).unwrap();
        assert_eq!(out["a"]["properties"]["c"], json!({"type": "string"}));
    }

    #[test]
    fn test_escaped_pointer_segments() {
        let root = json!({
            "x": {"$ref": "#/paths/~1pets~1%7Bid%7D"},
            "paths": {"/pets/{id}": {"summary": "one pet"}}
        });
        let out = deref(&root).unwrap();
        assert_eq!(out["x"], json!({"summary": "one pet"}));
    }

    #[test]
    fn test_missing_target_fails() {
        let root = json!({"x": {"$ref": "#/components/schemas/Nope"}});
        let err = deref(&root).unwrap_err();
        assert!(matches!(err, LoadError::UnresolvedReference(r) if r == "#/components/schemas/Nope"));
    }

    #[test]
    fn test_circular_reference_is_left_in_place() {
        let root = json!({
            "defs": {"Node": {"type": "object", "properties": {"next": {"$ref": "#/defs/Node"}}}},
            "use": {"$ref": "#/defs/Node"}
        });
        let out = deref(&root).unwrap();
        assert_eq!(out["use"]["type"], json!("object"));
        assert_eq!(
            out["use"]["properties"]["next"],
            json!({"$ref": "#/defs/Node"})
        );
    }

    #[test]
    fn test_sibling_keys_override_target() {
        let root = json!({
            "x": {"$ref": "#/defs/A", "description": "overridden"},
            "defs": {"A": {"type": "string", "description": "original"}}
        });
        let out = deref(&root).unwrap();
        assert_eq!(out["x"], json!({"type": "string", "description": "overridden"}));
    }

    #[test]
    fn test_external_reference_without_location_fails() {
        let root = json!({"x": {"$ref": "common.json#/Pet"}});
        assert!(matches!(
            external_locations(&root, None),
            Err(LoadError::UnresolvedReference(_))
        ));
        assert!(deref(&root).is_err());
    }

    #[test]
    fn test_external_reference_resolves_against_fetched_document() {
        let base = Location::File(PathBuf::from("/specs/openapi.json"));
        let root = json!({"x": {"$ref": "common.json#/Pet"}});

        let found = external_locations(&root, Some(&base)).unwrap();
        assert_eq!(found, vec![Location::File(PathBuf::from("/specs/common.json"))]);

        let mut externals = HashMap::new();
        externals.insert(
            found[0].clone(),
            json!({"Pet": {"type": "object", "properties": {"tag": {"$ref": "#/Tag"}}}, "Tag": {"type": "string"}}),
        );

        let out = Dereferencer::new(&root, Some(&base), &externals)
            .dereference()
            .unwrap();
        assert_eq!(out["x"]["properties"]["tag"], json!({"type": "string"}));
    }

    #[test]
    fn test_fragment_decoding() {
        assert_eq!(decode_fragment("/paths/%7Bid%7D").as_deref(), Some("/paths/{id}"));
        assert_eq!(decode_fragment("plain").as_deref(), Some("plain"));
        // Malformed escapes stay literal text.
        assert_eq!(decode_fragment("/a%+1").as_deref(), Some("/a%+1"));
        assert_eq!(decode_fragment("/a%zz").as_deref(), Some("/a%zz"));
        assert_eq!(decode_fragment("/a%FF"), None);
    }

    #[test]
    fn test_malformed_escape_does_not_become_control_byte() {
        let root = json!({
            "x": {"$ref": "#/defs/%+1"},
            "defs": {"\u{1}": {"type": "string"}}
        });
        let err = deref(&root).unwrap_err();
        assert!(matches!(err, LoadError::UnresolvedReference(r) if r == "#/defs/%+1"));

        let root = json!({
            "x": {"$ref": "#/defs/%+1"},
            "defs": {"%+1": {"type": "string"}}
        });
        assert_eq!(deref(&root).unwrap()["x"], json!({"type": "string"}));
    }

    /// `D0 -> D1 -> ... -> D{depth}`, each level referencing the next twice.
    fn doubling_chain(depth: usize) -> Value {
        let mut defs = Map::new();
        for i in 0..depth {
            let next = format!("#/defs/D{}", i + 1);
            defs.insert(
                format!("D{}", i),
                json!({"type": "object", "properties": {"a": {"$ref": next}, "b": {"$ref": next}}}),
            );
        }
        defs.insert(format!("D{}", depth), json!({"type": "string"}));
        json!({
            "paths": {"/tree": {"get": {"responses": {"200": {"$ref": "#/defs/D0"}}}}},
            "defs": defs
        })
    }

    #[test]
    fn test_shared_references_expand_identically() {
        let root = doubling_chain(4);
        let out = deref(&root).unwrap();
        let d0 = &out["paths"]["/tree"]["get"]["responses"]["200"];
        assert_eq!(d0["properties"]["a"], d0["properties"]["b"]);
        let leaf = &d0["properties"]["a"]["properties"]["b"]["properties"]["a"]["properties"]["b"];
        assert_eq!(leaf, &json!({"type": "string"}));
    }

    #[test]
    fn test_exponential_expansion_hits_node_limit() {
        let root = doubling_chain(40);
        let externals = HashMap::new();
        let err = Dereferencer::new(&root, None, &externals)
            .with_node_limit(10_000)
            .dereference_paths()
            .unwrap_err();
        assert!(matches!(err, LoadError::ExpansionLimit(10_000)));
    }

    #[test]
    fn test_dereference_paths_leaves_components_alone() {
        let root = json!({
            "paths": {"/a": {"get": {"responses": {"200": {"$ref": "#/components/responses/Ok"}}}}},
            "components": {"responses": {
                "Ok": {"description": "fine"},
                "Unused": {"$ref": "#/components/responses/Missing"}
            }}
        });
        let externals = HashMap::new();
        let out = Dereferencer::new(&root, None, &externals)
            .dereference_paths()
            .unwrap();
        assert_eq!(
            out["paths"]["/a"]["get"]["responses"]["200"],
            json!({"description": "fine"})
        );
        assert_eq!(out["components"], root["components"]);
    }

    #[test]
    fn test_cycle_inside_shared_target_is_not_cached() {
        let root = json!({
            "first": {"$ref": "#/defs/Node"},
            "second": {"$ref": "#/defs/Node"},
            "defs": {"Node": {"properties": {"next": {"$ref": "#/defs/Node"}}}}
        });
        let out = deref(&root).unwrap();
        assert_eq!(out["first"], out["second"]);
        assert_eq!(
            out["second"]["properties"]["next"],
            json!({"$ref": "#/defs/Node"})
        );
    }
}
