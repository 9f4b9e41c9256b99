//! Token tree, reference resolution and flattening.
//!
//! A token tree is a nested mapping whose leaves are raw values or references
//! to other leaves. Flattening walks the tree depth-first in insertion order
//! and joins the keys of each leaf with [`SEPARATOR`], so the same tree always
//! yields the same ordered list.

use crate::errors::SchemaError;
use crate::schema::{DesignTokens, TokenLayer};
use indexmap::IndexMap;
use serde::de::{self, Deserializer};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::fmt;

/// Separator used between path segments of a flattened token name.
pub const SEPARATOR: &str = "-";

/// A group of named token nodes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenGroup {
    entries: IndexMap<String, TokenNode>,
}

/// Either a nested group or a leaf value.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenNode {
    Group(TokenGroup),
    Value(TokenValue),
}

/// A leaf value.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenValue {
    String(String),
    Number(Number),
    Bool(bool),
    /// Scalar list, e.g. a font stack.
    List(Vec<String>),
    /// Dotted path to another token.
    Reference(String),
}

impl TokenGroup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, node: TokenNode) {
        self.entries.insert(key.into(), node);
    }

    /// Insert a leaf at a dotted path, creating intermediate groups.
    pub fn insert_path(&mut self, path: &str, value: TokenValue) {
        let mut segments: Vec<&str> = path.split('.').collect();
        let Some(last) = segments.pop() else {
            return;
        };
        let mut group = self;
        for segment in segments {
            let node = group
                .entries
                .entry(segment.to_string())
                .or_insert_with(|| TokenNode::Group(TokenGroup::new()));
            if !matches!(node, TokenNode::Group(_)) {
                *node = TokenNode::Group(TokenGroup::new());
            }
            group = match node {
                TokenNode::Group(g) => g,
                TokenNode::Value(_) => return,
            };
        }
        group.entries.insert(last.to_string(), TokenNode::Value(value));
    }

    pub fn get(&self, key: &str) -> Option<&TokenNode> {
        self.entries.get(key)
    }

    /// Look up a leaf by path segments.
    pub fn lookup<S: AsRef<str>>(&self, path: &[S]) -> Option<&TokenValue> {
        let (last, parents) = path.split_last()?;
        let mut group = self;
        for segment in parents {
            match group.entries.get(segment.as_ref())? {
                TokenNode::Group(g) => group = g,
                TokenNode::Value(_) => return None,
            }
        }
        match group.entries.get(last.as_ref())? {
            TokenNode::Value(v) => Some(v),
            TokenNode::Group(_) => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &TokenNode)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Depth-first list of `(path segments, leaf)` in insertion order.
    pub fn leaves(&self) -> Vec<(Vec<String>, &TokenValue)> {
        let mut out = Vec::new();
        collect_leaves(self, &mut Vec::new(), &mut out);
        out
    }

    fn from_json(path: &mut Vec<String>, map: serde_json::Map<String, Value>) -> Result<Self, String> {
        let mut group = TokenGroup::new();
        for (key, value) in map {
            path.push(key.clone());
            let node = TokenNode::from_json(path, value)?;
            path.pop();
            group.entries.insert(key, node);
        }
        Ok(group)
    }
}

fn collect_leaves<'a>(
    group: &'a TokenGroup,
    prefix: &mut Vec<String>,
    out: &mut Vec<(Vec<String>, &'a TokenValue)>,
) {
    for (key, node) in &group.entries {
        prefix.push(key.clone());
        match node {
            TokenNode::Value(value) => out.push((prefix.clone(), value)),
            TokenNode::Group(child) => collect_leaves(child, prefix, out),
        }
        prefix.pop();
    }
}

/// Flatten a token tree into `(joined-name, value)` pairs.
pub fn flatten(group: &TokenGroup) -> Vec<(String, &TokenValue)> {
    group
        .leaves()
        .into_iter()
        .map(|(path, value)| (path.join(SEPARATOR), value))
        .collect()
}

impl TokenNode {
    fn from_json(path: &mut Vec<String>, value: Value) -> Result<Self, String> {
        match value {
            Value::Object(map) => {
                if let Some(reference) = reference_target(&map) {
                    return Ok(TokenNode::Value(TokenValue::Reference(reference)));
                }
                Ok(TokenNode::Group(TokenGroup::from_json(path, map)?))
            }
            other => TokenValue::from_json(other)
                .map(TokenNode::Value)
                .map_err(|reason| format!("{}: {}", path.join("."), reason)),
        }
    }
}

fn reference_target(map: &serde_json::Map<String, Value>) -> Option<String> {
    if map.len() != 1 {
        return None;
    }
    match map.get("ref").or_else(|| map.get("$ref")) {
        Some(Value::String(target)) => Some(target.clone()),
        _ => None,
    }
}

impl TokenValue {
    fn from_json(value: Value) -> Result<Self, String> {
        match value {
            Value::String(s) => Ok(match brace_reference(&s) {
                Some(target) => TokenValue::Reference(target.to_string()),
                None => TokenValue::String(s),
            }),
            Value::Number(n) => Ok(TokenValue::Number(n)),
            Value::Bool(b) => Ok(TokenValue::Bool(b)),
            Value::Array(items) => items
                .into_iter()
                .map(|item| match item {
                    Value::String(s) => Ok(s),
                    Value::Number(n) => Ok(n.to_string()),
                    _ => Err("lists may only contain strings and numbers".to_string()),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(TokenValue::List),
            Value::Null => Err("null is not a token value".to_string()),
            Value::Object(_) => Err("unexpected object".to_string()),
        }
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, TokenValue::Reference(_))
    }

    /// Render the value as it appears in stylesheets and string literals.
    pub fn render(&self) -> String {
        match self {
            TokenValue::String(s) => s.clone(),
            TokenValue::Number(n) => n.to_string(),
            TokenValue::Bool(b) => b.to_string(),
            TokenValue::List(items) => items.join(", "),
            TokenValue::Reference(target) => format!("{{{}}}", target),
        }
    }

    fn to_json(&self) -> Value {
        match self {
            TokenValue::String(s) => Value::String(s.clone()),
            TokenValue::Number(n) => Value::Number(n.clone()),
            TokenValue::Bool(b) => Value::Bool(*b),
            TokenValue::List(items) => {
                Value::Array(items.iter().cloned().map(Value::String).collect())
            }
            TokenValue::Reference(target) => {
                let mut map = serde_json::Map::new();
                map.insert("ref".into(), Value::String(target.clone()));
                Value::Object(map)
            }
        }
    }
}

impl fmt::Display for TokenValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// `"{colors.primary}"` → `Some("colors.primary")`.
fn brace_reference(s: &str) -> Option<&str> {
    let inner = s.strip_prefix('{')?.strip_suffix('}')?;
    let valid = !inner.is_empty()
        && inner
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'));
    valid.then_some(inner)
}

impl<'de> Deserialize<'de> for TokenGroup {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let map = serde_json::Map::<String, Value>::deserialize(deserializer)?;
        TokenGroup::from_json(&mut Vec::new(), map).map_err(de::Error::custom)
    }
}

impl Serialize for TokenGroup {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, node) in &self.entries {
            map.serialize_entry(key, node)?;
        }
        map.end()
    }
}

impl Serialize for TokenNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TokenNode::Group(group) => group.serialize(serializer),
            TokenNode::Value(value) => value.to_json().serialize(serializer),
        }
    }
}

/// A flattened, resolved token.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatToken {
    pub layer: TokenLayer,
    /// Path segments below the layer root.
    pub path: Vec<String>,
    /// Hyphen-joined name, unique across all layers.
    pub name: String,
    /// Fully resolved value, never a reference.
    pub value: TokenValue,
    /// Flattened name of the token this one directly references.
    pub reference: Option<String>,
}

impl FlatToken {
    pub fn qualified_path(&self) -> String {
        format!("{}.{}", self.layer, self.path.join("."))
    }
}

/// Flattened, resolved token list for a whole schema.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlatTokens {
    tokens: Vec<FlatToken>,
    index: IndexMap<String, usize>,
}

impl FlatTokens {
    /// Resolve and flatten every layer of `tokens`.
    ///
    /// Fails on references inside the primitive layer, dangling or circular
    /// references, and name collisions between layers.
    pub fn resolve(tokens: &DesignTokens) -> Result<Self, SchemaError> {
        TokenResolver::new(tokens).run()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FlatToken> {
        self.tokens.iter()
    }

    pub fn layer(&self, layer: TokenLayer) -> impl Iterator<Item = &FlatToken> {
        self.tokens.iter().filter(move |t| t.layer == layer)
    }

    pub fn get(&self, name: &str) -> Option<&FlatToken> {
        self.index.get(name).map(|&i| &self.tokens[i])
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// `(name, rendered value)` pairs in flattening order.
    pub fn pairs(&self) -> Vec<(String, String)> {
        self.tokens
            .iter()
            .map(|t| (t.name.clone(), t.value.render()))
            .collect()
    }

    /// Top-level group names (first path segment) in first-seen order.
    pub fn groups(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for token in &self.tokens {
            if let Some(first) = token.path.first() {
                if !seen.contains(&first.as_str()) {
                    seen.push(first);
                }
            }
        }
        seen
    }
}

struct TokenResolver<'a> {
    tokens: &'a DesignTokens,
    /// Qualified paths currently being resolved, for cycle detection.
    resolution_stack: Vec<String>,
}

impl<'a> TokenResolver<'a> {
    fn new(tokens: &'a DesignTokens) -> Self {
        Self {
            tokens,
            resolution_stack: Vec::new(),
        }
    }

    fn run(&mut self) -> Result<FlatTokens, SchemaError> {
        let tokens = self.tokens;
        let mut flat = FlatTokens::default();

        for layer in TokenLayer::ALL {
            for (path, value) in tokens.layer(layer).leaves() {
                let qualified = format!("{}.{}", layer, path.join("."));
                let (resolved, reference) = match value {
                    TokenValue::Reference(target) => {
                        if layer == TokenLayer::Primitive {
                            return Err(SchemaError::ReferenceInPrimitive { path: qualified });
                        }
                        self.resolution_stack.clear();
                        self.resolution_stack.push(qualified.clone());
                        let (target_layer, target_path) =
                            self.locate(layer, &path, target).ok_or_else(|| {
                                SchemaError::DanglingReference {
                                    path: qualified.clone(),
                                    reference: target.clone(),
                                }
                            })?;
                        let value = self.follow(target_layer, &target_path)?;
                        (value, Some(target_path.join(SEPARATOR)))
                    }
                    other => (other.clone(), None),
                };

                let name = path.join(SEPARATOR);
                if let Some(&existing) = flat.index.get(&name) {
                    return Err(SchemaError::DuplicateTokenName {
                        name,
                        first: flat.tokens[existing].qualified_path(),
                        second: qualified,
                    });
                }
                flat.index.insert(name.clone(), flat.tokens.len());
                flat.tokens.push(FlatToken {
                    layer,
                    path,
                    name,
                    value: resolved,
                    reference,
                });
            }
        }

        Ok(flat)
    }

    /// Follow a chain of references starting at an existing leaf.
    fn follow(&mut self, layer: TokenLayer, path: &[String]) -> Result<TokenValue, SchemaError> {
        let qualified = format!("{}.{}", layer, path.join("."));
        if self.resolution_stack.contains(&qualified) {
            let mut cycle = self.resolution_stack.clone();
            cycle.push(qualified);
            return Err(SchemaError::CircularReference { cycle });
        }

        let value = self
            .tokens
            .layer(layer)
            .lookup(path)
            .ok_or_else(|| SchemaError::DanglingReference {
                path: self.resolution_stack.first().cloned().unwrap_or_default(),
                reference: qualified.clone(),
            })?;

        match value {
            TokenValue::Reference(target) => {
                if layer == TokenLayer::Primitive {
                    return Err(SchemaError::ReferenceInPrimitive { path: qualified });
                }
                self.resolution_stack.push(qualified.clone());
                let (next_layer, next_path) =
                    self.locate(layer, path, target).ok_or_else(|| {
                        SchemaError::DanglingReference {
                            path: qualified,
                            reference: target.clone(),
                        }
                    })?;
                self.follow(next_layer, &next_path)
            }
            other => Ok(other.clone()),
        }
    }

    /// Find the leaf a reference points at.
    fn locate(
        &self,
        from_layer: TokenLayer,
        from_path: &[String],
        target: &str,
    ) -> Option<(TokenLayer, Vec<String>)> {
        let segments: Vec<String> = target.split('.').map(str::to_string).collect();

        if let Some(layer) = segments.first().and_then(|s| TokenLayer::from_name(s)) {
            let rest = segments[1..].to_vec();
            return self.tokens.layer(layer).lookup(&rest).map(|_| (layer, rest));
        }

        let search: &[TokenLayer] = match from_layer {
            TokenLayer::Primitive => &[],
            TokenLayer::Semantic => &[TokenLayer::Primitive, TokenLayer::Semantic],
            TokenLayer::Component => &[TokenLayer::Semantic, TokenLayer::Primitive],
        };

        let parents = &from_path[..from_path.len().saturating_sub(1)];
        for &layer in search {
            for depth in (0..=parents.len()).rev() {
                let mut candidate = parents[..depth].to_vec();
                candidate.extend(segments.iter().cloned());
                if layer == from_layer && candidate.as_slice() == from_path {
                    continue;
                }
                if self.tokens.layer(layer).lookup(&candidate).is_some() {
                    return Some((layer, candidate));
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn tokens(value: Value) -> DesignTokens {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_flatten_joins_with_hyphen() {
        let t = tokens(json!({
            "primitive": {
                "colors": {"blue": {"500": "#3b82f6"}, "white": "#fff"},
                "spacing": {"md": "1rem"}
            }
        }));
        let pairs: Vec<_> = flatten(&t.primitive)
            .into_iter()
            .map(|(k, v)| (k, v.render()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("colors-blue-500".to_string(), "#3b82f6".to_string()),
                ("colors-white".to_string(), "#fff".to_string()),
                ("spacing-md".to_string(), "1rem".to_string()),
            ]
        );
    }

    #[test]
    fn test_semantic_reference_resolves_to_sibling_primitive() {
        let t = tokens(json!({
            "primitive": {"spacing": {"md": "1rem"}},
            "semantic": {"spacing": {"section": {"ref": "md"}}}
        }));
        let flat = FlatTokens::resolve(&t).unwrap();
        assert_eq!(flat.get("spacing-md").unwrap().value.render(), "1rem");
        let section = flat.get("spacing-section").unwrap();
        assert_eq!(section.value.render(), "1rem");
        assert_eq!(section.reference.as_deref(), Some("spacing-md"));
        assert_eq!(section.layer, TokenLayer::Semantic);
    }

    #[test]
    fn test_brace_reference_and_chains() {
        let t = tokens(json!({
            "primitive": {"colors": {"blue": "#00f"}},
            "semantic": {"brand": {"primary": "{colors.blue}", "accent": {"ref": "semantic.brand.primary"}}},
            "component": {"button": {"background": "{brand.accent}"}}
        }));
        let flat = FlatTokens::resolve(&t).unwrap();
        assert_eq!(flat.get("brand-accent").unwrap().value.render(), "#00f");
        let bg = flat.get("button-background").unwrap();
        assert_eq!(bg.value.render(), "#00f");
        assert_eq!(bg.reference.as_deref(), Some("brand-accent"));
    }

    #[test]
    fn test_dangling_reference_fails() {
        let t = tokens(json!({
            "primitive": {"spacing": {"md": "1rem"}},
            "semantic": {"spacing": {"huge": {"ref": "xxl"}}}
        }));
        let err = FlatTokens::resolve(&t).unwrap_err();
        assert_eq!(
            err,
            SchemaError::DanglingReference {
                path: "semantic.spacing.huge".into(),
                reference: "xxl".into()
            }
        );
    }

    #[test]
    fn test_circular_reference_fails() {
        let t = tokens(json!({
            "semantic": {"a": {"ref": "b"}, "b": {"ref": "a"}}
        }));
        assert!(matches!(
            FlatTokens::resolve(&t),
            Err(SchemaError::CircularReference { .. })
        ));
    }

    #[test]
    fn test_reference_in_primitive_layer_fails() {
        let t = tokens(json!({"primitive": {"a": "1px", "b": {"ref": "a"}}}));
        assert!(matches!(
            FlatTokens::resolve(&t),
            Err(SchemaError::ReferenceInPrimitive { .. })
        ));
    }

    #[test]
    fn test_duplicate_names_across_layers_fail() {
        let t = tokens(json!({
            "primitive": {"spacing": {"md": "1rem"}},
            "semantic": {"spacing": {"md": {"ref": "primitive.spacing.md"}}}
        }));
        assert!(matches!(
            FlatTokens::resolve(&t),
            Err(SchemaError::DuplicateTokenName { .. })
        ));
    }

    #[test]
    fn test_font_stack_list_renders_joined() {
        let t = tokens(json!({"primitive": {"font": {"sans": ["Inter", "system-ui", "sans-serif"]}}}));
        let flat = FlatTokens::resolve(&t).unwrap();
        assert_eq!(
            flat.get("font-sans").unwrap().value.render(),
            "Inter, system-ui, sans-serif"
        );
    }

    #[test]
    fn test_null_leaf_is_rejected() {
        let result: Result<DesignTokens, _> =
            serde_json::from_value(json!({"primitive": {"x": null}}));
        assert!(result.is_err());
    }

    #[test]
    fn test_serialize_round_trips_references() {
        let t = tokens(json!({"semantic": {"a": {"ref": "b"}}}));
        let value = serde_json::to_value(&t.semantic).unwrap();
        assert_eq!(value, json!({"a": {"ref": "b"}}));
    }

    #[test]
    fn test_insert_path_builds_groups() {
        let mut group = TokenGroup::new();
        group.insert_path("colors.brand.primary", TokenValue::String("#123456".into()));
        assert_eq!(
            group.lookup(&["colors", "brand", "primary"]),
            Some(&TokenValue::String("#123456".into()))
        );
    }

    fn arb_group() -> impl Strategy<Value = TokenGroup> {
        let leaf = "[a-z0-9#.]{1,6}".prop_map(|s| TokenNode::Value(TokenValue::String(s)));
        let node = leaf.prop_recursive(3, 32, 4, |inner| {
            prop::collection::vec(("[a-z]{1,4}", inner), 1..4).prop_map(|entries| {
                let mut group = TokenGroup::new();
                for (k, v) in entries {
                    group.insert(k, v);
                }
                TokenNode::Group(group)
            })
        });
        prop::collection::vec(("[a-z]{1,4}", node), 0..5).prop_map(|entries| {
            let mut group = TokenGroup::new();
            for (k, v) in entries {
                group.insert(k, v);
            }
            group
        })
    }

    proptest! {
        #[test]
        fn prop_flatten_is_deterministic(group in arb_group()) {
            let first: Vec<_> = flatten(&group).into_iter().map(|(k, v)| (k, v.render())).collect();
            let second: Vec<_> = flatten(&group).into_iter().map(|(k, v)| (k, v.render())).collect();
            prop_assert_eq!(first, second);
        }

        #[test]
        fn prop_flatten_survives_serde(group in arb_group()) {
            let json = serde_json::to_string(&group).unwrap();
            let back: TokenGroup = serde_json::from_str(&json).unwrap();
            prop_assert_eq!(flatten(&group).len(), flatten(&back).len());
        }
    }
}
