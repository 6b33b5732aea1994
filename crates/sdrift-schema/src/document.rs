//! # Schema Document Model
//!
//! Parses a JSON Schema value into a typed [`SchemaNode`] tree. Only the
//! shape-bearing vocabulary matters here: `type`, `properties`, `items`,
//! `prefixItems`, `$ref`, and the `oneOf`/`anyOf`/`allOf` combinators.
//! Validation keywords (`required`, `pattern`, `enum`, ...) are ignored.
//!
//! Parsing never fails. Anything that cannot be understood becomes a node
//! that contributes no structure.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

const DEFINITIONS_PREFIXES: [&str; 2] = ["#/definitions/", "#/$defs/"];
const COMBINATORS: [&str; 3] = ["oneOf", "anyOf", "allOf"];

/// Leaf value types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveType {
    String,
    Number,
    Integer,
    Boolean,
    /// The absent/void branch of a nullable union.
    Null,
    /// No usable type information (`{}`, `true`, enum-only, unknown type names).
    Any,
}

impl PrimitiveType {
    fn from_type_name(name: &str) -> Self {
        match name {
            "string" => PrimitiveType::String,
            "number" => PrimitiveType::Number,
            "integer" => PrimitiveType::Integer,
            "boolean" => PrimitiveType::Boolean,
            "null" => PrimitiveType::Null,
            _ => PrimitiveType::Any,
        }
    }
}

/// A node in the schema tree.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaNode {
    /// Named properties.
    Object {
        properties: BTreeMap<String, SchemaNode>,
    },
    /// Homogeneous sequence of `items`.
    Array { items: Box<SchemaNode> },
    /// Leaf.
    Primitive(PrimitiveType),
    /// Name in the document's definitions table. `None` when the `$ref` was
    /// missing, empty, or pointed outside the document.
    Reference { target: Option<String> },
    /// Alternative shapes of the same field.
    Union { branches: Vec<SchemaNode> },
}

impl SchemaNode {
    /// Parse one schema value.
    pub fn from_value(value: &Value) -> SchemaNode {
        let Value::Object(map) = value else {
            // Boolean schemas and stray scalars carry no shape.
            return SchemaNode::Primitive(PrimitiveType::Any);
        };

        if let Some(reference) = map.get("$ref") {
            return SchemaNode::Reference {
                target: reference.as_str().and_then(reference_target),
            };
        }

        let base = structural_node(map);

        let mut combined = None;
        for key in COMBINATORS {
            if let Some(list) = map.get(key) {
                let branches: &mut Vec<SchemaNode> = combined.get_or_insert_with(Vec::new);
                if let Some(items) = list.as_array() {
                    branches.extend(items.iter().map(SchemaNode::from_value));
                }
            }
        }

        match (base, combined) {
            (Some(base), None) => base,
            (None, None) => SchemaNode::Primitive(PrimitiveType::Any),
            (None, Some(branches)) => SchemaNode::Union { branches },
            (Some(base), Some(mut branches)) => {
                branches.insert(0, base);
                SchemaNode::Union { branches }
            }
        }
    }

    /// True for the `null` leaf.
    pub fn is_null(&self) -> bool {
        matches!(self, SchemaNode::Primitive(PrimitiveType::Null))
    }
}

/// Shape implied by `type`, `properties` and `items`, if any.
fn structural_node(map: &Map<String, Value>) -> Option<SchemaNode> {
    match map.get("type") {
        Some(Value::String(name)) => Some(node_for_type(name, map)),
        Some(Value::Array(names)) => {
            let branches: Vec<SchemaNode> = names
                .iter()
                .filter_map(Value::as_str)
                .map(|name| node_for_type(name, map))
                .collect();
            match branches.len() {
                1 => branches.into_iter().next(),
                _ => Some(SchemaNode::Union { branches }),
            }
        }
        _ if map.contains_key("properties") => Some(object_node(map)),
        _ if map.contains_key("items") || map.contains_key("prefixItems") => {
            Some(array_node(map))
        }
        _ => None,
    }
}

fn node_for_type(name: &str, map: &Map<String, Value>) -> SchemaNode {
    match name {
        "object" => object_node(map),
        "array" => array_node(map),
        other => SchemaNode::Primitive(PrimitiveType::from_type_name(other)),
    }
}

fn object_node(map: &Map<String, Value>) -> SchemaNode {
    let properties = map
        .get("properties")
        .and_then(Value::as_object)
        .map(|props| {
            props
                .iter()
                .map(|(name, schema)| (name.clone(), SchemaNode::from_value(schema)))
                .collect()
        })
        .unwrap_or_default();
    SchemaNode::Object { properties }
}

fn array_node(map: &Map<String, Value>) -> SchemaNode {
    let items = match (map.get("items"), map.get("prefixItems")) {
        (Some(Value::Array(tuple)), _) | (None, Some(Value::Array(tuple))) => SchemaNode::Union {
            branches: tuple.iter().map(SchemaNode::from_value).collect(),
        },
        (Some(items), _) => SchemaNode::from_value(items),
        _ => SchemaNode::Primitive(PrimitiveType::Any),
    };
    SchemaNode::Array {
        items: Box::new(items),
    }
}

/// Extract the definition name from a local `$ref`, decoding JSON-pointer
/// escapes.
fn reference_target(reference: &str) -> Option<String> {
    let name = DEFINITIONS_PREFIXES
        .iter()
        .find_map(|prefix| reference.strip_prefix(prefix))?;
    if name.is_empty() || name.contains('/') {
        return None;
    }
    Some(name.replace("~1", "/").replace("~0", "~"))
}

/// A parsed schema document: root node plus named definitions.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaDocument {
    root: SchemaNode,
    definitions: BTreeMap<String, SchemaNode>,
}

impl SchemaDocument {
    /// Build a document from an already-parsed JSON value.
    pub fn from_value(value: &Value) -> Self {
        let mut definitions = BTreeMap::new();
        for key in ["definitions", "$defs"] {
            if let Some(table) = value.get(key).and_then(Value::as_object) {
                for (name, schema) in table {
                    definitions.insert(name.clone(), SchemaNode::from_value(schema));
                }
            }
        }
        Self {
            root: SchemaNode::from_value(value),
            definitions,
        }
    }

    /// Assemble a document directly from nodes.
    pub fn new(root: SchemaNode, definitions: BTreeMap<String, SchemaNode>) -> Self {
        Self { root, definitions }
    }

    pub fn root(&self) -> &SchemaNode {
        &self.root
    }

    /// Look up a named definition.
    pub fn definition(&self, name: &str) -> Option<&SchemaNode> {
        self.definitions.get(name)
    }

    /// Names of all definitions, sorted.
    pub fn definition_names(&self) -> impl Iterator<Item = &str> {
        self.definitions.keys().map(String::as_str)
    }
}
