//! CSDS request model and loading.
//!
//! A request is a list of node matchers. It is read from a YAML (or JSON)
//! document of the form:
//!
//! ```yaml
//! node_matchers:
//!   - node_id:
//!       exact: fake_node_id
//!     node_metadatas:
//!       - path:
//!           - key: TRAFFICDIRECTOR_GCP_PROJECT_NUMBER
//!         value:
//!           string_match:
//!             exact: "123456789"
//! ```
//!
//! Both snake_case and camelCase field names are accepted, as in the protobuf
//! JSON mapping. A request may come from a file, an inline string, or both;
//! the inline document is merged over the file document matcher by matcher.

use std::fs;
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::constants::NODE_MATCHERS_KEY;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientStatusRequest {
    #[serde(default)]
    pub node_matchers: Vec<NodeMatcher>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeMatcher {
    #[serde(default, alias = "node_id", skip_serializing_if = "Option::is_none")]
    pub node_id: Option<StringMatcher>,
    #[serde(default, alias = "node_metadatas", skip_serializing_if = "Vec::is_empty")]
    pub node_metadatas: Vec<StructMatcher>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StringMatcher {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exact: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex: Option<String>,
    #[serde(default, alias = "ignore_case", skip_serializing_if = "Option::is_none")]
    pub ignore_case: Option<bool>,
    /// Any other match pattern (`safeRegex`, ...) is passed through untouched.
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructMatcher {
    #[serde(default)]
    pub path: Vec<PathSegment>,
    #[serde(default)]
    pub value: ValueMatcher,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PathSegment {
    pub key: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueMatcher {
    #[serde(default, alias = "string_match", skip_serializing_if = "Option::is_none")]
    pub string_match: Option<StringMatcher>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl ClientStatusRequest {
    /// First exact string value matched under `key` in any matcher's metadata.
    pub fn metadata_value(&self, key: &str) -> Option<&str> {
        self.node_matchers
            .iter()
            .flat_map(|nm| nm.node_metadatas.iter())
            .find(|m| m.path.iter().any(|p| p.key == key))
            .and_then(|m| m.value.string_match.as_ref())
            .and_then(|s| s.exact.as_deref())
    }
}

/// Load a request from a file and/or an inline YAML/JSON string.
pub fn load_request(file: Option<&Path>, inline: Option<&str>) -> Result<ClientStatusRequest> {
    let inline = inline.filter(|s| !s.trim().is_empty());
    if file.is_none() && inline.is_none() {
        bail!("missing request yaml");
    }

    let mut matchers = match file {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read request file {}", path.display()))?;
            node_matchers(&text)?
        }
        None => Vec::new(),
    };

    if let Some(text) = inline {
        for (i, m) in node_matchers(text)?.into_iter().enumerate() {
            match matchers.get_mut(i) {
                Some(base) => merge_json(base, m),
                None => matchers.push(m),
            }
        }
    }

    let node_matchers = matchers
        .into_iter()
        .map(|v| serde_json::from_value(v).map_err(|e| anyhow!("invalid node matcher: {e}")))
        .collect::<Result<Vec<NodeMatcher>>>()?;

    Ok(ClientStatusRequest { node_matchers })
}

/// Parse a YAML or JSON request document into its node matcher list, each
/// matcher re-encoded with camelCase field names so documents using either
/// spelling merge key for key.
fn node_matchers(text: &str) -> Result<Vec<Value>> {
    let y: serde_yaml::Value =
        serde_yaml::from_str(text).map_err(|e| anyhow!("failed to parse request yaml: {e}"))?;
    let doc = serde_json::to_value(y).map_err(|e| anyhow!("request is not valid JSON data: {e}"))?;

    let list = doc
        .get(NODE_MATCHERS_KEY)
        .or_else(|| doc.get("nodeMatchers"))
        .ok_or_else(|| anyhow!("request is missing {NODE_MATCHERS_KEY}"))?;

    let Value::Array(items) = list else {
        bail!("{NODE_MATCHERS_KEY} must be a list");
    };
    items
        .iter()
        .map(|item| -> Result<Value> {
            let m = NodeMatcher::deserialize(item).map_err(|e| anyhow!("invalid node matcher: {e}"))?;
            Ok(serde_json::to_value(m)?)
        })
        .collect()
}

/// Merge `src` into `dst`: objects merge recursively, lists append, anything
/// else is overwritten.
pub fn merge_json(dst: &mut Value, src: Value) {
    match (dst, src) {
        (Value::Object(d), Value::Object(s)) => {
            for (k, v) in s {
                match d.get_mut(&k) {
                    Some(existing) => merge_json(existing, v),
                    None => {
                        d.insert(k, v);
                    }
                }
            }
        }
        (Value::Array(d), Value::Array(s)) => d.extend(s),
        (d, s) => *d = s,
    }
}
