//! Listener config dump (LDS).

use serde::Deserialize;
use serde_json::{Map, Value};

/// `ListenerConfigDump` as reported through CSDS.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListenerConfigDump {
    #[serde(default)]
    pub version_info: Option<String>,
    #[serde(default)]
    pub static_listeners: Vec<StaticListener>,
    #[serde(default)]
    pub dynamic_listeners: Vec<DynamicListener>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StaticListener {
    pub listener: ListenerDetail,
}

/// A dynamically delivered listener and the states it is currently in.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DynamicListener {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub active_state: Option<ListenerState>,
    #[serde(default)]
    pub warming_state: Option<ListenerState>,
    #[serde(default)]
    pub draining_state: Option<ListenerState>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListenerState {
    #[serde(default)]
    pub version_info: Option<String>,
    pub listener: ListenerDetail,
}

impl DynamicListener {
    /// The listener body to use: active first, then warming, then draining.
    ///
    /// A listener that only has an error state carries no body.
    pub fn current(&self) -> Option<&ListenerDetail> {
        self.active_state
            .as_ref()
            .or(self.warming_state.as_ref())
            .or(self.draining_state.as_ref())
            .map(|s| &s.listener)
    }
}

impl ListenerConfigDump {
    /// Static listeners followed by dynamic ones, in dump order.
    pub fn listeners(&self) -> impl Iterator<Item = &ListenerDetail> {
        self.static_listeners
            .iter()
            .map(|l| &l.listener)
            .chain(self.dynamic_listeners.iter().filter_map(DynamicListener::current))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListenerDetail {
    pub name: String,
    #[serde(default)]
    pub filter_chains: Vec<FilterChain>,
    #[serde(default)]
    pub default_filter_chain: Option<FilterChain>,
}

impl ListenerDetail {
    pub fn chains(&self) -> impl Iterator<Item = &FilterChain> {
        self.filter_chains.iter().chain(self.default_filter_chain.iter())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterChain {
    #[serde(default)]
    pub filters: Vec<Filter>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Filter {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub typed_config: Option<TypedExtension>,
}

/// A `google.protobuf.Any` payload: the `@type` URL plus the remaining fields.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct TypedExtension {
    pub type_url: String,
    pub payload: Map<String, Value>,
}

impl TryFrom<Map<String, Value>> for TypedExtension {
    type Error = String;

    fn try_from(mut payload: Map<String, Value>) -> Result<Self, Self::Error> {
        match payload.remove("@type") {
            Some(Value::String(type_url)) => Ok(Self { type_url, payload }),
            Some(other) => Err(format!("typed config `@type` must be a string, got {other}")),
            None => Err("typed config is missing `@type`".to_string()),
        }
    }
}
