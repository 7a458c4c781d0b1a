//! Core types for the measurement protocol

use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

/// Default bounded wait for the SDK script to become ready
pub const SDK_LOAD_TIMEOUT: Duration = Duration::from_secs(3);

/// Fixed interface version string sent to the SDK at initialization
pub const SDK_INTERFACE_VERSION: &str = "511";

/// Metadata type value for main content payloads
pub const CONTENT_TYPE: &str = "content";

/// Unique identifier assigned to a plugin by the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PluginId(pub Uuid);

impl PluginId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PluginId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PluginId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Fixed numeric codes of the downstream measurement protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetricCode {
    /// Content metadata sent before any preroll
    InitialLoadMetadata,
    /// Playback interrupted (pause, ad break, ad end)
    Stop,
    /// Content or ad metadata at (re)start of playback
    LoadMetadata,
    /// Throttled playhead report
    SetPlayheadPosition,
    /// Main content finished
    End,
}

impl MetricCode {
    /// Numeric code on the wire
    pub fn code(&self) -> u32 {
        match self {
            MetricCode::InitialLoadMetadata => 3,
            MetricCode::Stop => 7,
            MetricCode::LoadMetadata => 15,
            MetricCode::SetPlayheadPosition => 49,
            MetricCode::End => 57,
        }
    }
}

impl std::fmt::Display for MetricCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            MetricCode::InitialLoadMetadata => "initialLoadMetadata",
            MetricCode::Stop => "stop",
            MetricCode::LoadMetadata => "loadMetadata",
            MetricCode::SetPlayheadPosition => "setPlayheadPosition",
            MetricCode::End => "end",
        };
        write!(f, "{} ({})", name, self.code())
    }
}

/// Payload of a single measurement call
///
/// Positional codes carry an integer-floored playhead in seconds; metadata
/// codes carry a mapping that always includes a `type` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricPayload {
    Position(u64),
    Metadata(serde_json::Map<String, serde_json::Value>),
}

impl MetricPayload {
    /// The `type` field of a metadata payload, if any
    pub fn metadata_type(&self) -> Option<&str> {
        match self {
            MetricPayload::Metadata(map) => map.get("type").and_then(|v| v.as_str()),
            MetricPayload::Position(_) => None,
        }
    }
}

/// Ad placement relative to the main content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdType {
    Preroll,
    Midroll,
    Postroll,
}

impl AdType {
    /// Wire name used in metadata payloads
    pub fn as_str(&self) -> &'static str {
        match self {
            AdType::Preroll => "preroll",
            AdType::Midroll => "midroll",
            AdType::Postroll => "postroll",
        }
    }
}

impl std::fmt::Display for AdType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Identifying credentials for SDK initialization
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SdkConfig {
    /// Application identifier
    #[serde(default)]
    pub apid: String,
    /// Collection site code
    #[serde(default)]
    pub sfcode: String,
    /// Application name
    #[serde(default)]
    pub apn: String,
}

impl SdkConfig {
    /// Initialization payload sent on the construction call
    pub fn to_init_payload(&self) -> serde_json::Map<String, serde_json::Value> {
        let mut map = serde_json::Map::new();
        map.insert("apid".into(), self.apid.clone().into());
        map.insert("sfcode".into(), self.sfcode.clone().into());
        map.insert("apn".into(), self.apn.clone().into());
        map.insert("nsdkv".into(), SDK_INTERFACE_VERSION.into());
        map
    }
}
