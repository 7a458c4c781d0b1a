//! Content metadata assembly
//!
//! Descriptive fields arrive from two directions: the caller's plugin
//! configuration (program, segment codes, cross-IDs, air date, title) and
//! the player's stream metadata (duration, stream title). Both are merged
//! into one accumulated record that backs every content metadata payload.

use crate::types::{SdkConfig, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Ad load type reported with content metadata: dynamic ad insertion
const AD_LOAD_TYPE: u64 = 2;

/// Caller-supplied plugin configuration
///
/// Carries the SDK credentials alongside the descriptive content fields,
/// exactly as they are delivered through `set_metadata`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentConfig {
    #[serde(flatten)]
    pub sdk: SdkConfig,
    #[serde(default)]
    pub program: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, rename = "isfullepisode")]
    pub is_full_episode: Option<String>,
    #[serde(default, rename = "crossId1")]
    pub cross_id1: Option<String>,
    #[serde(default, rename = "crossId2")]
    pub cross_id2: Option<String>,
    #[serde(default, rename = "airdate")]
    pub air_date: Option<String>,
    #[serde(default, rename = "segB")]
    pub seg_b: Option<String>,
    #[serde(default, rename = "segC")]
    pub seg_c: Option<String>,
}

/// Accumulated content metadata record
///
/// `type` is fixed to `"content"` by construction, so payloads built from
/// this record can never carry a missing or empty type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentMetadata {
    pub title: Option<String>,
    pub asset_name: Option<String>,
    pub asset_id: Option<String>,
    /// Content length in whole seconds (rounded from milliseconds)
    pub length: Option<u64>,
    pub program: Option<String>,
    pub is_full_episode: Option<String>,
    pub cross_id1: Option<String>,
    pub cross_id2: Option<String>,
    pub air_date: Option<String>,
    pub seg_b: Option<String>,
    pub seg_c: Option<String>,
}

impl ContentMetadata {
    /// Merge caller-supplied configuration fields.
    ///
    /// A caller-supplied title wins over any title learned from the stream.
    pub fn apply_config(&mut self, config: &ContentConfig) {
        if config.title.is_some() {
            self.title = config.title.clone();
        }
        self.program = config.program.clone();
        self.is_full_episode = config.is_full_episode.clone();
        self.cross_id1 = config.cross_id1.clone();
        self.cross_id2 = config.cross_id2.clone();
        self.air_date = config.air_date.clone();
        self.seg_b = config.seg_b.clone();
        self.seg_c = config.seg_c.clone();
    }

    /// Merge stream-level metadata.
    ///
    /// Only applies when a duration is known. The stream title fills the
    /// title slot when the caller supplied none, and always tracks the
    /// asset name.
    pub fn merge_stream_info(&mut self, duration_ms: Option<f64>, title: Option<&str>) {
        let Some(duration_ms) = duration_ms else {
            return;
        };
        self.length = Some((duration_ms / 1000.0).round() as u64);
        if let Some(title) = title {
            if self.title.is_none() {
                self.title = Some(title.to_owned());
            }
            self.asset_name = Some(title.to_owned());
        }
    }

    /// Record the asset identifier of the current source
    pub fn set_asset_id(&mut self, asset_id: &str) {
        self.asset_id = Some(asset_id.to_owned());
    }

    /// Build the content metadata payload map
    pub fn to_payload(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("type".into(), CONTENT_TYPE.into());
        map.insert("adloadtype".into(), AD_LOAD_TYPE.into());
        let mut put = |key: &str, value: &Option<String>| {
            if let Some(value) = value {
                map.insert(key.into(), value.clone().into());
            }
        };
        put("title", &self.title);
        put("assetName", &self.asset_name);
        put("assetid", &self.asset_id);
        put("program", &self.program);
        put("isfullepisode", &self.is_full_episode);
        put("crossId1", &self.cross_id1);
        put("crossId2", &self.cross_id2);
        put("airdate", &self.air_date);
        put("segB", &self.seg_b);
        put("segC", &self.seg_c);
        if let Some(length) = self.length {
            map.insert("length".into(), length.into());
        }
        map
    }
}
