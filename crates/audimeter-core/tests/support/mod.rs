//! Playback simulation support for integration tests
//!
//! Drives an [`AudiencePlugin`] the way the host player would: named
//! events with positional JSON parameters, in realistic order.

use audimeter_core::events::names;
use audimeter_core::plugin::mock::ScriptedProvider;
use audimeter_core::sink::mock::Recorded;
use audimeter_core::sink::Emission;
use audimeter_core::{AnalyticsPlugin, AudiencePlugin, MetricCode, MetricPayload};
use serde_json::json;
use std::cell::RefCell;
use std::rc::Rc;

/// A plugin wired to a scripted SDK provider plus the shared call log
pub struct Harness {
    pub plugin: AudiencePlugin,
    pub provider: Rc<ScriptedProvider>,
    pub recorded: Rc<RefCell<Recorded>>,
}

/// Build a configured plugin with an immediately ready SDK
pub fn ready_harness() -> Harness {
    harness(true)
}

pub fn harness(sdk_ready: bool) -> Harness {
    let provider = ScriptedProvider::new(sdk_ready);
    let recorded = provider.recorded();
    let mut plugin = AudiencePlugin::new(provider.clone());
    plugin.init(&[]);
    plugin.set_metadata(&json!({
        "apid": "T0000000-0000-0000-0000-000000000000",
        "sfcode": "dcr",
        "apn": "test-player",
        "program": "myProgram",
        "isfullepisode": "N",
        "crossId1": "EP018S9S290015",
        "crossId2": "ABC",
        "airdate": "20150420 21:00:00",
        "segB": "Comedy",
        "segC": "Drama"
    }));
    Harness {
        plugin,
        provider,
        recorded,
    }
}

impl Harness {
    /// Drain the calls recorded since the last drain
    pub fn drain(&self) -> Vec<Emission> {
        self.recorded.borrow_mut().take_calls()
    }

    pub fn player_load(&mut self, embed_code: &str, title: &str, duration_ms: f64) {
        self.plugin.process_event(
            names::VIDEO_SOURCE_CHANGED,
            &[json!({ "embedCode": embed_code })],
        );
        self.plugin.process_event(
            names::VIDEO_CONTENT_METADATA_UPDATED,
            &[json!({ "title": title, "duration": duration_ms })],
        );
    }

    pub fn content_playback(&mut self) {
        self.plugin.process_event(names::VIDEO_PLAYING, &[]);
    }

    pub fn video_progress(&mut self, playheads: &[f64]) {
        for &position in playheads {
            self.plugin.process_event(
                names::VIDEO_STREAM_POSITION_CHANGED,
                &[json!({ "streamPosition": position })],
            );
        }
    }

    pub fn video_pause(&mut self) {
        self.plugin.process_event(names::VIDEO_PAUSED, &[]);
    }

    pub fn ad_break_started(&mut self) {
        self.plugin.process_event(names::AD_BREAK_STARTED, &[]);
    }

    pub fn ad_break_ended(&mut self) {
        self.plugin.process_event(names::AD_BREAK_ENDED, &[]);
    }

    pub fn ad_playback(&mut self, ad_id: &str, duration: f64) {
        self.plugin.process_event(
            names::AD_STARTED,
            &[json!({ "adId": ad_id, "adDuration": duration })],
        );
    }

    pub fn ad_complete(&mut self) {
        self.plugin.process_event(names::AD_ENDED, &[]);
    }

    /// A final position report precedes the completion event, matching
    /// player behavior at end of content.
    pub fn content_complete(&mut self, stream_position: f64) {
        self.video_progress(&[stream_position]);
        self.plugin.process_event(names::CONTENT_COMPLETED, &[]);
    }
}

/// Split a drained call list by metric code, preserving order
pub fn calls_for(calls: &[Emission], code: MetricCode) -> Vec<MetricPayload> {
    calls
        .iter()
        .filter(|(c, _)| *c == code)
        .map(|(_, p)| p.clone())
        .collect()
}

/// The positions carried by every position-payload call of one code
pub fn positions_for(calls: &[Emission], code: MetricCode) -> Vec<u64> {
    calls_for(calls, code)
        .into_iter()
        .filter_map(|payload| match payload {
            MetricPayload::Position(value) => Some(value),
            MetricPayload::Metadata(_) => None,
        })
        .collect()
}

/// The single metadata payload of one code, panicking on count mismatch
pub fn only_metadata(calls: &[Emission], code: MetricCode) -> serde_json::Map<String, serde_json::Value> {
    let matching = calls_for(calls, code);
    assert_eq!(matching.len(), 1, "expected exactly one {code} call");
    match matching.into_iter().next() {
        Some(MetricPayload::Metadata(map)) => map,
        other => panic!("expected metadata payload, got {other:?}"),
    }
}
