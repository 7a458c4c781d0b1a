//! Playback event translator
//!
//! The state machine at the center of the crate: consumes one playback
//! event at a time, mutates a single explicit state struct, and returns
//! the measurement calls that event produced. Handlers perform no side
//! effects themselves; the caller forwards the returned emissions to the
//! sink dispatcher.

use crate::events::{AdInfo, PlaybackEvent};
use crate::metadata::ContentMetadata;
use crate::sink::Emission;
use crate::types::{AdType, MetricCode, MetricPayload};
use tracing::debug;

/// Mutable playback state, one instance per plugin lifetime
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackState {
    /// Last reported main-content position, seconds
    pub content_playhead: f64,
    /// Last reported ad position, seconds; meaningful only inside a break
    pub ad_playhead: f64,
    /// True once main content playback has been observed
    pub main_content_started: bool,
    /// A break can be open without an ad playing (ad-loading gap)
    pub in_ad_break: bool,
    pub ad_started: bool,
    /// Gates ad classification (postroll vs others)
    pub content_complete: bool,
    /// Throttle watermark; -1 means "report the next position immediately"
    pub last_playhead_update: f64,
    /// One-shot: reload content metadata on the next content-play event
    pub load_content_metadata_after_ad: bool,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            content_playhead: 0.0,
            ad_playhead: 0.0,
            main_content_started: false,
            in_ad_break: false,
            ad_started: false,
            content_complete: false,
            last_playhead_update: -1.0,
            load_content_metadata_after_ad: false,
        }
    }
}

impl PlaybackState {
    /// Reset all transient playback state to initial values
    pub fn reset(&mut self) {
        *self = PlaybackState::default();
    }
}

/// Translates playback events into measurement protocol calls
#[derive(Debug, Default)]
pub struct Translator {
    state: PlaybackState,
    metadata: ContentMetadata,
}

impl Translator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current playback state (read-only)
    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    /// Accumulated content metadata
    pub fn metadata(&self) -> &ContentMetadata {
        &self.metadata
    }

    pub fn metadata_mut(&mut self) -> &mut ContentMetadata {
        &mut self.metadata
    }

    /// Reset transient playback state (replay, source change, teardown)
    pub fn reset(&mut self) {
        self.state.reset();
    }

    /// Consume exactly one event and return the resulting measurement
    /// calls, in emission order. Never panics.
    pub fn process(&mut self, event: PlaybackEvent) -> Vec<Emission> {
        match event {
            PlaybackEvent::ContentCompleted => self.on_content_completed(),
            PlaybackEvent::ContentPlaying => self.on_content_playing(),
            PlaybackEvent::Paused => self.on_paused(),
            PlaybackEvent::ReplayRequested => {
                self.state.reset();
                Vec::new()
            }
            PlaybackEvent::SourceChanged { asset_id } => {
                if let Some(asset_id) = asset_id {
                    self.metadata.set_asset_id(&asset_id);
                }
                self.state.reset();
                Vec::new()
            }
            PlaybackEvent::ContentMetadataUpdated { title, duration_ms } => {
                self.on_metadata_updated(title.as_deref(), duration_ms)
            }
            PlaybackEvent::StreamPositionChanged { position } => self.on_position(position),
            PlaybackEvent::AdBreakStarted => self.on_ad_break_started(),
            PlaybackEvent::AdBreakEnded => self.on_ad_break_ended(),
            PlaybackEvent::AdStarted { ad } => self.on_ad_started(ad),
            PlaybackEvent::AdEnded => self.on_ad_ended(),
        }
    }

    fn on_content_completed(&mut self) -> Vec<Emission> {
        self.state.content_complete = true;
        let playhead = floor_secs(self.state.content_playhead);
        debug!(playhead, "content complete");
        vec![(MetricCode::End, MetricPayload::Position(playhead))]
    }

    fn on_content_playing(&mut self) -> Vec<Emission> {
        self.state.main_content_started = true;
        if !self.state.load_content_metadata_after_ad {
            return Vec::new();
        }
        // One-shot: exactly one metadata reload per break-end -> resume.
        self.state.load_content_metadata_after_ad = false;
        debug!(
            playhead = self.state.content_playhead,
            "content metadata reload after ad break"
        );
        vec![(
            MetricCode::LoadMetadata,
            MetricPayload::Metadata(self.metadata.to_payload()),
        )]
    }

    fn on_paused(&mut self) -> Vec<Emission> {
        let playhead = if self.state.in_ad_break && self.state.ad_started {
            self.state.ad_playhead
        } else {
            self.state.content_playhead
        };
        let playhead = floor_secs(playhead);
        debug!(playhead, "stop on pause");
        vec![(MetricCode::Stop, MetricPayload::Position(playhead))]
    }

    fn on_metadata_updated(&mut self, title: Option<&str>, duration_ms: Option<f64>) -> Vec<Emission> {
        self.metadata.merge_stream_info(duration_ms, title);
        debug!(
            playhead = self.state.content_playhead,
            "initial content metadata load"
        );
        vec![(
            MetricCode::InitialLoadMetadata,
            MetricPayload::Metadata(self.metadata.to_payload()),
        )]
    }

    fn on_position(&mut self, position: f64) -> Vec<Emission> {
        let playhead = if self.state.in_ad_break {
            if !self.state.ad_started {
                // Ad-loading gap: position belongs to neither track.
                return Vec::new();
            }
            self.state.ad_playhead = position;
            position
        } else {
            self.state.content_playhead = position;
            position
        };

        // At most one report per whole second of playback; the watermark
        // keeps the raw value so fractional progress accumulates. A
        // position below the watermark is a backward seek and reports
        // immediately.
        if playhead >= 0.0
            && (playhead >= self.state.last_playhead_update + 1.0
                || playhead < self.state.last_playhead_update)
        {
            self.state.last_playhead_update = playhead;
            let reported = floor_secs(playhead);
            debug!(playhead = reported, in_ad_break = self.state.in_ad_break, "position report");
            return vec![(
                MetricCode::SetPlayheadPosition,
                MetricPayload::Position(reported),
            )];
        }
        Vec::new()
    }

    fn on_ad_break_started(&mut self) -> Vec<Emission> {
        self.state.in_ad_break = true;
        // Report the first playhead after this transition unconditionally.
        self.state.last_playhead_update = -1.0;

        if !self.state.main_content_started || self.state.content_complete {
            return Vec::new();
        }
        let playhead = floor_secs(self.state.content_playhead);
        debug!(playhead, "content interrupted by ad break");
        // Position report accounts for the second the break starts on.
        vec![
            (
                MetricCode::SetPlayheadPosition,
                MetricPayload::Position(playhead),
            ),
            (MetricCode::Stop, MetricPayload::Position(playhead)),
        ]
    }

    fn on_ad_break_ended(&mut self) -> Vec<Emission> {
        self.state.in_ad_break = false;
        self.state.last_playhead_update = -1.0;
        self.state.load_content_metadata_after_ad = true;
        Vec::new()
    }

    fn on_ad_started(&mut self, ad: Option<AdInfo>) -> Vec<Emission> {
        self.state.ad_started = true;
        let Some(ad) = ad else {
            // Malformed ad parameters suppress the emission only.
            return Vec::new();
        };

        // Classified exactly once, at ad start; never re-evaluated mid-ad.
        let ad_type = self.classify_ad();
        debug!(ad_type = %ad_type, ad_id = %ad.id, "ad metadata load");

        let mut payload = serde_json::Map::new();
        payload.insert("type".into(), ad_type.as_str().into());
        payload.insert("length".into(), ad.duration.into());
        payload.insert("assetid".into(), ad.id.into());
        vec![(MetricCode::LoadMetadata, MetricPayload::Metadata(payload))]
    }

    fn on_ad_ended(&mut self) -> Vec<Emission> {
        self.state.ad_started = false;
        let playhead = floor_secs(self.state.ad_playhead);
        self.state.ad_playhead = 0.0;
        self.state.last_playhead_update = -1.0;
        debug!(playhead, "ad ended");
        // Position report accounts for the second the ad ends on.
        vec![
            (
                MetricCode::SetPlayheadPosition,
                MetricPayload::Position(playhead),
            ),
            (MetricCode::Stop, MetricPayload::Position(playhead)),
        ]
    }

    fn classify_ad(&self) -> AdType {
        if self.state.content_playhead <= 0.0 {
            AdType::Preroll
        } else if self.state.content_complete {
            AdType::Postroll
        } else {
            AdType::Midroll
        }
    }
}

fn floor_secs(playhead: f64) -> u64 {
    playhead.max(0.0).floor() as u64
}
