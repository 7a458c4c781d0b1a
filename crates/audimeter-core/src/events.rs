//! Host playback event vocabulary and parsing
//!
//! The host framework delivers events as a name plus positional JSON
//! parameters. Parsing turns them into a finite tagged enum so translator
//! dispatch is exhaustive; unknown names are dropped at this boundary.

use serde_json::Value;

/// Canonical host event names
pub mod names {
    pub const CONTENT_COMPLETED: &str = "contentCompleted";
    pub const VIDEO_PLAYING: &str = "videoPlaying";
    pub const VIDEO_PAUSED: &str = "videoPaused";
    pub const VIDEO_REPLAY_REQUESTED: &str = "videoReplayRequested";
    pub const VIDEO_SOURCE_CHANGED: &str = "videoSourceChanged";
    pub const VIDEO_CONTENT_METADATA_UPDATED: &str = "videoContentMetadataUpdated";
    pub const VIDEO_STREAM_POSITION_CHANGED: &str = "videoStreamPositionChanged";
    pub const AD_BREAK_STARTED: &str = "adBreakStarted";
    pub const AD_BREAK_ENDED: &str = "adBreakEnded";
    pub const AD_STARTED: &str = "adStarted";
    pub const AD_ENDED: &str = "adEnded";
}

/// Descriptive fields delivered with an ad-started event
#[derive(Debug, Clone, PartialEq)]
pub struct AdInfo {
    /// Ad asset identifier
    pub id: String,
    /// Ad length in seconds (not floored; sent as-is in metadata)
    pub duration: f64,
}

/// A playback lifecycle event, parsed from the host's `(name, params)` form
#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackEvent {
    /// Main content finished
    ContentCompleted,
    /// Main content is playing (initial start or resume after an ad)
    ContentPlaying,
    /// Playback paused (content or ad)
    Paused,
    /// Replay of the same content requested
    ReplayRequested,
    /// Player switched to a different asset
    SourceChanged {
        /// New asset identifier; absent when the host omitted it
        asset_id: Option<String>,
    },
    /// Descriptive stream metadata became available
    ContentMetadataUpdated {
        title: Option<String>,
        /// Content length in milliseconds
        duration_ms: Option<f64>,
    },
    /// Playhead moved (content or ad, depending on ad-break state)
    StreamPositionChanged { position: f64 },
    /// An ad break opened (no ad is necessarily playing yet)
    AdBreakStarted,
    /// The ad break closed; content is about to resume
    AdBreakEnded,
    /// An individual ad started
    AdStarted {
        /// Absent when the host delivered malformed ad parameters; the
        /// state transition still applies, the metadata emission does not.
        ad: Option<AdInfo>,
    },
    /// The individual ad finished
    AdEnded,
}

impl PlaybackEvent {
    /// Parse a host event. Returns `None` for unknown event names and for
    /// known names whose required parameters are absent entirely.
    pub fn from_host(name: &str, params: &[Value]) -> Option<PlaybackEvent> {
        let first = params.first();
        match name {
            names::CONTENT_COMPLETED => Some(PlaybackEvent::ContentCompleted),
            names::VIDEO_PLAYING => Some(PlaybackEvent::ContentPlaying),
            names::VIDEO_PAUSED => Some(PlaybackEvent::Paused),
            names::VIDEO_REPLAY_REQUESTED => Some(PlaybackEvent::ReplayRequested),
            names::VIDEO_SOURCE_CHANGED => Some(PlaybackEvent::SourceChanged {
                asset_id: first
                    .and_then(|p| p.get("embedCode"))
                    .and_then(Value::as_str)
                    .map(str::to_owned),
            }),
            names::VIDEO_CONTENT_METADATA_UPDATED => {
                // No object parameter means nothing to merge and nothing
                // to emit; drop the event entirely.
                let obj = first?.as_object()?;
                Some(PlaybackEvent::ContentMetadataUpdated {
                    title: obj.get("title").and_then(Value::as_str).map(str::to_owned),
                    duration_ms: obj.get("duration").and_then(Value::as_f64),
                })
            }
            names::VIDEO_STREAM_POSITION_CHANGED => {
                let position = first?.get("streamPosition")?.as_f64()?;
                Some(PlaybackEvent::StreamPositionChanged { position })
            }
            names::AD_BREAK_STARTED => Some(PlaybackEvent::AdBreakStarted),
            names::AD_BREAK_ENDED => Some(PlaybackEvent::AdBreakEnded),
            names::AD_STARTED => {
                let ad = first.and_then(|p| {
                    let id = p.get("adId")?.as_str()?.to_owned();
                    let duration = p.get("adDuration")?.as_f64()?;
                    Some(AdInfo { id, duration })
                });
                Some(PlaybackEvent::AdStarted { ad })
            }
            names::AD_ENDED => Some(PlaybackEvent::AdEnded),
            _ => None,
        }
    }
}
