//! Audimeter Core - Audience Measurement Plugin for Video Players
//!
//! This crate translates a player's playback lifecycle events into calls
//! against an audience-measurement SDK's fixed event vocabulary:
//! - Playback event translation state machine (content, ads, ad breaks)
//! - Playhead throttling (at most one position report per second)
//! - Content and ad metadata assembly
//! - Deferred metric dispatch while the downstream SDK is not yet ready
//! - Bounded-wait SDK script bootstrap
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                       Audimeter Core                            │
//! ├─────────────────────────────────────────────────────────────────┤
//! │                                                                 │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────┐          │
//! │  │   Analytics  │  │    Event     │  │   Metadata   │          │
//! │  │   Registry   │  │    Parser    │  │   Assembly   │          │
//! │  └──────┬───────┘  └──────┬───────┘  └──────┬───────┘          │
//! │         │                 │                 │                   │
//! │         └─────────────────┼─────────────────┘                   │
//! │                           │                                     │
//! │                    ┌──────┴──────┐                              │
//! │                    │  Playback   │                              │
//! │                    │ Translator  │                              │
//! │                    └──────┬──────┘                              │
//! │                           │                                     │
//! │  ┌──────────────┐  ┌──────┴──────┐  ┌──────────────┐           │
//! │  │     SDK      │  │    Sink     │  │  Measurement │           │
//! │  │   Loader     │  │ Dispatcher  │  │     Sink     │           │
//! │  └──────────────┘  └─────────────┘  └──────────────┘           │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod error;
pub mod types;
pub mod events;
pub mod metadata;
pub mod translator;
pub mod sink;
pub mod plugin;
pub mod framework;
pub mod loader;

pub use error::{Error, Result};
pub use types::*;
pub use events::PlaybackEvent;
pub use metadata::{ContentConfig, ContentMetadata};
pub use translator::{PlaybackState, Translator};
pub use sink::{Emission, MeasurementSink, SinkDispatcher};
pub use plugin::{AnalyticsPlugin, AudiencePlugin, SdkProvider};
pub use framework::{AnalyticsRegistry, RecordedEvent};
pub use loader::{load_sdk, SdkScriptLoader};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the measurement library with default configuration
pub fn init() {
    tracing::info!(version = VERSION, "Audimeter Core initialized");
}
