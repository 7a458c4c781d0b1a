//! Measurement sink and deferred-send buffering
//!
//! `SinkDispatcher::emit` is the sole path by which the translator's
//! emissions reach the downstream SDK. While the SDK instance has not been
//! constructed, calls queue in order; the moment a sink attaches they are
//! drained FIFO through the same forwarding path.

use crate::types::{MetricCode, MetricPayload, SdkConfig};
use std::collections::VecDeque;
use tracing::{debug, info, warn};

/// A single measurement call: metric code plus payload
pub type Emission = (MetricCode, MetricPayload);

/// Downstream measurement SDK instance
pub trait MeasurementSink {
    /// One-time construction call carrying the identifying credentials
    fn initialize(&mut self, config: &SdkConfig);

    /// Post one metric keyed by its numeric code
    fn post(&mut self, code: MetricCode, payload: &MetricPayload);
}

/// Forwards emissions to the sink, buffering while it is unavailable
#[derive(Default)]
pub struct SinkDispatcher {
    handle: Option<Box<dyn MeasurementSink>>,
    pending: VecDeque<Emission>,
}

impl SinkDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// True once a sink has been attached
    pub fn is_attached(&self) -> bool {
        self.handle.is_some()
    }

    /// Number of calls waiting for a sink
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Emit one measurement call.
    ///
    /// Forwarded immediately when a sink is attached; otherwise the call is
    /// queued (the payload is owned, so later caller-side mutation cannot
    /// reach it). The queue is unbounded: under permanent SDK
    /// unavailability it grows with every emission.
    pub fn emit(&mut self, code: MetricCode, payload: MetricPayload) {
        if let MetricPayload::Metadata(_) = payload {
            // Metadata must always carry a type downstream.
            if payload.metadata_type().map_or(true, str::is_empty) {
                warn!(code = %code, "dropping metadata payload without type");
                return;
            }
        }

        match self.handle.as_mut() {
            Some(sink) => {
                debug!(code = %code, "posting metric");
                sink.post(code, &payload);
            }
            None => {
                debug!(code = %code, queued = self.pending.len() + 1, "sink unavailable, queueing metric");
                self.pending.push_back((code, payload));
            }
        }
    }

    /// Attach the constructed sink, initialize it, and drain the pending
    /// queue in enqueue order. Idempotent: a second attach is a no-op.
    pub fn attach(&mut self, mut sink: Box<dyn MeasurementSink>, config: &SdkConfig) {
        if self.handle.is_some() {
            debug!("sink already attached, ignoring");
            return;
        }

        sink.initialize(config);
        info!(pending = self.pending.len(), "measurement sink attached");
        self.handle = Some(sink);

        while let Some((code, payload)) = self.pending.pop_front() {
            if let Some(sink) = self.handle.as_mut() {
                debug!(code = %code, "posting queued metric");
                sink.post(code, &payload);
            }
        }
    }

    /// Drop the sink handle and any pending calls (teardown only)
    pub fn teardown(&mut self) {
        let pending_dropped = self.pending.len();
        if pending_dropped > 0 {
            info!(pending_dropped, "discarding queued metrics at teardown");
        }
        self.pending.clear();
        self.handle = None;
    }
}

impl std::fmt::Debug for SinkDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SinkDispatcher")
            .field("attached", &self.handle.is_some())
            .field("pending", &self.pending.len())
            .finish()
    }
}

pub mod mock {
    //! Recording sink for tests and demos

    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Everything a [`RecordingSink`] observed
    #[derive(Debug, Clone, Default)]
    pub struct Recorded {
        pub init_configs: Vec<SdkConfig>,
        pub calls: Vec<Emission>,
    }

    impl Recorded {
        /// Calls matching one metric code, in arrival order
        pub fn calls_for(&self, code: MetricCode) -> Vec<MetricPayload> {
            self.calls
                .iter()
                .filter(|(c, _)| *c == code)
                .map(|(_, p)| p.clone())
                .collect()
        }

        /// Drain every recorded call, leaving the log empty
        pub fn take_calls(&mut self) -> Vec<Emission> {
            std::mem::take(&mut self.calls)
        }
    }

    /// Measurement sink that records every call it receives
    #[derive(Debug, Default)]
    pub struct RecordingSink {
        recorded: Rc<RefCell<Recorded>>,
    }

    impl RecordingSink {
        pub fn new() -> Self {
            Self::default()
        }

        /// Sink writing into an existing recording (shared across attaches)
        pub fn with_recorded(recorded: Rc<RefCell<Recorded>>) -> Self {
            Self { recorded }
        }

        /// Shared view into the recording, usable after the sink is boxed
        pub fn recorded(&self) -> Rc<RefCell<Recorded>> {
            Rc::clone(&self.recorded)
        }
    }

    impl MeasurementSink for RecordingSink {
        fn initialize(&mut self, config: &SdkConfig) {
            self.recorded.borrow_mut().init_configs.push(config.clone());
        }

        fn post(&mut self, code: MetricCode, payload: &MetricPayload) {
            self.recorded
                .borrow_mut()
                .calls
                .push((code, payload.clone()));
        }
    }
}
