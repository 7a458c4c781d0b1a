//! Host plugin surface
//!
//! [`AnalyticsPlugin`] is the fixed capability surface every plugin variant
//! implements identically in signature; [`AudiencePlugin`] is the
//! measurement implementation wiring the translator to the sink
//! dispatcher. Event processing never panics and never reports errors
//! across the event boundary: failures degrade to suppressed emissions.

use crate::events::PlaybackEvent;
use crate::framework::RecordedEvent;
use crate::metadata::ContentConfig;
use crate::sink::{MeasurementSink, SinkDispatcher};
use crate::translator::Translator;
use crate::types::PluginId;
use serde_json::Value;
use std::rc::Rc;
use tracing::{debug, info, warn};

const PLUGIN_NAME: &str = "audimeter";
const PLUGIN_VERSION: &str = "v1";

/// Readiness seam over the externally bootstrapped SDK.
///
/// Returns a constructed sink once the SDK script has loaded, `None`
/// before that. Queried eagerly at plugin initialization, whenever
/// configuration arrives, and from the out-of-band readiness signal.
pub trait SdkProvider {
    fn try_instance(&self) -> Option<Box<dyn MeasurementSink>>;
}

/// Fixed plugin capability surface required by the host framework
pub trait AnalyticsPlugin {
    fn name(&self) -> &'static str;
    fn version(&self) -> &'static str;
    fn set_plugin_id(&mut self, id: PluginId);
    fn plugin_id(&self) -> Option<PluginId>;
    fn is_active(&self) -> bool;
    fn make_active(&mut self);
    fn make_inactive(&mut self);
    /// Called once at registration with the events recorded before this
    /// plugin existed; they replay through the normal processing path.
    fn init(&mut self, recorded_events: &[RecordedEvent]);
    fn set_metadata(&mut self, metadata: &Value);
    fn process_event(&mut self, name: &str, params: &[Value]);
    fn destroy(&mut self);
}

/// Audience measurement plugin
pub struct AudiencePlugin {
    id: Option<PluginId>,
    active: bool,
    translator: Translator,
    dispatcher: SinkDispatcher,
    config: Option<ContentConfig>,
    provider: Rc<dyn SdkProvider>,
}

impl AudiencePlugin {
    pub fn new(provider: Rc<dyn SdkProvider>) -> Self {
        Self {
            id: None,
            active: true,
            translator: Translator::new(),
            dispatcher: SinkDispatcher::new(),
            config: None,
            provider,
        }
    }

    /// Out-of-band SDK readiness signal. Harmless to call any number of
    /// times; the first successful construction wins.
    pub fn notify_sdk_ready(&mut self) {
        self.try_setup();
    }

    /// True once the downstream sink has been constructed
    pub fn is_sink_ready(&self) -> bool {
        self.dispatcher.is_attached()
    }

    /// Calls waiting for the sink to become available
    pub fn pending_calls(&self) -> usize {
        self.dispatcher.pending_len()
    }

    fn try_setup(&mut self) {
        if self.dispatcher.is_attached() {
            return;
        }
        let Some(config) = &self.config else {
            debug!("sink setup deferred: no configuration yet");
            return;
        };
        match self.provider.try_instance() {
            Some(sink) => self.dispatcher.attach(sink, &config.sdk),
            None => debug!("sink setup deferred: SDK not ready"),
        }
    }
}

impl AnalyticsPlugin for AudiencePlugin {
    fn name(&self) -> &'static str {
        PLUGIN_NAME
    }

    fn version(&self) -> &'static str {
        PLUGIN_VERSION
    }

    fn set_plugin_id(&mut self, id: PluginId) {
        self.id = Some(id);
    }

    fn plugin_id(&self) -> Option<PluginId> {
        self.id
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn make_active(&mut self) {
        self.active = true;
    }

    fn make_inactive(&mut self) {
        self.active = false;
    }

    fn init(&mut self, recorded_events: &[RecordedEvent]) {
        for recorded in recorded_events {
            self.process_event(&recorded.name, &recorded.params);
        }
        self.try_setup();
    }

    fn set_metadata(&mut self, metadata: &Value) {
        debug!(plugin_id = ?self.id, "received plugin metadata");
        match serde_json::from_value::<ContentConfig>(metadata.clone()) {
            Ok(config) => {
                self.translator.metadata_mut().apply_config(&config);
                self.config = Some(config);
                self.try_setup();
            }
            Err(err) => warn!(error = %err, "ignoring malformed plugin metadata"),
        }
    }

    fn process_event(&mut self, name: &str, params: &[Value]) {
        let Some(event) = PlaybackEvent::from_host(name, params) else {
            debug!(event = name, "ignoring unhandled event");
            return;
        };
        for (code, payload) in self.translator.process(event) {
            self.dispatcher.emit(code, payload);
        }
    }

    fn destroy(&mut self) {
        info!(plugin_id = ?self.id, "destroying measurement plugin");
        self.translator.reset();
        self.dispatcher.teardown();
        self.active = false;
    }
}

pub mod mock {
    //! Scripted SDK provider for tests and demos

    use super::*;
    use crate::sink::mock::{Recorded, RecordingSink};
    use std::cell::{Cell, RefCell};

    /// Provider whose readiness is flipped by the test, handing out sinks
    /// that all record into one shared [`Recorded`]
    pub struct ScriptedProvider {
        ready: Cell<bool>,
        recorded: Rc<RefCell<Recorded>>,
    }

    impl ScriptedProvider {
        pub fn new(ready: bool) -> Rc<Self> {
            Rc::new(Self {
                ready: Cell::new(ready),
                recorded: Rc::new(RefCell::new(Recorded::default())),
            })
        }

        pub fn set_ready(&self, ready: bool) {
            self.ready.set(ready);
        }

        pub fn recorded(&self) -> Rc<RefCell<Recorded>> {
            Rc::clone(&self.recorded)
        }
    }

    impl SdkProvider for ScriptedProvider {
        fn try_instance(&self) -> Option<Box<dyn MeasurementSink>> {
            if !self.ready.get() {
                return None;
            }
            Some(Box::new(RecordingSink::with_recorded(Rc::clone(
                &self.recorded,
            ))))
        }
    }
}
