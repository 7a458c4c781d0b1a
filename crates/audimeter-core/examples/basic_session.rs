//! Basic measurement session example
//!
//! Simulates a player session (content, a preroll ad, a pause) through the
//! analytics registry and prints every call the measurement SDK receives.
//!
//! Run with: cargo run -p audimeter-core --example basic_session

use audimeter_core::events::names;
use audimeter_core::plugin::mock::ScriptedProvider;
use audimeter_core::{AnalyticsRegistry, AudiencePlugin};
use serde_json::json;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "audimeter_core=info".into()),
        )
        .init();

    audimeter_core::init();

    println!("Audimeter Core - Basic Session Example");
    println!("=======================================\n");

    // In a real host the provider wraps the loaded SDK script; here a
    // scripted provider hands out recording sinks.
    let provider = ScriptedProvider::new(true);
    let recorded = provider.recorded();

    let mut registry = AnalyticsRegistry::new();
    registry.register(Box::new(AudiencePlugin::new(provider)));
    registry.set_plugin_metadata(&json!({
        "audimeter": {
            "apid": "T0000000-0000-0000-0000-000000000000",
            "sfcode": "dcr",
            "apn": "example-player",
            "program": "exampleProgram",
            "isfullepisode": "N"
        }
    }));

    // Content loads.
    registry.publish(
        names::VIDEO_SOURCE_CHANGED,
        &[json!({ "embedCode": "exampleEmbedCode" })],
    );
    registry.publish(
        names::VIDEO_CONTENT_METADATA_UPDATED,
        &[json!({ "title": "Example Episode", "duration": 120000.0 })],
    );

    // A preroll plays to completion.
    registry.publish(names::AD_BREAK_STARTED, &[]);
    registry.publish(
        names::AD_STARTED,
        &[json!({ "adId": "examplePreroll", "adDuration": 15.0 })],
    );
    for position in [1.0, 5.0, 10.0, 15.0] {
        registry.publish(
            names::VIDEO_STREAM_POSITION_CHANGED,
            &[json!({ "streamPosition": position })],
        );
    }
    registry.publish(names::AD_ENDED, &[]);
    registry.publish(names::AD_BREAK_ENDED, &[]);

    // Content plays, gets paused, resumes.
    registry.publish(names::VIDEO_PLAYING, &[]);
    for position in [1.0, 2.0, 3.5, 5.0] {
        registry.publish(
            names::VIDEO_STREAM_POSITION_CHANGED,
            &[json!({ "streamPosition": position })],
        );
    }
    registry.publish(names::VIDEO_PAUSED, &[]);
    registry.publish(names::VIDEO_PLAYING, &[]);
    registry.publish(
        names::VIDEO_STREAM_POSITION_CHANGED,
        &[json!({ "streamPosition": 6.0 })],
    );

    println!("Calls received by the measurement SDK:");
    println!("---------------------------------------");
    for (code, payload) in &recorded.borrow().calls {
        println!("  {code} -> {payload:?}");
    }

    registry.destroy();
    println!("\nExample complete!");
}
