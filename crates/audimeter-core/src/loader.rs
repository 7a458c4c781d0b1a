//! SDK script bootstrap
//!
//! The only asynchronous piece of the crate: a bounded wait for the
//! measurement SDK script to load. A timeout is terminal for the session
//! -- no retry, no error surface beyond the returned `Result` and a log
//! line; the plugin simply keeps buffering.

use crate::error::{Error, Result};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{info, warn};

/// Seam over the host's script-loading mechanism
#[async_trait(?Send)]
pub trait SdkScriptLoader {
    /// Resolve once the SDK script is loaded and its global is available
    async fn load(&self, url: &str) -> Result<()>;
}

/// Load the SDK script, waiting at most `timeout`.
///
/// Use [`crate::types::SDK_LOAD_TIMEOUT`] unless the host dictates
/// otherwise. On success the caller should signal the plugin via
/// [`crate::AudiencePlugin::notify_sdk_ready`].
pub async fn load_sdk(
    loader: &dyn SdkScriptLoader,
    url: &str,
    timeout: Duration,
) -> Result<()> {
    match tokio::time::timeout(timeout, loader.load(url)).await {
        Ok(Ok(())) => {
            info!(url, "measurement SDK script loaded");
            Ok(())
        }
        Ok(Err(err)) => {
            warn!(url, error = %err, "measurement SDK script failed to load");
            Err(err)
        }
        Err(_) => {
            let timeout_ms = timeout.as_millis() as u64;
            warn!(url, timeout_ms, "measurement SDK load timed out; metrics stay buffered");
            Err(Error::SdkLoadTimeout { timeout_ms })
        }
    }
}
