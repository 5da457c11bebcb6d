//! Permission and overlay-service gateway.
//!
//! The single place where platform failures are absorbed: boolean queries
//! collapse to `false`, void commands to a logged no-op. Callers can assume
//! every method returns normally. Permission absence and permission-check
//! failure are deliberately indistinguishable.

use quill_bubble::IndicatorSink;
use quill_platform::{PlatformError, PlatformOps};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Boundary wrapper around the platform's permission and service calls.
///
/// Permission checks always hit the platform fresh, with no caching and no
/// staleness guarantee. Service start/stop is idempotent: the gateway
/// tracks whether a start was issued and skips redundant calls.
pub struct Gateway {
    platform: Arc<dyn PlatformOps>,
    service_started: AtomicBool,
}

impl Gateway {
    pub fn new(platform: Arc<dyn PlatformOps>) -> Self {
        Self {
            platform,
            service_started: AtomicBool::new(false),
        }
    }

    /// Fresh overlay-draw permission query. `false` on failure.
    pub fn check_overlay_permission(&self) -> bool {
        self.platform
            .check_overlay_permission()
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "overlay permission check failed");
                false
            })
    }

    /// Fresh accessibility-observation permission query. `false` on failure.
    pub fn check_accessibility_enabled(&self) -> bool {
        self.platform
            .check_accessibility_enabled()
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "accessibility check failed");
                false
            })
    }

    /// Both permissions granted, each queried fresh.
    pub fn has_all_permissions(&self) -> bool {
        self.check_overlay_permission() && self.check_accessibility_enabled()
    }

    /// Open the overlay permission dialog. Log-only on failure.
    pub fn request_overlay_permission(&self) {
        if let Err(e) = self.platform.request_overlay_permission() {
            tracing::warn!(error = %e, "could not open overlay permission dialog");
        }
    }

    /// Open the accessibility settings pane. Log-only on failure.
    pub fn open_accessibility_settings(&self) {
        if let Err(e) = self.platform.open_accessibility_settings() {
            tracing::warn!(error = %e, "could not open accessibility settings");
        }
    }

    /// Start the observation + rendering service.
    ///
    /// A no-op if already started. A platform failure is swallowed; the
    /// caller cannot tell "started" from "attempted and failed" except via
    /// [`Gateway::is_indicator_visible`].
    pub fn start_service(&self) {
        if self
            .service_started
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            tracing::debug!("service already started, ignoring");
            return;
        }

        if let Err(e) = self.platform.start_overlay_service() {
            tracing::warn!(error = %e, "overlay service start failed");
        } else {
            tracing::info!("overlay service started");
        }
    }

    /// Stop the observation + rendering service. A no-op if not started.
    pub fn stop_service(&self) {
        if self
            .service_started
            .compare_exchange(true, false, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            tracing::debug!("service not started, ignoring stop");
            return;
        }

        if let Err(e) = self.platform.stop_overlay_service() {
            tracing::warn!(error = %e, "overlay service stop failed");
        } else {
            tracing::info!("overlay service stopped");
        }
    }

    /// Best-effort indicator visibility. `false` when indeterminate.
    pub fn is_indicator_visible(&self) -> bool {
        self.platform.is_indicator_visible().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "indicator visibility query failed");
            false
        })
    }

    /// Force one show/auto-hide cycle, for diagnostics.
    pub fn trigger_test_render(&self) {
        if let Err(e) = self.platform.trigger_test_render() {
            tracing::warn!(error = %e, "test render failed");
        }
    }
}

/// Render seam for the bubble controller. Errors propagate here so the
/// controller can log them; it transitions state regardless.
impl IndicatorSink for Gateway {
    fn show_indicator(&self) -> Result<(), PlatformError> {
        self.platform.show_indicator()
    }

    fn hide_indicator(&self) -> Result<(), PlatformError> {
        self.platform.hide_indicator()
    }
}

impl std::fmt::Debug for Gateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gateway")
            .field(
                "service_started",
                &self.service_started.load(Ordering::SeqCst),
            )
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_platform::MockPlatform;

    fn gateway(platform: &Arc<MockPlatform>) -> Gateway {
        Gateway::new(Arc::clone(platform) as Arc<dyn PlatformOps>)
    }

    #[test]
    fn test_permission_checks_are_fresh() {
        let platform = Arc::new(MockPlatform::new());
        let gw = gateway(&platform);

        assert!(!gw.check_overlay_permission());
        platform.set_overlay_granted(true);
        assert!(gw.check_overlay_permission());

        assert!(!gw.has_all_permissions());
        platform.set_accessibility_enabled(true);
        assert!(gw.has_all_permissions());
    }

    #[test]
    fn test_failure_maps_to_false() {
        let platform = Arc::new(MockPlatform::granted());
        let gw = gateway(&platform);

        platform.set_failing(true);
        assert!(!gw.check_overlay_permission());
        assert!(!gw.check_accessibility_enabled());
        assert!(!gw.is_indicator_visible());

        // Void commands swallow failures too.
        gw.request_overlay_permission();
        gw.open_accessibility_settings();
        gw.trigger_test_render();
    }

    #[test]
    fn test_start_stop_idempotent() {
        let platform = Arc::new(MockPlatform::granted());
        let gw = gateway(&platform);

        gw.start_service();
        gw.start_service();
        gw.start_service();
        assert_eq!(platform.start_service_calls.load(Ordering::SeqCst), 1);

        gw.stop_service();
        gw.stop_service();
        assert_eq!(platform.stop_service_calls.load(Ordering::SeqCst), 1);

        // Start/stop cycles keep working.
        gw.start_service();
        assert_eq!(platform.start_service_calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_stop_without_start_is_a_noop() {
        let platform = Arc::new(MockPlatform::new());
        let gw = gateway(&platform);

        gw.stop_service();
        assert_eq!(platform.stop_service_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_indicator_sink_delegates() {
        let platform = Arc::new(MockPlatform::new());
        let gw = gateway(&platform);

        gw.show_indicator().unwrap();
        assert!(gw.is_indicator_visible());
        gw.hide_indicator().unwrap();
        assert!(!gw.is_indicator_visible());
    }
}
