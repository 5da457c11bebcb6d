//! Overlay coordinator facade for quill.
//!
//! Composes one [`Gateway`], one [`FocusBridge`] and one
//! [`BubbleController`] into the public surface a consuming application
//! talks to: lifecycle (`initialize`/`dispose`), permission queries and
//! navigation, service start/stop, the two focus-event channels, status
//! snapshots and the one-call quick setup.
//!
//! Everything is wired explicitly at construction - no globals, no
//! singletons. One `Quill` per process preserves the shared-instance
//! semantics without hidden state.
//!
//! # Example
//!
//! ```
//! use quill_app::{OverlayConfig, Quill};
//! use quill_platform::MockPlatform;
//! use std::sync::Arc;
//!
//! let platform = Arc::new(MockPlatform::granted());
//! let quill = Quill::new(platform, OverlayConfig::default());
//!
//! let report = quill.quick_setup();
//! assert!(report.initialized);
//! assert!(report.service_started);
//! ```

mod config;
mod status;

use quill_bubble::BubbleController;
use quill_events::{FocusBridge, Subscription};
use quill_gateway::Gateway;
use quill_platform::{FocusObserver, PlatformOps};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub use config::OverlayConfig;
pub use status::{QuickSetupReport, StatusSnapshot};

// Re-export the classifier: it is the documented contract the observation
// layer applies before delivering focus signals.
pub use quill_detect::{is_text_input, ElementInfo};

/// The overlay lifecycle coordinator.
///
/// No public method panics or returns an error: platform failures are
/// absorbed at the gateway, and calls before `initialize` (or after
/// `dispose`) simply operate in the unregistered state.
pub struct Quill {
    config: OverlayConfig,
    gateway: Arc<Gateway>,
    bridge: FocusBridge,
    bubble: Arc<BubbleController>,
    bubble_sub: Mutex<Option<Subscription>>,
    initialized: AtomicBool,
}

impl Quill {
    /// Build a coordinator against the given platform, with the default
    /// auto-hide delay.
    pub fn new<P>(platform: Arc<P>, config: OverlayConfig) -> Self
    where
        P: PlatformOps + FocusObserver + 'static,
    {
        Self::with_hide_delay(platform, config, quill_bubble::DEFAULT_HIDE_DELAY)
    }

    /// Build a coordinator with a custom auto-hide delay (test hook; the
    /// shipped default is [`quill_bubble::DEFAULT_HIDE_DELAY`]).
    pub fn with_hide_delay<P>(platform: Arc<P>, config: OverlayConfig, hide_delay: Duration) -> Self
    where
        P: PlatformOps + FocusObserver + 'static,
    {
        let ops: Arc<dyn PlatformOps> = platform.clone();
        let observer: Arc<dyn FocusObserver> = platform;

        let gateway = Arc::new(Gateway::new(ops));
        let sink: quill_bubble::IndicatorSinkRef = gateway.clone();
        let bubble = Arc::new(BubbleController::with_hide_delay(sink, hide_delay));

        Self {
            config,
            gateway,
            bridge: FocusBridge::new(observer),
            bubble,
            bubble_sub: Mutex::new(None),
            initialized: AtomicBool::new(false),
        }
    }

    /// The configuration this coordinator was built with.
    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    /// Register the focus listener and wire the bubble controller.
    ///
    /// Idempotent: repeat calls return true without re-registering.
    /// Returns false only after [`Quill::dispose`].
    pub fn initialize(&self) -> bool {
        if self.initialized.load(Ordering::SeqCst) {
            return true;
        }

        if !self.bridge.initialize() {
            return false;
        }

        let mut sub = self.bubble_sub.lock().unwrap();
        if sub.is_none() {
            let bubble = Arc::clone(&self.bubble);
            *sub = Some(self.bridge.focused().subscribe(move || bubble.on_focus()));
        }
        drop(sub);

        self.initialized.store(true, Ordering::SeqCst);
        tracing::info!("quill initialized");
        true
    }

    /// Tear down the listener, the event channels and the controller.
    ///
    /// Idempotent, safe without a prior initialize, and every public call
    /// afterwards still returns normally.
    pub fn dispose(&self) {
        self.initialized.store(false, Ordering::SeqCst);
        self.bubble_sub.lock().unwrap().take();
        self.bridge.dispose();
        self.bubble.close();
        self.bubble.shutdown();
        tracing::info!("quill disposed");
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    /// Channel delivering one signal per text-focus event.
    pub fn focused(&self) -> &quill_events::Broadcast {
        self.bridge.focused()
    }

    /// Channel delivering one signal per text-unfocus event.
    pub fn unfocused(&self) -> &quill_events::Broadcast {
        self.bridge.unfocused()
    }

    pub fn check_overlay_permission(&self) -> bool {
        self.gateway.check_overlay_permission()
    }

    pub fn check_accessibility_enabled(&self) -> bool {
        self.gateway.check_accessibility_enabled()
    }

    pub fn has_all_permissions(&self) -> bool {
        self.gateway.has_all_permissions()
    }

    pub fn request_overlay_permission(&self) {
        self.gateway.request_overlay_permission();
    }

    pub fn open_accessibility_settings(&self) {
        self.gateway.open_accessibility_settings();
    }

    pub fn start_service(&self) {
        self.gateway.start_service();
    }

    pub fn stop_service(&self) {
        self.gateway.stop_service();
    }

    pub fn trigger_test_render(&self) {
        self.gateway.trigger_test_render();
    }

    pub fn is_indicator_visible(&self) -> bool {
        self.gateway.is_indicator_visible()
    }

    /// Explicit-close path: hide the indicator now, cancel the countdown.
    pub fn close_indicator(&self) {
        self.bubble.close();
    }

    /// Initialize, check both permissions, and start the service only when
    /// both are already granted. Never opens a permission dialog.
    ///
    /// The window between the permission checks and the service start is
    /// consciously unguarded; callers wanting certainty should re-query.
    pub fn quick_setup(&self) -> QuickSetupReport {
        if !self.initialize() {
            tracing::warn!("quick setup aborted, initialization failed");
            return QuickSetupReport::default();
        }

        let overlay_permission = self.gateway.check_overlay_permission();
        let accessibility_enabled = self.gateway.check_accessibility_enabled();
        let service_started = overlay_permission && accessibility_enabled;

        if service_started {
            self.gateway.start_service();
        } else {
            tracing::info!(
                overlay_permission,
                accessibility_enabled,
                "quick setup leaving service stopped, permissions missing"
            );
        }

        QuickSetupReport {
            initialized: true,
            overlay_permission,
            accessibility_enabled,
            service_started,
        }
    }

    /// Full status snapshot; every field re-queried on each call.
    pub fn get_status(&self) -> StatusSnapshot {
        StatusSnapshot {
            initialized: self.is_initialized(),
            overlay_permission: self.gateway.check_overlay_permission(),
            accessibility_enabled: self.gateway.check_accessibility_enabled(),
            indicator_visible: self.gateway.is_indicator_visible(),
            timestamp_ms: chrono::Utc::now().timestamp_millis(),
        }
    }
}

impl Drop for Quill {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl std::fmt::Debug for Quill {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Quill")
            .field("initialized", &self.is_initialized())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
