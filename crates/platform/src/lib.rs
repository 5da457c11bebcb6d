//! Platform boundary for quill.
//!
//! The host OS layer - accessibility observation, floating-window rendering,
//! permission dialogs - is out of scope for this workspace and is modeled as
//! injected trait objects. This crate defines those traits plus the
//! implementations shipped with the workspace:
//!
//! - [`NullPlatform`] - inert implementation for unsupported platforms
//! - [`MockPlatform`] - recording test double with failure injection
//! - [`SimPlatform`] - scripted signal replay for headless demos
//!
//! All boundary calls are synchronous, bounded round-trips with no timeout
//! or cancellation; a hang in the OS layer hangs the caller.

mod error;
mod mock;
mod null;
mod sim;

use std::sync::Arc;

pub use error::PlatformError;
pub use mock::MockPlatform;
pub use null::NullPlatform;
pub use sim::{SimPlatform, SimSignal};

/// Zero-argument signal notification delivered by the observation layer.
pub type SignalCallback = Arc<dyn Fn() + Send + Sync>;

/// Outbound calls from the core into the platform layer.
///
/// Every method is a fresh query or a fire-and-forget command; nothing here
/// is cached by implementations. Errors never escape past the gateway.
pub trait PlatformOps: Send + Sync {
    /// Whether the overlay-draw permission is currently granted.
    fn check_overlay_permission(&self) -> Result<bool, PlatformError>;

    /// Navigate the user to the overlay permission dialog.
    fn request_overlay_permission(&self) -> Result<(), PlatformError>;

    /// Whether the accessibility-observation permission is currently enabled.
    fn check_accessibility_enabled(&self) -> Result<bool, PlatformError>;

    /// Navigate the user to the accessibility settings pane.
    fn open_accessibility_settings(&self) -> Result<(), PlatformError>;

    /// Start the background observation + rendering process.
    fn start_overlay_service(&self) -> Result<(), PlatformError>;

    /// Stop the background observation + rendering process.
    fn stop_overlay_service(&self) -> Result<(), PlatformError>;

    /// Render the floating indicator.
    fn show_indicator(&self) -> Result<(), PlatformError>;

    /// Remove the floating indicator.
    fn hide_indicator(&self) -> Result<(), PlatformError>;

    /// Force one show/auto-hide cycle, for diagnostics.
    fn trigger_test_render(&self) -> Result<(), PlatformError>;

    /// Whether the floating indicator is currently rendered.
    fn is_indicator_visible(&self) -> Result<bool, PlatformError>;
}

/// Inbound focus-signal registration.
///
/// At most one listener pair is active at a time: a later registration
/// replaces the prior one rather than adding to it.
pub trait FocusObserver: Send + Sync {
    /// Register the callback pair invoked on focus/unfocus signals.
    fn set_focus_listener(&self, on_focus: SignalCallback, on_unfocus: SignalCallback);

    /// Deregister the current listener pair, if any.
    fn clear_focus_listener(&self);
}
