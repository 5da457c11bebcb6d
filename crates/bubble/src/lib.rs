//! Debounced floating-indicator lifecycle.
//!
//! A [`BubbleController`] owns exactly one auto-hide countdown: a focus
//! signal shows the indicator and arms the countdown, repeated signals
//! restart it instead of stacking timers, and an expiry or explicit close
//! hides the indicator. Render side effects go through the [`IndicatorSink`]
//! seam; a sink failure is logged and the state transition happens anyway,
//! matching the fire-and-forget nature of the callback boundary.

mod controller;

use quill_platform::PlatformError;
use std::sync::Arc;
use std::time::Duration;

pub use controller::BubbleController;

/// Delay between the last focus signal and the automatic hide.
///
/// `OverlayConfig::auto_hide_ms` is the intended future knob for this; the
/// running controller does not consume it yet.
pub const DEFAULT_HIDE_DELAY: Duration = Duration::from_secs(3);

/// Render/remove side effects consumed by the controller.
///
/// Implemented by the gateway; errors are swallowed by the controller.
pub trait IndicatorSink: Send + Sync {
    /// Render the floating indicator.
    fn show_indicator(&self) -> Result<(), PlatformError>;

    /// Remove the floating indicator.
    fn hide_indicator(&self) -> Result<(), PlatformError>;
}

/// Type alias for a shared sink reference.
pub type IndicatorSinkRef = Arc<dyn IndicatorSink>;
