//! Inert platform implementation.

use crate::{FocusObserver, PlatformError, PlatformOps, SignalCallback};
use std::sync::Mutex;

/// Null implementation for testing or unsupported platforms.
///
/// Every query reports `false`, every command succeeds without doing
/// anything, and the registered listener pair is held but never fired.
#[derive(Default)]
pub struct NullPlatform {
    listener: Mutex<Option<(SignalCallback, SignalCallback)>>,
}

impl NullPlatform {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PlatformOps for NullPlatform {
    fn check_overlay_permission(&self) -> Result<bool, PlatformError> {
        Ok(false)
    }

    fn request_overlay_permission(&self) -> Result<(), PlatformError> {
        Ok(())
    }

    fn check_accessibility_enabled(&self) -> Result<bool, PlatformError> {
        Ok(false)
    }

    fn open_accessibility_settings(&self) -> Result<(), PlatformError> {
        Ok(())
    }

    fn start_overlay_service(&self) -> Result<(), PlatformError> {
        Ok(())
    }

    fn stop_overlay_service(&self) -> Result<(), PlatformError> {
        Ok(())
    }

    fn show_indicator(&self) -> Result<(), PlatformError> {
        Ok(())
    }

    fn hide_indicator(&self) -> Result<(), PlatformError> {
        Ok(())
    }

    fn trigger_test_render(&self) -> Result<(), PlatformError> {
        Ok(())
    }

    fn is_indicator_visible(&self) -> Result<bool, PlatformError> {
        Ok(false)
    }
}

impl FocusObserver for NullPlatform {
    fn set_focus_listener(&self, on_focus: SignalCallback, on_unfocus: SignalCallback) {
        *self.listener.lock().unwrap() = Some((on_focus, on_unfocus));
    }

    fn clear_focus_listener(&self) {
        *self.listener.lock().unwrap() = None;
    }
}

impl std::fmt::Debug for NullPlatform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NullPlatform")
            .field("has_listener", &self.listener.lock().unwrap().is_some())
            .finish()
    }
}
