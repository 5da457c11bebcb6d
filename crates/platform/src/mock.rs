//! Recording platform double for tests.

use crate::{FocusObserver, PlatformError, PlatformOps, SignalCallback};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

/// Mock platform that records every call for later inspection.
///
/// Permission answers and indicator visibility are settable, and the whole
/// boundary can be switched into a failing mode to exercise the
/// swallow-to-default paths. `fire_focus`/`fire_unfocus` drive whatever
/// listener pair is currently registered, standing in for the OS delivering
/// accessibility events.
#[derive(Default)]
pub struct MockPlatform {
    overlay_granted: AtomicBool,
    accessibility_enabled: AtomicBool,
    indicator_visible: AtomicBool,
    fail_calls: AtomicBool,

    pub start_service_calls: AtomicUsize,
    pub stop_service_calls: AtomicUsize,
    pub show_calls: AtomicUsize,
    pub hide_calls: AtomicUsize,
    pub request_overlay_calls: AtomicUsize,
    pub open_settings_calls: AtomicUsize,
    pub test_render_calls: AtomicUsize,
    pub set_listener_calls: AtomicUsize,
    pub clear_listener_calls: AtomicUsize,

    listener: Mutex<Option<(SignalCallback, SignalCallback)>>,
}

impl MockPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock with both permissions granted.
    pub fn granted() -> Self {
        let mock = Self::default();
        mock.set_overlay_granted(true);
        mock.set_accessibility_enabled(true);
        mock
    }

    pub fn set_overlay_granted(&self, granted: bool) {
        self.overlay_granted.store(granted, Ordering::SeqCst);
    }

    pub fn set_accessibility_enabled(&self, enabled: bool) {
        self.accessibility_enabled.store(enabled, Ordering::SeqCst);
    }

    pub fn set_indicator_visible(&self, visible: bool) {
        self.indicator_visible.store(visible, Ordering::SeqCst);
    }

    /// Make every subsequent boundary call return an error.
    pub fn set_failing(&self, failing: bool) {
        self.fail_calls.store(failing, Ordering::SeqCst);
    }

    /// Whether a listener pair is currently registered.
    pub fn has_listener(&self) -> bool {
        self.listener.lock().unwrap().is_some()
    }

    /// Deliver a focus signal to the registered listener, if any.
    pub fn fire_focus(&self) {
        let cb = self.listener.lock().unwrap().as_ref().map(|(f, _)| f.clone());
        if let Some(cb) = cb {
            cb();
        }
    }

    /// Deliver an unfocus signal to the registered listener, if any.
    pub fn fire_unfocus(&self) {
        let cb = self.listener.lock().unwrap().as_ref().map(|(_, u)| u.clone());
        if let Some(cb) = cb {
            cb();
        }
    }

    fn guard(&self) -> Result<(), PlatformError> {
        if self.fail_calls.load(Ordering::SeqCst) {
            Err(PlatformError::CallFailed("injected failure".to_string()))
        } else {
            Ok(())
        }
    }
}

impl PlatformOps for MockPlatform {
    fn check_overlay_permission(&self) -> Result<bool, PlatformError> {
        self.guard()?;
        Ok(self.overlay_granted.load(Ordering::SeqCst))
    }

    fn request_overlay_permission(&self) -> Result<(), PlatformError> {
        self.guard()?;
        self.request_overlay_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn check_accessibility_enabled(&self) -> Result<bool, PlatformError> {
        self.guard()?;
        Ok(self.accessibility_enabled.load(Ordering::SeqCst))
    }

    fn open_accessibility_settings(&self) -> Result<(), PlatformError> {
        self.guard()?;
        self.open_settings_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn start_overlay_service(&self) -> Result<(), PlatformError> {
        self.guard()?;
        self.start_service_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn stop_overlay_service(&self) -> Result<(), PlatformError> {
        self.guard()?;
        self.stop_service_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn show_indicator(&self) -> Result<(), PlatformError> {
        self.guard()?;
        self.show_calls.fetch_add(1, Ordering::SeqCst);
        self.indicator_visible.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn hide_indicator(&self) -> Result<(), PlatformError> {
        self.guard()?;
        self.hide_calls.fetch_add(1, Ordering::SeqCst);
        self.indicator_visible.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn trigger_test_render(&self) -> Result<(), PlatformError> {
        self.guard()?;
        self.test_render_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn is_indicator_visible(&self) -> Result<bool, PlatformError> {
        self.guard()?;
        Ok(self.indicator_visible.load(Ordering::SeqCst))
    }
}

impl FocusObserver for MockPlatform {
    fn set_focus_listener(&self, on_focus: SignalCallback, on_unfocus: SignalCallback) {
        self.set_listener_calls.fetch_add(1, Ordering::SeqCst);
        *self.listener.lock().unwrap() = Some((on_focus, on_unfocus));
    }

    fn clear_focus_listener(&self) {
        self.clear_listener_calls.fetch_add(1, Ordering::SeqCst);
        *self.listener.lock().unwrap() = None;
    }
}

impl std::fmt::Debug for MockPlatform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockPlatform")
            .field("overlay_granted", &self.overlay_granted.load(Ordering::SeqCst))
            .field(
                "accessibility_enabled",
                &self.accessibility_enabled.load(Ordering::SeqCst),
            )
            .field("has_listener", &self.has_listener())
            .finish_non_exhaustive()
    }
}
