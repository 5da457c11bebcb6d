//! Simulated platform for headless demos.

use crate::{FocusObserver, PlatformError, PlatformOps, SignalCallback};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

/// A scripted signal for [`SimPlatform::signal_feed`].
#[derive(Debug, Clone, Copy)]
pub enum SimSignal {
    /// A text element gained focus.
    Focus,
    /// The focused text element was left.
    Unfocus,
    /// Wait before delivering the next signal.
    Pause(Duration),
}

/// Simulated platform that replays scripted focus signals.
///
/// Both permissions report granted, service start/stop and indicator
/// show/hide just flip internal flags and log. Signals are fed through a
/// channel and dispatched from a background thread, one at a time, matching
/// the serialized delivery the real observation layer guarantees.
#[derive(Default)]
pub struct SimPlatform {
    service_running: AtomicBool,
    indicator_visible: AtomicBool,
    listener: Mutex<Option<(SignalCallback, SignalCallback)>>,
}

impl SimPlatform {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Spawn a dispatcher thread fed by the returned channel sender.
    ///
    /// The thread drains the channel, delivering each signal to whatever
    /// listener pair is registered at that moment, and exits once every
    /// sender has been dropped.
    pub fn signal_feed(
        self: &Arc<Self>,
    ) -> (crossbeam_channel::Sender<SimSignal>, thread::JoinHandle<()>) {
        let (tx, rx) = crossbeam_channel::unbounded::<SimSignal>();
        let platform = Arc::clone(self);

        let handle = thread::spawn(move || {
            for signal in rx.iter() {
                match signal {
                    SimSignal::Focus => platform.fire(true),
                    SimSignal::Unfocus => platform.fire(false),
                    SimSignal::Pause(d) => thread::sleep(d),
                }
            }
            tracing::debug!("sim signal feed drained");
        });

        (tx, handle)
    }

    fn fire(&self, focus: bool) {
        let cb = {
            let guard = self.listener.lock().unwrap();
            guard.as_ref().map(|(f, u)| if focus { f.clone() } else { u.clone() })
        };
        match cb {
            Some(cb) => cb(),
            None => tracing::debug!(focus, "sim signal dropped, no listener registered"),
        }
    }
}

impl PlatformOps for SimPlatform {
    fn check_overlay_permission(&self) -> Result<bool, PlatformError> {
        Ok(true)
    }

    fn request_overlay_permission(&self) -> Result<(), PlatformError> {
        tracing::info!("sim: overlay permission dialog requested");
        Ok(())
    }

    fn check_accessibility_enabled(&self) -> Result<bool, PlatformError> {
        Ok(true)
    }

    fn open_accessibility_settings(&self) -> Result<(), PlatformError> {
        tracing::info!("sim: accessibility settings opened");
        Ok(())
    }

    fn start_overlay_service(&self) -> Result<(), PlatformError> {
        self.service_running.store(true, Ordering::SeqCst);
        tracing::info!("sim: overlay service started");
        Ok(())
    }

    fn stop_overlay_service(&self) -> Result<(), PlatformError> {
        self.service_running.store(false, Ordering::SeqCst);
        tracing::info!("sim: overlay service stopped");
        Ok(())
    }

    fn show_indicator(&self) -> Result<(), PlatformError> {
        self.indicator_visible.store(true, Ordering::SeqCst);
        tracing::info!("sim: indicator shown");
        Ok(())
    }

    fn hide_indicator(&self) -> Result<(), PlatformError> {
        self.indicator_visible.store(false, Ordering::SeqCst);
        tracing::info!("sim: indicator hidden");
        Ok(())
    }

    fn trigger_test_render(&self) -> Result<(), PlatformError> {
        tracing::info!("sim: test render cycle");
        Ok(())
    }

    fn is_indicator_visible(&self) -> Result<bool, PlatformError> {
        Ok(self.indicator_visible.load(Ordering::SeqCst))
    }
}

impl FocusObserver for SimPlatform {
    fn set_focus_listener(&self, on_focus: SignalCallback, on_unfocus: SignalCallback) {
        *self.listener.lock().unwrap() = Some((on_focus, on_unfocus));
    }

    fn clear_focus_listener(&self) {
        *self.listener.lock().unwrap() = None;
    }
}

impl std::fmt::Debug for SimPlatform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimPlatform")
            .field("service_running", &self.service_running.load(Ordering::SeqCst))
            .field(
                "indicator_visible",
                &self.indicator_visible.load(Ordering::SeqCst),
            )
            .finish_non_exhaustive()
    }
}
