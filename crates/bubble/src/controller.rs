//! Controller state machine and its timer worker.

use crate::{IndicatorSinkRef, DEFAULT_HIDE_DELAY};
use std::sync::{Arc, Condvar, Mutex};
use std::time::{Duration, Instant};

/// Guarded controller state.
///
/// Invariant at every lock release: `deadline.is_some() == visible`
/// (except while shutting down).
struct State {
    visible: bool,
    deadline: Option<Instant>,
    shutdown: bool,
}

struct Inner {
    state: Mutex<State>,
    cv: Condvar,
    sink: IndicatorSinkRef,
    hide_delay: Duration,
}

/// Debounced show/auto-hide controller for the floating indicator.
///
/// All transitions happen under a single lock, so callback delivery from
/// multiple threads is safe. One long-lived worker thread services the
/// auto-hide deadline; a new focus signal moves the deadline rather than
/// arming a second timer, so at most one countdown is ever outstanding.
pub struct BubbleController {
    inner: Arc<Inner>,
    worker: Mutex<Option<std::thread::JoinHandle<()>>>,
}

impl BubbleController {
    /// Create a controller with the default 3 second hide delay.
    pub fn new(sink: IndicatorSinkRef) -> Self {
        Self::with_hide_delay(sink, DEFAULT_HIDE_DELAY)
    }

    /// Create a controller with a custom hide delay.
    pub fn with_hide_delay(sink: IndicatorSinkRef, hide_delay: Duration) -> Self {
        let inner = Arc::new(Inner {
            state: Mutex::new(State {
                visible: false,
                deadline: None,
                shutdown: false,
            }),
            cv: Condvar::new(),
            sink,
            hide_delay,
        });

        let worker_inner = Arc::clone(&inner);
        let handle = std::thread::spawn(move || run_worker(&worker_inner));

        Self {
            inner,
            worker: Mutex::new(Some(handle)),
        }
    }

    /// Handle a focus signal: show if hidden, restart the hide countdown.
    ///
    /// Idempotent show: while already visible only the deadline moves, the
    /// sink is not asked to render a second time.
    pub fn on_focus(&self) {
        let mut state = self.inner.state.lock().unwrap();
        if state.shutdown {
            return;
        }

        if !state.visible {
            state.visible = true;
            if let Err(e) = self.inner.sink.show_indicator() {
                tracing::warn!(error = %e, "show indicator failed");
            }
        }

        state.deadline = Some(Instant::now() + self.inner.hide_delay);
        self.inner.cv.notify_one();
    }

    /// Handle an unfocus signal. A no-op for the timer logic; unfocus only
    /// matters to downstream subscribers.
    pub fn on_unfocus(&self) {
        tracing::trace!("unfocus signal ignored by controller");
    }

    /// Hide immediately and cancel any pending countdown.
    pub fn close(&self) {
        let mut state = self.inner.state.lock().unwrap();
        if state.shutdown || !state.visible {
            return;
        }

        state.visible = false;
        state.deadline = None;
        if let Err(e) = self.inner.sink.hide_indicator() {
            tracing::warn!(error = %e, "hide indicator failed");
        }
        self.inner.cv.notify_one();
    }

    /// Point-in-time visibility snapshot.
    pub fn is_visible(&self) -> bool {
        self.inner.state.lock().unwrap().visible
    }

    /// Stop the worker thread. Subsequent calls are no-ops.
    pub fn shutdown(&self) {
        {
            let mut state = self.inner.state.lock().unwrap();
            state.shutdown = true;
            state.deadline = None;
            self.inner.cv.notify_one();
        }

        if let Some(handle) = self.worker.lock().unwrap().take() {
            let _ = handle.join();
        }
    }
}

impl Drop for BubbleController {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for BubbleController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BubbleController")
            .field("visible", &self.is_visible())
            .field("hide_delay", &self.inner.hide_delay)
            .finish_non_exhaustive()
    }
}

fn run_worker(inner: &Arc<Inner>) {
    let mut state = inner.state.lock().unwrap();

    loop {
        if state.shutdown {
            break;
        }

        match state.deadline {
            None => {
                state = inner.cv.wait(state).unwrap();
            }
            Some(deadline) => {
                let now = Instant::now();
                if now < deadline {
                    // A focus arriving during this wait moves the deadline;
                    // the re-check above picks that up.
                    let (guard, _timeout) =
                        inner.cv.wait_timeout(state, deadline - now).unwrap();
                    state = guard;
                } else {
                    state.deadline = None;
                    state.visible = false;
                    if let Err(e) = inner.sink.hide_indicator() {
                        tracing::warn!(error = %e, "hide indicator failed");
                    }
                    tracing::debug!("auto-hide fired");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::IndicatorSink;
    use quill_platform::PlatformError;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingSink {
        shows: AtomicUsize,
        hides: AtomicUsize,
        fail: AtomicBool,
    }

    impl IndicatorSink for CountingSink {
        fn show_indicator(&self) -> Result<(), PlatformError> {
            self.shows.fetch_add(1, Ordering::SeqCst);
            if self.fail.load(Ordering::SeqCst) {
                return Err(PlatformError::CallFailed("injected".to_string()));
            }
            Ok(())
        }

        fn hide_indicator(&self) -> Result<(), PlatformError> {
            self.hides.fetch_add(1, Ordering::SeqCst);
            if self.fail.load(Ordering::SeqCst) {
                return Err(PlatformError::CallFailed("injected".to_string()));
            }
            Ok(())
        }
    }

    fn controller(delay_ms: u64) -> (BubbleController, Arc<CountingSink>) {
        let sink = Arc::new(CountingSink::default());
        let sink_ref: crate::IndicatorSinkRef = sink.clone();
        let ctrl = BubbleController::with_hide_delay(sink_ref, Duration::from_millis(delay_ms));
        (ctrl, sink)
    }

    #[test]
    fn test_focus_shows_once_and_auto_hides() {
        let (ctrl, sink) = controller(60);

        ctrl.on_focus();
        assert!(ctrl.is_visible());
        assert_eq!(sink.shows.load(Ordering::SeqCst), 1);

        std::thread::sleep(Duration::from_millis(150));
        assert!(!ctrl.is_visible());
        assert_eq!(sink.hides.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_repeated_focus_debounces_show() {
        let (ctrl, sink) = controller(80);

        // Signals spaced well inside the hide delay: one show, one hide.
        for _ in 0..5 {
            ctrl.on_focus();
            std::thread::sleep(Duration::from_millis(20));
        }
        assert_eq!(sink.shows.load(Ordering::SeqCst), 1);
        assert!(ctrl.is_visible());

        std::thread::sleep(Duration::from_millis(200));
        assert_eq!(sink.hides.load(Ordering::SeqCst), 1);
        assert!(!ctrl.is_visible());

        // A gap past the delay means the next focus shows again.
        ctrl.on_focus();
        assert_eq!(sink.shows.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_repeated_focus_restarts_countdown() {
        let (ctrl, sink) = controller(100);

        ctrl.on_focus();
        // Keep refreshing past the original deadline.
        for _ in 0..4 {
            std::thread::sleep(Duration::from_millis(60));
            ctrl.on_focus();
        }
        // 240ms after the first signal, still visible: the countdown moved.
        assert!(ctrl.is_visible());
        assert_eq!(sink.hides.load(Ordering::SeqCst), 0);

        std::thread::sleep(Duration::from_millis(250));
        assert!(!ctrl.is_visible());
        assert_eq!(sink.hides.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_close_hides_immediately_and_cancels_timer() {
        let (ctrl, sink) = controller(200);

        ctrl.on_focus();
        ctrl.close();
        assert!(!ctrl.is_visible());
        assert_eq!(sink.hides.load(Ordering::SeqCst), 1);

        // Countdown was cancelled: no second hide when it would have fired.
        std::thread::sleep(Duration::from_millis(300));
        assert_eq!(sink.hides.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_close_while_hidden_is_a_noop() {
        let (ctrl, sink) = controller(50);

        ctrl.close();
        assert_eq!(sink.hides.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_unfocus_does_not_touch_timer() {
        let (ctrl, sink) = controller(120);

        ctrl.on_focus();
        ctrl.on_unfocus();
        assert!(ctrl.is_visible());
        assert_eq!(sink.hides.load(Ordering::SeqCst), 0);

        std::thread::sleep(Duration::from_millis(200));
        assert_eq!(sink.hides.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_sink_failure_does_not_block_transitions() {
        let (ctrl, sink) = controller(60);
        sink.fail.store(true, Ordering::SeqCst);

        ctrl.on_focus();
        assert!(ctrl.is_visible());

        std::thread::sleep(Duration::from_millis(150));
        assert!(!ctrl.is_visible());

        // And the next cycle still works.
        ctrl.on_focus();
        assert!(ctrl.is_visible());
        assert_eq!(sink.shows.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_concurrent_focus_storm_shows_once() {
        let (ctrl, sink) = controller(500);
        let ctrl = Arc::new(ctrl);

        let mut threads = Vec::new();
        for _ in 0..8 {
            let ctrl = Arc::clone(&ctrl);
            threads.push(std::thread::spawn(move || {
                for _ in 0..50 {
                    ctrl.on_focus();
                }
            }));
        }
        for t in threads {
            t.join().unwrap();
        }

        assert_eq!(sink.shows.load(Ordering::SeqCst), 1);
        assert!(ctrl.is_visible());
    }

    #[test]
    fn test_shutdown_is_idempotent_and_stops_timer() {
        let (ctrl, sink) = controller(40);

        ctrl.on_focus();
        ctrl.shutdown();
        ctrl.shutdown();

        std::thread::sleep(Duration::from_millis(100));
        // Worker is gone; the pending auto-hide never fired.
        assert_eq!(sink.hides.load(Ordering::SeqCst), 0);

        // Post-shutdown calls must not panic.
        ctrl.on_focus();
        ctrl.close();
    }
}
