//! Bridge from the native callback pair to the broadcast channels.

use crate::Broadcast;
use quill_platform::FocusObserver;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Republishes native focus/unfocus callbacks into broadcast channels.
///
/// Exactly one callback pair is registered with the observer, on the first
/// successful [`FocusBridge::initialize`]. The observer reference is
/// injected at construction; there is no global listener slot.
pub struct FocusBridge {
    observer: Arc<dyn FocusObserver>,
    focused: Broadcast,
    unfocused: Broadcast,
    initialized: AtomicBool,
    disposed: AtomicBool,
}

impl FocusBridge {
    pub fn new(observer: Arc<dyn FocusObserver>) -> Self {
        Self {
            observer,
            focused: Broadcast::new(),
            unfocused: Broadcast::new(),
            initialized: AtomicBool::new(false),
            disposed: AtomicBool::new(false),
        }
    }

    /// Register the native listener pair.
    ///
    /// Idempotent: a second call while initialized succeeds without
    /// re-registering. Returns false only after [`FocusBridge::dispose`],
    /// which closes the channels for good.
    pub fn initialize(&self) -> bool {
        if self.disposed.load(Ordering::SeqCst) {
            tracing::warn!("initialize called on a disposed bridge");
            return false;
        }

        if self
            .initialized
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return true;
        }

        let focused = self.focused.clone();
        let unfocused = self.unfocused.clone();
        self.observer.set_focus_listener(
            Arc::new(move || focused.emit()),
            Arc::new(move || unfocused.emit()),
        );

        tracing::debug!("focus listener registered");
        true
    }

    /// Deregister the native listener and permanently close both channels.
    ///
    /// Idempotent and safe without a prior initialize.
    pub fn dispose(&self) {
        if self
            .disposed
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return;
        }

        if self.initialized.swap(false, Ordering::SeqCst) {
            self.observer.clear_focus_listener();
            tracing::debug!("focus listener cleared");
        }

        self.focused.close();
        self.unfocused.close();
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    /// Channel carrying one signal per focus event.
    pub fn focused(&self) -> &Broadcast {
        &self.focused
    }

    /// Channel carrying one signal per unfocus event.
    pub fn unfocused(&self) -> &Broadcast {
        &self.unfocused
    }
}

impl std::fmt::Debug for FocusBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FocusBridge")
            .field("initialized", &self.is_initialized())
            .field("disposed", &self.disposed.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}
