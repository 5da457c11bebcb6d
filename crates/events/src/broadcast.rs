//! Multi-subscriber broadcast channel for zero-payload signals.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};

type Callback = Arc<dyn Fn() + Send + Sync>;

struct Inner {
    subscribers: Mutex<Vec<(u64, Callback)>>,
    next_id: AtomicU64,
    closed: AtomicBool,
}

/// A broadcast channel carrying zero-payload signals.
///
/// Every subscriber receives every signal emitted after it subscribed.
/// Subscribing and unsubscribing are safe at any time from any thread,
/// including from within a subscriber's own handler: `emit` snapshots the
/// subscriber list and releases the lock before invoking anyone.
#[derive(Clone)]
pub struct Broadcast {
    inner: Arc<Inner>,
}

impl Default for Broadcast {
    fn default() -> Self {
        Self {
            inner: Arc::new(Inner {
                subscribers: Mutex::new(Vec::new()),
                next_id: AtomicU64::new(0),
                closed: AtomicBool::new(false),
            }),
        }
    }
}

impl Broadcast {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subscriber. Dropping the returned guard unsubscribes.
    ///
    /// On a closed channel this is a silent no-op: the guard is returned
    /// but will never fire.
    pub fn subscribe<F>(&self, f: F) -> Subscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);

        // Check closed under the subscribers lock so a concurrent close()
        // cannot slip between the check and the push.
        let mut subscribers = self.inner.subscribers.lock().unwrap();
        if !self.inner.closed.load(Ordering::SeqCst) {
            let cb: Callback = Arc::new(f);
            subscribers.push((id, cb));
        }
        drop(subscribers);

        Subscription {
            inner: Arc::downgrade(&self.inner),
            id,
        }
    }

    /// Deliver one signal to every current subscriber.
    pub fn emit(&self) {
        if self.inner.closed.load(Ordering::SeqCst) {
            return;
        }

        // Snapshot under the lock, invoke outside it so handlers may
        // subscribe or unsubscribe without deadlocking.
        let snapshot: Vec<Callback> = self
            .inner
            .subscribers
            .lock()
            .unwrap()
            .iter()
            .map(|(_, cb)| cb.clone())
            .collect();

        for cb in snapshot {
            cb();
        }
    }

    /// Permanently close the channel, dropping all subscribers.
    ///
    /// Subsequent `subscribe`/`emit` calls are silent no-ops.
    pub fn close(&self) {
        let mut subscribers = self.inner.subscribers.lock().unwrap();
        self.inner.closed.store(true, Ordering::SeqCst);
        subscribers.clear();
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::SeqCst)
    }

    /// Number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.lock().unwrap().len()
    }
}

impl std::fmt::Debug for Broadcast {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Broadcast")
            .field("subscribers", &self.subscriber_count())
            .field("closed", &self.is_closed())
            .finish()
    }
}

/// RAII guard for a [`Broadcast`] subscription.
///
/// The subscriber stays registered until this guard is dropped or
/// [`Subscription::cancel`] is called.
#[must_use = "dropping the subscription unsubscribes immediately"]
pub struct Subscription {
    inner: Weak<Inner>,
    id: u64,
}

impl Subscription {
    /// Explicitly unsubscribe.
    pub fn cancel(self) {
        // Drop does the work.
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.inner.upgrade() {
            inner
                .subscribers
                .lock()
                .unwrap()
                .retain(|(id, _)| *id != self.id);
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_every_subscriber_receives_every_emit() {
        let channel = Broadcast::new();
        let a = Arc::new(AtomicUsize::new(0));
        let b = Arc::new(AtomicUsize::new(0));

        let a_clone = Arc::clone(&a);
        let _sub_a = channel.subscribe(move || {
            a_clone.fetch_add(1, Ordering::SeqCst);
        });

        channel.emit();

        let b_clone = Arc::clone(&b);
        let _sub_b = channel.subscribe(move || {
            b_clone.fetch_add(1, Ordering::SeqCst);
        });

        channel.emit();

        // No replay: b only sees the emit after it subscribed.
        assert_eq!(a.load(Ordering::SeqCst), 2);
        assert_eq!(b.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_drop_unsubscribes() {
        let channel = Broadcast::new();
        let hits = Arc::new(AtomicUsize::new(0));

        let hits_clone = Arc::clone(&hits);
        let sub = channel.subscribe(move || {
            hits_clone.fetch_add(1, Ordering::SeqCst);
        });

        channel.emit();
        drop(sub);
        channel.emit();

        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unsubscribe_from_within_handler() {
        let channel = Broadcast::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let slot: Arc<Mutex<Option<Subscription>>> = Arc::new(Mutex::new(None));

        let hits_clone = Arc::clone(&hits);
        let slot_clone = Arc::clone(&slot);
        let sub = channel.subscribe(move || {
            hits_clone.fetch_add(1, Ordering::SeqCst);
            // Cancel our own subscription mid-delivery.
            slot_clone.lock().unwrap().take();
        });
        *slot.lock().unwrap() = Some(sub);

        channel.emit();
        channel.emit();

        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_subscribe_from_within_handler() {
        let channel = Broadcast::new();
        let late_hits = Arc::new(AtomicUsize::new(0));
        let keep: Arc<Mutex<Vec<Subscription>>> = Arc::new(Mutex::new(Vec::new()));

        let channel_clone = channel.clone();
        let late_clone = Arc::clone(&late_hits);
        let keep_clone = Arc::clone(&keep);
        let _sub = channel.subscribe(move || {
            let late = Arc::clone(&late_clone);
            let new_sub = channel_clone.subscribe(move || {
                late.fetch_add(1, Ordering::SeqCst);
            });
            keep_clone.lock().unwrap().push(new_sub);
        });

        channel.emit();
        // The handler-registered subscriber only sees emits after its own.
        assert_eq!(late_hits.load(Ordering::SeqCst), 0);

        channel.emit();
        assert_eq!(late_hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_closed_channel_is_inert() {
        let channel = Broadcast::new();
        let hits = Arc::new(AtomicUsize::new(0));

        let hits_clone = Arc::clone(&hits);
        let _sub = channel.subscribe(move || {
            hits_clone.fetch_add(1, Ordering::SeqCst);
        });

        channel.close();
        channel.emit();
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert_eq!(channel.subscriber_count(), 0);

        let hits_clone = Arc::clone(&hits);
        let _late = channel.subscribe(move || {
            hits_clone.fetch_add(1, Ordering::SeqCst);
        });
        channel.emit();
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        // A late subscriber is never registered, not just never invoked.
        assert_eq!(channel.subscriber_count(), 0);
    }

    #[test]
    fn test_close_races_with_subscribe_leave_no_subscribers() {
        for _ in 0..50 {
            let channel = Broadcast::new();

            let subscriber = {
                let channel = channel.clone();
                std::thread::spawn(move || {
                    let mut guards = Vec::new();
                    for _ in 0..20 {
                        guards.push(channel.subscribe(|| {}));
                    }
                    guards
                })
            };

            let closer = {
                let channel = channel.clone();
                std::thread::spawn(move || channel.close())
            };

            let guards = subscriber.join().unwrap();
            closer.join().unwrap();

            // Whatever the interleaving, a closed channel holds nothing:
            // entries added before the close were cleared by it, later
            // subscribes were refused.
            assert_eq!(channel.subscriber_count(), 0);
            drop(guards);
        }
    }

    #[test]
    fn test_concurrent_subscribe_and_emit() {
        let channel = Broadcast::new();
        let hits = Arc::new(AtomicUsize::new(0));

        let emitter = {
            let channel = channel.clone();
            std::thread::spawn(move || {
                for _ in 0..200 {
                    channel.emit();
                }
            })
        };

        let subscriber = {
            let channel = channel.clone();
            let hits = Arc::clone(&hits);
            std::thread::spawn(move || {
                for _ in 0..50 {
                    let hits = Arc::clone(&hits);
                    let sub = channel.subscribe(move || {
                        hits.fetch_add(1, Ordering::SeqCst);
                    });
                    drop(sub);
                }
            })
        };

        emitter.join().unwrap();
        subscriber.join().unwrap();
        // No panic/deadlock is the property under test.
    }
}
