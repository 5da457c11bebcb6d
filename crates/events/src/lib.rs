//! Focus-event distribution for quill.
//!
//! Converts the push-style native callback pair delivered by the platform's
//! observation layer into two multi-subscriber broadcast channels
//! ("focused" and "unfocused") that any number of consumers can listen on.
//!
//! This is a plain fan-out, not a queue: no replay of past events, no
//! buffering for slow subscribers.

mod bridge;
mod broadcast;

pub use bridge::FocusBridge;
pub use broadcast::{Broadcast, Subscription};
