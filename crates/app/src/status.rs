//! Status snapshot DTOs.

use serde::{Deserialize, Serialize};

/// Outcome of [`crate::Quill::quick_setup`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickSetupReport {
    /// Whether initialization succeeded.
    pub initialized: bool,
    /// Whether the overlay-draw permission was already granted.
    pub overlay_permission: bool,
    /// Whether the accessibility service was already enabled.
    pub accessibility_enabled: bool,
    /// Whether the service start was issued (only when both permissions
    /// were granted; quick setup never opens permission dialogs itself).
    pub service_started: bool,
}

/// Point-in-time snapshot from [`crate::Quill::get_status`].
///
/// Every field is re-queried on each call; nothing is cached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusSnapshot {
    /// Whether the coordinator is initialized.
    pub initialized: bool,
    /// Fresh overlay-draw permission query.
    pub overlay_permission: bool,
    /// Fresh accessibility query.
    pub accessibility_enabled: bool,
    /// Best-effort indicator visibility.
    pub indicator_visible: bool,
    /// When this snapshot was taken, milliseconds since epoch.
    pub timestamp_ms: i64,
}
