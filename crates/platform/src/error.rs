//! Error type for the platform boundary.

use thiserror::Error;

/// Failure raised by the platform layer.
///
/// These never propagate past the gateway: boolean queries collapse to
/// `false`, void commands to a logged no-op.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// The platform call itself failed.
    #[error("platform call failed: {0}")]
    CallFailed(String),

    /// A user-facing settings navigation could not be started.
    #[error("settings navigation failed: {0}")]
    NavigationFailed(String),

    /// The capability is not available on this platform.
    #[error("capability unavailable: {0}")]
    Unavailable(String),
}
