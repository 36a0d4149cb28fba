//! Error types for listener delivery

use thiserror::Error;

/// Failure to deliver one callback to one listener
///
/// Never propagated past the dispatcher: it is logged and counted, and the
/// listener stays registered.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// The connection behind the listener is gone
    #[error("Listener disconnected")]
    Disconnected,

    /// The remote side raised an error while handling the callback
    #[error("Remote listener error: {0}")]
    Remote(String),
}

/// Result type for listener callbacks
pub type DeliveryResult = std::result::Result<(), DeliveryError>;
