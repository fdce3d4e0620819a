//! Port for announcing creation events to downstream systems.

use async_trait::async_trait;

use crate::domain::CreationEvent;

use super::define_port_error;

define_port_error! {
    /// Errors raised by event publisher adapters.
    pub enum EventPublisherError {
        /// The broker could not be reached.
        Transport { message: String } => "event transport failed: {message}",
        /// The broker answered but refused the event.
        Rejected { status: u16, message: String } =>
            "event broker rejected publish with status {status}: {message}",
    }
}

/// Fire-and-forget event emission.
///
/// Callers treat failures as advisory; a failed publish never undoes the
/// write that produced the event.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, event: &CreationEvent) -> Result<(), EventPublisherError>;
}
