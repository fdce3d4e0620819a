//! Publisher that only logs.

use async_trait::async_trait;
use tracing::info;

use crate::domain::CreationEvent;
use crate::domain::ports::{EventPublisher, EventPublisherError};

/// Writes each event to the log at `info` and reports success.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingEventPublisher;

#[async_trait]
impl EventPublisher for LoggingEventPublisher {
    async fn publish(&self, event: &CreationEvent) -> Result<(), EventPublisherError> {
        info!(
            event = event.kind.as_str(),
            id = %event.id,
            created_at = %event.created_at,
            "creation event (no broker configured)"
        );
        Ok(())
    }
}
