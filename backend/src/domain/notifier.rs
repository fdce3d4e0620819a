//! Best-effort delivery of creation events.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use super::CreationEvent;
use super::ports::EventPublisher;

/// Default upper bound on a single publish.
pub const DEFAULT_NOTIFICATION_TIMEOUT: Duration = Duration::from_secs(5);

/// Wraps an [`EventPublisher`] so failures and slow brokers never reach the
/// caller. Errors and timeouts are logged at `warn`.
#[derive(Clone)]
pub struct Notifier {
    publisher: Arc<dyn EventPublisher>,
    timeout: Duration,
}

impl Notifier {
    pub fn new(publisher: Arc<dyn EventPublisher>) -> Self {
        Self {
            publisher,
            timeout: DEFAULT_NOTIFICATION_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Publish `event`, swallowing any failure.
    pub async fn notify(&self, event: CreationEvent) {
        let kind = event.kind.as_str();
        match tokio::time::timeout(self.timeout, self.publisher.publish(&event)).await {
            Ok(Ok(())) => debug!(event = kind, id = %event.id, "creation event published"),
            Ok(Err(error)) => {
                warn!(event = kind, id = %event.id, %error, "creation event dropped");
            }
            Err(_) => warn!(
                event = kind,
                id = %event.id,
                timeout = ?self.timeout,
                "creation event publish timed out"
            ),
        }
    }
}
