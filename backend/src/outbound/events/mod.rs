//! Event publisher adapters.
//!
//! - [`HttpEventPublisher`] posts creation events to a Kafka REST proxy.
//! - [`LoggingEventPublisher`] records events in the log when no broker is
//!   configured.

mod http_publisher;
mod logging_publisher;

pub use http_publisher::{EventTopics, HttpEventPublisher, KAFKA_JSON_CONTENT_TYPE};
pub use logging_publisher::LoggingEventPublisher;
