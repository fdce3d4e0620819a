//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::time::Duration;

use legal_entities::domain::DEFAULT_NOTIFICATION_TIMEOUT;
use legal_entities::outbound::events::EventTopics;
use legal_entities::outbound::persistence::DbPool;
use reqwest::Url;

#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetrics;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) events_endpoint: Option<Url>,
    pub(crate) event_topics: EventTopics,
    pub(crate) notification_timeout: Duration,
    #[cfg(feature = "metrics")]
    pub(crate) prometheus: Option<PrometheusMetrics>,
}

impl ServerConfig {
    /// Configuration with in-memory storage and log-only event publishing.
    #[must_use]
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            db_pool: None,
            events_endpoint: None,
            event_topics: EventTopics::default(),
            notification_timeout: DEFAULT_NOTIFICATION_TIMEOUT,
            #[cfg(feature = "metrics")]
            prometheus: None,
        }
    }

    /// Attach a database connection pool; repositories become Diesel-backed.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Publish creation events to a Kafka REST proxy.
    #[must_use]
    pub fn with_events_endpoint(mut self, endpoint: Url, topics: EventTopics) -> Self {
        self.events_endpoint = Some(endpoint);
        self.event_topics = topics;
        self
    }

    /// Bound each event publish by `timeout`.
    #[must_use]
    pub fn with_notification_timeout(mut self, timeout: Duration) -> Self {
        self.notification_timeout = timeout;
        self
    }

    /// Return the socket address the server will bind to.
    #[cfg_attr(
        not(any(test, doctest)),
        expect(dead_code, reason = "Exercised by integration tests")
    )]
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    #[cfg(feature = "metrics")]
    /// Attach Prometheus middleware to the configuration.
    #[must_use]
    pub fn with_metrics(mut self, prometheus: Option<PrometheusMetrics>) -> Self {
        self.prometheus = prometheus;
        self
    }
}
