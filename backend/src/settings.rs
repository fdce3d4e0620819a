//! Service configuration loaded via OrthoConfig.
//!
//! Values come from `LEGAL_ENTITIES_*` environment variables, configuration
//! files and command-line flags, in OrthoConfig's usual precedence.

use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::DEFAULT_NOTIFICATION_TIMEOUT;
use crate::outbound::events::EventTopics;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;

/// Runtime settings for the legal entities service.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "LEGAL_ENTITIES")]
pub struct AppSettings {
    /// Socket address the HTTP server binds to.
    pub bind_addr: Option<SocketAddr>,
    /// PostgreSQL connection string. In-memory storage is used when unset.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
    /// Apply embedded migrations before serving.
    #[ortho_config(default = true)]
    pub run_migrations: bool,
    /// Kafka REST proxy base URL. Events are only logged when unset.
    pub events_endpoint: Option<String>,
    pub legal_entity_topic: Option<String>,
    pub bank_account_topic: Option<String>,
    /// Upper bound on a single event publish, in milliseconds.
    pub notification_timeout_ms: Option<u64>,
}

impl AppSettings {
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
            .unwrap_or_else(|| SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_PORT)))
    }

    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections
            .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
    }

    /// Topic names, falling back to the defaults for unset entries.
    pub fn event_topics(&self) -> EventTopics {
        let defaults = EventTopics::default();
        EventTopics {
            legal_entity_created: self
                .legal_entity_topic
                .clone()
                .unwrap_or(defaults.legal_entity_created),
            bank_account_created: self
                .bank_account_topic
                .clone()
                .unwrap_or(defaults.bank_account_created),
        }
    }

    pub fn notification_timeout(&self) -> Duration {
        self.notification_timeout_ms
            .map_or(DEFAULT_NOTIFICATION_TIMEOUT, Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const KEYS: [&str; 8] = [
        "LEGAL_ENTITIES_BIND_ADDR",
        "LEGAL_ENTITIES_DATABASE_URL",
        "LEGAL_ENTITIES_DB_MAX_CONNECTIONS",
        "LEGAL_ENTITIES_RUN_MIGRATIONS",
        "LEGAL_ENTITIES_EVENTS_ENDPOINT",
        "LEGAL_ENTITIES_LEGAL_ENTITY_TOPIC",
        "LEGAL_ENTITIES_BANK_ACCOUNT_TOPIC",
        "LEGAL_ENTITIES_NOTIFICATION_TIMEOUT_MS",
    ];

    fn load_from_empty_args() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("legal-entities")])
            .expect("config should load")
    }

    fn env_with(overrides: &[(&'static str, &str)]) -> Vec<(&'static str, Option<String>)> {
        KEYS.iter()
            .map(|key| {
                let value = overrides
                    .iter()
                    .find(|(name, _)| name == key)
                    .map(|(_, value)| (*value).to_owned());
                (*key, value)
            })
            .collect()
    }

    #[rstest]
    fn defaults_apply_when_nothing_is_set() {
        let _guard = lock_env(env_with(&[]));

        let settings = load_from_empty_args();
        assert_eq!(settings.bind_addr(), "0.0.0.0:8080".parse().expect("addr"));
        assert!(settings.database_url.is_none());
        assert_eq!(settings.db_max_connections(), 10);
        assert!(settings.run_migrations);
        assert!(settings.events_endpoint.is_none());
        assert_eq!(
            settings.event_topics().legal_entity_created,
            "legal-entities-created"
        );
        assert_eq!(
            settings.event_topics().bank_account_created,
            "bank-accounts-created"
        );
        assert_eq!(settings.notification_timeout(), Duration::from_secs(5));
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env(env_with(&[
            ("LEGAL_ENTITIES_BIND_ADDR", "127.0.0.1:9000"),
            ("LEGAL_ENTITIES_DATABASE_URL", "postgres://localhost/entities"),
            ("LEGAL_ENTITIES_DB_MAX_CONNECTIONS", "4"),
            ("LEGAL_ENTITIES_RUN_MIGRATIONS", "false"),
            ("LEGAL_ENTITIES_EVENTS_ENDPOINT", "http://kafka-rest:8082"),
            ("LEGAL_ENTITIES_BANK_ACCOUNT_TOPIC", "accounts"),
            ("LEGAL_ENTITIES_NOTIFICATION_TIMEOUT_MS", "250"),
        ]));

        let settings = load_from_empty_args();
        assert_eq!(settings.bind_addr(), "127.0.0.1:9000".parse().expect("addr"));
        assert_eq!(
            settings.database_url.as_deref(),
            Some("postgres://localhost/entities")
        );
        assert_eq!(settings.db_max_connections(), 4);
        assert!(!settings.run_migrations);
        assert_eq!(
            settings.events_endpoint.as_deref(),
            Some("http://kafka-rest:8082")
        );
        let topics = settings.event_topics();
        assert_eq!(topics.legal_entity_created, "legal-entities-created");
        assert_eq!(topics.bank_account_created, "accounts");
        assert_eq!(settings.notification_timeout(), Duration::from_millis(250));
    }
}
