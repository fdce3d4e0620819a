//! Reqwest-backed publisher for a Kafka REST proxy.
//!
//! Each event becomes one record keyed by the aggregate id and posted to
//! `{endpoint}/topics/{topic}`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Serialize;

use crate::domain::ports::{EventPublisher, EventPublisherError};
use crate::domain::{CreatedMessage, CreationEvent, EventKind};

/// Content type understood by the Kafka REST proxy for JSON records.
pub const KAFKA_JSON_CONTENT_TYPE: &str = "application/vnd.kafka.json.v2+json";

/// Topic names per event kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventTopics {
    pub legal_entity_created: String,
    pub bank_account_created: String,
}

impl Default for EventTopics {
    fn default() -> Self {
        Self {
            legal_entity_created: "legal-entities-created".to_owned(),
            bank_account_created: "bank-accounts-created".to_owned(),
        }
    }
}

#[derive(Debug, Serialize)]
struct RecordBatch<'a> {
    records: [Record<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Record<'a> {
    key: &'a str,
    value: &'a CreatedMessage,
}

/// Publisher posting to one REST proxy endpoint.
pub struct HttpEventPublisher {
    client: Client,
    legal_entity_url: Url,
    bank_account_url: Url,
}

impl HttpEventPublisher {
    /// Build a publisher with a per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`EventPublisherError::Transport`] when a topic URL cannot be
    /// formed or the client cannot be constructed.
    pub fn new(
        endpoint: &Url,
        topics: &EventTopics,
        timeout: Duration,
    ) -> Result<Self, EventPublisherError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| EventPublisherError::transport(err.to_string()))?;
        Ok(Self {
            client,
            legal_entity_url: topic_url(endpoint, &topics.legal_entity_created)?,
            bank_account_url: topic_url(endpoint, &topics.bank_account_created)?,
        })
    }

    fn url_for(&self, kind: EventKind) -> &Url {
        match kind {
            EventKind::LegalEntityCreated => &self.legal_entity_url,
            EventKind::BankAccountCreated => &self.bank_account_url,
        }
    }
}

fn topic_url(endpoint: &Url, topic: &str) -> Result<Url, EventPublisherError> {
    let base = endpoint.as_str().trim_end_matches('/');
    Url::parse(&format!("{base}/topics/{topic}"))
        .map_err(|err| EventPublisherError::transport(format!("invalid topic url: {err}")))
}

fn map_status_error(status: StatusCode, body: &str) -> EventPublisherError {
    const PREVIEW_CHAR_LIMIT: usize = 160;
    let preview: String = body.chars().take(PREVIEW_CHAR_LIMIT).collect();
    EventPublisherError::rejected(status.as_u16(), preview)
}

#[async_trait]
impl EventPublisher for HttpEventPublisher {
    async fn publish(&self, event: &CreationEvent) -> Result<(), EventPublisherError> {
        let message = event.message();
        let batch = RecordBatch {
            records: [Record {
                key: &message.id,
                value: &message,
            }],
        };
        let body = serde_json::to_vec(&batch)
            .map_err(|err| EventPublisherError::transport(err.to_string()))?;

        let response = self
            .client
            .post(self.url_for(event.kind).clone())
            .header(reqwest::header::CONTENT_TYPE, KAFKA_JSON_CONTENT_TYPE)
            .body(body)
            .send()
            .await
            .map_err(|err| EventPublisherError::transport(err.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let text = response.text().await.unwrap_or_default();
        Err(map_status_error(status, &text))
    }
}
