//! Analytics collaborator: event sink abstraction and UID hashing.
//!
//! Analytics never affects retrieval. Events are recorded fire-and-forget;
//! a failing sink is logged and ignored.
//!
//! # Sink Selection
//!
//! | `[analytics].sink` | Sink |
//! |--------------------|------|
//! | `disabled` | [`NoopSink`] |
//! | `log` | [`LogSink`]: emits each event through `tracing` at `info` |
//!
//! Inbound identifiers are passed through [`hash_uid`] before they reach a
//! sink; the raw value is never stored or logged.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::{info, warn};

use crate::config::AnalyticsConfig;

/// A discrete, named analytics event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnalyticsEvent {
    TopicView { slug: String },
    Search { q_len: usize, results_count: usize },
    UidVisit { uid_hash: String },
}

impl AnalyticsEvent {
    /// Display name of the event.
    pub fn name(&self) -> &'static str {
        match self {
            AnalyticsEvent::TopicView { .. } => "Topic View",
            AnalyticsEvent::Search { .. } => "Search",
            AnalyticsEvent::UidVisit { .. } => "UID Visit",
        }
    }

    /// Search event for a query string; the length is counted in characters.
    pub fn search(query: &str, results_count: usize) -> Self {
        AnalyticsEvent::Search {
            q_len: query.chars().count(),
            results_count,
        }
    }
}

/// Destination for analytics events.
#[async_trait]
pub trait AnalyticsSink: Send + Sync {
    fn name(&self) -> &str;

    async fn record(&self, event: &AnalyticsEvent) -> Result<()>;
}

/// Discards every event.
pub struct NoopSink;

#[async_trait]
impl AnalyticsSink for NoopSink {
    fn name(&self) -> &str {
        "disabled"
    }

    async fn record(&self, _event: &AnalyticsEvent) -> Result<()> {
        Ok(())
    }
}

/// Writes events to the `analytics` tracing target.
pub struct LogSink;

#[async_trait]
impl AnalyticsSink for LogSink {
    fn name(&self) -> &str {
        "log"
    }

    async fn record(&self, event: &AnalyticsEvent) -> Result<()> {
        let props = serde_json::to_string(event)?;
        info!(target: "analytics", event = event.name(), %props, "analytics event");
        Ok(())
    }
}

/// Instantiate the sink named in the configuration.
pub fn create_sink(config: &AnalyticsConfig) -> Result<Arc<dyn AnalyticsSink>> {
    match config.sink.as_str() {
        "disabled" => Ok(Arc::new(NoopSink)),
        "log" => Ok(Arc::new(LogSink)),
        other => anyhow::bail!("Unknown analytics sink: {}", other),
    }
}

/// Record an event, logging and swallowing any sink failure.
pub async fn record_quietly(sink: &dyn AnalyticsSink, event: AnalyticsEvent) {
    if let Err(e) = sink.record(&event).await {
        warn!(sink = sink.name(), event = event.name(), error = %e, "analytics sink failed");
    }
}

/// Fire-and-forget: record on a background task. Requires a Tokio runtime.
pub fn track(sink: Arc<dyn AnalyticsSink>, event: AnalyticsEvent) {
    tokio::spawn(async move {
        record_quietly(sink.as_ref(), event).await;
    });
}

/// One-way SHA-256 digest of an inbound identifier, lowercase hex.
///
/// An empty identifier hashes to an empty string.
pub fn hash_uid(uid: &str) -> String {
    if uid.is_empty() {
        return String::new();
    }
    hex::encode(Sha256::digest(uid.as_bytes()))
}
