//! Snapshot format: the structured document written to
//! `data_normalized.json`, plus the legacy flat and title-grouped
//! projections.
//!
//! Everything here is deterministic for a given [`TopicIndex`]; the only
//! run-dependent value is `metadata.generatedAt`.

use chrono::{DateTime, SecondsFormat, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::models::{Category, CategoryGroup, Topic, TopicIndex, TopicRow};

/// Version of the structured document layout.
pub const SNAPSHOT_VERSION: &str = "2.0.0";

const DESCRIPTION: &str =
    "Normalized rights guide data with structured content and legacy compatibility";

/// Generation metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotMetadata {
    pub version: String,
    /// RFC 3339 timestamp, millisecond precision.
    pub generated_at: String,
    pub source: String,
    pub total_topics: usize,
    pub total_categories: usize,
    pub description: String,
}

/// Flat and title-grouped projections for consumers of the legacy shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyProjection {
    pub flat: Vec<TopicRow>,
    /// Keyed by the raw title string, so same-titled topics from different
    /// categories share one group.
    pub grouped: IndexMap<String, Vec<TopicRow>>,
}

impl LegacyProjection {
    pub fn from_topics(topics: &[Topic]) -> Self {
        let flat: Vec<TopicRow> = topics.iter().map(TopicRow::from).collect();
        let grouped = group_by_title(&flat);
        Self { flat, grouped }
    }
}

/// Group rows by their `topic` (title) string, preserving first-seen order.
pub fn group_by_title(rows: &[TopicRow]) -> IndexMap<String, Vec<TopicRow>> {
    let mut grouped: IndexMap<String, Vec<TopicRow>> = IndexMap::new();
    for row in rows {
        grouped.entry(row.topic.clone()).or_default().push(row.clone());
    }
    grouped
}

/// The complete structured document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub metadata: SnapshotMetadata,
    pub categories: Vec<Category>,
    pub topics: Vec<Topic>,
    pub topics_by_category: IndexMap<String, CategoryGroup>,
    pub legacy: LegacyProjection,
}

impl Snapshot {
    /// Assemble a snapshot from a finished index.
    pub fn build(index: TopicIndex, source: &str, generated_at: DateTime<Utc>) -> Self {
        let legacy = LegacyProjection::from_topics(&index.topics);
        Self {
            metadata: SnapshotMetadata {
                version: SNAPSHOT_VERSION.to_string(),
                generated_at: generated_at.to_rfc3339_opts(SecondsFormat::Millis, true),
                source: source.to_string(),
                total_topics: index.topics.len(),
                total_categories: index.categories.len(),
                description: DESCRIPTION.to_string(),
            },
            categories: index.categories,
            topics: index.topics,
            topics_by_category: index.topics_by_category,
            legacy,
        }
    }
}

/// Human-readable description of the structured document, written as
/// `schema.json` next to the data.
pub fn schema() -> Value {
    json!({
        "description": "Schema for normalized rights guide data",
        "version": SNAPSHOT_VERSION,
        "structure": {
            "metadata": {
                "type": "object",
                "description": "Information about the data generation",
                "fields": ["version", "generatedAt", "source", "totalTopics", "totalCategories", "description"]
            },
            "categories": {
                "type": "array",
                "description": "Available topic categories, deduplicated by id",
                "items": {
                    "id": "string (generated from name, words joined by _)",
                    "name": "string (original display name)",
                    "slug": "string (URL-friendly, words joined by -)"
                }
            },
            "topics": {
                "type": "array",
                "description": "All topics with structured content, in source order",
                "items": {
                    "id": "string (unique, generated from title)",
                    "slug": "string (unique, URL-friendly)",
                    "title": "string (original title)",
                    "category": "object (category reference)",
                    "sections": "object (law, rights, identification, selfHelp, remarks; each an array of {kind, level, text}, omitted when blank)",
                    "rawFields": "object (original untrimmed cell values)",
                    "rowIndex": "number (1-based source data row)"
                }
            },
            "topicsByCategory": {
                "type": "object",
                "description": "Topics grouped by category id"
            },
            "legacy": {
                "type": "object",
                "description": "Backward compatible formats: flat array and title-keyed grouping"
            }
        }
    })
}
