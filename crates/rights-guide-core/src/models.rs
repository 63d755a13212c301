//! Core data models used throughout Rights Guide.
//!
//! These types represent the raw rows, normalized topics, and flat legacy
//! records that flow through the normalization and retrieval pipeline.
//! Field names serialize in camelCase to match the JSON artifacts consumed
//! by the presentation layer.

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Canonical fields recognized in the tabular source.
///
/// Source headers are mapped onto these once, at ingestion start (see
/// [`crate::source::HEADER_TABLE`]); nothing downstream looks fields up by
/// header string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Category,
    Topic,
    Law,
    Rights,
    Identification,
    SelfHelp,
    Remark,
}

impl Field {
    /// All fields, in source column order.
    pub const ALL: [Field; 7] = [
        Field::Category,
        Field::Topic,
        Field::Law,
        Field::Rights,
        Field::Identification,
        Field::SelfHelp,
        Field::Remark,
    ];

    /// Stable English name, used in log output and error messages.
    pub fn as_str(self) -> &'static str {
        match self {
            Field::Category => "category",
            Field::Topic => "topic",
            Field::Law => "law",
            Field::Rights => "knowYourRights",
            Field::Identification => "howToIdentify",
            Field::SelfHelp => "selfHelp",
            Field::Remark => "remark",
        }
    }
}

/// One data row of the tabular source, keyed by canonical field.
///
/// Values are stored exactly as read (untrimmed). A field the row does not
/// carry is simply absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    values: HashMap<Field, String>,
}

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter, mostly useful in tests.
    pub fn with(mut self, field: Field, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        self.values.insert(field, value.into());
    }

    /// The untrimmed value of `field`, if the row carries it.
    pub fn get(&self, field: Field) -> Option<&str> {
        self.values.get(&field).map(String::as_str)
    }

    /// The trimmed value of `field`, or `""` when absent.
    pub fn trimmed(&self, field: Field) -> &str {
        self.get(field).map(str::trim).unwrap_or("")
    }
}

/// A topic category. `id` and `slug` are derived from `name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub slug: String,
}

/// Whether a [`ContentBlock`] is a paragraph line or a bullet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    Text,
    Bullet,
}

/// One normalized line of a free-text field.
///
/// `level` is `0` for text, `1` for a primary bullet and `2` for a nested
/// bullet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentBlock {
    pub kind: BlockKind,
    pub level: u8,
    pub text: String,
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            kind: BlockKind::Text,
            level: 0,
            text: text.into(),
        }
    }

    pub fn bullet(level: u8, text: impl Into<String>) -> Self {
        Self {
            kind: BlockKind::Bullet,
            level,
            text: text.into(),
        }
    }
}

/// Structured content of a topic. A section is `None` when its source field
/// was blank, and is then omitted from the JSON output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sections {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub law: Option<Vec<ContentBlock>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rights: Option<Vec<ContentBlock>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identification: Option<Vec<ContentBlock>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub self_help: Option<Vec<ContentBlock>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<Vec<ContentBlock>>,
}

/// The original, untrimmed cell values a topic was built from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub law: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rights: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identification: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub self_help: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
}

impl RawFields {
    pub fn from_row(row: &RawRow) -> Self {
        let owned = |field| row.get(field).map(str::to_string);
        Self {
            category: owned(Field::Category),
            topic: owned(Field::Topic),
            law: owned(Field::Law),
            rights: owned(Field::Rights),
            identification: owned(Field::Identification),
            self_help: owned(Field::SelfHelp),
            remark: owned(Field::Remark),
        }
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        let value = match field {
            Field::Category => &self.category,
            Field::Topic => &self.topic,
            Field::Law => &self.law,
            Field::Rights => &self.rights,
            Field::Identification => &self.identification,
            Field::SelfHelp => &self.self_help,
            Field::Remark => &self.remark,
        };
        value.as_deref()
    }
}

/// A normalized, uniquely-keyed topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub category: Category,
    pub sections: Sections,
    pub raw_fields: RawFields,
    /// 1-based data row number in the source (header excluded).
    pub row_index: usize,
}

impl Topic {
    /// Trimmed text of a content field, `None` when blank.
    pub fn field_text(&self, field: Field) -> Option<&str> {
        self.raw_fields
            .get(field)
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }
}

/// A category together with the topics that belong to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryGroup {
    pub category: Category,
    pub topics: Vec<Topic>,
}

/// The Normalizer's output. Built once per run and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicIndex {
    pub categories: Vec<Category>,
    pub topics: Vec<Topic>,
    pub topics_by_category: IndexMap<String, CategoryGroup>,
}

/// A simplified topic record in the flat (legacy) projection.
///
/// This is the shape the presentation layer loads from `data_flat.json` and
/// hands to the retrieval engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicRow {
    pub category: String,
    pub topic: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub law: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub know_your_rights: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub how_to_identify: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub self_help: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
    pub slug: String,
}

impl From<&Topic> for TopicRow {
    fn from(topic: &Topic) -> Self {
        let text = |field| topic.field_text(field).map(str::to_string);
        Self {
            category: topic.category.name.clone(),
            topic: topic.title.clone(),
            law: text(Field::Law),
            know_your_rights: text(Field::Rights),
            how_to_identify: text(Field::Identification),
            self_help: text(Field::SelfHelp),
            remark: text(Field::Remark),
            slug: topic.slug.clone(),
        }
    }
}

/// How a [`Scenario`] selects topics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    Category,
    Keyword,
}

/// A curated entry point into the index, supplied by the consuming
/// application at call time. Never persisted in the index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    pub id: String,
    pub match_mode: MatchMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_ref: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// An interactive query: free text plus an optional active category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Query {
    pub text: String,
    #[serde(default)]
    pub active_category: Option<String>,
}

impl Query {
    pub fn new(text: impl Into<String>, active_category: Option<&str>) -> Self {
        Self {
            text: text.into(),
            active_category: active_category.map(str::to_string),
        }
    }
}
