//! Normalizer: raw rows → [`TopicIndex`].
//!
//! Per-row anomalies never fail the run. They are handled by a fixed
//! policy and returned as [`RowAnomaly`] values for the caller to log:
//!
//! | Anomaly | Policy |
//! |---------|--------|
//! | blank title | row dropped |
//! | duplicate slug | stable numeric suffix in row order (`-2`, `-3`, …) |
//! | title yields an empty slug | falls back to `topic-<row>` |
//!
//! Categories are collected from every row with a non-blank category, in
//! first-seen order, and deduplicated by derived id; the first spelling
//! seen becomes the canonical name. Synthetic ids (`uncategorized`,
//! `category_<n>`) are claimed like any other, so a later category whose id
//! is already taken gets a numeric suffix instead of being merged.

use std::collections::{HashMap, HashSet};
use std::fmt;

use indexmap::IndexMap;

use crate::blocks::parse_section;
use crate::models::{Category, CategoryGroup, Field, RawFields, RawRow, Sections, Topic, TopicIndex};
use crate::slug::{canonical_tokens, join_tokens, with_suffix, ID_SEPARATOR, SLUG_SEPARATOR};

/// Id and slug of the category assigned to topics with a blank category.
pub const UNCATEGORIZED: &str = "uncategorized";

/// A non-fatal problem found in one source row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowAnomaly {
    BlankTitle {
        row: usize,
    },
    DuplicateSlug {
        row: usize,
        slug: String,
        resolved: String,
    },
    EmptySlug {
        row: usize,
        title: String,
        fallback: String,
    },
}

impl fmt::Display for RowAnomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowAnomaly::BlankTitle { row } => write!(f, "row {}: blank topic title, row dropped", row),
            RowAnomaly::DuplicateSlug {
                row,
                slug,
                resolved,
            } => write!(
                f,
                "row {}: slug '{}' already taken, using '{}'",
                row, slug, resolved
            ),
            RowAnomaly::EmptySlug {
                row,
                title,
                fallback,
            } => write!(
                f,
                "row {}: title '{}' yields an empty slug, using '{}'",
                row, title, fallback
            ),
        }
    }
}

/// Result of a normalization run.
#[derive(Debug, Clone)]
pub struct Normalized {
    pub index: TopicIndex,
    pub anomalies: Vec<RowAnomaly>,
}

/// Normalize source rows into a [`TopicIndex`].
pub fn normalize(rows: &[RawRow]) -> Normalized {
    let mut anomalies = Vec::new();
    let mut categories = CategoryTable::collect(rows);
    let mut keys = KeyRegistry::default();
    let mut topics = Vec::new();

    for (i, row) in rows.iter().enumerate() {
        let row_index = i + 1;
        let title = row.trimmed(Field::Topic);
        if title.is_empty() {
            anomalies.push(RowAnomaly::BlankTitle { row: row_index });
            continue;
        }

        let tokens = canonical_tokens(title);
        let (base_slug, base_id) = if tokens.is_empty() {
            let slug = format!("topic{}{}", SLUG_SEPARATOR, row_index);
            anomalies.push(RowAnomaly::EmptySlug {
                row: row_index,
                title: title.to_string(),
                fallback: slug.clone(),
            });
            (slug, format!("topic{}{}", ID_SEPARATOR, row_index))
        } else {
            (
                join_tokens(&tokens, SLUG_SEPARATOR),
                join_tokens(&tokens, ID_SEPARATOR),
            )
        };

        let (slug, id) = keys.claim(&base_slug, &base_id);
        if slug != base_slug {
            anomalies.push(RowAnomaly::DuplicateSlug {
                row: row_index,
                slug: base_slug,
                resolved: slug.clone(),
            });
        }

        topics.push(Topic {
            id,
            slug,
            title: title.to_string(),
            category: categories.resolve(row.trimmed(Field::Category)),
            sections: Sections {
                law: parse_section(row.get(Field::Law)),
                rights: parse_section(row.get(Field::Rights)),
                identification: parse_section(row.get(Field::Identification)),
                self_help: parse_section(row.get(Field::SelfHelp)),
                remarks: parse_section(row.get(Field::Remark)),
            },
            raw_fields: RawFields::from_row(row),
            row_index,
        });
    }

    let categories = categories.into_categories();
    let topics_by_category = group_by_category(&categories, &topics);

    Normalized {
        index: TopicIndex {
            categories,
            topics,
            topics_by_category,
        },
        anomalies,
    }
}

/// Group topics under their category id. Every category gets an entry,
/// empty or not, in category order.
pub fn group_by_category(
    categories: &[Category],
    topics: &[Topic],
) -> IndexMap<String, CategoryGroup> {
    let mut groups: IndexMap<String, CategoryGroup> = categories
        .iter()
        .map(|c| {
            (
                c.id.clone(),
                CategoryGroup {
                    category: c.clone(),
                    topics: Vec::new(),
                },
            )
        })
        .collect();

    for topic in topics {
        if let Some(group) = groups.get_mut(&topic.category.id) {
            group.topics.push(topic.clone());
        }
    }

    groups
}

/// How a category name is recognised as "the same" category.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum CategoryKey {
    Blank,
    /// Derived id of a name with at least one retained token.
    Derived(String),
    /// A name with no retained characters, compared verbatim.
    Unsluggable(String),
}

/// Deduplicated categories in first-seen order.
///
/// Names are merged only when their derived ids agree. Every distinct key
/// claims its id through a [`KeyRegistry`], so a synthetic id
/// (`uncategorized`, `category_<n>`) never absorbs a real name that derives
/// to the same string; the later claimant gets a numeric suffix.
struct CategoryTable {
    by_id: IndexMap<String, Category>,
    ids_by_key: HashMap<CategoryKey, String>,
    keys: KeyRegistry,
    unsluggable: usize,
}

impl CategoryTable {
    fn collect(rows: &[RawRow]) -> Self {
        let mut table = Self {
            by_id: IndexMap::new(),
            ids_by_key: HashMap::new(),
            keys: KeyRegistry::default(),
            unsluggable: 0,
        };
        for row in rows {
            let name = row.trimmed(Field::Category);
            if !name.is_empty() {
                table.resolve(name);
            }
        }
        table
    }

    /// Canonical category for a trimmed name, registering it if new.
    fn resolve(&mut self, name: &str) -> Category {
        let tokens = canonical_tokens(name);
        let key = if name.is_empty() {
            CategoryKey::Blank
        } else if tokens.is_empty() {
            CategoryKey::Unsluggable(name.to_string())
        } else {
            CategoryKey::Derived(join_tokens(&tokens, ID_SEPARATOR))
        };

        if let Some(category) = self.ids_by_key.get(&key).and_then(|id| self.by_id.get(id)) {
            return category.clone();
        }

        let (base_slug, base_id) = match &key {
            CategoryKey::Blank => (UNCATEGORIZED.to_string(), UNCATEGORIZED.to_string()),
            CategoryKey::Unsluggable(_) => {
                self.unsluggable += 1;
                (
                    format!("category{}{}", SLUG_SEPARATOR, self.unsluggable),
                    format!("category{}{}", ID_SEPARATOR, self.unsluggable),
                )
            }
            CategoryKey::Derived(id) => (join_tokens(&tokens, SLUG_SEPARATOR), id.clone()),
        };
        let (slug, id) = self.keys.claim(&base_slug, &base_id);

        let category = Category {
            id: id.clone(),
            name: name.to_string(),
            slug,
        };
        self.ids_by_key.insert(key, id.clone());
        self.by_id.insert(id, category.clone());
        category
    }

    fn into_categories(self) -> Vec<Category> {
        self.by_id.into_values().collect()
    }
}

/// Tracks claimed slugs and ids so every topic gets a unique pair.
#[derive(Default)]
struct KeyRegistry {
    slugs: HashSet<String>,
    ids: HashSet<String>,
}

impl KeyRegistry {
    fn claim(&mut self, base_slug: &str, base_id: &str) -> (String, String) {
        let mut slug = base_slug.to_string();
        let mut id = base_id.to_string();
        let mut n = 1;
        while self.slugs.contains(&slug) || self.ids.contains(&id) {
            n += 1;
            slug = with_suffix(base_slug, n, SLUG_SEPARATOR);
            id = with_suffix(base_id, n, ID_SEPARATOR);
        }
        self.slugs.insert(slug.clone());
        self.ids.insert(id.clone());
        (slug, id)
    }
}
