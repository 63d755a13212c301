//! Retrieval engine: text search, category filter, and scenario matching.
//!
//! Every operation is a stable filter over a borrowed slice. Matching
//! topics come back in input order and the input is never mutated, so the
//! functions are safe to call from any number of threads at once. There is
//! no scoring: a topic either matches or it does not.
//!
//! # Matching Rules
//!
//! | Operation | Fields tested | Predicate |
//! |-----------|---------------|-----------|
//! | [`search_text`] | [`TEXT_QUERY_FIELDS`] | case-insensitive substring, any field |
//! | [`filter_by_category`] | category name | exact equality |
//! | [`resolve_scenario`] (keyword) | [`SCENARIO_KEYWORD_FIELDS`] | any keyword is a case-insensitive substring of any field |
//! | [`resolve_scenario`] (category) | category name | exact equality |
//!
//! [`apply_query`] narrows by category first, then applies the text
//! predicate to what is left.

use crate::models::{Field, MatchMode, Query, Scenario, Topic, TopicRow};

/// A field the retrieval engine can test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    Title,
    Category,
    Rights,
    Identification,
    SelfHelp,
}

/// Fields tested by free-text queries, in test order.
pub const TEXT_QUERY_FIELDS: [SearchField; 5] = [
    SearchField::Title,
    SearchField::Category,
    SearchField::Rights,
    SearchField::Identification,
    SearchField::SelfHelp,
];

/// Fields tested by keyword scenarios, in test order.
pub const SCENARIO_KEYWORD_FIELDS: [SearchField; 3] = [
    SearchField::Title,
    SearchField::Category,
    SearchField::Rights,
];

/// A record the engine can search.
///
/// Implemented for the flat [`TopicRow`] the presentation layer holds in
/// memory and for the structured [`Topic`].
pub trait Searchable {
    /// Text of `field`, or `None` when the record has none.
    fn field(&self, field: SearchField) -> Option<&str>;

    fn slug(&self) -> &str;

    fn category_name(&self) -> &str {
        self.field(SearchField::Category).unwrap_or("")
    }
}

impl Searchable for TopicRow {
    fn field(&self, field: SearchField) -> Option<&str> {
        match field {
            SearchField::Title => Some(&self.topic),
            SearchField::Category => Some(&self.category),
            SearchField::Rights => self.know_your_rights.as_deref(),
            SearchField::Identification => self.how_to_identify.as_deref(),
            SearchField::SelfHelp => self.self_help.as_deref(),
        }
    }

    fn slug(&self) -> &str {
        &self.slug
    }
}

impl Searchable for Topic {
    fn field(&self, field: SearchField) -> Option<&str> {
        match field {
            SearchField::Title => Some(&self.title),
            SearchField::Category => Some(&self.category.name),
            SearchField::Rights => self.field_text(Field::Rights),
            SearchField::Identification => self.field_text(Field::Identification),
            SearchField::SelfHelp => self.field_text(Field::SelfHelp),
        }
    }

    fn slug(&self) -> &str {
        &self.slug
    }
}

/// A lower-cased needle tested against an ordered field list.
#[derive(Debug, Clone)]
struct Needle {
    lowered: String,
}

impl Needle {
    fn new(text: &str) -> Self {
        Self {
            lowered: text.to_lowercase(),
        }
    }

    /// True if any field contains the needle. Stops at the first hit.
    fn found_in<T: Searchable + ?Sized>(&self, topic: &T, fields: &[SearchField]) -> bool {
        fields.iter().any(|f| {
            topic
                .field(*f)
                .is_some_and(|value| value.to_lowercase().contains(&self.lowered))
        })
    }
}

/// Free-text search across [`TEXT_QUERY_FIELDS`].
///
/// A blank (whitespace-only) `text` is the cleared-query state and returns
/// every topic. Otherwise `text` is matched as given, untrimmed.
pub fn search_text<'a, T: Searchable>(topics: &'a [T], text: &str) -> Vec<&'a T> {
    retain_text(topics.iter().collect(), text)
}

/// Exact category filter; `None` returns every topic.
pub fn filter_by_category<'a, T: Searchable>(topics: &'a [T], category: Option<&str>) -> Vec<&'a T> {
    match category {
        None => topics.iter().collect(),
        Some(name) => topics.iter().filter(|t| t.category_name() == name).collect(),
    }
}

/// Select the topics a scenario points at.
///
/// A category scenario without a `category_ref` matches nothing. Blank
/// keywords are ignored, so a keyword scenario with none left matches
/// nothing.
pub fn resolve_scenario<'a, T: Searchable>(topics: &'a [T], scenario: &Scenario) -> Vec<&'a T> {
    match scenario.match_mode {
        MatchMode::Category => match scenario.category_ref.as_deref() {
            Some(category) => filter_by_category(topics, Some(category)),
            None => Vec::new(),
        },
        MatchMode::Keyword => {
            let needles: Vec<Needle> = scenario
                .keywords
                .iter()
                .filter(|k| !k.trim().is_empty())
                .map(|k| Needle::new(k))
                .collect();
            topics
                .iter()
                .filter(|t| {
                    needles
                        .iter()
                        .any(|n| n.found_in(*t, &SCENARIO_KEYWORD_FIELDS))
                })
                .collect()
        }
    }
}

/// Category filter, then text search on the narrowed set.
pub fn apply_query<'a, T: Searchable>(topics: &'a [T], query: &Query) -> Vec<&'a T> {
    let narrowed = filter_by_category(topics, query.active_category.as_deref());
    retain_text(narrowed, &query.text)
}

/// Resolve one topic by exact slug.
pub fn find_by_slug<'a, T: Searchable>(topics: &'a [T], slug: &str) -> Option<&'a T> {
    topics.iter().find(|t| t.slug() == slug)
}

/// Distinct category names in first-seen order, for filter chips.
pub fn distinct_categories<T: Searchable>(topics: &[T]) -> Vec<&str> {
    let mut names: Vec<&str> = Vec::new();
    for topic in topics {
        let name = topic.category_name();
        if !names.contains(&name) {
            names.push(name);
        }
    }
    names
}

fn retain_text<'a, T: Searchable>(candidates: Vec<&'a T>, text: &str) -> Vec<&'a T> {
    if text.trim().is_empty() {
        return candidates;
    }
    let needle = Needle::new(text);
    candidates
        .into_iter()
        .filter(|t| needle.found_in(*t, &TEXT_QUERY_FIELDS))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn topic(title: &str, category: &str, rights: Option<&str>) -> TopicRow {
        TopicRow {
            category: category.to_string(),
            topic: title.to_string(),
            law: None,
            know_your_rights: rights.map(str::to_string),
            how_to_identify: None,
            self_help: None,
            remark: None,
            slug: crate::slug::slugify(title),
        }
    }

    fn fixture() -> Vec<TopicRow> {
        vec![
            topic("Wage theft", "Work", Some("overtime pay rules")),
            topic("Visa renewal", "Documents", None),
        ]
    }

    fn titles<T: Searchable>(results: &[&T]) -> Vec<String> {
        results
            .iter()
            .map(|t| t.field(SearchField::Title).unwrap_or("").to_string())
            .collect()
    }

    fn keyword_scenario(keywords: &[&str]) -> Scenario {
        Scenario {
            id: "kw".to_string(),
            match_mode: MatchMode::Keyword,
            category_ref: None,
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }

    #[test]
    fn test_empty_query_is_identity() {
        let topics = fixture();
        for text in ["", "   ", "\t\n"] {
            let results = search_text(&topics, text);
            assert_eq!(results.len(), topics.len());
            assert!(results.iter().zip(&topics).all(|(r, t)| *r == t));
        }
    }

    #[test]
    fn test_case_insensitive() {
        let topics = vec![
            topic("Labor inspection", "Work", None),
            topic("Housing", "Life", Some("collective LABOR agreements")),
            topic("Visa", "Documents", None),
        ];
        let upper = search_text(&topics, "LABOR");
        let lower = search_text(&topics, "labor");
        assert_eq!(upper, lower);
        assert_eq!(titles(&upper), vec!["Labor inspection", "Housing"]);
    }

    #[test]
    fn test_searches_all_guidance_fields() {
        let mut row = topic("A", "Work", None);
        row.how_to_identify = Some("Look for a missing payslip".to_string());
        let mut other = topic("B", "Work", None);
        other.self_help = Some("Contact the labour office".to_string());
        let mut law_only = topic("C", "Work", None);
        law_only.law = Some("payslip act".to_string());
        law_only.remark = Some("labour".to_string());
        let topics = vec![row, other, law_only];

        assert_eq!(titles(&search_text(&topics, "payslip")), vec!["A"]);
        assert_eq!(titles(&search_text(&topics, "labour")), vec!["B"]);
    }

    #[test]
    fn test_matches_category_name() {
        let topics = fixture();
        assert_eq!(titles(&search_text(&topics, "docu")), vec!["Visa renewal"]);
    }

    #[test]
    fn test_order_preserved() {
        let topics = vec![
            topic("c work", "Work", None),
            topic("a other", "Docs", None),
            topic("b work", "Work", None),
        ];
        assert_eq!(titles(&search_text(&topics, "work")), vec!["c work", "b work"]);
        assert_eq!(
            titles(&filter_by_category(&topics, Some("Work"))),
            vec!["c work", "b work"]
        );
        assert_eq!(
            titles(&resolve_scenario(&topics, &keyword_scenario(&["b ", "c "]))),
            vec!["c work", "b work"]
        );
    }

    #[test]
    fn test_query_text_not_trimmed() {
        let topics = vec![topic("labor", "Work", None)];
        assert!(search_text(&topics, "labor ").is_empty());
    }

    #[test]
    fn test_filter_by_category_exact() {
        let topics = fixture();
        assert_eq!(filter_by_category(&topics, None).len(), 2);
        assert_eq!(titles(&filter_by_category(&topics, Some("Work"))), vec!["Wage theft"]);
        assert!(filter_by_category(&topics, Some("work")).is_empty());
        assert!(filter_by_category(&topics, Some("Wor")).is_empty());
    }

    #[test]
    fn test_keyword_scenario() {
        let topics = fixture();
        let results = resolve_scenario(&topics, &keyword_scenario(&["overtime"]));
        assert_eq!(titles(&results), vec!["Wage theft"]);
    }

    #[test]
    fn test_keyword_scenario_ignores_other_fields() {
        let mut row = topic("A", "Work", None);
        row.self_help = Some("overtime".to_string());
        let topics = vec![row];
        assert!(resolve_scenario(&topics, &keyword_scenario(&["overtime"])).is_empty());
    }

    #[test]
    fn test_keyword_scenario_case_insensitive_any_keyword() {
        let topics = fixture();
        let results = resolve_scenario(&topics, &keyword_scenario(&["nothing", "VISA"]));
        assert_eq!(titles(&results), vec!["Visa renewal"]);
    }

    #[test]
    fn test_blank_keywords_match_nothing() {
        let topics = fixture();
        assert!(resolve_scenario(&topics, &keyword_scenario(&["", "  "])).is_empty());
        assert!(resolve_scenario(&topics, &keyword_scenario(&[])).is_empty());
    }

    #[test]
    fn test_category_scenario() {
        let topics = fixture();
        let scenario = Scenario {
            id: "docs".to_string(),
            match_mode: MatchMode::Category,
            category_ref: Some("Documents".to_string()),
            keywords: vec!["overtime".to_string()],
        };
        assert_eq!(titles(&resolve_scenario(&topics, &scenario)), vec!["Visa renewal"]);

        let dangling = Scenario {
            category_ref: None,
            ..scenario
        };
        assert!(resolve_scenario(&topics, &dangling).is_empty());
    }

    #[test]
    fn test_conjunctive_filter() {
        let topics = fixture();
        let query = Query::new("visa", Some("Work"));
        assert!(apply_query(&topics, &query).is_empty());

        let query = Query::new("visa", Some("Documents"));
        assert_eq!(titles(&apply_query(&topics, &query)), vec!["Visa renewal"]);

        let query = Query::new("", Some("Work"));
        assert_eq!(titles(&apply_query(&topics, &query)), vec!["Wage theft"]);

        let query = Query::new("", None);
        assert_eq!(apply_query(&topics, &query).len(), 2);
    }

    #[test]
    fn test_find_by_slug() {
        let topics = fixture();
        assert_eq!(
            find_by_slug(&topics, "visa-renewal").map(|t| t.topic.as_str()),
            Some("Visa renewal")
        );
        assert!(find_by_slug(&topics, "missing").is_none());
        assert!(find_by_slug(&topics, "Visa-Renewal").is_none());
    }

    #[test]
    fn test_distinct_categories() {
        let topics = vec![
            topic("a", "Work", None),
            topic("b", "Docs", None),
            topic("c", "Work", None),
        ];
        assert_eq!(distinct_categories(&topics), vec!["Work", "Docs"]);
    }

    #[test]
    fn test_structured_topics_are_searchable() {
        use crate::models::RawRow;
        use crate::normalize::normalize;

        let rows = vec![
            RawRow::new()
                .with(Field::Category, "Work")
                .with(Field::Topic, "Wage theft")
                .with(Field::Rights, "  overtime pay rules  "),
            RawRow::new()
                .with(Field::Category, "Documents")
                .with(Field::Topic, "Visa renewal"),
        ];
        let index = normalize(&rows).index;
        let results = search_text(&index.topics, "OVERTIME");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].slug, "wage-theft");
        assert!(apply_query(&index.topics, &Query::new("visa", Some("Work"))).is_empty());
    }
}
