//! `guide search`: free-text query over the flat artifact.

use anyhow::Result;
use rights_guide_core::models::{Query, TopicRow};
use rights_guide_core::search::apply_query;

use crate::analytics::{create_sink, record_quietly, AnalyticsEvent};
use crate::artifacts::load_flat;
use crate::config::Config;

const SNIPPET_CHARS: usize = 120;

pub async fn run_search(
    config: &Config,
    text: &str,
    category: Option<&str>,
    limit: Option<usize>,
) -> Result<()> {
    let topics = load_flat(config)?;
    let query = Query::new(text, category);
    let mut results = apply_query(&topics, &query);

    if !text.trim().is_empty() {
        let sink = create_sink(&config.analytics)?;
        record_quietly(sink.as_ref(), AnalyticsEvent::search(text, results.len())).await;
    }

    if let Some(limit) = limit {
        results.truncate(limit);
    }

    print_rows(&results);
    Ok(())
}

/// Print rows in the numbered listing shared by `search` and `scenario`.
pub fn print_rows(rows: &[&TopicRow]) {
    if rows.is_empty() {
        println!("No results.");
        return;
    }

    for (i, row) in rows.iter().enumerate() {
        println!("{}. {}", i + 1, row.topic);
        println!("    category: {}", row.category);
        println!("    slug: {}", row.slug);
        if let Some(rights) = row.know_your_rights.as_deref() {
            println!("    rights: \"{}\"", snippet(rights));
        }
        println!();
    }
}

/// First line of `text`, cut to a fixed number of characters.
fn snippet(text: &str) -> String {
    let first = text.lines().next().unwrap_or("").trim();
    if first.chars().count() > SNIPPET_CHARS {
        let cut: String = first.chars().take(SNIPPET_CHARS).collect();
        format!("{}…", cut)
    } else {
        first.to_string()
    }
}
