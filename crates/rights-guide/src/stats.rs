//! Artifact statistics overview.
//!
//! Summarizes the structured artifact: totals, generation time, and a
//! per-category breakdown of how many topics carry each content section.
//! Used by `guide stats` to confirm a generation run produced what was
//! expected.

use anyhow::Result;
use chrono::{DateTime, Utc};
use rights_guide_core::models::Topic;

use crate::artifacts::{load_snapshot, NORMALIZED_FILE};
use crate::config::Config;

/// Per-category breakdown of topic and section counts.
struct CategoryStats {
    name: String,
    topics: usize,
    with_law: usize,
    with_self_help: usize,
}

impl CategoryStats {
    fn from_topics(name: &str, topics: &[Topic]) -> Self {
        Self {
            name: if name.is_empty() {
                "(uncategorized)".to_string()
            } else {
                name.to_string()
            },
            topics: topics.len(),
            with_law: topics.iter().filter(|t| t.sections.law.is_some()).count(),
            with_self_help: topics
                .iter()
                .filter(|t| t.sections.self_help.is_some())
                .count(),
        }
    }
}

/// Run the stats command: load the structured artifact and print a summary.
pub fn run_stats(config: &Config) -> Result<()> {
    let snapshot = load_snapshot(config)?;
    let path = config.output.dir.join(NORMALIZED_FILE);
    let size = std::fs::metadata(&path).map(|m| m.len()).unwrap_or(0);

    println!("Rights Guide: Artifact Stats");
    println!("============================");
    println!();
    println!("  Artifact:    {}", path.display());
    println!("  Size:        {}", format_bytes(size));
    println!("  Source:      {}", snapshot.metadata.source);
    println!("  Version:     {}", snapshot.metadata.version);
    println!(
        "  Generated:   {}",
        format_generated(&snapshot.metadata.generated_at)
    );
    println!();
    println!("  Topics:      {}", snapshot.metadata.total_topics);
    println!("  Categories:  {}", snapshot.metadata.total_categories);

    let stats: Vec<CategoryStats> = snapshot
        .topics_by_category
        .values()
        .map(|group| CategoryStats::from_topics(&group.category.name, &group.topics))
        .collect();

    if !stats.is_empty() {
        println!();
        println!("  By category:");
        println!(
            "  {:<32} {:>6} {:>6} {:>10}",
            "CATEGORY", "TOPICS", "LAW", "SELF-HELP"
        );
        println!("  {}", "-".repeat(58));

        for s in &stats {
            println!(
                "  {:<32} {:>6} {:>6} {:>10}",
                s.name, s.topics, s.with_law, s.with_self_help
            );
        }
    }

    println!();
    Ok(())
}

/// Format a byte count as a human-readable string.
fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

/// Render the stored RFC 3339 timestamp relative to now, falling back to
/// the raw string when it does not parse.
fn format_generated(raw: &str) -> String {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(ts) => format_relative(ts.with_timezone(&Utc), Utc::now()),
        Err(_) => raw.to_string(),
    }
}

fn format_relative(ts: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let delta = (now - ts).num_seconds();

    if delta < 0 {
        return ts.format("%Y-%m-%d %H:%M").to_string();
    }

    if delta < 60 {
        "just now".to_string()
    } else if delta < 3600 {
        let mins = delta / 60;
        format!("{} min{} ago", mins, if mins == 1 { "" } else { "s" })
    } else if delta < 86400 {
        let hours = delta / 3600;
        format!("{} hour{} ago", hours, if hours == 1 { "" } else { "s" })
    } else if delta < 86400 * 30 {
        let days = delta / 86400;
        format!("{} day{} ago", days, if days == 1 { "" } else { "s" })
    } else {
        ts.format("%Y-%m-%d %H:%M").to_string()
    }
}
