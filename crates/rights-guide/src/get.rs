//! `guide get`: show one topic by slug.

use anyhow::Result;
use rights_guide_core::models::TopicRow;
use rights_guide_core::search::find_by_slug;

use crate::analytics::{create_sink, record_quietly, AnalyticsEvent};
use crate::artifacts::load_flat;
use crate::config::Config;

pub async fn run_get(config: &Config, slug: &str) -> Result<()> {
    let topics = load_flat(config)?;

    let Some(row) = find_by_slug(&topics, slug) else {
        println!("Topic not found: {}", slug);
        return Ok(());
    };

    let sink = create_sink(&config.analytics)?;
    record_quietly(
        sink.as_ref(),
        AnalyticsEvent::TopicView {
            slug: row.slug.clone(),
        },
    )
    .await;

    print_topic(row);
    Ok(())
}

fn print_topic(row: &TopicRow) {
    println!("--- Topic ---");
    println!("title:    {}", row.topic);
    println!("category: {}", row.category);
    println!("slug:     {}", row.slug);
    println!();

    let sections = [
        ("Law", &row.law),
        ("Know your rights", &row.know_your_rights),
        ("How to identify", &row.how_to_identify),
        ("Self help", &row.self_help),
        ("Remark", &row.remark),
    ];
    for (heading, body) in sections {
        if let Some(body) = body {
            println!("--- {} ---", heading);
            println!("{}", body);
            println!();
        }
    }
}
