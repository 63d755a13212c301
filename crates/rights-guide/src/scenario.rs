//! `guide scenario`: list configured scenarios or resolve one.

use anyhow::{bail, Result};
use rights_guide_core::models::MatchMode;
use rights_guide_core::search::resolve_scenario;

use crate::artifacts::load_flat;
use crate::config::Config;
use crate::search::print_rows;

pub fn run_scenario(config: &Config, id: Option<&str>) -> Result<()> {
    let Some(id) = id else {
        list_scenarios(config);
        return Ok(());
    };

    let Some(entry) = config.scenario(id) else {
        let known: Vec<&str> = config.scenarios.iter().map(|s| s.id.as_str()).collect();
        bail!(
            "Unknown scenario: '{}'. Available: {}",
            id,
            if known.is_empty() {
                "(none configured)".to_string()
            } else {
                known.join(", ")
            }
        );
    };

    let topics = load_flat(config)?;
    let results = resolve_scenario(&topics, &entry.to_scenario());
    print_rows(&results);
    Ok(())
}

fn list_scenarios(config: &Config) {
    if config.scenarios.is_empty() {
        println!("No scenarios configured.");
        return;
    }

    println!("{:<24} {:<8} {:<8} TITLE", "ID", "MODE", "URGENCY");
    for s in &config.scenarios {
        let mode = match s.match_mode() {
            MatchMode::Category => "category",
            MatchMode::Keyword => "keyword",
        };
        let urgency = match s.urgency {
            Some(u) => format!("{:?}", u).to_lowercase(),
            None => "-".to_string(),
        };
        println!(
            "{:<24} {:<8} {:<8} {}",
            s.id,
            mode,
            urgency,
            s.title.as_deref().unwrap_or("")
        );
    }
}
