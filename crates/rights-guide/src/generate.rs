//! Generation pipeline orchestration.
//!
//! Coordinates one batch run: source file → header validation → normalization
//! → snapshot → artifacts. Row anomalies are logged and never fail the run;
//! unreadable or structurally invalid input aborts before anything is written.
//! The artifact set is staged in full before any file is replaced; see
//! [`crate::artifacts::write_all_atomic`] for the guarantee.

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{debug, info, warn};

use rights_guide_core::normalize::normalize;
use rights_guide_core::snapshot::Snapshot;
use rights_guide_core::source::parse_source;

use crate::artifacts::{self, write_all_atomic};
use crate::config::Config;

/// Read and normalize the configured source into a snapshot.
pub fn build_snapshot(config: &Config) -> Result<Snapshot> {
    let path = &config.source.path;
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read source file: {}", path.display()))?;

    let table = parse_source(&text, config.source.delimiter_byte())
        .with_context(|| format!("Invalid source file: {}", path.display()))?;

    for header in table.layout.ignored_headers() {
        debug!(header = %header, "ignoring unrecognized column");
    }
    for field in table.layout.missing_optional() {
        warn!(field = field.as_str(), "optional column missing, field will be empty");
    }

    let normalized = normalize(&table.rows);
    for anomaly in &normalized.anomalies {
        warn!("{}", anomaly);
    }

    info!(
        rows = table.rows.len(),
        topics = normalized.index.topics.len(),
        categories = normalized.index.categories.len(),
        "normalized source"
    );

    Ok(Snapshot::build(
        normalized.index,
        &config.source.display_name(),
        Utc::now(),
    ))
}

pub fn run_generate(config: &Config, dry_run: bool) -> Result<()> {
    let snapshot = build_snapshot(config)?;

    if dry_run {
        println!("generate {} (dry-run)", config.source.path.display());
        println!("  topics: {}", snapshot.metadata.total_topics);
        println!("  categories: {}", snapshot.metadata.total_categories);
        return Ok(());
    }

    // Everything is serialized before the first file is touched.
    let rendered = artifacts::render(&snapshot, &config.output)?;

    write_all_atomic(&rendered)?;
    for artifact in &rendered {
        debug!(path = %artifact.path.display(), bytes = artifact.contents.len(), "wrote artifact");
    }

    println!("generate {}", config.source.path.display());
    println!("  topics: {}", snapshot.metadata.total_topics);
    println!("  categories: {}", snapshot.metadata.total_categories);
    for artifact in &rendered {
        println!("  wrote: {}", artifact.path.display());
    }
    println!("ok");

    Ok(())
}
