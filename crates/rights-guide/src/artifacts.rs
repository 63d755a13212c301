//! Output artifact names, atomic writes, and loading.
//!
//! Every artifact is rendered to memory first. `write_all_atomic` then stages
//! each one in a temporary file beside its target and renames them into place
//! only after every temporary file has been written. A failure while staging
//! leaves the previous artifacts untouched. The renames themselves run one
//! after another, so a crash between two of them can still leave a mix of old
//! and new files.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rights_guide_core::models::TopicRow;
use rights_guide_core::snapshot::Snapshot;
use tempfile::NamedTempFile;

use crate::config::{Config, OutputConfig};

pub const FLAT_FILE: &str = "data_flat.json";
pub const GROUPED_FILE: &str = "data_grouped.json";
pub const NORMALIZED_FILE: &str = "data_normalized.json";
pub const SCHEMA_FILE: &str = "schema.json";

/// A rendered artifact waiting to be written.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub path: PathBuf,
    pub contents: String,
}

/// Render every configured artifact for `snapshot`.
pub fn render(snapshot: &Snapshot, output: &OutputConfig) -> Result<Vec<Artifact>> {
    let mut artifacts = vec![
        Artifact {
            path: output.dir.join(FLAT_FILE),
            contents: to_pretty_json(&snapshot.legacy.flat)?,
        },
        Artifact {
            path: output.dir.join(GROUPED_FILE),
            contents: to_pretty_json(&snapshot.legacy.grouped)?,
        },
    ];

    if output.structured {
        artifacts.push(Artifact {
            path: output.dir.join(NORMALIZED_FILE),
            contents: to_pretty_json(snapshot)?,
        });
    }

    if output.schema {
        artifacts.push(Artifact {
            path: output.dir.join(SCHEMA_FILE),
            contents: to_pretty_json(&rights_guide_core::snapshot::schema())?,
        });
    }

    Ok(artifacts)
}

fn to_pretty_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String> {
    let mut json = serde_json::to_string_pretty(value)?;
    json.push('\n');
    Ok(json)
}

/// Write `contents` to `path` via a temporary file in the same directory.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    stage(path, contents)?
        .persist(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Stage every artifact, then rename them into place in order.
///
/// Nothing is renamed unless all artifacts were staged. Staged files are
/// removed when staging fails part-way.
pub fn write_all_atomic(artifacts: &[Artifact]) -> Result<()> {
    let staged = artifacts
        .iter()
        .map(|a| stage(&a.path, a.contents.as_bytes()))
        .collect::<Result<Vec<_>>>()?;

    for (tmp, artifact) in staged.into_iter().zip(artifacts) {
        tmp.persist(&artifact.path)
            .with_context(|| format!("Failed to write {}", artifact.path.display()))?;
    }
    Ok(())
}

fn stage(path: &Path, contents: &[u8]) -> Result<NamedTempFile> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;

    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temporary file in {}", dir.display()))?;
    tmp.write_all(contents)?;
    tmp.as_file().sync_all()?;
    Ok(tmp)
}

/// Load the flat projection the retrieval commands operate on.
pub fn load_flat(config: &Config) -> Result<Vec<TopicRow>> {
    let path = config.output.dir.join(FLAT_FILE);
    let text = std::fs::read_to_string(&path).with_context(|| {
        format!(
            "Failed to read {} (run `guide generate` first)",
            path.display()
        )
    })?;
    serde_json::from_str(&text).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Load the structured document.
pub fn load_snapshot(config: &Config) -> Result<Snapshot> {
    let path = config.output.dir.join(NORMALIZED_FILE);
    let text = std::fs::read_to_string(&path).with_context(|| {
        format!(
            "Failed to read {} (run `guide generate` with output.structured = true)",
            path.display()
        )
    })?;
    serde_json::from_str(&text).with_context(|| format!("Failed to parse {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_atomic_creates_dirs_and_replaces() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested/out.json");

        write_atomic(&path, b"[1]").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[1]");

        write_atomic(&path, b"[2]").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[2]");

        let leftovers: Vec<_> = std::fs::read_dir(path.parent().unwrap())
            .unwrap()
            .collect();
        assert_eq!(leftovers.len(), 1);
    }

    #[test]
    fn test_write_all_atomic_writes_every_artifact() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("out");
        let artifacts = vec![
            Artifact {
                path: out.join(FLAT_FILE),
                contents: "[]\n".to_string(),
            },
            Artifact {
                path: out.join(GROUPED_FILE),
                contents: "{}\n".to_string(),
            },
        ];

        write_all_atomic(&artifacts).unwrap();
        assert_eq!(std::fs::read_to_string(out.join(FLAT_FILE)).unwrap(), "[]\n");
        assert_eq!(std::fs::read_to_string(out.join(GROUPED_FILE)).unwrap(), "{}\n");
        assert_eq!(std::fs::read_dir(&out).unwrap().count(), 2);
    }

    #[test]
    fn test_write_all_atomic_leaves_old_set_when_staging_fails() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("out");
        write_atomic(&out.join(FLAT_FILE), b"old").unwrap();

        // A regular file where a directory is needed makes the second stage fail.
        let blocker = tmp.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();

        let artifacts = vec![
            Artifact {
                path: out.join(FLAT_FILE),
                contents: "new".to_string(),
            },
            Artifact {
                path: blocker.join(SCHEMA_FILE),
                contents: "{}".to_string(),
            },
        ];

        assert!(write_all_atomic(&artifacts).is_err());
        assert_eq!(std::fs::read_to_string(out.join(FLAT_FILE)).unwrap(), "old");
        assert_eq!(std::fs::read_dir(&out).unwrap().count(), 1);
    }

    #[test]
    fn test_render_respects_output_flags() {
        let snapshot = Snapshot::build(Default::default(), "s", chrono::Utc::now());
        let output = OutputConfig {
            dir: PathBuf::from("out"),
            structured: false,
            schema: false,
        };
        let names: Vec<String> = render(&snapshot, &output)
            .unwrap()
            .iter()
            .map(|a| a.path.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec![FLAT_FILE, GROUPED_FILE]);
    }
}
