use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rusqlite::Connection;
use tracing::{info, warn};

use crate::cli::StatusArgs;
use crate::model::ExtractRunManifest;

pub fn run(args: StatusArgs) -> Result<()> {
    let manifest_dir = args.output_dir.join("manifests");

    info!(output_dir = %args.output_dir.display(), "status requested");

    let manifest = match latest_run_manifest(&manifest_dir)? {
        Some(path) => {
            let raw = fs::read(&path).with_context(|| format!("failed to read {}", path.display()))?;
            let manifest: ExtractRunManifest = serde_json::from_slice(&raw)
                .with_context(|| format!("failed to parse {}", path.display()))?;

            info!(
                run_id = %manifest.run_id,
                status = %manifest.status,
                started_at = %manifest.started_at,
                updated_at = %manifest.updated_at,
                input = %manifest.paths.input_path,
                input_sha256 = %manifest.input_sha256,
                precision_mode = %manifest.precision_mode,
                notaries = manifest.counts.notary_count,
                chunks = manifest.counts.chunk_count,
                back_references = manifest.counts.back_reference_count,
                dates_parsed = manifest.counts.dates_parsed,
                dates_failed = manifest.counts.dates_failed,
                warnings = manifest.warnings.len(),
                "loaded extraction run manifest"
            );
            Some(manifest)
        }
        None => {
            warn!(path = %manifest_dir.display(), "no extraction run manifest found");
            None
        }
    };

    let db_path = args.db_path.clone().or_else(|| {
        manifest
            .as_ref()
            .and_then(|manifest| manifest.paths.db_path.as_ref())
            .map(PathBuf::from)
    });

    match db_path {
        Some(db_path) if db_path.exists() => {
            let conn = Connection::open(&db_path)
                .with_context(|| format!("failed to open {}", db_path.display()))?;
            let notaries = query_count(&conn, "SELECT COUNT(*) FROM notaries").unwrap_or(0);
            let fields = query_count(&conn, "SELECT COUNT(*) FROM notary_fields").unwrap_or(0);
            let derived = query_count(&conn, "SELECT COUNT(*) FROM notary_derived").unwrap_or(0);

            info!(
                path = %db_path.display(),
                notaries,
                fields,
                derived,
                "sqlite export status"
            );
        }
        Some(db_path) => warn!(path = %db_path.display(), "sqlite export missing"),
        None => info!("no sqlite export configured"),
    }

    Ok(())
}

/// Newest `extract_run_*.json`; the compact UTC timestamp in the name sorts
/// chronologically.
fn latest_run_manifest(manifest_dir: &Path) -> Result<Option<PathBuf>> {
    if !manifest_dir.exists() {
        return Ok(None);
    }

    let entries = fs::read_dir(manifest_dir)
        .with_context(|| format!("failed to read {}", manifest_dir.display()))?;

    let mut manifests = Vec::new();
    for entry in entries {
        let entry = entry
            .with_context(|| format!("failed to read entry in {}", manifest_dir.display()))?;
        let path = entry.path();
        let is_run_manifest = path
            .file_name()
            .and_then(|name| name.to_str())
            .map(|name| name.starts_with("extract_run_") && name.ends_with(".json"))
            .unwrap_or(false);
        if is_run_manifest {
            manifests.push(path);
        }
    }

    manifests.sort();
    Ok(manifests.pop())
}

fn query_count(conn: &Connection, sql: &str) -> Result<i64> {
    conn.query_row(sql, [], |row| row.get::<_, i64>(0))
        .with_context(|| format!("failed to run count query: {sql}"))
}
