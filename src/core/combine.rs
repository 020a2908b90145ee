use crate::core::fasta;
use crate::core::io::read_input;
use crate::core::model::SequenceRecord;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Normalises user-supplied extensions: lower case, no leading dots.
pub fn normalize_extensions<I, S>(exts: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for ext in exts {
        let ext = ext.as_ref().trim().trim_start_matches('.').to_ascii_lowercase();
        if !ext.is_empty() && !out.contains(&ext) {
            out.push(ext);
        }
    }
    out
}

/// True when the file name ends in one of `exts`, optionally followed by `.gz`.
pub fn matches_extension(file_name: &str, exts: &[String]) -> bool {
    let lower = file_name.to_ascii_lowercase();
    let stem = lower.strip_suffix(".gz").unwrap_or(&lower);
    exts.iter().any(|ext| {
        stem.strip_suffix(ext.as_str())
            .and_then(|rest| rest.strip_suffix('.'))
            .is_some_and(|rest| !rest.is_empty())
    })
}

/// Archive files in `dir`, sorted by file name.
///
/// A missing directory is not an error; it yields an empty list.
pub fn list_archives(dir: &Path, exts: &[String]) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        warn!(dir = %dir.display(), "input directory not found");
        return Ok(Vec::new());
    }
    let mut files = Vec::new();
    for entry in
        fs::read_dir(dir).with_context(|| format!("failed to read directory {}", dir.display()))?
    {
        let entry = entry.with_context(|| format!("failed to list {}", dir.display()))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if matches_extension(name, exts) {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

pub fn read_archive(path: &Path) -> Result<Vec<SequenceRecord>> {
    let data = read_input(path)?;
    let parsed = fasta::parse(data.bytes())
        .with_context(|| format!("FASTA parse error in {}", path.display()))?;
    if parsed.skipped_lines > 0 {
        warn!(
            file = %path.display(),
            lines = parsed.skipped_lines,
            "skipped text before first FASTA header"
        );
    }
    Ok(parsed.records)
}

/// Concatenates the records of every archive in `dir`, file order first,
/// then record order within each file. Duplicate identifiers pass through.
pub fn combine_dir(dir: &Path, exts: &[String]) -> Result<Vec<SequenceRecord>> {
    let files = list_archives(dir, exts)?;
    if files.is_empty() {
        warn!(dir = %dir.display(), ?exts, "no sequence files found");
        return Ok(Vec::new());
    }
    let mut records = Vec::new();
    for path in &files {
        let mut part = read_archive(path)?;
        debug!(file = %path.display(), records = part.len(), "read archive");
        records.append(&mut part);
    }
    info!(files = files.len(), records = records.len(), "combined archives");
    Ok(records)
}
