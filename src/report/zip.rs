use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

pub const ZIP_NAME: &str = "kira_seqstats_results.zip";
const ZIP_ROOT: &str = "kira_seqstats_results";

/// Bundles `files` (all inside `out_dir`) into `out_dir/ZIP_NAME`.
pub fn write_zip(out_dir: &Path, files: &[PathBuf]) -> Result<PathBuf> {
    let zip_path = out_dir.join(ZIP_NAME);
    let tmp_path = out_dir.join(format!("{}.tmp", ZIP_NAME));

    let file = File::create(&tmp_path)
        .with_context(|| format!("failed to create {}", tmp_path.display()))?;
    let mut zip = ZipWriter::new(file);
    let result = write_zip_entries(&mut zip, files);

    let result = result
        .and_then(|_| zip.finish().with_context(|| "failed to finalize zip"))
        .and_then(|_| {
            fs::rename(&tmp_path, &zip_path)
                .with_context(|| format!("failed to move zip to {}", zip_path.display()))
        });
    match result {
        Ok(()) => Ok(zip_path),
        Err(e) => {
            let _ = fs::remove_file(&tmp_path);
            Err(e)
        }
    }
}

fn write_zip_entries(zip: &mut ZipWriter<File>, files: &[PathBuf]) -> Result<()> {
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(
            zip::DateTime::from_date_and_time(1980, 1, 1, 0, 0, 0)
                .map_err(|e| anyhow::anyhow!("invalid zip timestamp: {e}"))?,
        );

    zip.add_directory(format!("{}/", ZIP_ROOT), options)
        .with_context(|| "failed to add directory entry to zip")?;

    for src_path in files {
        let name = src_path
            .file_name()
            .and_then(|n| n.to_str())
            .with_context(|| format!("unsupported file name {}", src_path.display()))?;
        let zip_path = format!("{}/{}", ZIP_ROOT, name);
        add_file(zip, src_path, &zip_path, options)
            .with_context(|| format!("failed to add {} to zip", name))?;
    }
    Ok(())
}

fn add_file(
    zip: &mut ZipWriter<File>,
    src_path: &Path,
    zip_path: &str,
    options: SimpleFileOptions,
) -> Result<()> {
    let mut file =
        File::open(src_path).with_context(|| format!("failed to open {}", src_path.display()))?;
    zip.start_file(zip_path, options)?;
    let mut buf = [0u8; 8192];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        zip.write_all(&buf[..n])?;
    }
    Ok(())
}
