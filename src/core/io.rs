use anyhow::{Context, Result};
use flate2::read::MultiGzDecoder;
use memmap2::Mmap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

pub struct MmapSource {
    mmap: Mmap,
}

impl MmapSource {
    pub fn open(path: &Path) -> Result<Self> {
        let file =
            File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
        // SAFETY: read-only file mapping.
        let mmap = unsafe { Mmap::map(&file) }
            .with_context(|| format!("mmap failed for {}", path.display()))?;
        Ok(Self { mmap })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.mmap
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum InputKind {
    Plain,
    Gzip,
}

/// Whole-file contents, mapped for plain text and decoded for gzip.
pub enum InputData {
    Mapped(MmapSource),
    Owned(Vec<u8>),
}

impl InputData {
    pub fn bytes(&self) -> &[u8] {
        match self {
            InputData::Mapped(source) => source.bytes(),
            InputData::Owned(data) => data,
        }
    }
}

pub fn read_input(path: &Path) -> Result<InputData> {
    let len = fs::metadata(path)
        .with_context(|| format!("failed to stat {}", path.display()))?
        .len();
    if len == 0 {
        return Ok(InputData::Owned(Vec::new()));
    }
    match detect_input_kind(path)? {
        InputKind::Plain => Ok(InputData::Mapped(MmapSource::open(path)?)),
        InputKind::Gzip => {
            let mut reader = open_gzip_reader(path)?;
            let mut data = Vec::with_capacity(len as usize * 3);
            reader
                .read_to_end(&mut data)
                .with_context(|| format!("gzip decompression error in {}", path.display()))?;
            Ok(InputData::Owned(data))
        }
    }
}

pub fn detect_input_kind(path: &Path) -> Result<InputKind> {
    if let Some(ext) = path.extension().and_then(|s| s.to_str()) {
        let ext = ext.to_ascii_lowercase();
        if ext == "gz" {
            return Ok(InputKind::Gzip);
        }
    }
    let mut file =
        File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let mut magic = [0u8; 2];
    let n = file
        .read(&mut magic)
        .with_context(|| format!("failed to read magic bytes of {}", path.display()))?;
    if n == 2 && magic == [0x1f, 0x8b] {
        Ok(InputKind::Gzip)
    } else {
        Ok(InputKind::Plain)
    }
}

pub fn open_gzip_reader(path: &Path) -> Result<Box<dyn Read + Send>> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    Ok(Box::new(MultiGzDecoder::new(BufReader::new(file))))
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Writes `path` through a sibling `.tmp` file that is renamed into place
/// once `fill` succeeds and the buffer is flushed.
pub fn write_atomic<F>(path: &Path, fill: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<()>,
{
    let tmp_path = tmp_path_for(path);
    let file = File::create(&tmp_path)
        .with_context(|| format!("failed to create {}", tmp_path.display()))?;
    let mut w = BufWriter::new(file);

    let result = fill(&mut w).and_then(|_| {
        w.flush()
            .with_context(|| format!("failed to flush {}", tmp_path.display()))
    });
    drop(w);

    let result = result.and_then(|_| {
        fs::rename(&tmp_path, path)
            .with_context(|| format!("failed to move output to {}", path.display()))
    });
    if result.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }
    result
}

/// Removes an output left by an earlier run. Returns whether a file was
/// actually removed.
pub fn remove_stale(path: &Path) -> Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e).with_context(|| format!("failed to remove stale {}", path.display())),
    }
}

pub fn write_bytes_atomic(path: &Path, data: &[u8]) -> Result<()> {
    write_atomic(path, |w| {
        w.write_all(data)
            .with_context(|| format!("failed to write {}", path.display()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use tempfile::TempDir;

    #[test]
    fn reads_plain_and_gzip_inputs() {
        let dir = TempDir::new().unwrap();
        let plain = dir.path().join("a.fasta");
        fs::write(&plain, b">a\nACGT\n").unwrap();

        let gz = dir.path().join("b.fasta.gz");
        let mut enc = GzEncoder::new(Vec::new(), Compression::default());
        enc.write_all(b">b\nGGCC\n").unwrap();
        fs::write(&gz, enc.finish().unwrap()).unwrap();

        assert_eq!(detect_input_kind(&plain).unwrap(), InputKind::Plain);
        assert_eq!(detect_input_kind(&gz).unwrap(), InputKind::Gzip);
        assert_eq!(read_input(&plain).unwrap().bytes(), b">a\nACGT\n");
        assert_eq!(read_input(&gz).unwrap().bytes(), b">b\nGGCC\n");
    }

    #[test]
    fn empty_file_reads_as_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.fasta");
        fs::write(&path, b"").unwrap();
        assert!(read_input(&path).unwrap().bytes().is_empty());
    }

    #[test]
    fn atomic_write_commits_on_success() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        write_atomic(&path, |w| {
            w.write_all(b"ID\n")?;
            Ok(())
        })
        .unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"ID\n");
        assert!(!tmp_path_for(&path).exists());
    }

    #[test]
    fn atomic_write_leaves_nothing_on_failure() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        let err = write_atomic(&path, |w| {
            w.write_all(b"partial")?;
            anyhow::bail!("boom")
        })
        .unwrap_err();
        assert_eq!(err.to_string(), "boom");
        assert!(!path.exists());
        assert!(!tmp_path_for(&path).exists());
    }

    #[test]
    fn atomic_write_keeps_previous_output_on_failure() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        fs::write(&path, b"old").unwrap();
        let _ = write_atomic(&path, |_| anyhow::bail!("boom"));
        assert_eq!(fs::read(&path).unwrap(), b"old");
    }

    #[test]
    fn failed_rename_removes_temp_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sequence_stats.csv");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("keep"), b"x").unwrap();

        let err = write_bytes_atomic(&path, b"ID\n").unwrap_err();
        assert!(format!("{err:#}").contains("failed to move output"));
        assert!(path.is_dir());
        assert!(!tmp_path_for(&path).exists());
    }

    #[test]
    fn remove_stale_ignores_missing_files() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("summary_plots.png");
        assert!(!remove_stale(&path).unwrap());
        fs::write(&path, b"old").unwrap();
        assert!(remove_stale(&path).unwrap());
        assert!(!path.exists());
    }
}
