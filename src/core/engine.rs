use crate::core::analyze::{self, Analysis};
use crate::core::combine;
use crate::core::model::SequenceRecord;
use anyhow::Result;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::debug;

pub const COMBINED_FASTA: &str = "combined_sequences.fasta";
pub const STATS_CSV: &str = "sequence_stats.csv";
pub const METADATA_CSV: &str = "metadata.csv";
pub const SUMMARY_PNG: &str = "summary_plots.png";
pub const SUMMARY_SVG: &str = "summary_plots.svg";
pub const SUMMARY_PDF: &str = "summary_plots.pdf";

#[derive(Clone, Debug)]
pub struct RenderOptions {
    pub dpi: u32,
    pub export_pdf: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            dpi: 300,
            export_pdf: false,
        }
    }
}

#[derive(Clone, Debug)]
pub struct RunConfig {
    pub input_dir: PathBuf,
    pub out_dir: PathBuf,
    pub extensions: Vec<String>,
    pub threads: usize,
    /// `None` disables the summary chart.
    pub render: Option<RenderOptions>,
    pub zip: bool,
}

impl RunConfig {
    pub fn new(input_dir: impl Into<PathBuf>, out_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            out_dir: out_dir.into(),
            extensions: vec!["fasta".to_string()],
            threads: 1,
            render: Some(RenderOptions::default()),
            zip: false,
        }
    }
}

#[derive(Clone, Debug)]
pub struct OutputPaths {
    pub combined: PathBuf,
    pub stats: PathBuf,
    pub metadata: PathBuf,
    pub png: PathBuf,
    pub svg: PathBuf,
    pub pdf: PathBuf,
}

impl OutputPaths {
    pub fn new(out_dir: &Path) -> Self {
        Self {
            combined: out_dir.join(COMBINED_FASTA),
            stats: out_dir.join(STATS_CSV),
            metadata: out_dir.join(METADATA_CSV),
            png: out_dir.join(SUMMARY_PNG),
            svg: out_dir.join(SUMMARY_SVG),
            pdf: out_dir.join(SUMMARY_PDF),
        }
    }
}

pub struct RunOutput {
    pub records: Vec<SequenceRecord>,
    pub analysis: Analysis,
}

/// Combines the input directory and analyzes every record. Nothing is
/// written here; callers commit outputs once everything is computed.
pub fn run(cfg: &RunConfig) -> Result<RunOutput> {
    let t_combine = Instant::now();
    let records = combine::combine_dir(&cfg.input_dir, &cfg.extensions)?;
    log_stage("engine.combine", t_combine);

    let t_analyze = Instant::now();
    let analysis = analyze::analyze_parallel(&records, cfg.threads)?;
    log_stage("engine.analyze", t_analyze);

    Ok(RunOutput { records, analysis })
}

pub fn log_stage(name: &str, t: Instant) {
    debug!(stage = name, time = %fmt_dur(t.elapsed()), "stage finished");
}

pub fn fmt_dur(d: Duration) -> String {
    if d.as_secs_f64() < 1.0 {
        format!("{}ms", d.as_millis())
    } else {
        format!("{:.3}s", d.as_secs_f64())
    }
}
