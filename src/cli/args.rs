use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "kira-seqstats",
    version,
    about = "Merge FASTA files, profile composition and header metadata, chart GC content"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    Run(RunArgs),
}

#[derive(Parser)]
pub struct RunArgs {
    /// Directory holding one or more FASTA files.
    #[arg(default_value = "data")]
    pub input_dir: PathBuf,

    #[arg(long, default_value = "results")]
    pub out: PathBuf,

    /// File extension to pick up (repeatable); `.gz` variants are read too.
    #[arg(long = "ext", default_values_t = vec!["fasta".to_string()])]
    pub extensions: Vec<String>,

    #[arg(long, default_value_t = 1)]
    pub threads: usize,

    #[arg(long, default_value_t = 300)]
    pub dpi: u32,

    #[arg(long, default_value_t = false)]
    pub no_plot: bool,

    /// Also write the chart as SVG and PDF.
    #[arg(long, default_value_t = false)]
    pub export_pdf: bool,

    /// Bundle every output into a zip archive.
    #[arg(long, default_value_t = false)]
    pub zip: bool,

    /// Rows of each table printed after the run; 0 disables the preview.
    #[arg(long, default_value_t = 5)]
    pub preview: usize,
}
