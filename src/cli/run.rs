use crate::cli::args::{Cli, Commands, RunArgs};
use crate::core::combine::normalize_extensions;
use crate::core::engine::{self, OutputPaths, RenderOptions, RunConfig, log_stage};
use crate::core::fasta;
use crate::core::io::{remove_stale, write_atomic, write_bytes_atomic};
use crate::report;
use anyhow::{Context, Result, bail};
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

pub const MAX_DPI: u32 = 600;

pub fn entry() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Run(args) => run(args),
    }
}

/// What a run produced.
#[derive(Clone, Debug, Default)]
pub struct RunSummary {
    pub records: usize,
    pub written: Vec<PathBuf>,
    pub image: Option<PathBuf>,
    pub zip: Option<PathBuf>,
}

fn run(args: RunArgs) -> Result<()> {
    let preview = args.preview;
    let config = config_from_args(args)?;
    let (summary, output) = execute_with_output(&config)?;

    if preview > 0 {
        println!("\n--- Stats Preview ---");
        print!("{}", report::preview::stats_head(&output.analysis.stats, preview));
        println!("\n--- Metadata Preview ---");
        print!(
            "{}",
            report::preview::metadata_head(&output.analysis.metadata, preview)
        );
    }
    info!(
        records = summary.records,
        files = summary.written.len(),
        out = %config.out_dir.display(),
        "run complete"
    );
    Ok(())
}

pub fn config_from_args(args: RunArgs) -> Result<RunConfig> {
    if args.threads == 0 {
        bail!("--threads must be >= 1");
    }
    if !(10..=MAX_DPI).contains(&args.dpi) {
        bail!("--dpi must be between 10 and {}", MAX_DPI);
    }
    let extensions = normalize_extensions(&args.extensions);
    if extensions.is_empty() {
        bail!("at least one non-empty --ext is required");
    }
    if args.out.is_file() {
        bail!("output path is a file: {}", args.out.display());
    }
    let render = (!args.no_plot).then(|| RenderOptions {
        dpi: args.dpi,
        export_pdf: args.export_pdf,
    });
    Ok(RunConfig {
        input_dir: args.input_dir,
        out_dir: args.out,
        extensions,
        threads: args.threads,
        render,
        zip: args.zip,
    })
}

pub fn execute(config: &RunConfig) -> Result<RunSummary> {
    execute_with_output(config).map(|(summary, _)| summary)
}

/// Runs the pipeline. Every artifact is built in memory first; files are
/// only committed once all of them are ready, each through a temp file.
fn execute_with_output(config: &RunConfig) -> Result<(RunSummary, engine::RunOutput)> {
    let t0 = Instant::now();
    let output = engine::run(config)?;
    let paths = OutputPaths::new(&config.out_dir);

    let t_render = Instant::now();
    let chart = match &config.render {
        Some(opts) => report::png::render(&output.analysis.stats, opts.dpi)
            .with_context(|| "failed to render summary chart")?,
        None => None,
    };
    let pdf = match (&chart, &config.render) {
        (Some(chart), Some(opts)) if opts.export_pdf => Some(
            report::pdf::svg_to_pdf(&chart.svg)
                .with_context(|| "failed to convert summary chart to PDF")?,
        ),
        _ => None,
    };
    log_stage("render", t_render);

    let t_out = Instant::now();
    fs::create_dir_all(&config.out_dir)
        .with_context(|| format!("failed to create output dir {}", config.out_dir.display()))?;
    log_stage("mkdir", t_out);

    let mut summary = RunSummary {
        records: output.records.len(),
        ..RunSummary::default()
    };

    let t_write = Instant::now();
    write_atomic(&paths.combined, |w| {
        fasta::write_records(w, &output.records)
            .with_context(|| format!("failed to write {}", paths.combined.display()))
    })?;
    summary.written.push(paths.combined.clone());
    info!(path = %paths.combined.display(), records = output.records.len(), "saved combined archive");

    write_atomic(&paths.stats, |w| {
        report::tables::write_stats(w, &output.analysis.stats)
            .with_context(|| format!("failed to write {}", paths.stats.display()))
    })?;
    summary.written.push(paths.stats.clone());
    info!(path = %paths.stats.display(), "saved stats");

    write_atomic(&paths.metadata, |w| {
        report::tables::write_metadata(w, &output.analysis.metadata)
            .with_context(|| format!("failed to write {}", paths.metadata.display()))
    })?;
    summary.written.push(paths.metadata.clone());
    info!(path = %paths.metadata.display(), "saved metadata");

    if let Some(chart) = &chart {
        write_bytes_atomic(&paths.png, &chart.png)?;
        summary.written.push(paths.png.clone());
        summary.image = Some(paths.png.clone());
        info!(path = %paths.png.display(), "saved summary chart");
    }
    if let (Some(chart), Some(pdf)) = (&chart, &pdf) {
        write_bytes_atomic(&paths.svg, chart.svg.as_bytes())?;
        write_bytes_atomic(&paths.pdf, pdf)?;
        summary.written.push(paths.svg.clone());
        summary.written.push(paths.pdf.clone());
        info!(path = %paths.pdf.display(), "saved vector chart");
    }
    // Charts from an earlier run would no longer match the tables.
    let mut stale = Vec::new();
    if chart.is_none() {
        stale.push(&paths.png);
    }
    if pdf.is_none() {
        stale.push(&paths.svg);
        stale.push(&paths.pdf);
    }
    for path in stale {
        if remove_stale(path)? {
            info!(path = %path.display(), "removed stale chart");
        }
    }
    log_stage("write", t_write);

    if config.zip {
        let t_zip = Instant::now();
        let zip_path = report::zip::write_zip(&config.out_dir, &summary.written)
            .with_context(|| "failed to create zip output")?;
        log_stage("zip", t_zip);
        info!(path = %zip_path.display(), "saved results bundle");
        summary.zip = Some(zip_path);
    }

    log_stage("total", t0);
    Ok((summary, output))
}
