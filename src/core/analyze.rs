use crate::core::header;
use crate::core::model::{CompositionStats, MetadataRow, SequenceRecord};
use anyhow::{Context, Result, anyhow};
use crossbeam_channel as channel;
use std::ops::Range;
use std::thread;

const BATCH_RECORDS: usize = 256;

/// Parallel row sequences, one entry per input record in input order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Analysis {
    pub stats: Vec<CompositionStats>,
    pub metadata: Vec<MetadataRow>,
}

impl Analysis {
    fn with_capacity(n: usize) -> Self {
        Self {
            stats: Vec::with_capacity(n),
            metadata: Vec::with_capacity(n),
        }
    }

    fn append(&mut self, mut other: Analysis) {
        self.stats.append(&mut other.stats);
        self.metadata.append(&mut other.metadata);
    }

    pub fn len(&self) -> usize {
        self.stats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct BaseCounts {
    pub a: u64,
    pub c: u64,
    pub g: u64,
    pub t: u64,
}

/// Case-insensitive A/C/G/T counts; every other symbol is left out.
pub fn count_bases(seq: &[u8]) -> BaseCounts {
    let mut counts = BaseCounts::default();
    for &b in seq {
        match b & 0xDF {
            b'A' => counts.a += 1,
            b'C' => counts.c += 1,
            b'G' => counts.g += 1,
            b'T' => counts.t += 1,
            _ => {}
        }
    }
    counts
}

/// GC percentage in hundredths, rounded half away from zero.
pub fn gc_hundredths(gc: u64, len: u64) -> u64 {
    if len == 0 {
        return 0;
    }
    (gc * 20_000 + len) / (2 * len)
}

pub fn gc_percent(gc: u64, len: u64) -> f64 {
    gc_hundredths(gc, len) as f64 / 100.0
}

pub fn analyze_record(record: &SequenceRecord) -> (CompositionStats, MetadataRow) {
    let length_bp = record.residues.chars().count() as u64;
    let counts = count_bases(record.residues.as_bytes());
    let parsed = header::parse(&record.identifier, &record.description);

    let stats = CompositionStats {
        identifier: record.identifier.clone(),
        name: parsed.name.clone(),
        length_bp,
        count_a: counts.a,
        count_t: counts.t,
        count_c: counts.c,
        count_g: counts.g,
        gc_percent: gc_percent(counts.g + counts.c, length_bp),
    };
    let meta = MetadataRow {
        identifier: record.identifier.clone(),
        name: parsed.name,
        molecule_type: parsed.molecule_type,
        description: parsed.clean_description,
    };
    (stats, meta)
}

pub fn analyze(records: &[SequenceRecord]) -> Analysis {
    let mut out = Analysis::with_capacity(records.len());
    for record in records {
        let (stats, meta) = analyze_record(record);
        out.stats.push(stats);
        out.metadata.push(meta);
    }
    out
}

/// Same result as [`analyze`], computed in record batches on `threads`
/// workers and reassembled by batch index.
pub fn analyze_parallel(records: &[SequenceRecord], threads: usize) -> Result<Analysis> {
    if threads <= 1 || records.len() <= BATCH_RECORDS {
        return Ok(analyze(records));
    }

    let batches: Vec<Range<usize>> = (0..records.len())
        .step_by(BATCH_RECORDS)
        .map(|start| start..(start + BATCH_RECORDS).min(records.len()))
        .collect();
    let total = batches.len();

    let (batch_tx, batch_rx) = channel::bounded::<(usize, Range<usize>)>(threads * 2);
    let (result_tx, result_rx) = channel::unbounded::<(usize, Analysis)>();

    let mut parts: Vec<Option<Analysis>> = vec![None; total];
    thread::scope(|scope| -> Result<()> {
        scope.spawn(move || {
            for (index, range) in batches.into_iter().enumerate() {
                if batch_tx.send((index, range)).is_err() {
                    return;
                }
            }
        });

        for _ in 0..threads {
            let rx = batch_rx.clone();
            let tx = result_tx.clone();
            scope.spawn(move || {
                for (index, range) in rx.iter() {
                    if tx.send((index, analyze(&records[range]))).is_err() {
                        break;
                    }
                }
            });
        }
        drop(batch_rx);
        drop(result_tx);

        for _ in 0..total {
            let (index, part) = result_rx
                .recv()
                .context("failed to receive analysis batch")?;
            let slot = parts
                .get_mut(index)
                .ok_or_else(|| anyhow!("invalid batch index {}", index))?;
            *slot = Some(part);
        }
        Ok(())
    })?;

    let mut out = Analysis::with_capacity(records.len());
    for (index, part) in parts.into_iter().enumerate() {
        out.append(part.ok_or_else(|| anyhow!("missing analysis batch {}", index))?);
    }
    Ok(out)
}
