//! FASTA reading and writing.
//!
//! ```text
//! >identifier optional description
//! ACGTACGT...
//! ```
//!
//! Residue lines are concatenated with whitespace removed; blank lines and
//! CRLF endings are accepted. Text before the first header is skipped.

use crate::core::model::SequenceRecord;
use std::io::{self, Write};
use thiserror::Error;

/// Residues per line when writing.
pub const LINE_WIDTH: usize = 60;

#[derive(Error, Debug)]
pub enum FastaError {
    #[error("invalid UTF-8 at line {0}")]
    InvalidUtf8(usize),
}

/// Records of one file plus the count of non-blank lines found before the
/// first header, which are not part of any record.
#[derive(Debug, Default)]
pub struct ParsedFasta {
    pub records: Vec<SequenceRecord>,
    pub skipped_lines: usize,
}

pub type FastaResult<T> = Result<T, FastaError>;

struct Pending {
    identifier: String,
    description: String,
    residues: String,
}

impl Pending {
    fn finish(self) -> SequenceRecord {
        SequenceRecord {
            identifier: self.identifier,
            description: self.description,
            residues: self.residues,
        }
    }
}

fn line_str(line: &[u8], line_no: usize) -> FastaResult<&str> {
    std::str::from_utf8(line).map_err(|_| FastaError::InvalidUtf8(line_no))
}

/// Parses every record in `data`, in file order.
pub fn parse_records(data: &[u8]) -> FastaResult<Vec<SequenceRecord>> {
    parse(data).map(|parsed| parsed.records)
}

pub fn parse(data: &[u8]) -> FastaResult<ParsedFasta> {
    let mut records = Vec::new();
    let mut skipped_lines = 0usize;
    let mut current: Option<Pending> = None;
    let mut pos = 0usize;
    let mut line_no = 0usize;

    while pos < data.len() {
        let end = memchr::memchr(b'\n', &data[pos..])
            .map(|i| pos + i)
            .unwrap_or(data.len());
        let mut line = &data[pos..end];
        pos = end + 1;
        line_no += 1;
        if let Some(stripped) = line.strip_suffix(b"\r") {
            line = stripped;
        }

        if let Some(header) = line.strip_prefix(b">") {
            if let Some(done) = current.take() {
                records.push(done.finish());
            }
            let description = line_str(header, line_no)?.trim();
            let identifier = description.split_whitespace().next().unwrap_or("");
            current = Some(Pending {
                identifier: identifier.to_string(),
                description: description.to_string(),
                residues: String::new(),
            });
            continue;
        }

        let text = line_str(line, line_no)?;
        if text.trim().is_empty() {
            continue;
        }
        match current.as_mut() {
            Some(pending) => pending
                .residues
                .extend(text.chars().filter(|c| !c.is_whitespace())),
            None => skipped_lines += 1,
        }
    }

    if let Some(done) = current.take() {
        records.push(done.finish());
    }
    Ok(ParsedFasta {
        records,
        skipped_lines,
    })
}

fn header_line(record: &SequenceRecord) -> String {
    if record.description.is_empty() {
        record.identifier.clone()
    } else if record.description.starts_with(&record.identifier) {
        record.description.clone()
    } else {
        format!("{} {}", record.identifier, record.description)
    }
}

pub fn write_records<W: Write>(w: &mut W, records: &[SequenceRecord]) -> io::Result<()> {
    for record in records {
        writeln!(w, ">{}", header_line(record))?;
        let mut rest = record.residues.as_str();
        while !rest.is_empty() {
            // Cut on a char boundary so every line stays valid UTF-8.
            let cut = rest
                .char_indices()
                .nth(LINE_WIDTH)
                .map_or(rest.len(), |(i, _)| i);
            let (line, tail) = rest.split_at(cut);
            writeln!(w, "{line}")?;
            rest = tail;
        }
    }
    Ok(())
}
