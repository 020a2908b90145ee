//! Merge a directory of FASTA files, profile per-sequence base composition,
//! pull gene name and molecule type out of the description headers, and chart
//! length and GC content per gene.

pub mod cli;
pub mod core;
pub mod report;
