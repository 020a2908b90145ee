pub mod analyze;
pub mod combine;
pub mod engine;
pub mod fasta;
pub mod header;
pub mod io;
pub mod model;
