pub mod chart;
pub mod pdf;
pub mod png;
pub mod preview;
pub mod tables;
pub mod zip;
