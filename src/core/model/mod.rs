/// One FASTA entry as read from disk.
///
/// `description` is the full header line without the leading `>`, so it
/// usually starts with `identifier`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SequenceRecord {
    pub identifier: String,
    pub description: String,
    pub residues: String,
}

impl SequenceRecord {
    pub fn new(
        identifier: impl Into<String>,
        description: impl Into<String>,
        residues: impl Into<String>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            description: description.into(),
            residues: residues.into(),
        }
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ParsedHeader {
    pub name: String,
    pub molecule_type: String,
    pub clean_description: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CompositionStats {
    pub identifier: String,
    pub name: String,
    pub length_bp: u64,
    pub count_a: u64,
    pub count_t: u64,
    pub count_c: u64,
    pub count_g: u64,
    pub gc_percent: f64,
}

impl CompositionStats {
    /// Chart category label; falls back to the identifier for unnamed entries.
    pub fn label(&self) -> &str {
        if self.name.is_empty() {
            &self.identifier
        } else {
            &self.name
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MetadataRow {
    pub identifier: String,
    pub name: String,
    pub molecule_type: String,
    pub description: String,
}

pub const STATS_COLUMNS: [&str; 8] = [
    "ID",
    "Name",
    "Length_bp",
    "Count_A",
    "Count_T",
    "Count_C",
    "Count_G",
    "GC_percent",
];

pub const METADATA_COLUMNS: [&str; 4] = ["ID", "Name", "MoleculeType", "Description"];

pub fn fmt_gc(v: f64) -> String {
    format!("{:.2}", v)
}
