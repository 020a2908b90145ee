use crate::core::model::{
    CompositionStats, METADATA_COLUMNS, MetadataRow, STATS_COLUMNS, fmt_gc,
};
use std::borrow::Cow;
use std::io::{self, Write};

/// RFC 4180 quoting: only fields holding a delimiter, quote or newline.
pub fn escape_csv(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

pub fn write_stats<W: Write>(w: &mut W, rows: &[CompositionStats]) -> io::Result<()> {
    writeln!(w, "{}", STATS_COLUMNS.join(","))?;
    for r in rows {
        writeln!(
            w,
            "{},{},{},{},{},{},{},{}",
            escape_csv(&r.identifier),
            escape_csv(&r.name),
            r.length_bp,
            r.count_a,
            r.count_t,
            r.count_c,
            r.count_g,
            fmt_gc(r.gc_percent)
        )?;
    }
    Ok(())
}

pub fn write_metadata<W: Write>(w: &mut W, rows: &[MetadataRow]) -> io::Result<()> {
    writeln!(w, "{}", METADATA_COLUMNS.join(","))?;
    for r in rows {
        writeln!(
            w,
            "{},{},{},{}",
            escape_csv(&r.identifier),
            escape_csv(&r.name),
            escape_csv(&r.molecule_type),
            escape_csv(&r.description)
        )?;
    }
    Ok(())
}
