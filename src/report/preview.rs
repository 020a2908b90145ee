use crate::core::model::{
    CompositionStats, METADATA_COLUMNS, MetadataRow, STATS_COLUMNS, fmt_gc,
};
use std::fmt::Write;

fn push_line<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize]) {
    for (i, (cell, width)) in cells.zip(widths).enumerate() {
        if i > 0 {
            out.push_str("  ");
        }
        let _ = write!(out, "{:<width$}", cell, width = *width);
    }
    let trimmed = out.trim_end_matches(' ').len();
    out.truncate(trimmed);
    out.push('\n');
}

fn render_table(header: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }
    let mut out = String::new();
    push_line(&mut out, header.iter().copied(), &widths);
    for row in rows {
        push_line(&mut out, row.iter().map(String::as_str), &widths);
    }
    out
}

/// First `n` stats rows as an aligned text table.
pub fn stats_head(rows: &[CompositionStats], n: usize) -> String {
    let cells: Vec<Vec<String>> = rows
        .iter()
        .take(n)
        .map(|r| {
            vec![
                r.identifier.clone(),
                r.name.clone(),
                r.length_bp.to_string(),
                r.count_a.to_string(),
                r.count_t.to_string(),
                r.count_c.to_string(),
                r.count_g.to_string(),
                fmt_gc(r.gc_percent),
            ]
        })
        .collect();
    render_table(&STATS_COLUMNS, &cells)
}

pub fn metadata_head(rows: &[MetadataRow], n: usize) -> String {
    let cells: Vec<Vec<String>> = rows
        .iter()
        .take(n)
        .map(|r| {
            vec![
                r.identifier.clone(),
                r.name.clone(),
                r.molecule_type.clone(),
                r.description.clone(),
            ]
        })
        .collect();
    render_table(&METADATA_COLUMNS, &cells)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn aligns_columns_and_limits_rows() {
        let rows = vec![
            MetadataRow {
                identifier: "NM_000001".into(),
                name: "CAB1".into(),
                molecule_type: "mRNA".into(),
                description: "light harvesting".into(),
            },
            MetadataRow {
                identifier: "X".into(),
                name: "".into(),
                molecule_type: "".into(),
                description: "".into(),
            },
        ];
        assert_eq!(
            metadata_head(&rows, 5),
            "ID         Name  MoleculeType  Description\n\
             NM_000001  CAB1  mRNA          light harvesting\n\
             X\n"
        );
        assert_eq!(metadata_head(&rows, 1).lines().count(), 2);
    }

    #[test]
    fn stats_preview_uses_two_decimals() {
        let rows = vec![CompositionStats {
            identifier: "a".into(),
            name: "G".into(),
            length_bp: 3,
            count_a: 1,
            count_t: 0,
            count_c: 1,
            count_g: 0,
            gc_percent: 33.33,
        }];
        let text = stats_head(&rows, 5);
        assert!(text.lines().nth(1).unwrap().ends_with("33.33"));
    }
}
