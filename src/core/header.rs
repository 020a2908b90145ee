//! Field extraction from free-form FASTA description lines.
//!
//! NCBI-like headers carry a gene symbol in parentheses and a molecule tag
//! after the last comma, e.g.
//!
//! ```text
//! NM_001.1 Homo sapiens chlorophyll a/b binding (CAB1) mRNA, partial cds, mRNA
//! ```
//!
//! Matching is done by scanning rather than with a regex engine so that the
//! anchoring and first-match rules below are explicit.

use crate::core::model::ParsedHeader;

/// Splits a description into name, molecule type and cleaned text.
///
/// Never fails: anything that does not fit the expected shape simply leaves
/// the corresponding field empty.
pub fn parse(identifier: &str, description: &str) -> ParsedHeader {
    let base = strip_identifier(identifier, description);

    let group = find_first_group(base);
    let suffix = find_molecule_suffix(base);

    let name = group
        .map(|g| base[g.open + 1..g.close].trim().to_string())
        .unwrap_or_default();
    let molecule_type = suffix
        .map(|m| base[m.token_start..m.token_end].to_string())
        .unwrap_or_default();

    // Both regions are located on `base`; the suffix holds no parentheses so
    // the group always ends at or before the suffix starts.
    let tail_end = suffix.map(|m| m.start).unwrap_or(base.len());
    let mut clean = String::with_capacity(base.len());
    match group {
        Some(g) if g.close < tail_end => {
            clean.push_str(&base[..g.start]);
            clean.push_str(&base[g.close + 1..tail_end]);
        }
        _ => clean.push_str(&base[..tail_end]),
    }

    ParsedHeader {
        name,
        molecule_type,
        clean_description: clean.trim().to_string(),
    }
}

fn strip_identifier<'a>(identifier: &str, description: &'a str) -> &'a str {
    match description.strip_prefix(identifier) {
        Some(rest) => rest.trim(),
        None => description,
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct Group {
    /// Start of the removable region, including whitespace before `(`.
    start: usize,
    open: usize,
    close: usize,
}

/// Leftmost `(` followed by at least one non-`)` byte and then `)`.
///
/// The interior may contain `(`, so `a (b (c) d)` yields `b (c`.
fn find_first_group(s: &str) -> Option<Group> {
    let bytes = s.as_bytes();
    let mut from = 0;
    while let Some(rel) = memchr::memchr(b'(', &bytes[from..]) {
        let open = from + rel;
        let close = open + 1 + memchr::memchr(b')', &bytes[open + 1..])?;
        if close > open + 1 {
            let start = s[..open].trim_end().len();
            return Some(Group { start, open, close });
        }
        from = open + 1;
    }
    None
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct MoleculeSuffix {
    /// Position of the comma; everything from here to the end is removed.
    start: usize,
    token_start: usize,
    token_end: usize,
}

fn is_token_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'_' | b'-' | b'/')
}

/// `, TOKEN` anchored at the end of the string, whitespace allowed after the
/// comma and after the token.
fn find_molecule_suffix(s: &str) -> Option<MoleculeSuffix> {
    let bytes = s.as_bytes();
    let token_end = s.trim_end().len();
    let mut token_start = token_end;
    while token_start > 0 && is_token_byte(bytes[token_start - 1]) {
        token_start -= 1;
    }
    if token_start == token_end {
        return None;
    }
    let before = s[..token_start].trim_end();
    if !before.ends_with(',') {
        return None;
    }
    Some(MoleculeSuffix {
        start: before.len() - 1,
        token_start,
        token_end,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn header(name: &str, molecule_type: &str, clean: &str) -> ParsedHeader {
        ParsedHeader {
            name: name.to_string(),
            molecule_type: molecule_type.to_string(),
            clean_description: clean.to_string(),
        }
    }

    #[test]
    fn ncbi_style_header() {
        assert_eq!(
            parse("X", "X (CAB1) mRNA, partial cds, mRNA"),
            header("CAB1", "mRNA", "mRNA, partial cds")
        );
        assert_eq!(
            parse(
                "AB012345.1",
                "AB012345.1 Arabidopsis thaliana light-harvesting protein (LHCB2) gene, complete cds, genomic/DNA"
            ),
            header(
                "LHCB2",
                "genomic/DNA",
                "Arabidopsis thaliana light-harvesting protein gene, complete cds"
            )
        );
    }

    #[test]
    fn empty_description() {
        assert_eq!(parse("X", ""), ParsedHeader::default());
        assert_eq!(parse("", ""), ParsedHeader::default());
    }

    #[test]
    fn identifier_only_header() {
        assert_eq!(parse("seq1", "seq1"), ParsedHeader::default());
    }

    #[test]
    fn plain_text_is_trimmed_only() {
        assert_eq!(
            parse("id1", "id1   some free text  "),
            header("", "", "some free text")
        );
    }

    #[test]
    fn description_without_identifier_prefix_is_kept() {
        assert_eq!(
            parse("other", "  Danio rerio actin (actb1)"),
            header("actb1", "", "Danio rerio actin")
        );
    }

    #[test]
    fn only_group_gives_empty_clean_description() {
        assert_eq!(parse("X", "X (CAB1)"), header("CAB1", "", ""));
        assert_eq!(parse("X", "X ( CAB1 )"), header("CAB1", "", ""));
    }

    #[test]
    fn first_group_wins() {
        assert_eq!(
            parse("X", "X alpha (A1) beta (B2) gamma"),
            header("A1", "", "alpha beta (B2) gamma")
        );
    }

    #[test]
    fn empty_group_is_skipped() {
        assert_eq!(
            parse("X", "X foo () bar (GENE) baz"),
            header("GENE", "", "foo () bar baz")
        );
    }

    #[test]
    fn group_interior_stops_at_first_close() {
        assert_eq!(
            parse("X", "X a (b (c) d)"),
            header("b (c", "", "a d)")
        );
    }

    #[test]
    fn unclosed_group_is_ignored() {
        assert_eq!(
            parse("X", "X broken (GENE header, mRNA"),
            header("", "mRNA", "broken (GENE header")
        );
    }

    #[test]
    fn molecule_token_must_be_anchored() {
        assert_eq!(
            parse("X", "X first, second part here"),
            header("", "", "first, second part here")
        );
        assert_eq!(parse("X", "X thing,mRNA  "), header("", "mRNA", "thing"));
        assert_eq!(parse("X", "X thing , rRNA"), header("", "rRNA", "thing"));
    }

    #[test]
    fn molecule_token_character_class() {
        assert_eq!(
            parse("X", "X gene, pre_mRNA-like/v2"),
            header("", "pre_mRNA-like/v2", "gene")
        );
        assert_eq!(parse("X", "X gene, m.RNA"), header("", "", "gene, m.RNA"));
        assert_eq!(parse("X", "X gene,"), header("", "", "gene,"));
    }

    #[test]
    fn removals_do_not_compound() {
        // The suffix is looked up before the group is removed; that text ends with `)`.
        assert_eq!(
            parse("X", "X foo, bar (GENE)"),
            header("GENE", "", "foo, bar")
        );
    }

    #[test]
    fn multibyte_text_is_preserved() {
        assert_eq!(
            parse("X", "X protéine α (PRT1) isoforme, ARNm"),
            header("PRT1", "ARNm", "protéine α isoforme")
        );
    }

    #[test]
    fn cleaned_text_drops_matched_regions() {
        let cases = [
            ("NM_1", "NM_1 Some gene (SG1) transcript variant 2, mRNA"),
            ("NR_2", "NR_2 (RNU1) small nuclear RNA, ncRNA"),
            ("XM_3", "XM_3 predicted: kinase (KIN-4) transcript, mRNA/partial"),
            ("AF_4", "AF_4 no markers at all"),
        ];
        for (id, desc) in cases {
            let parsed = parse(id, desc);
            assert!(!parsed.clean_description.starts_with(id), "{desc}");
            if !parsed.name.is_empty() {
                let raw = format!("({})", parsed.name);
                assert!(!parsed.clean_description.contains(&raw), "{desc}");
            }
            if !parsed.molecule_type.is_empty() {
                assert!(!parsed.clean_description.contains(','), "{desc}");
                assert!(!parsed.clean_description.ends_with(&parsed.molecule_type), "{desc}");
            }
        }
    }
}
