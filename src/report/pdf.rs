use anyhow::{Result, anyhow};
use svg2pdf::usvg;
use svg2pdf::{ConversionOptions, PageOptions};

pub fn svg_to_pdf(svg: &str) -> Result<Vec<u8>> {
    let mut opt = usvg::Options::default();
    opt.fontdb_mut().load_system_fonts();
    let tree = usvg::Tree::from_str(svg, &opt).map_err(|e| anyhow!("usvg parse failed: {e}"))?;
    let pdf = svg2pdf::to_pdf(&tree, ConversionOptions::default(), PageOptions::default())
        .map_err(|e| anyhow!("svg2pdf conversion failed: {e}"))?;
    Ok(pdf)
}
