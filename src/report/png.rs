use crate::core::model::CompositionStats;
use crate::report::chart;
use anyhow::{Result, anyhow};
use resvg::tiny_skia;
use resvg::usvg;
use resvg::usvg::fontdb;
use tracing::warn;

/// SVG user units per inch of the chart canvas.
const UNITS_PER_INCH: f32 = 100.0;

pub struct Chart {
    pub svg: String,
    pub png: Vec<u8>,
}

/// Renders the summary chart, or returns `None` (with a warning) when there
/// are no rows to plot.
pub fn render(stats: &[CompositionStats], dpi: u32) -> Result<Option<Chart>> {
    let Some(svg) = chart::render_svg(stats)? else {
        warn!("no sequence statistics to plot; skipping summary chart");
        return Ok(None);
    };
    let png = rasterize(&svg, dpi)?;
    Ok(Some(Chart { svg, png }))
}

pub fn rasterize(svg: &str, dpi: u32) -> Result<Vec<u8>> {
    let mut opt = usvg::Options::default();
    load_fonts(&mut opt);
    let tree =
        usvg::Tree::from_str(svg, &opt).map_err(|e| anyhow!("usvg parse failed: {e}"))?;

    let scale = dpi as f32 / UNITS_PER_INCH;
    let size = tree.size();
    let width = (size.width() * scale).ceil() as u32;
    let height = (size.height() * scale).ceil() as u32;
    let mut pixmap = tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| anyhow!("invalid image size {}x{}", width, height))?;
    pixmap.fill(tiny_skia::Color::WHITE);
    resvg::render(
        &tree,
        tiny_skia::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );
    pixmap
        .encode_png()
        .map_err(|e| anyhow!("PNG encoding failed: {e}"))
}

fn load_fonts(opt: &mut usvg::Options) {
    let db = opt.fontdb_mut();
    db.load_system_fonts();
    let query = fontdb::Query {
        families: &[fontdb::Family::SansSerif],
        ..fontdb::Query::default()
    };
    if db.query(&query).is_none() {
        let fallback = db
            .faces()
            .next()
            .and_then(|face| face.families.first())
            .map(|(name, _)| name.clone());
        if let Some(family) = fallback {
            db.set_sans_serif_family(family);
        }
    }
}
