//! Two-panel bar chart: sequence length and GC% per gene.
//!
//! Built as a plain SVG string at 100 user units per inch (8 x 8 in) and
//! rasterized elsewhere.

use crate::core::model::{CompositionStats, fmt_gc};
use anyhow::Result;
use std::collections::HashMap;
use std::fmt::Write;

pub const WIDTH: f64 = 800.0;
pub const HEIGHT: f64 = 800.0;
const PANEL_H: f64 = HEIGHT / 2.0;

const LEFT: f64 = 70.0;
const RIGHT: f64 = 20.0;
const TOP: f64 = 34.0;
const BOTTOM: f64 = 96.0;

/// Matplotlib "tab10".
pub const PALETTE: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

/// One color per row. Distinct names take palette entries in order of first
/// appearance, so a repeated name always gets the same color.
pub fn assign_colors(stats: &[CompositionStats]) -> Vec<&'static str> {
    let mut by_name: HashMap<&str, &'static str> = HashMap::new();
    stats
        .iter()
        .map(|s| {
            let next = PALETTE[by_name.len() % PALETTE.len()];
            *by_name.entry(s.name.as_str()).or_insert(next)
        })
        .collect()
}

struct Panel<'a> {
    title: &'a str,
    y_label: &'a str,
    values: Vec<f64>,
    labels: Vec<String>,
}

/// SVG document for `stats`, or `None` when there is nothing to draw.
pub fn render_svg(stats: &[CompositionStats]) -> Result<Option<String>> {
    if stats.is_empty() {
        return Ok(None);
    }
    let colors = assign_colors(stats);
    let categories: Vec<&str> = stats.iter().map(|s| s.label()).collect();

    let length = Panel {
        title: "Sequence length per gene",
        y_label: "Length (bp)",
        values: stats.iter().map(|s| s.length_bp as f64).collect(),
        labels: stats.iter().map(|s| s.length_bp.to_string()).collect(),
    };
    let gc = Panel {
        title: "GC content per gene",
        y_label: "GC%",
        values: stats.iter().map(|s| s.gc_percent).collect(),
        labels: stats.iter().map(|s| fmt_gc(s.gc_percent)).collect(),
    };

    let mut out = String::new();
    writeln!(
        out,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{}\" height=\"{}\" viewBox=\"0 0 {} {}\" font-family=\"sans-serif\">",
        WIDTH, HEIGHT, WIDTH, HEIGHT
    )?;
    writeln!(
        out,
        "<rect x=\"0\" y=\"0\" width=\"{}\" height=\"{}\" fill=\"#fff\"/>",
        WIDTH, HEIGHT
    )?;
    draw_panel(&mut out, 0.0, &length, &categories, &colors)?;
    draw_panel(&mut out, PANEL_H, &gc, &categories, &colors)?;
    writeln!(out, "</svg>")?;
    Ok(Some(out))
}

fn draw_panel(
    out: &mut String,
    offset_y: f64,
    panel: &Panel<'_>,
    categories: &[&str],
    colors: &[&str],
) -> Result<()> {
    let left = LEFT;
    let top = offset_y + TOP;
    let plot_w = WIDTH - LEFT - RIGHT;
    let plot_h = PANEL_H - TOP - BOTTOM;

    writeln!(
        out,
        "<text x=\"{}\" y=\"{}\" font-size=\"14\" fill=\"#222\" text-anchor=\"middle\">{}</text>",
        left + plot_w / 2.0,
        offset_y + 22.0,
        escape_svg(panel.title)
    )?;
    writeln!(
        out,
        "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"#fff\" stroke=\"#ddd\"/>",
        left, top, plot_w, plot_h
    )?;

    let max_v = panel.values.iter().copied().fold(0.0, f64::max);
    // Headroom for the value labels above the tallest bar.
    let (y_max, step) = if max_v > 0.0 {
        let step = tick_step(max_v * 1.1, 4);
        ((max_v * 1.1 / step).ceil() * step, step)
    } else {
        (1.0, 0.5)
    };
    draw_y_axis_ticks(out, left, top, plot_w, plot_h, y_max, step)?;

    let slot = plot_w / categories.len() as f64;
    let bar_w = slot * 0.8;
    for (i, &v) in panel.values.iter().enumerate() {
        let cx = left + slot * (i as f64 + 0.5);
        let h = (v / y_max * plot_h).max(0.0);
        let y0 = top + plot_h - h;
        writeln!(
            out,
            "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" fill=\"{}\" stroke=\"#000\" stroke-width=\"0.8\"/>",
            cx - bar_w / 2.0,
            y0,
            bar_w,
            h,
            colors[i]
        )?;
        writeln!(
            out,
            "<text x=\"{:.2}\" y=\"{:.2}\" font-size=\"8\" fill=\"#222\" text-anchor=\"middle\">{}</text>",
            cx,
            y0 - 3.0,
            escape_svg(&panel.labels[i])
        )?;
        draw_category_label(out, cx, top + plot_h + 10.0, categories[i])?;
    }

    draw_axis_labels(
        out,
        left,
        top,
        plot_w,
        offset_y + PANEL_H - 8.0,
        plot_h,
        "Gene",
        panel.y_label,
    )?;
    Ok(())
}

fn draw_category_label(out: &mut String, x: f64, y: f64, label: &str) -> Result<()> {
    writeln!(
        out,
        "<text x=\"{:.2}\" y=\"{:.2}\" font-size=\"10\" fill=\"#444\" text-anchor=\"end\" dominant-baseline=\"middle\" transform=\"rotate(-45 {:.2} {:.2})\">{}</text>",
        x,
        y,
        x,
        y,
        escape_svg(label)
    )?;
    Ok(())
}

fn draw_y_axis_ticks(
    out: &mut String,
    left: f64,
    top: f64,
    plot_w: f64,
    plot_h: f64,
    y_max: f64,
    step: f64,
) -> Result<()> {
    let count = (y_max / step).round() as usize;
    for i in 0..=count {
        let v = step * i as f64;
        let y = top + plot_h - v / y_max * plot_h;
        writeln!(
            out,
            "<line x1=\"{}\" y1=\"{:.2}\" x2=\"{}\" y2=\"{:.2}\" stroke=\"#eee\"/>",
            left,
            y,
            left + plot_w,
            y
        )?;
        writeln!(
            out,
            "<text x=\"{}\" y=\"{:.2}\" font-size=\"10\" fill=\"#666\" text-anchor=\"end\" dominant-baseline=\"middle\">{}</text>",
            left - 4.0,
            y,
            fmt_tick(v, step)
        )?;
    }
    Ok(())
}

fn draw_axis_labels(
    out: &mut String,
    left: f64,
    top: f64,
    plot_w: f64,
    x_label_y: f64,
    plot_h: f64,
    x_label: &str,
    y_label: &str,
) -> Result<()> {
    writeln!(
        out,
        "<text x=\"{}\" y=\"{}\" font-size=\"11\" fill=\"#444\" text-anchor=\"middle\">{}</text>",
        left + plot_w / 2.0,
        x_label_y,
        escape_svg(x_label)
    )?;
    let yx = left - 48.0;
    let yy = top + plot_h / 2.0;
    writeln!(
        out,
        "<text x=\"{}\" y=\"{}\" font-size=\"11\" fill=\"#444\" text-anchor=\"middle\" transform=\"rotate(-90 {} {})\">{}</text>",
        yx,
        yy,
        yx,
        yy,
        escape_svg(y_label)
    )?;
    Ok(())
}

/// Tick spacing of 1, 2 or 5 times a power of ten giving about `intervals`
/// steps over `0..=max`.
fn tick_step(max: f64, intervals: usize) -> f64 {
    let rough = max.max(1e-9) / intervals.max(1) as f64;
    let mag = 10f64.powi(rough.log10().floor() as i32);
    let mult = [1.0, 2.0, 5.0]
        .into_iter()
        .find(|&m| rough <= m * mag)
        .unwrap_or(10.0);
    mult * mag
}

/// Enough decimals to tell ticks `step` apart.
fn fmt_tick(v: f64, step: f64) -> String {
    let decimals = if step >= 1.0 {
        0
    } else {
        (-step.log10().floor()) as usize
    };
    format!("{:.*}", decimals, v)
}

/// Escapes markup and replaces characters XML 1.0 does not allow at all
/// (control codes other than tab, LF and CR; U+FFFE and U+FFFF).
fn escape_svg(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\t' | '\n' | '\r' => out.push(c),
            c if c < '\u{20}' || c == '\u{FFFE}' || c == '\u{FFFF}' => {
                out.push(char::REPLACEMENT_CHARACTER)
            }
            c => out.push(c),
        }
    }
    out
}
