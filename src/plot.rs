//! Descending-length line chart artifact
//!
//! Builds the chart as an SVG document and rasterizes it to PNG through
//! resvg. The plotted ordering is derived here — a stable descending sort by
//! sequence length — and applies to this artifact only; the CSV report keeps
//! arrival order.

use crate::error::{Error, Result};
use crate::types::SequenceRecord;
use resvg::{tiny_skia, usvg};
use std::path::Path;
use svg::Document;
use svg::node::element::path::Data;
use svg::node::element::{Circle, Line, Path as SvgPath, Rectangle, Text};

const MIN_WIDTH: f32 = 800.0;
const HEIGHT: f32 = 600.0;
const PER_RECORD_WIDTH: f32 = 30.0;
const MARGIN_LEFT: f32 = 90.0;
const MARGIN_RIGHT: f32 = 30.0;
const MARGIN_TOP: f32 = 60.0;
const MARGIN_BOTTOM: f32 = 130.0;
const Y_TICKS: u64 = 5;
/// Rasterization scale; the PNG is rendered at twice the SVG coordinate
/// size, the fixed-resolution equivalent of a high-DPI export.
const RASTER_SCALE: f32 = 2.0;

/// Order records descending by length with a stable sort, so equal-length
/// records keep their original relative order.
pub fn sorted_by_length_desc(records: &[SequenceRecord]) -> Vec<&SequenceRecord> {
    let mut sorted: Vec<&SequenceRecord> = records.iter().collect();
    sorted.sort_by(|a, b| b.length.cmp(&a.length));
    sorted
}

/// Chart width grows with record count so rotated labels stay legible,
/// never dropping below the minimum floor.
fn chart_width(record_count: usize) -> f32 {
    let plot = record_count as f32 * PER_RECORD_WIDTH;
    (MARGIN_LEFT + plot + MARGIN_RIGHT).max(MIN_WIDTH)
}

/// Render the descending-length line chart and write it as a PNG.
///
/// Creates or overwrites the file at `path`. One point per record, x-axis
/// labeled by accession (rotated 90° for legibility), y-axis by length.
///
/// # Errors
///
/// Construction, rasterization and PNG-encoding failures all surface as
/// [`Error::Render`].
pub fn write_length_plot(records: &[SequenceRecord], path: &Path) -> Result<()> {
    let sorted = sorted_by_length_desc(records);
    let document = build_document(&sorted);
    rasterize(&document.to_string(), path)?;
    tracing::info!(path = %path.display(), points = sorted.len(), "length plot written");
    Ok(())
}

fn build_document(sorted: &[&SequenceRecord]) -> Document {
    let width = chart_width(sorted.len());
    let plot_left = MARGIN_LEFT;
    let plot_right = width - MARGIN_RIGHT;
    let plot_top = MARGIN_TOP;
    let plot_bottom = HEIGHT - MARGIN_BOTTOM;

    let max_length = sorted.iter().map(|r| r.length).max().unwrap_or(0).max(1);
    let x_at = |index: usize| -> f32 {
        if sorted.len() <= 1 {
            (plot_left + plot_right) / 2.0
        } else {
            plot_left
                + (plot_right - plot_left) * index as f32 / (sorted.len() - 1) as f32
        }
    };
    let y_at = |length: u64| -> f32 {
        plot_bottom - (plot_bottom - plot_top) * length as f32 / max_length as f32
    };

    let mut doc = Document::new()
        .set("viewBox", (0, 0, width, HEIGHT))
        .set("width", width)
        .set("height", HEIGHT)
        .add(
            Rectangle::new()
                .set("x", 0)
                .set("y", 0)
                .set("width", width)
                .set("height", HEIGHT)
                .set("fill", "#ffffff"),
        )
        .add(
            Text::new("Sequence lengths sorted descending")
                .set("x", width / 2.0)
                .set("y", MARGIN_TOP / 2.0)
                .set("text-anchor", "middle")
                .set("font-family", "sans-serif")
                .set("font-size", 18)
                .set("fill", "#111111"),
        )
        // Axes
        .add(
            Line::new()
                .set("x1", plot_left)
                .set("y1", plot_bottom)
                .set("x2", plot_right)
                .set("y2", plot_bottom)
                .set("stroke", "#000000")
                .set("stroke-width", 1),
        )
        .add(
            Line::new()
                .set("x1", plot_left)
                .set("y1", plot_top)
                .set("x2", plot_left)
                .set("y2", plot_bottom)
                .set("stroke", "#000000")
                .set("stroke-width", 1),
        )
        // Axis captions
        .add(
            Text::new("GenBank accession")
                .set("x", (plot_left + plot_right) / 2.0)
                .set("y", HEIGHT - 12.0)
                .set("text-anchor", "middle")
                .set("font-family", "sans-serif")
                .set("font-size", 12)
                .set("fill", "#111111"),
        )
        .add(
            Text::new("Sequence length (bp)")
                .set("x", 18.0)
                .set("y", (plot_top + plot_bottom) / 2.0)
                .set(
                    "transform",
                    format!(
                        "rotate(-90 {} {})",
                        18.0,
                        (plot_top + plot_bottom) / 2.0
                    ),
                )
                .set("text-anchor", "middle")
                .set("font-family", "sans-serif")
                .set("font-size", 12)
                .set("fill", "#111111"),
        );

    // Horizontal gridlines with tick values
    for tick in 0..=Y_TICKS {
        let value = max_length * tick / Y_TICKS;
        let y = y_at(value);
        doc = doc
            .add(
                Line::new()
                    .set("x1", plot_left)
                    .set("y1", y)
                    .set("x2", plot_right)
                    .set("y2", y)
                    .set("stroke", "#dddddd")
                    .set("stroke-width", 0.5),
            )
            .add(
                Text::new(value.to_string())
                    .set("x", plot_left - 8.0)
                    .set("y", y + 3.0)
                    .set("text-anchor", "end")
                    .set("font-family", "monospace")
                    .set("font-size", 9)
                    .set("fill", "#333333"),
            );
    }

    // Connecting line through all points, in descending-length order
    if sorted.len() > 1 {
        let mut data = Data::new().move_to((x_at(0), y_at(sorted[0].length)));
        for (index, record) in sorted.iter().enumerate().skip(1) {
            data = data.line_to((x_at(index), y_at(record.length)));
        }
        doc = doc.add(
            SvgPath::new()
                .set("d", data)
                .set("fill", "none")
                .set("stroke", "#1f4fcc")
                .set("stroke-width", 1.5),
        );
    }

    // Markers and rotated accession labels
    for (index, record) in sorted.iter().enumerate() {
        let x = x_at(index);
        doc = doc
            .add(
                Circle::new()
                    .set("cx", x)
                    .set("cy", y_at(record.length))
                    .set("r", 3)
                    .set("fill", "#1f4fcc"),
            )
            .add(
                Text::new(record.accession.clone())
                    .set("x", x)
                    .set("y", plot_bottom + 10.0)
                    .set(
                        "transform",
                        format!("rotate(-90 {} {})", x, plot_bottom + 10.0),
                    )
                    .set("text-anchor", "end")
                    .set("font-family", "monospace")
                    .set("font-size", 9)
                    .set("fill", "#333333"),
            );
    }

    doc
}

/// Rasterize the SVG text to a PNG at a fixed 2x scale.
fn rasterize(svg_text: &str, path: &Path) -> Result<()> {
    let mut options = usvg::Options::default();
    options.fontdb_mut().load_system_fonts();
    let tree = usvg::Tree::from_str(svg_text, &options)
        .map_err(|e| Error::Render(format!("could not build SVG tree: {e}")))?;

    let size = tree.size();
    let pixel_width = (size.width() * RASTER_SCALE).ceil() as u32;
    let pixel_height = (size.height() * RASTER_SCALE).ceil() as u32;
    let mut pixmap = tiny_skia::Pixmap::new(pixel_width, pixel_height)
        .ok_or_else(|| Error::Render("could not allocate output pixmap".to_string()))?;
    pixmap.fill(tiny_skia::Color::WHITE);

    resvg::render(
        &tree,
        tiny_skia::Transform::from_scale(RASTER_SCALE, RASTER_SCALE),
        &mut pixmap.as_mut(),
    );

    pixmap
        .save_png(path)
        .map_err(|e| Error::Render(format!("could not write PNG '{}': {e}", path.display())))
}
