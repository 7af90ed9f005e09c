use anyhow::{Context, Result};
use image::ImageEncoder;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::hover;
use crate::ir::{format_count, Frame, Layout, Shape};
use crate::palette::Rgb;

/// Width of the y tick-label strip inside the left inset, and height of the
/// x tick-label strip inside the bottom inset. The chart's plot rectangle
/// must line up with `Layout`'s, since shapes arrive in plot-local pixels.
const Y_LABEL_AREA: u32 = 50;
const X_LABEL_AREA: u32 = 40;

pub struct RenderOptions {
    pub title: Option<String>,
    pub x_label: String,
    pub y_label: String,
}

fn rgb(c: Rgb) -> RGBColor {
    RGBColor(c.0, c.1, c.2)
}

/// Render one frame of the series view to PNG bytes.
///
/// Axes are drawn by plotters from the frame's data domains; everything
/// else (bands, lines, legend, guideline, tooltip) is already pixel-space
/// and is drawn directly on the root area at the positions the engine
/// computed.
pub fn render_series(frame: &Frame, layout: Layout, opts: &RenderOptions) -> Result<Vec<u8>> {
    let (width, height) = (layout.width, layout.height);
    let mut buffer = vec![0u8; (width * height * 3) as usize];

    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        root.fill(&WHITE).context("Failed to fill background")?;

        // Axes: margins are chosen so the mesh's plot rectangle coincides
        // with layout's plot rectangle.
        let mut chart = ChartBuilder::on(&root)
            .margin_left(layout.insets.left.saturating_sub(Y_LABEL_AREA))
            .margin_right(layout.insets.right)
            .margin_top(layout.insets.top)
            .margin_bottom(layout.insets.bottom.saturating_sub(X_LABEL_AREA))
            .x_label_area_size(X_LABEL_AREA)
            .y_label_area_size(Y_LABEL_AREA)
            .build_cartesian_2d(
                frame.x_domain.0..frame.x_domain.1,
                frame.y_domain.0..frame.y_domain.1,
            )
            .context("Failed to build chart")?;

        let percent = frame.percent;
        chart
            .configure_mesh()
            .disable_mesh()
            .x_desc(&opts.x_label)
            .y_desc(&opts.y_label)
            .x_labels(frame.x_ticks.max(2))
            .y_labels(6)
            .x_label_formatter(&|v| format!("{:.0}", v))
            .y_label_formatter(&|v| {
                if percent {
                    format!("{:.0}%", v * 100.0)
                } else {
                    format_count(*v)
                }
            })
            .draw()
            .context("Failed to draw mesh")?;

        draw_pixel_scene(&root, frame, layout)?;

        if let Some(title) = &opts.title {
            let style = ("sans-serif", 18)
                .into_font()
                .color(&BLACK)
                .pos(Pos::new(HPos::Center, VPos::Top));
            root.draw(&Text::new(title.clone(), ((width / 2) as i32, 10), style))
                .context("Failed to draw title")?;
        }

        root.present().context("Failed to present drawing")?;
    }

    encode_png(&buffer, width, height)
}

/// Pixel-space parts of the frame: shapes, legend, guideline, tooltip.
/// Drawn after the axes so the overlay sits on top.
fn draw_pixel_scene(
    root: &DrawingArea<BitMapBackend<'_>, Shift>,
    frame: &Frame,
    layout: Layout,
) -> Result<()> {
    let ox = layout.plot_left() as i32;
    let oy = layout.plot_top() as i32;

    for shape in &frame.shapes {
        match shape {
            Shape::Band { color, upper, lower, .. } => {
                let mut pts: Vec<(i32, i32)> = upper
                    .iter()
                    .map(|&(x, y)| (ox + x as i32, oy + y as i32))
                    .collect();
                pts.extend(lower.iter().rev().map(|&(x, y)| (ox + x as i32, oy + y as i32)));
                root.draw(&Polygon::new(pts, rgb(*color).mix(0.85).filled()))
                    .context("Failed to draw band")?;
            }
            Shape::Polyline { color, points, .. } => {
                let pts: Vec<(i32, i32)> = points
                    .iter()
                    .map(|&(x, y)| (ox + x as i32, oy + y as i32))
                    .collect();
                root.draw(&PathElement::new(pts, rgb(*color).stroke_width(2)))
                    .context("Failed to draw line")?;
            }
        }
    }

    // Legend in the right inset: swatch, label, and the mode note below.
    let lx = layout.width.saturating_sub(layout.insets.right) as i32 + 20;
    let mut ly = layout.insets.top as i32 + 6;
    for entry in &frame.legend {
        root.draw(&Rectangle::new(
            [(lx, ly), (lx + 14, ly + 14)],
            rgb(entry.color).filled(),
        ))
        .context("Failed to draw legend swatch")?;
        root.draw(&Text::new(
            entry.label.clone(),
            (lx + 22, ly + 2),
            ("sans-serif", 13).into_font().color(&BLACK),
        ))
        .context("Failed to draw legend label")?;
        ly += 28;
    }
    let note_style = ("sans-serif", 11).into_font().color(&RGBColor(100, 100, 100));
    for line in wrap_words(&frame.note, 20) {
        ly += 14;
        root.draw(&Text::new(line, (lx, ly), note_style.clone()))
            .context("Failed to draw legend note")?;
    }

    let plot_bottom = (layout.plot_top() + layout.plot_height()) as i32;
    if let Some(gx) = frame.guideline {
        let gx = ox + gx as i32;
        let style = BLACK.mix(0.25).stroke_width(1);
        // 3 on, 3 off
        let mut yy = oy;
        while yy < plot_bottom {
            let end = (yy + 3).min(plot_bottom);
            root.draw(&PathElement::new(vec![(gx, yy), (gx, end)], style))
                .context("Failed to draw guideline")?;
            yy += 6;
        }
    }

    if let Some(tooltip) = &frame.tooltip {
        let (x, y) = (tooltip.x as i32, tooltip.y as i32);
        let (w, h) = (tooltip.width as i32, tooltip.height as i32);
        root.draw(&Rectangle::new([(x, y), (x + w, y + h)], WHITE.filled()))
            .context("Failed to draw tooltip box")?;
        root.draw(&Rectangle::new(
            [(x, y), (x + w, y + h)],
            BLACK.mix(0.3).stroke_width(1),
        ))
        .context("Failed to draw tooltip border")?;

        let tx = x + hover::PAD_X as i32;
        let mut ty = y + hover::PAD_Y as i32;
        root.draw(&Text::new(
            tooltip.title.clone(),
            (tx, ty),
            ("sans-serif", 14).into_font().color(&BLACK),
        ))
        .context("Failed to draw tooltip title")?;
        for line in &tooltip.lines {
            ty += hover::LINE_H as i32;
            root.draw(&Text::new(
                line.clone(),
                (tx, ty),
                ("sans-serif", 13).into_font().color(&BLACK),
            ))
            .context("Failed to draw tooltip line")?;
        }
    }

    Ok(())
}

/// Greedy word wrap used for the legend note.
pub(crate) fn wrap_words(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > max_chars {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

pub(crate) fn encode_png(buffer: &[u8], width: u32, height: u32) -> Result<Vec<u8>> {
    let mut png_bytes = Vec::new();
    {
        let encoder = image::codecs::png::PngEncoder::new(&mut png_bytes);
        encoder
            .write_image(buffer, width, height, image::ColorType::Rgb8)
            .context("Failed to encode PNG")?;
    }
    Ok(png_bytes)
}
