// Static categorical views: bar chart and heatmap. Declarative rendering
// only; no hit regions, no hover state.

use anyhow::{bail, Context, Result};
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::ir::{format_count, Layout};
use crate::palette::{ColorPalette, ValueRamp};
use crate::render::{encode_png, RenderOptions};

/// Render one bar per category, colored from the categorical palette, with
/// the value printed above each bar.
pub fn render_bar(
    pairs: &[(String, f64)],
    layout: Layout,
    opts: &RenderOptions,
) -> Result<Vec<u8>> {
    if pairs.is_empty() {
        bail!("Cannot draw a bar chart with no categories");
    }

    let n = pairs.len();
    let max = pairs.iter().fold(0.0f64, |m, (_, v)| m.max(*v));
    let max = if max <= 0.0 { 1.0 } else { max };
    let names: Vec<String> = pairs.iter().map(|(name, _)| name.clone()).collect();
    let colors = ColorPalette::category10().assign_colors(&names);

    let (width, height) = (layout.width, layout.height);
    let mut buffer = vec![0u8; (width * height * 3) as usize];

    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        root.fill(&WHITE).context("Failed to fill background")?;

        let mut chart = ChartBuilder::on(&root)
            .margin(10)
            .caption(opts.title.as_deref().unwrap_or(""), ("sans-serif", 20))
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(-0.5f64..(n as f64 - 0.5), 0f64..(max * 1.1))
            .context("Failed to build chart")?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc(&opts.x_label)
            .y_desc(&opts.y_label)
            .x_labels(n)
            .x_label_formatter(&|v| {
                let i = v.round();
                if (v - i).abs() < 0.25 && i >= 0.0 && (i as usize) < n {
                    names[i as usize].clone()
                } else {
                    String::new()
                }
            })
            .y_label_formatter(&|v| format_count(*v))
            .draw()
            .context("Failed to draw mesh")?;

        chart
            .draw_series(pairs.iter().enumerate().map(|(i, (_, v))| {
                let c = colors[i % colors.len()];
                Rectangle::new(
                    [(i as f64 - 0.4, 0.0), (i as f64 + 0.4, *v)],
                    RGBColor(c.0, c.1, c.2).filled(),
                )
            }))
            .context("Failed to draw bars")?;

        let label_style = ("sans-serif", 12)
            .into_font()
            .color(&BLACK)
            .pos(Pos::new(HPos::Center, VPos::Bottom));
        chart
            .draw_series(pairs.iter().enumerate().map(|(i, (_, v))| {
                Text::new(format_count(*v), (i as f64, *v + max * 0.01), label_style.clone())
            }))
            .context("Failed to draw value labels")?;

        root.present().context("Failed to present drawing")?;
    }

    encode_png(&buffer, width, height)
}

/// Render one row per category, filled from the sequential heat ramp by
/// value, with the category name on the left.
pub fn render_heatmap(
    pairs: &[(String, f64)],
    layout: Layout,
    opts: &RenderOptions,
) -> Result<Vec<u8>> {
    if pairs.is_empty() {
        bail!("Cannot draw a heatmap with no categories");
    }

    let n = pairs.len();
    let max = pairs.iter().fold(0.0f64, |m, (_, v)| m.max(*v));
    let max = if max <= 0.0 { 1.0 } else { max };
    let ramp = ValueRamp::heat();

    let (width, height) = (layout.width, layout.height);
    let mut buffer = vec![0u8; (width * height * 3) as usize];

    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        root.fill(&WHITE).context("Failed to fill background")?;

        // Rows span from the left inset to a slim right margin; the right
        // legend inset is unused here.
        let left = layout.insets.left as i32;
        let right = (width as i32 - 20).max(left + 1);
        let top = layout.insets.top as f32;
        let row_h = layout.plot_height() / n as f32;

        let label_style = ("sans-serif", 14)
            .into_font()
            .color(&BLACK)
            .pos(Pos::new(HPos::Right, VPos::Center));

        for (i, (name, value)) in pairs.iter().enumerate() {
            let c = ramp.at(value / max);
            let y0 = (top + i as f32 * row_h) as i32;
            let y1 = (top + (i + 1) as f32 * row_h) as i32 - 4;
            root.draw(&Rectangle::new(
                [(left, y0), (right, y1.max(y0 + 1))],
                RGBColor(c.0, c.1, c.2).filled(),
            ))
            .context("Failed to draw heatmap row")?;
            root.draw(&Text::new(
                name.clone(),
                (left - 8, (y0 + y1) / 2),
                label_style.clone(),
            ))
            .context("Failed to draw row label")?;
        }

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

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

    fn pairs() -> Vec<(String, f64)> {
        vec![
            ("0-16".to_string(), 120.0),
            ("17-25".to_string(), 4500.0),
            ("26-39".to_string(), 3800.0),
            ("40-64".to_string(), 2100.0),
            ("65 and over".to_string(), 400.0),
        ]
    }

    fn opts() -> RenderOptions {
        RenderOptions {
            title: Some("Age groups".to_string()),
            x_label: "AGE_GROUP".to_string(),
            y_label: "Total fines".to_string(),
        }
    }

    #[test]
    fn test_render_bar_produces_png() {
        let png = render_bar(&pairs(), Layout::new(640, 480), &opts()).unwrap();
        assert_eq!(&png[0..8], &PNG_MAGIC);
    }

    #[test]
    fn test_render_heatmap_produces_png() {
        let png = render_heatmap(&pairs(), Layout::new(480, 480), &opts()).unwrap();
        assert_eq!(&png[0..8], &PNG_MAGIC);
    }

    #[test]
    fn test_render_bar_rejects_empty() {
        assert!(render_bar(&[], Layout::new(640, 480), &opts()).is_err());
        assert!(render_heatmap(&[], Layout::new(640, 480), &opts()).is_err());
    }

    #[test]
    fn test_render_bar_single_category() {
        let one = vec![("A".to_string(), 10.0)];
        let png = render_bar(&one, Layout::new(640, 480), &opts()).unwrap();
        assert_eq!(&png[0..8], &PNG_MAGIC);
    }
}
