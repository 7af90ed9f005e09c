mod categorical;
mod csv_reader;
mod geometry;
mod hit;
mod hover;
mod ir;
mod palette;
mod render;
mod scale;
mod series;
mod view;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, ValueEnum};
use std::io::{self, Write};

use crate::ir::{ChartKind, Layout};
use crate::render::RenderOptions;
use crate::view::ChartView;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ViewArg {
    /// Stacked-area or multi-line series over the ordinal key
    Series,
    /// One bar per category (single measure)
    Bar,
    /// One heat row per category (single measure)
    Heatmap,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum KindArg {
    Stacked,
    Line,
}

#[derive(Parser, Debug)]
#[command(name = "hovergraph")]
#[command(about = "Generate interactive-style charts from CSV data", long_about = None)]
struct Args {
    #[arg(short = 'x', long = "x", required = true, help = "Ordinal/category column (name or 0-based index)")]
    x_column: String,

    #[arg(
        short = 'm',
        long = "measures",
        required = true,
        value_delimiter = ',',
        help = "Measure columns, comma-separated (>=2 for series, exactly 1 for bar/heatmap)"
    )]
    measures: Vec<String>,

    #[arg(long = "view", value_enum, default_value = "series", help = "Chart view")]
    view: ViewArg,

    #[arg(long = "kind", value_enum, default_value = "stacked", help = "Series geometry (series view only)")]
    kind: KindArg,

    #[arg(long = "percent", help = "Show measures as share of each key's total")]
    percent: bool,

    #[arg(long = "hover", help = "Bake the hover overlay into the snapshot at canvas position 'x,y' (pixels)")]
    hover: Option<String>,

    #[arg(long = "width", default_value = "900", help = "Output width in pixels")]
    width: u32,

    #[arg(long = "height", default_value = "420", help = "Output height in pixels")]
    height: u32,

    #[arg(short = 't', long = "title", help = "Chart title")]
    title: Option<String>,

    #[arg(long = "x-label", help = "X-axis label (defaults to column name)")]
    x_label: Option<String>,

    #[arg(long = "y-label", help = "Y-axis label")]
    y_label: Option<String>,
}

/// Parse a `--hover` argument of the form "x,y" into canvas pixels.
fn parse_hover_point(input: &str) -> Result<(f32, f32)> {
    let (x_str, y_str) = input
        .split_once(',')
        .ok_or_else(|| anyhow!("Expected --hover as 'x,y', got '{}'", input))?;
    let x = x_str
        .trim()
        .parse::<f32>()
        .with_context(|| format!("Failed to parse hover x '{}'", x_str))?;
    let y = y_str
        .trim()
        .parse::<f32>()
        .with_context(|| format!("Failed to parse hover y '{}'", y_str))?;
    Ok((x, y))
}

fn main() -> Result<()> {
    let args = Args::parse();

    let csv_data = csv_reader::read_csv_from_stdin().context("Failed to read CSV from stdin")?;
    let layout = Layout::new(args.width, args.height);

    let png_bytes = match args.view {
        ViewArg::Series => {
            if args.measures.len() < 2 {
                bail!(
                    "The series view requires at least two measure columns ({} given)",
                    args.measures.len()
                );
            }

            let key_selector = csv_reader::parse_column_selector(&args.x_column);
            let measure_selectors: Vec<_> = args
                .measures
                .iter()
                .map(|m| csv_reader::parse_column_selector(m))
                .collect();
            let (key_name, measure_names, records) =
                csv_reader::extract_records(&csv_data, &key_selector, &measure_selectors)
                    .context("Failed to extract records")?;

            let mut view = ChartView::new(records, measure_names, layout)
                .context("Failed to build chart")?;
            view.set_chart_kind(match args.kind {
                KindArg::Stacked => ChartKind::Stacked,
                KindArg::Line => ChartKind::Line,
            });
            view.set_percent(args.percent);

            if let Some(hover) = &args.hover {
                let (hx, hy) = parse_hover_point(hover)?;
                view.pointer_moved(hx, hy);
            }

            let opts = RenderOptions {
                title: args.title,
                x_label: args.x_label.unwrap_or(key_name),
                y_label: args
                    .y_label
                    .unwrap_or_else(|| if args.percent { "Share".to_string() } else { "Value".to_string() }),
            };
            render::render_series(&view.frame(), view.layout(), &opts)
                .context("Failed to generate chart")?
        }
        ViewArg::Bar | ViewArg::Heatmap => {
            if args.measures.len() != 1 {
                bail!(
                    "The {} view takes exactly one measure column ({} given)",
                    if args.view == ViewArg::Bar { "bar" } else { "heatmap" },
                    args.measures.len()
                );
            }

            let cat_selector = csv_reader::parse_column_selector(&args.x_column);
            let val_selector = csv_reader::parse_column_selector(&args.measures[0]);
            let (cat_name, val_name, pairs) =
                csv_reader::extract_categories(&csv_data, &cat_selector, &val_selector)
                    .context("Failed to extract categories")?;

            let opts = RenderOptions {
                title: args.title,
                x_label: args.x_label.unwrap_or(cat_name),
                y_label: args.y_label.unwrap_or(val_name),
            };
            match args.view {
                ViewArg::Bar => categorical::render_bar(&pairs, layout, &opts)
                    .context("Failed to generate bar chart")?,
                _ => categorical::render_heatmap(&pairs, layout, &opts)
                    .context("Failed to generate heatmap")?,
            }
        }
    };

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    handle
        .write_all(&png_bytes)
        .context("Failed to write PNG to stdout")?;
    handle.flush().context("Failed to flush stdout")?;

    Ok(())
}
