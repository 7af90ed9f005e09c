use anyhow::{bail, Result};

use crate::geometry;
use crate::hit::{self, HitRegion};
use crate::hover::{self, HoverState, PlotContext};
use crate::ir::{ChartKind, Frame, Layout, LegendEntry, MeasureStyle, PlotPoint, Record, Shape};
use crate::palette::ColorPalette;
use crate::scale::{self, LinearScale};
use crate::series;

/// The two orthogonal display toggles. Starts as (stacked, absolute) and is
/// mutated only through the view's setters for the life of the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeState {
    pub kind: ChartKind,
    pub percent: bool,
}

impl Default for ModeState {
    fn default() -> Self {
        Self { kind: ChartKind::Stacked, percent: false }
    }
}

/// Owner of the whole chart pipeline: records and mode in, frame out.
///
/// Every artifact below `mode` is derived; a mode mutation rebuilds all of
/// them in one pass and clears the hover state, so nothing downstream can
/// ever mix values from two modes. There is deliberately no partial-update
/// path.
///
/// All state lives behind `&mut self`, which is what serializes access on a
/// single thread; a multi-threaded host must add its own serialization
/// (e.g. a mutex around the view) to keep the event-ordering guarantee.
pub struct ChartView {
    records: Vec<Record>,
    measures: Vec<MeasureStyle>,
    layout: Layout,
    mode: ModeState,
    points: Vec<PlotPoint>,
    x: LinearScale,
    y: LinearScale,
    shapes: Vec<Shape>,
    regions: Vec<HitRegion>,
    hover: HoverState,
}

impl ChartView {
    pub fn new(records: Vec<Record>, measure_names: Vec<String>, layout: Layout) -> Result<Self> {
        if records.is_empty() {
            bail!("Chart requires at least one record");
        }
        if measure_names.len() < 2 {
            bail!(
                "Series views require at least two measures ({} given)",
                measure_names.len()
            );
        }
        for record in &records {
            if record.values.len() != measure_names.len() {
                bail!(
                    "Record with key {} has {} values, expected {}",
                    record.key,
                    record.values.len(),
                    measure_names.len()
                );
            }
        }

        let colors = ColorPalette::category10().assign_colors(&measure_names);
        let measures = measure_names
            .into_iter()
            .zip(colors)
            .map(|(name, color)| MeasureStyle { name, color })
            .collect();

        let mut view = Self {
            records,
            measures,
            layout,
            mode: ModeState::default(),
            points: Vec::new(),
            x: LinearScale::new((0.0, 1.0), (0.0, 1.0)),
            y: LinearScale::new((0.0, 1.0), (0.0, 1.0)),
            shapes: Vec::new(),
            regions: Vec::new(),
            hover: HoverState::default(),
        };
        view.rebuild();
        Ok(view)
    }

    pub fn mode(&self) -> ModeState {
        self.mode
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn points(&self) -> &[PlotPoint] {
        &self.points
    }

    pub fn regions(&self) -> &[HitRegion] {
        &self.regions
    }

    pub fn hover(&self) -> &HoverState {
        &self.hover
    }

    pub fn set_chart_kind(&mut self, kind: ChartKind) {
        self.mode.kind = kind;
        self.rebuild();
    }

    pub fn set_percent(&mut self, percent: bool) {
        self.mode.percent = percent;
        self.rebuild();
    }

    /// Feed a pointer position in canvas pixels. Resolution runs against the
    /// artifacts of the current mode only; a rebuild always completes before
    /// the next event is seen.
    pub fn pointer_moved(&mut self, x: f32, y: f32) {
        let ctx = PlotContext {
            regions: &self.regions,
            points: &self.points,
            measures: &self.measures,
            percent: self.mode.percent,
            layout: self.layout,
        };
        hover::pointer_moved(&mut self.hover, &ctx, x, y);
    }

    pub fn pointer_left(&mut self) {
        hover::pointer_left(&mut self.hover);
    }

    /// Snapshot the current scene for the renderer.
    pub fn frame(&self) -> Frame {
        let suffix = if self.mode.percent { " (%)" } else { "" };
        let legend = self
            .measures
            .iter()
            .map(|m| LegendEntry { label: format!("{}{}", m.name, suffix), color: m.color })
            .collect();
        let note = if self.mode.percent {
            "Values shown as % of total".to_string()
        } else {
            "Values shown as absolute counts".to_string()
        };

        Frame {
            shapes: self.shapes.clone(),
            x_domain: self.x.domain,
            y_domain: self.y.domain,
            x_ticks: self.points.len().min(12),
            percent: self.mode.percent,
            guideline: self.hover.guideline(),
            tooltip: self.hover.tooltip().cloned(),
            legend,
            note,
        }
    }

    /// Full recomputation cascade: transform, scales, geometry, hit regions,
    /// and a hover reset. Stale plot points must never be displayed, so the
    /// hover state goes too; the next pointer move repopulates it against
    /// fresh artifacts.
    fn rebuild(&mut self) {
        self.points = series::transform(&self.records, self.mode.percent);
        self.x = scale::x_scale(&self.points, self.layout.plot_width());
        self.y = scale::y_scale(&self.points, self.mode.percent, self.layout.plot_height());
        self.shapes =
            geometry::build_scene(&self.points, &self.measures, self.mode.kind, &self.x, &self.y);
        let xs = geometry::point_xs(&self.points, &self.x);
        self.regions = hit::build_regions(&xs, self.layout.plot_width());
        self.hover.clear();
    }
}
