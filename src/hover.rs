use crate::hit::{self, HitRegion};
use crate::ir::{format_count, format_percent, Layout, MeasureStyle, PlotPoint, Tooltip};

// Tooltip placement: preferred offset from the pointer, and the minimum gap
// kept from the viewport's top edge.
const OFFSET_X: f32 = 18.0;
const OFFSET_Y: f32 = 40.0;
const TOP_MARGIN: f32 = 6.0;

// Box sizing is estimated from content; the renderer draws text at the same
// metrics so the estimate and the drawn box agree.
pub const TEXT_SIZE: f32 = 13.0;
pub const LINE_H: f32 = 18.0;
pub const PAD_X: f32 = 12.0;
pub const PAD_Y: f32 = 8.0;
const CHAR_W: f32 = TEXT_SIZE * 0.64;

/// Everything the coordinator reads while handling a pointer event. All of
/// it is owned upstream (by the view) and borrowed read-only here; the only
/// thing the coordinator writes is the `HoverState` it is handed.
pub struct PlotContext<'a> {
    pub regions: &'a [HitRegion],
    pub points: &'a [PlotPoint],
    pub measures: &'a [MeasureStyle],
    pub percent: bool,
    pub layout: Layout,
}

/// Transient interaction state. Mutated only by the pointer handlers below
/// and cleared whenever the mode changes, so a stale point is never shown.
#[derive(Debug, Clone, Default)]
pub struct HoverState {
    active: Option<usize>,
    pointer: Option<(f32, f32)>,
    guideline: Option<f32>,
    tooltip: Option<Tooltip>,
}

impl HoverState {
    /// Index of the hovered plot point, if any.
    pub fn active(&self) -> Option<usize> {
        self.active
    }

    pub fn pointer(&self) -> Option<(f32, f32)> {
        self.pointer
    }

    /// Plot-local x of the guideline while hovering.
    pub fn guideline(&self) -> Option<f32> {
        self.guideline
    }

    pub fn tooltip(&self) -> Option<&Tooltip> {
        self.tooltip.as_ref()
    }

    pub fn clear(&mut self) {
        *self = HoverState::default();
    }
}

/// Handle a pointer move at canvas position (x, y).
///
/// Inside the plot area this resolves the owning hit region, pins the
/// guideline to the exact pointer x (continuous feedback, even though the
/// data lookup is discrete), and places the tooltip. A position outside the
/// plot area is treated as a leave. Synchronous: the state is fully updated
/// before this returns.
pub fn pointer_moved(state: &mut HoverState, ctx: &PlotContext, x: f32, y: f32) {
    let local_x = x - ctx.layout.plot_left();
    let local_y = y - ctx.layout.plot_top();
    let inside = local_x >= 0.0
        && local_x <= ctx.layout.plot_width()
        && local_y >= 0.0
        && local_y <= ctx.layout.plot_height();
    if !inside {
        pointer_left(state);
        return;
    }

    let Some(region_idx) = hit::resolve(ctx.regions, local_x) else {
        pointer_left(state);
        return;
    };
    let point_idx = ctx.regions[region_idx].index;

    state.active = Some(point_idx);
    state.pointer = Some((x, y));
    state.guideline = Some(local_x);
    state.tooltip = Some(build_tooltip(
        &ctx.points[point_idx],
        ctx.measures,
        ctx.percent,
        (x, y),
        (ctx.layout.width as f32, ctx.layout.height as f32),
    ));
}

/// Handle the pointer leaving the plot area: everything hover-related goes
/// away at once.
pub fn pointer_left(state: &mut HoverState) {
    state.clear();
}

/// Tooltip content is always built from the point's RAW values, so the
/// displayed datum stays traceable to the measured numbers whatever the
/// mode; percent mode appends the formatted share per measure.
fn content(point: &PlotPoint, measures: &[MeasureStyle], percent: bool) -> (String, Vec<String>) {
    let title = format!("{}", point.key);
    let lines = measures
        .iter()
        .enumerate()
        .map(|(m, measure)| {
            let raw = format_count(point.raw[m]);
            if percent {
                format!("{}: {} ({})", measure.name, raw, format_percent(point.values[m]))
            } else {
                format!("{}: {}", measure.name, raw)
            }
        })
        .collect();
    (title, lines)
}

fn build_tooltip(
    point: &PlotPoint,
    measures: &[MeasureStyle],
    percent: bool,
    pointer: (f32, f32),
    viewport: (f32, f32),
) -> Tooltip {
    let (title, lines) = content(point, measures, percent);

    let longest = lines
        .iter()
        .map(|l| l.chars().count())
        .chain(std::iter::once(title.chars().count()))
        .max()
        .unwrap_or(0);
    let width = PAD_X * 2.0 + longest as f32 * CHAR_W;
    let height = PAD_Y * 2.0 + (lines.len() as f32 + 1.0) * LINE_H;

    let (px, py) = pointer;
    let (vw, vh) = viewport;

    // Prefer right-and-above the pointer; flip to the left when the box
    // would cross the viewport's right edge, then clamp so no edge ends up
    // off-screen. The top clamp wins over the bottom one.
    let mut x = px + OFFSET_X;
    if x + width > vw {
        x = px - OFFSET_X - width;
    }
    if x < 0.0 {
        x = 0.0;
    }

    let mut y = py - OFFSET_Y;
    if y + height > vh {
        y = vh - height;
    }
    if y < TOP_MARGIN {
        y = TOP_MARGIN;
    }

    Tooltip { title, lines, x, y, width, height }
}
