use crate::ir::{ChartKind, MeasureStyle, PlotPoint, Shape};
use crate::scale::LinearScale;

/// Pixel x position of every plot point, in point order. This is the input
/// the hit-region builder partitions.
pub fn point_xs(points: &[PlotPoint], x: &LinearScale) -> Vec<f32> {
    points.iter().map(|p| x.to_px(p.key)).collect()
}

/// Map plot points into pixel-space shapes for the active chart kind.
///
/// Stacked: one cumulative band per measure, in declaration order: measure
/// k's band spans the running sum of measures 0..k-1 up to the sum through
/// k. Declaration order is the stacking order: the first measure sits at
/// the bottom and later measures draw over earlier ones.
///
/// Line: one independent polyline per measure, nothing accumulated.
pub fn build_scene(
    points: &[PlotPoint],
    measures: &[MeasureStyle],
    kind: ChartKind,
    x: &LinearScale,
    y: &LinearScale,
) -> Vec<Shape> {
    match kind {
        ChartKind::Stacked => {
            let mut shapes = Vec::with_capacity(measures.len());
            let mut base = vec![0.0f64; points.len()];
            for (m, measure) in measures.iter().enumerate() {
                let mut upper = Vec::with_capacity(points.len());
                let mut lower = Vec::with_capacity(points.len());
                for (i, p) in points.iter().enumerate() {
                    let px = x.to_px(p.key);
                    let top = base[i] + p.values[m];
                    lower.push((px, y.to_px(base[i])));
                    upper.push((px, y.to_px(top)));
                    base[i] = top;
                }
                shapes.push(Shape::Band {
                    measure: measure.name.clone(),
                    color: measure.color,
                    upper,
                    lower,
                });
            }
            shapes
        }
        ChartKind::Line => measures
            .iter()
            .enumerate()
            .map(|(m, measure)| Shape::Polyline {
                measure: measure.name.clone(),
                color: measure.color,
                points: points
                    .iter()
                    .map(|p| (x.to_px(p.key), y.to_px(p.values[m])))
                    .collect(),
            })
            .collect(),
    }
}
