// Hit regions: enlarged hover targets, one per data point.

/// A half-open horizontal interval `[left, right)` owning one point.
/// The final region also owns its right edge so the plot's right boundary
/// still resolves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitRegion {
    pub left: f32,
    pub right: f32,
    pub index: usize,
}

/// Partition `[0, width]` into one region per point, with boundaries at the
/// midpoint between adjacent x positions. The first region extends to 0 and
/// the last to `width`, so every pixel column resolves to exactly one point
/// with no dead zones. A single point yields one region spanning the full
/// width.
///
/// `xs` must be ascending (they come from sorted records through a
/// monotonic scale).
pub fn build_regions(xs: &[f32], width: f32) -> Vec<HitRegion> {
    let n = xs.len();
    (0..n)
        .map(|i| {
            let left = if i == 0 { 0.0 } else { (xs[i - 1] + xs[i]) / 2.0 };
            let right = if i + 1 == n { width } else { (xs[i] + xs[i + 1]) / 2.0 };
            HitRegion { left, right, index: i }
        })
        .collect()
}

/// Resolve the region owning pixel column `x`, or None when `x` lies
/// outside `[0, width]` or there are no regions. Binary search, O(log n).
pub fn resolve(regions: &[HitRegion], x: f32) -> Option<usize> {
    let last = regions.last()?;
    if x < 0.0 || x > last.right {
        return None;
    }
    let idx = regions.partition_point(|r| r.right <= x);
    Some(idx.min(regions.len() - 1))
}
