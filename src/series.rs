use crate::ir::{PlotPoint, Record};

/// Transform sorted records into plot points under the active value mode.
///
/// Absolute mode carries the raw values through unchanged. Percent mode
/// divides each value by the record's total; a record whose total is
/// exactly zero maps every measure to 0 rather than dividing (so the
/// pipeline never sees a NaN). Raw values and the total are always kept on
/// the point for tooltip display.
///
/// Pure function: record order is preserved, input is untouched.
pub fn transform(records: &[Record], percent: bool) -> Vec<PlotPoint> {
    records
        .iter()
        .map(|record| {
            let total: f64 = record.values.iter().sum();
            let values = if percent {
                if total == 0.0 {
                    vec![0.0; record.values.len()]
                } else {
                    record.values.iter().map(|v| v / total).collect()
                }
            } else {
                record.values.clone()
            };
            PlotPoint {
                key: record.key,
                values,
                raw: record.values.clone(),
                total,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(key: f64, values: &[f64]) -> Record {
        Record { key, values: values.to_vec() }
    }

    #[test]
    fn test_absolute_passes_raw_values_through() {
        let records = vec![record(2018.0, &[100.0, 50.0]), record(2019.0, &[80.0, 120.0])];
        let points = transform(&records, false);

        assert_eq!(points.len(), 2);
        assert_eq!(points[0].values, vec![100.0, 50.0]);
        assert_eq!(points[1].values, vec![80.0, 120.0]);
        assert_eq!(points[0].total, 150.0);
    }

    #[test]
    fn test_percent_fractions_match_known_dataset() {
        let records = vec![record(2018.0, &[100.0, 50.0]), record(2019.0, &[80.0, 120.0])];
        let points = transform(&records, true);

        assert!((points[0].values[0] - 0.667).abs() < 0.001);
        assert!((points[0].values[1] - 0.333).abs() < 0.001);
        assert!((points[1].values[0] - 0.4).abs() < 1e-9);
        assert!((points[1].values[1] - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_percent_fractions_sum_to_one() {
        let records = vec![
            record(1.0, &[3.0, 5.0, 2.0]),
            record(2.0, &[0.1, 0.9, 1.0]),
            record(3.0, &[7.0, 0.0, 0.0]),
        ];
        for point in transform(&records, true) {
            let sum: f64 = point.values.iter().sum();
            assert!((sum - 1.0).abs() < 1e-9, "sum was {}", sum);
        }
    }

    #[test]
    fn test_percent_zero_total_maps_to_zeros() {
        let records = vec![record(2020.0, &[0.0, 0.0])];
        let points = transform(&records, true);
        assert_eq!(points[0].values, vec![0.0, 0.0]);
        assert_eq!(points[0].total, 0.0);
        for v in &points[0].values {
            assert!(v.is_finite());
        }
    }

    #[test]
    fn test_raw_values_retained_in_percent_mode() {
        let records = vec![record(2018.0, &[100.0, 50.0])];
        let points = transform(&records, true);
        assert_eq!(points[0].raw, vec![100.0, 50.0]);
        assert_eq!(points[0].total, 150.0);
    }

    #[test]
    fn test_order_preserved() {
        let records = vec![record(1.0, &[1.0]), record(2.0, &[2.0]), record(3.0, &[3.0])];
        let keys: Vec<f64> = transform(&records, false).iter().map(|p| p.key).collect();
        assert_eq!(keys, vec![1.0, 2.0, 3.0]);
    }
}
