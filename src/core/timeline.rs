// GlucosePlotter - core/timeline.rs
//
// Chronological ordering and summary statistics over parsed series.
//
// Sorting is stable: records with equal timestamps keep the order in which
// they appeared in the export. There is no secondary key.

use crate::core::model::{GlucoseData, Measurement, Timestamped};
use chrono::NaiveDateTime;

/// Sort a series by ascending timestamp in place.
///
/// Each record moves as a unit, so timestamps stay paired with their values.
pub fn sort_chronologically<T: Timestamped>(series: &mut [T]) {
    series.sort_by_key(|record| record.timestamp());
}

/// Sort both series of `data` and return it.
pub fn sort_data(mut data: GlucoseData) -> GlucoseData {
    sort_chronologically(&mut data.measurements);
    sort_chronologically(&mut data.ingestions);
    data
}

/// Whether `series` is already in non-decreasing timestamp order.
pub fn is_chronological<T: Timestamped>(series: &[T]) -> bool {
    series
        .windows(2)
        .all(|pair| pair[0].timestamp() <= pair[1].timestamp())
}

/// Earliest and latest timestamp of a series, or `None` when empty.
pub fn time_span<T: Timestamped>(series: &[T]) -> Option<(NaiveDateTime, NaiveDateTime)> {
    series.iter().map(|record| record.timestamp()).fold(None, |span, ts| {
        Some(match span {
            None => (ts, ts),
            Some((lo, hi)) => (lo.min(ts), hi.max(ts)),
        })
    })
}

/// Arithmetic mean of the glucose values, or `None` when empty.
pub fn mean_value(measurements: &[Measurement]) -> Option<f64> {
    if measurements.is_empty() {
        return None;
    }
    let sum: f64 = measurements.iter().map(|m| m.value).sum();
    Some(sum / measurements.len() as f64)
}

/// Smallest and largest glucose value, or `None` when empty.
pub fn value_range(measurements: &[Measurement]) -> Option<(f64, f64)> {
    measurements.iter().map(|m| m.value).fold(None, |range, v| {
        Some(match range {
            None => (v, v),
            Some((lo, hi)) => (lo.min(v), hi.max(v)),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::IngestionEvent;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn m(h: u32, min: u32, value: f64) -> Measurement {
        Measurement {
            timestamp: at(h, min),
            value,
        }
    }

    #[test]
    fn test_sort_orders_by_timestamp_keeping_pairs() {
        let mut series = vec![m(8, 0, 5.5), m(9, 0, 6.2), m(7, 0, 4.9)];
        sort_chronologically(&mut series);
        assert_eq!(series, vec![m(7, 0, 4.9), m(8, 0, 5.5), m(9, 0, 6.2)]);
    }

    #[test]
    fn test_sort_is_idempotent() {
        let mut series = vec![m(10, 0, 7.0), m(8, 0, 5.5), m(9, 30, 6.0), m(8, 0, 5.1)];
        sort_chronologically(&mut series);
        let once = series.clone();
        sort_chronologically(&mut series);
        assert_eq!(series, once);
        assert!(is_chronological(&series));
    }

    #[test]
    fn test_sort_same_result_for_every_permutation() {
        let base = [m(7, 0, 4.9), m(8, 0, 5.5), m(9, 0, 6.2), m(10, 0, 7.1)];
        let expected = base.to_vec();

        // Heap's algorithm over all 24 orderings.
        fn permutations(items: &mut Vec<Measurement>, k: usize, out: &mut Vec<Vec<Measurement>>) {
            if k == 1 {
                out.push(items.clone());
                return;
            }
            permutations(items, k - 1, out);
            for i in 0..k - 1 {
                if k % 2 == 0 {
                    items.swap(i, k - 1);
                } else {
                    items.swap(0, k - 1);
                }
                permutations(items, k - 1, out);
            }
        }
        let mut all = Vec::new();
        let mut items = base.to_vec();
        permutations(&mut items, base.len(), &mut all);
        assert_eq!(all.len(), 24);

        for mut perm in all {
            sort_chronologically(&mut perm);
            assert_eq!(perm, expected);
        }
    }

    #[test]
    fn test_sort_equal_timestamps_keep_input_order() {
        let mut series = vec![m(9, 0, 6.0), m(8, 0, 9.9), m(8, 0, 1.1)];
        sort_chronologically(&mut series);
        assert_eq!(series, vec![m(8, 0, 9.9), m(8, 0, 1.1), m(9, 0, 6.0)]);
    }

    #[test]
    fn test_sort_empty_series() {
        let mut series: Vec<Measurement> = Vec::new();
        sort_chronologically(&mut series);
        assert!(series.is_empty());
        assert!(is_chronological(&series));
        assert_eq!(time_span(&series), None);
        assert_eq!(mean_value(&series), None);
        assert_eq!(value_range(&series), None);
    }

    #[test]
    fn test_sort_data_sorts_both_series() {
        let data = GlucoseData {
            measurements: vec![m(9, 0, 6.2), m(8, 0, 5.5)],
            ingestions: vec![
                IngestionEvent {
                    timestamp: at(12, 0),
                    amount: 75.0,
                },
                IngestionEvent {
                    timestamp: at(8, 30),
                    amount: 40.0,
                },
            ],
        };
        let sorted = sort_data(data);
        assert!(is_chronological(&sorted.measurements));
        assert!(is_chronological(&sorted.ingestions));
        assert_eq!(sorted.ingestions[0].amount, 40.0);
    }

    #[test]
    fn test_statistics() {
        let series = vec![m(9, 0, 6.0), m(7, 0, 4.0), m(8, 0, 8.0)];
        assert_eq!(time_span(&series), Some((at(7, 0), at(9, 0))));
        assert_eq!(value_range(&series), Some((4.0, 8.0)));
        assert_eq!(mean_value(&series), Some(6.0));
    }
}
