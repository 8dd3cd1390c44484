//! Nearest-index search over coordinate axes
//!
//! Selection is by absolute difference with a stable tie-break: when several
//! axis values are equally close, the first one wins. Non-finite axis values
//! are never selected.

use crate::errors::{Result, TerraGridError};
use ndarray::ArrayView1;
use std::ops::Range;

/// Index of the axis value closest to `target`, or `None` if the axis has no
/// finite values or `target` itself is not finite.
pub fn nearest_index(axis: ArrayView1<'_, f64>, target: f64) -> Option<usize> {
    if !target.is_finite() {
        return None;
    }
    let mut best: Option<(usize, f64)> = None;
    for (idx, &value) in axis.iter().enumerate() {
        if !value.is_finite() {
            continue;
        }
        let distance = (value - target).abs();
        match best {
            // strict comparison keeps the earliest index on ties
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((idx, distance)),
        }
    }
    best.map(|(idx, _)| idx)
}

/// Like [`nearest_index`], but reports a non-finite target or an empty axis as an error
pub fn require_nearest_index(axis: ArrayView1<'_, f64>, target: f64, name: &str) -> Result<usize> {
    if !target.is_finite() {
        return Err(TerraGridError::InvalidCoordinate {
            axis: name.to_string(),
            value: target,
        });
    }
    nearest_index(axis, target).ok_or_else(|| TerraGridError::EmptyAxis {
        axis: name.to_string(),
    })
}

/// Contiguous, inclusive span of time-axis indices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeIndexRange {
    pub start: usize,
    pub end: usize,
}

impl TimeIndexRange {
    /// Find the indices closest to the two offsets on the time axis
    pub fn locate(time_axis: ArrayView1<'_, f64>, start_offset: f64, end_offset: f64) -> Result<Self> {
        let start = require_nearest_index(time_axis, start_offset, "time")?;
        let end = require_nearest_index(time_axis, end_offset, "time")?;
        if end < start {
            return Err(TerraGridError::InvalidTimeRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Number of time steps, both ends included
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    /// Half-open form for slicing
    pub fn as_range(&self) -> Range<usize> {
        self.start..self.end + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{arr1, Array1};

    #[test]
    fn test_exact_match_is_selected() {
        let axis = Array1::linspace(-90.0, 90.0, 181);
        for (idx, &value) in axis.iter().enumerate() {
            assert_eq!(nearest_index(axis.view(), value), Some(idx));
        }
    }

    #[test]
    fn test_ties_pick_first_index() {
        let axis = arr1(&[0.0, 1.0, 2.0]);
        assert_eq!(nearest_index(axis.view(), 0.5), Some(0));
        assert_eq!(nearest_index(axis.view(), 1.5), Some(1));

        let duplicated = arr1(&[5.0, 3.0, 3.0]);
        assert_eq!(nearest_index(duplicated.view(), 3.0), Some(1));
    }

    #[test]
    fn test_descending_axis() {
        // TerraClimate latitudes run north to south
        let axis = arr1(&[89.9792, 89.9375, 89.8958, 89.8542]);
        assert_eq!(nearest_index(axis.view(), 89.9), Some(2));
        assert_eq!(nearest_index(axis.view(), 100.0), Some(0));
        assert_eq!(nearest_index(axis.view(), -100.0), Some(3));
    }

    #[test]
    fn test_non_finite_values_are_skipped() {
        let axis = arr1(&[f64::NAN, 10.0, f64::INFINITY]);
        assert_eq!(nearest_index(axis.view(), 1000.0), Some(1));

        let empty: Array1<f64> = arr1(&[]);
        assert_eq!(nearest_index(empty.view(), 0.0), None);
        assert!(require_nearest_index(empty.view(), 0.0, "lat").is_err());
    }

    #[test]
    fn test_non_finite_target_is_rejected() {
        let axis = arr1(&[10.0, 12.5, 15.0]);
        assert_eq!(nearest_index(axis.view(), f64::NAN), None);
        assert_eq!(nearest_index(axis.view(), f64::NEG_INFINITY), None);
        assert!(matches!(
            require_nearest_index(axis.view(), f64::NAN, "lon"),
            Err(TerraGridError::InvalidCoordinate { .. })
        ));
    }

    #[test]
    fn test_time_index_range() {
        let time = arr1(&[0.0, 31.0, 59.0, 90.0, 120.0]);
        let range = TimeIndexRange::locate(time.view(), 31.0, 90.0).unwrap();
        assert_eq!(range, TimeIndexRange { start: 1, end: 3 });
        assert_eq!(range.len(), 3);
        assert_eq!(range.as_range(), 1..4);

        let single = TimeIndexRange::locate(time.view(), 60.0, 60.0).unwrap();
        assert_eq!(single.len(), 1);
    }

    #[test]
    fn test_time_index_range_rejects_reversed_offsets() {
        let time = arr1(&[0.0, 31.0, 59.0]);
        let result = TimeIndexRange::locate(time.view(), 59.0, 0.0);
        assert!(matches!(
            result,
            Err(TerraGridError::InvalidTimeRange { start: 2, end: 0 })
        ));
    }
}
