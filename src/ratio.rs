// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use log::warn;
use thiserror::Error;

use crate::dataset::Dataset;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RatioError {
    #[error("datasets have different lengths: {left} records vs {right}")]
    LengthMismatch { left: usize, right: usize },
}

/// Division that substitutes NaN for an exactly-zero denominator instead
/// of producing an infinity or a panic. NaN values plot as gaps.
pub fn safe_div(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        f64::NAN
    } else {
        numerator / denominator
    }
}

/// Computes the per-record ratio of average measurements between two
/// datasets, pairing records positionally. The datasets must have the
/// same number of records; records whose sizes disagree are still paired
/// but reported, since a comparison across different test sizes is
/// usually an input mistake.
pub fn ratio_series(dataset1: &Dataset, dataset2: &Dataset) -> Result<Vec<f64>, RatioError> {
    if dataset1.len() != dataset2.len() {
        return Err(RatioError::LengthMismatch {
            left: dataset1.len(),
            right: dataset2.len(),
        });
    }

    let mut series = Vec::with_capacity(dataset1.len());
    let mut undefined = 0;

    for (record1, record2) in dataset1.records().iter().zip(dataset2.records()) {
        if record1.size != record2.size {
            warn!(
                "paired records have different sizes: {} vs {}",
                record1.size, record2.size
            );
        }
        let ratio = safe_div(record1.average, record2.average);
        if ratio.is_nan() {
            undefined += 1;
        }
        series.push(ratio);
    }

    if undefined > 0 {
        warn!(
            "{} of {} ratios had a zero denominator and were left undefined",
            undefined,
            series.len()
        );
    }

    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Dataset;

    fn dataset(input: &'static str) -> Dataset {
        Dataset::from_reader(input.as_bytes(), "test.txt").unwrap()
    }

    #[test]
    fn safe_div_by_zero_is_nan() {
        assert!(safe_div(1.0, 0.0).is_nan());
        assert!(safe_div(0.0, 0.0).is_nan());
        assert!(safe_div(-7.5, 0.0).is_nan());
        assert!(safe_div(f64::INFINITY, 0.0).is_nan());
    }

    #[test]
    fn safe_div_matches_division() {
        assert_eq!(safe_div(1.0, 2.0), 0.5);
        assert_eq!(safe_div(-3.0, 2.0), -1.5);
        assert_eq!(safe_div(0.0, 4.0), 0.0);
    }

    #[test]
    fn ratio_of_averages() {
        let d1 = dataset("10 1.0 3.0\n20 2.0 2.0\n");
        let d2 = dataset("10 2.0 2.0\n20 4.0 4.0\n");
        assert_eq!(ratio_series(&d1, &d2).unwrap(), vec![1.0, 0.5]);
    }

    #[test]
    fn zero_denominator_is_undefined_not_fatal() {
        let d1 = dataset("10 1.0 3.0\n20 2.0 2.0\n");
        let d2 = dataset("10 0.0 0.0\n20 4.0 4.0\n");
        let series = ratio_series(&d1, &d2).unwrap();
        assert_eq!(series.len(), 2);
        assert!(series[0].is_nan());
        assert_eq!(series[1], 0.5);
    }

    #[test]
    fn length_mismatch_is_an_error() {
        let d1 = dataset("10 1.0\n20 2.0\n");
        let d2 = dataset("10 1.0\n");
        assert_eq!(
            ratio_series(&d1, &d2).unwrap_err(),
            RatioError::LengthMismatch { left: 2, right: 1 }
        );
    }

    #[test]
    fn size_mismatch_pairs_positionally() {
        let d1 = dataset("10 2.0\n");
        let d2 = dataset("30 4.0\n");
        assert_eq!(ratio_series(&d1, &d2).unwrap(), vec![0.5]);
    }

    #[test]
    fn empty_datasets_produce_empty_series() {
        let d1 = dataset("");
        let d2 = dataset("");
        assert!(ratio_series(&d1, &d2).unwrap().is_empty());
    }
}
