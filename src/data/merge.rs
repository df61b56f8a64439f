//! Pairing measurements with their anomaly flags.
//!
//! Pairing is positional: the flag at index `i` decides sample `i`. The
//! measurement order is kept exactly as delivered.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

use super::model::{DataPoint, DisplaySeries};
use crate::source::{AnomalyFlag, RawPoint};

/// What to do when the backend sends fewer flags than measurements.
///
/// Surplus flags are ignored under either policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlagPolicy {
    /// Samples without a flag are treated as normal.
    #[default]
    Clamp,
    /// The merge fails and the previous series stays on screen.
    Strict,
}

impl FlagPolicy {
    pub fn label(&self) -> &'static str {
        match self {
            FlagPolicy::Clamp => "clamp",
            FlagPolicy::Strict => "strict",
        }
    }
}

impl fmt::Display for FlagPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for FlagPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "clamp" => Ok(FlagPolicy::Clamp),
            "strict" => Ok(FlagPolicy::Strict),
            other => Err(format!("unknown flag policy '{}' (expected clamp or strict)", other)),
        }
    }
}

/// Failure to build a series from one data response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MergeError {
    #[error("{flags} anomaly flags for {points} data points")]
    MissingFlags { points: usize, flags: usize },
}

/// Combine a measurement sequence with its parallel flag sequence.
///
/// The result has exactly one record per measurement, in input order.
pub fn merge(
    points: Vec<RawPoint>,
    flags: &[AnomalyFlag],
    policy: FlagPolicy,
) -> Result<DisplaySeries, MergeError> {
    if policy == FlagPolicy::Strict && flags.len() < points.len() {
        return Err(MergeError::MissingFlags {
            points: points.len(),
            flags: flags.len(),
        });
    }

    let merged = points
        .into_iter()
        .enumerate()
        .map(|(index, raw)| {
            let anomaly = flags.get(index).is_some_and(AnomalyFlag::is_anomalous);
            DataPoint {
                datetime: raw.datetime,
                current: raw.current,
                anomaly,
            }
        })
        .collect();

    Ok(DisplaySeries::new(merged))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(n: usize) -> Vec<RawPoint> {
        (0..n).map(|i| RawPoint::new(format!("t{}", i), 0.3 + i as f64 * 0.1)).collect()
    }

    fn flags(codes: &[i64]) -> Vec<AnomalyFlag> {
        codes.iter().copied().map(AnomalyFlag::from).collect()
    }

    #[test]
    fn test_single_anomalous_point() {
        let series = merge(vec![RawPoint::new("t1", 1.0)], &flags(&[1]), FlagPolicy::Clamp).unwrap();
        assert_eq!(series.points(), &[DataPoint::new("t1", 1.0, true)]);
    }

    #[test]
    fn test_single_normal_point() {
        let series = merge(vec![RawPoint::new("t1", 1.0)], &flags(&[0]), FlagPolicy::Clamp).unwrap();
        assert_eq!(series.points(), &[DataPoint::new("t1", 1.0, false)]);
    }

    #[test]
    fn test_equal_length_follows_flags_by_index() {
        let codes = [0, 1, 1, 0, 2, 1, 0, -1];
        for policy in [FlagPolicy::Clamp, FlagPolicy::Strict] {
            let series = merge(raw(codes.len()), &flags(&codes), policy).unwrap();
            assert_eq!(series.len(), codes.len());
            for (i, code) in codes.iter().enumerate() {
                assert_eq!(series.get(i).unwrap().anomaly, *code == 1, "index {}", i);
                assert_eq!(series.get(i).unwrap().datetime, format!("t{}", i));
            }
        }
    }

    #[test]
    fn test_input_order_is_preserved() {
        let points = vec![
            RawPoint::new("2024-01-01 10:05", 1.0),
            RawPoint::new("2024-01-01 10:01", 0.9),
            RawPoint::new("2024-01-01 10:05", 1.1),
        ];
        let series = merge(points, &flags(&[0, 0, 0]), FlagPolicy::Clamp).unwrap();
        let stamps: Vec<&str> = series.iter().map(|p| p.datetime.as_str()).collect();
        assert_eq!(stamps, vec!["2024-01-01 10:05", "2024-01-01 10:01", "2024-01-01 10:05"]);
    }

    #[test]
    fn test_out_of_domain_value_is_kept() {
        let series = merge(vec![RawPoint::new("t1", 2.0)], &flags(&[0]), FlagPolicy::Clamp).unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series.get(0).unwrap().current, 2.0);
    }

    #[test]
    fn test_clamp_treats_missing_flags_as_normal() {
        let first = merge(raw(4), &flags(&[1, 1]), FlagPolicy::Clamp).unwrap();
        let anomalies: Vec<bool> = first.iter().map(|p| p.anomaly).collect();
        assert_eq!(anomalies, vec![true, true, false, false]);

        let second = merge(raw(4), &flags(&[1, 1]), FlagPolicy::Clamp).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_strict_rejects_missing_flags() {
        let err = merge(raw(3), &flags(&[0]), FlagPolicy::Strict).unwrap_err();
        assert_eq!(err, MergeError::MissingFlags { points: 3, flags: 1 });

        let again = merge(raw(3), &flags(&[0]), FlagPolicy::Strict).unwrap_err();
        assert_eq!(err, again);
    }

    #[test]
    fn test_surplus_flags_are_ignored() {
        for policy in [FlagPolicy::Clamp, FlagPolicy::Strict] {
            let series = merge(raw(2), &flags(&[0, 1, 1, 1]), policy).unwrap();
            assert_eq!(series.len(), 2);
            assert_eq!(series.anomaly_count(), 1);
        }
    }

    #[test]
    fn test_empty_inputs() {
        let series = merge(Vec::new(), &[], FlagPolicy::Strict).unwrap();
        assert!(series.is_empty());
    }

    #[test]
    fn test_parse_policy() {
        assert_eq!("clamp".parse::<FlagPolicy>(), Ok(FlagPolicy::Clamp));
        assert_eq!(" Strict ".parse::<FlagPolicy>(), Ok(FlagPolicy::Strict));
        assert!("lenient".parse::<FlagPolicy>().is_err());
    }
}
