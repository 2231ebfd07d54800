//! Two-stage feature scaling
//!
//! Stage A fits one robust scaler over every aggregate of every project.
//! Stage B then min-max rescales each feature to [0, 1] inside each project.
//! The stages are separate functions so either can be exercised alone.

use std::collections::BTreeMap;

use common::models::{
    FeatureVector, MonthlyAggregate, ScaledAggregate, FEATURE_COUNT, FEATURE_NAMES,
};
use tracing::debug;

/// Scale used for a feature whose inter-quartile range is zero
pub const ROBUST_SCALE_FLOOR: f64 = 1.0;

/// Value assigned when every value in a min-max group is equal
pub const CONSTANT_GROUP_VALUE: f64 = 0.0;

/// Median-centered, IQR-scaled transform fitted per feature
#[derive(Debug, Clone, PartialEq)]
pub struct RobustScaler {
    pub center: [f64; FEATURE_COUNT],
    pub scale: [f64; FEATURE_COUNT],
}

impl RobustScaler {
    pub fn fit(rows: &[FeatureVector]) -> Self {
        let mut center = [0.0; FEATURE_COUNT];
        let mut scale = [ROBUST_SCALE_FLOOR; FEATURE_COUNT];

        for (i, name) in FEATURE_NAMES.iter().enumerate() {
            let mut column: Vec<f64> = rows.iter().map(|r| r.to_array()[i]).collect();
            if column.is_empty() {
                continue;
            }
            column.sort_by(|a, b| a.total_cmp(b));

            center[i] = quantile(&column, 0.5);
            let iqr = quantile(&column, 0.75) - quantile(&column, 0.25);
            if iqr < f64::EPSILON {
                debug!("Feature {} has zero IQR, using scale {}", name, ROBUST_SCALE_FLOOR);
            } else {
                scale[i] = iqr;
            }
        }

        Self { center, scale }
    }

    pub fn transform(&self, row: FeatureVector) -> FeatureVector {
        let mut values = row.to_array();
        for (i, v) in values.iter_mut().enumerate() {
            *v = (*v - self.center[i]) / self.scale[i];
        }
        FeatureVector::from_array(values)
    }
}

/// Linear-interpolated quantile of an ascending, non-empty slice
pub fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

/// Maps the observed [min, max] of one column onto [0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinMaxScaler {
    pub min: f64,
    pub max: f64,
}

impl MinMaxScaler {
    pub fn fit(values: &[f64]) -> Self {
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Self { min, max }
    }

    pub fn transform(&self, value: f64) -> f64 {
        let range = self.max - self.min;
        if range.is_nan() || range < f64::EPSILON {
            return CONSTANT_GROUP_VALUE;
        }
        (value - self.min) / range
    }
}

/// Row indices grouped by project, in project order
pub fn project_groups<'a, T>(
    rows: &'a [T],
    project: impl Fn(&'a T) -> &'a str,
) -> BTreeMap<&'a str, Vec<usize>> {
    let mut groups: BTreeMap<&'a str, Vec<usize>> = BTreeMap::new();
    for (i, row) in rows.iter().enumerate() {
        groups.entry(project(row)).or_default().push(i);
    }
    groups
}

/// Stage A: fit one robust scaler over all rows and apply it to each
pub fn robust_stage(aggregates: &[MonthlyAggregate]) -> (Vec<ScaledAggregate>, RobustScaler) {
    let features: Vec<FeatureVector> = aggregates.iter().map(|a| a.features()).collect();
    let scaler = RobustScaler::fit(&features);

    let scaled = aggregates
        .iter()
        .zip(features)
        .map(|(agg, f)| ScaledAggregate {
            project_url: agg.project_url.clone(),
            month: agg.month,
            sum_interval_h: agg.sum_interval_h,
            features: scaler.transform(f),
        })
        .collect();

    (scaled, scaler)
}

/// Stage B: min-max rescale every feature within each project
pub fn per_project_min_max(rows: Vec<ScaledAggregate>) -> Vec<ScaledAggregate> {
    let mut values: Vec<[f64; FEATURE_COUNT]> = rows.iter().map(|r| r.features.to_array()).collect();

    for indices in project_groups(&rows, |r| r.project_url.as_str()).values() {
        for feature in 0..FEATURE_COUNT {
            let column: Vec<f64> = indices.iter().map(|&i| values[i][feature]).collect();
            let scaler = MinMaxScaler::fit(&column);
            for &i in indices {
                values[i][feature] = scaler.transform(values[i][feature]);
            }
        }
    }

    rows.into_iter()
        .zip(values)
        .map(|(row, v)| ScaledAggregate {
            features: FeatureVector::from_array(v),
            ..row
        })
        .collect()
}

/// Run both scaling stages
pub fn scale_features(aggregates: &[MonthlyAggregate]) -> Vec<ScaledAggregate> {
    let (robust, _) = robust_stage(aggregates);
    per_project_min_max(robust)
}
