//! Domain models
//!
//! Each pipeline stage consumes one of these shapes and emits the next:
//! `CommitRecord` -> `MonthlyAggregate` -> `ScaledAggregate` -> `ScoredAggregate`.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Developer identity used when a commit carries neither email nor name
pub const UNKNOWN_DEVELOPER: &str = "<unknown>";

/// Names of the five numeric features, in column order
pub const FEATURE_NAMES: [&str; 5] = [
    "churn_sum",
    "commit_count",
    "dev_count",
    "churn_per_dev",
    "commit_rate",
];

/// Number of numeric features carried through scaling and reduction
pub const FEATURE_COUNT: usize = FEATURE_NAMES.len();

/// One mined commit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitRecord {
    #[serde(alias = "url")]
    pub project_url: String,
    pub developer: String,
    pub commit_hash: String,
    /// Committer date, UTC wall-clock without offset
    pub commit_date: NaiveDateTime,
    /// Added plus removed lines
    pub churn: u64,
    #[serde(default)]
    pub dmm_unit_size: Option<f64>,
    #[serde(default)]
    pub dmm_unit_complexity: Option<f64>,
    #[serde(default)]
    pub dmm_unit_interfacing: Option<f64>,
}

/// Resolve the canonical developer identity: email, then name, then a sentinel
pub fn developer_identity(email: Option<&str>, name: Option<&str>) -> String {
    [email, name]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|s| !s.is_empty())
        .unwrap_or(UNKNOWN_DEVELOPER)
        .to_string()
}

/// One (project, calendar month) bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyAggregate {
    pub project_url: String,
    /// First instant of the month
    pub month: NaiveDateTime,
    pub churn_sum: u64,
    pub commit_count: u64,
    pub dev_count: u64,
    /// Sum of per-developer gaps (hours) attributed to commits in this month
    pub sum_interval_h: f64,
    pub churn_per_dev: f64,
    pub commit_rate: f64,
}

impl MonthlyAggregate {
    /// The five numeric features in `FEATURE_NAMES` order
    pub fn features(&self) -> FeatureVector {
        FeatureVector {
            churn_sum: self.churn_sum as f64,
            commit_count: self.commit_count as f64,
            dev_count: self.dev_count as f64,
            churn_per_dev: self.churn_per_dev,
            commit_rate: self.commit_rate,
        }
    }
}

/// The five numeric features of an aggregate row
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FeatureVector {
    pub churn_sum: f64,
    pub commit_count: f64,
    pub dev_count: f64,
    pub churn_per_dev: f64,
    pub commit_rate: f64,
}

impl FeatureVector {
    pub fn to_array(self) -> [f64; FEATURE_COUNT] {
        [
            self.churn_sum,
            self.commit_count,
            self.dev_count,
            self.churn_per_dev,
            self.commit_rate,
        ]
    }

    pub fn from_array(values: [f64; FEATURE_COUNT]) -> Self {
        let [churn_sum, commit_count, dev_count, churn_per_dev, commit_rate] = values;
        Self {
            churn_sum,
            commit_count,
            dev_count,
            churn_per_dev,
            commit_rate,
        }
    }
}

/// A monthly aggregate whose features went through robust then per-project min-max scaling
#[derive(Debug, Clone, PartialEq)]
pub struct ScaledAggregate {
    pub project_url: String,
    pub month: NaiveDateTime,
    /// Raw value, not part of the scaled feature set
    pub sum_interval_h: f64,
    pub features: FeatureVector,
}

/// Final output row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredAggregate {
    pub project_url: String,
    pub month: NaiveDateTime,
    pub churn_sum: f64,
    pub commit_count: f64,
    pub dev_count: f64,
    pub sum_interval_h: f64,
    pub churn_per_dev: f64,
    pub commit_rate: f64,
    /// Projection onto the first principal component
    pub eng_raw: f64,
    /// `eng_raw` min-max rescaled within the project
    pub engagement_score: f64,
}

impl ScoredAggregate {
    pub fn new(scaled: ScaledAggregate, eng_raw: f64, engagement_score: f64) -> Self {
        let f = scaled.features;
        Self {
            project_url: scaled.project_url,
            month: scaled.month,
            churn_sum: f.churn_sum,
            commit_count: f.commit_count,
            dev_count: f.dev_count,
            sum_interval_h: scaled.sum_interval_h,
            churn_per_dev: f.churn_per_dev,
            commit_rate: f.commit_rate,
            eng_raw,
            engagement_score,
        }
    }
}
