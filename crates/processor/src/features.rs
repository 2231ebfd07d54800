//! Ratio features derived from a monthly bucket

/// Added to the interval sum so a month of first-ever commits has a finite rate
pub const RATE_EPSILON: f64 = 1e-6;

/// Churn per distinct developer; `dev_count` is at least 1 for emitted buckets
pub fn churn_per_dev(churn_sum: u64, dev_count: u64) -> f64 {
    churn_sum as f64 / dev_count.max(1) as f64
}

/// Commits per hour of developer gap time
pub fn commit_rate(commit_count: u64, sum_interval_h: f64) -> f64 {
    commit_count as f64 / (sum_interval_h + RATE_EPSILON)
}
