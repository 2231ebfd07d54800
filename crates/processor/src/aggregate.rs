//! Monthly aggregation of commit history

use std::collections::{BTreeMap, HashSet};

use chrono::{Datelike, NaiveDateTime, NaiveTime};
use common::models::{CommitRecord, MonthlyAggregate};

use crate::features;

/// A commit together with the hours since the same developer's previous
/// commit to the same project (0 for their first one)
#[derive(Debug, Clone, Copy)]
pub struct TimedCommit<'a> {
    pub commit: &'a CommitRecord,
    pub time_since_last_h: f64,
}

#[derive(Default)]
struct Bucket<'a> {
    churn_sum: u64,
    commit_count: u64,
    developers: HashSet<&'a str>,
    sum_interval_h: f64,
}

/// Truncate a timestamp to midnight on the first day of its month
pub fn month_start(ts: NaiveDateTime) -> NaiveDateTime {
    let date = ts.date();
    date.with_day(1).unwrap_or(date).and_time(NaiveTime::MIN)
}

/// Sort commits by (project, developer, date) and compute per-developer gaps.
///
/// The sort is stable, so commits sharing a timestamp keep their input order.
pub fn commit_gaps(records: &[CommitRecord]) -> Vec<TimedCommit<'_>> {
    let mut sorted: Vec<&CommitRecord> = records.iter().collect();
    sorted.sort_by(|a, b| {
        (a.project_url.as_str(), a.developer.as_str(), a.commit_date).cmp(&(
            b.project_url.as_str(),
            b.developer.as_str(),
            b.commit_date,
        ))
    });

    let mut timed = Vec::with_capacity(sorted.len());
    let mut previous: Option<&CommitRecord> = None;

    for commit in sorted {
        let time_since_last_h = match previous {
            Some(prev)
                if prev.project_url == commit.project_url && prev.developer == commit.developer =>
            {
                (commit.commit_date - prev.commit_date).num_milliseconds() as f64 / 3_600_000.0
            }
            _ => 0.0,
        };
        timed.push(TimedCommit {
            commit,
            time_since_last_h,
        });
        previous = Some(commit);
    }

    timed
}

/// Reduce commits to one aggregate per (project, month) that has commits.
///
/// Output is ordered by project, then month. Each gap counts toward the month
/// of the later commit.
pub fn aggregate_monthly(records: &[CommitRecord]) -> Vec<MonthlyAggregate> {
    let mut buckets: BTreeMap<(&str, NaiveDateTime), Bucket<'_>> = BTreeMap::new();

    for timed in commit_gaps(records) {
        let commit = timed.commit;
        let bucket = buckets
            .entry((commit.project_url.as_str(), month_start(commit.commit_date)))
            .or_default();

        bucket.churn_sum += commit.churn;
        bucket.commit_count += 1;
        bucket.developers.insert(commit.developer.as_str());
        bucket.sum_interval_h += timed.time_since_last_h;
    }

    buckets
        .into_iter()
        .map(|((project_url, month), bucket)| {
            let dev_count = bucket.developers.len() as u64;
            MonthlyAggregate {
                project_url: project_url.to_string(),
                month,
                churn_sum: bucket.churn_sum,
                commit_count: bucket.commit_count,
                dev_count,
                sum_interval_h: bucket.sum_interval_h,
                churn_per_dev: features::churn_per_dev(bucket.churn_sum, dev_count),
                commit_rate: features::commit_rate(bucket.commit_count, bucket.sum_interval_h),
            }
        })
        .collect()
}
