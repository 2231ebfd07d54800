#[cfg(test)]
mod tests {
    use crate::aggregate::*;
    use crate::features::RATE_EPSILON;
    use chrono::{NaiveDate, NaiveDateTime};
    use common::models::CommitRecord;

    const REPO_A: &str = "https://github.com/org/a";
    const REPO_B: &str = "https://github.com/org/b";

    fn at(month: u32, day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, month, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn make_commit(url: &str, dev: &str, date: NaiveDateTime, churn: u64) -> CommitRecord {
        CommitRecord {
            project_url: url.to_string(),
            developer: dev.to_string(),
            commit_hash: format!("{}-{}-{}", dev, date.and_utc().timestamp(), churn),
            commit_date: date,
            churn,
            dmm_unit_size: None,
            dmm_unit_complexity: None,
            dmm_unit_interfacing: None,
        }
    }

    // month_start tests
    #[test]
    fn test_month_start_truncates_to_first_midnight() {
        let ts = NaiveDate::from_ymd_opt(2024, 2, 29)
            .unwrap()
            .and_hms_opt(23, 59, 59)
            .unwrap();
        assert_eq!(month_start(ts), at(2, 1, 0));
    }

    // commit_gaps tests
    #[test]
    fn test_first_commit_gap_is_zero() {
        let records = vec![make_commit(REPO_A, "alice", at(1, 10, 9), 10)];
        let timed = commit_gaps(&records);
        assert_eq!(timed.len(), 1);
        assert_eq!(timed[0].time_since_last_h, 0.0);
    }

    #[test]
    fn test_gap_five_hours_apart() {
        let records = vec![
            make_commit(REPO_A, "alice", at(1, 10, 9), 10),
            make_commit(REPO_A, "alice", at(1, 10, 14), 10),
        ];
        let timed = commit_gaps(&records);
        assert_eq!(timed[0].time_since_last_h, 0.0);
        assert_eq!(timed[1].time_since_last_h, 5.0);
    }

    #[test]
    fn test_gaps_resorted_from_traversal_order() {
        // Newest first, as some miners produce them
        let records = vec![
            make_commit(REPO_A, "alice", at(1, 12, 9), 1),
            make_commit(REPO_A, "alice", at(1, 11, 9), 1),
            make_commit(REPO_A, "alice", at(1, 10, 9), 1),
        ];
        let gaps: Vec<f64> = commit_gaps(&records)
            .iter()
            .map(|t| t.time_since_last_h)
            .collect();
        assert_eq!(gaps, vec![0.0, 24.0, 24.0]);
    }

    #[test]
    fn test_gaps_do_not_cross_developers_or_projects() {
        let records = vec![
            make_commit(REPO_A, "alice", at(1, 10, 9), 1),
            make_commit(REPO_A, "bob", at(1, 10, 10), 1),
            make_commit(REPO_B, "alice", at(1, 10, 11), 1),
        ];
        assert!(commit_gaps(&records)
            .iter()
            .all(|t| t.time_since_last_h == 0.0));
    }

    // aggregate_monthly tests
    #[test]
    fn test_months_without_commits_have_no_rows() {
        let records = vec![
            make_commit(REPO_A, "alice", at(1, 5, 9), 10),
            make_commit(REPO_A, "alice", at(3, 5, 9), 10),
        ];

        let aggs = aggregate_monthly(&records);

        assert_eq!(aggs.len(), 2);
        assert_eq!(aggs[0].month, at(1, 1, 0));
        assert_eq!(aggs[1].month, at(3, 1, 0));
    }

    #[test]
    fn test_bucket_counts_and_sums() {
        let records = vec![
            make_commit(REPO_A, "alice", at(1, 1, 8), 10),
            make_commit(REPO_A, "alice", at(1, 1, 13), 20),
            make_commit(REPO_A, "bob", at(1, 2, 8), 30),
        ];

        let aggs = aggregate_monthly(&records);

        assert_eq!(aggs.len(), 1);
        let a = &aggs[0];
        assert_eq!(a.churn_sum, 60);
        assert_eq!(a.commit_count, 3);
        assert_eq!(a.dev_count, 2);
        assert_eq!(a.sum_interval_h, 5.0);
        assert_eq!(a.churn_per_dev, 30.0);
        assert!((a.commit_rate - 3.0 / (5.0 + RATE_EPSILON)).abs() < 1e-12);
    }

    #[test]
    fn test_gap_attributed_to_later_month() {
        let records = vec![
            make_commit(REPO_A, "alice", at(1, 31, 20), 1),
            make_commit(REPO_A, "alice", at(2, 1, 8), 1),
        ];

        let aggs = aggregate_monthly(&records);

        assert_eq!(aggs.len(), 2);
        assert_eq!(aggs[0].sum_interval_h, 0.0);
        assert_eq!(aggs[1].sum_interval_h, 12.0);
    }

    #[test]
    fn test_rows_ordered_by_project_then_month() {
        let records = vec![
            make_commit(REPO_B, "carol", at(2, 1, 8), 1),
            make_commit(REPO_A, "alice", at(3, 1, 8), 1),
            make_commit(REPO_B, "carol", at(1, 1, 8), 1),
            make_commit(REPO_A, "alice", at(1, 1, 8), 1),
        ];

        let keys: Vec<(String, NaiveDateTime)> = aggregate_monthly(&records)
            .into_iter()
            .map(|a| (a.project_url, a.month))
            .collect();

        assert_eq!(
            keys,
            vec![
                (REPO_A.to_string(), at(1, 1, 0)),
                (REPO_A.to_string(), at(3, 1, 0)),
                (REPO_B.to_string(), at(1, 1, 0)),
                (REPO_B.to_string(), at(2, 1, 0)),
            ]
        );
    }

    #[test]
    fn test_every_row_has_commits_and_developers() {
        let records = vec![
            make_commit(REPO_A, "alice", at(1, 1, 8), 0),
            make_commit(REPO_B, "bob", at(5, 1, 8), 0),
        ];
        for a in aggregate_monthly(&records) {
            assert!(a.commit_count >= 1);
            assert!(a.dev_count >= 1);
        }
    }

    #[test]
    fn test_empty_input_has_no_rows() {
        assert!(aggregate_monthly(&[]).is_empty());
    }
}
