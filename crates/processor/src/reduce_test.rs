#[cfg(test)]
mod tests {
    use crate::reduce::*;
    use crate::scaling::CONSTANT_GROUP_VALUE;
    use chrono::{NaiveDate, NaiveDateTime};
    use common::models::{FeatureVector, ScaledAggregate, FEATURE_COUNT};

    fn month(m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, m, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn make_row(url: &str, m: u32, values: [f64; FEATURE_COUNT]) -> ScaledAggregate {
        ScaledAggregate {
            project_url: url.to_string(),
            month: month(m),
            sum_interval_h: 1.0,
            features: FeatureVector::from_array(values),
        }
    }

    fn unit_norm(w: &[f64; FEATURE_COUNT]) -> f64 {
        w.iter().map(|x| x * x).sum::<f64>().sqrt()
    }

    // Pca::fit tests
    #[test]
    fn test_fit_empty_is_none() {
        assert!(Pca::fit(&[]).is_none());
    }

    #[test]
    fn test_component_follows_dominant_direction() {
        // All variance along (1, 2, 0, 0, 0)
        let rows: Vec<_> = (0..6)
            .map(|i| {
                let t = i as f64;
                FeatureVector::from_array([t, 2.0 * t, 0.5, 0.5, 0.5])
            })
            .collect();

        let pca = Pca::fit(&rows).unwrap();

        let expected = [1.0 / 5f64.sqrt(), 2.0 / 5f64.sqrt(), 0.0, 0.0, 0.0];
        for (w, e) in pca.weights.iter().zip(expected) {
            assert!((w - e).abs() < 1e-9, "weights {:?}", pca.weights);
        }
        assert!((pca.explained_variance_ratio - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_weights_are_unit_length_and_oriented_positive() {
        let rows = vec![
            FeatureVector::from_array([0.0, 1.0, 0.2, 0.9, 0.1]),
            FeatureVector::from_array([1.0, 0.0, 0.8, 0.3, 0.7]),
            FeatureVector::from_array([0.5, 0.4, 0.0, 1.0, 0.0]),
            FeatureVector::from_array([0.2, 0.7, 1.0, 0.0, 1.0]),
        ];

        let pca = Pca::fit(&rows).unwrap();

        assert!((unit_norm(&pca.weights) - 1.0).abs() < 1e-9);
        assert!(pca.weights.iter().sum::<f64>() > 0.0);
        assert!(pca.explained_variance_ratio > 0.0 && pca.explained_variance_ratio <= 1.0);
    }

    #[test]
    fn test_orientation_stable_under_negated_direction() {
        // Same line traversed in reverse must give the same weights
        let forward: Vec<_> = (0..5)
            .map(|i| FeatureVector::from_array([i as f64, i as f64, 0.0, 0.0, 0.0]))
            .collect();
        let backward: Vec<_> = forward.iter().rev().copied().collect();

        let a = Pca::fit(&forward).unwrap();
        let b = Pca::fit(&backward).unwrap();

        for (x, y) in a.weights.iter().zip(&b.weights) {
            assert!((x - y).abs() < 1e-9);
        }
        assert!(a.weights[0] > 0.0);
    }

    #[test]
    fn test_zero_variance_uses_uniform_weights() {
        let rows = vec![FeatureVector::from_array([0.3; FEATURE_COUNT]); 4];

        let pca = Pca::fit(&rows).unwrap();

        let w = 1.0 / (FEATURE_COUNT as f64).sqrt();
        assert_eq!(pca.weights, [w; FEATURE_COUNT]);
        assert_eq!(pca.explained_variance_ratio, 0.0);
        assert_eq!(pca.project(rows[0]), 0.0);
    }

    #[test]
    fn test_projection_is_centered() {
        let rows = vec![
            FeatureVector::from_array([0.0, 0.0, 1.0, 0.0, 0.0]),
            FeatureVector::from_array([1.0, 1.0, 0.0, 1.0, 1.0]),
            FeatureVector::from_array([0.5, 0.2, 0.4, 0.6, 0.9]),
        ];
        let pca = Pca::fit(&rows).unwrap();

        let total: f64 = rows.iter().map(|r| pca.project(*r)).sum();
        assert!(total.abs() < 1e-9);
    }

    #[test]
    fn test_weight_line_is_signed_and_aligned() {
        assert_eq!(weight_line("churn_sum", 0.5), "churn_sum      : +0.5000");
        assert_eq!(weight_line("commit_rate", -0.12345), "commit_rate    : -0.1235");
    }

    // score tests
    #[test]
    fn test_score_empty_is_none() {
        assert!(score(Vec::new()).is_none());
    }

    #[test]
    fn test_engagement_score_spans_unit_interval_per_project() {
        let rows = vec![
            make_row("a", 1, [0.0, 0.0, 0.0, 0.0, 0.0]),
            make_row("a", 2, [1.0, 1.0, 1.0, 1.0, 1.0]),
            make_row("a", 3, [0.5, 0.3, 0.9, 0.1, 0.4]),
            make_row("b", 1, [1.0, 0.0, 1.0, 0.0, 1.0]),
            make_row("b", 2, [0.0, 1.0, 0.0, 1.0, 0.0]),
        ];

        let (scored, _) = score(rows).unwrap();

        for project in ["a", "b"] {
            let values: Vec<f64> = scored
                .iter()
                .filter(|r| r.project_url == project)
                .map(|r| r.engagement_score)
                .collect();
            let min = values.iter().copied().fold(f64::INFINITY, f64::min);
            let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            assert_eq!(min, 0.0, "project {}", project);
            assert_eq!(max, 1.0, "project {}", project);
        }
    }

    #[test]
    fn test_higher_activity_scores_higher_within_project() {
        let rows = vec![
            make_row("a", 1, [0.0, 0.0, 0.0, 0.0, 0.0]),
            make_row("a", 2, [1.0, 1.0, 1.0, 1.0, 1.0]),
            make_row("a", 3, [0.5, 0.5, 0.5, 0.5, 0.5]),
        ];

        let (scored, _) = score(rows).unwrap();

        assert_eq!(scored[0].engagement_score, 0.0);
        assert_eq!(scored[1].engagement_score, 1.0);
        assert!((scored[2].engagement_score - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_single_row_project_score_is_constant() {
        let rows = vec![
            make_row("a", 1, [0.0, 0.0, 0.0, 0.0, 0.0]),
            make_row("a", 2, [1.0, 1.0, 1.0, 1.0, 1.0]),
            make_row("solo", 1, [0.0; FEATURE_COUNT]),
        ];

        let (scored, _) = score(rows).unwrap();

        let solo = scored.iter().find(|r| r.project_url == "solo").unwrap();
        assert_eq!(solo.engagement_score, CONSTANT_GROUP_VALUE);
        assert!(solo.eng_raw.is_finite());
    }

    #[test]
    fn test_scored_rows_carry_scaled_features() {
        let rows = vec![
            make_row("a", 1, [0.1, 0.2, 0.3, 0.4, 0.5]),
            make_row("a", 2, [0.9, 0.8, 0.7, 0.6, 0.5]),
        ];

        let (scored, _) = score(rows).unwrap();

        assert_eq!(scored[0].churn_sum, 0.1);
        assert_eq!(scored[0].commit_rate, 0.5);
        assert_eq!(scored[1].commit_count, 0.8);
        assert_eq!(scored[1].sum_interval_h, 1.0);
        assert_eq!(scored[1].month, month(2));
    }
}
