//! Property tests for the permission helpers and rank statistics.

use appcompare::analyzers::permissions::{align, short_name, FrequencyTable};
use appcompare::stats::{mann_whitney_u, median, wilcoxon_signed_rank};
use proptest::prelude::*;

proptest! {
    #[test]
    fn short_name_is_last_dotted_segment(segments in prop::collection::vec("[A-Za-z_]{1,8}", 1..5)) {
        let id = segments.join(".");
        prop_assert_eq!(short_name(&id), segments.last().unwrap().as_str());
    }

    #[test]
    fn aligned_tables_share_keys(
        left in prop::collection::vec("[A-E]", 0..20),
        right in prop::collection::vec("[C-H]", 0..20),
    ) {
        let a: FrequencyTable = left.iter().map(String::as_str).collect();
        let b: FrequencyTable = right.iter().map(String::as_str).collect();
        let (mut a2, mut b2) = (a.clone(), b.clone());
        align(&mut a2, &mut b2);

        prop_assert_eq!(a2.keys().collect::<Vec<_>>(), b2.keys().collect::<Vec<_>>());
        for (key, count) in a.iter() {
            prop_assert_eq!(a2.get(key), count);
        }
        for key in b.keys_not_in(&a).into_iter().map(|(k, _)| k) {
            prop_assert_eq!(a2.get(key), 0);
        }
    }

    #[test]
    fn wilcoxon_p_value_is_a_probability(
        pairs in prop::collection::vec((0u32..50, 0u32..50), 1..80),
    ) {
        let (x, y): (Vec<f64>, Vec<f64>) =
            pairs.iter().map(|(a, b)| (f64::from(*a), f64::from(*b))).unzip();
        if let Ok(result) = wilcoxon_signed_rank(&x, &y) {
            prop_assert!((0.0..=1.0).contains(&result.p_value));
        }
    }

    #[test]
    fn mann_whitney_is_symmetric(
        x in prop::collection::vec(0u32..100, 1..15),
        y in prop::collection::vec(0u32..100, 1..15),
    ) {
        let x: Vec<f64> = x.into_iter().map(f64::from).collect();
        let y: Vec<f64> = y.into_iter().map(f64::from).collect();
        match (mann_whitney_u(&x, &y), mann_whitney_u(&y, &x)) {
            (Ok(a), Ok(b)) => {
                prop_assert!((a.p_value - b.p_value).abs() < 1e-9);
                prop_assert!((0.0..=1.0).contains(&a.p_value));
            }
            (Err(a), Err(b)) => prop_assert_eq!(a, b),
            _ => prop_assert!(false, "asymmetric failure"),
        }
    }

    #[test]
    fn median_lies_within_range(values in prop::collection::vec(-1e6f64..1e6, 1..50)) {
        let m = median(&values).unwrap();
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        prop_assert!(m >= min && m <= max);
    }
}
