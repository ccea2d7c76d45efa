//! Mann–Whitney U rank-sum test for two independent samples.

use super::ranks::rank_average;
use super::{two_sided_normal_p, PValueMethod, StatsError, TestResult};

/// Both samples at or below this size (and no ties) use the exact distribution.
pub const EXACT_LIMIT: usize = 8;

/// Two-sided test; the reported statistic is U of the first sample.
pub fn mann_whitney_u(x: &[f64], y: &[f64]) -> Result<TestResult, StatsError> {
    if x.is_empty() || y.is_empty() {
        return Err(StatsError::EmptySample);
    }

    let (n1, n2) = (x.len(), y.len());
    let combined: Vec<f64> = x.iter().chain(y).copied().collect();
    let ranking = rank_average(&combined);

    let r1: f64 = ranking.ranks[..n1].iter().sum();
    let u1 = r1 - (n1 * (n1 + 1)) as f64 / 2.0;
    let u2 = (n1 * n2) as f64 - u1;

    if n1 <= EXACT_LIMIT && n2 <= EXACT_LIMIT && !ranking.has_ties() {
        return Ok(TestResult {
            statistic: u1,
            p_value: exact_p_value(n1, n2, u1.min(u2)),
            method: PValueMethod::Exact,
        });
    }

    let (n1f, n2f) = (n1 as f64, n2 as f64);
    let n = n1f + n2f;
    let mu = n1f * n2f / 2.0;
    let variance = n1f * n2f / 12.0 * ((n + 1.0) - ranking.tie_term() / (n * (n - 1.0)));
    if variance <= 0.0 {
        return Err(StatsError::ZeroVariance);
    }

    let z = (u1.max(u2) - mu - 0.5) / variance.sqrt();
    Ok(TestResult {
        statistic: u1,
        p_value: two_sided_normal_p(z.max(0.0))?,
        method: PValueMethod::NormalApproximation,
    })
}

/// `2 * P(U <= u)` under the null for sample sizes `m` and `n`.
fn exact_p_value(m: usize, n: usize, u: f64) -> f64 {
    // table[i][j][k]: orderings of i x-values and j y-values with U == k
    let mut table: Vec<Vec<Vec<f64>>> = vec![vec![Vec::new(); n + 1]; m + 1];
    for i in 0..=m {
        for j in 0..=n {
            table[i][j] = if i == 0 || j == 0 {
                vec![1.0]
            } else {
                let mut dist = vec![0.0; i * j + 1];
                // largest value belongs to x: it beats all j y-values
                for (k, c) in table[i - 1][j].iter().enumerate() {
                    dist[k + j] += c;
                }
                // largest value belongs to y
                for (k, c) in table[i][j - 1].iter().enumerate() {
                    dist[k] += c;
                }
                dist
            };
        }
    }

    let dist = &table[m][n];
    let total: f64 = dist.iter().sum();
    let upto = (u.floor() as usize).min(dist.len() - 1);
    let cdf = dist[..=upto].iter().sum::<f64>() / total;
    (2.0 * cdf).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_sample() {
        assert_eq!(mann_whitney_u(&[], &[1.0]), Err(StatsError::EmptySample));
    }

    #[test]
    fn test_exact_fully_separated() {
        let result = mann_whitney_u(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]).unwrap();
        assert_eq!(result.statistic, 0.0);
        assert_eq!(result.method, PValueMethod::Exact);
        assert!((result.p_value - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_exact_interleaved_is_not_significant() {
        let result = mann_whitney_u(&[1.0, 4.0, 5.0], &[2.0, 3.0, 6.0]).unwrap();
        assert!(result.p_value > 0.5);
    }

    #[test]
    fn test_ties_use_normal_approximation() {
        let x = [1.0, 2.0, 2.0, 3.0];
        let y = [2.0, 3.0, 4.0, 5.0];
        let result = mann_whitney_u(&x, &y).unwrap();
        assert_eq!(result.method, PValueMethod::NormalApproximation);
        assert!(result.p_value > 0.0 && result.p_value <= 1.0);
    }

    #[test]
    fn test_identical_constant_samples_have_zero_variance() {
        let err = mann_whitney_u(&[3.0, 3.0], &[3.0, 3.0]).unwrap_err();
        assert_eq!(err, StatsError::ZeroVariance);
    }

    #[test]
    fn test_large_samples_shifted() {
        let x: Vec<f64> = (0..30).map(f64::from).collect();
        let y: Vec<f64> = (100..130).map(f64::from).collect();
        let result = mann_whitney_u(&x, &y).unwrap();
        assert!(result.p_value < 1e-6);
    }
}
