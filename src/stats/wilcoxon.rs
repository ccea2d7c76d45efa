//! Wilcoxon signed-rank test for paired samples.
//!
//! Zero differences are discarded before ranking. The p-value comes from
//! the exact null distribution of the rank sum only when there are at most
//! [`EXACT_LIMIT`] pairs, no zero differences and no tied magnitudes;
//! otherwise the normal approximation is used with tie and continuity
//! corrections.

use super::ranks::rank_average;
use super::{two_sided_normal_p, PValueMethod, StatsError, TestResult};

pub const EXACT_LIMIT: usize = 50;

/// Two-sided test of whether paired samples `x` and `y` differ.
///
/// The statistic is the smaller of the positive and negative rank sums.
pub fn wilcoxon_signed_rank(x: &[f64], y: &[f64]) -> Result<TestResult, StatsError> {
    if x.len() != y.len() {
        return Err(StatsError::LengthMismatch {
            left: x.len(),
            right: y.len(),
        });
    }

    let diffs: Vec<f64> = x
        .iter()
        .zip(y)
        .map(|(a, b)| a - b)
        .filter(|d| *d != 0.0)
        .collect();
    let zeros = x.len() - diffs.len();
    if diffs.is_empty() {
        return Err(StatsError::NoNonZeroDifferences);
    }

    let n = diffs.len();
    let magnitudes: Vec<f64> = diffs.iter().map(|d| d.abs()).collect();
    let ranking = rank_average(&magnitudes);

    let r_plus: f64 = diffs
        .iter()
        .zip(&ranking.ranks)
        .filter(|(d, _)| **d > 0.0)
        .map(|(_, r)| r)
        .sum();
    let total = (n * (n + 1)) as f64 / 2.0;
    let r_minus = total - r_plus;
    let statistic = r_plus.min(r_minus);

    if x.len() <= EXACT_LIMIT && zeros == 0 && !ranking.has_ties() {
        let p_value = exact_p_value(n, statistic);
        return Ok(TestResult {
            statistic,
            p_value,
            method: PValueMethod::Exact,
        });
    }

    let nf = n as f64;
    let mean = nf * (nf + 1.0) / 4.0;
    let variance = nf * (nf + 1.0) * (2.0 * nf + 1.0) / 24.0 - ranking.tie_term() / 48.0;
    if variance <= 0.0 {
        return Err(StatsError::ZeroVariance);
    }

    let mut d = r_plus - mean;
    d -= 0.5 * d.signum();
    let z = d / variance.sqrt();

    Ok(TestResult {
        statistic,
        p_value: two_sided_normal_p(z)?,
        method: PValueMethod::NormalApproximation,
    })
}

/// `2 * P(T <= t)` under the null, where `T` is the rank sum of a random
/// subset of `1..=n`.
fn exact_p_value(n: usize, t: f64) -> f64 {
    let max_sum = n * (n + 1) / 2;
    // counts[s] = number of subsets of 1..=k summing to s
    let mut counts = vec![0.0f64; max_sum + 1];
    counts[0] = 1.0;
    for k in 1..=n {
        for s in (k..=max_sum).rev() {
            counts[s] += counts[s - k];
        }
    }

    let total = 2f64.powi(n as i32);
    let upto = t.floor() as usize;
    let cdf: f64 = counts[..=upto.min(max_sum)].iter().sum::<f64>() / total;
    (2.0 * cdf).min(1.0)
}
