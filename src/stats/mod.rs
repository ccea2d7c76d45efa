//! Descriptive statistics and the non-parametric tests used to compare
//! the two app groups.

pub mod descriptive;
pub mod mann_whitney;
pub mod ranks;
pub mod wilcoxon;

pub use descriptive::{mean, median, population_variance, quantile, sample_std_dev, Summary};
pub use mann_whitney::mann_whitney_u;
pub use wilcoxon::wilcoxon_signed_rank;

use serde::Serialize;
use statrs::distribution::{ContinuousCDF, Normal};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StatsError {
    #[error("sample is empty")]
    EmptySample,

    #[error("samples differ in length ({left} vs {right})")]
    LengthMismatch { left: usize, right: usize },

    #[error("all paired differences are zero")]
    NoNonZeroDifferences,

    #[error("test statistic has zero variance")]
    ZeroVariance,

    #[error("distribution error: {0}")]
    Distribution(String),
}

/// How the p-value was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PValueMethod {
    Exact,
    NormalApproximation,
}

/// Outcome of a two-sided significance test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TestResult {
    pub statistic: f64,
    pub p_value: f64,
    pub method: PValueMethod,
}

/// Two-sided p-value of a standard normal score.
pub(crate) fn two_sided_normal_p(z: f64) -> Result<f64, StatsError> {
    let normal = Normal::new(0.0, 1.0).map_err(|e| StatsError::Distribution(e.to_string()))?;
    Ok((2.0 * normal.sf(z.abs())).min(1.0))
}
