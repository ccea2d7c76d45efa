use serde::Serialize;

use super::StatsError;

pub fn mean(values: &[f64]) -> Result<f64, StatsError> {
    if values.is_empty() {
        return Err(StatsError::EmptySample);
    }
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Variance with divisor `n`.
pub fn population_variance(values: &[f64]) -> Result<f64, StatsError> {
    let m = mean(values)?;
    Ok(values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64)
}

/// Standard deviation with divisor `n - 1`; `None` below two samples.
pub fn sample_std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values).ok()?;
    let ss = values.iter().map(|v| (v - m).powi(2)).sum::<f64>();
    Some((ss / (values.len() - 1) as f64).sqrt())
}

pub fn median(values: &[f64]) -> Result<f64, StatsError> {
    let sorted = sorted_copy(values);
    quantile(&sorted, 0.5)
}

/// Quantile of already sorted data, linear interpolation between closest ranks.
pub fn quantile(sorted: &[f64], q: f64) -> Result<f64, StatsError> {
    if sorted.is_empty() {
        return Err(StatsError::EmptySample);
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Ok(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

pub(crate) fn sorted_copy(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}

/// Count, location and spread of one column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    pub std: Option<f64>,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

impl Summary {
    pub fn describe(values: &[f64]) -> Option<Self> {
        let sorted = sorted_copy(values);
        let (&min, &max) = (sorted.first()?, sorted.last()?);
        Some(Self {
            count: sorted.len(),
            mean: mean(&sorted).ok()?,
            std: sample_std_dev(&sorted),
            min,
            q1: quantile(&sorted, 0.25).ok()?,
            median: quantile(&sorted, 0.5).ok()?,
            q3: quantile(&sorted, 0.75).ok()?,
            max,
        })
    }

    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }
}
