//! Post-run statistics and the least-squares reference fit.

use std::fmt;

use ndarray::prelude::*;
use ndarray_stats::CorrelationExt;

use crate::core::Run;
use crate::dataset::Dataset;
use crate::error::{Result, SamplerError};

/// Statistics of the trace after discarding burn-in.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub accepted: usize,
    pub proposals: u64,
    pub acceptance_ratio: f64,
    pub burn_in: usize,
    /// Number of samples the statistics are computed over.
    pub kept: usize,
    /// Mean of `[a, b]`.
    pub mean: [f64; 2],
    /// Standard deviation of `[a, b]`.
    pub std: [f64; 2],
    /// 2×2 covariance of `(a, b)`.
    pub cov: Array2<f64>,
}

impl Summary {
    pub fn new(run: &Run) -> Result<Self> {
        let burn_in = run.burn_in;
        if run.trace.len() <= burn_in {
            return Err(SamplerError::InsufficientSamples {
                accepted: run.trace.len(),
                burn_in,
            });
        }

        let trace = run.trace_array();
        let kept = trace.slice(s![burn_in.., ..]);
        let mean = kept
            .mean_axis(Axis(0))
            .ok_or(SamplerError::InsufficientSamples {
                accepted: run.trace.len(),
                burn_in,
            })?;
        // CorrelationExt wants variables in rows and observations in columns.
        let ddof = if kept.nrows() > 1 { 1.0 } else { 0.0 };
        let cov = kept
            .t()
            .cov(ddof)
            .map_err(|_| SamplerError::InsufficientSamples {
                accepted: run.trace.len(),
                burn_in,
            })?;

        Ok(Self {
            accepted: run.accepted,
            proposals: run.proposals,
            acceptance_ratio: run.acceptance_ratio(),
            burn_in,
            kept: kept.nrows(),
            mean: [mean[0], mean[1]],
            std: [cov[(0, 0)].sqrt(), cov[(1, 1)].sqrt()],
            cov,
        })
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "i = {}, j = {}, acceptance ratio: {:.4}",
            self.accepted, self.proposals, self.acceptance_ratio
        )?;
        write!(f, "a: {:.6}, b: {:.6}", self.mean[0], self.mean[1])
    }
}

/// Closed-form weighted least-squares fit of `y = a * x + b`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LeastSquaresFit {
    pub a: f64,
    pub b: f64,
    /// Standard errors of `a` and `b`.
    pub sigma_a: f64,
    pub sigma_b: f64,
}

/**
Weights each point by `1 / sigma`, the same variance reading the chi-squared
score uses, so the result is the minimum of the score the sampler explores.

# Examples

```rust
use linfit_mcmc::dataset::Dataset;
use linfit_mcmc::stats::least_squares;

let data = Dataset::new(vec![0.0, 1.0, 2.0], vec![1.0, 3.0, 5.0], vec![1.0, 2.0, 1.0]).unwrap();
let fit = least_squares(&data).unwrap();
assert!((fit.a - 2.0).abs() < 1e-12);
assert!((fit.b - 1.0).abs() < 1e-12);
```
*/
pub fn least_squares(data: &Dataset) -> Result<LeastSquaresFit> {
    let mut sw = 0.0;
    let mut sx = 0.0;
    let mut sy = 0.0;
    let mut sxx = 0.0;
    let mut sxy = 0.0;
    for ((&x, &y), &s) in data.x().iter().zip(data.y()).zip(data.sigma()) {
        let w = 1.0 / s;
        sw += w;
        sx += w * x;
        sy += w * y;
        sxx += w * x * x;
        sxy += w * x * y;
    }

    let det = sw * sxx - sx * sx;
    if det.abs() <= f64::EPSILON * sw * sxx {
        return Err(SamplerError::DegenerateDesign);
    }
    Ok(LeastSquaresFit {
        a: (sw * sxy - sx * sy) / det,
        b: (sxx * sy - sx * sxy) / det,
        sigma_a: (sw / det).sqrt(),
        sigma_b: (sxx / det).sqrt(),
    })
}
