//! Observed data: independent variable, measurements and their variances.

use crate::error::{Result, SamplerError};

const REFERENCE_X: [f64; 16] = [
    203.0, 58.0, 210.0, 202.0, 198.0, 158.0, 165.0, 201.0, 157.0, 131.0, 166.0, 160.0, 186.0,
    125.0, 218.0, 146.0,
];

const REFERENCE_Y: [f64; 16] = [
    495.0, 173.0, 479.0, 504.0, 510.0, 416.0, 393.0, 442.0, 317.0, 311.0, 400.0, 337.0, 423.0,
    334.0, 533.0, 344.0,
];

const REFERENCE_SIGMA: [f64; 16] = [
    21.0, 15.0, 27.0, 14.0, 30.0, 16.0, 14.0, 25.0, 52.0, 16.0, 34.0, 31.0, 42.0, 26.0, 16.0,
    22.0,
];

/**
Three equal-length columns `(x, y, sigma)`.

`sigma` is read as a variance by [`chi_squared`](crate::model::chi_squared).
Every entry must be finite and strictly positive.

# Examples

```rust
use linfit_mcmc::dataset::Dataset;

let data = Dataset::new(vec![0.0, 1.0], vec![1.0, 3.0], vec![1.0, 1.0]).unwrap();
assert_eq!(data.len(), 2);

assert!(Dataset::new(vec![0.0], vec![1.0], vec![0.0]).is_err());
```
*/
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    x: Vec<f64>,
    y: Vec<f64>,
    sigma: Vec<f64>,
}

impl Dataset {
    pub fn new(x: Vec<f64>, y: Vec<f64>, sigma: Vec<f64>) -> Result<Self> {
        if x.len() != y.len() || x.len() != sigma.len() {
            return Err(SamplerError::LengthMismatch {
                x: x.len(),
                y: y.len(),
                sigma: sigma.len(),
            });
        }
        if x.is_empty() {
            return Err(SamplerError::EmptyDataset);
        }
        if let Some((index, &value)) = sigma
            .iter()
            .enumerate()
            .find(|(_, s)| !(s.is_finite() && **s > 0.0))
        {
            return Err(SamplerError::InvalidVariance { index, value });
        }
        Ok(Self { x, y, sigma })
    }

    /// The embedded 16-point data set.
    pub fn reference() -> Self {
        Self {
            x: REFERENCE_X.to_vec(),
            y: REFERENCE_Y.to_vec(),
            sigma: REFERENCE_SIGMA.to_vec(),
        }
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn y(&self) -> &[f64] {
        &self.y
    }

    pub fn sigma(&self) -> &[f64] {
        &self.sigma
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// Whether the data set has no points; `false` for any validated data set.
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}
