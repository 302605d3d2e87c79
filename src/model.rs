/*!
Model evaluation and chi-squared scoring.

The sampler only needs two things from a model: predicted `y` values for a
parameter pair, and a way to score those predictions against the data. The
free functions [`linear`] and [`chi_squared`] are generic over the float type;
the [`Model`] trait is what the sampler is parameterised over.

# Examples

```rust
use linfit_mcmc::model::{chi_squared, linear};

let x = [0.0, 1.0, 2.0];
let y = linear(2.0, 1.0, &x);
assert_eq!(y, vec![1.0, 3.0, 5.0]);
assert_eq!(chi_squared(&y, &y, &[4.0, 4.0, 4.0]), 0.0);
```
*/

use num_traits::Float;

/// Evaluates `a * x + b` for every element of `x`.
pub fn linear<T: Float>(a: T, b: T, x: &[T]) -> Vec<T> {
    x.iter().map(|&xi| a * xi + b).collect()
}

/**
Returns `Σ (y_obs - y_pred)² / syo`.

`syo` is a variance, so the squared residual is divided by it directly and not
by its square. A zero entry produces `inf` (or `NaN` when the residual is also
zero); callers that need a finite score must validate the variances first, as
[`Dataset::new`](crate::dataset::Dataset::new) does.
*/
pub fn chi_squared<T: Float>(y_obs: &[T], y_pred: &[T], syo: &[T]) -> T {
    y_obs
        .iter()
        .zip(y_pred)
        .zip(syo)
        .fold(T::zero(), |acc, ((&yo, &ye), &s)| {
            let r = yo - ye;
            acc + r * r / s
        })
}

/// A deterministic model `y = f(params, x)` with two parameters.
pub trait Model {
    /// Writes the predictions for `x` into `out`, which has the same length as `x`.
    fn predict_into(&self, params: &[f64; 2], x: &[f64], out: &mut [f64]);

    /// Allocating variant of [`Model::predict_into`].
    fn predict(&self, params: &[f64; 2], x: &[f64]) -> Vec<f64> {
        let mut out = vec![0.0; x.len()];
        self.predict_into(params, x, &mut out);
        out
    }
}

/// The straight line `y = a * x + b`, with `params = [a, b]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Linear;

impl Model for Linear {
    fn predict_into(&self, params: &[f64; 2], x: &[f64], out: &mut [f64]) {
        let [a, b] = *params;
        for (o, &xi) in out.iter_mut().zip(x) {
            *o = a * xi + b;
        }
    }
}
