/*!
Proposal distribution and the Metropolis acceptance rule.

Proposals draw from the random number generator the sampler owns, so a single
seeded generator drives the whole chain.

# Examples

```rust
use linfit_mcmc::distributions::{acceptance_probability, IndependentGaussian, Proposal};
use rand::rngs::SmallRng;
use rand::SeedableRng;

let proposal = IndependentGaussian::new(0.025, 2.5).unwrap();
let mut rng = SmallRng::seed_from_u64(42);
let candidate = proposal.sample(&[2.5, 28.82], &mut rng);
assert_eq!(candidate.len(), 2);

assert_eq!(acceptance_probability(10.0, 4.0), 1.0);
assert!(acceptance_probability(4.0, 10.0) < 1.0);
```
*/

use rand::Rng;
use rand_distr::{Distribution, StandardNormal};

use crate::error::{Result, SamplerError};

/// Generates a candidate state from q(x' | x).
///
/// Implementations must be symmetric, `q(x' | x) = q(x | x')`: the sampler
/// applies the plain Metropolis rule without a Hastings correction.
pub trait Proposal {
    fn sample<R: Rng + ?Sized>(&self, current: &[f64; 2], rng: &mut R) -> [f64; 2];
}

/**
Independent Gaussian random-walk proposal, one standard deviation per parameter.

Each coordinate is drawn as `Normal(current[i], std[i])`, `a` first and then `b`.
*/
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndependentGaussian {
    pub std: [f64; 2],
}

impl IndependentGaussian {
    /// Creates the proposal, rejecting negative or non-finite scales.
    pub fn new(std_a: f64, std_b: f64) -> Result<Self> {
        for (param, value) in [("a", std_a), ("b", std_b)] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(SamplerError::InvalidProposalScale { param, value });
            }
        }
        Ok(Self {
            std: [std_a, std_b],
        })
    }
}

impl Proposal for IndependentGaussian {
    fn sample<R: Rng + ?Sized>(&self, current: &[f64; 2], rng: &mut R) -> [f64; 2] {
        let za: f64 = StandardNormal.sample(rng);
        let zb: f64 = StandardNormal.sample(rng);
        [current[0] + self.std[0] * za, current[1] + self.std[1] * zb]
    }
}

/**
Metropolis acceptance probability `min(1, exp((chi_current - chi_candidate) / 2))`.

Chi-squared is minus twice the log-likelihood, so this is the likelihood ratio
capped at one. A NaN ratio is returned unchanged: comparing a uniform draw
against it is always false, which rejects the move.
*/
pub fn acceptance_probability(chi_current: f64, chi_candidate: f64) -> f64 {
    let ratio = ((chi_current - chi_candidate) / 2.0).exp();
    if ratio >= 1.0 {
        1.0
    } else {
        ratio
    }
}
