/*!
Sampler configuration.

[`SamplerConfig::default`] reproduces the classic setup: start at
`(a, b) = (2.5, 28.82)`, propose with standard deviations `(0.025, 2.5)`,
stop after 500 000 accepted samples and discard the first 1000 of them.

# Examples

```rust
use linfit_mcmc::config::SamplerConfig;
use linfit_mcmc::core::StopPolicy;

let config = SamplerConfig::default()
    .set_seed(42)
    .set_target(10_000)
    .set_max_proposals(1_000_000)
    .set_burn_in(500);

assert_eq!(config.seed, Some(42));
assert_eq!(
    config.stop_policy,
    StopPolicy::AcceptedTarget { target: 10_000, max_proposals: Some(1_000_000) }
);
```
*/

use crate::core::StopPolicy;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplerConfig {
    /// Starting `[a, b]`.
    pub initial_state: [f64; 2],
    /// Proposal standard deviations for `[a, b]`.
    pub proposal_std: [f64; 2],
    pub stop_policy: StopPolicy,
    /// Accepted samples dropped from the front of the trace before summarising.
    pub burn_in: usize,
    /// Seed for the generator; `None` draws one from OS entropy.
    pub seed: Option<u64>,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            initial_state: [2.5, 28.82],
            proposal_std: [0.025, 2.5],
            stop_policy: StopPolicy::default(),
            burn_in: 1000,
            seed: None,
        }
    }
}

impl SamplerConfig {
    pub fn set_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn set_initial_state(mut self, a: f64, b: f64) -> Self {
        self.initial_state = [a, b];
        self
    }

    pub fn set_proposal_std(mut self, std_a: f64, std_b: f64) -> Self {
        self.proposal_std = [std_a, std_b];
        self
    }

    pub fn set_burn_in(mut self, burn_in: usize) -> Self {
        self.burn_in = burn_in;
        self
    }

    pub fn set_stop_policy(mut self, stop_policy: StopPolicy) -> Self {
        self.stop_policy = stop_policy;
        self
    }

    /// Switches to (or updates) an accepted-sample target, keeping any proposal cap.
    pub fn set_target(mut self, target: usize) -> Self {
        let max_proposals = match self.stop_policy {
            StopPolicy::AcceptedTarget { max_proposals, .. } => max_proposals,
            StopPolicy::FixedProposals(_) => None,
        };
        self.stop_policy = StopPolicy::AcceptedTarget {
            target,
            max_proposals,
        };
        self
    }

    /// Caps the number of proposals of an accepted-sample target.
    /// Has no effect under [`StopPolicy::FixedProposals`].
    pub fn set_max_proposals(mut self, cap: u64) -> Self {
        if let StopPolicy::AcceptedTarget { max_proposals, .. } = &mut self.stop_policy {
            *max_proposals = Some(cap);
        }
        self
    }
}
