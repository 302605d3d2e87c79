/*!
# Metropolis–Hastings Sampler

A single-chain Metropolis–Hastings sampler for a two-parameter model scored by
chi-squared against a [`Dataset`].

## Overview

- **Model (`M`)**: predicts `y` for a parameter pair via the [`Model`] trait.
- **Proposal (`Q`)**: draws candidate pairs via the [`Proposal`] trait. Both
  parameters are proposed jointly every iteration.
- **Random source (`R`)**: any [`rand::Rng`]; the sampler owns it, so a seeded
  generator makes the whole run reproducible.
- **Stop policy**: see [`StopPolicy`].

Each iteration draws a candidate, scores it, and accepts it with probability
[`acceptance_probability`]. Only accepted candidates are appended to the trace.

## Example Usage

```rust
use linfit_mcmc::config::SamplerConfig;
use linfit_mcmc::dataset::Dataset;
use linfit_mcmc::metropolis_hastings::MetropolisHastings;
use linfit_mcmc::model::Linear;

let config = SamplerConfig::default().set_seed(42).set_target(2_000).set_burn_in(100);
let mh = MetropolisHastings::new(Linear, Dataset::reference(), config).unwrap();
let run = mh.run();

assert_eq!(run.accepted, 2_000);
assert_eq!(run.trace.len(), 2_000);
assert!(run.proposals >= 2_000);
let summary = run.summary().unwrap();
assert_eq!(summary.kept, 1_900);
```
*/

use log::{debug, info, warn};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::config::SamplerConfig;
use crate::core::{
    progress_bar, run_chain, run_chain_with_progress, MarkovChain, Run, StopPolicy, Termination,
};
use crate::dataset::Dataset;
use crate::distributions::{acceptance_probability, IndependentGaussian, Proposal};
use crate::error::Result;
use crate::model::{chi_squared, Model};

/// Upper bound on the trace entries reserved before sampling starts.
const MAX_TRACE_PREALLOC: usize = 1 << 20;

/**
The sampler and its chain state.

# Type Parameters
- `M`: the model. Must implement [`Model`].
- `Q`: the proposal distribution. Must implement [`Proposal`].
- `R`: the random number generator, [`SmallRng`] unless injected.
*/
#[derive(Debug, Clone)]
pub struct MetropolisHastings<M, Q = IndependentGaussian, R = SmallRng> {
    pub model: M,
    pub proposal: Q,
    pub dataset: Dataset,
    pub stop_policy: StopPolicy,
    pub burn_in: usize,
    /// The seed the generator was built from, if it was built here.
    pub seed: Option<u64>,
    rng: R,
    current_state: [f64; 2],
    current_chi: f64,
    trace: Vec<[f64; 2]>,
    accepted: usize,
    proposals: u64,
    candidate_pred: Vec<f64>,
}

impl<M: Model> MetropolisHastings<M, IndependentGaussian, SmallRng> {
    /**
    Builds a sampler with the independent Gaussian proposal from `config`.

    The generator is seeded from `config.seed`, or from OS entropy when it is
    `None`; the chosen seed is kept in [`MetropolisHastings::seed`] so the run
    can be reproduced.
    */
    pub fn new(model: M, dataset: Dataset, config: SamplerConfig) -> Result<Self> {
        let proposal = IndependentGaussian::new(config.proposal_std[0], config.proposal_std[1])?;
        let seed = config.seed.unwrap_or_else(|| SmallRng::from_entropy().gen());
        let rng = SmallRng::seed_from_u64(seed);
        let mut mh = Self::from_parts(model, proposal, dataset, config, rng);
        mh.seed = Some(seed);
        Ok(mh)
    }
}

impl<M, Q, R> MetropolisHastings<M, Q, R>
where
    M: Model,
    Q: Proposal,
    R: Rng,
{
    /// Builds a sampler from its parts. `config.proposal_std` and `config.seed`
    /// are ignored: the proposal and the generator are taken as given.
    pub fn from_parts(
        model: M,
        proposal: Q,
        dataset: Dataset,
        config: SamplerConfig,
        rng: R,
    ) -> Self {
        let current_state = config.initial_state;
        let current_pred = model.predict(&current_state, dataset.x());
        let current_chi = chi_squared(dataset.y(), &current_pred, dataset.sigma());
        let capacity = match config.stop_policy {
            StopPolicy::AcceptedTarget {
                target,
                max_proposals,
            } => max_proposals
                .map_or(target, |cap| target.min(usize::try_from(cap).unwrap_or(usize::MAX)))
                .min(MAX_TRACE_PREALLOC),
            StopPolicy::FixedProposals(_) => 0,
        };
        Self {
            candidate_pred: vec![0.0; dataset.len()],
            model,
            proposal,
            dataset,
            stop_policy: config.stop_policy,
            burn_in: config.burn_in,
            seed: None,
            rng,
            current_state,
            current_chi,
            trace: Vec::with_capacity(capacity),
            accepted: 0,
            proposals: 0,
        }
    }

    /// Chi-squared of the current state.
    pub fn current_chi_squared(&self) -> f64 {
        self.current_chi
    }

    /// Accepted states so far.
    pub fn trace(&self) -> &[[f64; 2]] {
        &self.trace
    }

    /// Samples until the stop policy ends the run.
    pub fn run(mut self) -> Run {
        self.log_start();
        let policy = self.stop_policy;
        let termination = run_chain(&mut self, &policy);
        self.finish(termination)
    }

    /// Like [`run`](Self::run), with a progress bar on stderr.
    pub fn run_progress(mut self) -> Run {
        self.log_start();
        let policy = self.stop_policy;
        let pb = progress_bar();
        let termination = run_chain_with_progress(&mut self, &policy, &pb);
        pb.finish_with_message("Done!");
        self.finish(termination)
    }

    fn log_start(&self) {
        info!(
            "sampling {} points from (a, b) = ({}, {}), policy {:?}",
            self.dataset.len(),
            self.current_state[0],
            self.current_state[1],
            self.stop_policy
        );
        debug!(
            "initial chi-squared {}, burn-in {}, seed {:?}",
            self.current_chi, self.burn_in, self.seed
        );
    }

    fn finish(self, termination: Termination) -> Run {
        match termination {
            Termination::ProposalCapReached => warn!(
                "proposal cap reached after {} proposals with only {} accepted",
                self.proposals, self.accepted
            ),
            _ => info!(
                "sampling finished: {} accepted out of {} proposals",
                self.accepted, self.proposals
            ),
        }
        Run {
            trace: self.trace,
            accepted: self.accepted,
            proposals: self.proposals,
            burn_in: self.burn_in,
            termination,
            final_state: self.current_state,
            final_chi_squared: self.current_chi,
        }
    }
}

impl<M, Q, R> MarkovChain for MetropolisHastings<M, Q, R>
where
    M: Model,
    Q: Proposal,
    R: Rng,
{
    /**
    Performs one Metropolis update.

    A candidate is drawn from the proposal and scored by chi-squared. With
    `chi0` the current score and `chit` the candidate's, the move is accepted
    when a uniform draw `u` satisfies

    \[
    u \le \min\left(1, \exp\left(\frac{\chi^2_0 - \chi^2_t}{2}\right)\right)
    \]

    An accepted candidate becomes the current state and is appended to the trace.
    */
    fn step(&mut self) -> bool {
        let candidate = self.proposal.sample(&self.current_state, &mut self.rng);
        self.model
            .predict_into(&candidate, self.dataset.x(), &mut self.candidate_pred);
        let chit = chi_squared(self.dataset.y(), &self.candidate_pred, self.dataset.sigma());
        let p = acceptance_probability(self.current_chi, chit);
        let u: f64 = self.rng.gen();
        self.proposals += 1;

        let accepted = u <= p;
        if accepted {
            self.current_state = candidate;
            self.current_chi = chit;
            self.trace.push(candidate);
            self.accepted += 1;
        }
        accepted
    }

    fn current_state(&self) -> &[f64; 2] {
        &self.current_state
    }

    fn accepted(&self) -> usize {
        self.accepted
    }

    fn proposals(&self) -> u64 {
        self.proposals
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SamplerError;
    use crate::model::Linear;
    use approx::assert_abs_diff_eq;
    use rand::rngs::mock::StepRng;

    fn small_config() -> SamplerConfig {
        SamplerConfig::default()
            .set_seed(42)
            .set_target(5_000)
            .set_burn_in(500)
    }

    #[test]
    fn test_initial_chi_squared() {
        let mh = MetropolisHastings::new(Linear, Dataset::reference(), small_config()).unwrap();
        let data = Dataset::reference();
        let pred = Linear.predict(&[2.5, 28.82], data.x());
        let expected = chi_squared(data.y(), &pred, data.sigma());
        assert_eq!(mh.current_chi_squared(), expected);
        assert_eq!(mh.current_state(), &[2.5, 28.82]);
        assert_eq!(mh.seed, Some(42));
    }

    #[test]
    fn test_invalid_proposal_scale() {
        let config = small_config().set_proposal_std(-1.0, 2.5);
        assert!(matches!(
            MetropolisHastings::new(Linear, Dataset::reference(), config),
            Err(SamplerError::InvalidProposalScale { .. })
        ));
    }

    #[test]
    fn test_counts_and_trace() {
        let mh = MetropolisHastings::new(Linear, Dataset::reference(), small_config()).unwrap();
        let run = mh.run();
        assert_eq!(run.termination, Termination::TargetReached);
        assert_eq!(run.accepted, 5_000);
        assert_eq!(run.trace.len(), 5_000);
        assert!(run.proposals > 5_000);
        assert_eq!(run.final_state, *run.trace.last().unwrap());
        assert!(run.acceptance_ratio() > 0.0 && run.acceptance_ratio() < 1.0);
    }

    #[test]
    fn test_same_seed_same_run() {
        let first = MetropolisHastings::new(Linear, Dataset::reference(), small_config())
            .unwrap()
            .run();
        let second = MetropolisHastings::new(Linear, Dataset::reference(), small_config())
            .unwrap()
            .run();
        assert_eq!(first, second);
        assert_eq!(first.summary().unwrap(), second.summary().unwrap());
    }

    #[test]
    fn test_different_seed_different_run() {
        let first = MetropolisHastings::new(Linear, Dataset::reference(), small_config())
            .unwrap()
            .run();
        let second =
            MetropolisHastings::new(Linear, Dataset::reference(), small_config().set_seed(43))
                .unwrap()
                .run();
        assert_ne!(first.trace, second.trace);
    }

    #[test]
    fn test_progress_run_matches_plain_run() {
        let plain = MetropolisHastings::new(Linear, Dataset::reference(), small_config())
            .unwrap()
            .run();
        let tracked = MetropolisHastings::new(Linear, Dataset::reference(), small_config())
            .unwrap()
            .run_progress();
        assert_eq!(plain, tracked);
    }

    #[test]
    fn test_zero_target() {
        let config = small_config().set_target(0);
        let run = MetropolisHastings::new(Linear, Dataset::reference(), config)
            .unwrap()
            .run();
        assert_eq!(run.proposals, 0);
        assert!(run.trace.is_empty());
        assert!(matches!(
            run.summary(),
            Err(SamplerError::InsufficientSamples { accepted: 0, burn_in: 500 })
        ));
    }

    #[test]
    fn test_fixed_proposals() {
        let config = small_config().set_stop_policy(StopPolicy::FixedProposals(3_000));
        let run = MetropolisHastings::new(Linear, Dataset::reference(), config)
            .unwrap()
            .run();
        assert_eq!(run.termination, Termination::ProposalsExhausted);
        assert_eq!(run.proposals, 3_000);
        assert_eq!(run.trace.len(), run.accepted);
    }

    #[test]
    fn test_cap_stops_hopeless_chain() {
        // Proposal steps so wide that essentially nothing is accepted.
        let config = small_config()
            .set_proposal_std(1e6, 1e8)
            .set_max_proposals(2_000);
        let run = MetropolisHastings::new(Linear, Dataset::reference(), config)
            .unwrap()
            .run();
        assert_eq!(run.termination, Termination::ProposalCapReached);
        assert_eq!(run.proposals, 2_000);
        assert!(run.accepted < 5_000);
    }

    #[test]
    fn test_huge_target_with_cap() {
        let config = small_config()
            .set_target(usize::MAX / 8)
            .set_max_proposals(10);
        let run = MetropolisHastings::new(Linear, Dataset::reference(), config)
            .unwrap()
            .run();
        assert_eq!(run.termination, Termination::ProposalCapReached);
        assert_eq!(run.proposals, 10);
        assert!(run.accepted <= 10);
    }

    #[test]
    fn test_huge_target_does_not_reserve_it() {
        let config = small_config().set_target(usize::MAX / 8);
        let mh = MetropolisHastings::new(Linear, Dataset::reference(), config).unwrap();
        assert!(mh.trace.capacity() <= MAX_TRACE_PREALLOC);
        assert!(mh.trace().is_empty());
    }

    /// A proposal that always returns the same candidate.
    struct Fixed([f64; 2]);

    impl Proposal for Fixed {
        fn sample<R: Rng + ?Sized>(&self, _current: &[f64; 2], _rng: &mut R) -> [f64; 2] {
            self.0
        }
    }

    #[test]
    fn test_better_candidate_always_accepted() {
        // y = 2x + 1 exactly; the candidate is the exact fit.
        let data = Dataset::new(vec![0.0, 1.0, 2.0], vec![1.0, 3.0, 5.0], vec![1.0; 3]).unwrap();
        let config = SamplerConfig::default()
            .set_initial_state(0.0, 0.0)
            .set_stop_policy(StopPolicy::FixedProposals(3));
        // StepRng(u64::MAX, 0) makes every uniform draw as close to 1 as it gets.
        let mut mh = MetropolisHastings::from_parts(
            Linear,
            Fixed([2.0, 1.0]),
            data,
            config,
            StepRng::new(u64::MAX, 0),
        );
        assert!(mh.step());
        assert_abs_diff_eq!(mh.current_chi_squared(), 0.0, epsilon = 1e-12);
        assert_eq!(mh.current_state(), &[2.0, 1.0]);
        assert_eq!(mh.trace(), &[[2.0, 1.0]]);
    }

    #[test]
    fn test_much_worse_candidate_rejected() {
        let data = Dataset::new(vec![0.0, 1.0, 2.0], vec![1.0, 3.0, 5.0], vec![1.0; 3]).unwrap();
        let config = SamplerConfig::default()
            .set_initial_state(2.0, 1.0)
            .set_stop_policy(StopPolicy::FixedProposals(10));
        let run = MetropolisHastings::from_parts(
            Linear,
            Fixed([200.0, -50.0]),
            data,
            config,
            SmallRng::seed_from_u64(1),
        )
        .run();
        assert_eq!(run.proposals, 10);
        assert_eq!(run.accepted, 0);
        assert_eq!(run.final_state, [2.0, 1.0]);
    }

    #[test]
    fn test_nan_score_is_rejected() {
        let data = Dataset::new(vec![0.0, 1.0], vec![1.0, 3.0], vec![1.0, 1.0]).unwrap();
        let config = SamplerConfig::default()
            .set_initial_state(2.0, 1.0)
            .set_stop_policy(StopPolicy::FixedProposals(5));
        // Every uniform draw is exactly 0, so only a NaN probability can reject.
        let mut mh =
            MetropolisHastings::from_parts(Linear, Fixed([2.0, 1.0]), data, config, StepRng::new(0, 0));
        mh.current_chi = f64::NAN;
        assert!(!mh.step());
        assert_eq!(mh.accepted(), 0);
        assert_eq!(mh.proposals(), 1);

        mh.current_chi = 0.0;
        assert!(mh.step());
    }
}
