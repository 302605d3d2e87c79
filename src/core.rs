use indicatif::{ProgressBar, ProgressStyle};
use ndarray::Array2;

use crate::error::Result;
use crate::stats::Summary;

/// Number of proposals between two progress bar refreshes.
const PROGRESS_STRIDE: u64 = 1 << 12;

pub trait MarkovChain {
    /// Proposes one move and returns whether it was accepted.
    fn step(&mut self) -> bool;

    /// The current `(a, b)` position of the chain.
    fn current_state(&self) -> &[f64; 2];

    /// Accepted proposals so far.
    fn accepted(&self) -> usize;

    /// Proposals made so far, accepted or not.
    fn proposals(&self) -> u64;
}

/// When to stop proposing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopPolicy {
    /// Stop once `target` proposals have been accepted. `max_proposals` caps
    /// the total number of proposals; without it a chain with a tiny
    /// acceptance rate runs for as long as it takes.
    AcceptedTarget {
        target: usize,
        max_proposals: Option<u64>,
    },
    /// Stop after exactly this many proposals.
    FixedProposals(u64),
}

impl Default for StopPolicy {
    fn default() -> Self {
        Self::AcceptedTarget {
            target: 500_000,
            max_proposals: None,
        }
    }
}

/// Why a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    TargetReached,
    ProposalCapReached,
    ProposalsExhausted,
}

impl StopPolicy {
    /// Returns `Some` once a chain with these counts must stop.
    pub fn check(&self, accepted: usize, proposals: u64) -> Option<Termination> {
        match *self {
            Self::AcceptedTarget {
                target,
                max_proposals,
            } => {
                if accepted >= target {
                    Some(Termination::TargetReached)
                } else if max_proposals.is_some_and(|cap| proposals >= cap) {
                    Some(Termination::ProposalCapReached)
                } else {
                    None
                }
            }
            Self::FixedProposals(n) => (proposals >= n).then_some(Termination::ProposalsExhausted),
        }
    }

    /// Length and current position of a progress bar for this policy.
    fn progress(&self, accepted: usize, proposals: u64) -> (u64, u64) {
        match *self {
            Self::AcceptedTarget { target, .. } => (target as u64, accepted as u64),
            Self::FixedProposals(n) => (n, proposals),
        }
    }
}

pub fn run_chain<M: MarkovChain>(chain: &mut M, policy: &StopPolicy) -> Termination {
    loop {
        if let Some(termination) = policy.check(chain.accepted(), chain.proposals()) {
            return termination;
        }
        chain.step();
    }
}

pub fn run_chain_with_progress<M: MarkovChain>(
    chain: &mut M,
    policy: &StopPolicy,
    pb: &ProgressBar,
) -> Termination {
    let (len, pos) = policy.progress(chain.accepted(), chain.proposals());
    pb.set_length(len);
    pb.set_position(pos);

    let termination = loop {
        if let Some(termination) = policy.check(chain.accepted(), chain.proposals()) {
            break termination;
        }
        chain.step();
        if chain.proposals() % PROGRESS_STRIDE == 0 {
            let (_, pos) = policy.progress(chain.accepted(), chain.proposals());
            pb.set_position(pos);
            pb.set_message(format!("{} proposals", chain.proposals()));
        }
    };

    let (_, pos) = policy.progress(chain.accepted(), chain.proposals());
    pb.set_position(pos);
    termination
}

pub(crate) fn progress_bar() -> ProgressBar {
    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
            .expect("Expected progress bar template to parse")
            .progress_chars("##-"),
    );
    pb
}

/// The outcome of one sampling run.
#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    /// Accepted `(a, b)` pairs in acceptance order. The starting point is not included.
    pub trace: Vec<[f64; 2]>,
    pub accepted: usize,
    pub proposals: u64,
    pub burn_in: usize,
    pub termination: Termination,
    pub final_state: [f64; 2],
    pub final_chi_squared: f64,
}

impl Run {
    /// `accepted / proposals`, or 0 when nothing was proposed.
    pub fn acceptance_ratio(&self) -> f64 {
        if self.proposals == 0 {
            0.0
        } else {
            self.accepted as f64 / self.proposals as f64
        }
    }

    /// The trace as a `samples × 2` array, columns `a` and `b`.
    pub fn trace_array(&self) -> Array2<f64> {
        Array2::from_shape_fn((self.trace.len(), 2), |(i, j)| self.trace[i][j])
    }

    /// Post-burn-in statistics; fails unless more than `burn_in` samples were accepted.
    pub fn summary(&self) -> Result<Summary> {
        Summary::new(self)
    }
}
