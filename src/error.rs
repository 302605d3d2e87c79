//! Error type shared by the data set, sampler and summary code.

use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SamplerError {
    #[error("data set columns differ in length: x={x}, y={y}, sigma={sigma}")]
    LengthMismatch { x: usize, y: usize, sigma: usize },

    #[error("data set is empty")]
    EmptyDataset,

    /// A per-point variance that is zero, negative or not finite.
    #[error("invalid variance {value} at point {index}")]
    InvalidVariance { index: usize, value: f64 },

    #[error("invalid proposal standard deviation {value} for parameter {param}")]
    InvalidProposalScale { param: &'static str, value: f64 },

    #[error("cannot summarise trace: {accepted} accepted samples, burn-in discards {burn_in}")]
    InsufficientSamples { accepted: usize, burn_in: usize },

    #[error("least-squares design is singular; x values need at least two distinct points")]
    DegenerateDesign,

    #[error("failed to write trace")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "csv")]
    #[error("failed to encode trace as csv")]
    Csv(#[from] csv::Error),
}

pub type Result<T, E = SamplerError> = std::result::Result<T, E>;
