/*!
Fit `y = a * x + b` to a small data set with a single-chain Metropolis–Hastings
sampler scored by chi-squared.

```rust
use linfit_mcmc::config::SamplerConfig;
use linfit_mcmc::dataset::Dataset;
use linfit_mcmc::metropolis_hastings::MetropolisHastings;
use linfit_mcmc::model::Linear;

let config = SamplerConfig::default().set_seed(7).set_target(3_000).set_burn_in(500);
let run = MetropolisHastings::new(Linear, Dataset::reference(), config)?.run();
println!("{}", run.summary()?);
# Ok::<(), linfit_mcmc::error::SamplerError>(())
```
*/

pub mod config;
pub mod core;
pub mod dataset;
pub mod distributions;
pub mod error;
pub mod io;
pub mod metropolis_hastings;
pub mod model;
pub mod stats;
pub mod timer;

pub use error::{Result, SamplerError};
