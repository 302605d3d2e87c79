/*!
# Saving Traces to CSV

Writes the accepted samples of a [`Run`] to a CSV file. Enable via the `csv` feature.
*/

use std::fs::File;
use std::io::Write;
use std::path::Path;

use csv::Writer;

use crate::core::Run;
use crate::error::Result;

/**
Saves the trace of `run` as CSV.

The file has a header row `sample,burn_in,a,b` followed by one row per accepted
sample in acceptance order. `burn_in` is `true` for the rows the summary discards.

# Examples

```rust
use linfit_mcmc::config::SamplerConfig;
use linfit_mcmc::dataset::Dataset;
use linfit_mcmc::io::csv::save_trace;
use linfit_mcmc::metropolis_hastings::MetropolisHastings;
use linfit_mcmc::model::Linear;

let config = SamplerConfig::default().set_seed(1).set_target(10).set_burn_in(2);
let run = MetropolisHastings::new(Linear, Dataset::reference(), config).unwrap().run();
save_trace(&run, "/tmp/trace.csv").expect("Expecting saving the trace to succeed");
```
*/
pub fn save_trace<P: AsRef<Path>>(run: &Run, filename: P) -> Result<()> {
    write_trace(run, File::create(filename)?)
}

/// Writes the trace as CSV to any writer.
pub fn write_trace<W: Write>(run: &Run, writer: W) -> Result<()> {
    let mut wtr = Writer::from_writer(writer);
    wtr.write_record(["sample", "burn_in", "a", "b"])?;
    for (i, [a, b]) in run.trace.iter().enumerate() {
        wtr.write_record(&[
            i.to_string(),
            (i < run.burn_in).to_string(),
            a.to_string(),
            b.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}
