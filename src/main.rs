//! Fits the reference data set and prints the acceptance statistics, the
//! posterior means of `a` and `b`, and the elapsed time.
//!
//! Optional overrides are read from the environment: `LINFIT_SEED`,
//! `LINFIT_TARGET`, `LINFIT_BURN_IN`, `LINFIT_MAX_PROPOSALS` and, with the
//! `csv` feature, `LINFIT_TRACE_CSV`. Log output is controlled by `RUST_LOG`.

use std::env;
use std::str::FromStr;

use anyhow::{Context, Result};

use linfit_mcmc::config::SamplerConfig;
use linfit_mcmc::dataset::Dataset;
use linfit_mcmc::metropolis_hastings::MetropolisHastings;
use linfit_mcmc::model::Linear;
use linfit_mcmc::timer::Timer;

/// Everything the environment can override.
#[derive(Debug, Clone, PartialEq)]
struct Overrides {
    config: SamplerConfig,
    trace_csv: Option<String>,
}

fn env_lookup(name: &str) -> Result<Option<String>> {
    match env::var(name) {
        Ok(value) => Ok(Some(value)),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(err) => Err(err).with_context(|| format!("cannot read {name}")),
    }
}

fn parse_var<T, F>(lookup: &F, name: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Result<Option<String>>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(name)? {
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("invalid value {value:?} for {name}")),
        None => Ok(None),
    }
}

/// Reads all overrides up front so a bad setting fails before any sampling.
fn overrides_from<F>(lookup: F) -> Result<Overrides>
where
    F: Fn(&str) -> Result<Option<String>>,
{
    let mut config = SamplerConfig::default();
    if let Some(seed) = parse_var(&lookup, "LINFIT_SEED")? {
        config = config.set_seed(seed);
    }
    if let Some(target) = parse_var(&lookup, "LINFIT_TARGET")? {
        config = config.set_target(target);
    }
    if let Some(burn_in) = parse_var(&lookup, "LINFIT_BURN_IN")? {
        config = config.set_burn_in(burn_in);
    }
    if let Some(cap) = parse_var(&lookup, "LINFIT_MAX_PROPOSALS")? {
        config = config.set_max_proposals(cap);
    }

    let trace_csv: Option<String> = parse_var(&lookup, "LINFIT_TRACE_CSV")?;
    if trace_csv.is_some() && !cfg!(feature = "csv") {
        anyhow::bail!("LINFIT_TRACE_CSV needs the `csv` feature");
    }
    Ok(Overrides { config, trace_csv })
}

fn main() -> Result<()> {
    env_logger::builder()
        .format_module_path(true)
        .target(env_logger::Target::Stderr)
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .init();

    let mut timer = Timer::new();
    let Overrides { config, trace_csv } = overrides_from(env_lookup)?;
    log::debug!("configuration: {:?}", config);

    let mh = MetropolisHastings::new(Linear, Dataset::reference(), config)
        .context("failed to set up the sampler")?;
    log::info!("seed {:?}", mh.seed);
    let run = mh.run_progress();
    timer.log("sampling");

    #[cfg(feature = "csv")]
    {
        if let Some(path) = &trace_csv {
            linfit_mcmc::io::csv::save_trace(&run, path)
                .with_context(|| format!("failed to save trace to {path}"))?;
            log::info!("trace written to {}", path);
        }
    }
    #[cfg(not(feature = "csv"))]
    let _ = trace_csv;

    let summary = run.summary().context("failed to summarise the trace")?;
    println!("{summary}");
    println!("elapsed: {:.3?}", timer.elapsed());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use linfit_mcmc::core::StopPolicy;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Result<Option<String>> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| Ok(vars.get(name).cloned())
    }

    #[test]
    fn test_no_overrides_gives_defaults() {
        let overrides = overrides_from(lookup(&[])).unwrap();
        assert_eq!(overrides.config, SamplerConfig::default());
        assert_eq!(overrides.trace_csv, None);
    }

    #[test]
    fn test_valid_overrides() {
        let overrides = overrides_from(lookup(&[
            ("LINFIT_SEED", "42"),
            ("LINFIT_TARGET", " 20000 "),
            ("LINFIT_BURN_IN", "500"),
            ("LINFIT_MAX_PROPOSALS", "100000"),
        ]))
        .unwrap();
        assert_eq!(overrides.config.seed, Some(42));
        assert_eq!(overrides.config.burn_in, 500);
        assert_eq!(
            overrides.config.stop_policy,
            StopPolicy::AcceptedTarget {
                target: 20_000,
                max_proposals: Some(100_000)
            }
        );
    }

    #[test]
    fn test_malformed_value_is_an_error() {
        let err = overrides_from(lookup(&[("LINFIT_TARGET", "lots")])).unwrap_err();
        assert!(err.to_string().contains("LINFIT_TARGET"), "{err}");

        assert!(overrides_from(lookup(&[("LINFIT_SEED", "-1")])).is_err());
        assert!(overrides_from(lookup(&[("LINFIT_BURN_IN", "")])).is_err());
    }

    #[test]
    fn test_lookup_failure_is_an_error() {
        let failing = |_: &str| -> Result<Option<String>> { anyhow::bail!("unreadable") };
        assert!(overrides_from(failing).is_err());
    }

    #[test]
    fn test_trace_csv_checked_up_front() {
        let result = overrides_from(lookup(&[("LINFIT_TRACE_CSV", "/tmp/trace.csv")]));
        if cfg!(feature = "csv") {
            assert_eq!(
                result.unwrap().trace_csv.as_deref(),
                Some("/tmp/trace.csv")
            );
        } else {
            assert!(result.is_err());
        }
    }
}
