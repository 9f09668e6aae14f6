use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;

use crate::reminders::scheduler::DEFAULT_SWEEP_INTERVAL;

/// Runtime settings for the worker, read from the environment.
///
/// - `INVOTRACK_DATA_DIR`: directory holding `invoices.json` (default: `./data`)
/// - `INVOTRACK_SWEEP_INTERVAL_SECONDS`: seconds between due-date sweeps (default: 3600)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerConfig {
    pub data_dir: PathBuf,
    pub sweep_interval: Duration,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
        }
    }
}

impl TrackerConfig {
    /// Loads `.env` (if present) and reads the process environment.
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let data_dir = lookup("INVOTRACK_DATA_DIR")
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dir);

        let sweep_interval = match lookup("INVOTRACK_SWEEP_INTERVAL_SECONDS") {
            Some(raw) => {
                let secs = raw
                    .trim()
                    .parse::<u64>()
                    .with_context(|| format!("Invalid INVOTRACK_SWEEP_INTERVAL_SECONDS: {}", raw))?;
                if secs == 0 {
                    anyhow::bail!("INVOTRACK_SWEEP_INTERVAL_SECONDS must be greater than zero");
                }
                Duration::from_secs(secs)
            }
            None => defaults.sweep_interval,
        };

        Ok(Self {
            data_dir,
            sweep_interval,
        })
    }
}
