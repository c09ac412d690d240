//! Runtime configuration for kernel and assignment selection
//!
//! The thresholds that decide between serial and parallel assignment, and
//! the switch that disables vectorized kernels, live in one
//! [`ReduceConfig`]. A process-wide instance is installed once (from
//! defaults, JSON or environment variables) and read by the dispatcher.

use crate::{Error, Result};
use serde::Deserialize;
use std::sync::OnceLock;

/// Default result size above which a reduction is considered worth
/// parallelizing
pub const DEFAULT_SMP_THRESHOLD: usize = 330;

const ENV_SMP_THRESHOLD: &str = "MATREDUCE_SMP_THRESHOLD";
const ENV_SIMD: &str = "MATREDUCE_SIMD";
const ENV_USE_PADDING: &str = "MATREDUCE_USE_PADDING";
const ENV_NUM_THREADS: &str = "MATREDUCE_NUM_THREADS";

static CONFIG: OnceLock<ReduceConfig> = OnceLock::new();

/// Whether vectorized kernels may be selected
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SimdMode {
    /// Use SIMD kernels whenever the operand and operation allow it
    #[default]
    Auto,
    /// Always use the scalar kernel
    Disable,
}

impl SimdMode {
    pub fn is_disabled(self) -> bool {
        matches!(self, SimdMode::Disable)
    }

    fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "auto" | "1" | "on" => Ok(SimdMode::Auto),
            "disable" | "disabled" | "0" | "off" => Ok(SimdMode::Disable),
            other => Err(Error::Config(format!("unknown SIMD mode '{other}'"))),
        }
    }
}

/// Configuration consulted by the evaluation-strategy dispatcher
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ReduceConfig {
    /// Result size above which `can_smp_assign` reports true
    pub smp_threshold: usize,
    /// SIMD kernel selection mode
    pub simd: SimdMode,
    /// Allow kernels to read padding instead of running scalar remainders
    pub use_padding: bool,
    /// Thread count for engines built from this configuration
    pub num_threads: usize,
}

impl Default for ReduceConfig {
    fn default() -> Self {
        Self {
            smp_threshold: DEFAULT_SMP_THRESHOLD,
            simd: SimdMode::Auto,
            use_padding: true,
            num_threads: num_cpus::get(),
        }
    }
}

impl ReduceConfig {
    /// Parse a configuration from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()
    }

    /// Build a configuration from `MATREDUCE_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(value) = lookup(ENV_SMP_THRESHOLD) {
            config.smp_threshold = parse_usize(ENV_SMP_THRESHOLD, &value)?;
        }
        if let Some(value) = lookup(ENV_SIMD) {
            config.simd = SimdMode::parse(&value)?;
        }
        if let Some(value) = lookup(ENV_USE_PADDING) {
            config.use_padding = match value.trim() {
                "1" | "true" | "on" => true,
                "0" | "false" | "off" => false,
                other => {
                    return Err(Error::Config(format!(
                        "{ENV_USE_PADDING} must be a boolean, got '{other}'"
                    )))
                }
            };
        }
        if let Some(value) = lookup(ENV_NUM_THREADS) {
            config.num_threads = parse_usize(ENV_NUM_THREADS, &value)?;
        }
        config.validate()
    }

    fn validate(self) -> Result<Self> {
        if self.num_threads == 0 {
            return Err(Error::InvalidParameter(
                "num_threads must be at least 1".to_string(),
            ));
        }
        Ok(self)
    }
}

fn parse_usize(key: &str, value: &str) -> Result<usize> {
    value
        .trim()
        .parse()
        .map_err(|e| Error::Config(format!("{key}: {e}")))
}

/// Install the process-wide configuration
///
/// Fails if a configuration has already been installed or read.
pub fn install(config: ReduceConfig) -> Result<()> {
    log::debug!("installing reduce configuration: {config:?}");
    CONFIG
        .set(config)
        .map_err(|_| Error::Config("configuration already installed".to_string()))
}

/// The process-wide configuration
///
/// The first read without a prior [`install`] loads the environment; an
/// invalid environment falls back to the defaults.
pub fn current() -> &'static ReduceConfig {
    CONFIG.get_or_init(|| match ReduceConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::warn!("ignoring invalid environment configuration: {e}");
            ReduceConfig::default()
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ReduceConfig::default();
        assert_eq!(config.smp_threshold, 330);
        assert_eq!(config.simd, SimdMode::Auto);
        assert!(config.use_padding);
        assert!(config.num_threads >= 1);
    }

    #[test]
    fn test_from_json_partial() {
        let config = ReduceConfig::from_json(r#"{ "smp_threshold": 1000, "simd": "disable" }"#)
            .unwrap();
        assert_eq!(config.smp_threshold, 1000);
        assert!(config.simd.is_disabled());
        assert!(config.use_padding);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(
            ReduceConfig::from_json("{ smp_threshold: }"),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            ReduceConfig::from_json(r#"{ "num_threads": 0 }"#),
            Err(Error::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_from_lookup() {
        let config = ReduceConfig::from_lookup(lookup(&[
            (ENV_SMP_THRESHOLD, "12"),
            (ENV_SIMD, "off"),
            (ENV_USE_PADDING, "false"),
            (ENV_NUM_THREADS, "3"),
        ]))
        .unwrap();
        assert_eq!(config.smp_threshold, 12);
        assert_eq!(config.simd, SimdMode::Disable);
        assert!(!config.use_padding);
        assert_eq!(config.num_threads, 3);
    }

    #[test]
    fn test_from_lookup_errors() {
        assert!(ReduceConfig::from_lookup(lookup(&[(ENV_SIMD, "sometimes")])).is_err());
        assert!(ReduceConfig::from_lookup(lookup(&[(ENV_SMP_THRESHOLD, "-1")])).is_err());
        assert!(ReduceConfig::from_lookup(lookup(&[(ENV_USE_PADDING, "maybe")])).is_err());
    }

    #[test]
    fn test_current_is_stable() {
        let a = current() as *const ReduceConfig;
        let b = current() as *const ReduceConfig;
        assert_eq!(a, b);
    }
}
