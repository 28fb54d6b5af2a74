//! Runtime settings read from the environment (and an optional `.env` file).

use std::path::PathBuf;
use std::str::FromStr;

use crate::error::AppError;
use crate::models::{DEFAULT_SEED, DEFAULT_TRAINING_SAMPLES, TrainingConfig};

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Deployment label, only logged.
    pub env: String,
    pub audit_log: PathBuf,
    pub customer_store: PathBuf,
    pub training: TrainingConfig,
    /// Fallback `tracing` filter when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            env: "local".to_string(),
            audit_log: PathBuf::from("insure_audit.ndjson"),
            customer_store: PathBuf::from("insure_customers.json"),
            training: TrainingConfig {
                seed: DEFAULT_SEED,
                samples: DEFAULT_TRAINING_SAMPLES,
            },
            log_filter: "info".to_string(),
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup; unset keys keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let mut cfg = Self::default();

        if let Some(v) = lookup("INSURE_ENV") {
            cfg.env = v;
        }
        if let Some(v) = lookup("INSURE_AUDIT_LOG") {
            cfg.audit_log = PathBuf::from(v);
        }
        if let Some(v) = lookup("INSURE_CUSTOMER_STORE") {
            cfg.customer_store = PathBuf::from(v);
        }
        if let Some(v) = lookup("INSURE_MODEL_SEED") {
            cfg.training.seed = parse("INSURE_MODEL_SEED", &v)?;
        }
        if let Some(v) = lookup("INSURE_TRAINING_SAMPLES") {
            cfg.training.samples = parse("INSURE_TRAINING_SAMPLES", &v)?;
        }
        if let Some(v) = lookup("INSURE_LOG") {
            cfg.log_filter = v;
        }

        Ok(cfg)
    }
}

fn parse<T: FromStr>(key: &str, raw: &str) -> Result<T, AppError>
where
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| AppError::new(2, format!("Invalid {key}='{raw}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let cfg = Settings::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg, Settings::default());
        assert_eq!(cfg.training, TrainingConfig::default());
    }

    #[test]
    fn overrides_are_applied() {
        let cfg = Settings::from_lookup(lookup(&[
            ("INSURE_ENV", "staging"),
            ("INSURE_AUDIT_LOG", "/tmp/a.ndjson"),
            ("INSURE_MODEL_SEED", " 7 "),
            ("INSURE_TRAINING_SAMPLES", "250"),
            ("INSURE_LOG", "debug"),
        ]))
        .unwrap();
        assert_eq!(cfg.env, "staging");
        assert_eq!(cfg.audit_log, PathBuf::from("/tmp/a.ndjson"));
        assert_eq!(cfg.training, TrainingConfig { seed: 7, samples: 250 });
        assert_eq!(cfg.log_filter, "debug");
        assert_eq!(cfg.customer_store, PathBuf::from("insure_customers.json"));
    }

    #[test]
    fn unparseable_number_is_a_config_error() {
        let err = Settings::from_lookup(lookup(&[("INSURE_TRAINING_SAMPLES", "lots")])).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("INSURE_TRAINING_SAMPLES"));
    }
}
