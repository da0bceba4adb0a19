//! CU-CP configuration structures
//!
//! Configuration is loaded from YAML and validated before the controller is
//! constructed. All fields carry defaults so a minimal file (or an empty
//! document) yields a working configuration.

use crate::error::Error;
use serde::{Deserialize, Serialize};

/// Admission limits for peer connections.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdmissionConfig {
    /// Maximum number of concurrently connected DUs.
    pub max_nof_dus: usize,
    /// Maximum number of concurrently connected CU-UPs.
    pub max_nof_cu_ups: usize,
}

impl Default for AdmissionConfig {
    fn default() -> Self {
        Self {
            max_nof_dus: 8,
            max_nof_cu_ups: 4,
        }
    }
}

/// Task executor settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutorConfig {
    /// Bounded work queue capacity per executor.
    pub queue_size: usize,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self { queue_size: 256 }
    }
}

/// Retry policy for transient dispatch failures (destination queue full).
///
/// Retries use exponential backoff starting at `initial_delay_ms`, doubling
/// per attempt, and give up after `max_attempts`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchRetryConfig {
    /// Maximum number of dispatch attempts before reporting an error.
    pub max_attempts: u32,
    /// Delay before the first retry, in milliseconds.
    pub initial_delay_ms: u64,
}

impl Default for DispatchRetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 8,
            initial_delay_ms: 10,
        }
    }
}

/// Top-level CU-CP configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CuCpConfig {
    /// CU-CP node name, used in logs.
    pub name: Option<String>,
    /// Peer admission limits.
    pub admission: AdmissionConfig,
    /// Executor queue settings.
    pub executor: ExecutorConfig,
    /// Dispatch retry policy.
    pub dispatch_retry: DispatchRetryConfig,
}

/// Loads a CU-CP configuration from a YAML string.
pub fn load_cu_cp_config_from_str(contents: &str) -> Result<CuCpConfig, Error> {
    let config: CuCpConfig = serde_yaml::from_str(contents)?;
    Ok(config)
}

/// Loads a CU-CP configuration from a YAML file.
pub fn load_cu_cp_config(path: &str) -> Result<CuCpConfig, Error> {
    let contents = std::fs::read_to_string(path)?;
    load_cu_cp_config_from_str(&contents)
}

/// Validates a CU-CP configuration.
pub fn validate_cu_cp_config(config: &CuCpConfig) -> Result<(), Error> {
    if config.admission.max_nof_dus == 0 {
        return Err(Error::Config("admission.max_nof_dus must be > 0".into()));
    }
    if config.admission.max_nof_cu_ups == 0 {
        return Err(Error::Config("admission.max_nof_cu_ups must be > 0".into()));
    }
    if config.executor.queue_size == 0 {
        return Err(Error::Config("executor.queue_size must be > 0".into()));
    }
    if config.dispatch_retry.max_attempts == 0 {
        return Err(Error::Config(
            "dispatch_retry.max_attempts must be > 0".into(),
        ));
    }
    Ok(())
}

/// Loads and validates a CU-CP configuration in one step.
pub fn load_and_validate_cu_cp_config(path: &str) -> Result<CuCpConfig, Error> {
    let config = load_cu_cp_config(path)?;
    validate_cu_cp_config(&config)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CuCpConfig::default();
        assert_eq!(config.admission.max_nof_dus, 8);
        assert_eq!(config.admission.max_nof_cu_ups, 4);
        assert_eq!(config.executor.queue_size, 256);
        assert_eq!(config.dispatch_retry.max_attempts, 8);
        assert!(validate_cu_cp_config(&config).is_ok());
    }

    #[test]
    fn test_load_from_str() {
        let yaml = r"
name: cu-cp-test
admission:
  max_nof_dus: 2
  max_nof_cu_ups: 1
executor:
  queue_size: 64
";
        let config = load_cu_cp_config_from_str(yaml).unwrap();
        assert_eq!(config.name.as_deref(), Some("cu-cp-test"));
        assert_eq!(config.admission.max_nof_dus, 2);
        assert_eq!(config.admission.max_nof_cu_ups, 1);
        assert_eq!(config.executor.queue_size, 64);
        // Unspecified section falls back to defaults
        assert_eq!(config.dispatch_retry.max_attempts, 8);
    }

    #[test]
    fn test_validation_rejects_zero_limits() {
        let mut config = CuCpConfig::default();
        config.admission.max_nof_dus = 0;
        assert!(validate_cu_cp_config(&config).is_err());

        let mut config = CuCpConfig::default();
        config.executor.queue_size = 0;
        assert!(validate_cu_cp_config(&config).is_err());

        let mut config = CuCpConfig::default();
        config.dispatch_retry.max_attempts = 0;
        assert!(validate_cu_cp_config(&config).is_err());
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = load_cu_cp_config_from_str("{}").unwrap();
        assert!(validate_cu_cp_config(&config).is_ok());
    }
}
