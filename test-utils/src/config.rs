//! Generator configuration for fake repositories.
//!
//! Tests normally rely on [`FakeConfig::default`]. Setting `FAKE_REPO_SEED` makes every
//! repository built through [`FakeConfig::from_env`] generate the same records, which helps
//! reproduce a failing test.

use thiserror::Error;

/// Number of random records a new repository starts with.
pub const DEFAULT_INITIAL_COUNT: usize = 3;

const SEED_VAR: &str = "FAKE_REPO_SEED";
const COUNT_VAR: &str = "FAKE_REPO_COUNT";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// Environment variable is set but cannot be parsed.
    #[error("Invalid value for environment variable {name}: \"{value}\"")]
    InvalidEnvVar { name: String, value: String },
}

/// Settings applied when a fake repository is constructed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FakeConfig {
    /// Omit back-references in circular record graphs instead of failing.
    pub ignore_circular_references: bool,
    /// Number of random records generated on construction.
    pub initial_count: usize,
    /// Seed for the random generator; `None` seeds from the operating system.
    pub seed: Option<u64>,
}

impl Default for FakeConfig {
    fn default() -> Self {
        Self {
            ignore_circular_references: false,
            initial_count: DEFAULT_INITIAL_COUNT,
            seed: None,
        }
    }
}

impl FakeConfig {
    /// Creates a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads overrides for the defaults from the environment.
    ///
    /// - `FAKE_REPO_SEED` - seed for the random generator
    /// - `FAKE_REPO_COUNT` - number of records generated on construction
    ///
    /// Unset variables keep their default.
    ///
    /// # Returns
    /// - `Ok(FakeConfig)` - Configuration with environment overrides applied
    /// - `Err(ConfigError::InvalidEnvVar)` - A variable is set to an unparsable value
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(seed) = parse_env_var::<u64>(SEED_VAR)? {
            config.seed = Some(seed);
        }
        if let Some(count) = parse_env_var::<usize>(COUNT_VAR)? {
            config.initial_count = count;
        }

        Ok(config)
    }

    /// Sets the circular reference policy.
    pub fn ignore_circular_references(mut self, ignore: bool) -> Self {
        self.ignore_circular_references = ignore;
        self
    }

    /// Sets the number of random records generated on construction.
    pub fn initial_count(mut self, count: usize) -> Self {
        self.initial_count = count;
        self
    }

    /// Seeds the random generator.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

fn parse_env_var<T: std::str::FromStr>(name: &str) -> Result<Option<T>, ConfigError> {
    match std::env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidEnvVar {
                name: name.to_string(),
                value,
            }),
        Err(_) => Ok(None),
    }
}

/// Environment variables set for the duration of a test.
///
/// Holds a process-wide lock so tests reading `FAKE_REPO_*` never observe each other's values,
/// and removes the variables again on drop.
#[cfg(test)]
pub(crate) struct ScopedEnv {
    names: Vec<&'static str>,
    _lock: std::sync::MutexGuard<'static, ()>,
}

#[cfg(test)]
impl ScopedEnv {
    pub(crate) fn set(vars: &[(&'static str, &str)]) -> Self {
        static LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

        let lock = LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        for name in [SEED_VAR, COUNT_VAR] {
            std::env::remove_var(name);
        }
        for (name, value) in vars {
            std::env::set_var(name, value);
        }

        Self {
            names: vars.iter().map(|(name, _)| *name).collect(),
            _lock: lock,
        }
    }
}

#[cfg(test)]
impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for name in &self.names {
            std::env::remove_var(name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = FakeConfig::default();

        assert!(!config.ignore_circular_references);
        assert_eq!(config.initial_count, 3);
        assert!(config.seed.is_none());
    }

    #[test]
    fn setters_override_defaults() {
        let config = FakeConfig::new()
            .ignore_circular_references(true)
            .initial_count(0)
            .seed(7);

        assert!(config.ignore_circular_references);
        assert_eq!(config.initial_count, 0);
        assert_eq!(config.seed, Some(7));
    }

    #[test]
    fn from_env_reads_seed_and_count() -> Result<(), ConfigError> {
        let _env = ScopedEnv::set(&[(SEED_VAR, "42"), (COUNT_VAR, " 5 ")]);

        let config = FakeConfig::from_env()?;

        assert_eq!(config.seed, Some(42));
        assert_eq!(config.initial_count, 5);
        assert!(!config.ignore_circular_references);

        Ok(())
    }

    #[test]
    fn from_env_without_vars_uses_defaults() -> Result<(), ConfigError> {
        let _env = ScopedEnv::set(&[]);

        assert_eq!(FakeConfig::from_env()?, FakeConfig::default());

        Ok(())
    }

    #[test]
    fn from_env_rejects_negative_count() {
        let _env = ScopedEnv::set(&[(COUNT_VAR, "-1")]);

        assert_eq!(
            FakeConfig::from_env(),
            Err(ConfigError::InvalidEnvVar {
                name: COUNT_VAR.to_string(),
                value: "-1".to_string(),
            })
        );
    }

    #[test]
    fn rejects_unparsable_env_value() {
        let name = "FAKE_REPO_TEST_UNPARSABLE";
        let _env = ScopedEnv::set(&[(name, "three")]);

        let result = parse_env_var::<usize>(name);

        assert_eq!(
            result,
            Err(ConfigError::InvalidEnvVar {
                name: name.to_string(),
                value: "three".to_string(),
            })
        );
    }

    #[test]
    fn unset_env_var_keeps_default() {
        let result = parse_env_var::<u64>("FAKE_REPO_TEST_NEVER_SET");

        assert_eq!(result, Ok(None));
    }
}
