use std::time::Duration;

use anyhow::{Context, ensure};
use serde::{Deserialize, de::DeserializeOwned};

pub const ENV_PREFIX: &str = "COVID_AUGSBURG_";

pub const DEFAULT_LOCATION: &str = "Augsburg";
pub const DEFAULT_INCIDENCE_URL: &str =
    "https://www.augsburg.de/umwelt-soziales/gesundheit/coronavirus/fallzahlen";
pub const DEFAULT_VACCINATION_URL: &str =
    "https://www.augsburg.de/umwelt-soziales/gesundheit/coronavirus/impfungen";
pub const DEFAULT_INCIDENCE_CONTAINER_ID: &str = "c1067628";
pub const DEFAULT_CASES_CONTAINER_CLASS: &str = "frame--type-textpic";
pub const DEFAULT_VACCINATION_CONTAINER_ID: &str = "c1072931";
/// Reference population of the current page revision. Older revisions
/// computed their percentages against 299021.
pub const DEFAULT_POPULATION: u64 = 298_014;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_USER_AGENT: &str = concat!("augsburg_covid/", env!("CARGO_PKG_VERSION"));

/// The env vars that can override the built-in crawler settings, each
/// prefixed with [`ENV_PREFIX`].
#[derive(Debug, Deserialize)]
pub struct CrawlerEnv {
    location: Option<String>,
    incidence_url: Option<String>,
    vaccination_url: Option<String>,
    incidence_container_id: Option<String>,
    cases_container_class: Option<String>,
    vaccination_container_id: Option<String>,
    population: Option<u64>,
    request_timeout_secs: Option<u64>,
    user_agent: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlerConfig {
    pub location: String,
    pub incidence_url: String,
    pub vaccination_url: String,
    pub incidence_container_id: String,
    /// Class of the block following the incidence headline that holds the
    /// case counts.
    pub cases_container_class: String,
    pub vaccination_container_id: String,
    pub population: u64,
    pub request_timeout: Duration,
    pub user_agent: String,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            location: DEFAULT_LOCATION.to_string(),
            incidence_url: DEFAULT_INCIDENCE_URL.to_string(),
            vaccination_url: DEFAULT_VACCINATION_URL.to_string(),
            incidence_container_id: DEFAULT_INCIDENCE_CONTAINER_ID.to_string(),
            cases_container_class: DEFAULT_CASES_CONTAINER_CLASS.to_string(),
            vaccination_container_id: DEFAULT_VACCINATION_CONTAINER_ID.to_string(),
            population: DEFAULT_POPULATION,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl CrawlerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let env = CrawlerEnv::load_from_env()?;
        let config = Self::default().with_overrides(env);
        config.validate()?;
        Ok(config)
    }

    fn with_overrides(self, env: CrawlerEnv) -> Self {
        Self {
            location: env.location.unwrap_or(self.location),
            incidence_url: env.incidence_url.unwrap_or(self.incidence_url),
            vaccination_url: env.vaccination_url.unwrap_or(self.vaccination_url),
            incidence_container_id: env
                .incidence_container_id
                .unwrap_or(self.incidence_container_id),
            cases_container_class: env
                .cases_container_class
                .unwrap_or(self.cases_container_class),
            vaccination_container_id: env
                .vaccination_container_id
                .unwrap_or(self.vaccination_container_id),
            population: env.population.unwrap_or(self.population),
            request_timeout: env
                .request_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(self.request_timeout),
            user_agent: env.user_agent.unwrap_or(self.user_agent),
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(self.population > 0, "population must be greater than zero");
        ensure!(
            !self.request_timeout.is_zero(),
            "request timeout must be greater than zero"
        );
        Ok(())
    }
}

// Extension trait.
pub trait LoadFromEnv: DeserializeOwned {
    fn load_from_env() -> anyhow::Result<Self> {
        // Don't throw an error if .env file doesn't exist.
        let _ = dotenv::dotenv();
        let config = envy::prefixed(ENV_PREFIX)
            .from_env::<Self>()
            .context("failed to load env variables into config struct")?;
        Ok(config)
    }
}

impl<T: DeserializeOwned> LoadFromEnv for T {}

#[cfg(test)]
mod tests {
    use super::*;

    fn env_from(pairs: &[(&str, &str)]) -> CrawlerEnv {
        envy::prefixed(ENV_PREFIX)
            .from_iter(
                pairs
                    .iter()
                    .map(|(k, v)| (format!("{ENV_PREFIX}{k}"), v.to_string())),
            )
            .unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = CrawlerConfig::default();
        assert_eq!(config.population, 298_014);
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_overrides() {
        let env = env_from(&[("POPULATION", "299021"), ("REQUEST_TIMEOUT_SECS", "3")]);
        let config = CrawlerConfig::default().with_overrides(env);
        assert_eq!(config.population, 299_021);
        assert_eq!(config.request_timeout, Duration::from_secs(3));
        assert_eq!(config.location, "Augsburg");
    }

    #[test]
    fn test_zero_population_is_rejected() {
        let env = env_from(&[("POPULATION", "0")]);
        let config = CrawlerConfig::default().with_overrides(env);
        assert!(config.validate().is_err());
    }
}
