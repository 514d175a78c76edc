use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;
use crate::config::{PlausibilityConfig, ScheduleConfig, SourceConfig};
use crate::error::{Error, Result};
use ::config::{Config, Environment, File};
use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_history_path")]
    pub history_path: PathBuf,
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub plausibility: PlausibilityConfig,
    pub adapter_timeout_secs: Option<u64>,
    #[serde(default)]
    pub log_json: bool,
    pub sources: Vec<SourceConfig>,
}

fn default_history_path() -> PathBuf {
    PathBuf::from("data/processed/tipo_cambio_historico.csv")
}

impl AppConfig {
    pub fn load(env: &str) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::with_name("config/default"))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("FXINFRA"))
            .build()
            .map_err(|e| Error::ConfigError(e.to_string()))?;

        Self::from_config(config)
    }

    pub fn from_config(config: Config) -> Result<Self> {
        let app: AppConfig = config.try_deserialize()
            .map_err(|e| Error::ConfigError(e.to_string()))?;
        app.validate()?;
        Ok(app)
    }

    pub fn validate(&self) -> Result<()> {
        if self.sources.is_empty() {
            return Err(Error::NoSourcesConfigured);
        }

        let mut seen = HashSet::new();
        for source in &self.sources {
            if !seen.insert(&source.source_id) {
                return Err(Error::DuplicateSource(source.source_id.to_string()));
            }
        }

        if self.plausibility.min >= self.plausibility.max {
            return Err(Error::ConfigError(format!(
                "plausibility.min ({}) must be below plausibility.max ({})",
                self.plausibility.min, self.plausibility.max
            )));
        }

        if self.schedule.interval_secs == 0 {
            return Err(Error::ConfigError("schedule.interval_secs must be positive".to_string()));
        }

        Ok(())
    }

    pub fn adapter_timeout(&self) -> Option<Duration> {
        self.adapter_timeout_secs.map(Duration::from_secs)
    }

    pub fn schedule_interval(&self) -> Duration {
        Duration::from_secs(self.schedule.interval_secs)
    }
}
