use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{Result, SweepError};

pub const DEFAULT_BASE_URL: &str = "https://sert-reestr.net/ss_product_";
pub const DEFAULT_ID_WIDTH: usize = 6;
pub const DEFAULT_TOTAL_DOCUMENTS: u32 = 60_000;
pub const DEFAULT_BATCH_SIZE: usize = 100;
pub const DEFAULT_DATE_FORMAT: &str = "%d.%m.%Y";
pub const DEFAULT_VALID_PATH: &str = "valid_documents.txt";
pub const DEFAULT_ERRORS_PATH: &str = "errors.txt";

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    pub registry: RegistryConfig,
    pub sweep: SweepConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct RegistryConfig {
    pub base_url: String,
    pub id_width: usize,
    pub user_agent: Option<String>,
    /// Unset leaves the client's own default in charge.
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SweepConfig {
    pub total_documents: u32,
    pub batch_size: usize,
    pub date_format: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct OutputConfig {
    pub valid_path: String,
    pub errors_path: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            registry: RegistryConfig {
                base_url: DEFAULT_BASE_URL.to_string(),
                id_width: DEFAULT_ID_WIDTH,
                user_agent: None,
                timeout_secs: None,
            },
            sweep: SweepConfig {
                total_documents: DEFAULT_TOTAL_DOCUMENTS,
                batch_size: DEFAULT_BATCH_SIZE,
                date_format: DEFAULT_DATE_FORMAT.to_string(),
            },
            output: OutputConfig {
                valid_path: DEFAULT_VALID_PATH.to_string(),
                errors_path: DEFAULT_ERRORS_PATH.to_string(),
            },
        }
    }
}

impl Config {
    /// Load defaults, then the optional file at `path`, then `SERT_*` env vars.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        dotenv::dotenv().ok();

        let config = config::Config::builder()
            .set_default("registry.base_url", DEFAULT_BASE_URL)?
            .set_default("registry.id_width", DEFAULT_ID_WIDTH as i64)?
            .set_default("sweep.total_documents", DEFAULT_TOTAL_DOCUMENTS as i64)?
            .set_default("sweep.batch_size", DEFAULT_BATCH_SIZE as i64)?
            .set_default("sweep.date_format", DEFAULT_DATE_FORMAT)?
            .set_default("output.valid_path", DEFAULT_VALID_PATH)?
            .set_default("output.errors_path", DEFAULT_ERRORS_PATH)?
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("SERT")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Config = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.sweep.batch_size == 0 {
            return Err(SweepError::Config("sweep.batch_size must be at least 1".to_string()));
        }
        if self.registry.id_width == 0 {
            return Err(SweepError::Config("registry.id_width must be at least 1".to_string()));
        }
        if self.registry.base_url.trim().is_empty() {
            return Err(SweepError::Config("registry.base_url is empty".to_string()));
        }
        if self.sweep.date_format.trim().is_empty() {
            return Err(SweepError::Config("sweep.date_format is empty".to_string()));
        }
        Ok(())
    }
}

impl RegistryConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}
