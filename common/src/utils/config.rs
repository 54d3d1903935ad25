use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::AppError;

#[derive(Clone, Deserialize, Debug)]
pub struct AppConfig {
    #[serde(default = "default_prism_base_url")]
    pub prism_base_url: String,
    #[serde(default = "default_prism_timeout_secs")]
    pub prism_timeout_secs: u64,
    #[serde(default = "default_target_chunk_tokens")]
    pub target_chunk_tokens: usize,
    #[serde(default = "default_min_chunk_tokens")]
    pub min_chunk_tokens: usize,
    #[serde(default = "default_max_chunk_tokens")]
    pub max_chunk_tokens: usize,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_embed")]
    pub embed: bool,
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

fn default_prism_base_url() -> String {
    "http://localhost:8100".to_string()
}

fn default_prism_timeout_secs() -> u64 {
    300
}

fn default_target_chunk_tokens() -> usize {
    350
}

fn default_min_chunk_tokens() -> usize {
    50
}

fn default_max_chunk_tokens() -> usize {
    500
}

fn default_batch_size() -> usize {
    100
}

fn default_embed() -> bool {
    true
}

fn default_data_dir() -> String {
    "./data".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            prism_base_url: default_prism_base_url(),
            prism_timeout_secs: default_prism_timeout_secs(),
            target_chunk_tokens: default_target_chunk_tokens(),
            min_chunk_tokens: default_min_chunk_tokens(),
            max_chunk_tokens: default_max_chunk_tokens(),
            batch_size: default_batch_size(),
            embed: default_embed(),
            data_dir: default_data_dir(),
        }
    }
}

impl AppConfig {
    /// Checks the token-budget ordering and the batch-size cap.
    pub fn validate(&self) -> Result<(), AppError> {
        if !(self.min_chunk_tokens < self.target_chunk_tokens
            && self.target_chunk_tokens < self.max_chunk_tokens)
        {
            return Err(AppError::Validation(format!(
                "chunk token budgets must satisfy min < target < max, got {} / {} / {}",
                self.min_chunk_tokens, self.target_chunk_tokens, self.max_chunk_tokens
            )));
        }
        if self.batch_size == 0 || self.batch_size > 100 {
            return Err(AppError::Validation(format!(
                "batch_size must be between 1 and 100, got {}",
                self.batch_size
            )));
        }
        Ok(())
    }
}

pub fn get_config() -> Result<AppConfig, AppError> {
    let config = Config::builder()
        .add_source(File::with_name("config").required(false))
        .add_source(Environment::with_prefix("BIBLE_IMPORTER"))
        .build()?;

    let config: AppConfig = config.try_deserialize()?;
    config.validate()?;
    Ok(config)
}
