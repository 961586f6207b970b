use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

pub const DEFAULT_MONGO_URI: &str = "mongodb://localhost:27017";
pub const DEFAULT_MONGO_DB: &str = "meudb";

#[derive(Debug, Clone, Deserialize)]
pub struct CourseConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub mongodb: MongoConfig,
    pub otlp_endpoint: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
}

impl CourseConfig {
    pub fn load() -> Result<Self, AppError> {
        // Load common config (handles .env and APP__ prefix)
        let common_config = core_config::Config::load()?;

        Ok(CourseConfig {
            common: common_config,
            mongodb: MongoConfig {
                uri: env_or("MONGO_URI", DEFAULT_MONGO_URI),
                database: env_or("MONGO_DB", DEFAULT_MONGO_DB),
            },
            otlp_endpoint: env::var("OTLP_ENDPOINT").ok().filter(|v| !v.is_empty()),
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    match env::var(key) {
        Ok(val) if !val.is_empty() => val,
        _ => {
            tracing::debug!(key = %key, default = %default, "Using default configuration value");
            default.to_string()
        }
    }
}
