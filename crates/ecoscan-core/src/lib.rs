pub mod app_config;
pub mod config;
pub mod history;
pub mod keywords;
pub mod products;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use history::ScanHistoryEntry;
pub use keywords::{load_keywords, KeywordsFile};
pub use products::{
    EnvironmentalImpact, NutrientField, NutritionalProfile, PackagingType, Product, ScoreRating,
};

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown nutrient field: {0}")]
    UnknownNutrientField(String),

    #[error("invalid packaging type: {0}")]
    InvalidPackagingType(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read keywords file {path}: {source}")]
    KeywordsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse keywords file: {0}")]
    KeywordsFileParse(#[source] serde_yaml::Error),

    #[error("keywords validation failed: {0}")]
    Validation(String),
}
