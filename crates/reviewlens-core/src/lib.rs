//! ReviewLens Core: configuration, NLP capability model, shared review record.

pub mod capabilities;
pub mod config;
pub mod error;
pub mod review;

pub use capabilities::{
    Capabilities, CapabilityTier, SentimentBackend, StopwordSource, TokenizerBackend,
};
pub use config::{AppConfig, DataPaths, NlpConfig};
pub use error::{Error, Result};
pub use review::Review;
