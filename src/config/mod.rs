//! Configuration loading and types for mdsite.
//!
//! - Type definitions for config structures (`types`)
//! - Loading configs from files (`load`)

mod load;
mod types;

pub use load::DEFAULT_CONFIG_FILE;
pub use types::{MarkdownConfig, OtherFilePolicy, RootConfig};

// =============================================================================
// Errors
// =============================================================================

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to load config: {0}")]
    Load(#[from] config::ConfigError),

    #[error("failed to get current working directory: {0}")]
    CwdFailure(std::io::Error),
}
