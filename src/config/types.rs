//! Configuration type definitions.
//!
//! This module contains the data structures read from `mdsite.yaml`.
//! These types are pure data - no I/O or complex logic.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

// =============================================================================
// Root config
// =============================================================================

/// The full site configuration. Every field has a default, so a missing
/// config file yields a usable configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RootConfig {
    pub site: SiteConfig,
    pub markdown: MarkdownConfig,
}

// =============================================================================
// Site configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Site name, available to templates as `site.name`
    pub name: String,
    pub url: Option<String>,
    /// Directory holding the Markdown content
    pub content: PathBuf,
    /// Directory the generated site is written to (wiped on every build)
    pub output: PathBuf,
    /// Directory holding `post.html` and `index.html`
    pub templates: PathBuf,
    /// Directory copied verbatim into the output root, if it exists
    #[serde(rename = "static")]
    pub static_dir: PathBuf,
    /// What to do with content files that are not Markdown
    pub on_other_file: OtherFilePolicy,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: "My Site".to_string(),
            url: None,
            content: PathBuf::from("content"),
            output: PathBuf::from("_site"),
            templates: PathBuf::from("templates"),
            static_dir: PathBuf::from("static"),
            on_other_file: OtherFilePolicy::default(),
        }
    }
}

/// Handling of non-Markdown files found under the content directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OtherFilePolicy {
    /// Copy the file byte-for-byte to the mirrored output location
    #[default]
    Copy,
    /// Leave the file out of the generated site
    Skip,
}

// =============================================================================
// Markdown configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkdownConfig {
    /// Extensions to enable for markdown processing
    #[serde(default = "default_markdown_extensions")]
    pub extensions: Vec<String>,
}

fn default_markdown_extensions() -> Vec<String> {
    vec!["tables".to_string(), "strikethrough".to_string()]
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            extensions: default_markdown_extensions(),
        }
    }
}
