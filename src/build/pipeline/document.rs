//! Document types for pipeline processing.

use std::path::{Path, PathBuf};

use crate::build::document::ParsedPost;

/// A post being processed through the pipeline.
///
/// Wraps the parsed post with state that evolves through pipeline stages:
///
/// 1. Initially: `output_path` and `output_html` are empty
/// 2. After route: `output_path` = where the page is written
/// 3. After template: `output_html` = final page HTML
#[derive(Debug)]
pub struct ProcessingDocument<'a> {
    /// The parsed post (metadata and HTML body)
    pub post: &'a ParsedPost,

    /// Output location relative to the output directory.
    ///
    /// None until the route stage populates it.
    pub output_path: Option<PathBuf>,

    /// Final HTML output after template rendering.
    ///
    /// None until the template stage populates it.
    pub output_html: Option<String>,
}

impl<'a> ProcessingDocument<'a> {
    pub fn new(post: &'a ParsedPost) -> Self {
        Self {
            post,
            output_path: None,
            output_html: None,
        }
    }

    /// Get the post's path relative to the content directory.
    pub fn source_path(&self) -> &Path {
        &self.post.source_path
    }
}
