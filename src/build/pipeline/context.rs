//! Pipeline context for sharing state across stages.

use std::path::Path;

use crate::build::document::PageCollection;
use crate::build::render::{Renderer, SiteContext};

/// Shared context for pipeline stages.
///
/// Contains all resources and configuration needed by stages during processing.
pub struct PipelineContext<'a> {
    /// Directory where output files are written
    pub output_dir: &'a Path,

    /// Site metadata (name, URL)
    pub site: &'a SiteContext,

    /// Every parsed post, for the index
    pub pages: &'a PageCollection,

    /// Template renderer
    pub renderer: &'a Renderer,
}
