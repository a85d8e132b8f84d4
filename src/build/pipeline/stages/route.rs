//! Output routing stage.
//!
//! Decides where each post is written.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::build::paths::post_output_path;
use crate::build::pipeline::{PipelineContext, PipelineError, ProcessingDocument, Stage};

/// Output file of the index page, relative to the output directory.
pub const INDEX_OUTPUT: &str = "index.html";

/// Stage that computes each post's output path.
///
/// A `slug` in the front matter names the file at the output root,
/// otherwise the source path is mirrored with an `.html` extension.
/// Posts that end up at the same path are reported; the last one written wins.
pub struct RouteStage;

impl Stage for RouteStage {
    fn name(&self) -> &'static str {
        "route"
    }

    fn process(
        &self,
        docs: &mut [ProcessingDocument],
        _ctx: &PipelineContext,
    ) -> Result<(), PipelineError> {
        let mut claimed: HashMap<PathBuf, PathBuf> = HashMap::new();

        for doc in docs {
            let output_path = post_output_path(doc.source_path(), doc.post.slug())?;

            if output_path == PathBuf::from(INDEX_OUTPUT) {
                tracing::warn!(
                    "{} renders to {} and will be replaced by the index page",
                    doc.source_path().display(),
                    INDEX_OUTPUT
                );
            }
            if let Some(previous) =
                claimed.insert(output_path.clone(), doc.source_path().to_path_buf())
            {
                tracing::warn!(
                    "{} and {} both render to {}",
                    previous.display(),
                    doc.source_path().display(),
                    output_path.display()
                );
            }

            doc.output_path = Some(output_path);
        }

        Ok(())
    }
}
