//! File writing stage.
//!
//! Writes the final HTML output to the filesystem.

use crate::build::output::write_file;
use crate::build::pipeline::{PipelineContext, PipelineError, ProcessingDocument, Stage};

/// Stage that writes rendered posts to the output directory.
///
/// This stage takes the final HTML from `doc.output_html` and writes
/// it to `doc.output_path` under the output directory, creating
/// any necessary parent directories and replacing existing files.
pub struct WriteStage;

impl Stage for WriteStage {
    fn name(&self) -> &'static str {
        "write"
    }

    fn process(
        &self,
        docs: &mut [ProcessingDocument],
        ctx: &PipelineContext,
    ) -> Result<(), PipelineError> {
        for doc in docs {
            let (Some(output_path), Some(html)) = (&doc.output_path, &doc.output_html) else {
                return Err(PipelineError::stage(
                    "write",
                    format!(
                        "document '{}' has no output HTML (was template stage run?)",
                        doc.source_path().display()
                    ),
                ));
            };

            let path = ctx.output_dir.join(output_path);
            write_file(&path, html)?;
            tracing::debug!("Wrote {}", path.display());
        }

        Ok(())
    }
}
