//! Post template rendering stage.
//!
//! Wraps each post's HTML body in the post template.

use crate::build::pipeline::{PipelineContext, PipelineError, ProcessingDocument, Stage};
use crate::build::render::post_context;

/// Stage that applies the post template to rendered content.
///
/// The template sees the post's front matter, its HTML body as
/// `post.content` and its output path as `post.url`.
///
/// After this stage, `doc.output_html` contains the complete HTML page.
pub struct TemplateStage;

impl Stage for TemplateStage {
    fn name(&self) -> &'static str {
        "template"
    }

    fn process(
        &self,
        docs: &mut [ProcessingDocument],
        ctx: &PipelineContext,
    ) -> Result<(), PipelineError> {
        for doc in docs {
            let output_path = doc.output_path.as_ref().ok_or_else(|| {
                PipelineError::stage(
                    "template",
                    format!(
                        "document '{}' has no output path (was route stage run?)",
                        doc.source_path().display()
                    ),
                )
            })?;

            tracing::info!("Generating {}", doc.source_path().display());
            let context = post_context(doc.post, output_path);
            let html = ctx.renderer.render_post(ctx.site, &context)?;

            doc.output_html = Some(html);
        }

        Ok(())
    }
}
