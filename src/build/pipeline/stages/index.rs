//! Index page stage.

use crate::build::output::write_file;
use crate::build::pipeline::{FinalizeStage, PipelineContext, PipelineError};
use crate::build::render::index_context;

use super::route::INDEX_OUTPUT;

/// Finalize stage that renders the index template.
///
/// Runs once every post has been processed. The template receives all
/// posts as `pages`, keyed by source path in discovery order, and the
/// result is written to `index.html` at the output root.
pub struct IndexStage;

impl FinalizeStage for IndexStage {
    fn name(&self) -> &'static str {
        "index"
    }

    fn finalize(&self, ctx: &PipelineContext) -> Result<(), PipelineError> {
        if ctx.pages.is_empty() {
            tracing::info!("No posts found, generating an empty index");
        } else {
            tracing::info!("Generating index ({} page(s))", ctx.pages.len());
        }

        let pages = index_context(ctx.pages)?;
        let html = ctx.renderer.render_index(ctx.site, &pages)?;
        write_file(&ctx.output_dir.join(INDEX_OUTPUT), &html)?;

        Ok(())
    }
}
