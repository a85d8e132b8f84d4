//! Default pipeline stages.
//!
//! The standard document processing pipeline consists of:
//!
//! 1. **RouteStage** - Decide where each post is written (slug or mirrored path)
//! 2. **TemplateStage** - Render each post through the post template
//! 3. **WriteStage** - Write final HTML to output directory
//!
//! followed by the finalize stage **IndexStage**, which renders the index
//! page once every post has been written.

mod index;
mod route;
mod template;
mod write;

pub use index::IndexStage;
pub use route::RouteStage;
pub use template::TemplateStage;
pub use write::WriteStage;
