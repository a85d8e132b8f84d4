//! Build pipeline for post rendering.
//!
//! The pipeline takes parsed posts through a series of stages:
//! 1. Routing (output path from slug or source path)
//! 2. Template rendering (post template wrapper)
//! 3. File writing (output to disk)
//!
//! Build-wide stages (the index page) run after all posts are processed.

mod context;
mod document;
mod error;
mod stages;

pub use context::PipelineContext;
pub use document::ProcessingDocument;
pub use error::PipelineError;

use stages::{IndexStage, RouteStage, TemplateStage, WriteStage};

/// A stage in the document processing pipeline.
///
/// Stages transform documents sequentially. Each stage receives all documents
/// and can modify them in place before passing to the next stage.
pub trait Stage {
    /// Unique name for this stage.
    fn name(&self) -> &'static str;

    /// Process documents through this stage.
    ///
    /// Documents are passed by mutable reference so stages can fill in
    /// their state. The `ctx` provides access to shared resources
    /// like the renderer.
    fn process(
        &self,
        docs: &mut [ProcessingDocument<'_>],
        ctx: &PipelineContext,
    ) -> Result<(), PipelineError>;
}

/// A stage that runs once after all documents are processed.
pub trait FinalizeStage {
    /// Unique name for this stage.
    fn name(&self) -> &'static str;

    /// Run finalization after all documents are processed and written.
    fn finalize(&self, ctx: &PipelineContext) -> Result<(), PipelineError>;
}

/// The document processing pipeline.
///
/// The default pipeline is: route → template → write, then index.
pub struct Pipeline {
    /// Document processing stages (run for each document batch)
    stages: Vec<Box<dyn Stage>>,
    /// Build-wide stages (run once after all documents)
    finalize_stages: Vec<Box<dyn FinalizeStage>>,
}

impl Pipeline {
    /// Create an empty pipeline with no stages.
    pub fn new() -> Self {
        Self {
            stages: Vec::new(),
            finalize_stages: Vec::new(),
        }
    }

    /// Create the default pipeline with standard stages.
    pub fn default_pipeline() -> Self {
        let mut pipeline = Self::new();
        pipeline.add_stage(RouteStage);
        pipeline.add_stage(TemplateStage);
        pipeline.add_stage(WriteStage);
        pipeline.add_finalize_stage(IndexStage);
        pipeline
    }

    /// Add a stage to the end of the pipeline.
    pub fn add_stage<S: Stage + 'static>(&mut self, stage: S) -> &mut Self {
        self.stages.push(Box::new(stage));
        self
    }

    /// Add a finalize stage (runs after all documents are processed).
    pub fn add_finalize_stage<S: FinalizeStage + 'static>(&mut self, stage: S) -> &mut Self {
        self.finalize_stages.push(Box::new(stage));
        self
    }

    /// Run the pipeline on a set of documents.
    pub fn run(
        &self,
        docs: &mut [ProcessingDocument<'_>],
        ctx: &PipelineContext,
    ) -> Result<(), PipelineError> {
        for stage in &self.stages {
            tracing::debug!("Running stage '{}'", stage.name());
            stage.process(docs, ctx)?;
        }

        for stage in &self.finalize_stages {
            tracing::debug!("Running finalize stage '{}'", stage.name());
            stage.finalize(ctx)?;
        }

        Ok(())
    }

    /// Get the names of all stages in order, finalize stages last.
    #[cfg(test)]
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages
            .iter()
            .map(|s| s.name())
            .chain(self.finalize_stages.iter().map(|s| s.name()))
            .collect()
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::default_pipeline()
    }
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use super::*;
    use crate::build::document::{Metadata, PageCollection, ParsedPost};
    use crate::build::render::{INDEX_TEMPLATE, POST_TEMPLATE, Renderer, SiteContext};

    fn post(source: &str, slug: Option<&str>) -> ParsedPost {
        let mut metadata = Metadata::new();
        metadata.insert("title".to_string(), source.to_string());
        if let Some(slug) = slug {
            metadata.insert("slug".to_string(), slug.to_string());
        }
        ParsedPost {
            source_path: PathBuf::from(source),
            html_content: format!("<p>{source}</p>"),
            metadata,
        }
    }

    fn renderer(dir: &Path) -> Renderer {
        let templates = dir.join("templates");
        std::fs::create_dir_all(&templates).unwrap();
        std::fs::write(templates.join(POST_TEMPLATE), "{{ post.content | safe }}").unwrap();
        std::fs::write(
            templates.join(INDEX_TEMPLATE),
            "{% for source, page in pages %}[{{ page.url | safe }}]{% endfor %}",
        )
        .unwrap();
        Renderer::new(&templates).unwrap()
    }

    #[test]
    fn test_default_stage_order() {
        let pipeline = Pipeline::default_pipeline();
        assert_eq!(pipeline.stage_names(), ["route", "template", "write", "index"]);
    }

    #[test]
    fn test_run_writes_posts_and_index() {
        let dir = tempfile::tempdir().unwrap();
        let output_dir = dir.path().join("_site");
        let renderer = renderer(dir.path());
        let site = SiteContext {
            name: "Test".to_string(),
            url: None,
        };

        let mut pages = PageCollection::new();
        pages.insert(post("posts/a.md", None));
        pages.insert(post("posts/sub/b.md", Some("custom")));

        let mut docs: Vec<_> = pages.iter().map(ProcessingDocument::new).collect();
        let ctx = PipelineContext {
            output_dir: &output_dir,
            site: &site,
            pages: &pages,
            renderer: &renderer,
        };
        Pipeline::default_pipeline().run(&mut docs, &ctx).unwrap();

        assert_eq!(
            std::fs::read_to_string(output_dir.join("posts/a.html")).unwrap(),
            "<p>posts/a.md</p>"
        );
        assert_eq!(
            std::fs::read_to_string(output_dir.join("custom.html")).unwrap(),
            "<p>posts/sub/b.md</p>"
        );
        assert!(!output_dir.join("posts/sub/b.html").exists());
        assert_eq!(
            std::fs::read_to_string(output_dir.join("index.html")).unwrap(),
            "[posts/a.html][custom.html]"
        );
    }

    #[test]
    fn test_write_without_template_stage_fails() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = renderer(dir.path());
        let site = SiteContext {
            name: "Test".to_string(),
            url: None,
        };
        let mut pages = PageCollection::new();
        pages.insert(post("a.md", None));

        let mut docs: Vec<_> = pages.iter().map(ProcessingDocument::new).collect();
        let ctx = PipelineContext {
            output_dir: dir.path(),
            site: &site,
            pages: &pages,
            renderer: &renderer,
        };

        let mut pipeline = Pipeline::new();
        pipeline.add_stage(RouteStage).add_stage(WriteStage);
        let result = pipeline.run(&mut docs, &ctx);

        assert!(matches!(result, Err(PipelineError::Stage { stage, .. }) if stage == "write"));
    }
}
