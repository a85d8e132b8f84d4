use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::{Map, Value};
use tera::{Context, Tera};

use super::document::{PageCollection, ParsedPost};
use super::paths::{PathError, post_output_path, to_url_path};

/// Template rendered once per post, with the post available as `post`.
pub const POST_TEMPLATE: &str = "post.html";
/// Template rendered once per build, with all posts available as `pages`.
pub const INDEX_TEMPLATE: &str = "index.html";

/// Context key holding a post's rendered HTML.
pub const CONTENT_KEY: &str = "content";
/// Context key holding a post's output path, relative to the site root.
pub const URL_KEY: &str = "url";
/// Keys injected after front matter; metadata can never override them.
pub const RESERVED_KEYS: &[&str] = &[CONTENT_KEY, URL_KEY];

#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    #[error("template error: {0}")]
    Template(#[from] tera::Error),

    #[error("templates directory not found: {0}")]
    TemplatesNotFound(PathBuf),

    #[error("template '{name}' not found in {dir}")]
    TemplateMissing { name: &'static str, dir: PathBuf },
}

/// The template renderer, wrapping Tera.
///
/// Each build constructs its own renderer, so independent builds never
/// share template state.
pub struct Renderer {
    tera: Tera,
}

impl Renderer {
    /// Create a new renderer loading every `*.html` template under `templates_path`.
    ///
    /// Fails if `post.html` or `index.html` is missing.
    pub fn new(templates_path: &Path) -> Result<Self, RenderError> {
        if !templates_path.is_dir() {
            return Err(RenderError::TemplatesNotFound(templates_path.to_path_buf()));
        }

        let glob = templates_path.join("**/*.html");
        let glob_str = glob.to_string_lossy();
        let tera = Tera::new(&glob_str)?;

        for name in [POST_TEMPLATE, INDEX_TEMPLATE] {
            if !tera.get_template_names().any(|loaded| loaded == name) {
                return Err(RenderError::TemplateMissing {
                    name,
                    dir: templates_path.to_path_buf(),
                });
            }
        }

        Ok(Self { tera })
    }

    /// Render a single post page.
    pub fn render_post(
        &self,
        site: &SiteContext,
        post: &PostContext,
    ) -> Result<String, RenderError> {
        let mut tera_context = Context::new();
        tera_context.insert("site", site);
        tera_context.insert("post", post);

        Ok(self.tera.render(POST_TEMPLATE, &tera_context)?)
    }

    /// Render the index page listing every post.
    pub fn render_index(
        &self,
        site: &SiteContext,
        pages: &IndexContext,
    ) -> Result<String, RenderError> {
        let mut tera_context = Context::new();
        tera_context.insert("site", site);
        tera_context.insert("pages", pages);

        Ok(self.tera.render(INDEX_TEMPLATE, &tera_context)?)
    }
}

/// Site-level information.
#[derive(Debug, Clone, Serialize)]
pub struct SiteContext {
    pub name: String,
    pub url: Option<String>,
}

/// Context for one post: its front matter plus `content` and `url`.
pub type PostContext = Map<String, Value>;

/// Context for the index: `/`-separated source path to post context,
/// in discovery order.
pub type IndexContext = Map<String, Value>;

/// Build the render context of a post.
///
/// Metadata goes in first and the reserved keys last, so `content` is always
/// the rendered body.
pub fn post_context(post: &ParsedPost, output_path: &Path) -> PostContext {
    let mut context = Map::new();
    for (key, value) in &post.metadata {
        if RESERVED_KEYS.contains(&key.as_str()) {
            continue;
        }
        context.insert(key.clone(), Value::String(value.clone()));
    }
    context.insert(
        CONTENT_KEY.to_string(),
        Value::String(post.html_content.clone()),
    );
    context.insert(URL_KEY.to_string(), Value::String(to_url_path(output_path)));
    context
}

/// Build the index context: one entry per post, in discovery order.
pub fn index_context(pages: &PageCollection) -> Result<IndexContext, PathError> {
    let mut context = Map::new();
    for post in pages.iter() {
        let output_path = post_output_path(&post.source_path, post.slug())?;
        context.insert(
            to_url_path(&post.source_path),
            Value::Object(post_context(post, &output_path)),
        );
    }
    Ok(context)
}
