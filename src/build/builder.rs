use std::path::{Path, PathBuf};

use crate::config::RootConfig;

use super::loader::{ContentLoader, LoadError};
use super::markdown::MarkdownError;
use super::output::{self, OutputError};
use super::paths::{is_within, resolve};
use super::pipeline::{Pipeline, PipelineContext, PipelineError, ProcessingDocument};
use super::render::{RenderError, Renderer, SiteContext};
use super::source::{self, SourceError};

#[derive(thiserror::Error, Debug)]
pub enum BuildError {
    #[error("source error: {0}")]
    Source(#[from] SourceError),

    #[error("markdown config error: {0}")]
    Markdown(#[from] MarkdownError),

    #[error("{0}")]
    Load(#[from] LoadError),

    #[error("render error: {0}")]
    Render(#[from] RenderError),

    #[error("pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    #[error("output error: {0}")]
    Output(#[from] OutputError),

    #[error("output directory {output} overlaps {input}; refusing to delete it")]
    OutputOverlapsInput { output: PathBuf, input: PathBuf },
}

pub struct BuildResult {
    pub output_dir: PathBuf,
    pub posts: usize,
    pub static_files: usize,
    pub copied_files: usize,
    pub skipped_files: usize,
}

pub struct Builder {
    config: RootConfig,
    /// Base path for resolving relative paths (typically the config file's directory)
    base_path: PathBuf,
}

impl Builder {
    pub fn new(config: RootConfig, base_path: PathBuf) -> Self {
        Self { config, base_path }
    }

    pub fn build(&self) -> Result<BuildResult, BuildError> {
        // Build pipeline:
        // 1. Validate inputs (templates, markdown options, content dir)
        // 2. Prepare output directory and copy static files
        // 3. Walk content -> PageCollection (directories mirrored on the way)
        // 4. Render and write each post, then the index

        let content_dir = self.resolve(&self.config.site.content);
        let output_dir = self.output_dir();
        let templates_dir = self.resolve(&self.config.site.templates);
        let static_dir = self.resolve(&self.config.site.static_dir);

        // Step 1: Everything that can fail on bad input fails before the old
        // output is deleted
        for input in [&content_dir, &templates_dir, &static_dir] {
            self.check_overlap(&output_dir, input)?;
        }
        let renderer = Renderer::new(&templates_dir)?;
        let loader = ContentLoader::new(
            &output_dir,
            self.config.site.on_other_file,
            &self.config.markdown,
        )?;
        let entries = source::walk(&content_dir)?;

        // Step 2: Fresh output directory, static files first so content can
        // override them
        output::prepare(&output_dir)?;
        let static_files = if static_dir.is_dir() {
            output::copy_tree(&static_dir, &output_dir)?
        } else {
            0
        };

        // Step 3: Load content
        let loaded = loader.load(entries)?;
        println!(
            "Found {} post(s) in {}",
            loaded.pages.len(),
            content_dir.display()
        );

        // Step 4: Render posts and the index
        let site = SiteContext {
            name: self.config.site.name.clone(),
            url: self.config.site.url.clone(),
        };
        let mut docs: Vec<ProcessingDocument> =
            loaded.pages.iter().map(ProcessingDocument::new).collect();
        let ctx = PipelineContext {
            output_dir: &output_dir,
            site: &site,
            pages: &loaded.pages,
            renderer: &renderer,
        };
        Pipeline::default_pipeline().run(&mut docs, &ctx)?;

        Ok(BuildResult {
            output_dir,
            posts: loaded.pages.len(),
            static_files,
            copied_files: loaded.copied_files,
            skipped_files: loaded.skipped_files,
        })
    }

    /// Get the output directory path, resolved against base_path.
    pub fn output_dir(&self) -> PathBuf {
        self.resolve(&self.config.site.output)
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        resolve(&self.base_path, path)
    }

    /// The output directory is wiped on every build, so it must not contain
    /// an input, nor live inside one.
    fn check_overlap(&self, output_dir: &Path, input: &Path) -> Result<(), BuildError> {
        if is_within(input, output_dir) || is_within(output_dir, input) {
            return Err(BuildError::OutputOverlapsInput {
                output: output_dir.to_path_buf(),
                input: input.to_path_buf(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::document::DocumentError;
    use crate::config::OtherFilePolicy;

    const POST_TEMPLATE: &str =
        "<h1>{{ post.title | default(value=\"Untitled\") }}</h1>\n{{ post.content | safe }}";
    const INDEX_TEMPLATE: &str = "<ul>\n{% for source, page in pages %}\
        <li><a href=\"{{ page.url | safe }}\">{{ source | safe }}</a></li>\n{% endfor %}</ul>";

    /// A site directory with templates and the given content files.
    fn site(files: &[(&str, &[u8])]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "templates/post.html", POST_TEMPLATE.as_bytes());
        write(dir.path(), "templates/index.html", INDEX_TEMPLATE.as_bytes());
        std::fs::create_dir_all(dir.path().join("content")).unwrap();
        for (path, contents) in files {
            write(&dir.path().join("content"), path, contents);
        }
        dir
    }

    fn write(root: &Path, relative: &str, contents: &[u8]) {
        let path = root.join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, contents).unwrap();
    }

    fn build(dir: &Path) -> Result<BuildResult, BuildError> {
        build_with(dir, RootConfig::default())
    }

    fn build_with(dir: &Path, config: RootConfig) -> Result<BuildResult, BuildError> {
        Builder::new(config, dir.to_path_buf()).build()
    }

    fn read(path: PathBuf) -> String {
        std::fs::read_to_string(path).unwrap()
    }

    /// Every file under `root`, relative and `/`-separated, with its bytes.
    fn snapshot(root: &Path) -> Vec<(String, Vec<u8>)> {
        let mut files: Vec<_> = walkdir::WalkDir::new(root)
            .into_iter()
            .map(|e| e.unwrap())
            .filter(|e| e.file_type().is_file())
            .map(|e| {
                let relative = e.path().strip_prefix(root).unwrap();
                (
                    crate::build::paths::to_url_path(relative),
                    std::fs::read(e.path()).unwrap(),
                )
            })
            .collect();
        files.sort();
        files
    }

    #[test]
    fn test_end_to_end_scenario() {
        let dir = site(&[
            ("posts/a.md", b"title: Hello\n\n# Hi\n"),
            ("posts/sub/b.md", b"slug: custom\n\nSecond post\n"),
        ]);

        let result = build(dir.path()).unwrap();
        let out = dir.path().join("_site");

        assert_eq!(result.posts, 2);
        assert_eq!(read(out.join("posts/a.html")), "<h1>Hello</h1>\n<h1>Hi</h1>\n");
        assert_eq!(
            read(out.join("custom.html")),
            "<h1>Untitled</h1>\n<p>Second post</p>\n"
        );
        assert!(!out.join("posts/sub/b.html").exists());
        assert!(out.join("posts/sub").is_dir());
        assert_eq!(
            read(out.join("index.html")),
            "<ul>\n\
             <li><a href=\"posts/a.html\">posts/a.md</a></li>\n\
             <li><a href=\"custom.html\">posts/sub/b.md</a></li>\n\
             </ul>"
        );
    }

    #[test]
    fn test_other_files_copied_by_default() {
        let png = [0x89u8, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];
        let dir = site(&[("posts/a.md", b"# A"), ("posts/logo.png", &png)]);

        let result = build(dir.path()).unwrap();

        assert_eq!(result.copied_files, 1);
        assert_eq!(
            std::fs::read(dir.path().join("_site/posts/logo.png")).unwrap(),
            png.to_vec()
        );
    }

    #[test]
    fn test_other_files_skipped_when_configured() {
        let dir = site(&[("posts/a.md", b"# A"), ("posts/logo.png", b"png")]);
        let mut config = RootConfig::default();
        config.site.on_other_file = OtherFilePolicy::Skip;

        let result = build_with(dir.path(), config).unwrap();

        assert_eq!(result.skipped_files, 1);
        assert!(!dir.path().join("_site/posts/logo.png").exists());
        assert!(dir.path().join("_site/posts/a.html").exists());
    }

    #[test]
    fn test_empty_content_produces_empty_index() {
        let dir = site(&[]);

        let result = build(dir.path()).unwrap();

        assert_eq!(result.posts, 0);
        assert_eq!(read(dir.path().join("_site/index.html")), "<ul>\n</ul>");
    }

    #[test]
    fn test_index_has_one_entry_per_markdown_file() {
        let dir = site(&[
            ("a.md", b"# A"),
            ("nested/b.md", b"# B"),
            ("nested/deeper/c.markdown", b"# C"),
            ("nested/notes.txt", b"not a post"),
        ]);

        build(dir.path()).unwrap();

        let index = read(dir.path().join("_site/index.html"));
        assert_eq!(index.matches("<li>").count(), 3);
        assert!(index.contains("nested/deeper/c.markdown"));
        assert!(!index.contains("notes.txt"));
    }

    #[test]
    fn test_build_is_idempotent() {
        let dir = site(&[
            ("posts/a.md", b"---\ntitle: Hello\ndate: 2024-01-01\n---\n# Hi\n"),
            ("posts/sub/b.md", b"slug: custom\n\nBody\n"),
            ("img/pic.jpg", b"jpeg"),
        ]);
        write(dir.path(), "static/css/site.css", b"body {}");

        build(dir.path()).unwrap();
        let first = snapshot(&dir.path().join("_site"));
        build(dir.path()).unwrap();
        let second = snapshot(&dir.path().join("_site"));

        assert_eq!(first, second);
        assert_eq!(first.len(), 5);
    }

    #[test]
    fn test_previous_output_is_removed() {
        let dir = site(&[("a.md", b"# A")]);
        write(dir.path(), "_site/stale.html", b"old");

        build(dir.path()).unwrap();

        assert!(!dir.path().join("_site/stale.html").exists());
        assert!(dir.path().join("_site/a.html").exists());
    }

    #[test]
    fn test_static_directory_is_copied() {
        let dir = site(&[("a.md", b"# A")]);
        write(dir.path(), "static/css/site.css", b"body {}");

        let result = build(dir.path()).unwrap();

        assert_eq!(result.static_files, 1);
        assert_eq!(read(dir.path().join("_site/css/site.css")), "body {}");
    }

    #[test]
    fn test_parse_failure_aborts_build() {
        let dir = site(&[("bad.md", b"---\ntitle: Hello\n- item\n---\nBody")]);

        let result = build(dir.path());

        assert!(matches!(
            result,
            Err(BuildError::Load(LoadError::Document(DocumentError::FrontMatter { .. })))
        ));
        assert!(!dir.path().join("_site/index.html").exists());
    }

    #[test]
    fn test_fenced_title_with_colon_builds() {
        let dir = site(&[("rust.md", b"---\ntitle: Rust: a primer\n---\nBody\n")]);

        build(dir.path()).unwrap();

        assert_eq!(
            read(dir.path().join("_site/rust.html")),
            "<h1>Rust: a primer</h1>\n<p>Body</p>\n"
        );
    }

    #[test]
    fn test_invalid_slug_aborts_build() {
        let dir = site(&[("a.md", b"slug: ../outside\n\nBody")]);

        let result = build(dir.path());
        assert!(matches!(result, Err(BuildError::Pipeline(PipelineError::Path(_)))));
    }

    #[test]
    fn test_missing_template_keeps_previous_output() {
        let dir = site(&[("a.md", b"# A")]);
        std::fs::remove_file(dir.path().join("templates/index.html")).unwrap();
        write(dir.path(), "_site/keep.html", b"previous build");

        let result = build(dir.path());

        assert!(matches!(
            result,
            Err(BuildError::Render(RenderError::TemplateMissing { .. }))
        ));
        assert_eq!(read(dir.path().join("_site/keep.html")), "previous build");
    }

    #[test]
    fn test_missing_content_directory() {
        let dir = site(&[]);
        std::fs::remove_dir(dir.path().join("content")).unwrap();

        let result = build(dir.path());
        assert!(matches!(result, Err(BuildError::Source(SourceError::PathNotFound(_)))));
    }

    #[test]
    fn test_output_inside_content_is_rejected() {
        let dir = site(&[("a.md", b"# A")]);
        let mut config = RootConfig::default();
        config.site.output = PathBuf::from("content/_site");

        let result = build_with(dir.path(), config);
        assert!(matches!(result, Err(BuildError::OutputOverlapsInput { .. })));
    }

    #[test]
    fn test_output_dir_resolved_against_base_path() {
        let builder = Builder::new(RootConfig::default(), PathBuf::from("/project"));
        assert_eq!(builder.output_dir(), PathBuf::from("/project/_site"));
    }
}
