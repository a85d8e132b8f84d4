//! Content loading.
//!
//! Consumes the content walk: mirrors directories into the output tree,
//! parses Markdown files and copies or skips everything else.

use std::path::Path;

use pulldown_cmark::Options;

use crate::config::{MarkdownConfig, OtherFilePolicy};

use super::document::{DocumentError, PageCollection, ParsedPost};
use super::markdown::{MarkdownError, parser_options};
use super::output::{self, OutputError};
use super::source::{ContentEntry, EntryKind, SourceError};

#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    #[error("source error: {0}")]
    Source(#[from] SourceError),

    #[error("document error: {0}")]
    Document(#[from] DocumentError),

    #[error("output error: {0}")]
    Output(#[from] OutputError),
}

/// Everything the loader produced.
#[derive(Debug, Default)]
pub struct LoadedContent {
    /// Parsed posts keyed by source path, in walk order
    pub pages: PageCollection,
    /// Non-Markdown files copied to the output
    pub copied_files: usize,
    /// Non-Markdown files left out
    pub skipped_files: usize,
}

pub struct ContentLoader<'a> {
    output_dir: &'a Path,
    on_other_file: OtherFilePolicy,
    options: Options,
}

impl<'a> ContentLoader<'a> {
    /// Create a loader writing into `output_dir`.
    ///
    /// Fails if the Markdown configuration names an unknown extension.
    pub fn new(
        output_dir: &'a Path,
        on_other_file: OtherFilePolicy,
        markdown_config: &MarkdownConfig,
    ) -> Result<Self, MarkdownError> {
        Ok(Self {
            output_dir,
            on_other_file,
            options: parser_options(markdown_config)?,
        })
    }

    /// Process every entry of a content walk.
    ///
    /// The first failing entry aborts loading.
    pub fn load(
        &self,
        entries: impl Iterator<Item = Result<ContentEntry, SourceError>>,
    ) -> Result<LoadedContent, LoadError> {
        let mut loaded = LoadedContent::default();

        for entry in entries {
            let entry = entry?;
            match entry.kind {
                EntryKind::Directory => {
                    output::mirror_dir(self.output_dir, &entry.relative_path)?;
                }
                EntryKind::Markdown => {
                    tracing::debug!("Parsing {}", entry.relative_path.display());
                    let post = ParsedPost::load(&entry.path, &entry.relative_path, self.options)?;
                    loaded.pages.insert(post);
                }
                EntryKind::Other => match self.on_other_file {
                    OtherFilePolicy::Copy => {
                        let dest = self.output_dir.join(&entry.relative_path);
                        output::copy_file(&entry.path, &dest)?;
                        tracing::debug!("Copied {}", entry.relative_path.display());
                        loaded.copied_files += 1;
                    }
                    OtherFilePolicy::Skip => {
                        tracing::debug!("Skipping {}", entry.relative_path.display());
                        loaded.skipped_files += 1;
                    }
                },
            }
        }

        Ok(loaded)
    }
}
