use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

// =============================================================================
// Errors
// =============================================================================

#[derive(thiserror::Error, Debug)]
pub enum SourceError {
    #[error("content path does not exist: {0}")]
    PathNotFound(PathBuf),

    #[error("content path is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("failed to walk content directory: {0}")]
    Walk(#[from] walkdir::Error),
}

// =============================================================================
// Content entries
// =============================================================================

/// What a discovered path is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    /// A Markdown document that will be rendered to HTML
    Markdown,
    /// Anything else (images, stylesheets, ...)
    Other,
}

/// A path discovered while walking the content directory.
#[derive(Debug, Clone)]
pub struct ContentEntry {
    /// Full path on disk
    pub path: PathBuf,
    /// Path relative to the content root (e.g., "posts/a.md")
    pub relative_path: PathBuf,
    pub kind: EntryKind,
}

/// Walk the content directory.
///
/// Entries come lazily in pre-order, sorted by file name, so a directory is
/// always reported before the files it contains. Hidden files and
/// directories are skipped. The root itself is not reported.
pub fn walk(
    content_root: &Path,
) -> Result<impl Iterator<Item = Result<ContentEntry, SourceError>> + use<>, SourceError> {
    if !content_root.exists() {
        return Err(SourceError::PathNotFound(content_root.to_path_buf()));
    }
    if !content_root.is_dir() {
        return Err(SourceError::NotADirectory(content_root.to_path_buf()));
    }

    let root = content_root.to_path_buf();
    let entries = WalkDir::new(&root)
        .follow_links(true)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry))
        .map(move |entry| -> Result<ContentEntry, SourceError> {
            let entry = entry?;
            Ok(classify(&root, entry))
        });

    Ok(entries)
}

fn classify(root: &Path, entry: DirEntry) -> ContentEntry {
    let kind = if entry.file_type().is_dir() {
        EntryKind::Directory
    } else if is_markdown(entry.path()) {
        EntryKind::Markdown
    } else {
        EntryKind::Other
    };

    // WalkDir yields paths under the root it was given
    let relative_path = entry
        .path()
        .strip_prefix(root)
        .map(Path::to_path_buf)
        .unwrap_or_else(|_| PathBuf::from(entry.file_name()));

    ContentEntry {
        path: entry.into_path(),
        relative_path,
        kind,
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}

/// Returns true for `.md` and `.markdown` files (any case).
pub fn is_markdown(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .is_some_and(|e| matches!(e.as_str(), "md" | "markdown"))
}
