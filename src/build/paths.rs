//! Path conversion utilities.
//!
//! This module handles conversions between:
//! - Source file paths (relative to the content directory)
//! - Output file paths (relative to the output directory)
//! - URL paths (the `/`-separated form templates link to)
//!
//! All mapping goes through `Path` components, so it behaves the same on
//! every platform.

use std::path::{Component, Path, PathBuf};

/// Extension given to every rendered post.
const HTML_EXTENSION: &str = "html";

#[derive(thiserror::Error, Debug)]
pub enum PathError {
    #[error("invalid slug '{slug}' in {source_path}: must be a relative path without '..'")]
    InvalidSlug { slug: String, source_path: PathBuf },
}

/// Compute where a post is written, relative to the output directory.
///
/// A `slug` names the file directly at the output root (`<slug>.html`),
/// whatever the source's nesting. Without a slug the source path is
/// mirrored and its extension replaced.
///
/// # Examples
/// ```ignore
/// post_output_path("posts/a.md", None) => "posts/a.html"
/// post_output_path("posts/sub/b.md", Some("custom")) => "custom.html"
/// ```
pub fn post_output_path(source_path: &Path, slug: Option<&str>) -> Result<PathBuf, PathError> {
    match slug {
        Some(slug) => {
            let slug_path = Path::new(slug);
            let is_plain = !slug.trim().is_empty()
                && !slug.ends_with(['/', '\\'])
                && slug_path
                    .components()
                    .all(|c| matches!(c, Component::Normal(_)));
            if !is_plain {
                return Err(PathError::InvalidSlug {
                    slug: slug.to_string(),
                    source_path: source_path.to_path_buf(),
                });
            }
            Ok(PathBuf::from(format!("{slug}.{HTML_EXTENSION}")))
        }
        None => Ok(source_path.with_extension(HTML_EXTENSION)),
    }
}

/// Join the components of a relative path with `/`.
///
/// "posts/sub/b.html" -> "posts/sub/b.html" on every platform.
pub fn to_url_path(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Returns true when `path` is `root` or lies inside it.
///
/// Both paths are compared lexically after resolving `.` and `..`, so the
/// check works for directories that do not exist yet.
pub fn is_within(path: &Path, root: &Path) -> bool {
    normalize(path).starts_with(normalize(root))
}

fn normalize(path: &Path) -> PathBuf {
    let absolute = if path.is_relative() {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    } else {
        path.to_path_buf()
    };

    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    normalized
}

/// Get the base path from a config file path (its parent directory).
pub fn base_path_from_config(config_path: &Path) -> PathBuf {
    config_path
        .parent()
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Resolve a configured path against the base path.
pub fn resolve(base_path: &Path, path: &Path) -> PathBuf {
    if path.is_relative() {
        base_path.join(path)
    } else {
        path.to_path_buf()
    }
}
