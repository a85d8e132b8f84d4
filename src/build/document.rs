use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use pulldown_cmark::Options;

use super::markdown::render_markdown;
use super::render::RESERVED_KEYS;

/// Front matter metadata, in the order the keys appear in the document.
pub type Metadata = IndexMap<String, String>;

#[derive(thiserror::Error, Debug)]
pub enum DocumentError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid front matter in {path}: {source}")]
    FrontMatter {
        path: PathBuf,
        source: FrontMatterError,
    },
}

#[derive(thiserror::Error, Debug)]
pub enum FrontMatterError {
    #[error("{0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("expected a mapping of keys to values")]
    NotAMapping,

    #[error("keys must be strings, numbers or booleans")]
    NonScalarKey,

    #[error("value of '{0}' must be a string, number or boolean")]
    NonScalarValue(String),
}

// =============================================================================
// Parsed posts
// =============================================================================

/// A Markdown file after conversion: its HTML body and its metadata.
#[derive(Debug, Clone)]
pub struct ParsedPost {
    /// Path relative to the content directory (e.g., "posts/a.md")
    pub source_path: PathBuf,
    /// The converted body
    pub html_content: String,
    /// Front matter metadata (e.g., `title`, `slug`, `date`)
    pub metadata: Metadata,
}

impl ParsedPost {
    /// Read a Markdown file, split off its front matter and render the body.
    pub fn load(
        full_path: &Path,
        source_path: &Path,
        options: Options,
    ) -> Result<Self, DocumentError> {
        let raw = std::fs::read_to_string(full_path).map_err(|e| DocumentError::Read {
            path: full_path.to_path_buf(),
            source: e,
        })?;

        let parsed = parse_front_matter(&raw).map_err(|e| DocumentError::FrontMatter {
            path: full_path.to_path_buf(),
            source: e,
        })?;

        for key in RESERVED_KEYS {
            if parsed.metadata.contains_key(*key) {
                tracing::warn!(
                    "{}: front matter key '{}' is reserved and will be ignored",
                    source_path.display(),
                    key
                );
            }
        }

        Ok(Self {
            source_path: source_path.to_path_buf(),
            html_content: render_markdown(&parsed.content, options),
            metadata: parsed.metadata,
        })
    }

    /// The `slug` front matter value, if set.
    pub fn slug(&self) -> Option<&str> {
        self.metadata.get("slug").map(String::as_str)
    }
}

/// Parsed posts keyed by source path, in discovery order.
#[derive(Debug, Default)]
pub struct PageCollection {
    posts: IndexMap<PathBuf, ParsedPost>,
}

impl PageCollection {
    #[cfg(test)]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, post: ParsedPost) {
        self.posts.insert(post.source_path.clone(), post);
    }

    #[cfg(test)]
    pub fn get(&self, source_path: &Path) -> Option<&ParsedPost> {
        self.posts.get(source_path)
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ParsedPost> {
        self.posts.values()
    }
}

// =============================================================================
// Front matter
// =============================================================================

/// Result of parsing front matter from markdown content.
#[derive(Debug)]
pub struct ParsedContent {
    /// The parsed metadata (empty if none found)
    pub metadata: Metadata,
    /// The markdown content without the front matter block
    pub content: String,
}

/// Parse front matter from markdown content.
///
/// Two forms are recognised. A YAML block delimited by `---` lines:
///
/// ```markdown
/// ---
/// title: My Page
/// date: 2024-05-01
/// ---
///
/// # Content starts here
/// ```
///
/// or bare `key: value` lines at the top of the file, ended by a blank line:
///
/// ```markdown
/// title: My Page
/// slug: my-page
///
/// # Content starts here
/// ```
///
/// Metadata values must be scalars; they are kept as strings.
pub fn parse_front_matter(content: &str) -> Result<ParsedContent, FrontMatterError> {
    let content = content.trim_start_matches('\u{feff}');

    if let Some((yaml, body)) = split_fenced(content) {
        return Ok(ParsedContent {
            metadata: parse_fenced_metadata(yaml)?,
            content: body.trim_start_matches(['\r', '\n']).to_string(),
        });
    }

    if let Some((metadata, body)) = split_header_lines(content) {
        return Ok(ParsedContent {
            metadata,
            content: body.to_string(),
        });
    }

    Ok(ParsedContent {
        metadata: Metadata::new(),
        content: content.to_string(),
    })
}

/// Split a `---` fenced block off the start of the content.
/// Returns `None` when there is no opening fence or it is never closed.
fn split_fenced(content: &str) -> Option<(&str, &str)> {
    let mut lines = content.split_inclusive('\n');
    let opening = lines.next()?;
    if opening.trim_end() != "---" {
        return None;
    }

    let mut offset = opening.len();
    for line in lines {
        if line.trim_end() == "---" {
            return Some((&content[opening.len()..offset], &content[offset + line.len()..]));
        }
        offset += line.len();
    }

    None
}

/// Parse a fenced block as YAML, falling back to plain `key: value` lines.
///
/// Lines such as `title: Rust: a primer` are not valid YAML and `title: #1 tip`
/// reads as a comment; when every line of the block is a header line, its raw
/// text is used for those.
fn parse_fenced_metadata(block: &str) -> Result<Metadata, FrontMatterError> {
    let header_lines = block_header_lines(block);

    match parse_yaml_metadata(block, header_lines.as_ref()) {
        Err(FrontMatterError::Yaml(e)) => header_lines.ok_or(FrontMatterError::Yaml(e)),
        other => other,
    }
}

/// Every non-blank line of `block` as a header line, or `None` if one isn't.
fn block_header_lines(block: &str) -> Option<Metadata> {
    let mut metadata = Metadata::new();
    for line in block.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let (key, value) = parse_header_line(line.trim_end())?;
        metadata.insert(key.to_string(), value.to_string());
    }
    Some(metadata)
}

fn parse_yaml_metadata(
    yaml: &str,
    header_lines: Option<&Metadata>,
) -> Result<Metadata, FrontMatterError> {
    if yaml.trim().is_empty() {
        return Ok(Metadata::new());
    }

    let mapping = match serde_yaml::from_str::<serde_yaml::Value>(yaml)? {
        serde_yaml::Value::Mapping(mapping) => mapping,
        serde_yaml::Value::Null => return Ok(Metadata::new()),
        _ => return Err(FrontMatterError::NotAMapping),
    };

    let mut metadata = Metadata::new();
    for (key, value) in &mapping {
        let key = scalar_to_string(key).ok_or(FrontMatterError::NonScalarKey)?;
        let value = match value {
            serde_yaml::Value::Null => header_lines
                .and_then(|lines| lines.get(&key))
                .cloned()
                .unwrap_or_default(),
            value => scalar_to_string(value)
                .ok_or_else(|| FrontMatterError::NonScalarValue(key.clone()))?,
        };
        metadata.insert(key, value);
    }
    Ok(metadata)
}

fn scalar_to_string(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        serde_yaml::Value::Null => Some(String::new()),
        serde_yaml::Value::Tagged(tagged) => scalar_to_string(&tagged.value),
        serde_yaml::Value::Sequence(_) | serde_yaml::Value::Mapping(_) => None,
    }
}

/// Split leading `key: value` lines off the content.
///
/// Every line up to the first blank line (or the end of the file) must be a
/// header line, otherwise the document has no metadata.
fn split_header_lines(content: &str) -> Option<(Metadata, &str)> {
    let mut metadata = Metadata::new();
    let mut offset = 0;

    for line in content.split_inclusive('\n') {
        let text = line.trim_end_matches(['\r', '\n']);
        if text.trim().is_empty() {
            offset += line.len();
            break;
        }
        let (key, value) = parse_header_line(text)?;
        metadata.insert(key.to_string(), value.to_string());
        offset += line.len();
    }

    if metadata.is_empty() {
        return None;
    }
    Some((metadata, &content[offset..]))
}

fn parse_header_line(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once(':')?;
    let key = key.trim();
    let is_key = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_');
    is_key.then(|| (key, value.trim()))
}
