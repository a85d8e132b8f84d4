//! Output directory management.
//!
//! Every build starts from an empty output directory. Directories from the
//! content tree are mirrored into it as the walk reaches them, and all
//! writes create any missing parent directories.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

#[derive(thiserror::Error, Debug)]
pub enum OutputError {
    #[error("failed to remove {path}: {source}")]
    Remove {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to copy {from} to {to}: {source}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to walk {path}: {source}")]
    Walk {
        path: PathBuf,
        source: walkdir::Error,
    },
}

/// Remove any previous output and recreate `output_root` empty.
///
/// An output directory that does not exist yet is not an error.
pub fn prepare(output_root: &Path) -> Result<(), OutputError> {
    match std::fs::remove_dir_all(output_root) {
        Ok(()) => tracing::debug!("Removed previous output {}", output_root.display()),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => {
            return Err(OutputError::Remove {
                path: output_root.to_path_buf(),
                source: e,
            });
        }
    }

    create_dir(output_root)
}

/// Create the output counterpart of a content directory.
pub fn mirror_dir(output_root: &Path, relative_dir: &Path) -> Result<PathBuf, OutputError> {
    let path = output_root.join(relative_dir);
    create_dir(&path)?;
    tracing::debug!("Created output folder {}", path.display());
    Ok(path)
}

/// Write a file, creating parent directories if needed.
pub fn write_file(path: &Path, contents: &str) -> Result<(), OutputError> {
    create_parent(path)?;
    std::fs::write(path, contents).map_err(|e| OutputError::Write {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Copy a file byte-for-byte, creating parent directories if needed.
pub fn copy_file(from: &Path, to: &Path) -> Result<(), OutputError> {
    create_parent(to)?;
    std::fs::copy(from, to).map_err(|e| OutputError::Copy {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source: e,
    })?;
    Ok(())
}

/// Copy a whole directory tree into `to_dir`. Returns the number of files copied.
pub fn copy_tree(from_dir: &Path, to_dir: &Path) -> Result<usize, OutputError> {
    let mut copied = 0;

    for entry in WalkDir::new(from_dir).follow_links(true).min_depth(1) {
        let entry = entry.map_err(|e| OutputError::Walk {
            path: from_dir.to_path_buf(),
            source: e,
        })?;
        let Ok(relative) = entry.path().strip_prefix(from_dir) else {
            continue;
        };
        let dest = to_dir.join(relative);

        if entry.file_type().is_dir() {
            create_dir(&dest)?;
        } else {
            copy_file(entry.path(), &dest)?;
            copied += 1;
        }
    }

    Ok(copied)
}

fn create_dir(path: &Path) -> Result<(), OutputError> {
    std::fs::create_dir_all(path).map_err(|e| OutputError::CreateDir {
        path: path.to_path_buf(),
        source: e,
    })
}

fn create_parent(path: &Path) -> Result<(), OutputError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => create_dir(parent),
        _ => Ok(()),
    }
}
