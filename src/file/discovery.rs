use std::path::{Path, PathBuf};

use fast_glob::glob_match;
use walkdir::WalkDir;

use crate::config::EXCLUDED_PATTERNS;
use crate::file::operations::is_encrypted_file;
use crate::types::Operation;

/// Lists files under `root` that `operation` can be applied to.
///
/// Unreadable entries are skipped silently.
pub fn discover(root: &Path, operation: Operation) -> Vec<PathBuf> {
    WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(walkdir::DirEntry::into_path)
        .filter(|path| is_eligible(path, operation))
        .collect()
}

/// Hidden and excluded files are never eligible. Otherwise encryption takes
/// plain files and decryption takes `.encrypted` ones.
pub fn is_eligible(path: &Path, operation: Operation) -> bool {
    let hidden = path.file_name().is_some_and(|name| name.to_string_lossy().starts_with('.'));
    if hidden || is_excluded(path) {
        return false;
    }

    match operation {
        Operation::Encrypt => !is_encrypted_file(path),
        Operation::Decrypt => is_encrypted_file(path),
    }
}

pub fn is_excluded(path: &Path) -> bool {
    let normalized = path.to_string_lossy().replace('\\', "/");
    EXCLUDED_PATTERNS.iter().any(|pattern| glob_match(pattern, &normalized))
}
