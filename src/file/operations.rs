use std::path::{Path, PathBuf};

use anyhow::{Context, Result, ensure};
use tempfile::NamedTempFile;

use crate::config::{DECRYPTED_EXTENSION, ENCRYPTED_EXTENSION};
use crate::types::Operation;

/// Where a run over `input` writes its result.
///
/// Encryption appends `.encrypted`. Decryption strips `.encrypted` when
/// present and otherwise appends `.decrypted`, so it never targets the input
/// itself.
#[must_use]
pub fn output_path(input: &Path, operation: Operation) -> PathBuf {
    match operation {
        Operation::Encrypt => with_suffix(input, ENCRYPTED_EXTENSION),
        Operation::Decrypt => input.to_string_lossy().strip_suffix(ENCRYPTED_EXTENSION).map_or_else(|| with_suffix(input, DECRYPTED_EXTENSION), PathBuf::from),
    }
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(suffix);
    PathBuf::from(name)
}

#[inline]
#[must_use]
pub fn is_encrypted_file(path: &Path) -> bool {
    path.as_os_str().to_string_lossy().ends_with(ENCRYPTED_EXTENSION)
}

/// Checks that `path` is an existing, non-empty regular file.
pub async fn validate_input(path: &Path) -> Result<()> {
    let meta = tokio::fs::metadata(path).await.with_context(|| format!("file not found: {}", path.display()))?;
    ensure!(!meta.is_dir(), "path is a directory: {}", path.display());
    ensure!(meta.len() != 0, "file is empty: {}", path.display());
    Ok(())
}

pub async fn read_input(path: &Path) -> Result<Vec<u8>> {
    tokio::fs::read(path).await.with_context(|| format!("failed to read file: {}", path.display()))
}

/// Writes `data` to a hidden temporary file in the directory of `path`,
/// creating that directory if needed. Nothing appears at `path` until the
/// staged file is passed to [`commit_output`]; dropping it removes it.
pub async fn stage_output(path: &Path, data: &[u8]) -> Result<NamedTempFile> {
    let parent = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or_else(|| Path::new("."));
    tokio::fs::create_dir_all(parent).await.with_context(|| format!("failed to create directory: {}", parent.display()))?;

    let staged = NamedTempFile::new_in(parent).with_context(|| format!("failed to create temporary file in {}", parent.display()))?;
    tokio::fs::write(staged.path(), data).await.with_context(|| format!("failed to write file: {}", staged.path().display()))?;

    Ok(staged)
}

/// Renames a staged file onto `path`, replacing any existing file.
pub fn commit_output(staged: NamedTempFile, path: &Path) -> Result<()> {
    staged.persist(path).map(drop).with_context(|| format!("failed to write file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_output_path_encrypt() {
        assert_eq!(output_path(Path::new("document.txt"), Operation::Encrypt), PathBuf::from("document.txt.encrypted"));
    }

    #[test]
    fn test_output_path_decrypt() {
        assert_eq!(output_path(Path::new("document.txt.encrypted"), Operation::Decrypt), PathBuf::from("document.txt"));
        assert_eq!(output_path(Path::new("document.bin"), Operation::Decrypt), PathBuf::from("document.bin.decrypted"));
    }

    #[test]
    fn test_is_encrypted_file() {
        assert!(is_encrypted_file(Path::new("file.txt.encrypted")));
        assert!(!is_encrypted_file(Path::new("file.txt")));
    }

    #[tokio::test]
    async fn test_stage_then_commit() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("out.bin");

        let staged = stage_output(&path, b"payload").await.unwrap();
        assert!(!path.exists());
        assert_eq!(staged.path().parent(), path.parent());

        commit_output(staged, &path).unwrap();
        assert_eq!(read_input(&path).await.unwrap(), b"payload");
    }

    #[tokio::test]
    async fn test_commit_replaces_existing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.bin");
        std::fs::write(&path, b"old").unwrap();

        commit_output(stage_output(&path, b"new").await.unwrap(), &path).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"new");
    }

    #[tokio::test]
    async fn test_dropped_stage_leaves_nothing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.bin");

        drop(stage_output(&path, b"payload").await.unwrap());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_validate_input() {
        let dir = tempdir().unwrap();
        let empty = dir.path().join("empty.txt");
        std::fs::write(&empty, b"").unwrap();
        let full = dir.path().join("full.txt");
        std::fs::write(&full, b"data").unwrap();

        assert!(validate_input(&full).await.is_ok());
        assert!(validate_input(&empty).await.is_err());
        assert!(validate_input(dir.path()).await.is_err());
        assert!(validate_input(&dir.path().join("missing")).await.is_err());
    }
}
