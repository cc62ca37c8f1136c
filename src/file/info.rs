use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use anyhow::{Context, Result, ensure};
use bytesize::ByteSize;

/// Snapshot of the selected input, captured once at selection time.
///
/// Later changes to the file on disk are not reflected here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    path: PathBuf,
    name: String,
    size: u64,
    extension: String,
    modified: SystemTime,
}

impl FileInfo {
    /// Reads the metadata of `path` and records it with an absolute path.
    ///
    /// # Errors
    ///
    /// Fails if the path cannot be stat'ed or is not a regular file.
    pub async fn capture(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let meta = tokio::fs::metadata(path).await.with_context(|| format!("failed to get metadata: {}", path.display()))?;
        ensure!(meta.is_file(), "not a regular file: {}", path.display());

        let path = std::path::absolute(path).with_context(|| format!("failed to resolve path: {}", path.display()))?;
        let name = path.file_name().map_or_else(|| "unknown".to_owned(), |name| name.to_string_lossy().into_owned());
        let extension = name.rsplit_once('.').map(|(_, ext)| ext.to_lowercase()).unwrap_or_default();
        let modified = meta.modified().unwrap_or(SystemTime::UNIX_EPOCH);

        Ok(Self { path, name, size: meta.len(), extension, modified })
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Lowercase text after the last `.` in the name, or empty.
    #[inline]
    pub fn extension(&self) -> &str {
        &self.extension
    }

    #[inline]
    pub fn modified(&self) -> SystemTime {
        self.modified
    }

    /// Size in 1024-based units labelled `B`, `KB`, `MB`, ... with one
    /// decimal, e.g. `1.5 KB`.
    pub fn formatted_size(&self) -> String {
        ByteSize::b(self.size).to_string().replace("iB", "B")
    }

    /// Age of the last modification relative to `now`, in whole days, hours or
    /// minutes.
    pub fn formatted_modified_at(&self, now: SystemTime) -> String {
        let age = now.duration_since(self.modified).unwrap_or(Duration::ZERO).as_secs();
        let (minutes, hours, days) = (age / 60, age / 3600, age / 86_400);

        if days > 0 {
            format!("{days} days ago")
        } else if hours > 0 {
            format!("{hours} hours ago")
        } else if minutes > 0 {
            format!("{minutes} minutes ago")
        } else {
            "Just now".to_owned()
        }
    }

    pub fn formatted_modified(&self) -> String {
        self.formatted_modified_at(SystemTime::now())
    }

    /// Captures every path that can still be read, skipping the rest.
    pub async fn capture_all(paths: impl IntoIterator<Item = PathBuf>) -> Vec<Self> {
        let mut files = Vec::new();
        for path in paths {
            match Self::capture(&path).await {
                Ok(info) => files.push(info),
                Err(err) => tracing::debug!(path = %path.display(), "skipping file: {err:#}"),
            }
        }
        files
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[tokio::test]
    async fn test_capture() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("Report.PDF");
        std::fs::write(&path, b"Hello, CryptingTool!").unwrap();

        let info = FileInfo::capture(&path).await.unwrap();
        assert_eq!(info.name(), "Report.PDF");
        assert_eq!(info.extension(), "pdf");
        assert_eq!(info.size(), 20);
        assert!(info.path().is_absolute());
        assert_eq!(info.formatted_size(), "20 B");
    }

    #[tokio::test]
    async fn test_formatted_size_units() {
        let dir = tempdir().unwrap();
        let capture = |name: &'static str, len: usize| {
            let path = dir.path().join(name);
            std::fs::write(&path, vec![0u8; len]).unwrap();
            async move { FileInfo::capture(&path).await.unwrap().formatted_size() }
        };

        assert_eq!(capture("small.bin", 1023).await, "1023 B");
        assert_eq!(capture("kilo.bin", 1536).await, "1.5 KB");
        assert_eq!(capture("mega.bin", 1024 * 1024).await, "1.0 MB");
    }

    #[tokio::test]
    async fn test_capture_without_extension() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("README");
        std::fs::write(&path, b"x").unwrap();

        assert_eq!(FileInfo::capture(&path).await.unwrap().extension(), "");
    }

    #[tokio::test]
    async fn test_capture_rejects_missing_and_directories() {
        let dir = tempdir().unwrap();
        assert!(FileInfo::capture(dir.path().join("missing.txt")).await.is_err());
        assert!(FileInfo::capture(dir.path()).await.is_err());
    }

    #[tokio::test]
    async fn test_formatted_modified() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.txt");
        std::fs::write(&path, b"x").unwrap();

        let info = FileInfo::capture(&path).await.unwrap();
        let at = |secs| info.formatted_modified_at(info.modified() + Duration::from_secs(secs));

        assert_eq!(at(30), "Just now");
        assert_eq!(at(300), "5 minutes ago");
        assert_eq!(at(7200), "2 hours ago");
        assert_eq!(at(3 * 86_400), "3 days ago");
    }

    #[tokio::test]
    async fn test_capture_all_skips_unreadable() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), b"a").unwrap();
        std::fs::write(dir.path().join("c.txt"), b"c").unwrap();
        let paths = vec![dir.path().join("a.txt"), dir.path().join("gone.txt"), dir.path().to_path_buf(), dir.path().join("c.txt")];

        let names: Vec<_> = FileInfo::capture_all(paths).await.iter().map(|info| info.name().to_owned()).collect();
        assert_eq!(names, ["a.txt", "c.txt"]);
    }
}
