//! Scoped per-run copies of the pristine input.

use std::path::Path;

use tempfile::{Builder, TempPath};
use util::paths::safe_stem;

use crate::error::RunnerError;

/// A uniquely named file in the work directory, deleted when dropped.
///
/// Dropping covers every exit path of a run: normal return, `?`, timeout and
/// task cancellation.
#[derive(Debug)]
pub struct WorkingFile {
    path: TempPath,
}

impl WorkingFile {
    /// Creates a fresh copy of `input` inside `work_dir`.
    pub async fn copy_of(input: &Path, work_dir: &Path) -> Result<Self, RunnerError> {
        let file = Self::empty(work_dir, &safe_stem(input))?;
        tokio::fs::copy(input, &*file.path)
            .await
            .map_err(|source| RunnerError::WorkingFile {
                path: input.to_path_buf(),
                source,
            })?;
        Ok(file)
    }

    /// Creates an empty uniquely named file, e.g. for a tool's diagnostic log.
    pub fn empty(work_dir: &Path, label: &str) -> Result<Self, RunnerError> {
        let file = Builder::new()
            .prefix(&format!("{label}-"))
            .suffix(".tmp")
            .tempfile_in(work_dir)
            .map_err(|source| RunnerError::WorkingFile {
                path: work_dir.to_path_buf(),
                source,
            })?;
        // Only the path is kept: the program under test opens the file itself.
        Ok(Self {
            path: file.into_temp_path(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn read(&self) -> Result<Vec<u8>, RunnerError> {
        tokio::fs::read(&*self.path)
            .await
            .map_err(|source| RunnerError::WorkingFile {
                path: self.path.to_path_buf(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use util::test_helpers::{count_entries, write_file};

    #[tokio::test]
    async fn test_copy_is_private_and_removed_on_drop() {
        let fixtures = tempfile::tempdir().unwrap();
        let work = tempfile::tempdir().unwrap();
        let input = write_file(fixtures.path(), "table.txt", "a\nb\n").unwrap();

        let first = WorkingFile::copy_of(&input, work.path()).await.unwrap();
        let second = WorkingFile::copy_of(&input, work.path()).await.unwrap();
        assert_ne!(first.path(), second.path());
        assert!(first.path().file_name().unwrap().to_string_lossy().starts_with("table-"));
        assert_eq!(first.read().await.unwrap(), b"a\nb\n");
        assert_eq!(count_entries(work.path()).unwrap(), 2);

        drop(first);
        drop(second);
        assert_eq!(count_entries(work.path()).unwrap(), 0);
    }

    #[tokio::test]
    async fn test_missing_input_leaves_nothing_behind() {
        let work = tempfile::tempdir().unwrap();
        let err = WorkingFile::copy_of(Path::new("/definitely/not/here.txt"), work.path())
            .await
            .unwrap_err();
        assert!(matches!(err, RunnerError::WorkingFile { .. }));
        assert!(!err.is_fatal());
        assert_eq!(count_entries(work.path()).unwrap(), 0);
    }
}
