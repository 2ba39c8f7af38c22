use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// One specification file of the input directory, read into memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetFile {
    /// Path of the file
    pub path: PathBuf,

    /// Full UTF-8 text of the file
    pub content: String,
}

impl TargetFile {
    /// Reads the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid UTF-8.
    pub fn read(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let bytes = fs::read(&path).map_err(|e| Error::io(&path, e))?;
        let content = String::from_utf8(bytes).map_err(|_| Error::invalid_utf8(&path))?;

        Ok(Self { path, content })
    }

    /// Returns the file name for display.
    #[must_use]
    pub fn name(&self) -> String {
        display_name(&self.path)
    }
}

pub(crate) fn display_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().to_string())
}
