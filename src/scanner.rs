use crate::commit::is_backup_name;
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, trace, warn};
use walkdir::WalkDir;

/// Lists the target files of the input directory.
pub(crate) struct Scanner {
    input_dir: PathBuf,
}

impl Scanner {
    pub(crate) fn new(input_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
        }
    }

    /// Returns the regular files directly inside the input directory,
    /// ordered by file name.
    ///
    /// Sub-directories and symlinks are not followed. Backup copies from
    /// earlier runs and entries that cannot be inspected are left out.
    ///
    /// # Errors
    ///
    /// Returns an error if the input directory itself cannot be read.
    pub(crate) fn scan(&self) -> Result<Vec<PathBuf>> {
        debug!("Listing {}", self.input_dir.display());

        // Surface an unreadable root as an error instead of an empty batch.
        std::fs::read_dir(&self.input_dir).map_err(|e| Error::io(&self.input_dir, e))?;

        let mut files = Vec::new();

        for result in WalkDir::new(&self.input_dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(false)
            .sort_by_file_name()
        {
            match result {
                Ok(entry) if entry.file_type().is_file() => {
                    if is_backup_name(&entry.file_name().to_string_lossy()) {
                        debug!("Skipping backup {}", entry.path().display());
                        continue;
                    }
                    files.push(entry.into_path());
                }
                Ok(entry) => {
                    trace!("Skipping non-file entry {}", entry.path().display());
                }
                Err(e) => {
                    warn!("Walk error: {}", e);
                }
            }
        }

        debug!("Found {} files", files.len());
        Ok(files)
    }

    pub(crate) fn input_dir(&self) -> &Path {
        &self.input_dir
    }
}
