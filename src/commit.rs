//! Writes an enhanced document back over its source file and renames it.
//!
//! Nothing on disk changes until the generated text has parsed, its title
//! has been turned into a usable file name, and the rename target has been
//! checked for collisions.

use crate::error::{Error, Result};
use serde_json::Value;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Marker of a fenced JSON code block in model output.
pub const FENCE_MARKER: &str = "```json";

/// Extension given to renamed documents.
pub const DOCUMENT_EXTENSION: &str = "json";

/// Infix between a file name and the timestamp of its backup copy.
const BACKUP_INFIX: &str = ".backup.";

/// `chrono` format of backup timestamps; always 17 digits.
const BACKUP_STAMP_FORMAT: &str = "%Y%m%d%H%M%S%3f";
const BACKUP_STAMP_LEN: usize = 17;

/// Why a generated document was not committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The model wrapped its answer in a markdown code block.
    Fenced,
}

/// Decides whether generated text is usable as a raw document.
pub trait OutputPolicy {
    /// Returns a reason to skip `content`, or `None` to go ahead.
    fn skip_reason(&self, content: &str) -> Option<SkipReason>;
}

/// Skips any output that contains [`FENCE_MARKER`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FencedJsonPolicy;

impl OutputPolicy for FencedJsonPolicy {
    fn skip_reason(&self, content: &str) -> Option<SkipReason> {
        content.contains(FENCE_MARKER).then_some(SkipReason::Fenced)
    }
}

/// What to do when `<title>.json` already exists next to the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollisionPolicy {
    /// Fail the file and leave everything untouched.
    #[default]
    Fail,
    /// Replace the existing file.
    Overwrite,
}

/// Result of a commit attempt that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Commit {
    /// The source was overwritten and renamed.
    Committed {
        /// Original path
        from: PathBuf,
        /// Path after the rename
        to: PathBuf,
    },
    /// Dry run: the commit would have happened.
    Planned {
        /// Original path
        from: PathBuf,
        /// Path the file would be renamed to
        to: PathBuf,
    },
    /// The output was rejected by the [`OutputPolicy`].
    Skipped(SkipReason),
}

/// Commits generated documents to disk.
pub struct Committer {
    policy: Box<dyn OutputPolicy>,
    on_collision: CollisionPolicy,
    backup_existing: bool,
    dry_run: bool,
}

impl Default for Committer {
    fn default() -> Self {
        Self::new(CollisionPolicy::default(), false, false)
    }
}

impl Committer {
    /// Creates a committer using [`FencedJsonPolicy`].
    #[must_use]
    pub fn new(on_collision: CollisionPolicy, backup_existing: bool, dry_run: bool) -> Self {
        Self {
            policy: Box::new(FencedJsonPolicy),
            on_collision,
            backup_existing,
            dry_run,
        }
    }

    /// Replaces the output policy.
    #[must_use]
    pub fn with_policy(mut self, policy: impl OutputPolicy + 'static) -> Self {
        self.policy = Box::new(policy);
        self
    }

    /// Commits `content` over `source` and renames it to `<title>.json`.
    ///
    /// # Process
    ///
    /// 1. Skips output rejected by the policy
    /// 2. Parses the content and reads `info.title`
    /// 3. Resolves and checks the rename target
    /// 4. Overwrites the source with the exact content
    /// 5. Renames the source within its directory
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not JSON, has no string title,
    /// the title is not a usable file name, the target collides, or a
    /// filesystem operation fails. A failure in step 4 can leave the source
    /// partially written; a failure in step 5 leaves it overwritten but not
    /// renamed.
    pub fn commit(&self, source: &Path, content: &str) -> Result<Commit> {
        if let Some(reason) = self.policy.skip_reason(content) {
            return Ok(Commit::Skipped(reason));
        }

        let title = document_title(content)?;
        let target = self.resolve_target(source, &title)?;

        if self.dry_run {
            return Ok(Commit::Planned {
                from: source.to_path_buf(),
                to: target,
            });
        }

        if self.backup_existing {
            backup_file(source)?;
        }

        overwrite(source, content)?;

        if target != source {
            fs::rename(source, &target).map_err(|e| Error::io(&target, e))?;
        }

        Ok(Commit::Committed {
            from: source.to_path_buf(),
            to: target,
        })
    }

    fn resolve_target(&self, source: &Path, title: &str) -> Result<PathBuf> {
        check_title(title)?;

        let target = source.with_file_name(format!("{title}.{DOCUMENT_EXTENSION}"));

        if target != source
            && target.symlink_metadata().is_ok()
            && !is_same_file(source, &target)
            && self.on_collision == CollisionPolicy::Fail
        {
            return Err(Error::Collision { path: target });
        }

        Ok(target)
    }
}

/// Parses `content` as JSON and returns `info.title`.
///
/// # Errors
///
/// Returns [`Error::Parse`] for invalid JSON and [`Error::MissingTitle`]
/// when `info.title` is absent or not a string.
pub fn document_title(content: &str) -> Result<String> {
    let document: Value = serde_json::from_str(content).map_err(|e| Error::Parse {
        message: e.to_string(),
    })?;

    document
        .get("info")
        .and_then(|info| info.get("title"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or(Error::MissingTitle)
}

/// Titles become file names verbatim, so reject the ones that would
/// escape the directory or cannot name a file at all.
fn check_title(title: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(Error::invalid_title(title, "title is empty"));
    }

    if title.contains(['/', '\\']) {
        return Err(Error::invalid_title(title, "title contains a path separator"));
    }

    if title.contains('\0') {
        return Err(Error::invalid_title(title, "title contains a NUL byte"));
    }

    Ok(())
}

/// Replaces the content of `path` in place, keeping its inode, mode and
/// hard links.
fn overwrite(path: &Path, content: &str) -> Result<()> {
    let mut file = fs::OpenOptions::new()
        .write(true)
        .truncate(true)
        .open(path)
        .map_err(|e| Error::io(path, e))?;

    file.write_all(content.as_bytes())
        .map_err(|e| Error::io(path, e))?;

    file.sync_all().map_err(|e| Error::io(path, e))
}

/// True when both paths name the same file, e.g. a case-only rename on a
/// case-insensitive filesystem.
#[cfg(unix)]
fn is_same_file(a: &Path, b: &Path) -> bool {
    use std::os::unix::fs::MetadataExt;

    match (fs::metadata(a), fs::metadata(b)) {
        (Ok(a), Ok(b)) => a.dev() == b.dev() && a.ino() == b.ino(),
        _ => false,
    }
}

#[cfg(not(unix))]
fn is_same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// True for backup copies this crate writes next to the targets.
#[must_use]
pub fn is_backup_name(name: &str) -> bool {
    name.rsplit_once(BACKUP_INFIX).is_some_and(|(stem, stamp)| {
        !stem.is_empty()
            && stamp.len() == BACKUP_STAMP_LEN
            && stamp.bytes().all(|b| b.is_ascii_digit())
    })
}

/// Copies `path` to a timestamped sibling before it gets overwritten.
fn backup_file(path: &Path) -> Result<PathBuf> {
    let filename = path
        .file_name()
        .ok_or_else(|| Error::config(format!("Invalid file path: {}", path.display())))?
        .to_string_lossy();

    let timestamp = chrono::Local::now().format(BACKUP_STAMP_FORMAT);
    let backup_path = path.with_file_name(format!("{filename}{BACKUP_INFIX}{timestamp}"));

    fs::copy(path, &backup_path).map_err(|e| Error::io(&backup_path, e))?;

    debug!("Created backup: {}", backup_path.display());
    Ok(backup_path)
}
