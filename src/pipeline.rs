use crate::{
    commit::{Commit, Committer, SkipReason},
    config::Config,
    error::{Error, Result},
    file::{display_name, TargetFile},
    prompt::Instruction,
    request::ChatRequest,
    response::extract_content,
    scanner::Scanner,
    transport::{ChatTransport, HttpTransport},
};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, instrument, warn};

/// Terminal state of one target file.
#[derive(Debug, Clone)]
pub enum FileOutcome {
    /// Overwritten and renamed to `to`.
    Committed {
        /// Path after the rename
        to: PathBuf,
    },
    /// Dry run: would have been renamed to `to`.
    Planned {
        /// Path the file would be renamed to
        to: PathBuf,
    },
    /// Response was rejected by the output policy.
    Skipped(SkipReason),
    /// Any failure from reading the file to renaming it.
    Failed(Error),
}

/// Outcome of one target file.
#[derive(Debug, Clone)]
pub struct FileReport {
    /// Original path of the file
    pub path: PathBuf,

    /// What happened to it
    pub outcome: FileOutcome,
}

/// Tally of a batch run.
///
/// Informational only: a batch with failures still completes normally.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// Per-file outcomes in processing order
    pub files: Vec<FileReport>,

    /// Total execution time
    pub duration: Duration,
}

impl BatchReport {
    /// Number of files processed.
    #[must_use]
    pub fn total(&self) -> usize {
        self.files.len()
    }

    /// Number of files overwritten and renamed.
    #[must_use]
    pub fn committed(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Committed { .. }))
    }

    /// Number of files that would have been renamed in dry-run mode.
    #[must_use]
    pub fn planned(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Planned { .. }))
    }

    /// Number of files skipped by the output policy.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Skipped(_)))
    }

    /// Number of failed files.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Failed(_)))
    }

    fn count(&self, pred: impl Fn(&FileOutcome) -> bool) -> usize {
        self.files.iter().filter(|f| pred(&f.outcome)).count()
    }
}

/// Runs the enhancement pipeline over every file of the input directory.
pub struct Pipeline<T = HttpTransport> {
    config: Config,
    instruction: Instruction,
    scanner: Scanner,
    transport: T,
    committer: Committer,
}

impl Pipeline<HttpTransport> {
    /// Creates a pipeline that talks to the configured HTTP endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Configuration validation fails
    /// - The HTTP client cannot be initialized
    pub fn new(config: Config) -> Result<Self> {
        let transport = HttpTransport::new(&config.endpoint, &config.api_key)?;
        Self::with_transport(config, transport)
    }
}

impl<T: ChatTransport> Pipeline<T> {
    /// Creates a pipeline using the given transport.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration validation fails.
    pub fn with_transport(config: Config, transport: T) -> Result<Self> {
        config.validate()?;

        let instruction = Instruction::new(config.instructions.as_deref());
        let scanner = Scanner::new(&config.input_dir);
        let committer = Committer::new(config.on_collision, config.backup_existing, config.dry_run);

        Ok(Self {
            config,
            instruction,
            scanner,
            transport,
            committer,
        })
    }

    /// Processes every file and returns the per-file outcomes.
    ///
    /// Files are handled one at a time. A failure is logged and ends work
    /// on that file only.
    ///
    /// # Errors
    ///
    /// Returns an error only if the input directory cannot be listed.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use oas_enhance::{Config, Pipeline};
    ///
    /// # fn main() -> anyhow::Result<()> {
    /// let config = Config::builder()
    ///     .input_dir("./specs")
    ///     .api_key("sk-...")
    ///     .endpoint("https://api.openai.com/v1/chat/completions")
    ///     .model("gpt-4o")
    ///     .build()?;
    ///
    /// let report = Pipeline::new(config)?.run()?;
    /// println!("{} of {} files enhanced", report.committed(), report.total());
    /// # Ok(())
    /// # }
    /// ```
    #[instrument(skip(self), fields(input_dir = %self.config.input_dir.display(), model = %self.config.model))]
    pub fn run(self) -> Result<BatchReport> {
        let start_time = Instant::now();

        if self.config.dry_run {
            warn!("Dry run mode enabled - files will not be modified");
        }

        let paths = self.scanner.scan()?;
        info!(
            "Enhancing {} files in {}",
            paths.len(),
            self.scanner.input_dir().display()
        );

        let mut report = BatchReport::default();

        for path in paths {
            let outcome = match self.process(&path) {
                Ok(Commit::Committed { to, .. }) => {
                    info!("✓ {} -> {}", display_name(&path), display_name(&to));
                    FileOutcome::Committed { to }
                }
                Ok(Commit::Planned { to, .. }) => {
                    info!("Would rename {} -> {}", display_name(&path), display_name(&to));
                    FileOutcome::Planned { to }
                }
                Ok(Commit::Skipped(reason)) => {
                    info!("Skipped {} ({:?} output)", display_name(&path), reason);
                    FileOutcome::Skipped(reason)
                }
                Err(e) => {
                    error!("Failed to enhance {}: {}", path.display(), e);
                    FileOutcome::Failed(e)
                }
            };

            report.files.push(FileReport { path, outcome });
        }

        report.duration = start_time.elapsed();

        info!(
            "Batch finished in {:.2}s: {} committed, {} planned, {} skipped, {} failed",
            report.duration.as_secs_f64(),
            report.committed(),
            report.planned(),
            report.skipped(),
            report.failed()
        );

        Ok(report)
    }

    /// Runs one file through read, request, extract and commit.
    fn process(&self, path: &Path) -> Result<Commit> {
        let target = TargetFile::read(path)?;

        let request = ChatRequest::compose(&self.instruction, &self.config.model, &target.content);
        debug!("Requesting enhancement of {}", target.name());

        let body = self.transport.send(&request)?;
        let content = extract_content(&body)?;
        debug!("Received {} bytes for {}", content.len(), target.name());

        self.committer.commit(&target.path, &content)
    }
}
