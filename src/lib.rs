//! # oas-enhance
//!
//! Batch-enhances a directory of OpenAPI/Swagger specification files through
//! a chat-completion endpoint.
//!
//! Each file is sent, together with a fixed set of enhancement rules, to the
//! configured model. When the model answers with a JSON document that has an
//! `info.title`, the file is overwritten with that answer and renamed to
//! `<title>.json`.
//!
//! ## Quick Start
//!
//! ```no_run
//! use oas_enhance::{Config, Pipeline};
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = Config::builder()
//!     .input_dir("./specs")
//!     .api_key("sk-...")
//!     .endpoint("https://api.openai.com/v1/chat/completions")
//!     .model("gpt-4o")
//!     .build()?;
//!
//! Pipeline::new(config)?.run()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! Every file goes through the same stages, and a failure at any stage ends
//! work on that file only:
//! 1. **Scanner**: Lists the files directly inside the input directory
//! 2. **Request**: Pairs the enhancement instruction with the file text
//! 3. **Transport**: Posts the request to the endpoint
//! 4. **Response**: Pulls the generated text out of the completion envelope
//! 5. **Commit**: Overwrites and renames the file

#![warn(
    missing_docs,
    rust_2018_idioms,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery
)]
#![allow(clippy::module_name_repetitions)]

mod config;
mod error;
mod file;
mod pipeline;
mod scanner;

pub mod commit;
pub mod prompt;
pub mod request;
pub mod response;
pub mod transport;

pub use commit::{CollisionPolicy, Commit, Committer, FencedJsonPolicy, OutputPolicy, SkipReason};
pub use config::{Config, ConfigBuilder};
pub use error::{Error, Result};
pub use file::TargetFile;
pub use pipeline::{BatchReport, FileOutcome, FileReport, Pipeline};
pub use prompt::Instruction;
pub use request::{ChatMessage, ChatRequest, Role};
pub use transport::{ChatTransport, HttpTransport};

/// Enhances every file of the configured directory over HTTP.
///
/// # Errors
///
/// Returns an error if:
/// - Configuration is invalid
/// - The HTTP client cannot be created
/// - The input directory cannot be listed
///
/// Per-file failures are reported in the returned [`BatchReport`].
pub fn run(config: Config) -> Result<BatchReport> {
    Pipeline::new(config)?.run()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(dir: &std::path::Path) -> Config {
        Config::builder()
            .input_dir(dir)
            .api_key("sk-test")
            .endpoint("http://127.0.0.1:9/v1/chat/completions")
            .model("gpt-4o")
            .build()
            .unwrap()
    }

    #[test]
    fn test_run_empty_directory() {
        let temp = assert_fs::TempDir::new().unwrap();
        let report = run(config(temp.path())).unwrap();
        assert_eq!(report.total(), 0);
    }

    #[test]
    fn test_run_revalidates_config() {
        let temp = assert_fs::TempDir::new().unwrap();
        let dir = temp.path().join("specs");
        std::fs::create_dir(&dir).unwrap();
        let config = config(&dir);
        std::fs::remove_dir(&dir).unwrap();

        let err = run(config).unwrap_err();
        assert!(err.is_config());
    }
}
