use crate::commit::CollisionPolicy;
use crate::error::{Error, Result};
use std::fmt;
use std::path::PathBuf;

/// Configuration for an enhancement run.
///
/// Use [`Config::builder()`] to construct a new configuration.
#[derive(Clone, Default)]
#[non_exhaustive]
pub struct Config {
    /// Directory holding the specification files
    pub input_dir: PathBuf,

    /// Bearer token for the completion endpoint
    pub api_key: String,

    /// Full URL of the chat-completion endpoint
    pub endpoint: String,

    /// Model identifier sent with every request
    pub model: String,

    /// Free-text requirements appended to the fixed rules
    pub instructions: Option<String>,

    /// Send requests but never touch the filesystem
    pub dry_run: bool,

    /// Copy each file aside before overwriting it
    pub backup_existing: bool,

    /// Behavior when the renamed file already exists
    pub on_collision: CollisionPolicy,
}

impl Config {
    /// Creates a new configuration builder.
    ///
    /// # Examples
    ///
    /// ```
    /// use oas_enhance::Config;
    ///
    /// let config = Config::builder()
    ///     .input_dir(".")
    ///     .api_key("sk-test")
    ///     .endpoint("https://api.openai.com/v1/chat/completions")
    ///     .model("gpt-4o")
    ///     .build()
    ///     .expect("valid configuration");
    /// ```
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Input directory doesn't exist or is not a directory
    /// - API key or model is empty
    /// - Endpoint is not an absolute http(s) URL
    pub fn validate(&self) -> Result<()> {
        if !self.input_dir.exists() {
            return Err(Error::config(format!(
                "Input directory does not exist: {}",
                self.input_dir.display()
            )));
        }

        if !self.input_dir.is_dir() {
            return Err(Error::config(format!(
                "Input path is not a directory: {}",
                self.input_dir.display()
            )));
        }

        if self.api_key.trim().is_empty() {
            return Err(Error::config("API key must not be empty"));
        }

        if self.model.trim().is_empty() {
            return Err(Error::config("Model identifier must not be empty"));
        }

        let url = reqwest::Url::parse(&self.endpoint).map_err(|e| {
            Error::config(format!("Invalid endpoint URL '{}': {e}", self.endpoint))
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::config(format!(
                "Endpoint must use http or https, got '{}'",
                url.scheme()
            )));
        }

        Ok(())
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("input_dir", &self.input_dir)
            .field("api_key", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("instructions", &self.instructions)
            .field("dry_run", &self.dry_run)
            .field("backup_existing", &self.backup_existing)
            .field("on_collision", &self.on_collision)
            .finish()
    }
}

/// Builder for creating a [`Config`].
#[derive(Default)]
pub struct ConfigBuilder {
    input_dir: Option<PathBuf>,
    api_key: Option<String>,
    endpoint: Option<String>,
    model: Option<String>,
    instructions: Option<String>,
    dry_run: bool,
    backup_existing: bool,
    on_collision: CollisionPolicy,
}

impl ConfigBuilder {
    /// Sets the directory holding the specification files.
    #[must_use]
    pub fn input_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.input_dir = Some(path.into());
        self
    }

    /// Sets the bearer token.
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the chat-completion endpoint URL.
    #[must_use]
    pub fn endpoint(mut self, url: impl Into<String>) -> Self {
        self.endpoint = Some(url.into());
        self
    }

    /// Sets the model identifier.
    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Sets additional requirements appended to the fixed rules.
    #[must_use]
    pub fn instructions(mut self, text: impl Into<String>) -> Self {
        self.instructions = Some(text.into());
        self
    }

    /// Enables or disables dry-run mode.
    #[must_use]
    pub const fn dry_run(mut self, enabled: bool) -> Self {
        self.dry_run = enabled;
        self
    }

    /// Enables or disables backups before overwriting.
    #[must_use]
    pub const fn backup_existing(mut self, enabled: bool) -> Self {
        self.backup_existing = enabled;
        self
    }

    /// Sets the collision policy for renames.
    #[must_use]
    pub const fn on_collision(mut self, policy: CollisionPolicy) -> Self {
        self.on_collision = policy;
        self
    }

    /// Builds and validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a required field is missing or validation fails.
    pub fn build(self) -> Result<Config> {
        let config = Config {
            input_dir: self
                .input_dir
                .ok_or_else(|| Error::config("input_dir is required"))?,
            api_key: self
                .api_key
                .ok_or_else(|| Error::config("api_key is required"))?,
            endpoint: self
                .endpoint
                .ok_or_else(|| Error::config("endpoint is required"))?,
            model: self.model.ok_or_else(|| Error::config("model is required"))?,
            instructions: self.instructions,
            dry_run: self.dry_run,
            backup_existing: self.backup_existing,
            on_collision: self.on_collision,
        };

        config.validate()?;
        Ok(config)
    }
}
