use anyhow::Context;
use clap::Parser;
use oas_enhance::{CollisionPolicy, Config};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(
    name = "oas-enhance",
    version,
    author,
    about = "Enhance OpenAPI/Swagger files with a chat-completion model",
    long_about = "Enhance OpenAPI/Swagger files with a chat-completion model.\n\n\
    Every file directly inside INPUT_DIR is sent to ENDPOINT together with a fixed set \
    of documentation rules. When the model answers with a JSON document carrying \
    info.title, the file is overwritten with that answer and renamed to '<title>.json'. \
    Files that fail are left untouched and the batch continues.\n\n\
    USAGE EXAMPLES:\n  \
      # Enhance every spec in ./specs\n  \
      oas-enhance ./specs \"$OPENAI_API_KEY\" https://api.openai.com/v1/chat/completions gpt-4o\n\n  \
      # Add requirements of your own\n  \
      oas-enhance ./specs \"$OPENAI_API_KEY\" https://api.openai.com/v1/chat/completions gpt-4o \\\n    \
        \"All examples must use EUR amounts\"\n\n  \
      # See what would be renamed without touching files\n  \
      oas-enhance ./specs \"$OPENAI_API_KEY\" https://api.openai.com/v1/chat/completions gpt-4o --dry-run"
)]
struct Cli {
    /// Directory containing the specification files
    #[arg(value_name = "INPUT_DIR")]
    input_dir: PathBuf,

    /// API key sent as a bearer token
    #[arg(value_name = "API_KEY")]
    api_key: String,

    /// Chat-completion endpoint URL
    #[arg(value_name = "ENDPOINT")]
    endpoint: String,

    /// Model identifier
    #[arg(value_name = "MODEL")]
    model: String,

    /// Additional requirements appended to the built-in rules
    #[arg(value_name = "INSTRUCTIONS")]
    instructions: Option<String>,

    /// Call the endpoint but don't modify any file
    #[arg(long)]
    dry_run: bool,

    /// Keep a timestamped copy of each file before overwriting it
    #[arg(long)]
    backup: bool,

    /// Replace an existing '<title>.json' instead of failing the file
    #[arg(long)]
    overwrite: bool,

    /// Verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_tracing(cli.verbose);

    let on_collision = if cli.overwrite {
        CollisionPolicy::Overwrite
    } else {
        CollisionPolicy::Fail
    };

    let mut builder = Config::builder()
        .input_dir(cli.input_dir)
        .api_key(cli.api_key)
        .endpoint(cli.endpoint)
        .model(cli.model)
        .dry_run(cli.dry_run)
        .backup_existing(cli.backup)
        .on_collision(on_collision);

    if let Some(instructions) = cli.instructions {
        builder = builder.instructions(instructions);
    }

    let config = builder.build().context("Failed to build configuration")?;

    // Per-file failures are logged by the pipeline and do not change the exit status.
    oas_enhance::run(config).context("Batch execution failed")?;

    Ok(())
}

fn setup_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => EnvFilter::new("oas_enhance=info"),
        1 => EnvFilter::new("oas_enhance=debug"),
        _ => EnvFilter::new("oas_enhance=trace"),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_writer(std::io::stderr),
        )
        .init();
}
