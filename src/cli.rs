use clap::{Parser, Subcommand};

// Display order for API key option (placed at top of help text)
const API_KEY_DISPLAY_ORDER: usize = 0;
// Display order for log level option (placed at end of help text)
const LOG_LEVEL_DISPLAY_ORDER: usize = 100;

/// CLI arguments
#[derive(Parser)]
#[command(name = "reviewcrew", version, about = "Multi-agent AI code review service", long_about = None)]
pub struct Cli {
    /// Log level (see https://docs.rs/tracing-subscriber/latest/tracing_subscriber/filter/struct.EnvFilter.html)
    /// [env: REVIEWCREW_LOG=] [default: info]
    #[arg(
        long,
        env = "REVIEWCREW_LOG",
        default_value = "info",
        global = true,
        hide_default_value = true,
        hide_env = true,
        display_order = LOG_LEVEL_DISPLAY_ORDER,
        verbatim_doc_comment
    )]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP/WebSocket review service
    Serve(ServeArgs),
    /// Review a file (or stdin) and print a Markdown report
    Review(ReviewArgs),
    /// Print the JSON Schema of the review response
    Schema,
}

/// Arguments for the serve command
#[derive(Parser)]
pub struct ServeArgs {
    /// Path to config file
    #[arg(long, default_value = "reviewcrew.toml")]
    pub config: String,

    /// LLM API key
    #[arg(long, env = "REVIEWCREW_LLM_API_KEY", display_order = API_KEY_DISPLAY_ORDER)]
    pub api_key: String,
}

/// Arguments for the review command
#[derive(Parser, Debug)]
pub struct ReviewArgs {
    /// File containing the code to review, or '-' for stdin
    pub file: String,

    /// Path to config file
    #[arg(long, default_value = "reviewcrew.toml")]
    pub config: String,

    /// LLM API key
    #[arg(long, env = "REVIEWCREW_LLM_API_KEY", display_order = API_KEY_DISPLAY_ORDER)]
    pub api_key: String,

    /// Language of the code under review
    #[arg(long, default_value = "python")]
    pub language: String,

    /// Additional context about what the code does
    #[arg(long)]
    pub context: Option<String>,
}
