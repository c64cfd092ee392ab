// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{debug, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::PathBuf;

use signgloss::app_config::{Config, LogLevel, ProviderKind};
use signgloss::{AppError, Controller};

/// CLI Wrapper for ProviderKind to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliProvider {
    Ollama,
    #[value(name = "openai")]
    OpenAI,
    Anthropic,
    #[value(name = "lmstudio")]
    LMStudio,
}

impl From<CliProvider> for ProviderKind {
    fn from(cli_provider: CliProvider) -> Self {
        match cli_provider {
            CliProvider::Ollama => ProviderKind::Ollama,
            CliProvider::OpenAI => ProviderKind::OpenAI,
            CliProvider::Anthropic => ProviderKind::Anthropic,
            CliProvider::LMStudio => ProviderKind::LMStudio,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LogLevel::Error,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Trace => LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert a sentence to gloss and sign media
    Convert {
        /// English text to convert
        #[arg(value_name = "TEXT")]
        text: String,
    },

    /// Explain a concept and convert the explanation to signs
    Search {
        /// Concept to look up, e.g. a place or a name
        #[arg(value_name = "QUERY")]
        query: String,
    },

    /// Generate shell completions for signgloss
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// signgloss - English to sign language gloss with sign media
#[derive(Parser, Debug)]
#[command(name = "signgloss")]
#[command(version)]
#[command(about = "Convert English text to sign language gloss and sign videos")]
#[command(long_about = "signgloss converts English text to sign language gloss and resolves every gloss
word to a sign video from the local media directory, a remote sign dictionary or
fingerspelling.

EXAMPLES:
    signgloss convert \"The cat is running\"         # Gloss a sentence
    signgloss search Chennai                        # Explain a concept in signs
    signgloss --no-model convert \"I went home\"     # Rule-based glossing only
    signgloss -p openai -m gpt-4o search Rust       # Use a specific provider and model
    signgloss completions bash > signgloss.bash     # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config. If the config file doesn't exist, a default one
    will be created automatically. API keys may also come from OPENAI_API_KEY and
    ANTHROPIC_API_KEY (a .env file is read when present).")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json", global = true)]
    config: PathBuf,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,

    /// Media directory holding the sign clips
    #[arg(long, global = true, env = "SIGNGLOSS_MEDIA_DIR")]
    media_dir: Option<PathBuf>,

    /// Provider used for glossing and explanations
    #[arg(short, long, value_enum, global = true)]
    provider: Option<CliProvider>,

    /// Model name for the glossing and explanation providers
    #[arg(short, long, global = true)]
    model: Option<String>,

    /// Disable generative models, use rules and the encyclopedia only
    #[arg(long, global = true)]
    no_model: bool,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌ ",
            Level::Warn => "🚧 ",
            Level::Info => " ",
            Level::Debug => "🔍 ",
            Level::Trace => "📋 ",
        }
    }

    // @returns: ANSI color code for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "1;31",
            Level::Warn => "1;33",
            Level::Info => "1;32",
            Level::Debug => "1;36",
            Level::Trace => "1;35",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let emoji = Self::get_emoji_for_level(record.level());
            let color = Self::get_color_for_level(record.level());

            // stdout carries the JSON response, logs go to stderr
            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "\x1B[{}m{} {} {}\x1B[0m", color, now, emoji, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn level_filter(level: &LogLevel) -> LevelFilter {
    match level {
        LogLevel::Error => LevelFilter::Error,
        LogLevel::Warn => LevelFilter::Warn,
        LogLevel::Info => LevelFilter::Info,
        LogLevel::Debug => LevelFilter::Debug,
        LogLevel::Trace => LevelFilter::Trace,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger at trace and narrow it with set_max_level once the config is known
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "signgloss", &mut std::io::stdout());
        return Ok(());
    }

    if dotenvy::dotenv().is_ok() {
        debug!("Loaded environment from .env");
    }

    let config = load_config(&cli)?;
    log::set_max_level(level_filter(&config.log_level));

    let controller = Controller::with_config(config)
        .context("Configuration validation failed")?;

    let response = match &cli.command {
        Commands::Convert { text } => controller.convert_sentence(text).await,
        Commands::Search { query } => controller.search_convert(query).await,
        Commands::Completions { .. } => return Ok(()),
    };

    match response {
        Ok(response) => {
            println!("{}", serde_json::to_string_pretty(&response)?);
            Ok(())
        }
        Err(AppError::EmptyInput(message)) => {
            println!("{}", serde_json::to_string_pretty(&serde_json::json!({ "error": message }))?);
            std::process::exit(2);
        }
        Err(e) => Err(e.into()),
    }
}

/// Load the configuration file and apply command line overrides
fn load_config(cli: &CommandLineOptions) -> Result<Config> {
    let mut config = Config::load_or_create(&cli.config)?;

    if let Some(log_level) = &cli.log_level {
        config.log_level = log_level.clone().into();
    }

    if let Some(media_dir) = &cli.media_dir {
        config.media.media_dir = media_dir.clone();
    }

    if let Some(provider) = &cli.provider {
        let kind: ProviderKind = provider.clone().into();
        config.gloss.provider = kind.clone();
        config.explanation.provider = kind;
    }

    if let Some(model) = &cli.model {
        config.set_model(model);
    }

    if cli.no_model {
        config.gloss.use_model = false;
        config.explanation.use_model = false;
    }

    Ok(config)
}
