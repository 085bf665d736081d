// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{error, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::{Path, PathBuf};

use loctool::app_config::{self, Config};
use loctool::app_controller::Controller;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Extract translatable fields of a source asset into an exchange table
    Extract {
        /// Source asset (defaults to files.default_input)
        input: Option<PathBuf>,
        /// Exchange table to write (defaults to files.default_table)
        table: Option<PathBuf>,
    },

    /// Translate the pending rows of an exchange table
    Translate {
        /// Exchange table to read (defaults to files.default_table)
        table_in: Option<PathBuf>,
        /// Exchange table to write (defaults to files.default_table_out)
        table_out: Option<PathBuf>,
        #[command(flatten)]
        glossary: GlossaryArgs,
    },

    /// Write translations from an exchange table back into the source asset
    Apply {
        /// Source asset (defaults to files.default_input)
        input: Option<PathBuf>,
        /// Exchange table with translations (defaults to files.default_table)
        table: Option<PathBuf>,
        /// Translated asset to write (defaults to files.default_output)
        output: Option<PathBuf>,
        /// Also apply empty translations, blanking the field
        #[arg(long)]
        apply_empty: bool,
    },

    /// Extract, translate and apply in one pass
    All {
        /// Source asset (defaults to files.default_input)
        input: Option<PathBuf>,
        /// Translated asset to write (defaults to files.default_output)
        output: Option<PathBuf>,
        #[command(flatten)]
        glossary: GlossaryArgs,
    },

    /// Estimate request count and cost of translating a table, without calling the backend
    Estimate {
        /// Exchange table to inspect (defaults to files.default_table)
        table: Option<PathBuf>,
        /// Price per million characters
        #[arg(long)]
        price_per_million: Option<f64>,
    },

    /// Generate shell completions for loctool
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug)]
struct GlossaryArgs {
    /// Glossary JSON file, overrides backend.glossary_path
    #[arg(short, long)]
    glossary: Option<PathBuf>,
}

/// loctool - localization exchange table workflow
///
/// Pulls translatable strings out of a game text asset into a delimited
/// exchange table, machine-translates the pending rows in character-bounded
/// batches, and writes the translations back.
#[derive(Parser, Debug)]
#[command(name = "loctool")]
#[command(version)]
#[command(about = "Localization exchange table translator")]
#[command(long_about = "loctool extracts translatable strings into an exchange table, translates them and applies them back.

EXAMPLES:
    loctool extract input.txt strings.tsv              # Build the exchange table
    loctool translate strings.tsv strings_out.tsv      # Translate pending rows
    loctool apply input.txt strings_out.tsv output.txt # Write translations back
    loctool all input.txt output.txt -g glossary.json  # Everything in one pass
    loctool estimate strings.tsv --price-per-million 250
    loctool completions bash > loctool.bash

CONFIGURATION:
    Configuration is read from config.json by default. Use --config to point
    at another file. A missing configuration file is an error.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "config.json")]
    config: PathBuf,

    /// Exchange table delimiter (`#`, `,`, `;`, `|`, `tab` or any single ASCII character)
    #[arg(short, long, global = true)]
    delimiter: Option<String>,

    /// Source language code, `auto` for detection
    #[arg(short, long, global = true)]
    source_language: Option<String>,

    /// Target language code
    #[arg(short, long, global = true)]
    target_language: Option<String>,

    /// Set logging level
    #[arg(short, long, global = true, value_enum)]
    log_level: Option<CliLogLevel>,
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

    // @returns: ANSI color for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
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
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {:<5} {}\x1B[0m",
                Self::color_for_level(record.level()),
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() {
    // The logger accepts everything; the effective level is set through max_level
    if CustomLogger::init(LevelFilter::Trace).is_ok() {
        log::set_max_level(LevelFilter::Info);
    }

    let cli = CommandLineOptions::parse();

    if let Err(e) = run(cli).await {
        error!("[ERROR] {:#}", e);
        log::logger().flush();
        std::process::exit(1);
    }
}

async fn run(cli: CommandLineOptions) -> Result<()> {
    if let Some(cmd_log_level) = &cli.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    if let Commands::Completions { shell } = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "loctool", &mut std::io::stdout());
        return Ok(());
    }

    let config = load_config(&cli)?;
    if cli.log_level.is_none() {
        log::set_max_level(config.log_level.to_level_filter());
    }

    let controller = Controller::with_config(config)?;
    let files = controller.config().files.clone();
    let or_default = |path: Option<PathBuf>, default: &str| path.unwrap_or_else(|| Path::new(default).to_path_buf());

    match cli.command {
        Commands::Extract { input, table } => {
            let input = or_default(input, files.default_input.as_str());
            let table = or_default(table, files.default_table.as_str());
            controller.extract(&input, &table)?;
        }
        Commands::Translate {
            table_in,
            table_out,
            glossary,
        } => {
            let table_in = or_default(table_in, files.default_table.as_str());
            let table_out = or_default(table_out, files.default_table_out.as_str());
            controller
                .translate(&table_in, &table_out, glossary.glossary.as_deref())
                .await?;
        }
        Commands::Apply {
            input,
            table,
            output,
            apply_empty,
        } => {
            let input = or_default(input, files.default_input.as_str());
            let table = or_default(table, files.default_table.as_str());
            let output = or_default(output, files.default_output.as_str());
            controller.apply(&input, &table, &output, apply_empty)?;
        }
        Commands::All { input, output, glossary } => {
            let input = or_default(input, files.default_input.as_str());
            let output = or_default(output, files.default_output.as_str());
            controller.all(&input, &output, glossary.glossary.as_deref()).await?;
        }
        Commands::Estimate {
            table,
            price_per_million,
        } => {
            let table = or_default(table, files.default_table.as_str());
            controller.estimate(&table, price_per_million)?;
        }
        Commands::Completions { .. } => {}
    }

    Ok(())
}

// @returns: Config file contents with command line overrides applied
fn load_config(cli: &CommandLineOptions) -> Result<Config> {
    let mut config = Config::load(&cli.config).context("Failed to load configuration")?;

    if let Some(delimiter) = &cli.delimiter {
        config.delimiter = delimiter.clone();
    }

    if let Some(source_lang) = &cli.source_language {
        config.backend.default_source_lang = source_lang.clone();
    }

    if let Some(target_lang) = &cli.target_language {
        config.backend.default_target_lang = target_lang.clone();
    }

    if let Some(log_level) = &cli.log_level {
        config.log_level = log_level.clone().into();
    }

    Ok(config)
}
