//! clang-vim - Command Line Entry Point
//!
//! Runs the exported entry points outside the editor, which is how the
//! plugin's requests are reproduced and debugged from a shell.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{Level, debug};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use clang_vim::query::InputFormat;
use clang_vim::vim::{ENTRY_POINTS, registry};
use clang_vim::{CompileArgs, Config, LocationArgs};

/// Drive the clang-vim entry points from the command line.
#[derive(Parser, Debug)]
#[command(name = "clang-vim")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Log level: trace, debug, info, warn, error.
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    /// Log output format.
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    log_format: LogFormat,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Call an entry point the way the editor does and print its output.
    Call {
        /// Entry point name, e.g. `vim_clang_get_definition_at`.
        name: String,
        /// Argument string (`file:flags` or `file:flags:line:col`).
        #[arg(default_value = "")]
        input: String,
    },
    /// List every entry point with the argument it expects.
    List,
    /// Print the effective configuration as JSON.
    Config,
    /// Show how an argument string is decoded.
    Decode {
        /// Argument string to decode.
        input: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

impl Args {
    /// Parses the log level string into a tracing Level.
    fn parse_log_level(&self) -> Result<Level> {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Ok(Level::TRACE),
            "debug" => Ok(Level::DEBUG),
            "info" => Ok(Level::INFO),
            "warn" => Ok(Level::WARN),
            "error" => Ok(Level::ERROR),
            other => anyhow::bail!("invalid log level: {}", other),
        }
    }
}

/// Initializes the tracing subscriber for logging.
fn init_tracing(level: Level, format: LogFormat) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("clang_vim={level}")));

    // stdout carries the payloads; logs go to stderr.
    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Text => registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .try_init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
    }
    .context("failed to initialize tracing subscriber")?;

    Ok(())
}

fn format_name(format: InputFormat) -> &'static str {
    match format {
        InputFormat::None => "-",
        InputFormat::File => "file:flags",
        InputFormat::Location => "file:flags:line:col",
    }
}

/// Renders the decoded form of an argument string, trying the location
/// form first.
fn decode(input: &str) -> Result<String> {
    let (compile, position) = match LocationArgs::parse(input) {
        Ok(location) => (location.compile, Some((location.line, location.column))),
        Err(_) => (
            CompileArgs::parse(input).context("not a valid argument string")?,
            None,
        ),
    };

    let mut lines = vec![format!("file:    {}", compile.file)];
    lines.push(format!("flags:   {}", compile.flags.join(" ")));
    if let Some(unsaved) = &compile.unsaved {
        lines.push(format!(
            "unsaved: {} ({} bytes)",
            unsaved.path.display(),
            unsaved.contents.len()
        ));
    }
    if let Some((line, column)) = position {
        lines.push(format!("line:    {line}"));
        lines.push(format!("column:  {column}"));
    }
    Ok(lines.join("\n"))
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = args.parse_log_level()?;
    init_tracing(log_level, args.log_format)?;

    match args.command {
        Command::Call { name, input } => {
            let entry = registry::lookup(&name)
                .with_context(|| format!("unknown entry point: {name}"))?;
            debug!(entry = entry.name, input = %input, "calling entry point");
            println!("{}", entry.call(&input));
        }
        Command::List => {
            for entry in ENTRY_POINTS {
                println!("{:<60} {}", entry.name, format_name(entry.query.input_format()));
            }
        }
        Command::Config => {
            let json = serde_json::to_string_pretty(Config::global())
                .context("failed to serialize configuration")?;
            println!("{json}");
        }
        Command::Decode { input } => println!("{}", decode(&input)?),
    }

    Ok(())
}
