use clap::{Parser, Subcommand};
use colored::*;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use fmtbridge::config::{FormatConfig, CONFIG_FILE_NAME};
use fmtbridge::exit_codes::exit;
use fmtbridge::init::create_default_config;
use fmtbridge::FormatRequest;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// File to format. Reads from stdin when omitted.
    file: Option<PathBuf>,

    /// Byte offset where the selection starts
    #[arg(long, default_value_t = 0)]
    offset: usize,

    /// Byte length of the selection (defaults to the rest of the document)
    #[arg(long)]
    length: Option<usize>,

    /// Coding style: a predefined style, "file", or an inline snippet
    #[arg(long)]
    style: Option<String>,

    /// Fallback style when "file" finds no configuration ("none" skips formatting)
    #[arg(long)]
    fallback_style: Option<String>,

    /// Filename to assume for style discovery and language detection
    #[arg(long)]
    assume_filename: Option<String>,

    /// Sort touched include lines
    #[arg(long, default_value = "false")]
    sort_includes: bool,

    /// Formatter executable to run
    #[arg(long)]
    tool: Option<String>,

    /// Timeout per invocation in milliseconds (0 = no timeout)
    #[arg(long)]
    timeout: Option<u64>,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<String>,

    /// Rewrite the file in place instead of printing to stdout
    #[arg(short, long)]
    in_place: bool,

    /// Show detailed output
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode
    #[arg(short, long)]
    quiet: bool,

    /// Command to run
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new configuration file
    Init,
}

/// Load the base configuration: explicit path, or upward discovery from the
/// current directory, or built-in defaults.
fn load_config(cli: &Cli) -> Result<FormatConfig, fmtbridge::ConfigError> {
    if let Some(path) = &cli.config {
        return FormatConfig::load(path);
    }
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    match FormatConfig::discover(&cwd)? {
        Some((config, path)) => {
            log::debug!("[fmtbridge] using config from {}", path.display());
            Ok(config)
        }
        None => Ok(FormatConfig::default()),
    }
}

/// Overlay CLI flags onto the loaded configuration.
fn apply_overrides(config: &mut FormatConfig, cli: &Cli) -> Result<(), fmtbridge::ConfigError> {
    if let Some(style) = &cli.style {
        config.style = style.parse()?;
    }
    if let Some(fallback) = &cli.fallback_style {
        config.fallback_style = fallback.parse()?;
    }
    if let Some(name) = &cli.assume_filename {
        config.set_assume_filename(name.clone())?;
    }
    if cli.sort_includes {
        config.sort_includes = true;
    }
    if let Some(tool) = &cli.tool {
        config.tool = tool.clone();
    }
    if let Some(timeout) = cli.timeout {
        config.timeout = timeout;
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if cli.verbose { "debug" } else { "warn" }),
    )
    .init();

    if let Some(Commands::Init) = cli.command {
        match create_default_config(CONFIG_FILE_NAME) {
            Ok(true) => {
                if !cli.quiet {
                    println!("Created default configuration file {CONFIG_FILE_NAME}");
                }
                exit::success();
            }
            Ok(false) => {
                println!("Configuration file {CONFIG_FILE_NAME} already exists");
                exit::success();
            }
            Err(e) => {
                eprintln!("{} {}", "Error:".red().bold(), e);
                exit::tool_error();
            }
        }
    }

    let mut config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            exit::tool_error();
        }
    };
    if let Err(e) = apply_overrides(&mut config, &cli) {
        eprintln!("{} {}", "Error:".red().bold(), e);
        exit::tool_error();
    }

    if cli.in_place && cli.file.is_none() {
        eprintln!("{} --in-place requires a file argument", "Error:".red().bold());
        exit::tool_error();
    }

    // Read the document
    let text = match &cli.file {
        Some(path) => match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                eprintln!("{} Failed to read {}: {}", "Error:".red().bold(), path.display(), e);
                exit::tool_error();
            }
        },
        None => {
            let mut text = String::new();
            if let Err(e) = io::stdin().read_to_string(&mut text) {
                eprintln!("{} Failed to read from stdin: {}", "Error:".red().bold(), e);
                exit::tool_error();
            }
            text
        }
    };

    let length = cli.length.unwrap_or_else(|| text.len().saturating_sub(cli.offset));
    let mut request = FormatRequest::new(text, cli.offset, length);
    if let Some(path) = &cli.file {
        request.source_path = Some(path.clone());
        request.working_dir = path.parent().map(PathBuf::from).filter(|p| !p.as_os_str().is_empty());
    }

    match fmtbridge::format_request(&request, &config) {
        Ok(formatted) => {
            if cli.in_place {
                let path = cli.file.as_ref().unwrap();
                if formatted == request.text {
                    if cli.verbose {
                        println!("{} is already formatted", path.display());
                    }
                } else if let Err(e) = std::fs::write(path, &formatted) {
                    eprintln!("{} Failed to write {}: {}", "Error:".red().bold(), path.display(), e);
                    exit::tool_error();
                } else if !cli.quiet {
                    println!("Formatted {}", path.display());
                }
            } else {
                // The formatted document is the only thing stdout carries
                let mut stdout = io::stdout().lock();
                if stdout.write_all(formatted.as_bytes()).is_err() {
                    exit::tool_error();
                }
            }
            exit::success();
        }
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            exit::format_failed();
        }
    }
}
