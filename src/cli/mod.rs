//! CLI argument parsing module
//!
//! This module handles command-line argument parsing and the application
//! entry point.

use clap::{Arg, ArgMatches, Command};

use crate::browser::BrowserCookieExtractor;
use crate::cache::{CacheStore, FileCacheStore};
use crate::config::{BrowserCookieConfig, OutputConfig};
use crate::error::{MelcookieError, Result};
use crate::extract::{cached_status_line, ExtractController};
use crate::i18n;
use crate::output::{ConsoleStatus, ResultWriter, StatusSink};
use crate::session::WATCHED_DOMAIN;
use crate::utils::{FileUtils, StringUtils};
use crate::watch::{self, CookieWatcher};
use chrono::Utc;

/// Main entry point for the CLI application
pub fn run() {
    crate::logging::init();

    let app = create_app();
    let matches = app.get_matches();

    match run_with_args(&matches) {
        Ok(()) => {}
        Err(e) => {
            log::debug!("operation failed: {}", e);
            let mut status = ConsoleStatus::new(OutputConfig::default());
            status.error(&i18n::localize_error(&e));
            std::process::exit(crate::exit_code::exit_code_for_error(&e));
        }
    }
}

/// Run melcookie with parsed command line arguments
fn run_with_args(matches: &ArgMatches) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| MelcookieError::Config(format!("Failed to create async runtime: {}", e)))?;

    rt.block_on(async {
        match matches.subcommand() {
            Some(("extract", sub)) => run_extract(sub).await,
            Some(("copy", sub)) => run_copy(sub),
            Some(("status", sub)) => run_status(sub),
            Some(("watch", sub)) => run_watch(sub).await,
            _ => Err(MelcookieError::Config("Unknown subcommand".to_string())),
        }
    })
}

/// Create the CLI application structure
fn create_app() -> Command {
    Command::new("melcookie")
        .version(crate::VERSION)
        .about("Extract MELCloud Home session cookies straight from your browser")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Verbose output")
                .global(true)
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("silent")
                .short('s')
                .long("silent")
                .help("Suppress status messages")
                .global(true)
                .action(clap::ArgAction::SetTrue),
        )
        .subcommand(
            Command::new("extract")
                .about("Read the session cookies and print the cookie header string")
                .arg(browser_arg())
                .arg(
                    Arg::new("copy")
                        .short('c')
                        .long("copy")
                        .help("Also copy the extracted string to the clipboard")
                        .action(clap::ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .value_name("FILE")
                        .help("Write the cookie string to a file instead of stdout"),
                ),
        )
        .subcommand(
            Command::new("copy").about("Copy the last extracted cookie string to the clipboard"),
        )
        .subcommand(
            Command::new("status").about("Show how long ago the last cookie was extracted"),
        )
        .subcommand(
            Command::new("watch")
                .about("Log changes to the watched domain's cookies")
                .arg(browser_arg())
                .arg(
                    Arg::new("interval")
                        .long("interval")
                        .value_name("DURATION")
                        .help("Poll interval, e.g. 30, 90s, 2m"),
                ),
        )
}

fn browser_arg() -> Arg {
    Arg::new("browser")
        .short('b')
        .long("browser")
        .value_name("BROWSER[:PROFILE]")
        .help("Browser to read cookies from (chrome, firefox, edge, brave, ...)")
}

fn browser_config_from_args(matches: &ArgMatches) -> Result<BrowserCookieConfig> {
    match matches.get_one::<String>("browser") {
        Some(browser_str) => BrowserCookieConfig::parse(browser_str),
        None => Ok(BrowserCookieConfig::default()),
    }
}

fn output_config_from_args(matches: &ArgMatches) -> OutputConfig {
    OutputConfig {
        file: None,
        verbose: matches.get_flag("verbose"),
        silent: matches.get_flag("silent"),
    }
}

async fn run_extract(matches: &ArgMatches) -> Result<()> {
    let browser_config = browser_config_from_args(matches)?;
    let mut output = output_config_from_args(matches);
    if let Some(file) = matches.get_one::<String>("output") {
        output.file = Some(FileUtils::expand_path(file)?);
    }

    let mut status = ConsoleStatus::new(output.clone());
    status.verbose(&format!("Reading cookies from {}", browser_config.browser));

    let cache = FileCacheStore::new()?;
    status.verbose(&format!("Cache file: {}", cache.path().display()));

    if let Some(line) = cached_status_line(&cache, Utc::now())? {
        status.info(&line);
    }

    let extractor = BrowserCookieExtractor::new(browser_config);
    let mut controller = ExtractController::new(extractor, cache);
    let extraction = controller.extract(&mut status).await?;

    ResultWriter::new(output).write(&extraction.cookie_string)?;

    if matches.get_flag("copy") {
        crate::clipboard::copy_to_clipboard(&extraction.cookie_string)?;
        status.success(&i18n::copied_message());
    }

    Ok(())
}

fn run_copy(matches: &ArgMatches) -> Result<()> {
    let output = output_config_from_args(matches);
    let mut status = ConsoleStatus::new(output);

    let cache = FileCacheStore::new()?;
    let cached = cache.load()?.ok_or(MelcookieError::CacheEmpty)?;

    crate::clipboard::copy_to_clipboard(&cached.cookie_string)?;
    status.success(&i18n::copied_message());
    Ok(())
}

fn run_status(matches: &ArgMatches) -> Result<()> {
    let output = output_config_from_args(matches);
    let mut status = ConsoleStatus::new(output);

    let cache = FileCacheStore::new()?;
    if let Some(line) = cached_status_line(&cache, Utc::now())? {
        status.info(&line);
    }
    Ok(())
}

async fn run_watch(matches: &ArgMatches) -> Result<()> {
    let browser_config = browser_config_from_args(matches)?;
    let interval = match matches.get_one::<String>("interval") {
        Some(value) => StringUtils::parse_duration(value)?,
        None => watch::DEFAULT_POLL_INTERVAL,
    };

    let extractor = BrowserCookieExtractor::new(browser_config);
    let mut watcher = CookieWatcher::new(interval);
    watcher.on_change(Box::new(watch::log_change));
    watcher.run(&extractor, WATCHED_DOMAIN).await
}
