//! Command line and environment configuration
//!
//! Every option has an environment variable counterpart. `main` loads a
//! `.env` file from the working directory before parsing, so the file can
//! hold any of them.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::browser::BrowserSettings;
use crate::export::OutputFormat;
use crate::traits::{DEFAULT_URL, ScraperConfig};

#[derive(Debug, Parser)]
#[command(name = "nloto-scraper")]
#[command(about = "Extract the Мечталлион prize table into a CSV or XLSX file")]
#[command(version)]
pub struct Cli {
    /// Rules page holding the prize table
    #[arg(long, env = "SCRAPER_URL", default_value = DEFAULT_URL)]
    pub url: String,

    /// Output file
    #[arg(short, long, env = "SCRAPER_OUTPUT", default_value = "results.csv")]
    pub output: PathBuf,

    /// Output format; inferred from the output extension when omitted
    #[arg(short, long, env = "SCRAPER_FORMAT", value_enum)]
    pub format: Option<OutputFormat>,

    /// Directory a fetched Chromium is downloaded into
    #[arg(long, env = "SCRAPER_BROWSER_DIR", default_value = "browser")]
    pub browser_dir: PathBuf,

    /// Use this Chrome/Chromium executable instead of looking for one
    #[arg(long, env = "CHROME_PATH")]
    pub chrome_path: Option<PathBuf>,

    /// Seconds allowed for loading the page and extracting the table
    #[arg(
        long,
        env = "SCRAPER_TIMEOUT_SECS",
        default_value_t = 120,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout_secs: u64,

    /// Show the browser window
    #[arg(long)]
    pub headed: bool,

    /// Extract from a saved copy of the page instead of launching a browser
    #[arg(long, value_name = "FILE")]
    pub from_html: Option<PathBuf>,

    /// Log level: error, warn, info, debug, trace
    #[arg(long, env = "SCRAPER_LOG_LEVEL", default_value = "info", value_enum)]
    pub log_level: LogLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Filter directive, keeping the HTML parser and browser protocol quiet
    /// at debug/trace.
    pub fn directive(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug,selectors=warn,html5ever=warn,headless_chrome=info",
            Self::Trace => "trace,selectors=warn,html5ever=warn,headless_chrome=info",
        }
    }
}

/// Where rows come from
#[derive(Debug, Clone, PartialEq)]
pub enum SourceKind {
    Browser,
    HtmlFile(PathBuf),
}

/// Resolved settings for one run
#[derive(Debug, Clone)]
pub struct Settings {
    pub scraper: ScraperConfig,
    pub browser: BrowserSettings,
    pub source: SourceKind,
    pub output: PathBuf,
    pub format: OutputFormat,
    pub timeout: Duration,
}

impl Cli {
    pub fn into_settings(self) -> Settings {
        let format = self
            .format
            .unwrap_or_else(|| OutputFormat::from_path(&self.output));

        let source = match self.from_html {
            Some(path) => SourceKind::HtmlFile(path),
            None => SourceKind::Browser,
        };

        Settings {
            scraper: ScraperConfig::with_url(self.url),
            browser: BrowserSettings {
                browser_dir: self.browser_dir,
                chrome_path: self.chrome_path,
                headless: !self.headed,
            },
            source,
            output: self.output,
            format,
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}
