// src/cli.rs

use clap::Parser;
use std::path::PathBuf;

pub const DEFAULT_BASE_URL: &str = "http://ftp.uk.debian.org/debian/dists/stable/main";

/// Count the number of index entries per package in a Debian Contents file
/// for the selected mirror and architecture.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Target architecture, e.g. amd64
    #[arg(value_name = "ARCHITECTURE")]
    pub architecture: String,

    /// Base Debian mirror URL
    #[arg(short, long = "baseurl", value_name = "URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Save the index file locally before reading it
    #[arg(short, long)]
    pub download: bool,

    /// Logging level
    #[arg(short, long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Write the full table as CSV to this file instead of printing a preview
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Number of entries to print on stdout
    #[arg(short, long = "number", value_name = "N", default_value_t = 10)]
    pub number: usize,

    /// Read a local Contents archive instead of fetching one
    #[arg(short, long, value_name = "PATH", conflicts_with = "download")]
    pub file: Option<PathBuf>,

    /// How entries are grouped before counting
    #[arg(short, long, value_enum, default_value_t = GroupBy::Line)]
    pub group_by: GroupBy,

    /// Directory where --download stores the archive
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub download_dir: PathBuf,

    /// HTTP timeout in seconds (no timeout when omitted)
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,
}

#[derive(clap::ValueEnum, Clone, Debug, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warning,
    Error,
    Critical,
}

impl LogLevel {
    pub fn filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Warning => log::LevelFilter::Warn,
            LogLevel::Error => log::LevelFilter::Error,
            // nothing is logged above error
            LogLevel::Critical => log::LevelFilter::Off,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Debug, Copy, PartialEq, Eq, Default)]
pub enum GroupBy {
    /// Everything after the path, taken as a single key
    #[default]
    Line,
    /// Each comma-separated `area/package` entry
    Package,
    /// Each comma-separated entry without its `area/` prefix
    Name,
}
