// src/config.rs

use crate::cli::{Args, GroupBy, LogLevel};
use chrono::NaiveDateTime;
use std::path::PathBuf;
use std::time::Duration;

/// Where the compressed index bytes come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexSource {
    /// Fetch straight into memory
    Remote { url: String },
    /// Fetch, save under `dir`, then read the saved copy back
    Download { url: String, dir: PathBuf },
    /// An archive already on disk
    Local { path: PathBuf },
}

/// Everything a run needs, resolved from the command line
#[derive(Debug, Clone)]
pub struct Config {
    pub architecture: String,
    pub source: IndexSource,
    pub log_level: LogLevel,
    pub output: Option<PathBuf>,
    pub preview: usize,
    pub group_by: GroupBy,
    pub timeout: Option<Duration>,
}

impl Config {
    pub fn from_args(args: Args) -> Self {
        let url = index_url(&args.base_url, &args.architecture);
        let source = match (args.file, args.download) {
            (Some(path), _) => IndexSource::Local { path },
            (None, true) => IndexSource::Download {
                url,
                dir: args.download_dir,
            },
            (None, false) => IndexSource::Remote { url },
        };

        Self {
            architecture: args.architecture,
            source,
            log_level: args.log_level,
            output: args.output,
            preview: args.number,
            group_by: args.group_by,
            timeout: args.timeout.map(Duration::from_secs),
        }
    }
}

pub fn index_file_name(architecture: &str) -> String {
    format!("Contents-{}.gz", architecture)
}

/// `<base>/Contents-<arch>.gz`, with surrounding blanks and trailing slashes
/// removed from the base.
pub fn index_url(base_url: &str, architecture: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim().trim_end_matches('/'),
        index_file_name(architecture)
    )
}

/// `Contents-<YYYYMMDD-HHMMSS>-<arch>.gz`
pub fn download_file_name(architecture: &str, at: NaiveDateTime) -> String {
    format!("Contents-{}-{}.gz", at.format("%Y%m%d-%H%M%S"), architecture)
}
