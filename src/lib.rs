// src/lib.rs

//! Per-package entry statistics for Debian `Contents-<arch>.gz` indices.
//!
//! The pipeline runs strictly in order: [`fetch`] obtains the compressed
//! bytes, [`analyzer`] decompresses and splits them into records, [`stats`]
//! counts and ranks, and [`renderer`] writes the table or a preview.

pub mod analyzer;
pub mod cli;
pub mod config;
pub mod error;
pub mod fetch;
pub mod interrupt;
pub mod logging;
pub mod model;
pub mod renderer;
pub mod stats;

pub use config::{Config, IndexSource};
pub use error::{Error, Result};
pub use interrupt::Interrupt;
pub use model::{IndexRecord, PackageCount, RankedResult};

use log::debug;
use std::io::Write;

/// Run the whole pipeline for `config`. The preview, when no output file is
/// configured, goes to `out`.
pub fn run<W: Write>(config: &Config, interrupt: &Interrupt, out: &mut W) -> Result<RankedResult> {
    let data = fetch::acquire(config, interrupt)?;
    debug!("Index archive is {} bytes", data.len());

    let records = analyzer::parse_index(&data, interrupt)?;
    drop(data);
    debug!("Parsed {} index records", records.len());

    let result = stats::rank(stats::count_occurrences(records, config.group_by));
    interrupt.check()?;

    match &config.output {
        Some(path) => renderer::write_csv(&result, path)?,
        None => renderer::write_preview(&result, config.preview, out)
            .map_err(|e| Error::write("<stdout>", e))?,
    }
    Ok(result)
}
