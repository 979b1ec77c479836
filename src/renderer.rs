// src/renderer.rs

use crate::error::{Error, Result};
use crate::model::RankedResult;
use log::info;
use std::io::{self, BufWriter, Write};
use std::path::Path;

const RULE: &str = "------------------------------------------------------------------------------";

/// Write the full table as `<package>,<count>` lines, no header.
///
/// The rows go to a temporary file next to `path`, which replaces `path` only
/// after every row has been flushed.
pub fn write_csv(result: &RankedResult, path: &Path) -> Result<()> {
    info!("Saving result to \"{}\" ...", path.display());

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| Error::write(path, e))?;

    let mut writer = BufWriter::new(tmp);
    write_rows(result, &mut writer).map_err(|e| Error::write(path, e))?;
    let tmp = writer
        .into_inner()
        .map_err(|e| Error::write(path, e.into_error()))?;
    tmp.persist(path).map_err(|e| Error::write(path, e.error))?;

    info!("Saving finished.");
    Ok(())
}

fn write_rows<W: Write>(result: &RankedResult, out: &mut W) -> io::Result<()> {
    for (package, count) in result.iter() {
        writeln!(out, "{},{}", package, count)?;
    }
    Ok(())
}

/// Print the `n` highest-count entries between dashed rules.
pub fn write_preview<W: Write>(result: &RankedResult, n: usize, out: &mut W) -> io::Result<()> {
    writeln!(out, "{}", RULE)?;
    writeln!(out, "  Top {} packages with more files associated:", n)?;
    writeln!(out, "{}", RULE)?;
    let top = result.top(n);
    if top.is_empty() {
        writeln!(out, "(no entries)")?;
    }
    for (package, count) in top {
        writeln!(out, "{},{}", package, count)?;
    }
    writeln!(out, "{}", RULE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn ranked(entries: &[(&str, u64)]) -> RankedResult {
        RankedResult {
            entries: entries.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
        }
    }

    fn preview(result: &RankedResult, n: usize) -> Vec<String> {
        let mut out = Vec::new();
        write_preview(result, n, &mut out).unwrap();
        String::from_utf8(out).unwrap().lines().map(String::from).collect()
    }

    #[test]
    fn test_preview_shows_top_n() {
        let lines = preview(&ranked(&[("util-pkg", 2), ("lib-pkg", 1)]), 1);
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], RULE);
        assert_eq!(lines[1], "  Top 1 packages with more files associated:");
        assert_eq!(lines[3], "util-pkg,2");
        assert_eq!(lines[4], RULE);
    }

    #[test]
    fn test_preview_larger_than_result() {
        let lines = preview(&ranked(&[("a", 3), ("b", 2)]), 50);
        let rows: Vec<&String> = lines.iter().filter(|l| l.contains(',')).collect();
        assert_eq!(rows, vec!["a,3", "b,2"]);
    }

    #[test]
    fn test_preview_empty_result() {
        let lines = preview(&RankedResult::default(), 10);
        assert_eq!(lines[3], "(no entries)");
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn test_csv_contains_full_table() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");
        write_csv(&ranked(&[("admin/x,net/y", 4), ("lib-pkg", 1)]), &path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "admin/x,net/y,4\nlib-pkg,1\n");
    }

    #[test]
    fn test_csv_empty_result_creates_empty_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        write_csv(&RankedResult::default(), &path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn test_csv_missing_directory_is_write_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("no/such/dir/out.csv");
        let err = write_csv(&ranked(&[("a", 1)]), &path).unwrap_err();
        assert!(matches!(err, Error::Write { .. }), "{:?}", err);
        assert!(!path.exists());
    }
}
