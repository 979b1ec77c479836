// src/analyzer.rs

use crate::error::{Error, Result};
use crate::interrupt::Interrupt;
use crate::model::IndexRecord;
use flate2::bufread::GzDecoder;
use indicatif::ProgressBar;
use std::io::{self, BufRead, BufReader, Read};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// How many lines are parsed between progress updates and interrupt checks.
const TICK_LINES: u64 = 10_000;

/// Decompress a gzip Contents archive and split every non-blank line into an
/// [`IndexRecord`], preserving line order.
///
/// Every gzip member in `data` is decoded in turn; trailing zero padding is
/// allowed, any other trailing bytes are an error. Lines are decoded lossily,
/// so stray non-UTF-8 bytes never abort the parse. Any gzip framing or
/// decompression error fails the whole call.
pub fn parse_index(data: &[u8], interrupt: &Interrupt) -> Result<Vec<IndexRecord>> {
    if !data.starts_with(&GZIP_MAGIC) {
        return Err(Error::CorruptIndex("not in gzip format".to_string()));
    }

    let mut reader = BufReader::new(GzMembers::new(data));
    let bar = ProgressBar::new_spinner();
    bar.set_message("Parsing index entries");

    let mut records = Vec::new();
    let mut line = Vec::new();
    let mut line_no: u64 = 0;
    loop {
        line.clear();
        let n = reader
            .read_until(b'\n', &mut line)
            .map_err(|e| Error::CorruptIndex(e.to_string()))?;
        if n == 0 {
            break;
        }
        line_no += 1;
        if line_no % TICK_LINES == 0 {
            interrupt.check()?;
            bar.set_position(line_no);
        }

        if let Some(record) = split_line(&String::from_utf8_lossy(&line)) {
            records.push(record);
        }
    }
    interrupt.check()?;
    bar.finish_and_clear();

    Ok(records)
}

/// Reads consecutive gzip members from a byte slice as one stream.
struct GzMembers<'a> {
    decoder: GzDecoder<&'a [u8]>,
}

impl<'a> GzMembers<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self {
            decoder: GzDecoder::new(data),
        }
    }
}

impl<'a> Read for GzMembers<'a> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        loop {
            let n = self.decoder.read(buf)?;
            if n > 0 || buf.is_empty() {
                return Ok(n);
            }
            // member finished, the slice now starts right after its trailer
            let rest: &'a [u8] = *self.decoder.get_ref();
            if rest.iter().all(|&b| b == 0) {
                return Ok(0);
            }
            if !rest.starts_with(&GZIP_MAGIC) {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    "trailing garbage after gzip member",
                ));
            }
            self.decoder = GzDecoder::new(rest);
        }
    }
}

/// Split one line at its first run of whitespace.
///
/// Blank lines give `None`. A line with no whitespace keeps the whole text as
/// its path and has no packages.
pub fn split_line(line: &str) -> Option<IndexRecord> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let record = match line.split_once(char::is_whitespace) {
        Some((path, rest)) => IndexRecord {
            path: path.to_string(),
            packages: Some(rest.trim_start().to_string()),
        },
        None => IndexRecord {
            path: line.to_string(),
            packages: None,
        },
    };
    Some(record)
}
