// src/fetch.rs

use crate::config::{download_file_name, Config, IndexSource};
use crate::error::{Error, Result};
use crate::interrupt::Interrupt;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info};
use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

const CHUNK_SIZE: usize = 64 * 1024;

/// Upper bound on the buffer reserved up front from `Content-Length`.
const MAX_PREALLOC: u64 = 64 * 1024 * 1024;

/// How often the caller checks for an interrupt while a request is in flight.
const INTERRUPT_POLL: Duration = Duration::from_millis(100);

/// Obtain the compressed index bytes for the configured source.
pub fn acquire(config: &Config, interrupt: &Interrupt) -> Result<Vec<u8>> {
    match &config.source {
        IndexSource::Remote { url } => {
            info!("Reading index file from \"{}\" ...", url);
            let data = fetch(url, config.timeout, interrupt)?;
            info!("Reading finished.");
            Ok(data)
        }
        IndexSource::Download { url, dir } => {
            let name = download_file_name(&config.architecture, chrono::Local::now().naive_local());
            let path = dir.join(name);
            download(url, &path, config.timeout, interrupt)?;
            read_local(&path)
        }
        IndexSource::Local { path } => read_local(path),
    }
}

/// GET `url` into memory.
///
/// The request runs on a worker thread so an interrupt is noticed even while
/// the connection is stalled; the worker is abandoned in that case.
pub fn fetch(url: &str, timeout: Option<Duration>, interrupt: &Interrupt) -> Result<Vec<u8>> {
    let (tx, rx) = mpsc::channel();
    let worker_url = url.to_string();
    let worker_interrupt = interrupt.clone();
    thread::Builder::new()
        .name("fetch".to_string())
        .spawn(move || {
            let _ = tx.send(fetch_blocking(&worker_url, timeout, &worker_interrupt));
        })
        .map_err(|e| Error::Transport {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    loop {
        match rx.recv_timeout(INTERRUPT_POLL) {
            Ok(result) => return result,
            Err(RecvTimeoutError::Timeout) => interrupt.check()?,
            Err(RecvTimeoutError::Disconnected) => {
                return Err(Error::Transport {
                    url: url.to_string(),
                    reason: "fetch worker exited without a result".to_string(),
                })
            }
        }
    }
}

fn fetch_blocking(url: &str, timeout: Option<Duration>, interrupt: &Interrupt) -> Result<Vec<u8>> {
    let mut builder = ureq::AgentBuilder::new();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    let agent = builder.build();

    let response = agent.get(url).call().map_err(|e| request_error(url, e))?;
    let len = response
        .header("Content-Length")
        .and_then(|v| v.parse::<u64>().ok());

    read_body(response.into_reader(), len, interrupt).map_err(|e| match e {
        Error::Io { source, .. } => Error::Transport {
            url: url.to_string(),
            reason: source.to_string(),
        },
        other => other,
    })
}

/// Fetch `url` and store the bytes verbatim at `path`. The file only appears
/// once the whole body has been received.
pub fn download(
    url: &str,
    path: &Path,
    timeout: Option<Duration>,
    interrupt: &Interrupt,
) -> Result<PathBuf> {
    info!("Downloading index file from \"{}\" ...", url);
    let data = fetch(url, timeout, interrupt).map_err(|e| {
        if let Error::HttpStatus { status, .. } = &e {
            error!(
                "Server answered HTTP {}, no archive was written to \"{}\"",
                status,
                path.display()
            );
        }
        e
    })?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| Error::io(dir, "create", e))?;
    tmp.write_all(&data)
        .map_err(|e| Error::io(tmp.path().to_path_buf(), "write", e))?;
    interrupt.check()?;
    tmp.persist(path)
        .map_err(|e| Error::io(path, "persist", e.error))?;

    info!("Downloading finished.");
    Ok(path.to_path_buf())
}

pub fn read_local(path: &Path) -> Result<Vec<u8>> {
    info!("Reading index file from local file \"{}\" ...", path.display());
    let data = fs::read(path).map_err(|e| Error::io(path, "read", e))?;
    info!("Reading finished.");
    Ok(data)
}

fn read_body<R: Read>(mut reader: R, len: Option<u64>, interrupt: &Interrupt) -> Result<Vec<u8>> {
    let bar = match len {
        Some(len) => {
            let bar = ProgressBar::new(len);
            if let Ok(style) = ProgressStyle::with_template(
                "{bar:40} {bytes}/{total_bytes} ({bytes_per_sec}, {eta})",
            ) {
                bar.set_style(style);
            }
            bar
        }
        None => ProgressBar::new_spinner(),
    };

    let capacity = len.map_or(0, |len| len.min(MAX_PREALLOC));
    let mut data = Vec::with_capacity(usize::try_from(capacity).unwrap_or(0));
    let mut chunk = vec![0u8; CHUNK_SIZE];
    loop {
        interrupt.check()?;
        let n = match reader.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(Error::io("<response body>", "read", e)),
        };
        data.extend_from_slice(&chunk[..n]);
        bar.inc(n as u64);
    }
    bar.finish_and_clear();
    Ok(data)
}

fn request_error(url: &str, err: ureq::Error) -> Error {
    match err {
        ureq::Error::Status(status, _) => Error::HttpStatus {
            url: url.to_string(),
            status,
        },
        ureq::Error::Transport(t) => match t.kind() {
            ureq::ErrorKind::InvalidUrl | ureq::ErrorKind::UnknownScheme | ureq::ErrorKind::Dns => {
                Error::InvalidSource {
                    url: url.to_string(),
                    reason: t.to_string(),
                }
            }
            _ => Error::Transport {
                url: url.to_string(),
                reason: t.to_string(),
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{GroupBy, LogLevel};
    use std::io::Cursor;
    use std::net::TcpListener;
    use tempfile::tempdir;

    /// Accepts one connection and never answers it.
    fn serve_silently() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            if let Ok((stream, _)) = listener.accept() {
                std::thread::sleep(Duration::from_secs(30));
                drop(stream);
            }
        });
        format!("http://{}", addr)
    }

    /// Serves a single HTTP response on a loopback port and returns its base URL.
    fn serve_once(status_line: &'static str, body: Vec<u8>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut buf = [0u8; 4096];
                let _ = stream.read(&mut buf);
                let header = format!(
                    "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                    status_line,
                    body.len()
                );
                let _ = stream.write_all(header.as_bytes());
                let _ = stream.write_all(&body);
            }
        });
        format!("http://{}", addr)
    }

    fn config(source: IndexSource) -> Config {
        Config {
            architecture: "amd64".into(),
            source,
            log_level: LogLevel::Info,
            output: None,
            preview: 10,
            group_by: GroupBy::Line,
            timeout: Some(Duration::from_secs(10)),
        }
    }

    #[test]
    fn test_read_body_collects_all_chunks() {
        let body: Vec<u8> = (0..200_000u32).map(|i| (i % 251) as u8).collect();
        let data = read_body(Cursor::new(body.clone()), Some(body.len() as u64), &Interrupt::new()).unwrap();
        assert_eq!(data, body);
    }

    #[test]
    fn test_huge_content_length_is_not_preallocated() {
        let data = read_body(Cursor::new(vec![1u8; 10]), Some(1 << 62), &Interrupt::new()).unwrap();
        assert_eq!(data, vec![1u8; 10]);
    }

    #[test]
    fn test_interrupt_cancels_stalled_request() {
        let base = serve_silently();
        let interrupt = Interrupt::new();
        let trigger = interrupt.clone();
        std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(300));
            trigger.trigger();
        });

        let started = std::time::Instant::now();
        let err = fetch(&format!("{}/Contents-amd64.gz", base), None, &interrupt).unwrap_err();
        assert!(matches!(err, Error::Cancelled), "{:?}", err);
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_read_body_stops_when_interrupted() {
        let interrupt = Interrupt::new();
        interrupt.trigger();
        let result = read_body(Cursor::new(vec![1u8; 10]), None, &interrupt);
        assert!(matches!(result, Err(Error::Cancelled)));
    }

    #[test]
    fn test_fetch_from_local_server() {
        let base = serve_once("200 OK", b"payload".to_vec());
        let data = fetch(&format!("{}/Contents-amd64.gz", base), None, &Interrupt::new()).unwrap();
        assert_eq!(data, b"payload");
    }

    #[test]
    fn test_fetch_not_found_is_http_status() {
        let base = serve_once("404 Not Found", b"<html>nope</html>".to_vec());
        let err = fetch(&format!("{}/Contents-amd64.gz", base), None, &Interrupt::new()).unwrap_err();
        assert!(matches!(err, Error::HttpStatus { status: 404, .. }), "{:?}", err);
    }

    #[test]
    fn test_malformed_url_is_invalid_source() {
        for url in ["not a url/Contents-amd64.gz", "gopher://mirror/Contents-amd64.gz"] {
            let err = fetch(url, None, &Interrupt::new()).unwrap_err();
            assert!(matches!(err, Error::InvalidSource { .. }), "{}: {:?}", url, err);
        }
    }

    #[test]
    fn test_download_writes_bytes_verbatim() {
        let dir = tempdir().unwrap();
        let body = vec![0x1f, 0x8b, 8, 0, 1, 2, 3];
        let base = serve_once("200 OK", body.clone());
        let path = dir.path().join("Contents-20240101-000000-amd64.gz");

        let written = download(&format!("{}/Contents-amd64.gz", base), &path, None, &Interrupt::new()).unwrap();
        assert_eq!(written, path);
        assert_eq!(fs::read(&path).unwrap(), body);
    }

    #[test]
    fn test_failed_download_leaves_no_file() {
        let dir = tempdir().unwrap();
        let base = serve_once("500 Internal Server Error", Vec::new());
        let path = dir.path().join("Contents-x-amd64.gz");

        assert!(download(&format!("{}/Contents-amd64.gz", base), &path, None, &Interrupt::new()).is_err());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_acquire_download_round_trips_through_disk() {
        let dir = tempdir().unwrap();
        let base = serve_once("200 OK", b"archived".to_vec());
        let cfg = config(IndexSource::Download {
            url: format!("{}/Contents-amd64.gz", base),
            dir: dir.path().to_path_buf(),
        });

        let data = acquire(&cfg, &Interrupt::new()).unwrap();
        assert_eq!(data, b"archived");

        let names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names.len(), 1);
        assert!(names[0].starts_with("Contents-") && names[0].ends_with("-amd64.gz"), "{:?}", names);
    }

    #[test]
    fn test_read_local_missing_file() {
        let dir = tempdir().unwrap();
        let err = read_local(&dir.path().join("missing.gz")).unwrap_err();
        assert!(matches!(err, Error::Io { operation: "read", .. }));
    }
}
