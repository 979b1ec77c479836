// src/logging.rs

use std::io::Write;

/// Initialize the logger.
///
/// Output format: `YYYY-MM-DD HH:MM:SS,mmm :: L :: debindex :: message`, on stderr.
/// `RUST_LOG` is read first, the level passed here overrides it.
pub fn init_logger(level: log::LevelFilter) {
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .format(|buf, record| {
            let level = record.level().as_str();
            writeln!(
                buf,
                "{} :: {} :: {} :: {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S,%3f"),
                &level[..1],
                env!("CARGO_PKG_NAME"),
                record.args()
            )
        })
        .target(env_logger::Target::Stderr)
        .init();
}
