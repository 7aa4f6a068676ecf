//! File-backed logging. The terminal UI owns stdout, so records go to a log
//! file instead.

use crate::config::LOG_LEVEL_ENV;
use env_logger::{Builder, Target, WriteStyle};
use log::LevelFilter;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

/// Opens `path` for appending and installs the global logger at `level`.
/// Directives in `LEITNER_FLASHCARDS_LOG` refine the level per module.
pub fn init(path: &Path, level: LevelFilter) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    Builder::new()
        .filter_level(level)
        .parse_env(LOG_LEVEL_ENV)
        .target(Target::Pipe(Box::new(file)))
        .write_style(WriteStyle::Never)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] {} {}: {}",
                chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .try_init()
        .map_err(io::Error::other)
}
