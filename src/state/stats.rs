//! Per-channel message counter files.
//!
//! Counts live in `<dir>/<channel>.stats` as a JSON object mapping sender
//! nick to message count. The leading `#` is dropped from the file name.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::StatsError;

/// File holding the counters for `channel`.
pub fn stats_path(dir: &Path, channel: &str) -> PathBuf {
    let stem = channel.strip_prefix('#').unwrap_or(channel);
    // Keep the file inside `dir` whatever the server calls the channel.
    let stem: String = stem
        .chars()
        .map(|c| if matches!(c, '/' | '\\' | '\0') { '_' } else { c })
        .collect();
    dir.join(format!("{stem}.stats"))
}

/// Read counters from `path`. A missing file is a fresh start, not an error.
pub fn load_stats(path: &Path) -> Result<Option<HashMap<String, u64>>, StatsError> {
    let content = match std::fs::read(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(StatsError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    serde_json::from_slice(&content)
        .map(Some)
        .map_err(|source| StatsError::Json {
            path: path.to_path_buf(),
            source,
        })
}

/// Overwrite `path` with `counts`.
pub fn save_stats(path: &Path, counts: &HashMap<String, u64>) -> Result<(), StatsError> {
    let content = serde_json::to_vec(counts).map_err(|source| StatsError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    std::fs::write(path, content).map_err(|source| StatsError::Io {
        path: path.to_path_buf(),
        source,
    })
}
