use std::fmt;
use std::path::Path;

use crate::DirectoryEntry;

/// Size threshold applied when the caller does not provide one.
pub const DEFAULT_MIN_SIZE_MB: u64 = 300;

/// Extensions (lowercase, without the dot) recognised as video files.
pub const VIDEO_EXTENSIONS: &[&str] = &[
    "mp4", "avi", "mkv", "mov", "wmv", "flv", "webm", "m4v", "3gp", "3g2", "asf", "rm", "rmvb",
    "vob", "ts", "mts", "m2ts", "divx", "xvid", "ogv", "f4v", "mpg", "mpeg", "m1v", "m2v", "mpe",
    "mpv", "mp2", "mpa", "mpu", "mpg2",
];

/// Case-insensitive extension check against [`VIDEO_EXTENSIONS`].
pub fn is_video_file(filename: &str) -> bool {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            VIDEO_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false)
}

/// Why an entry was left out of a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Directory,
    NotVideo,
    UnderSize { min_size_mb: u64 },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Directory => write!(f, "directories are expanded, not submitted"),
            SkipReason::NotVideo => write!(f, "not a video file"),
            SkipReason::UnderSize { min_size_mb } => {
                write!(f, "under the {min_size_mb}MB threshold")
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterPolicy {
    pub enabled: bool,
    pub min_size_mb: u64,
}

impl Default for FilterPolicy {
    fn default() -> Self {
        Self {
            enabled: false,
            min_size_mb: DEFAULT_MIN_SIZE_MB,
        }
    }
}

impl FilterPolicy {
    pub fn new(enabled: bool, min_size_mb: u64) -> Self {
        Self {
            enabled,
            min_size_mb,
        }
    }

    pub fn min_size_bytes(&self) -> u64 {
        self.min_size_mb.saturating_mul(1024 * 1024)
    }

    /// Directories are rejected before any size rule is consulted.
    pub fn check(&self, entry: &DirectoryEntry) -> Result<(), SkipReason> {
        if entry.is_directory {
            return Err(SkipReason::Directory);
        }
        if !self.enabled {
            return Ok(());
        }
        if !is_video_file(&entry.name) {
            return Err(SkipReason::NotVideo);
        }
        if entry.size < self.min_size_bytes() {
            return Err(SkipReason::UnderSize {
                min_size_mb: self.min_size_mb,
            });
        }
        Ok(())
    }
}

pub fn eligible(entry: &DirectoryEntry, filter_enabled: bool, min_size_mb: u64) -> bool {
    FilterPolicy::new(filter_enabled, min_size_mb)
        .check(entry)
        .is_ok()
}
