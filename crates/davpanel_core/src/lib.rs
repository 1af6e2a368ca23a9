//! Davpanel core: remote entry model, download filter policy and URL building.
mod entry;
mod filter;
mod outcome;
mod remote_path;
mod url_builder;

pub use entry::{DirectoryEntry, Selection};
pub use filter::{
    eligible, is_video_file, FilterPolicy, SkipReason, DEFAULT_MIN_SIZE_MB, VIDEO_EXTENSIONS,
};
pub use outcome::{OutcomeKind, SubmissionOutcome, MAX_SKIP_SAMPLES};
pub use remote_path::{decode_path, encode_path, last_segment, normalize_path};
pub use url_builder::{Credentials, UrlBuilder, UrlError};
