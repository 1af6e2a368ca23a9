//! Wire shapes of the panel API.

use davpanel_core::{DirectoryEntry, OutcomeKind, Selection, SubmissionOutcome};
use davpanel_engine::{JobFile, JobSummary, PanelReply, VersionInfo};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct ConnectWebdavForm {
    pub webdav_url: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ConnectAria2Form {
    pub aria2_url: String,
    #[serde(default)]
    pub aria2_secret: String,
}

#[derive(Debug, Serialize)]
pub struct ReplyBody {
    pub success: bool,
    pub message: String,
}

impl<T> From<PanelReply<T>> for ReplyBody {
    fn from(reply: PanelReply<T>) -> Self {
        Self {
            success: reply.success,
            message: reply.message,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StatusBody {
    pub webdav_connected: bool,
    pub aria2_connected: bool,
}

#[derive(Debug, Deserialize)]
pub struct FilesQuery {
    pub path: Option<String>,
}

/// A listing entry as the browser sees it. Download URLs are not exposed.
#[derive(Debug, Serialize)]
pub struct FileEntryDto {
    pub name: String,
    pub path: String,
    pub is_directory: bool,
    pub size: u64,
    pub modified: String,
}

impl From<DirectoryEntry> for FileEntryDto {
    fn from(entry: DirectoryEntry) -> Self {
        Self {
            name: entry.name,
            path: entry.path,
            is_directory: entry.is_directory,
            size: entry.size,
            modified: entry.modified,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FilesBody {
    pub success: bool,
    pub files: Vec<FileEntryDto>,
    pub current_path: String,
}

#[derive(Debug, Deserialize)]
pub struct SelectionDto {
    pub path: Option<String>,
    pub name: Option<String>,
    #[serde(default)]
    pub is_directory: bool,
    #[serde(default)]
    pub size: u64,
}

impl From<SelectionDto> for Selection {
    fn from(dto: SelectionDto) -> Self {
        Self {
            path: dto.path,
            name: dto.name,
            is_directory: dto.is_directory,
            size: dto.size,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct DownloadRequest {
    #[serde(default)]
    pub files: Vec<SelectionDto>,
    #[serde(default)]
    pub video_filter: bool,
    pub min_file_size_mb: Option<i64>,
}

impl DownloadRequest {
    /// Requested threshold in MB; negative values mean no threshold.
    pub fn min_size_mb(&self, default: u64) -> u64 {
        self.min_file_size_mb
            .map_or(default, |mb| mb.max(0).unsigned_abs())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKindDto {
    Submitted,
    Skipped,
    Failed,
}

impl From<OutcomeKind> for OutcomeKindDto {
    fn from(kind: OutcomeKind) -> Self {
        match kind {
            OutcomeKind::Submitted => Self::Submitted,
            OutcomeKind::Skipped => Self::Skipped,
            OutcomeKind::Failed => Self::Failed,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct OutcomeDto {
    pub filename: String,
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gid: Option<String>,
    pub kind: OutcomeKindDto,
}

impl From<SubmissionOutcome> for OutcomeDto {
    fn from(outcome: SubmissionOutcome) -> Self {
        Self {
            filename: outcome.filename,
            success: outcome.success,
            message: outcome.message,
            gid: outcome.job_id,
            kind: outcome.kind.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DownloadBody {
    pub success: bool,
    pub results: Vec<OutcomeDto>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionDto {
    pub version: String,
    pub enabled_features: Vec<String>,
}

impl From<VersionInfo> for VersionDto {
    fn from(info: VersionInfo) -> Self {
        Self {
            version: info.version,
            enabled_features: info.enabled_features,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct QueueStatusBody {
    pub connected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<VersionDto>,
}

#[derive(Debug, Serialize)]
pub struct UriDto {
    pub uri: String,
}

#[derive(Debug, Serialize)]
pub struct JobFileDto {
    pub path: String,
    pub uris: Vec<UriDto>,
}

impl From<JobFile> for JobFileDto {
    fn from(file: JobFile) -> Self {
        Self {
            path: file.path,
            uris: file.uris.into_iter().map(|uri| UriDto { uri }).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDto {
    pub gid: String,
    pub status: String,
    pub name: String,
    pub total_length: u64,
    pub completed_length: u64,
    pub download_speed: u64,
    pub progress: f64,
    pub files: Vec<JobFileDto>,
}

impl From<JobSummary> for JobDto {
    fn from(job: JobSummary) -> Self {
        Self {
            gid: job.id,
            status: job.status,
            name: job.name,
            total_length: job.total_length,
            completed_length: job.completed_length,
            download_speed: job.download_speed,
            progress: job.progress,
            files: job.files.into_iter().map(JobFileDto::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DownloadsBody {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub downloads: Vec<JobDto>,
}
