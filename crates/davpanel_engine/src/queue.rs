use crate::QueueError;

pub type JobId = String;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VersionInfo {
    pub version: String,
    pub enabled_features: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JobFile {
    pub path: String,
    /// Source URIs with any embedded credentials removed.
    pub uris: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct JobSummary {
    pub id: JobId,
    pub status: String,
    pub name: String,
    pub total_length: u64,
    pub completed_length: u64,
    /// Bytes per second.
    pub download_speed: u64,
    /// Percentage in `0.0..=100.0`.
    pub progress: f64,
    pub files: Vec<JobFile>,
}

/// Download queue manager capability.
#[async_trait::async_trait]
pub trait QueueManager: Send + Sync {
    async fn version(&self) -> Result<VersionInfo, QueueError>;

    /// Queue `url`, saving it under `filename`.
    async fn enqueue(&self, url: &str, filename: &str) -> Result<JobId, QueueError>;

    async fn list(&self) -> Result<Vec<JobSummary>, QueueError>;

    async fn pause(&self, job_id: &str) -> Result<(), QueueError>;

    async fn resume(&self, job_id: &str) -> Result<(), QueueError>;

    async fn remove(&self, job_id: &str) -> Result<(), QueueError>;
}
