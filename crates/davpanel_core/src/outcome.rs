use crate::{FilterPolicy, SkipReason};

/// Number of skipped files named in a "no eligible files" folder message.
pub const MAX_SKIP_SAMPLES: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeKind {
    Submitted,
    /// Deliberately excluded by the download filter.
    Skipped,
    Failed,
}

/// Result of considering one file (or one folder, for synthetic outcomes).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionOutcome {
    pub filename: String,
    pub success: bool,
    pub message: String,
    pub job_id: Option<String>,
    pub kind: OutcomeKind,
}

impl SubmissionOutcome {
    pub fn submitted(filename: impl Into<String>, job_id: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            success: true,
            message: "queued".to_string(),
            job_id: Some(job_id.into()),
            kind: OutcomeKind::Submitted,
        }
    }

    pub fn failed(filename: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            success: false,
            message: message.into(),
            job_id: None,
            kind: OutcomeKind::Failed,
        }
    }

    pub fn skipped(filename: impl Into<String>, reason: SkipReason) -> Self {
        let filename = filename.into();
        let message = format!("skipped: {filename} is {reason}");
        Self {
            filename,
            success: false,
            message,
            job_id: None,
            kind: OutcomeKind::Skipped,
        }
    }

    /// Folder outcome when the filter left nothing to submit.
    pub fn no_eligible_files(
        folder: impl Into<String>,
        scanned: usize,
        skipped: &[(String, SkipReason)],
        policy: &FilterPolicy,
    ) -> Self {
        let mut message = format!(
            "no eligible video files (>= {}MB) in folder; scanned {} files",
            policy.min_size_mb, scanned
        );
        if !skipped.is_empty() {
            let samples = skipped
                .iter()
                .take(MAX_SKIP_SAMPLES)
                .map(|(name, reason)| format!("{name} ({reason})"))
                .collect::<Vec<_>>()
                .join(", ");
            message.push_str("; skipped: ");
            message.push_str(&samples);
            if skipped.len() > MAX_SKIP_SAMPLES {
                message.push_str(&format!(" and {} more", skipped.len() - MAX_SKIP_SAMPLES));
            }
        }
        Self {
            filename: folder.into(),
            success: false,
            message,
            job_id: None,
            kind: OutcomeKind::Skipped,
        }
    }

    /// Folder outcome when expansion found no files at all and no filter applied.
    pub fn empty_folder(folder: impl Into<String>, scanned: usize) -> Self {
        Self::failed(
            folder,
            format!("folder empty or inaccessible; scanned {scanned} files"),
        )
    }
}
