use davpanel_core::{FilterPolicy, Selection, SkipReason, SubmissionOutcome, UrlBuilder};
use panel_logging::{panel_info, panel_warn};

use crate::{FolderExpander, ListingClient, QueueManager};

/// Turns user selections into queue jobs, one outcome per attempted file.
///
/// Folders are expanded first; files the filter rejects inside a folder are only
/// reported when nothing in that folder was eligible.
pub struct BatchSubmitter<'a> {
    listing: &'a dyn ListingClient,
    urls: &'a UrlBuilder,
    queue: &'a dyn QueueManager,
}

impl<'a> BatchSubmitter<'a> {
    pub fn new(
        listing: &'a dyn ListingClient,
        urls: &'a UrlBuilder,
        queue: &'a dyn QueueManager,
    ) -> Self {
        Self {
            listing,
            urls,
            queue,
        }
    }

    pub async fn submit(
        &self,
        selections: &[Selection],
        policy: FilterPolicy,
    ) -> Vec<SubmissionOutcome> {
        let mut outcomes = Vec::new();
        for selection in selections {
            let Some(path) = selection.path() else {
                outcomes.push(SubmissionOutcome::failed(
                    selection.display_name(),
                    "empty path",
                ));
                continue;
            };

            if selection.is_directory {
                self.submit_folder(path, selection, &policy, &mut outcomes)
                    .await;
            } else {
                outcomes.push(self.submit_file(selection, &policy).await);
            }
        }

        let queued = outcomes.iter().filter(|outcome| outcome.success).count();
        panel_info!(
            "batch of {} selections produced {} outcomes, {} queued",
            selections.len(),
            outcomes.len(),
            queued
        );
        outcomes
    }

    async fn submit_folder(
        &self,
        path: &str,
        selection: &Selection,
        policy: &FilterPolicy,
        outcomes: &mut Vec<SubmissionOutcome>,
    ) {
        let expansion = FolderExpander::new(self.listing)
            .expand_with_report(path)
            .await;
        let scanned = expansion.files.len();

        let mut eligible = Vec::new();
        let mut skipped: Vec<(String, SkipReason)> = Vec::new();
        for file in expansion.files {
            match policy.check(&file) {
                Ok(()) => eligible.push(file),
                Err(reason) => skipped.push((file.name, reason)),
            }
        }

        if eligible.is_empty() {
            let folder = selection.display_name();
            panel_warn!(
                "nothing to submit from {}: {} files scanned in {} directories",
                path,
                scanned,
                expansion.directories_visited
            );
            outcomes.push(if policy.enabled {
                SubmissionOutcome::no_eligible_files(folder, scanned, &skipped, policy)
            } else {
                SubmissionOutcome::empty_folder(folder, scanned)
            });
            return;
        }

        panel_info!(
            "submitting {} of {} files from {}",
            eligible.len(),
            scanned,
            path
        );
        for file in &eligible {
            outcomes.push(self.enqueue(&file.name, &file.fetch_reference).await);
        }
    }

    async fn submit_file(&self, selection: &Selection, policy: &FilterPolicy) -> SubmissionOutcome {
        let name = selection.display_name();
        let Some(entry) = selection.as_entry() else {
            return SubmissionOutcome::failed(name, "empty path");
        };
        if let Err(reason) = policy.check(&entry) {
            return SubmissionOutcome::skipped(name, reason);
        }
        self.enqueue(&name, &entry.fetch_reference).await
    }

    async fn enqueue(&self, name: &str, reference: &str) -> SubmissionOutcome {
        let url = match self.urls.build(reference) {
            Ok(url) => url,
            Err(err) => {
                panel_warn!("cannot build download url for {}: {}", name, err);
                return SubmissionOutcome::failed(name, format!("invalid url: {err}"));
            }
        };
        match self.queue.enqueue(&url, name).await {
            Ok(job_id) => {
                panel_info!("queued {} as job {}", name, job_id);
                SubmissionOutcome::submitted(name, job_id)
            }
            Err(err) => {
                panel_warn!("enqueue of {} failed: {}", name, err);
                SubmissionOutcome::failed(name, format!("enqueue failed: {err}"))
            }
        }
    }
}

