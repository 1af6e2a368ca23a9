//! HTTP handlers: thin adapters from the wire shapes to `ControlPanel`.

use axum::extract::{Path, Query, State};
use axum::{Form, Json};
use davpanel_core::{FilterPolicy, Selection};
use panel_logging::panel_debug;

use super::dto::{
    ConnectAria2Form, ConnectWebdavForm, DownloadBody, DownloadRequest, DownloadsBody,
    FileEntryDto, FilesBody, FilesQuery, JobDto, OutcomeDto, QueueStatusBody, ReplyBody,
    StatusBody,
};
use super::error::ApiError;
use super::AppState;

pub async fn connect_webdav(
    State(state): State<AppState>,
    Form(form): Form<ConnectWebdavForm>,
) -> Json<ReplyBody> {
    let reply = state
        .panel
        .connect_remote(&form.webdav_url, &form.username, &form.password)
        .await;
    Json(reply.into())
}

pub async fn connect_aria2(
    State(state): State<AppState>,
    Form(form): Form<ConnectAria2Form>,
) -> Json<ReplyBody> {
    let reply = state
        .panel
        .connect_queue_manager(&form.aria2_url, &form.aria2_secret)
        .await;
    Json(reply.into())
}

pub async fn connection_status(State(state): State<AppState>) -> Json<StatusBody> {
    let status = state.panel.connection_status().await;
    Json(StatusBody {
        webdav_connected: status.remote_connected,
        aria2_connected: status.queue_connected,
    })
}

pub async fn list_files(
    State(state): State<AppState>,
    Query(query): Query<FilesQuery>,
) -> Result<Json<FilesBody>, ApiError> {
    let path = query
        .path
        .filter(|path| !path.trim().is_empty())
        .unwrap_or_else(|| "/".to_string());
    let entries = state.panel.list_path(&path).await?;
    Ok(Json(FilesBody {
        success: true,
        files: entries.into_iter().map(FileEntryDto::from).collect(),
        current_path: path,
    }))
}

pub async fn add_downloads(
    State(state): State<AppState>,
    Json(request): Json<DownloadRequest>,
) -> Result<Json<DownloadBody>, ApiError> {
    let policy = FilterPolicy::new(
        request.video_filter,
        request.min_size_mb(state.default_min_size_mb),
    );
    let selections: Vec<Selection> = request.files.into_iter().map(Selection::from).collect();
    panel_debug!(
        "download request: {} selections, {:?}",
        selections.len(),
        policy
    );

    let outcomes = state.panel.submit_batch(&selections, policy).await?;
    Ok(Json(DownloadBody {
        success: true,
        results: outcomes.into_iter().map(OutcomeDto::from).collect(),
    }))
}

pub async fn aria2_status(State(state): State<AppState>) -> Json<QueueStatusBody> {
    let status = state.panel.queue_status().await;
    Json(QueueStatusBody {
        connected: status.connected,
        version: status.version.map(Into::into),
    })
}

pub async fn aria2_downloads(
    State(state): State<AppState>,
) -> Result<Json<DownloadsBody>, ApiError> {
    let reply = state.panel.list_jobs().await?;
    let body = match reply.payload {
        Some(jobs) => DownloadsBody {
            success: true,
            message: None,
            downloads: jobs.into_iter().map(JobDto::from).collect(),
        },
        None => DownloadsBody {
            success: false,
            message: Some(reply.message),
            downloads: Vec::new(),
        },
    };
    Ok(Json(body))
}

pub async fn pause_download(
    State(state): State<AppState>,
    Path(gid): Path<String>,
) -> Result<Json<ReplyBody>, ApiError> {
    Ok(Json(state.panel.pause_job(&gid).await?.into()))
}

pub async fn resume_download(
    State(state): State<AppState>,
    Path(gid): Path<String>,
) -> Result<Json<ReplyBody>, ApiError> {
    Ok(Json(state.panel.resume_job(&gid).await?.into()))
}

pub async fn remove_download(
    State(state): State<AppState>,
    Path(gid): Path<String>,
) -> Result<Json<ReplyBody>, ApiError> {
    Ok(Json(state.panel.remove_job(&gid).await?.into()))
}
