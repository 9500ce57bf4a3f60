use crate::client::DashboardApi;
use crate::config::{DashboardConfig, ACCEPTED_EXTENSIONS};
use crate::errors::ClientError;
use crate::models::{PlotResponse, SelectedFile, UploadSource};
use crate::plot::PlotRequest;
use crate::preview::build_table;
use crate::session::{
    BannerKind, Controls, DashboardState, DashboardView, PanelState, Phase, PlotPanel,
    RequestToken, SessionContext,
};
use crate::stats::summarize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info, warn};

pub const UPLOAD_TRANSPORT_MESSAGE: &str = "An error occurred while uploading the file.";
pub const STATS_TRANSPORT_MESSAGE: &str = "An error occurred while loading statistics.";
pub const PREVIEW_TRANSPORT_MESSAGE: &str = "An error occurred while loading the data preview.";
pub const PLOT_TRANSPORT_MESSAGE: &str = "Error generating plot";

/// Top-level controller. Owns the session and every panel; the lock is
/// never held across a backend call.
pub struct Dashboard {
    api: Arc<dyn DashboardApi>,
    state: Mutex<DashboardState>,
    max_upload_bytes: usize,
}

impl Dashboard {
    pub fn new(api: Arc<dyn DashboardApi>, config: &DashboardConfig) -> Self {
        Self {
            api,
            state: Mutex::new(DashboardState::new(config.banner_ttl)),
            max_upload_bytes: config.max_upload_bytes,
        }
    }

    pub async fn view(&self) -> DashboardView {
        self.state.lock().await.snapshot(Instant::now())
    }

    pub async fn upload(&self, source: UploadSource, files: Vec<SelectedFile>) -> DashboardView {
        let Some(file) = first_file(source, files) else {
            debug!(?source, "empty selection, nothing to upload");
            return self.view().await;
        };

        if let Err(message) = validate_file(&file, self.max_upload_bytes) {
            warn!(filename = %file.name, "rejected before upload: {message}");
            let mut state = self.state.lock().await;
            state.banners.push(BannerKind::Error, message, Instant::now());
            return state.snapshot(Instant::now());
        }

        let token = {
            let mut state = self.state.lock().await;
            state.phase = Phase::Uploading;
            // Anything still in flight belongs to the previous dataset.
            state.tokens.stats.issue();
            state.tokens.preview.issue();
            state.tokens.plot.issue();
            state.tokens.upload.issue()
        };

        info!(filename = %file.name, size = file.bytes.len(), "uploading");
        let outcome = self.api.upload(&file).await;

        let uploaded = {
            let mut state = self.state.lock().await;
            if !state.tokens.upload.is_current(token) {
                debug!(filename = %file.name, "dropping superseded upload response");
                return state.snapshot(Instant::now());
            }
            let now = Instant::now();
            match outcome {
                Ok(info) => {
                    info!(filename = %info.filename, rows = info.rows(), cols = info.cols(), "dataset loaded");
                    let kind = state.controls.kind.clone();
                    state.controls = Controls::for_dataset(kind, &info);
                    state.banners.push(
                        BannerKind::Success,
                        format!("Loaded {}", info.filename),
                        now,
                    );
                    state.session = Some(SessionContext { info });
                    state.phase = Phase::Ready;
                    state.plot = PlotPanel::Placeholder;
                    true
                }
                Err(err) => {
                    warn!(filename = %file.name, "upload failed: {err}");
                    let message = user_message(&err, UPLOAD_TRANSPORT_MESSAGE, "Upload failed");
                    state.banners.push(BannerKind::Error, message, now);
                    state.session = None;
                    state.phase = Phase::Empty;
                    state.stats = PanelState::Idle;
                    state.preview = PanelState::Idle;
                    state.plot = PlotPanel::Placeholder;
                    false
                }
            }
        };

        if uploaded {
            self.load_panels(token).await;
        }
        self.view().await
    }

    /// Statistics then preview, one after the other. Skipped once a newer
    /// upload has taken over.
    async fn load_panels(&self, upload: RequestToken) {
        if !self.upload_is_current(upload).await {
            return;
        }
        self.load_statistics().await;
        if !self.upload_is_current(upload).await {
            return;
        }
        self.load_preview().await;
    }

    async fn upload_is_current(&self, token: RequestToken) -> bool {
        self.state.lock().await.tokens.upload.is_current(token)
    }

    /// Re-fetch statistics and preview for the current dataset.
    pub async fn refresh(&self) -> DashboardView {
        let ready = self.state.lock().await.phase == Phase::Ready;
        if ready {
            self.load_statistics().await;
            self.load_preview().await;
        } else {
            debug!("refresh ignored, no dataset loaded");
        }
        self.view().await
    }

    pub async fn load_statistics(&self) {
        let token = {
            let mut state = self.state.lock().await;
            state.stats = PanelState::Loading;
            state.tokens.stats.issue()
        };

        let outcome = self.api.stats().await;

        let mut state = self.state.lock().await;
        if !state.tokens.stats.is_current(token) {
            debug!("dropping stale statistics response");
            return;
        }
        match outcome {
            Ok(stats) => state.stats = PanelState::Loaded(summarize(&stats)),
            Err(err) => {
                warn!("loading statistics failed: {err}");
                state.stats = PanelState::Idle;
                let message = user_message(&err, STATS_TRANSPORT_MESSAGE, STATS_TRANSPORT_MESSAGE);
                state.banners.push(BannerKind::Error, message, Instant::now());
            }
        }
    }

    pub async fn load_preview(&self) {
        let token = {
            let mut state = self.state.lock().await;
            state.preview = PanelState::Loading;
            state.tokens.preview.issue()
        };

        let outcome = self.api.data().await;

        let mut state = self.state.lock().await;
        if !state.tokens.preview.is_current(token) {
            debug!("dropping stale preview response");
            return;
        }
        match outcome {
            Ok(data) => state.preview = PanelState::Loaded(build_table(&data)),
            Err(err) => {
                warn!("loading preview failed: {err}");
                state.preview = PanelState::Idle;
                let message =
                    user_message(&err, PREVIEW_TRANSPORT_MESSAGE, PREVIEW_TRANSPORT_MESSAGE);
                state.banners.push(BannerKind::Error, message, Instant::now());
            }
        }
    }

    /// Record the control values without requesting a plot, e.g. when the
    /// plot type changes.
    pub async fn update_controls(&self, request: PlotRequest) -> DashboardView {
        let mut state = self.state.lock().await;
        apply_controls(&mut state.controls, &request);
        state.snapshot(Instant::now())
    }

    pub async fn generate_plot(&self, request: PlotRequest) -> DashboardView {
        let token = {
            let mut state = self.state.lock().await;
            apply_controls(&mut state.controls, &request);
            state.plot = PlotPanel::Generating;
            state.tokens.plot.issue()
        };

        debug!(kind = %request.kind, x = ?request.x_col, y = ?request.y_col, "requesting plot");
        let outcome = self.api.plot(&request).await;

        let mut state = self.state.lock().await;
        if !state.tokens.plot.is_current(token) {
            debug!(kind = %request.kind, "dropping stale plot response");
            return state.snapshot(Instant::now());
        }
        state.plot = plot_panel(outcome);
        state.snapshot(Instant::now())
    }

    pub async fn dismiss_banner(&self, id: u64) -> bool {
        self.state.lock().await.banners.dismiss(id)
    }
}

fn apply_controls(controls: &mut Controls, request: &PlotRequest) {
    controls.kind = request.kind.clone();
    controls.x_col = request.x_col.clone();
    controls.y_col = request.y_col.clone();
}

fn plot_panel(outcome: Result<PlotResponse, ClientError>) -> PlotPanel {
    match outcome {
        Ok(PlotResponse { error: Some(message), .. }) => PlotPanel::Error(message),
        Ok(PlotResponse { plot: Some(image), .. }) if !image.is_empty() => PlotPanel::Image(image),
        Ok(_) => PlotPanel::NoImage,
        Err(ClientError::Application(message)) => PlotPanel::Error(message),
        Err(err) => {
            warn!("plot request failed: {err}");
            PlotPanel::Error(PLOT_TRANSPORT_MESSAGE.to_string())
        }
    }
}

fn user_message(err: &ClientError, transport: &str, fallback: &str) -> String {
    match err {
        ClientError::Application(message) if !message.is_empty() => message.clone(),
        ClientError::Application(_) => fallback.to_string(),
        _ => transport.to_string(),
    }
}

/// Only the first file of a selection is ever uploaded.
pub fn first_file(source: UploadSource, files: Vec<SelectedFile>) -> Option<SelectedFile> {
    if files.len() > 1 {
        debug!(?source, count = files.len(), "using first file of selection");
    }
    files.into_iter().next()
}

pub fn validate_file(file: &SelectedFile, max_bytes: usize) -> Result<(), String> {
    if file.name.trim().is_empty() {
        return Err("No file selected".to_string());
    }
    let accepted = file
        .name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .is_some_and(|ext| ACCEPTED_EXTENSIONS.contains(&ext.as_str()));
    if !accepted {
        return Err("Invalid file format".to_string());
    }
    if file.bytes.len() > max_bytes {
        return Err(format!(
            "File is too large (limit is {} MB)",
            max_bytes / (1024 * 1024)
        ));
    }
    Ok(())
}
