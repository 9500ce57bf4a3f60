use crate::errors::AppError;
use crate::models::{SelectedFile, UploadSource};
use crate::plot::{PlotParams, PlotRequest};
use crate::session::DashboardView;
use crate::state::AppState;
use crate::ui::{render_app, render_index};
use axum::{
    extract::{Multipart, Path, Query, State},
    response::Html,
};
use tracing::debug;

fn fragment(view: &DashboardView) -> Html<String> {
    Html(render_app(view).render())
}

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let view = state.dashboard.view().await;
    Html(render_index(&view))
}

pub async fn healthz() -> &'static str {
    "ok"
}

pub async fn view(State(state): State<AppState>) -> Html<String> {
    fragment(&state.dashboard.view().await)
}

pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Html<String>, AppError> {
    let mut source = UploadSource::Picker;
    let mut files = Vec::new();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "source" => {
                let value = field.text().await?;
                source = UploadSource::parse(&value)
                    .ok_or_else(|| AppError::bad_request("source must be 'picker' or 'drop'"))?;
            }
            "file" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await?;
                files.push(SelectedFile {
                    name: file_name,
                    content_type,
                    bytes,
                });
            }
            other => debug!(field = other, "ignoring unknown upload field"),
        }
    }

    let view = state.dashboard.upload(source, files).await;
    Ok(fragment(&view))
}

pub async fn plot(State(state): State<AppState>, Query(params): Query<PlotParams>) -> Html<String> {
    let view = state.dashboard.generate_plot(PlotRequest::from(params)).await;
    fragment(&view)
}

pub async fn controls(
    State(state): State<AppState>,
    Query(params): Query<PlotParams>,
) -> Html<String> {
    let view = state.dashboard.update_controls(PlotRequest::from(params)).await;
    fragment(&view)
}

pub async fn refresh(State(state): State<AppState>) -> Html<String> {
    fragment(&state.dashboard.refresh().await)
}

pub async fn dismiss_banner(State(state): State<AppState>, Path(id): Path<u64>) -> Html<String> {
    if !state.dashboard.dismiss_banner(id).await {
        debug!(id, "banner already gone");
    }
    fragment(&state.dashboard.view().await)
}
