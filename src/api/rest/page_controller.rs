use crate::api::pages::Page;
use crate::api::rest::{ApiResult, AppState};
use axum::extract::State;
use axum::response::Html;

fn render(state: &AppState, page: Page) -> ApiResult<Html<String>> {
    Ok(Html(state.pages.render(page)?))
}

pub async fn index(State(state): State<AppState>) -> ApiResult<Html<String>> {
    render(&state, Page::Index)
}

pub async fn dashboard(State(state): State<AppState>) -> ApiResult<Html<String>> {
    render(&state, Page::Dashboard)
}

pub async fn cameras(State(state): State<AppState>) -> ApiResult<Html<String>> {
    render(&state, Page::Cameras)
}

pub async fn zones(State(state): State<AppState>) -> ApiResult<Html<String>> {
    render(&state, Page::Zones)
}

pub async fn alerts(State(state): State<AppState>) -> ApiResult<Html<String>> {
    render(&state, Page::Alerts)
}

pub async fn settings(State(state): State<AppState>) -> ApiResult<Html<String>> {
    render(&state, Page::Settings)
}

pub async fn snapshots(State(state): State<AppState>) -> ApiResult<Html<String>> {
    render(&state, Page::Snapshots)
}

pub async fn mobile(State(state): State<AppState>) -> ApiResult<Html<String>> {
    render(&state, Page::Mobile)
}
