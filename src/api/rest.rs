use crate::api::pages::PageRenderer;
use crate::config::ApiConfig;
use crate::db;
use crate::error::Error;
use crate::security::auth::AuthService;
use crate::services::StatsService;
use anyhow::Result;
use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use log::info;
use serde::Serialize;
use sqlx::SqlitePool;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;

pub mod auth_controller;
pub mod page_controller;
pub mod session_gate;
pub mod stats_controller;

// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db_pool: Arc<SqlitePool>,
    pub auth_service: Arc<AuthService>,
    pub stats_service: StatsService,
    pub pages: Arc<PageRenderer>,
}

impl AppState {
    pub fn new(db_pool: Arc<SqlitePool>, auth_service: Arc<AuthService>) -> Result<Self> {
        Ok(Self {
            stats_service: StatsService::new(Arc::clone(&db_pool)),
            pages: Arc::new(PageRenderer::new()?),
            db_pool,
            auth_service,
        })
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub message: String,
    pub status: u16,
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let status = match err {
            Error::Authentication(_) | Error::Session(_) => StatusCode::UNAUTHORIZED,
            Error::Config(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        ApiError {
            message: err.to_string(),
            status: status.as_u16(),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        if let Some(err) = err.downcast_ref::<Error>() {
            return (*err).clone().into();
        }

        ApiError {
            message: err.to_string(),
            status: StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = Json(self);
        (status, body).into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: bool,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        database: db::health_check(&state.db_pool).await,
    })
}

/// Every route of the dashboard, with the session gate over the protected ones
pub fn router(state: AppState, static_dir: impl Into<PathBuf>) -> Router {
    let protected = Router::new()
        .route("/", get(page_controller::index))
        .route("/dashboard", get(page_controller::dashboard))
        .route("/cameras", get(page_controller::cameras))
        .route("/zones", get(page_controller::zones))
        .route("/alerts", get(page_controller::alerts))
        .route("/settings", get(page_controller::settings))
        .route("/snapshots", get(page_controller::snapshots))
        .route("/mobile", get(page_controller::mobile))
        .route("/stats", get(stats_controller::get_stats))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            session_gate::require_session,
        ));

    let public = Router::new()
        .route(
            "/login",
            get(auth_controller::login_form).post(auth_controller::login),
        )
        .route("/logout", get(auth_controller::logout))
        .route("/health", get(health));

    Router::new()
        .merge(protected)
        .merge(public)
        .nest_service("/static", ServeDir::new(static_dir.into()))
        .with_state(state)
}

pub struct RestApi {
    config: ApiConfig,
    state: AppState,
}

impl RestApi {
    pub fn new(config: &ApiConfig, state: AppState) -> Self {
        Self {
            config: config.clone(),
            state,
        }
    }

    pub async fn run(&self) -> Result<()> {
        let app = router(self.state.clone(), self.config.static_dir.clone());

        let addr = self.config.address.clone() + ":" + &self.config.port.to_string();
        let addr: SocketAddr = addr.parse()?;

        info!("API server listening on {}", addr);

        let listener = TcpListener::bind(addr).await?;

        axum::Server::from_tcp(listener.into_std()?)?
            .serve(app.into_make_service())
            .with_graceful_shutdown(async {
                let _ = tokio::signal::ctrl_c().await;
                info!("Shutting down...");
            })
            .await?;

        Ok(())
    }
}
