use crate::scheduler::Scheduler;
use anyhow::Context;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use newswire_core::Database;
use serde_json::json;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info};

pub const STATUS_MESSAGE: &str = "Server is running and scraping news periodically.";
pub const EMPTY_MESSAGE: &str = "There are no news at this moment";
pub const SCRAPE_ACCEPTED: &str = "Scraping in progress...";
pub const SCRAPE_BUSY: &str = "A scrape cycle is already running.";

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Mutex<Database>>,
    pub scheduler: Scheduler,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(status))
        .route("/news", get(list_news))
        .route("/scrape", get(trigger_scrape))
        .with_state(state)
}

pub async fn serve(port: u16, state: AppState) -> anyhow::Result<()> {
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Listening on http://{}", addr);
    axum::serve(listener, router(state)).await?;
    Ok(())
}

async fn status() -> Json<serde_json::Value> {
    Json(json!({ "status": STATUS_MESSAGE }))
}

/// Clients of the old service expect `{"Sorry": ...}` when the collection is
/// empty, so that shape is kept instead of an empty array.
async fn list_news(State(state): State<AppState>) -> Response {
    let result = state.db.lock().await.list_all();
    match result {
        Ok(records) if records.is_empty() => {
            Json(json!({ "Sorry": EMPTY_MESSAGE })).into_response()
        }
        Ok(records) => Json(records).into_response(),
        Err(e) => {
            error!(error = %e, "failed to read stored articles");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}

async fn trigger_scrape(State(state): State<AppState>) -> &'static str {
    if state.scheduler.trigger() {
        info!("on-demand scrape accepted");
        SCRAPE_ACCEPTED
    } else {
        SCRAPE_BUSY
    }
}
