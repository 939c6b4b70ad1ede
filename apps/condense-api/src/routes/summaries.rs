//! Summarization routes

use axum::{routing::post, Router};

use crate::{handlers::summaries::summarize_handler, AppState};

/// Create summarization routes
pub fn routes() -> Router<AppState> {
    Router::new().route("/summaries", post(summarize_handler))
}
