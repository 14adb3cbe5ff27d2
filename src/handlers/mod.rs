pub mod api;
pub mod auth;
pub mod health;
pub mod history;
pub mod logger;

use askama::Template;
use axum::response::{Html, IntoResponse, Response};

use crate::error::{AppError, Result};

/// Render an askama template into an HTML response.
pub(crate) fn render<T: Template>(template: &T) -> Result<Response> {
    Ok(Html(
        template
            .render()
            .map_err(|e| AppError::Internal(e.to_string()))?,
    )
    .into_response())
}
