//! HTTP inbound adapter rendering the server-side pages.

use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, ResponseError};
use askama::Template;

use crate::domain::Error;

pub mod auth;
pub mod error;
pub mod feeds;
pub mod follows;
pub mod forms;
pub mod posts;
pub mod session;
pub mod state;
pub mod templates;
#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;

/// Wrap a rendered body in a `200 OK` HTML response.
pub(crate) fn html(body: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(body)
}

/// Render a template, mapping failures to an internal error.
pub(crate) fn render<T: Template>(template: T) -> Result<String, Error> {
    template
        .render()
        .map_err(|error| Error::internal(format!("template rendering failed: {error}")))
}

/// Fallback handler for paths no route matches; serves the error page.
pub async fn not_found() -> HttpResponse {
    Error::not_found("no route matches the requested path").error_response()
}
