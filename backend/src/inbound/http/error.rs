//! Mapping from domain errors to HTML responses.
//!
//! The domain stays transport-agnostic; this module decides status codes
//! and renders the error pages. Messages for internal failures are logged
//! and replaced with a generic body so driver detail never reaches a page.

use actix_web::http::StatusCode;
use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, ResponseError};
use askama::Template;
use tracing::error;

use crate::domain::{Error, ErrorCode};

use super::templates::NotFoundTemplate;

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let body = match self.code() {
            ErrorCode::NotFound => NotFoundTemplate {}.render().unwrap_or_else(|render_error| {
                error!(error = %render_error, "failed to render not-found page");
                "Not found".to_owned()
            }),
            ErrorCode::Internal => {
                error!(message = self.message(), "request failed");
                "Something went wrong. Please try again later.".to_owned()
            }
            _ => self.message().to_owned(),
        };
        HttpResponse::build(status)
            .content_type(ContentType::html())
            .body(body)
    }
}
