//! Shared fixtures for the HTTP integration tests.

#![allow(dead_code)]

use std::time::Duration;

use actix_http::Request;
use actix_web::cookie::Cookie;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::http::header;
use actix_web::test;

use quill::inbound::http::state::HttpState;
use quill::test_support::{MemoryStore, test_state};

pub const PAGE_SIZE: u32 = 10;

/// State over a fresh in-memory store with no page caching.
pub fn uncached_state(store: &MemoryStore) -> HttpState {
    test_state(store, PAGE_SIZE, Duration::ZERO)
}

/// State whose global-feed cache holds entries for a minute.
pub fn cached_state(store: &MemoryStore) -> HttpState {
    test_state(store, PAGE_SIZE, Duration::from_secs(60))
}

/// Log in through the real endpoint and return the session cookie.
pub async fn login<S, B>(app: &S, username: &str, password: &str) -> Cookie<'static>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
{
    let res = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/auth/login/")
            .set_form([("username", username), ("password", password)])
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FOUND, "login should redirect");
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie set")
        .into_owned()
}

/// Build a multipart POST request for the post form.
pub fn multipart_request(uri: &str, fields: &[(&str, &str)]) -> test::TestRequest {
    let boundary = "----quill-test-boundary";
    let mut body = String::new();
    for (name, value) in fields {
        body.push_str(&format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        ));
    }
    body.push_str(&format!("--{boundary}--\r\n"));
    test::TestRequest::post()
        .uri(uri)
        .insert_header((
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        ))
        .set_payload(body)
}

/// The `Location` header of a redirect response.
pub fn location<B>(res: &ServiceResponse<B>) -> String {
    res.headers()
        .get(header::LOCATION)
        .expect("location header")
        .to_str()
        .expect("ascii location")
        .to_owned()
}
