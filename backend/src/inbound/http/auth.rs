//! Login and logout.
//!
//! A failed login redisplays the form with a single generic message so
//! the page cannot be used to tell unknown users from wrong passwords.

use actix_web::{HttpResponse, get, post, web};
use tracing::info;

use crate::domain::Error;
use crate::domain::ports::LoginError;

use super::forms::{LoginForm, LoginQueryParams, sanitise_next};
use super::session::{SessionContext, redirect};
use super::state::HttpState;
use super::templates::LoginTemplate;
use super::{html, render};

/// The login form.
#[get("/auth/login/")]
pub async fn login_form(
    session: SessionContext,
    query: web::Query<LoginQueryParams>,
) -> Result<HttpResponse, Error> {
    let viewer = session.viewer()?;
    let body = render(LoginTemplate {
        viewer: viewer.map(|v| v.username),
        next: sanitise_next(query.next.as_deref()),
        error: None,
        username: String::new(),
    })?;
    Ok(html(body))
}

/// Verify credentials and start a session.
#[post("/auth/login/")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    form: web::Form<LoginForm>,
) -> Result<HttpResponse, Error> {
    let form = form.into_inner();
    let next = sanitise_next(form.next.as_deref());

    match state.login.authenticate(&form.username, &form.password).await {
        Ok(user) => {
            session.persist_user(&user)?;
            info!(username = %user.username(), "login succeeded");
            Ok(redirect(&next))
        }
        Err(LoginError::InvalidCredentials) => {
            let body = render(LoginTemplate {
                viewer: None,
                next,
                error: Some("Username and password did not match.".to_owned()),
                username: form.username,
            })?;
            Ok(html(body))
        }
        Err(LoginError::Unavailable { message }) => {
            Err(Error::internal(format!("login backend unavailable: {message}")))
        }
    }
}

/// End the session and return to the global feed.
#[get("/auth/logout/")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.clear();
    redirect("/")
}
