//! Follow and unfollow actions.
//!
//! Both are links on the profile page, so they arrive as GETs and bounce
//! back to the profile. Following yourself or an author you already
//! follow changes nothing.

use actix_web::{HttpRequest, HttpResponse, get, web};

use crate::domain::{Error, Username};

use super::session::{SessionContext, login_redirect, redirect};
use super::state::HttpState;

fn parse_username(raw: String) -> Result<Username, Error> {
    Username::new(raw).map_err(|_| Error::not_found("no user with that name"))
}

/// Start following an author.
#[get("/profile/{username}/follow/")]
pub async fn follow(
    state: web::Data<HttpState>,
    session: SessionContext,
    req: HttpRequest,
    path: web::Path<String>,
) -> Result<HttpResponse, Error> {
    let username = parse_username(path.into_inner())?;
    let Some(viewer) = session.viewer()? else {
        return Ok(login_redirect(req.path()));
    };
    state.follows.follow(viewer.id, &username).await?;
    Ok(redirect(&format!("/profile/{username}/")))
}

/// Stop following an author.
#[get("/profile/{username}/unfollow/")]
pub async fn unfollow(
    state: web::Data<HttpState>,
    session: SessionContext,
    req: HttpRequest,
    path: web::Path<String>,
) -> Result<HttpResponse, Error> {
    let username = parse_username(path.into_inner())?;
    let Some(viewer) = session.viewer()? else {
        return Ok(login_redirect(req.path()));
    };
    state.follows.unfollow(viewer.id, &username).await?;
    Ok(redirect(&format!("/profile/{username}/")))
}
