//! Feed pages: the global feed, group feeds, and the follow feed.
//!
//! The global feed is the only cached page. The cache key is the request
//! path plus query string, so each page number caches separately, and a
//! cache failure degrades to rendering rather than failing the request.

use actix_web::{HttpRequest, HttpResponse, get, web};
use pagination::PageRequest;
use tracing::warn;

use crate::domain::{Error, GroupSlug, Username};

use super::forms::FeedQueryParams;
use super::session::{SessionContext, login_redirect};
use super::state::HttpState;
use super::templates::{FollowTemplate, GroupTemplate, IndexTemplate, ProfileTemplate};
use super::{html, render};

fn cache_key(req: &HttpRequest) -> String {
    req.uri()
        .path_and_query()
        .map_or_else(|| req.uri().path().to_owned(), |pq| pq.as_str().to_owned())
}

/// The global feed, cached whole-page for a short TTL.
#[get("/")]
pub async fn index(
    state: web::Data<HttpState>,
    session: SessionContext,
    req: HttpRequest,
    query: web::Query<FeedQueryParams>,
) -> Result<HttpResponse, Error> {
    let key = cache_key(&req);
    match state.page_cache.get(&key).await {
        Ok(Some(body)) => return Ok(html(body)),
        Ok(None) => {}
        Err(error) => warn!(%error, "page cache read failed"),
    }

    let viewer = session.viewer()?;
    let page = state
        .feeds
        .global_feed(PageRequest::from_query(query.page.as_deref()))
        .await?;
    let body = render(IndexTemplate::new(viewer.map(|v| v.username), &page))?;

    if let Err(error) = state.page_cache.put(&key, &body).await {
        warn!(%error, "page cache write failed");
    }
    Ok(html(body))
}

/// One group's posts. An unknown or malformed slug is a 404.
#[get("/group/{slug}/")]
pub async fn group_posts(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    query: web::Query<FeedQueryParams>,
) -> Result<HttpResponse, Error> {
    let slug = GroupSlug::new(path.into_inner())
        .map_err(|_| Error::not_found("no group with that slug"))?;
    let viewer = session.viewer()?;
    let feed = state
        .feeds
        .group_feed(&slug, PageRequest::from_query(query.page.as_deref()))
        .await?;
    let body = render(GroupTemplate::new(viewer.map(|v| v.username), &feed))?;
    Ok(html(body))
}

/// An author's profile with their posts.
#[get("/profile/{username}/")]
pub async fn profile(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    query: web::Query<FeedQueryParams>,
) -> Result<HttpResponse, Error> {
    let username =
        Username::new(path.into_inner()).map_err(|_| Error::not_found("no user with that name"))?;
    let viewer = session.viewer()?;
    let feed = state
        .feeds
        .profile_feed(
            &username,
            PageRequest::from_query(query.page.as_deref()),
            viewer.as_ref().map(|v| v.id),
        )
        .await?;
    let body = render(ProfileTemplate::new(viewer.map(|v| v.username), &feed))?;
    Ok(html(body))
}

/// Posts by the authors the viewer follows. Requires authentication.
#[get("/follow/")]
pub async fn follow_index(
    state: web::Data<HttpState>,
    session: SessionContext,
    req: HttpRequest,
    query: web::Query<FeedQueryParams>,
) -> Result<HttpResponse, Error> {
    let Some(viewer) = session.viewer()? else {
        return Ok(login_redirect(req.path()));
    };
    let page = state
        .feeds
        .follow_feed(viewer.id, PageRequest::from_query(query.page.as_deref()))
        .await?;
    let body = render(FollowTemplate::new(Some(viewer.username), &page))?;
    Ok(html(body))
}
