//! Post pages: detail, create, edit, and comments.
//!
//! Ownership denials never error: a non-author asking for the edit page
//! is sent back to the global feed, exactly as if the link had not been
//! there. Validation failures redisplay the form with field messages.

use actix_multipart::form::MultipartForm;
use actix_web::{HttpRequest, HttpResponse, get, post, web};
use uuid::Uuid;

use crate::domain::access::can_edit_post;
use crate::domain::ports::EditOutcome;
use crate::domain::{CommentText, Error, PostId};

use super::forms::{CommentForm, PostForm, PostSubmission, parse_post_form};
use super::session::{SessionContext, Viewer, login_redirect, redirect};
use super::state::HttpState;
use super::templates::{FormErrors, GroupChoice, PostDetailTemplate, PostFormTemplate};
use super::{html, render};

fn parse_post_id(raw: &str) -> Result<PostId, Error> {
    Uuid::parse_str(raw)
        .map(PostId::from_uuid)
        .map_err(|_| Error::not_found("no post with that identifier"))
}

/// One post with its comments.
#[get("/posts/{id}/")]
pub async fn post_detail(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> Result<HttpResponse, Error> {
    let id = parse_post_id(&path.into_inner())?;
    let viewer = session.viewer()?;
    let detail = state.posts.detail(id).await?;
    let can_edit = can_edit_post(detail.post.author.id(), viewer.as_ref().map(|v| v.id));
    let body = render(PostDetailTemplate::new(
        viewer.map(|v| v.username),
        &detail,
        can_edit,
    ))?;
    Ok(html(body))
}

async fn post_form_page(
    state: &HttpState,
    viewer: &Viewer,
    is_edit: bool,
    action: String,
    text: String,
    selected_group: Option<String>,
    errors: FormErrors,
) -> Result<HttpResponse, Error> {
    let groups = state.posts.group_choices().await?;
    let body = render(PostFormTemplate {
        viewer: Some(viewer.username.clone()),
        is_edit,
        action,
        text,
        groups: GroupChoice::choices(&groups, selected_group.as_deref()),
        errors,
    })?;
    Ok(html(body))
}

/// Blank form for a new post. Requires authentication.
#[get("/create/")]
pub async fn create_form(
    state: web::Data<HttpState>,
    session: SessionContext,
    req: HttpRequest,
) -> Result<HttpResponse, Error> {
    let Some(viewer) = session.viewer()? else {
        return Ok(login_redirect(req.path()));
    };
    post_form_page(
        &state,
        &viewer,
        false,
        "/create/".to_owned(),
        String::new(),
        None,
        FormErrors::default(),
    )
    .await
}

/// Create a post, then land on the author's profile.
#[post("/create/")]
pub async fn create_post(
    state: web::Data<HttpState>,
    session: SessionContext,
    req: HttpRequest,
    form: MultipartForm<PostForm>,
) -> Result<HttpResponse, Error> {
    let Some(viewer) = session.viewer()? else {
        return Ok(login_redirect(req.path()));
    };
    let PostSubmission {
        raw_text,
        raw_group,
        outcome,
    } = parse_post_form(form.into_inner()).await?;

    match outcome {
        Ok(input) => {
            let post = state.posts.create(viewer.id, input).await?;
            Ok(redirect(&format!(
                "/profile/{}/",
                post.author.username().as_str()
            )))
        }
        Err(errors) => {
            let selected = (!raw_group.is_empty()).then_some(raw_group);
            post_form_page(
                &state,
                &viewer,
                false,
                "/create/".to_owned(),
                raw_text,
                selected,
                errors,
            )
            .await
        }
    }
}

/// Prefilled form for editing a post. Non-authors are sent to the global
/// feed.
#[get("/posts/{id}/edit/")]
pub async fn edit_form(
    state: web::Data<HttpState>,
    session: SessionContext,
    req: HttpRequest,
    path: web::Path<String>,
) -> Result<HttpResponse, Error> {
    let id = parse_post_id(&path.into_inner())?;
    let Some(viewer) = session.viewer()? else {
        return Ok(login_redirect(req.path()));
    };
    let detail = state.posts.detail(id).await?;
    if !can_edit_post(detail.post.author.id(), Some(viewer.id)) {
        return Ok(redirect("/"));
    }
    let selected = detail.post.group.as_ref().map(|group| group.id.to_string());
    post_form_page(
        &state,
        &viewer,
        true,
        format!("/posts/{id}/edit/"),
        detail.post.text.as_str().to_owned(),
        selected,
        FormErrors::default(),
    )
    .await
}

/// Apply an edit, then land on the post's detail page.
#[post("/posts/{id}/edit/")]
pub async fn edit_post(
    state: web::Data<HttpState>,
    session: SessionContext,
    req: HttpRequest,
    path: web::Path<String>,
    form: MultipartForm<PostForm>,
) -> Result<HttpResponse, Error> {
    let id = parse_post_id(&path.into_inner())?;
    let Some(viewer) = session.viewer()? else {
        return Ok(login_redirect(req.path()));
    };
    let PostSubmission {
        raw_text,
        raw_group,
        outcome,
    } = parse_post_form(form.into_inner()).await?;

    match outcome {
        Ok(input) => match state.posts.edit(viewer.id, id, input).await? {
            EditOutcome::Updated(post) => Ok(redirect(&format!("/posts/{}/", post.id))),
            EditOutcome::NotOwner => Ok(redirect("/")),
        },
        Err(errors) => {
            let selected = (!raw_group.is_empty()).then_some(raw_group);
            post_form_page(
                &state,
                &viewer,
                true,
                format!("/posts/{id}/edit/"),
                raw_text,
                selected,
                errors,
            )
            .await
        }
    }
}

/// Attach a comment, then return to the post. A blank comment is simply
/// dropped and the visitor returned to the page.
#[post("/posts/{id}/comment/")]
pub async fn add_comment(
    state: web::Data<HttpState>,
    session: SessionContext,
    req: HttpRequest,
    path: web::Path<String>,
    form: web::Form<CommentForm>,
) -> Result<HttpResponse, Error> {
    let id = parse_post_id(&path.into_inner())?;
    let Some(viewer) = session.viewer()? else {
        return Ok(login_redirect(req.path()));
    };
    let detail_url = format!("/posts/{id}/");
    let Ok(text) = CommentText::new(form.into_inner().text) else {
        return Ok(redirect(&detail_url));
    };
    state.posts.add_comment(viewer.id, id, text).await?;
    Ok(redirect(&detail_url))
}
