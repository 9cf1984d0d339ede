//! Form payloads and their validation.
//!
//! The post form arrives as multipart because of the optional image. A
//! failed validation never becomes an error response; the handler
//! redisplays the form with per-field messages, so parsing returns the
//! raw values alongside the outcome.

use actix_multipart::form::MultipartForm;
use actix_multipart::form::tempfile::TempFile;
use actix_multipart::form::text::Text;
use serde::Deserialize;
use uuid::Uuid;

use crate::domain::ports::{ImageUpload, PostInput};
use crate::domain::{Error, GroupId, PostText};

use super::templates::FormErrors;

/// Multipart payload for creating or editing a post.
#[derive(MultipartForm)]
pub struct PostForm {
    pub text: Option<Text<String>>,
    pub group: Option<Text<String>>,
    pub image: Option<TempFile>,
}

/// A parsed post form: the raw values for redisplay plus the outcome.
pub struct PostSubmission {
    pub raw_text: String,
    pub raw_group: String,
    pub outcome: Result<PostInput, FormErrors>,
}

/// Validate a submitted post form.
///
/// An empty file input counts as "no upload"; browsers send a zero-length
/// part when the field is left blank.
pub async fn parse_post_form(form: PostForm) -> Result<PostSubmission, Error> {
    let raw_text = form.text.map(|text| text.into_inner()).unwrap_or_default();
    let raw_group = form.group.map(|group| group.into_inner()).unwrap_or_default();

    let mut errors = FormErrors::default();

    let text = match PostText::new(raw_text.clone()) {
        Ok(text) => Some(text),
        Err(_) => {
            errors.text = Some("Enter the post text.".to_owned());
            None
        }
    };

    let group = if raw_group.trim().is_empty() {
        None
    } else {
        match Uuid::parse_str(raw_group.trim()) {
            Ok(id) => Some(GroupId::from_uuid(id)),
            Err(_) => {
                errors.group = Some("Choose a valid group.".to_owned());
                None
            }
        }
    };

    let image = match form.image {
        Some(file) if file.size > 0 => match file.file_name {
            Some(filename) => {
                let bytes = tokio::fs::read(file.file.path())
                    .await
                    .map_err(|err| Error::internal(format!("failed to read upload: {err}")))?;
                Some(ImageUpload { filename, bytes })
            }
            None => {
                errors.image = Some("The uploaded file has no name.".to_owned());
                None
            }
        },
        _ => None,
    };

    let outcome = match (errors.is_empty(), text) {
        (true, Some(text)) => Ok(PostInput { text, group, image }),
        _ => Err(errors),
    };

    Ok(PostSubmission {
        raw_text,
        raw_group,
        outcome,
    })
}

/// URL-encoded payload for adding a comment.
#[derive(Debug, Deserialize)]
pub struct CommentForm {
    pub text: String,
}

/// URL-encoded payload for the login form.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub next: Option<String>,
}

/// Query parameters shared by the feed pages.
#[derive(Debug, Deserialize)]
pub struct FeedQueryParams {
    #[serde(default)]
    pub page: Option<String>,
}

/// Query parameters for the login page.
#[derive(Debug, Deserialize)]
pub struct LoginQueryParams {
    #[serde(default)]
    pub next: Option<String>,
}

/// Only application-local paths are safe redirect targets.
pub fn sanitise_next(next: Option<&str>) -> String {
    match next {
        Some(path) if path.starts_with('/') && !path.starts_with("//") => path.to_owned(),
        _ => "/".to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Some("/create/"), "/create/")]
    #[case(Some("//evil.example"), "/")]
    #[case(Some("https://evil.example"), "/")]
    #[case(None, "/")]
    fn next_paths_are_sanitised(#[case] next: Option<&str>, #[case] expected: &str) {
        assert_eq!(sanitise_next(next), expected);
    }

    #[tokio::test]
    async fn blank_text_is_a_field_error() {
        let form = PostForm {
            text: Some(Text("   ".to_owned())),
            group: None,
            image: None,
        };
        let submission = parse_post_form(form).await.expect("parsed");
        let errors = submission.outcome.expect_err("validation fails");
        assert!(errors.text.is_some());
        assert_eq!(submission.raw_text, "   ");
    }

    #[tokio::test]
    async fn unparseable_group_is_a_field_error() {
        let form = PostForm {
            text: Some(Text("hello".to_owned())),
            group: Some(Text("not-a-uuid".to_owned())),
            image: None,
        };
        let submission = parse_post_form(form).await.expect("parsed");
        let errors = submission.outcome.expect_err("validation fails");
        assert!(errors.group.is_some());
        assert!(errors.text.is_none());
    }

    #[tokio::test]
    async fn valid_form_without_image_parses() {
        let form = PostForm {
            text: Some(Text("hello".to_owned())),
            group: Some(Text(String::new())),
            image: None,
        };
        let submission = parse_post_form(form).await.expect("parsed");
        let input = submission.outcome.expect("valid");
        assert_eq!(input.text.as_str(), "hello");
        assert!(input.group.is_none());
        assert!(input.image.is_none());
    }
}
