//! Row types bridging Diesel and the domain entities.
//!
//! Conversions into domain types re-run the newtype validation; a stored
//! value that fails it is reported as a query error rather than panicking,
//! since it can only mean the table was written outside this application.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::ports::PersistenceError;
use crate::domain::{
    Comment, CommentId, CommentText, Group, GroupId, GroupRef, GroupSlug, MediaPath, Post, PostId,
    PostText, User, UserId, Username,
};

use super::schema::{comments, groups, posts, users};

/// One row of `users`, without the credential column.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    pub id: Uuid,
    pub username: String,
}

impl UserRow {
    /// Convert into a domain [`User`].
    pub fn into_domain(self) -> Result<User, PersistenceError> {
        let username = Username::new(self.username)
            .map_err(|err| PersistenceError::query(format!("stored username invalid: {err}")))?;
        Ok(User::new(UserId::from_uuid(self.id), username))
    }
}

/// One row of `users` including the password hash, for login only.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CredentialRow {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
}

/// One row of `groups`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = groups)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct GroupRow {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: String,
}

impl GroupRow {
    /// Convert into a domain [`Group`].
    pub fn into_domain(self) -> Result<Group, PersistenceError> {
        let slug = GroupSlug::new(self.slug)
            .map_err(|err| PersistenceError::query(format!("stored slug invalid: {err}")))?;
        Group::new(GroupId::from_uuid(self.id), self.title, slug, self.description)
            .map_err(|err| PersistenceError::query(format!("stored group invalid: {err}")))
    }

    /// Convert into the lightweight reference a post carries.
    pub fn into_group_ref(self) -> Result<GroupRef, PersistenceError> {
        let slug = GroupSlug::new(self.slug)
            .map_err(|err| PersistenceError::query(format!("stored slug invalid: {err}")))?;
        Ok(GroupRef {
            id: GroupId::from_uuid(self.id),
            slug,
            title: self.title,
        })
    }
}

/// One row of `posts`, before joining author and group.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = posts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PostRow {
    pub id: Uuid,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub author_id: Uuid,
    pub group_id: Option<Uuid>,
    pub image: Option<String>,
}

impl PostRow {
    /// Assemble a domain [`Post`] from the row and its joined neighbours.
    pub fn into_domain(
        self,
        author: UserRow,
        group: Option<GroupRow>,
    ) -> Result<Post, PersistenceError> {
        let text = PostText::new(self.text)
            .map_err(|err| PersistenceError::query(format!("stored post invalid: {err}")))?;
        let image = self
            .image
            .map(MediaPath::new)
            .transpose()
            .map_err(|err| PersistenceError::query(format!("stored image path invalid: {err}")))?;
        let group = group.map(GroupRow::into_group_ref).transpose()?;
        Ok(Post {
            id: PostId::from_uuid(self.id),
            text,
            pub_date: self.pub_date,
            author: author.into_domain()?,
            group,
            image,
        })
    }
}

/// Insertable row for a new post.
#[derive(Debug, Insertable)]
#[diesel(table_name = posts)]
pub struct NewPostRow<'a> {
    pub id: Uuid,
    pub text: &'a str,
    pub author_id: Uuid,
    pub group_id: Option<Uuid>,
    pub image: Option<&'a str>,
}

/// One row of `comments`, before joining the author.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = comments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CommentRow {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub text: String,
    pub created: DateTime<Utc>,
}

impl CommentRow {
    /// Assemble a domain [`Comment`] from the row and its joined author.
    pub fn into_domain(self, author: UserRow) -> Result<Comment, PersistenceError> {
        let text = CommentText::new(self.text)
            .map_err(|err| PersistenceError::query(format!("stored comment invalid: {err}")))?;
        Ok(Comment {
            id: CommentId::from_uuid(self.id),
            post: PostId::from_uuid(self.post_id),
            author: author.into_domain()?,
            text,
            created: self.created,
        })
    }
}

/// Insertable row for a new comment.
#[derive(Debug, Insertable)]
#[diesel(table_name = comments)]
pub struct NewCommentRow<'a> {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub text: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn user_row(username: &str) -> UserRow {
        UserRow {
            id: Uuid::new_v4(),
            username: username.to_owned(),
        }
    }

    #[rstest]
    fn user_row_converts_valid_username() {
        let user = user_row("ada").into_domain().expect("valid user");
        assert_eq!(user.username().as_str(), "ada");
    }

    #[rstest]
    fn user_row_rejects_corrupt_username() {
        let error = user_row("").into_domain().expect_err("blank username");
        assert!(error.to_string().contains("stored username invalid"));
    }

    #[rstest]
    fn post_row_joins_author_and_group() {
        let row = PostRow {
            id: Uuid::new_v4(),
            text: "hello".to_owned(),
            pub_date: Utc::now(),
            author_id: Uuid::new_v4(),
            group_id: None,
            image: Some("posts/pic.png".to_owned()),
        };
        let group = GroupRow {
            id: Uuid::new_v4(),
            title: "Rustaceans".to_owned(),
            slug: "rust".to_owned(),
            description: String::new(),
        };
        let post = row
            .into_domain(user_row("ada"), Some(group))
            .expect("valid post");
        assert_eq!(post.text.as_str(), "hello");
        assert_eq!(post.group.as_ref().map(|g| g.slug.as_str()), Some("rust"));
        assert_eq!(post.image.as_ref().map(MediaPath::as_str), Some("posts/pic.png"));
    }

    #[rstest]
    fn post_row_rejects_corrupt_image_path() {
        let row = PostRow {
            id: Uuid::new_v4(),
            text: "hello".to_owned(),
            pub_date: Utc::now(),
            author_id: Uuid::new_v4(),
            group_id: None,
            image: Some("/etc/passwd".to_owned()),
        };
        let error = row
            .into_domain(user_row("ada"), None)
            .expect_err("absolute path");
        assert!(error.to_string().contains("stored image path invalid"));
    }
}
