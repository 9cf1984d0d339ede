//! Post lifecycle: create, edit, detail, comments.
//!
//! Ownership is enforced here: an edit by anyone but the author returns
//! [`EditOutcome::NotOwner`] without touching storage, and the HTTP
//! adapter turns that into a silent redirect to the global feed.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use super::access::can_edit_post;
use super::comment::{Comment, CommentText, NewComment};
use super::error::Error;
use super::feed_service::map_persistence_error;
use super::group::{Group, GroupId};
use super::ports::{
    CommentRepository, EditOutcome, FeedFilter, GroupRepository, MediaStore, MediaStoreError,
    PostDetail, PostInput, PostOps, PostRepository,
};
use super::post::{MediaPath, NewPost, Post, PostChanges, PostId};
use super::user::UserId;

fn map_media_error(error: MediaStoreError) -> Error {
    match error {
        MediaStoreError::InvalidName { message } => {
            Error::invalid_request(format!("image rejected: {message}"))
        }
        MediaStoreError::Write { message } => {
            Error::internal(format!("image storage failed: {message}"))
        }
    }
}

/// Implements [`PostOps`] over the persistence and media ports.
#[derive(Clone)]
pub struct PostService<P, G, C, M> {
    posts: Arc<P>,
    groups: Arc<G>,
    comments: Arc<C>,
    media: Arc<M>,
}

impl<P, G, C, M> PostService<P, G, C, M> {
    /// Create a post service with the given adapters.
    pub fn new(posts: Arc<P>, groups: Arc<G>, comments: Arc<C>, media: Arc<M>) -> Self {
        Self {
            posts,
            groups,
            comments,
            media,
        }
    }
}

impl<P, G, C, M> PostService<P, G, C, M>
where
    P: PostRepository,
    G: GroupRepository,
    C: CommentRepository,
    M: MediaStore,
{
    /// Reject group ids that do not resolve to a stored group.
    async fn check_group(&self, group: Option<GroupId>) -> Result<Option<GroupId>, Error> {
        let Some(id) = group else {
            return Ok(None);
        };
        self.groups
            .find_by_id(id)
            .await
            .map_err(map_persistence_error)?
            .ok_or_else(|| Error::invalid_request(format!("unknown group {id}")))?;
        Ok(Some(id))
    }

    /// Store a fresh upload, if one was submitted.
    async fn store_image(
        &self,
        upload: Option<&super::ports::ImageUpload>,
    ) -> Result<Option<MediaPath>, Error> {
        match upload {
            Some(upload) => {
                let path = self.media.store(upload).await.map_err(map_media_error)?;
                Ok(Some(path))
            }
            None => Ok(None),
        }
    }
}

#[async_trait]
impl<P, G, C, M> PostOps for PostService<P, G, C, M>
where
    P: PostRepository,
    G: GroupRepository,
    C: CommentRepository,
    M: MediaStore,
{
    async fn detail(&self, id: PostId) -> Result<PostDetail, Error> {
        let post = self
            .posts
            .find_by_id(id)
            .await
            .map_err(map_persistence_error)?
            .ok_or_else(|| Error::not_found(format!("no post {id}")))?;
        let author_post_count = self
            .posts
            .count(&FeedFilter::Author(post.author.id()))
            .await
            .map_err(map_persistence_error)?;
        let comments = self
            .comments
            .list_for_post(id)
            .await
            .map_err(map_persistence_error)?;
        Ok(PostDetail {
            post,
            author_post_count,
            comments,
        })
    }

    async fn group_choices(&self) -> Result<Vec<Group>, Error> {
        self.groups.list().await.map_err(map_persistence_error)
    }

    async fn create(&self, author: UserId, input: PostInput) -> Result<Post, Error> {
        let group = self.check_group(input.group).await?;
        let image = self.store_image(input.image.as_ref()).await?;
        let new_post = NewPost {
            author,
            text: input.text,
            group,
            image,
        };
        let post = self
            .posts
            .create(&new_post)
            .await
            .map_err(map_persistence_error)?;
        info!(post_id = %post.id, author = %post.author.username(), "post created");
        Ok(post)
    }

    async fn edit(
        &self,
        actor: UserId,
        id: PostId,
        input: PostInput,
    ) -> Result<EditOutcome, Error> {
        let post = self
            .posts
            .find_by_id(id)
            .await
            .map_err(map_persistence_error)?
            .ok_or_else(|| Error::not_found(format!("no post {id}")))?;
        if !can_edit_post(post.author.id(), Some(actor)) {
            return Ok(EditOutcome::NotOwner);
        }
        let group = self.check_group(input.group).await?;
        // A fresh upload replaces the image; otherwise the stored one stays.
        let image = self.store_image(input.image.as_ref()).await?;
        let changes = PostChanges {
            text: input.text,
            group,
            image,
        };
        let updated = self
            .posts
            .update(id, &changes)
            .await
            .map_err(map_persistence_error)?;
        Ok(EditOutcome::Updated(updated))
    }

    async fn add_comment(
        &self,
        author: UserId,
        post: PostId,
        text: CommentText,
    ) -> Result<Comment, Error> {
        self.posts
            .find_by_id(post)
            .await
            .map_err(map_persistence_error)?
            .ok_or_else(|| Error::not_found(format!("no post {post}")))?;
        let new_comment = NewComment { post, author, text };
        self.comments
            .create(&new_comment)
            .await
            .map_err(map_persistence_error)
    }
}
