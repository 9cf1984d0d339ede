//! In-memory adapters for integration tests.
//!
//! A [`MemoryStore`] stands in for the whole database: one shared state
//! implements every repository port plus login, so a test can seed users,
//! groups, and posts, then drive the HTTP surface without PostgreSQL.
//! Passwords are compared in plain text; this is a test double, not a
//! credential store.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use pagination::Paginator;
use uuid::Uuid;

use crate::domain::ports::{
    CommentRepository, FeedFilter, FollowRepository, GroupRepository, ImageUpload, LoginError,
    LoginService, MediaStore, MediaStoreError, PersistenceError, PostRepository, UserRepository,
};
use crate::domain::{
    Comment, CommentId, FeedService, FollowService, Group, GroupId, GroupRef, GroupSlug, MediaPath,
    NewComment, NewPost, Post, PostChanges, PostId, PostService, User, UserId, Username,
};
use crate::inbound::http::state::HttpState;
use crate::outbound::cache::MemoryPageCache;

struct StoredUser {
    user: User,
    password: String,
}

#[derive(Default)]
struct Db {
    users: Vec<StoredUser>,
    groups: Vec<Group>,
    posts: Vec<Post>,
    comments: Vec<Comment>,
    follows: HashSet<(Uuid, Uuid)>,
    uploads: HashMap<String, Vec<u8>>,
    clock_ticks: i64,
}

/// Shared in-memory state implementing every driven port.
#[derive(Clone, Default)]
pub struct MemoryStore {
    db: Arc<Mutex<Db>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Db> {
        self.db.lock().expect("memory store lock")
    }

    /// Monotonic timestamps keep feed ordering deterministic.
    fn next_timestamp(db: &mut Db) -> DateTime<Utc> {
        db.clock_ticks += 1;
        DateTime::UNIX_EPOCH + TimeDelta::seconds(db.clock_ticks)
    }

    /// Seed a user with a plain-text password for login tests.
    pub fn add_user(&self, username: &str, password: &str) -> User {
        let user = User::new(
            UserId::random(),
            Username::new(username).expect("seed username"),
        );
        self.lock().users.push(StoredUser {
            user: user.clone(),
            password: password.to_owned(),
        });
        user
    }

    /// Seed a group.
    pub fn add_group(&self, title: &str, slug: &str, description: &str) -> Group {
        let group = Group::new(
            GroupId::random(),
            title,
            GroupSlug::new(slug).expect("seed slug"),
            description,
        )
        .expect("seed group");
        self.lock().groups.push(group.clone());
        group
    }

    /// Seed a post; later seeds publish later.
    pub fn add_post(&self, author: &User, text: &str, group: Option<&Group>) -> Post {
        let mut db = self.lock();
        let pub_date = Self::next_timestamp(&mut db);
        let post = Post {
            id: PostId::random(),
            text: crate::domain::PostText::new(text).expect("seed text"),
            pub_date,
            author: author.clone(),
            group: group.map(|group| GroupRef {
                id: group.id(),
                slug: group.slug().clone(),
                title: group.title().to_owned(),
            }),
            image: None,
        };
        db.posts.push(post.clone());
        post
    }

    /// The uploads recorded by the in-memory media store.
    pub fn uploads(&self) -> Vec<String> {
        self.lock().uploads.keys().cloned().collect()
    }

    /// Current text of a stored post, for asserting edits did or did not
    /// happen.
    pub fn post_text(&self, id: PostId) -> Option<String> {
        self.lock()
            .posts
            .iter()
            .find(|post| post.id == id)
            .map(|post| post.text.as_str().to_owned())
    }

    fn matches(db: &Db, post: &Post, filter: &FeedFilter) -> bool {
        match filter {
            FeedFilter::All => true,
            FeedFilter::Group(group) => post.group.as_ref().is_some_and(|g| g.id == *group),
            FeedFilter::Author(author) => post.author.id() == *author,
            FeedFilter::FollowedBy(user) => db
                .follows
                .contains(&(*user.as_uuid(), *post.author.id().as_uuid())),
        }
    }

    fn filtered(db: &Db, filter: &FeedFilter) -> Vec<Post> {
        let mut posts: Vec<Post> = db
            .posts
            .iter()
            .filter(|post| Self::matches(db, post, filter))
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.pub_date.cmp(&a.pub_date));
        posts
    }

    fn find_user(db: &Db, id: UserId) -> Result<User, PersistenceError> {
        db.users
            .iter()
            .find(|stored| stored.user.id() == id)
            .map(|stored| stored.user.clone())
            .ok_or_else(|| PersistenceError::query("unknown user id"))
    }

    fn group_ref(db: &Db, id: GroupId) -> Result<GroupRef, PersistenceError> {
        db.groups
            .iter()
            .find(|group| group.id() == id)
            .map(|group| GroupRef {
                id: group.id(),
                slug: group.slug().clone(),
                title: group.title().to_owned(),
            })
            .ok_or_else(|| PersistenceError::query("unknown group id"))
    }
}

#[async_trait]
impl PostRepository for MemoryStore {
    async fn create(&self, new_post: &NewPost) -> Result<Post, PersistenceError> {
        let mut db = self.lock();
        let author = Self::find_user(&db, new_post.author)?;
        let group = new_post
            .group
            .map(|id| Self::group_ref(&db, id))
            .transpose()?;
        let pub_date = Self::next_timestamp(&mut db);
        let post = Post {
            id: PostId::random(),
            text: new_post.text.clone(),
            pub_date,
            author,
            group,
            image: new_post.image.clone(),
        };
        db.posts.push(post.clone());
        Ok(post)
    }

    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, PersistenceError> {
        Ok(self.lock().posts.iter().find(|post| post.id == id).cloned())
    }

    async fn update(&self, id: PostId, changes: &PostChanges) -> Result<Post, PersistenceError> {
        let mut db = self.lock();
        let group = changes
            .group
            .map(|group| Self::group_ref(&db, group))
            .transpose()?;
        let post = db
            .posts
            .iter_mut()
            .find(|post| post.id == id)
            .ok_or_else(|| PersistenceError::query("unknown post id"))?;
        post.text = changes.text.clone();
        post.group = group;
        if let Some(image) = &changes.image {
            post.image = Some(image.clone());
        }
        Ok(post.clone())
    }

    async fn count(&self, filter: &FeedFilter) -> Result<u64, PersistenceError> {
        let db = self.lock();
        Ok(Self::filtered(&db, filter).len() as u64)
    }

    async fn list(
        &self,
        filter: &FeedFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Post>, PersistenceError> {
        let db = self.lock();
        Ok(Self::filtered(&db, filter)
            .into_iter()
            .skip(usize::try_from(offset).unwrap_or(0))
            .take(usize::try_from(limit).unwrap_or(0))
            .collect())
    }
}

#[async_trait]
impl GroupRepository for MemoryStore {
    async fn find_by_slug(&self, slug: &GroupSlug) -> Result<Option<Group>, PersistenceError> {
        Ok(self
            .lock()
            .groups
            .iter()
            .find(|group| group.slug() == slug)
            .cloned())
    }

    async fn find_by_id(&self, id: GroupId) -> Result<Option<Group>, PersistenceError> {
        Ok(self
            .lock()
            .groups
            .iter()
            .find(|group| group.id() == id)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<Group>, PersistenceError> {
        Ok(self.lock().groups.clone())
    }
}

#[async_trait]
impl CommentRepository for MemoryStore {
    async fn create(&self, new_comment: &NewComment) -> Result<Comment, PersistenceError> {
        let mut db = self.lock();
        let author = Self::find_user(&db, new_comment.author)?;
        let created = Self::next_timestamp(&mut db);
        let comment = Comment {
            id: CommentId::random(),
            post: new_comment.post,
            author,
            text: new_comment.text.clone(),
            created,
        };
        db.comments.push(comment.clone());
        Ok(comment)
    }

    async fn list_for_post(&self, post: PostId) -> Result<Vec<Comment>, PersistenceError> {
        let mut comments: Vec<Comment> = self
            .lock()
            .comments
            .iter()
            .filter(|comment| comment.post == post)
            .cloned()
            .collect();
        comments.sort_by(|a, b| a.created.cmp(&b.created));
        Ok(comments)
    }
}

#[async_trait]
impl FollowRepository for MemoryStore {
    async fn insert(&self, user: UserId, author: UserId) -> Result<bool, PersistenceError> {
        Ok(self
            .lock()
            .follows
            .insert((*user.as_uuid(), *author.as_uuid())))
    }

    async fn remove(&self, user: UserId, author: UserId) -> Result<bool, PersistenceError> {
        Ok(self
            .lock()
            .follows
            .remove(&(*user.as_uuid(), *author.as_uuid())))
    }

    async fn exists(&self, user: UserId, author: UserId) -> Result<bool, PersistenceError> {
        Ok(self
            .lock()
            .follows
            .contains(&(*user.as_uuid(), *author.as_uuid())))
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, PersistenceError> {
        Ok(self
            .lock()
            .users
            .iter()
            .find(|stored| stored.user.username() == username)
            .map(|stored| stored.user.clone()))
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, PersistenceError> {
        Ok(self
            .lock()
            .users
            .iter()
            .find(|stored| stored.user.id() == id)
            .map(|stored| stored.user.clone()))
    }
}

#[async_trait]
impl LoginService for MemoryStore {
    async fn authenticate(&self, username: &str, password: &str) -> Result<User, LoginError> {
        self.lock()
            .users
            .iter()
            .find(|stored| stored.user.username().as_str() == username)
            .filter(|stored| stored.password == password)
            .map(|stored| stored.user.clone())
            .ok_or(LoginError::InvalidCredentials)
    }
}

#[async_trait]
impl MediaStore for MemoryStore {
    async fn store(&self, upload: &ImageUpload) -> Result<MediaPath, MediaStoreError> {
        let ext = std::path::Path::new(&upload.filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| MediaStoreError::invalid_name("file name has no extension"))?;
        let relative = format!("posts/{}.{}", Uuid::new_v4(), ext.to_ascii_lowercase());
        self.lock()
            .uploads
            .insert(relative.clone(), upload.bytes.clone());
        MediaPath::new(relative).map_err(|err| MediaStoreError::invalid_name(err.to_string()))
    }
}

/// Build HTTP state over a [`MemoryStore`] for integration tests.
pub fn test_state(store: &MemoryStore, page_size: u32, cache_ttl: Duration) -> HttpState {
    let store = Arc::new(store.clone());
    let paginator = Paginator::new(page_size).expect("test page size");
    HttpState {
        feeds: Arc::new(FeedService::new(
            Arc::clone(&store),
            Arc::clone(&store),
            Arc::clone(&store),
            Arc::clone(&store),
            paginator,
        )),
        posts: Arc::new(PostService::new(
            Arc::clone(&store),
            Arc::clone(&store),
            Arc::clone(&store),
            Arc::clone(&store),
        )),
        follows: Arc::new(FollowService::new(Arc::clone(&store), Arc::clone(&store))),
        login: store,
        page_cache: Arc::new(MemoryPageCache::new(cache_ttl)),
    }
}
