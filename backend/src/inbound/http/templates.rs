//! Askama templates and the view models they render.
//!
//! Domain entities are flattened into plain string-bearing structs here so
//! the template files stay free of domain method calls.

use askama::Template;
use pagination::Page;

use crate::domain::ports::{GroupFeed, PostDetail, ProfileFeed};
use crate::domain::{Comment, Group, MediaPath, Post};

/// Link to a group page.
#[derive(Debug, Clone)]
pub struct GroupLink {
    pub slug: String,
    pub title: String,
}

/// One post as the feed and detail pages show it.
#[derive(Debug, Clone)]
pub struct PostView {
    pub id: String,
    pub text: String,
    pub pub_date: String,
    pub author: String,
    pub group: Option<GroupLink>,
    pub image: Option<String>,
}

impl From<&Post> for PostView {
    fn from(post: &Post) -> Self {
        Self {
            id: post.id.to_string(),
            text: post.text.as_str().to_owned(),
            pub_date: post.pub_date.format("%d %b %Y %H:%M").to_string(),
            author: post.author.username().as_str().to_owned(),
            group: post.group.as_ref().map(|group| GroupLink {
                slug: group.slug.as_str().to_owned(),
                title: group.title.clone(),
            }),
            image: post.image.as_ref().map(MediaPath::as_str).map(str::to_owned),
        }
    }
}

/// One comment as the detail page shows it.
#[derive(Debug, Clone)]
pub struct CommentView {
    pub author: String,
    pub text: String,
    pub created: String,
}

impl From<&Comment> for CommentView {
    fn from(comment: &Comment) -> Self {
        Self {
            author: comment.author.username().as_str().to_owned(),
            text: comment.text.as_str().to_owned(),
            created: comment.created.format("%d %b %Y %H:%M").to_string(),
        }
    }
}

/// Pagination controls under a feed.
#[derive(Debug, Clone)]
pub struct Pager {
    pub number: u32,
    pub total_pages: u32,
    pub has_previous: bool,
    pub has_next: bool,
    pub previous: u32,
    pub next: u32,
}

impl Pager {
    /// Flatten a page envelope into template-friendly fields.
    pub fn from_page<T>(page: &Page<T>) -> Self {
        Self {
            number: page.number(),
            total_pages: page.total_pages(),
            has_previous: page.has_previous(),
            has_next: page.has_next(),
            previous: page.previous_number().unwrap_or(1),
            next: page.next_number().unwrap_or_else(|| page.total_pages()),
        }
    }
}

fn post_views(page: &Page<Post>) -> Vec<PostView> {
    page.items().iter().map(PostView::from).collect()
}

/// One option in the post form's group selector.
#[derive(Debug, Clone)]
pub struct GroupChoice {
    pub id: String,
    pub title: String,
    pub selected: bool,
}

impl GroupChoice {
    /// Build selector options, marking the currently assigned group.
    pub fn choices(groups: &[Group], selected: Option<&str>) -> Vec<Self> {
        groups
            .iter()
            .map(|group| {
                let id = group.id().to_string();
                let selected = Some(id.as_str()) == selected;
                Self {
                    id,
                    title: group.title().to_owned(),
                    selected,
                }
            })
            .collect()
    }
}

/// Per-field validation messages redisplayed with the post form.
#[derive(Debug, Clone, Default)]
pub struct FormErrors {
    pub text: Option<String>,
    pub group: Option<String>,
    pub image: Option<String>,
}

impl FormErrors {
    /// Whether the submission passed validation.
    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.group.is_none() && self.image.is_none()
    }
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub viewer: Option<String>,
    pub posts: Vec<PostView>,
    pub pager: Pager,
}

impl IndexTemplate {
    pub fn new(viewer: Option<String>, page: &Page<Post>) -> Self {
        Self {
            viewer,
            posts: post_views(page),
            pager: Pager::from_page(page),
        }
    }
}

#[derive(Template)]
#[template(path = "group_list.html")]
pub struct GroupTemplate {
    pub viewer: Option<String>,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub posts: Vec<PostView>,
    pub pager: Pager,
}

impl GroupTemplate {
    pub fn new(viewer: Option<String>, feed: &GroupFeed) -> Self {
        Self {
            viewer,
            title: feed.group.title().to_owned(),
            slug: feed.group.slug().as_str().to_owned(),
            description: feed.group.description().to_owned(),
            posts: post_views(&feed.page),
            pager: Pager::from_page(&feed.page),
        }
    }
}

#[derive(Template)]
#[template(path = "profile.html")]
pub struct ProfileTemplate {
    pub viewer: Option<String>,
    pub author: String,
    pub post_count: u64,
    pub viewer_follows: bool,
    pub is_self: bool,
    pub posts: Vec<PostView>,
    pub pager: Pager,
}

impl ProfileTemplate {
    pub fn new(viewer: Option<String>, feed: &ProfileFeed) -> Self {
        let author = feed.author.username().as_str().to_owned();
        let is_self = viewer.as_deref() == Some(author.as_str());
        Self {
            viewer,
            author,
            post_count: feed.post_count,
            viewer_follows: feed.viewer_follows,
            is_self,
            posts: post_views(&feed.page),
            pager: Pager::from_page(&feed.page),
        }
    }
}

#[derive(Template)]
#[template(path = "post_detail.html")]
pub struct PostDetailTemplate {
    pub viewer: Option<String>,
    pub post: PostView,
    pub author_post_count: u64,
    pub comments: Vec<CommentView>,
    pub can_edit: bool,
    pub can_comment: bool,
}

impl PostDetailTemplate {
    pub fn new(viewer: Option<String>, detail: &PostDetail, can_edit: bool) -> Self {
        Self {
            can_comment: viewer.is_some(),
            viewer,
            post: PostView::from(&detail.post),
            author_post_count: detail.author_post_count,
            comments: detail.comments.iter().map(CommentView::from).collect(),
            can_edit,
        }
    }
}

#[derive(Template)]
#[template(path = "post_form.html")]
pub struct PostFormTemplate {
    pub viewer: Option<String>,
    pub is_edit: bool,
    pub action: String,
    pub text: String,
    pub groups: Vec<GroupChoice>,
    pub errors: FormErrors,
}

#[derive(Template)]
#[template(path = "follow.html")]
pub struct FollowTemplate {
    pub viewer: Option<String>,
    pub posts: Vec<PostView>,
    pub pager: Pager,
}

impl FollowTemplate {
    pub fn new(viewer: Option<String>, page: &Page<Post>) -> Self {
        Self {
            viewer,
            posts: post_views(page),
            pager: Pager::from_page(page),
        }
    }
}

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub viewer: Option<String>,
    pub next: String,
    pub error: Option<String>,
    pub username: String,
}

#[derive(Template)]
#[template(path = "404.html")]
pub struct NotFoundTemplate {}
