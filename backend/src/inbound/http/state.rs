//! Shared HTTP adapter state.
//!
//! Handlers accept this via `actix_web::web::Data` so they only depend on
//! domain ports and stay testable without a database.

use std::sync::Arc;

use crate::domain::ports::{FeedQuery, FollowOps, LoginService, PageCache, PostOps};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub feeds: Arc<dyn FeedQuery>,
    pub posts: Arc<dyn PostOps>,
    pub follows: Arc<dyn FollowOps>,
    pub login: Arc<dyn LoginService>,
    pub page_cache: Arc<dyn PageCache>,
}
