//! PostgreSQL persistence adapters.
//!
//! Each repository implements one driven port from the domain against the
//! shared async pool. The `schema` module mirrors the SQL migrations.

mod diesel_comment_repository;
mod diesel_follow_repository;
mod diesel_group_repository;
mod diesel_login_service;
mod diesel_post_repository;
mod diesel_user_repository;
mod error_map;
pub(crate) mod models;
pub mod pool;
pub(crate) mod schema;

pub use diesel_comment_repository::DieselCommentRepository;
pub use diesel_follow_repository::DieselFollowRepository;
pub use diesel_group_repository::DieselGroupRepository;
pub use diesel_login_service::DieselLoginService;
pub use diesel_post_repository::DieselPostRepository;
pub use diesel_user_repository::DieselUserRepository;
