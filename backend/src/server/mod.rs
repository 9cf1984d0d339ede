//! Server assembly: wiring adapters to services and routes to handlers.

use std::sync::Arc;
use std::time::Duration;

use actix_files::Files;
use actix_session::SessionMiddleware;
use actix_session::storage::CookieSessionStore;
use actix_web::cookie::{Key, SameSite};
use actix_web::{App, HttpServer, web};
use diesel::Connection;
use diesel::pg::PgConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use pagination::Paginator;
use tracing::info;

use crate::domain::{FeedService, FollowService, PostService};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::{auth, feeds, follows, posts};
use crate::middleware::trace::RequestTrace;
use crate::outbound::cache::MemoryPageCache;
use crate::outbound::media::FsMediaStore;
use crate::outbound::persistence::pool::{DbPool, PoolConfig, PoolError};
use crate::outbound::persistence::{
    DieselCommentRepository, DieselFollowRepository, DieselGroupRepository, DieselLoginService,
    DieselPostRepository, DieselUserRepository,
};

pub mod config;

pub use config::{AppConfig, ConfigError};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// Failures that can stop the server from starting.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("database pool error: {0}")]
    Pool(#[from] PoolError),

    #[error("migration error: {0}")]
    Migration(String),

    #[error("pagination setup error: {0}")]
    Pagination(#[from] pagination::PaginationError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Register every route and the shared state on an Actix service config.
pub fn configure(cfg: &mut web::ServiceConfig, state: HttpState) {
    cfg.app_data(web::Data::new(state))
        .service(feeds::index)
        .service(feeds::group_posts)
        .service(feeds::profile)
        .service(feeds::follow_index)
        .service(posts::post_detail)
        .service(posts::create_form)
        .service(posts::create_post)
        .service(posts::edit_form)
        .service(posts::edit_post)
        .service(posts::add_comment)
        .service(follows::follow)
        .service(follows::unfollow)
        .service(auth::login_form)
        .service(auth::login)
        .service(auth::logout)
        .default_service(web::route().to(crate::inbound::http::not_found));
}

/// Build the cookie-session middleware used in production.
pub fn session_middleware(key: Key, secure: bool) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".to_owned())
        .cookie_secure(secure)
        .cookie_same_site(SameSite::Lax)
        .build()
}

/// Wire the Diesel adapters into domain services behind the HTTP state.
pub fn build_state(
    pool: DbPool,
    paginator: Paginator,
    cache_ttl: Duration,
    media_root: std::path::PathBuf,
) -> HttpState {
    let post_repo = Arc::new(DieselPostRepository::new(pool.clone()));
    let group_repo = Arc::new(DieselGroupRepository::new(pool.clone()));
    let comment_repo = Arc::new(DieselCommentRepository::new(pool.clone()));
    let user_repo = Arc::new(DieselUserRepository::new(pool.clone()));
    let follow_repo = Arc::new(DieselFollowRepository::new(pool.clone()));
    let media = Arc::new(FsMediaStore::new(media_root));

    HttpState {
        feeds: Arc::new(FeedService::new(
            Arc::clone(&post_repo),
            Arc::clone(&group_repo),
            Arc::clone(&user_repo),
            Arc::clone(&follow_repo),
            paginator,
        )),
        posts: Arc::new(PostService::new(
            post_repo,
            group_repo,
            comment_repo,
            media,
        )),
        follows: Arc::new(FollowService::new(user_repo, follow_repo)),
        login: Arc::new(DieselLoginService::new(pool)),
        page_cache: Arc::new(MemoryPageCache::new(cache_ttl)),
    }
}

async fn run_migrations(database_url: &str) -> Result<(), ServerError> {
    let url = database_url.to_owned();
    tokio::task::spawn_blocking(move || {
        let mut conn = PgConnection::establish(&url)
            .map_err(|err| ServerError::Migration(err.to_string()))?;
        conn.run_pending_migrations(MIGRATIONS)
            .map(drop)
            .map_err(|err| ServerError::Migration(err.to_string()))
    })
    .await
    .map_err(|err| ServerError::Migration(err.to_string()))?
}

/// Run migrations, wire the application, and serve until shutdown.
pub async fn run(config: AppConfig) -> Result<(), ServerError> {
    run_migrations(&config.database_url).await?;

    let pool = DbPool::new(PoolConfig::new(&config.database_url)).await?;
    let paginator = Paginator::new(config.page_size)?;
    let state = build_state(
        pool,
        paginator,
        config.cache_ttl,
        config.media_root.clone(),
    );

    let key = config.session_key.clone();
    let cookie_secure = config.cookie_secure;
    let media_root = config.media_root.clone();

    info!(addr = %config.bind_addr, "starting server");
    HttpServer::new(move || {
        App::new()
            .wrap(RequestTrace)
            .wrap(session_middleware(key.clone(), cookie_secure))
            .configure({
                let state = state.clone();
                move |cfg| configure(cfg, state.clone())
            })
            .service(Files::new("/media", media_root.clone()))
    })
    .bind(config.bind_addr)?
    .run()
    .await?;
    Ok(())
}
