//! Helpers shared by handler and integration tests.

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Key, SameSite};

/// Cookie-session middleware mirroring the production settings, except
/// with a throwaway key and the `Secure` flag off so plain-HTTP test
/// requests work.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .cookie_same_site(SameSite::Lax)
        .build()
}
