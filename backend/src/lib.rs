//! Quill: a server-rendered blogging application.
//!
//! The crate is organised hexagonally. `domain` holds the entities,
//! validation, and use-case services behind ports; `inbound::http` renders
//! the pages; `outbound` implements persistence, media storage, and the
//! page cache; `server` wires the pieces together.

pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
