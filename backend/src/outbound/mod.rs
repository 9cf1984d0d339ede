//! Driven adapters: everything the domain reaches out to.

pub mod cache;
pub mod media;
pub mod persistence;
