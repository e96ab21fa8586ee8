//! Link store implementations.
//!
//! - [`PgLinkRepository`] - PostgreSQL store used in production
//! - [`InMemoryLinkRepository`] - In-process store with the same contract

pub mod memory_link_repository;
pub mod pg_link_repository;

pub use memory_link_repository::InMemoryLinkRepository;
pub use pg_link_repository::PgLinkRepository;
