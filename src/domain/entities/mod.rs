//! Core domain entities.
//!
//! - [`Link`] - A persisted short link with visit statistics
//! - [`NewLink`] - Input for creating a link

pub mod link;

pub use link::{Link, NewLink};
