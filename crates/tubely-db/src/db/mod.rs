//! Database repositories
//!
//! Handlers depend on the [`VideoRepository`] trait so tests can swap in an
//! in-memory store; production uses [`PgVideoRepository`].

mod video;

pub use video::{PgVideoRepository, VideoRepository};
