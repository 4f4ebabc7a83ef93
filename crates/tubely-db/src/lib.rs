//! Tubely database layer
//!
//! Repository trait for video records plus its PostgreSQL implementation.

pub mod db;

pub use db::{PgVideoRepository, VideoRepository};
