//! Structured reference to an uploaded object.
//!
//! Inside the service an object is always addressed by an explicit bucket and key.
//! The `videos.video_url` column stores the flattened `<bucket>,<key>` form, so
//! conversion happens only when a record is read from or written to the database.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use crate::error::AppError;

const SEPARATOR: char = ',';

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageReference {
    pub bucket: String,
    pub key: String,
}

impl StorageReference {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }
}

/// Persisted form: `<bucket>,<key>`.
impl Display for StorageReference {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}{}{}", self.bucket, SEPARATOR, self.key)
    }
}

impl FromStr for StorageReference {
    type Err = AppError;

    /// Exactly one separator with a non-empty value on each side; anything else
    /// means the stored column was corrupted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(SEPARATOR).collect();
        match parts.as_slice() {
            [bucket, key] if !bucket.is_empty() && !key.is_empty() => {
                Ok(StorageReference::new(*bucket, *key))
            }
            _ => Err(AppError::DataCorruption(format!(
                "wrong video values format: expected <bucket>,<key>, got {:?}",
                s
            ))),
        }
    }
}
