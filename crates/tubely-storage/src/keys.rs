//! Object key derivation shared by all backends.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::rngs::OsRng;
use rand::TryRngCore;
use std::fmt::Display;

use crate::traits::{StorageError, StorageResult};

/// Random bytes per asset name.
pub const ASSET_NAME_BYTES: usize = 32;

const FALLBACK_EXTENSION: &str = ".bin";

/// `.` + subtype when the content type is exactly `type/subtype`, otherwise `.bin`.
pub fn extension_for_content_type(content_type: &str) -> String {
    let parts: Vec<&str> = content_type.split('/').collect();
    match parts.as_slice() {
        [_, subtype] => format!(".{}", subtype),
        _ => FALLBACK_EXTENSION.to_string(),
    }
}

/// Fresh opaque asset name: 32 bytes from the OS RNG, base64url without padding,
/// followed by the extension for `content_type`.
pub fn generate_asset_name(content_type: &str) -> StorageResult<String> {
    let mut bytes = [0u8; ASSET_NAME_BYTES];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| StorageError::KeyGeneration(e.to_string()))?;

    Ok(format!(
        "{}{}",
        URL_SAFE_NO_PAD.encode(bytes),
        extension_for_content_type(content_type)
    ))
}

pub fn compose_key(prefix: impl Display, name: &str) -> String {
    format!("{}/{}", prefix, name)
}
