//! Storage for generated mockups
//!
//! The engine never stores anything itself. Callers hand encoded results to a
//! `MockupStore`, which decides where they live and how they are addressed.

mod local;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

pub use local::LocalStore;

/// Errors that can occur while storing mockups
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result of a successful store
#[derive(Debug, Clone, PartialEq)]
pub struct StoredObject {
    pub key: String,
    pub url: String,
    pub size: usize,
}

/// Destination for encoded mockups and exports
#[async_trait]
pub trait MockupStore: Send + Sync {
    /// Store `bytes` under `key`
    async fn put(&self, key: &str, bytes: Bytes, content_type: &str) -> Result<StoredObject, StorageError>;

    /// Name for logs
    fn name(&self) -> &'static str;
}

/// Key for a generated file: `generated/{date}/{batch}/{scene}_{variant}.{ext}`
pub fn generated_key(batch: &str, scene: &str, variant: &str, extension: &str) -> String {
    let date = chrono::Utc::now().format("%Y-%m-%d");
    format!(
        "generated/{}/{}/{}_{}.{}",
        date,
        sanitize_segment(batch),
        sanitize_segment(scene),
        sanitize_segment(variant),
        extension
    )
}

/// Lowercase and replace anything outside `[a-z0-9_-]` with `_`
fn sanitize_segment(segment: &str) -> String {
    segment
        .chars()
        .map(|c| {
            let c = c.to_ascii_lowercase();
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' }
        })
        .collect()
}

/// Reject keys that are empty, absolute, or step outside the store root
pub fn validate_key(key: &str) -> Result<(), StorageError> {
    if key.is_empty()
        || key.starts_with('/')
        || key.contains('\\')
        || key.split('/').any(|part| part.is_empty() || part == "." || part == "..")
    {
        return Err(StorageError::InvalidKey(key.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_key_layout() {
        let key = generated_key("0b6f", "Living Room", "mockup", "png");
        let parts: Vec<&str> = key.split('/').collect();

        assert_eq!(parts.len(), 4);
        assert_eq!(parts[0], "generated");
        assert_eq!(parts[1].len(), "2024-01-01".len());
        assert_eq!(parts[2], "0b6f");
        assert_eq!(parts[3], "living_room_mockup.png");
        assert!(validate_key(&key).is_ok());
    }

    #[test]
    fn test_sanitize_blocks_traversal() {
        let key = generated_key("..", "../etc", "passwd", "png");
        assert!(validate_key(&key).is_ok());
        assert!(!key.contains(".."));
    }

    #[test]
    fn test_validate_key() {
        assert!(validate_key("generated/a.png").is_ok());
        assert!(validate_key("").is_err());
        assert!(validate_key("/abs.png").is_err());
        assert!(validate_key("a/../b.png").is_err());
        assert!(validate_key("a//b.png").is_err());
    }
}
