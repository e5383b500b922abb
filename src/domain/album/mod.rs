//! Album invariants:
//!
//! 1. Album id is never empty
//! 2. Album name cannot be empty
//! 3. The displayed count never goes negative

pub mod entity;

pub use entity::Album;

use crate::domain::{DomainError, DomainResult};

/// Validates Album invariants
pub fn validate_album(album: &Album) -> DomainResult<()> {
    if album.id.is_empty() {
        return Err(DomainError::InvariantViolation(
            "Album id cannot be empty".to_string(),
        ));
    }
    if album.name.trim().is_empty() {
        return Err(DomainError::InvariantViolation(
            "Album name cannot be empty".to_string(),
        ));
    }
    Ok(())
}
