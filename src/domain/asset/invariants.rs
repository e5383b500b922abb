use super::entity::Asset;
use crate::domain::{DomainError, DomainResult};
use chrono::DateTime;

/// Validates all Asset invariants
pub fn validate_asset(asset: &Asset) -> DomainResult<()> {
    validate_identity(asset)?;
    validate_raw_timestamps(asset)?;
    Ok(())
}

fn validate_identity(asset: &Asset) -> DomainResult<()> {
    if asset.id.is_empty() {
        return Err(DomainError::InvariantViolation(
            "Asset id cannot be empty".to_string(),
        ));
    }
    if asset.albums.iter().any(|album| album.is_empty()) {
        return Err(DomainError::InvariantViolation(format!(
            "Asset {} references an empty album id",
            asset.id
        )));
    }
    Ok(())
}

/// The raw strings must agree with the parsed dates; the raw form is what
/// ordering falls back on when two assets share a second.
fn validate_raw_timestamps(asset: &Asset) -> DomainResult<()> {
    for (raw, parsed) in [
        (&asset.created_at_raw, asset.created_at),
        (&asset.modified_at_raw, asset.modified_at),
    ] {
        let reparsed = DateTime::parse_from_rfc3339(raw).map_err(|e| {
            DomainError::InvariantViolation(format!("Asset {} has bad timestamp {:?}: {}", asset.id, raw, e))
        })?;
        if reparsed != parsed {
            return Err(DomainError::InvariantViolation(format!(
                "Asset {} timestamp {:?} disagrees with parsed value",
                asset.id, raw
            )));
        }
    }
    Ok(())
}
