pub mod entity;
pub mod invariants;

pub use entity::{Asset, AssetFlag};
pub use invariants::validate_asset;
