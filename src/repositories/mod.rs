// src/repositories/mod.rs
//
// Repository layer
//
// CRITICAL RULES:
// - Repositories are DUMB data holders
// - NO business logic
// - NO invariant enforcement
// - NO event emission

pub mod asset_store;

pub use asset_store::AssetStore;
