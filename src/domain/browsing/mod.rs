//! Browsing state invariants:
//!
//! 1. `0 <= current_index < len` whenever the window is non-empty
//! 2. The cursor is re-clamped whenever the window shrinks or is replaced
//! 3. An id appears at most once in a window

pub mod pagination;
pub mod window;

pub use pagination::PaginationState;
pub use window::{clamp_index, BrowsingWindow};
