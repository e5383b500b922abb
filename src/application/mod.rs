// src/application/mod.rs
//
// Application Layer
//
// ARCHITECTURE:
// - Sits ABOVE the domain and the pure services
// - `SessionController` is the pure state machine (event in, snapshot + effects out)
// - `SessionRuntime` is the only place that touches the transport
// - Translates session state into DTOs for front ends

pub mod controller;
pub mod dto;
pub mod error_handling;
pub mod messages;
pub mod runtime;
pub mod state;

#[cfg(test)]
mod controller_tests;

pub use controller::{SessionController, Transition};
pub use dto::{AlbumDto, AssetDto, PaginationDto, SessionView};
pub use error_handling::{ErrorType, StatusMessage};
pub use messages::{Effect, SessionEvent, UserAction};
pub use runtime::SessionRuntime;
pub use state::{AlbumSearch, Mode, ModeTag, SessionState};
