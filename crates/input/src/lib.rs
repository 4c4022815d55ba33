//! Terminal input module.
//!
//! Maps `crossterm` key events into [`KeyInput`](crate::types::KeyInput)s for the
//! session controller. Handles terminals with and without key-release events.

pub mod map;
pub mod mapper;

pub use tui_marathon_types as types;

pub use map::{is_quit, map_key};
pub use mapper::{KeyMapper, DEFAULT_RELEASE_TIMEOUT};
