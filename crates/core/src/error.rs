//! Session errors.

use derive_more::{Display, Error};

use crate::engine::EngineError;

/// Failure that ended a session.
///
/// Only engine-contract violations surface here. Stale ticks, filtered input
/// and unmapped events are handled inside the controller and never become
/// errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum SessionError {
    #[display("engine rejected {action}: {source}")]
    Engine {
        action: &'static str,
        source: EngineError,
    },
}
