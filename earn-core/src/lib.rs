pub mod mount;
pub mod sink;
pub mod timer;
pub mod timings;

pub use mount::{MountHandle, Mounted};
pub use sink::{BroadcastSink, EventSink, RecordingSink, SessionSink, SinkSet, TracingSink};
pub use timer::{ScheduledTask, TransientFlag};
pub use timings::Timings;

use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type CoreResult<T> = Result<T, CoreError>;

/// Outcome of a user-driven operation on a controller.
///
/// Operations called from a state where they have no meaning are not errors;
/// they are reported as `Ignored` and leave the controller untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    Applied,
    Ignored,
}

impl Transition {
    pub fn is_applied(self) -> bool {
        self == Transition::Applied
    }

    pub fn is_ignored(self) -> bool {
        self == Transition::Ignored
    }
}

impl From<bool> for Transition {
    fn from(applied: bool) -> Self {
        if applied {
            Transition::Applied
        } else {
            Transition::Ignored
        }
    }
}
