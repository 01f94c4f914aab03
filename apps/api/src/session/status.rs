//! Call-status state machine.
//!
//! ```text
//! Inactive --StartRequested--> Connecting --CallStarted--> Active --CallEnded/Disconnected--> Finished
//!     ^                            |
//!     +-------StartFailed----------+
//! ```
//!
//! `Finished` is terminal; a new call needs a new controller.

use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CallStatus {
    #[default]
    Inactive,
    Connecting,
    Active,
    Finished,
}

/// Inputs that can move the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallTrigger {
    /// User pressed "start call".
    StartRequested,
    /// SDK emitted `call-start`.
    CallStarted,
    /// `start()` returned an error, or SDK emitted `call-start-failed`.
    StartFailed,
    /// SDK emitted `call-end`.
    CallEnded,
    /// User pressed "end call".
    Disconnected,
}

impl CallStatus {
    /// Next state for `trigger`, or `None` when the trigger does not apply.
    pub fn next(self, trigger: CallTrigger) -> Option<CallStatus> {
        use CallStatus::*;
        use CallTrigger::*;

        match (self, trigger) {
            (Inactive, StartRequested) => Some(Connecting),
            (Connecting, CallStarted) => Some(Active),
            (Connecting, StartFailed) => Some(Inactive),
            // The remote side hung up before the call ever came up.
            (Connecting, CallEnded) => Some(Inactive),
            (Active, CallEnded) | (Active, Disconnected) => Some(Finished),
            _ => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        self == CallStatus::Finished
    }
}
