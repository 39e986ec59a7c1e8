//! The per-application launch state machine.

use crate::workspaces::Application;
use restora_core::types::WindowHandle;

/// Where an application is in its launch lifecycle.
///
/// The happy path is `Waiting → Launched → LaunchedAndMoved`. `Failed` is
/// reachable from `Waiting` (launch failure) and `Launched` (placement
/// failure); `Canceled` is reachable from any non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchState {
    Waiting,
    Launched,
    LaunchedAndMoved,
    Failed,
    Canceled,
}

impl LaunchState {
    /// Terminal states admit no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            LaunchState::LaunchedAndMoved | LaunchState::Failed | LaunchState::Canceled
        )
    }
}

/// Tracker entry: an application, its current state, and the window bound
/// to it once placement has been attempted.
#[derive(Debug, Clone)]
pub struct LaunchingAppState {
    pub application: Application,
    pub window: Option<WindowHandle>,
    pub state: LaunchState,
}

impl LaunchingAppState {
    pub fn waiting(application: Application) -> Self {
        LaunchingAppState {
            application,
            window: None,
            state: LaunchState::Waiting,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_states_are_exactly_moved_failed_and_canceled() {
        assert!(!LaunchState::Waiting.is_terminal());
        assert!(!LaunchState::Launched.is_terminal());
        assert!(LaunchState::LaunchedAndMoved.is_terminal());
        assert!(LaunchState::Failed.is_terminal());
        assert!(LaunchState::Canceled.is_terminal());
    }
}
