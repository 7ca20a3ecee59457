use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lifecycle of one document-generation run.
///
/// The original tool encoded this informally through widget show/hide calls;
/// here it is an explicit machine the run loop drives. `Finished` is reached
/// only after every input line has produced a [`crate::SongData`] and been
/// appended to the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    Idle,
    /// Processing the song at `song_index` (zero-based, input order).
    Running { song_index: usize },
    /// Early exit at a song boundary; the in-progress document is abandoned.
    Cancelled,
    /// All songs appended; the document is read-only and transferable.
    Finished,
    Saved,
    Discarded,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StateError {
    #[error("invalid transition: {from:?} -> {to:?}")]
    InvalidTransition { from: RunState, to: RunState },
}

impl RunState {
    /// Attempt a transition, returning the new state or a typed error.
    ///
    /// Legal transitions:
    /// - `Idle -> Running{0}`
    /// - `Running{i} -> Running{i+1}`
    /// - `Running{_} -> Finished | Cancelled`
    /// - `Finished -> Saved | Discarded`
    pub fn transition(self, to: RunState) -> Result<RunState, StateError> {
        let ok = match (self, to) {
            (RunState::Idle, RunState::Running { song_index: 0 }) => true,
            (RunState::Running { song_index: i }, RunState::Running { song_index: j }) => {
                j == i + 1
            }
            (RunState::Running { .. }, RunState::Finished) => true,
            (RunState::Running { .. }, RunState::Cancelled) => true,
            (RunState::Finished, RunState::Saved) => true,
            (RunState::Finished, RunState::Discarded) => true,
            _ => false,
        };
        if ok {
            Ok(to)
        } else {
            Err(StateError::InvalidTransition { from: self, to })
        }
    }

    /// Whether the run has reached a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RunState::Cancelled | RunState::Saved | RunState::Discarded
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_run_to_saved() {
        let mut state = RunState::Idle;
        for i in 0..3 {
            state = state.transition(RunState::Running { song_index: i }).unwrap();
        }
        state = state.transition(RunState::Finished).unwrap();
        state = state.transition(RunState::Saved).unwrap();
        assert!(state.is_terminal());
    }

    #[test]
    fn test_discard_after_finished() {
        let state = RunState::Finished.transition(RunState::Discarded).unwrap();
        assert_eq!(state, RunState::Discarded);
    }

    #[test]
    fn test_cancel_only_while_running() {
        assert!(RunState::Running { song_index: 1 }
            .transition(RunState::Cancelled)
            .is_ok());
        assert_eq!(
            RunState::Idle.transition(RunState::Cancelled),
            Err(StateError::InvalidTransition {
                from: RunState::Idle,
                to: RunState::Cancelled,
            })
        );
    }

    #[test]
    fn test_cannot_skip_songs() {
        let state = RunState::Running { song_index: 0 };
        assert!(state.transition(RunState::Running { song_index: 2 }).is_err());
    }

    #[test]
    fn test_cannot_save_before_finished() {
        assert!(RunState::Running { song_index: 0 }
            .transition(RunState::Saved)
            .is_err());
        assert!(RunState::Idle.transition(RunState::Finished).is_err());
    }
}
