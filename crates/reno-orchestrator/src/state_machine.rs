//! Pure state machine for board creation control flow
//!
//! No I/O and no async: `transition(state, event) -> (state, actions)` is
//! deterministic, and the creator interprets the returned actions.
//!
//! - Stages run strictly forward, never back
//! - `Failed` and `Cancelled` are reachable from any running stage
//! - Invalid transitions go to `Failed` (never panic)

use serde::Serialize;
use std::fmt;

/// Linear creation stages, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Validating,
    CreatingBoard,
    CreatingColumns,
    CreatingGroups,
    CreatingItems,
    Verifying,
    Done,
}

impl Stage {
    pub const ALL: [Stage; 7] = [
        Stage::Validating,
        Stage::CreatingBoard,
        Stage::CreatingColumns,
        Stage::CreatingGroups,
        Stage::CreatingItems,
        Stage::Verifying,
        Stage::Done,
    ];

    /// Progress label shown while the stage runs
    pub fn label(self) -> &'static str {
        match self {
            Stage::Validating => "Pre-flight validation and setup...",
            Stage::CreatingBoard => "Creating board...",
            Stage::CreatingColumns => "Creating standard columns...",
            Stage::CreatingGroups => "Creating groups and sections...",
            Stage::CreatingItems => "Creating tasks and items...",
            Stage::Verifying => "Verifying board...",
            Stage::Done => "Complete!",
        }
    }

    /// Fixed progress checkpoint reported when the stage starts
    pub fn percent(self) -> u8 {
        match self {
            Stage::Validating => 5,
            Stage::CreatingBoard => 15,
            Stage::CreatingColumns => 25,
            Stage::CreatingGroups => 45,
            Stage::CreatingItems => 80,
            Stage::Verifying => 95,
            Stage::Done => 100,
        }
    }

    pub fn next(self) -> Option<Stage> {
        match self {
            Stage::Validating => Some(Stage::CreatingBoard),
            Stage::CreatingBoard => Some(Stage::CreatingColumns),
            Stage::CreatingColumns => Some(Stage::CreatingGroups),
            Stage::CreatingGroups => Some(Stage::CreatingItems),
            Stage::CreatingItems => Some(Stage::Verifying),
            Stage::Verifying => Some(Stage::Done),
            Stage::Done => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Stage::Validating => "validating",
            Stage::CreatingBoard => "creating board",
            Stage::CreatingColumns => "creating columns",
            Stage::CreatingGroups => "creating groups",
            Stage::CreatingItems => "creating items",
            Stage::Verifying => "verifying",
            Stage::Done => "done",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Creation run state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum State {
    /// No run in progress
    Idle,
    /// A stage has been entered and is about to run or running
    Running { stage: Stage },
    /// Every stage succeeded
    Complete,
    /// Terminal failure; `stage` is `None` for invalid transitions outside a run
    Failed { stage: Option<Stage>, error: String },
    /// Stopped at a stage boundary before `before` ran
    Cancelled { before: Stage },
}

impl State {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            State::Complete | State::Failed { .. } | State::Cancelled { .. }
        )
    }
}

/// Events that trigger state transitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Start,
    StageSucceeded,
    StageFailed { message: String },
    Cancel,
}

/// Side effects for the creator to carry out
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    LogActivity { message: String },
    EnterStage { stage: Stage },
    RecordSuccess { stage: Stage },
    RecordFailure { stage: Stage, error: String },
    Finish,
}

/// Pure state transition function
///
/// # Invalid Transitions
/// Any invalid transition results in a Failed state with descriptive error.
/// This function never panics.
pub fn transition(state: State, event: Event) -> (State, Vec<Action>) {
    match (state, event) {
        (State::Idle, Event::Start) => (
            State::Running {
                stage: Stage::Validating,
            },
            vec![
                Action::LogActivity {
                    message: "Starting board creation".to_string(),
                },
                Action::EnterStage {
                    stage: Stage::Validating,
                },
            ],
        ),

        (State::Idle, Event::Cancel) => (
            State::Cancelled {
                before: Stage::Validating,
            },
            vec![Action::LogActivity {
                message: "Board creation cancelled before it started".to_string(),
            }],
        ),

        (State::Running { stage }, Event::StageSucceeded) => match stage.next() {
            Some(Stage::Done) => (
                State::Complete,
                vec![
                    Action::RecordSuccess { stage },
                    Action::LogActivity {
                        message: "Board creation complete".to_string(),
                    },
                    Action::Finish,
                ],
            ),
            Some(next) => (
                State::Running { stage: next },
                vec![
                    Action::RecordSuccess { stage },
                    Action::EnterStage { stage: next },
                ],
            ),
            None => (
                State::Failed {
                    stage: Some(stage),
                    error: format!("Stage '{}' has no successor", stage),
                },
                vec![Action::LogActivity {
                    message: format!("Invalid success report for stage '{}'", stage),
                }],
            ),
        },

        (State::Running { stage }, Event::StageFailed { message }) => (
            State::Failed {
                stage: Some(stage),
                error: message.clone(),
            },
            vec![
                Action::RecordFailure {
                    stage,
                    error: message.clone(),
                },
                Action::LogActivity {
                    message: format!("Stage '{}' failed: {}", stage, message),
                },
            ],
        ),

        (State::Running { stage }, Event::Cancel) => (
            State::Cancelled { before: stage },
            vec![Action::LogActivity {
                message: format!("Board creation cancelled before stage '{}'", stage),
            }],
        ),

        (state, event) => {
            let stage = match &state {
                State::Running { stage } => Some(*stage),
                State::Failed { stage, .. } => *stage,
                State::Cancelled { before } => Some(*before),
                _ => None,
            };
            let error = format!("Invalid transition from {:?} on {:?}", state, event);
            (
                State::Failed {
                    stage,
                    error: error.clone(),
                },
                vec![Action::LogActivity { message: error }],
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_to(stage: Stage) -> State {
        let (mut state, _) = transition(State::Idle, Event::Start);
        while state != (State::Running { stage }) {
            state = transition(state, Event::StageSucceeded).0;
        }
        state
    }

    #[test]
    fn test_start_enters_validating() {
        let (state, actions) = transition(State::Idle, Event::Start);
        assert_eq!(
            state,
            State::Running {
                stage: Stage::Validating
            }
        );
        assert!(actions.contains(&Action::EnterStage {
            stage: Stage::Validating
        }));
    }

    #[test]
    fn test_stages_run_forward_to_complete() {
        let (mut state, _) = transition(State::Idle, Event::Start);
        let mut entered = vec![Stage::Validating];

        loop {
            let (next, actions) = transition(state, Event::StageSucceeded);
            for action in &actions {
                if let Action::EnterStage { stage } = action {
                    entered.push(*stage);
                }
            }
            state = next;
            if state.is_terminal() {
                assert!(actions.contains(&Action::Finish));
                break;
            }
        }

        assert_eq!(state, State::Complete);
        assert_eq!(entered, Stage::ALL[..6].to_vec());
    }

    #[test]
    fn test_percentages_increase() {
        let percents: Vec<u8> = Stage::ALL.iter().map(|s| s.percent()).collect();
        assert!(percents.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(percents, vec![5, 15, 25, 45, 80, 95, 100]);
    }

    #[test]
    fn test_failure_from_any_stage() {
        for stage in &Stage::ALL[..6] {
            let state = run_to(*stage);
            let (next, actions) = transition(
                state,
                Event::StageFailed {
                    message: "boom".to_string(),
                },
            );
            assert_eq!(
                next,
                State::Failed {
                    stage: Some(*stage),
                    error: "boom".to_string()
                }
            );
            assert!(actions.contains(&Action::RecordFailure {
                stage: *stage,
                error: "boom".to_string()
            }));
        }
    }

    #[test]
    fn test_cancel_at_boundary() {
        let state = run_to(Stage::CreatingGroups);
        let (next, _) = transition(state, Event::Cancel);
        assert_eq!(
            next,
            State::Cancelled {
                before: Stage::CreatingGroups
            }
        );
    }

    #[test]
    fn test_invalid_transitions_fail_without_panic() {
        let (state, _) = transition(State::Idle, Event::StageSucceeded);
        assert!(matches!(state, State::Failed { stage: None, .. }));

        let (state, _) = transition(State::Complete, Event::Start);
        assert!(matches!(state, State::Failed { .. }));

        let (state, _) = transition(
            State::Running {
                stage: Stage::Validating,
            },
            Event::Start,
        );
        assert!(matches!(
            state,
            State::Failed {
                stage: Some(Stage::Validating),
                ..
            }
        ));
    }
}
