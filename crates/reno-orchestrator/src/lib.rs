//! Reno Orchestrator - staged creation of a remote board from a plan
//!
//! ```text
//! Validating -> CreatingBoard -> CreatingColumns -> CreatingGroups
//!            -> CreatingItems -> Verifying -> Done
//! ```
//!
//! Any stage may end the run in `Failed`, and a cancellation request is
//! honoured at the next stage boundary. Item failures are collected into the
//! [`CompletionReport`] instead of aborting the run.

pub mod cancel;
pub mod creator;
pub mod progress;
pub mod queries;
pub mod report;
pub mod state_machine;

pub use cancel::CancelHandle;
pub use creator::BoardCreator;
pub use progress::{
    ChannelSink, ProgressEvent, ProgressKind, ProgressSink, ProgressTracker, StageRecord,
    TracingSink,
};
pub use report::{CompletionReport, CreationFailure, ItemFailure, RunStatus};
pub use state_machine::{transition, Action, Event, Stage, State};
