//! Issue flow handlers.
//!
//! - `dialogue_step` - One model turn under the issue-flow contract
//! - `file_issue` - Turn orchestration: store, dialogue, tracker, reply

mod dialogue_step;
mod file_issue;

pub use dialogue_step::{DialogueInput, DialogueSettings, IssueFlowDialogue};
pub use file_issue::{FileIssueHandler, TRACKER_NOT_CONFIGURED};
