//! Issue drafts.
//!
//! The structured proposal the model converges on, its validation rules and
//! the preview shown to the user before filing.

mod draft;
mod errors;
mod filed;
mod preview;
mod template;

pub use draft::{IssueDraft, DEFAULT_ISSUE_TYPE, MAX_DESCRIPTION_CHARS, MAX_TITLE_CHARS};
pub use errors::{DraftValidationError, Section};
pub use filed::FiledIssue;
pub use preview::{append_preview, render_preview};
pub use template::{DescriptionTemplate, MAX_SECTION_ITEMS};
