//! Issue-flow dialogue.
//!
//! Pure pieces of the dialogue step: the prompt and schema contract, the
//! recovery parser for model output and the normalization rules that turn a
//! raw response into a [`DialogueOutcome`].

mod decision;
mod errors;
mod extractor;
mod flow_state;
mod normalizer;
mod prompts;
mod replies;

pub use decision::{
    DegradeReason, DialogueDecision, DialogueOutcome, Disposition, DowngradeReason, Intent,
};
pub use errors::{ExtractionError, SanitizationError};
pub use extractor::{extract_json_object, parse_object, sanitize, MAX_RESPONSE_LENGTH};
pub use flow_state::FlowState;
pub use normalizer::{
    normalize_cut_off_response, normalize_flow_response, normalize_parse_response,
};
pub use prompts::{
    flow_messages, issue_flow_schema, issue_parse_schema, parse_messages, parse_request_text,
    DIALOGUE_TEMPERATURE, ISSUE_FLOW_SCHEMA_NAME, ISSUE_FLOW_SYSTEM_PROMPT,
    ISSUE_PARSE_SCHEMA_NAME, ISSUE_PARSE_SYSTEM_PROMPT,
};
pub use replies::{
    downgrade_reply, normalize_reply, tracker_failure_reply, truncate_chars, DRAFT_CONFIRMATION,
    GENERIC_CLARIFICATION, GENERIC_FAILURE, MAX_REPLY_CHARS,
};
