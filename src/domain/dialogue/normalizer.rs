//! Normalization of raw model output into a dialogue decision.
//!
//! Every model-contract violation is absorbed here: the caller always gets a
//! usable decision, tagged with how far it had to deviate from the response.

use serde_json::{Map, Value};

use super::decision::{
    DegradeReason, DialogueDecision, DialogueOutcome, Disposition, DowngradeReason, Intent,
};
use super::extractor::parse_object;
use super::flow_state::FlowState;
use super::replies::{downgrade_reply, normalize_reply, DRAFT_CONFIRMATION, GENERIC_CLARIFICATION};
use crate::domain::catalog::{ProjectCatalog, ProjectHint};
use crate::domain::issue::IssueDraft;

/// Normalizes an `IssueFlowTurn` response.
///
/// `prior_state` is carried over unchanged when the response is unusable.
pub fn normalize_flow_response(
    raw: &str,
    prior_state: Option<&FlowState>,
    catalog: &ProjectCatalog,
) -> DialogueOutcome {
    let obj = match parse_object(raw) {
        Ok(obj) => obj,
        Err(err) => return degraded(prior_state, DegradeReason::Extraction(err.to_string())),
    };
    let Some(reply) = string_field(&obj, "reply") else {
        return degraded(prior_state, DegradeReason::MissingField("reply"));
    };
    let Some(intent) = string_field(&obj, "intent") else {
        return degraded(prior_state, DegradeReason::MissingField("intent"));
    };

    let issue = obj
        .get("issue")
        .and_then(Value::as_object)
        .map(IssueDraft::from_json)
        .filter(|draft| !draft.is_blank());
    let project = issue
        .as_ref()
        .and_then(|draft| catalog.resolve_hint(&draft.project).ok())
        .cloned();

    let mut decision = DialogueDecision {
        reply: normalize_reply(reply),
        intent: Intent::parse_lenient(intent),
        issue,
        state: FlowState::from_value(obj.get("state")),
        project,
    };

    if decision.intent != Intent::Create {
        return DialogueOutcome::accepted(decision);
    }

    match check_create(&decision, catalog) {
        Ok(()) => DialogueOutcome::accepted(decision),
        Err(reason) => {
            decision.intent = Intent::Ask;
            decision.reply = downgrade_reply(&reason);
            DialogueOutcome {
                decision,
                disposition: Disposition::Downgraded(reason),
            }
        }
    }
}

/// Outcome for an answer the backend reports as incomplete. Its content is
/// never parsed, even if an object could be recovered from it.
pub fn normalize_cut_off_response(prior_state: Option<&FlowState>) -> DialogueOutcome {
    degraded(prior_state, DegradeReason::CutOff)
}

/// Normalizes an `IssueParse` response into a draft-carrying `ask`.
///
/// Returns `None` when no valid draft can be recovered.
pub fn normalize_parse_response(raw: &str, catalog: &ProjectCatalog) -> Option<DialogueOutcome> {
    let obj = parse_object(raw).ok()?;
    let draft = IssueDraft::new(
        string_field(&obj, "title").unwrap_or(""),
        string_field(&obj, "description").unwrap_or(""),
        string_field(&obj, "type").unwrap_or(""),
        ProjectHint::from_key(string_field(&obj, "project_key").unwrap_or("")),
    );
    draft.validate().ok()?;

    let project = catalog.resolve_hint(&draft.project).ok().cloned();
    Some(DialogueOutcome::accepted(DialogueDecision {
        reply: DRAFT_CONFIRMATION.to_string(),
        intent: Intent::Ask,
        state: FlowState::with_draft(&draft),
        issue: Some(draft),
        project,
    }))
}

/// A create must carry a valid draft whose project resolves.
fn check_create(decision: &DialogueDecision, catalog: &ProjectCatalog) -> Result<(), DowngradeReason> {
    let draft = decision.issue.as_ref().ok_or(DowngradeReason::MissingDraft)?;
    draft.validate().map_err(DowngradeReason::InvalidDraft)?;
    catalog
        .resolve_hint(&draft.project)
        .map_err(DowngradeReason::UnresolvedProject)?;
    Ok(())
}

fn degraded(prior_state: Option<&FlowState>, reason: DegradeReason) -> DialogueOutcome {
    DialogueOutcome {
        decision: DialogueDecision {
            reply: GENERIC_CLARIFICATION.to_string(),
            intent: Intent::Ask,
            issue: None,
            state: prior_state.cloned().unwrap_or_default(),
            project: None,
        },
        disposition: Disposition::Degraded(reason),
    }
}

fn string_field<'a>(obj: &'a Map<String, Value>, name: &str) -> Option<&'a str> {
    obj.get(name).and_then(Value::as_str)
}
