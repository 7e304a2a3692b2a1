//! Built-in anchor vocabularies.

use crate::registry::anchor::{Anchor, AnchorCategory, AnchorSummary};

/// Starter vocabulary seeded at process start.
pub fn default_anchors() -> Vec<Anchor> {
    use AnchorCategory::*;

    [
        ("ObserveState", "Report current system or environment state", Observe),
        ("ObserveChange", "Report a detected change", Observe),
        ("ObserveError", "Report an observed error condition", Observe),
        ("InformResult", "Share a computed or derived result", Inform),
        ("InformStatus", "Provide status update", Inform),
        ("InformComplete", "Report task completion", Inform),
        ("InformBlocked", "Report being blocked on something", Inform),
        ("InformProgress", "Share progress update", Inform),
        ("AskClarify", "Request clarification on requirements", Ask),
        ("AskStatus", "Query current status", Ask),
        ("AskPermission", "Request permission to proceed", Ask),
        ("AskResource", "Query resource availability", Ask),
        ("RequestTask", "Request execution of a task", Request),
        ("RequestReview", "Request review of work", Request),
        ("RequestHelp", "Request assistance", Request),
        ("RequestData", "Request data or information retrieval", Request),
        ("ProposePlan", "Propose a plan for consideration", Propose),
        ("ProposeChange", "Propose a modification", Propose),
        ("ProposeFix", "Propose a fix or solution", Propose),
        ("CommitTask", "Commit to performing a task", Commit),
        ("CommitPlan", "Commit to executing a plan", Commit),
        ("EvalApprove", "Evaluation: approved/positive", Eval),
        ("EvalReject", "Evaluation: rejected/negative", Eval),
        ("EvalPass", "Evaluation: tests/checks passed", Eval),
        ("EvalFail", "Evaluation: tests/checks failed", Eval),
        ("ActionExecute", "Execute a command or operation", Action),
        ("ActionFetch", "Fetch or retrieve data", Action),
        ("ActionUpdate", "Update or modify something", Action),
        ("ActionMerge", "Merge changes or branches", Action),
        ("MetaAck", "Acknowledge receipt", Meta),
        ("MetaSync", "Synchronization message", Meta),
    ]
    .into_iter()
    .map(|(mnemonic, definition, category)| Anchor::new(mnemonic, definition, category))
    .collect()
}

/// Minimal vocabulary exported when the live registry is unexpectedly empty.
pub fn fallback_summaries() -> Vec<AnchorSummary> {
    [
        ("1", "Initiate a code review process"),
        ("2", "Execute a test suite"),
        ("3", "Deploy to staging environment"),
        ("16", "Rollback to previous version"),
        ("17", "Approve pull request"),
        (
            "CHECK-POLICY-2FA",
            "Verify compliance with Multi-Factor Authentication policy",
        ),
    ]
    .into_iter()
    .map(|(mnemonic, definition)| AnchorSummary {
        mnemonic: mnemonic.to_string(),
        definition: definition.to_string(),
    })
    .collect()
}
