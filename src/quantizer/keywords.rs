//! Keyword extraction shared by the deterministic selector and suggester.

use crate::registry::Anchor;
use std::collections::BTreeSet;

const STOPWORDS: &[&str] = &[
    "a", "about", "all", "an", "and", "any", "are", "as", "at", "be", "by", "can", "do", "for",
    "from", "has", "have", "i", "if", "in", "into", "is", "it", "its", "me", "my", "need", "no",
    "not", "now", "of", "on", "or", "our", "should", "so", "some", "that", "the", "their", "them",
    "there", "these", "this", "to", "us", "was", "we", "with", "you", "your",
];

/// Extra cue words for the built-in vocabulary.
const ANCHOR_HINTS: &[(&str, &[&str])] = &[
    ("ObserveState", &["state", "current", "environment"]),
    ("ObserveChange", &["changed", "detected", "noticed"]),
    ("ObserveError", &["error", "exception", "crash", "leak", "unsafe"]),
    ("InformResult", &["result", "retrieved", "found", "coverage"]),
    ("InformStatus", &["status", "compliant", "visible"]),
    ("InformComplete", &["done", "complete", "finished"]),
    ("InformBlocked", &["blocked", "waiting", "stuck"]),
    ("InformProgress", &["progress", "underway"]),
    ("AskClarify", &["clarification", "clarify", "unclear"]),
    ("AskStatus", &["how", "where"]),
    ("AskPermission", &["permission", "allowed", "may"]),
    ("AskResource", &["resource", "availability", "capacity"]),
    ("RequestTask", &["run", "running", "execute", "suite"]),
    ("RequestReview", &["review", "pr"]),
    ("RequestHelp", &["help", "assist", "support"]),
    ("RequestData", &["data", "information", "send"]),
    ("ProposePlan", &["plan", "approach", "strategy"]),
    ("ProposeChange", &["change", "refactoring", "modification"]),
    ("ProposeFix", &["fix", "patch", "solution"]),
    ("CommitTask", &["will", "taking", "commit"]),
    ("CommitPlan", &["proceed", "proceeding"]),
    ("EvalApprove", &["approved", "approve", "lgtm", "secure"]),
    ("EvalReject", &["reject", "rejected", "denied"]),
    ("EvalPass", &["passed", "pass", "green"]),
    ("EvalFail", &["failed", "fail", "failing"]),
    ("ActionExecute", &["executing", "command"]),
    ("ActionFetch", &["fetching", "fetch", "retrieve", "diff"]),
    ("ActionUpdate", &["updating", "update", "modify", "config"]),
    ("ActionMerge", &["merge", "merging", "main"]),
    ("MetaAck", &["ack", "acknowledged", "confirmed", "ok"]),
    ("MetaSync", &["sync", "synchronize"]),
];

/// A significant word: its cleaned surface form and its stem.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Term {
    pub word: String,
    pub stem: String,
}

/// Crude suffix stripping so that `running`, `run` and `runs` meet.
pub fn stem(word: &str) -> String {
    let mut w = word.to_string();
    for suffix in ["ing", "ed", "es", "s", "e"] {
        if w.len() > suffix.len() + 2 && w.ends_with(suffix) && !w.ends_with("ss") {
            w.truncate(w.len() - suffix.len());
            break;
        }
    }
    let bytes = w.as_bytes();
    if bytes.len() > 3 && bytes[bytes.len() - 1] == bytes[bytes.len() - 2] {
        let last = bytes[bytes.len() - 1];
        if last.is_ascii_alphabetic() && !b"aeiousl".contains(&last) {
            w.pop();
        }
    }
    w
}

/// Significant words of free text, in order of appearance, deduplicated by stem.
pub fn terms(text: &str) -> Vec<Term> {
    let mut seen = BTreeSet::new();
    let mut out = Vec::new();
    for raw in text.split(|c: char| !c.is_alphanumeric()) {
        let word = raw.to_lowercase();
        if word.is_empty() || STOPWORDS.contains(&word.as_str()) {
            continue;
        }
        if word.len() < 2 && !word.chars().all(|c| c.is_ascii_digit()) {
            continue;
        }
        let stem = stem(&word);
        if seen.insert(stem.clone()) {
            out.push(Term { word, stem });
        }
    }
    out
}

/// Split a mnemonic like `CHECK-POLICY-2FA` or `RequestTask` into words.
pub fn split_mnemonic(mnemonic: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;
    for c in mnemonic.chars() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev_lower = false;
            continue;
        }
        if c.is_uppercase() && prev_lower && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        prev_lower = c.is_lowercase();
        current.extend(c.to_lowercase());
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// Stems describing an anchor: mnemonic words, definition words and cue words.
pub fn anchor_stems(anchor: &Anchor) -> BTreeSet<String> {
    let mut stems: BTreeSet<String> = split_mnemonic(&anchor.mnemonic)
        .iter()
        .filter(|w| !STOPWORDS.contains(&w.as_str()))
        .map(|w| stem(w))
        .collect();
    stems.extend(terms(&anchor.definition).into_iter().map(|t| t.stem));
    if let Some((_, hints)) = ANCHOR_HINTS.iter().find(|(m, _)| *m == anchor.mnemonic) {
        for hint in hints.iter() {
            stems.extend(terms(hint).into_iter().map(|t| t.stem));
        }
    }
    stems
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::AnchorCategory;

    #[test]
    fn test_stem_variants_meet() {
        assert_eq!(stem("running"), stem("run"));
        assert_eq!(stem("approved"), stem("approve"));
        assert_eq!(stem("updating"), stem("update"));
        assert_eq!(stem("requests"), stem("request"));
        assert_eq!(stem("pass"), "pass");
        assert_eq!(stem("passed"), "pass");
    }

    #[test]
    fn test_terms_drop_stopwords_and_dedupe() {
        let found: Vec<_> = terms("Running the regression suite on the suites.")
            .into_iter()
            .map(|t| t.word)
            .collect();
        assert_eq!(found, vec!["running", "regression", "suite"]);
    }

    #[test]
    fn test_split_mnemonic() {
        assert_eq!(split_mnemonic("RequestTask"), vec!["request", "task"]);
        assert_eq!(split_mnemonic("CHECK-POLICY-2FA"), vec!["check", "policy", "2fa"]);
        assert_eq!(split_mnemonic("EvalPass"), vec!["eval", "pass"]);
    }

    #[test]
    fn test_anchor_stems_include_hints() {
        let anchor = Anchor::new("RequestTask", "Request execution of a task", AnchorCategory::Request);
        let stems = anchor_stems(&anchor);
        assert!(stems.contains(&stem("running")));
        assert!(stems.contains(&stem("suite")));
        assert!(stems.contains("task"));
    }
}
