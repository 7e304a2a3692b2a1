//! Deterministic keyword selection.

use crate::core::Result;
use crate::quantizer::keywords::{anchor_stems, terms, Term};
use crate::quantizer::strategy::{Selection, SelectionStrategy};
use crate::registry::Anchor;
use crate::wire::{normalize_token, WireParams};
use async_trait::async_trait;

/// Offline selector scoring anchors by shared keyword stems.
///
/// Confidence is `hits / (hits + 1)`; ties go to the earlier anchor in
/// registry order, so the same input always yields the same selection.
#[derive(Clone, Debug, Default)]
pub struct KeywordSelector;

impl KeywordSelector {
    pub fn new() -> Self {
        Self
    }

    /// Score every anchor and return the best match, if any shares a keyword.
    pub fn best_match(&self, message: &str, anchors: &[Anchor]) -> Option<Selection> {
        let message_terms = terms(message);
        let mut best: Option<(usize, &Anchor, Vec<&Term>)> = None;

        for anchor in anchors {
            let stems = anchor_stems(anchor);
            let hits = message_terms
                .iter()
                .filter(|t| stems.contains(&t.stem))
                .count();
            if hits == 0 || best.as_ref().is_some_and(|(h, _, _)| hits <= *h) {
                continue;
            }
            let unmatched = message_terms
                .iter()
                .filter(|t| !stems.contains(&t.stem))
                .filter(|t| !t.word.chars().all(|c| c.is_ascii_digit()))
                .collect();
            best = Some((hits, anchor, unmatched));
        }

        let (hits, anchor, unmatched) = best?;
        let confidence = hits as f64 / (hits as f64 + 1.0);
        Some(
            Selection::new(&anchor.mnemonic, extract_params(message, &unmatched), confidence)
                .with_reasoning(&format!("{hits} keyword(s) shared with {}", anchor.mnemonic)),
        )
    }
}

/// Parameters in fixed key order: subject, target, ref, pct.
fn extract_params(message: &str, unmatched: &[&Term]) -> WireParams {
    let mut params = WireParams::new();
    if let Some(first) = unmatched.first() {
        params.insert("subject", &normalize_token(&first.word));
    }
    if unmatched.len() > 1 {
        if let Some(last) = unmatched.last() {
            params.insert("target", &normalize_token(&last.word));
        }
    }

    let tokens = message
        .split_whitespace()
        .map(|t| t.trim_end_matches(|c: char| c.is_ascii_punctuation() && c != '%'));
    for token in tokens {
        if let Some(number) = token.strip_prefix('#') {
            if !params.contains_key("ref") && is_number(number) {
                params.insert("ref", number);
            }
        } else if let Some(number) = token.strip_suffix('%') {
            if !params.contains_key("pct") && is_number(number) {
                params.insert("pct", number);
            }
        }
    }
    params
}

fn is_number(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| c.is_ascii_digit() || c == '.')
}

#[async_trait]
impl SelectionStrategy for KeywordSelector {
    async fn select(
        &self,
        message: &str,
        _src: &str,
        _dst: &str,
        anchors: &[Anchor],
    ) -> Result<Option<Selection>> {
        Ok(self.best_match(message, anchors))
    }

    fn name(&self) -> &'static str {
        "keyword"
    }
}
