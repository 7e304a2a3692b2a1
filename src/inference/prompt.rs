//! Prompt construction and response parsing for the inference service.

use crate::core::{Error, Result};
use crate::registry::Anchor;
use crate::wire::{normalize_token, WireParams};
use serde::Deserialize;
use serde_json::Value;

/// Parsed answer to a selection prompt.
#[derive(Clone, Debug, Deserialize)]
pub struct SelectionResponse {
    pub anchor: String,
    #[serde(default)]
    pub reasoning: String,
    #[serde(default)]
    pub params: serde_json::Map<String, Value>,
    #[serde(default)]
    pub confidence: Option<f64>,
}

/// Parsed answer to a suggestion prompt.
#[derive(Clone, Debug, Deserialize)]
pub struct SuggestionResponse {
    pub mnemonic: String,
    pub definition: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub example_messages: Vec<String>,
}

fn anchor_list(anchors: &[Anchor]) -> String {
    anchors
        .iter()
        .map(|a| format!("  - {}: {}", a.mnemonic, a.definition))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Prompt asking the model to pick one anchor and extract parameters.
pub fn selection_prompt(message: &str, src: &str, dst: &str, anchors: &[Anchor]) -> String {
    format!(
        r#"You are a semantic compression engine for multi-agent communication. Compress the message below onto exactly one semantic anchor.

## Available Semantic Anchors:
{anchors}

## Input Message:
- From: {src}
- To: {dst}
- Message: "{message}"

## Instructions:
1. Identify the intent and the key information in the message.
2. Select the single most appropriate anchor from the list.
3. Extract only the parameters needed to reconstruct the meaning, as short keys with scalar values.
4. Rate your confidence in the anchor choice between 0.0 and 1.0.

## Output Format (respond with ONLY this JSON, no markdown):
{{
  "anchor": "<selected_mnemonic>",
  "reasoning": "<one sentence explaining the choice>",
  "params": {{"<key>": "<value>"}},
  "confidence": <0.0-1.0>
}}

## Example:
Input: "Running regression suite on Authentication module"
Output:
{{
  "anchor": "RequestTask",
  "reasoning": "The message asks for a test suite to be executed, which is a task request",
  "params": {{"task": "regression_test", "target": "auth"}},
  "confidence": 0.9
}}"#,
        anchors = anchor_list(anchors),
    )
}

/// Prompt asking the model to design a new anchor for an unmatched message.
pub fn suggestion_prompt(message: &str, anchors: &[Anchor]) -> String {
    format!(
        r#"You are designing semantic anchors for a multi-agent communication protocol.

## Existing Anchors:
{anchors}

## Message that does not fit any existing anchor:
"{message}"

## Task:
Propose ONE new anchor capturing this message's intent. It must be general enough to cover similar messages, specific enough to be meaningful, and named in CamelCase verb-noun style.

## Output Format (respond with ONLY this JSON, no markdown):
{{
  "mnemonic": "<NewAnchorName>",
  "definition": "<clear one-sentence definition>",
  "category": "<observe|inform|ask|request|propose|commit|eval|action|meta>",
  "example_messages": ["<example 1>", "<example 2>"]
}}"#,
        anchors = anchor_list(anchors),
    )
}

/// Strip a surrounding markdown code fence, if any.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = rest.strip_prefix("json").unwrap_or(rest);
    let body = body.strip_suffix("```").unwrap_or(body);
    body.trim()
}

/// Parse a selection response from raw model text.
pub fn parse_selection(text: &str) -> Result<SelectionResponse> {
    let response: SelectionResponse = serde_json::from_str(strip_code_fence(text))
        .map_err(|e| Error::SelectionUnavailable(format!("invalid JSON from model: {e}")))?;
    if response.anchor.trim().is_empty() {
        return Err(Error::SelectionUnavailable("model returned no anchor".to_string()));
    }
    Ok(response)
}

/// Parse a suggestion response from raw model text.
pub fn parse_suggestion(text: &str) -> Result<SuggestionResponse> {
    let response: SuggestionResponse = serde_json::from_str(strip_code_fence(text))
        .map_err(|e| Error::SuggestionUnavailable(format!("invalid JSON from model: {e}")))?;
    if response.mnemonic.trim().is_empty() {
        return Err(Error::SuggestionUnavailable("model returned no mnemonic".to_string()));
    }
    Ok(response)
}

/// Convert model-provided parameters into wire-safe scalar text.
///
/// Keys come out in the map's sorted order so the same parameter set always
/// encodes identically. Nulls, arrays and objects are dropped.
pub fn to_wire_params(params: &serde_json::Map<String, Value>) -> WireParams {
    let mut out = WireParams::new();
    for (key, value) in params {
        let text = match value {
            Value::String(s) => normalize_token(s),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Null | Value::Array(_) | Value::Object(_) => continue,
        };
        let key = normalize_token(key);
        if !key.is_empty() {
            out.insert(&key, &text);
        }
    }
    out
}
