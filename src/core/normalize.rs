use crate::models::{ExperienceLevel, Profile, RawProfile};
use serde_json::Value;
use std::collections::BTreeSet;

/// Delimiter for multi-valued attributes stored as plain text
pub const TOKEN_DELIMITER: char = ',';

/// Convert a raw storage record into a normalized profile
///
/// Never fails: absent, null or malformed attribute fields become empty sets
/// and unrecognized experience labels become `ExperienceLevel::Unknown`.
pub fn normalize(raw: &RawProfile) -> Profile {
    let field = |name: &str, value: &Value| {
        let (tokens, degraded) = tokenize(value);
        if degraded {
            tracing::debug!("Profile {}: malformed {} field degraded to empty set", raw.id, name);
        }
        tokens
    };

    let experience_level = raw
        .experience_level
        .as_deref()
        .map(ExperienceLevel::from_label)
        .unwrap_or_default();

    Profile {
        id: raw.id.clone(),
        name: raw
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(raw.id.as_str())
            .to_string(),
        skills: field("skills", &raw.skills),
        skill_categories: field("skill_categories", &raw.skill_categories),
        interests: field("interests", &raw.interests),
        startup_industries: field("startup_industries", &raw.startup_industries),
        startup_goals: field("startup_goals", &raw.startup_goals),
        experience_level,
    }
}

/// Split a comma-separated string into a set of trimmed, non-empty tokens
#[inline]
pub fn split_tokens(text: &str) -> BTreeSet<String> {
    text.split(TOKEN_DELIMITER)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Tokenize one raw attribute value
///
/// Returns the token set and whether the value was malformed.
fn tokenize(value: &Value) -> (BTreeSet<String>, bool) {
    match value {
        Value::Null => (BTreeSet::new(), false),
        Value::String(text) => tokenize_text(text),
        Value::Array(items) => (tokens_from_list(items), false),
        // Category maps such as {"Technical": ["Python"]} contribute their keys
        Value::Object(map) => (tokens_from_keys(map.keys()), false),
        Value::Bool(_) | Value::Number(_) => (BTreeSet::new(), true),
    }
}

fn tokenize_text(text: &str) -> (BTreeSet<String>, bool) {
    let trimmed = text.trim();
    if trimmed.starts_with('[') || trimmed.starts_with('{') {
        return match serde_json::from_str::<Value>(trimmed) {
            Ok(Value::Array(items)) => (tokens_from_list(&items), false),
            Ok(Value::Object(map)) => (tokens_from_keys(map.keys()), false),
            _ => (BTreeSet::new(), true),
        };
    }
    (split_tokens(trimmed), false)
}

fn tokens_from_list(items: &[Value]) -> BTreeSet<String> {
    items
        .iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .filter(|t| !t.is_empty())
        .collect()
}

fn tokens_from_keys<'a>(keys: impl Iterator<Item = &'a String>) -> BTreeSet<String> {
    keys.map(|k| k.trim())
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect()
}
