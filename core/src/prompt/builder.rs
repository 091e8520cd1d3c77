use std::collections::HashSet;

use lazy_static::lazy_static;
use regex::{Captures, Regex};

use super::resolver::ResolvedVars;

lazy_static! {
    static ref PLACEHOLDER_REGEX: Regex =
        Regex::new(r"\{([A-Za-z0-9_.\-]+)\}").expect("PLACEHOLDER_REGEX is valid");
}

/// Substitute `{NAME}` tokens in one left-to-right pass.
///
/// Unbound tokens are left as written. Substituted text is never scanned
/// again, so a value containing `{OTHER}` stays literal.
pub fn build_prompt(template: &str, vars: &ResolvedVars) -> String {
    PLACEHOLDER_REGEX
        .replace_all(template, |caps: &Captures<'_>| match vars.get(&caps[1]) {
            Some(value) => value.clone(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// Distinct placeholder names in `template`, in first-seen order.
pub fn placeholders(template: &str) -> Vec<&str> {
    let mut seen = HashSet::new();
    PLACEHOLDER_REGEX
        .captures_iter(template)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .filter(|name| seen.insert(*name))
        .collect()
}

/// Placeholders in `template` that `vars` leaves unbound.
pub fn unresolved_placeholders(template: &str, vars: &ResolvedVars) -> Vec<String> {
    placeholders(template)
        .into_iter()
        .filter(|name| !vars.contains_key(*name))
        .map(str::to_string)
        .collect()
}
