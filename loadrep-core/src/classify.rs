use regex::Regex;

/// Action key of an injector sample: the action type, extended with the
/// comment when one is present.
#[must_use]
pub fn action_key(action_type: &str, comment: &str) -> String {
    if comment.is_empty() {
        action_type.to_string()
    } else {
        format!("{action_type}-{comment}")
    }
}

/// Applies the alias table: first whole-string match wins, the result
/// is never re-aliased, and an unmatched key passes through unchanged.
#[must_use]
pub fn alias(key: &str, aliases: &[(String, Regex)]) -> String {
    for (name, regex) in aliases {
        if regex.is_match(key) {
            return name.clone();
        }
    }
    key.to_string()
}

/// A sample is an error unless its success flag is set and its result
/// matches the action type's success pattern (no pattern = flag alone
/// decides).
#[must_use]
pub fn is_error(success: Option<bool>, result: &str, pattern: Option<&Regex>) -> bool {
    if success != Some(true) {
        return true;
    }
    match pattern {
        Some(regex) => !regex.is_match(result),
        None => false,
    }
}
