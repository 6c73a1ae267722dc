//! Small-template formatting for widget markup
//!
//! Resolves `{{ key.path }}` and `{{ key.path|filter }}` placeholders
//! against a JSON data mapping. Absent or null data degrades to a fallback
//! string; rendering never fails.
//!
//! Filters are zero-argument string transformations resolved by name from a
//! fixed registry. `length` is the one accessor: it yields the character
//! count instead of transforming the text. An unknown filter name logs a
//! diagnostic and leaves the value unfiltered.

use std::sync::OnceLock;

use regex::{Captures, Regex};
use serde_json::Value;
use tracing::warn;

static PLACEHOLDER_RE: OnceLock<Regex> = OnceLock::new();

fn placeholder_re() -> &'static Regex {
    PLACEHOLDER_RE.get_or_init(|| {
        Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*(?:\.[A-Za-z0-9_]+)*)(?:\s*\|\s*([A-Za-z_][A-Za-z0-9_]*))?\s*\}\}")
            .expect("placeholder pattern")
    })
}

/// Format a template against a data mapping, using `""` as the fallback
pub fn format(template: &str, data: &Value) -> String {
    format_with_fallback(template, data, "")
}

/// Format a template against a data mapping.
///
/// Each placeholder resolves its dotted path segment by segment; a missing,
/// null, or non-object segment short-circuits to `fallback`.
pub fn format_with_fallback(template: &str, data: &Value, fallback: &str) -> String {
    placeholder_re()
        .replace_all(template, |caps: &Captures| {
            let Some(value) = resolve(data, &caps[1]) else {
                return fallback.to_string();
            };
            let text = value_text(value);
            match caps.get(2) {
                None => text,
                Some(filter) => apply_filter(filter.as_str(), text),
            }
        })
        .into_owned()
}

fn resolve<'a>(data: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = data;
    for segment in path.split('.') {
        match current {
            Value::Object(map) => current = map.get(segment)?,
            _ => return None,
        }
    }
    if current.is_null() {
        None
    } else {
        Some(current)
    }
}

fn apply_filter(name: &str, text: String) -> String {
    match name {
        "upper" => text.to_uppercase(),
        "lower" => text.to_lowercase(),
        "trim" => text.trim().to_string(),
        "capitalize" => {
            let mut chars = text.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => text,
            }
        }
        // Accessor rather than a transformation
        "length" => text.chars().count().to_string(),
        _ => {
            warn!(filter = name, "unknown template filter, leaving value unfiltered");
            text
        }
    }
}

/// Textual form of a JSON value: strings verbatim, null empty, everything
/// else via its JSON rendering.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Convert newlines to `<br/>` markup
pub fn nl2br(text: &str) -> String {
    text.replace("\r\n", "<br/>").replace('\n', "<br/>")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resolves_dotted_paths() {
        let data = json!({"user": {"name": "Ana"}});
        assert_eq!(format("{{ user.name }}", &data), "Ana");
        assert_eq!(format("Hi {{ user.name }}!", &data), "Hi Ana!");
    }

    #[test]
    fn test_missing_data_falls_back_to_empty() {
        assert_eq!(format("{{ user.name }}", &json!({})), "");
        assert_eq!(format("{{ user.name }}", &json!({"user": null})), "");
        assert_eq!(format("{{ user.name }}", &json!({"user": "flat"})), "");
        assert_eq!(format("{{ user.name }}", &json!({"user": {"name": null}})), "");
    }

    #[test]
    fn test_custom_fallback() {
        let rendered = format_with_fallback("{{ missing }}", &json!({}), "n/a");
        assert_eq!(rendered, "n/a");
    }

    #[test]
    fn test_non_string_values_render_textually() {
        let data = json!({"count": 3, "flag": true});
        assert_eq!(format("{{ count }}/{{ flag }}", &data), "3/true");
    }

    #[test]
    fn test_filters() {
        let data = json!({"name": "ana"});
        assert_eq!(format("{{ name|upper }}", &data), "ANA");
        assert_eq!(format("{{ name|capitalize }}", &data), "Ana");
        assert_eq!(format("{{ name | upper }}", &data), "ANA");
    }

    #[test]
    fn test_length_is_an_accessor() {
        let data = json!({"name": "ana"});
        assert_eq!(format("{{ name|length }}", &data), "3");
    }

    #[test]
    fn test_unknown_filter_leaves_value_unfiltered() {
        let data = json!({"name": "ana"});
        assert_eq!(format("{{ name|sparkle }}", &data), "ana");
    }

    #[test]
    fn test_surrounding_text_is_preserved() {
        let data = json!({"a": "x", "b": "y"});
        assert_eq!(format("<i>{{ a }}</i>{{ b }}", &data), "<i>x</i>y");
    }

    #[test]
    fn test_nl2br() {
        assert_eq!(nl2br("a\nb"), "a<br/>b");
        assert_eq!(nl2br("a\r\nb\nc"), "a<br/>b<br/>c");
    }

    #[test]
    fn test_value_text() {
        assert_eq!(value_text(&json!(null)), "");
        assert_eq!(value_text(&json!("s")), "s");
        assert_eq!(value_text(&json!(2)), "2");
    }
}
