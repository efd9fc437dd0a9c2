//! Internal helpers for input normalization.
//!
//! These utilities are **not** part of the public API. They centralize the
//! text rules so create, update and lookup agree on what a name is.

use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

use crate::{EngineError, ResultEngine};

/// Trim a category name and collapse inner whitespace.
pub(crate) fn normalize_category_display(input: &str) -> ResultEngine<String> {
    let mut out = String::new();
    for token in input.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(token);
    }
    if out.is_empty() {
        return Err(EngineError::Validation(
            "category name must not be empty".to_string(),
        ));
    }
    Ok(out)
}

/// Comparison key for category names: accents stripped, lowercase,
/// punctuation folded into single spaces.
///
/// Two names with the same key collide on the uniqueness index.
pub(crate) fn normalize_category_key(display: &str) -> ResultEngine<String> {
    let mut out = String::new();
    let mut prev_space = false;
    for ch in display.trim().nfkd() {
        if is_combining_mark(ch) {
            continue;
        }
        if ch.is_alphanumeric() {
            for lower in ch.to_lowercase() {
                out.push(lower);
            }
            prev_space = false;
        } else if !out.is_empty() && !prev_space {
            out.push(' ');
            prev_space = true;
        }
    }
    let normalized = out.trim();
    if normalized.is_empty() {
        return Err(EngineError::Validation(
            "category name must contain letters or digits".to_string(),
        ));
    }
    Ok(normalized.to_string())
}

/// Empty or blank text becomes `None`.
pub(crate) fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_collapses_whitespace() {
        assert_eq!(
            normalize_category_display("  Eating   out ").unwrap(),
            "Eating out"
        );
        assert!(normalize_category_display("   ").is_err());
    }

    #[test]
    fn key_ignores_case_accents_and_punctuation() {
        assert_eq!(normalize_category_key("Café").unwrap(), "cafe");
        assert_eq!(normalize_category_key("CAFE").unwrap(), "cafe");
        assert_eq!(
            normalize_category_key("Eating-out!").unwrap(),
            normalize_category_key("eating out").unwrap()
        );
    }

    #[test]
    fn key_rejects_symbol_only_names() {
        assert!(normalize_category_key("!!!").is_err());
    }

    #[test]
    fn optional_text_drops_blank() {
        assert_eq!(normalize_optional_text(Some("  ")), None);
        assert_eq!(
            normalize_optional_text(Some(" rent ")),
            Some("rent".to_string())
        );
        assert_eq!(normalize_optional_text(None), None);
    }
}
