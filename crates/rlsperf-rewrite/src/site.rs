//! Classification of match sites for call-sites mode.

use regex::Regex;

/// Bytes of context examined on either side of a match.
const WINDOW: usize = 256;

/// Optional `schema.` qualifier, bare or double-quoted.
const QUALIFIER: &str = r#"(?:(?:"[^"]+"|[A-Za-z_][A-Za-z0-9_$]*)\s*\.\s*)?"#;

/// Decides whether a match is a call site that should be wrapped.
#[derive(Debug, Clone)]
pub(crate) struct SiteClassifier {
    /// `... FUNCTION [IF EXISTS] [schema.]` right before the match.
    declaration: Regex,
    /// `(select [schema.]` right before the match.
    wrapped_open: Regex,
    /// `)` right after the match.
    wrapped_close: Regex,
}

impl SiteClassifier {
    pub(crate) fn new() -> Self {
        // Static patterns; a failure here is a bug, not an input error.
        let declaration = Regex::new(&format!(
            r"(?i)\bFUNCTION\s+(?:IF\s+EXISTS\s+)?{QUALIFIER}$"
        ))
        .expect("declaration pattern compiles");
        let wrapped_open = Regex::new(&format!(r"(?i)\(\s*select\s+{QUALIFIER}$"))
            .expect("wrapped-open pattern compiles");
        let wrapped_close = Regex::new(r"^\s*\)").expect("wrapped-close pattern compiles");

        Self {
            declaration,
            wrapped_open,
            wrapped_close,
        }
    }

    /// True when the match at `start..end` should be left as is.
    ///
    /// `around` is the rule's own wrapped form split around the call; a
    /// match already sitting inside exactly that text is skipped.
    pub(crate) fn should_skip(
        &self,
        text: &str,
        start: usize,
        end: usize,
        around: Option<(&str, &str)>,
    ) -> bool {
        if let Some((prefix, suffix)) = around {
            if text[..start].ends_with(prefix) && text[end..].starts_with(suffix) {
                return true;
            }
        }

        let before = tail(&text[..start]);
        if self.declaration.is_match(before) {
            return true;
        }

        self.wrapped_open.is_match(before) && self.wrapped_close.is_match(head(&text[end..]))
    }
}

/// Split `wrapped` into the text before and after `call`.
pub(crate) fn split_around<'a>(wrapped: &'a str, call: &str) -> Option<(&'a str, &'a str)> {
    let at = wrapped.find(call)?;
    Some((&wrapped[..at], &wrapped[at + call.len()..]))
}

fn tail(s: &str) -> &str {
    let mut start = s.len().saturating_sub(WINDOW);
    while !s.is_char_boundary(start) {
        start += 1;
    }
    &s[start..]
}

fn head(s: &str) -> &str {
    let mut end = s.len().min(WINDOW);
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
