//! Tuple-literal rendering used for node codes and method display
//!
//! Node codes embed the category path in the same textual form the biosphere
//! databases already use, e.g. `Carbon dioxide-('air',)`. Rendering must be
//! byte-stable: the same input always yields the same string.

use std::fmt::Write;

/// Render a single string as a quoted literal
///
/// Single quotes are preferred; double quotes are used when the value
/// contains a single quote and no double quote.
#[must_use]
pub fn quote(value: &str) -> String {
    let delimiter = if value.contains('\'') && !value.contains('"') {
        '"'
    } else {
        '\''
    };

    let mut out = String::with_capacity(value.len() + 2);
    out.push(delimiter);
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == delimiter => {
                out.push('\\');
                out.push(c);
            }
            c if (c as u32) < 0x20 || c as u32 == 0x7f => {
                let _ = write!(out, "\\x{:02x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push(delimiter);
    out
}

/// Render a sequence of strings as a tuple literal
///
/// A one-element tuple keeps its trailing comma: `('air',)`.
#[must_use]
pub fn tuple<S: AsRef<str>>(items: &[S]) -> String {
    let inner: Vec<String> = items.iter().map(|s| quote(s.as_ref())).collect();
    match inner.len() {
        1 => format!("({},)", inner[0]),
        _ => format!("({})", inner.join(", ")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quote_plain() {
        assert_eq!(quote("air"), "'air'");
    }

    #[test]
    fn quote_switches_delimiter_for_apostrophe() {
        assert_eq!(quote("farmer's field"), "\"farmer's field\"");
    }

    #[test]
    fn quote_escapes_when_both_quotes_present() {
        assert_eq!(quote(r#"it's "x""#), r#"'it\'s "x"'"#);
    }

    #[test]
    fn quote_escapes_control_characters() {
        assert_eq!(quote("a\tb\\c"), "'a\\tb\\\\c'");
        assert_eq!(quote("\u{1}"), "'\\x01'");
    }

    #[test]
    fn tuple_single_keeps_trailing_comma() {
        assert_eq!(tuple(&["air"]), "('air',)");
    }

    #[test]
    fn tuple_pair() {
        assert_eq!(
            tuple(&["air", "urban air close to ground"]),
            "('air', 'urban air close to ground')"
        );
    }

    #[test]
    fn tuple_empty() {
        let empty: [&str; 0] = [];
        assert_eq!(tuple(&empty), "()");
    }
}
