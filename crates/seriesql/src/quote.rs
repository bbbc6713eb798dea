//! Quoting helpers shared by diagnostics and AST rendering.

/// Wraps a string in single quotes, escaping backslashes, newlines, and
/// embedded quotes.
///
/// # Examples
///
/// ```
/// use seriesql::quote_string;
///
/// assert_eq!(quote_string("foo"), "'foo'");
/// assert_eq!(quote_string("it's"), r"'it\'s'");
/// ```
#[must_use]
pub fn quote_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out.push('\'');
    out
}

/// Joins identifier segments with dots, wrapping each in double quotes.
///
/// Segments containing a double quote are not escaped.
///
/// # Examples
///
/// ```
/// use seriesql::quote_ident;
///
/// assert_eq!(quote_ident(&["foo", "bar"]), r#""foo"."bar""#);
/// ```
#[must_use]
pub fn quote_ident(segments: &[&str]) -> String {
    let quoted: Vec<String> = segments.iter().map(|s| format!("\"{s}\"")).collect();
    quoted.join(".")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_string() {
        let cases = [
            ("", "''"),
            ("foo", "'foo'"),
            ("foo\nbar", r"'foo\nbar'"),
            (r"foo bar\\", r"'foo bar\\\\'"),
            ("'foo'", r"'\'foo\''"),
        ];
        for (input, expected) in cases {
            assert_eq!(quote_string(input), expected, "{input:?}");
        }
    }

    #[test]
    fn test_quote_ident() {
        assert_eq!(quote_ident(&[""]), r#""""#);
        assert_eq!(quote_ident(&["foo", "bar"]), r#""foo"."bar""#);
        assert_eq!(quote_ident(&["foo bar", "baz"]), r#""foo bar"."baz""#);
        assert_eq!(quote_ident(&["foo.bar", "baz"]), r#""foo.bar"."baz""#);
    }
}
