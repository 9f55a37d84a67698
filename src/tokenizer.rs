/// Splits a raw `Set-Cookie`/`Set-Cookie2` header value into tokens.
///
/// Tokens are separated by any `;` or `,` that is not enclosed in quotes.
/// Both `"` and `'` open a quoted run which lasts until the same character
/// shows up again; the quote characters themselves are dropped. An unterminated
/// quote swallows the rest of the input.
///
/// Every token is trimmed. Adjacent separators produce empty tokens, which are
/// kept: `n` separators always yield `n + 1` tokens.
///
/// ```rust
/// use amaretti::tokenize;
///
/// assert_eq!(
///     tokenize(r#"a="x;y", b=2;; path=/"#),
///     vec!["a=x;y", "b=2", "", "path=/"]
/// );
/// ```
pub fn tokenize(header: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::with_capacity(header.len());
    let mut quote: Option<char> = None;

    for c in header.chars() {
        match quote {
            Some(open) if c == open => quote = None,
            Some(_) => current.push(c),
            None => match c {
                '"' | '\'' => quote = Some(c),
                ';' | ',' => {
                    tokens.push(current.trim().to_string());
                    current.clear();
                }
                _ => current.push(c),
            },
        }
    }
    tokens.push(current.trim().to_string());

    tokens
}

#[cfg(test)]
mod tests {
    use super::tokenize;

    #[test]
    fn splits_on_both_separators() {
        let cases: [(&str, &[&str]); 7] = [
            ("", &[""]),
            ("name=value", &["name=value"]),
            ("  name=value  ", &["name=value"]),
            ("a=1; b=2", &["a=1", "b=2"]),
            ("a=1, b=2", &["a=1", "b=2"]),
            ("list=a,b,c; path=/", &["list=a", "b", "c", "path=/"]),
            ("secure, color=blue", &["secure", "color=blue"]),
        ];

        for (header, expected) in cases {
            assert_eq!(tokenize(header), expected, "Failed for header: {header}");
        }
    }

    #[test]
    fn keeps_empty_tokens() {
        assert_eq!(tokenize(";;"), vec!["", "", ""]);
        assert_eq!(tokenize("a=1;  ;b=2"), vec!["a=1", "", "b=2"]);
        assert_eq!(tokenize("a=1;"), vec!["a=1", ""]);
    }

    #[test]
    fn quotes_suppress_separators_and_are_stripped() {
        assert_eq!(tokenize(r#"a="1;2,3"; b=4"#), vec!["a=1;2,3", "b=4"]);
        assert_eq!(tokenize("a='1;2'; b=4"), vec!["a=1;2", "b=4"]);
        // The other quote character is literal inside a quoted run.
        assert_eq!(tokenize(r#"a="it's; fine""#), vec!["a=it's; fine"]);
        assert_eq!(tokenize(r#"a='say "hi"; ok'"#), vec![r#"a=say "hi"; ok"#]);
    }

    #[test]
    fn unterminated_quote_runs_to_the_end() {
        assert_eq!(tokenize(r#"a="1;2, b=3"#), vec!["a=1;2, b=3"]);
        assert_eq!(tokenize("a=1; b='x"), vec!["a=1", "b=x"]);
    }
}
