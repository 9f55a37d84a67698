//! Rebuilding cookies out of the tokens of a single header value.
//!
//! Servers routinely put unescaped commas inside cookie values, e.g.
//! `list=a,b,c; path=/`, and the tokenizer can't tell those commas apart from
//! the ones separating two cookies. The assembler undoes the damage by walking
//! the tokens from last to first:
//!
//! - `name=value` tokens whose name belongs to the [`Grammar`] close off an
//!   attribute;
//! - any other `name=value` token closes off a cookie, which is handed to the sink
//!   together with the attributes collected since the previous cookie;
//! - bare reserved words (e.g. `secure`) throw away whatever was collected;
//! - any other bare token is a piece of a value that got split on a comma:
//!   it is kept, and the comma is put back.
//!
//! Whatever is left over once the first token has been processed is dropped.
use crate::{tokenize, Attributes, Cookie, Grammar};

/// Reconstructs the cookies described by `tokens`, passing each of them to `sink`.
///
/// `tokens` are expected to come from [`tokenize()`]. Cookies are emitted in
/// reverse header order, with neither domain nor path validated: see
/// [`accept()`] for that.
///
/// A pair without a name, e.g. `=value`, never becomes a cookie: it is dropped
/// together with the attributes collected for it.
///
/// [`accept()`]: crate::accept
pub fn assemble<F>(tokens: &[String], grammar: Grammar, mut sink: F)
where
    F: FnMut(Cookie),
{
    let mut pending = Pending::default();

    for (index, token) in tokens.iter().enumerate().rev() {
        let token = token.as_str();
        if token.is_empty() {
            continue;
        }

        match assignment_index(token) {
            Some(at) => {
                let name = token[..at].trim();
                pending.prepend(token[at + 1..].trim());

                let lowercased = name.to_ascii_lowercase();
                if grammar.is_attribute(&lowercased) {
                    let value = pending.take_value();
                    pending.attributes.prepend(lowercased, value);
                } else if name.is_empty() {
                    log::trace!("Dropping a value without a cookie name in a {grammar} header");
                    pending.clear();
                } else {
                    let (value, attributes) = pending.take();
                    log::trace!("Assembled the `{name}` cookie from a {grammar} header");
                    sink(Cookie::from_parts(name.to_string(), value, attributes));
                }
            }
            None if grammar.is_reserved_word(token) => {
                if !pending.is_empty() {
                    log::trace!("Dropping a dangling fragment at the `{token}` reserved word");
                }
                pending.clear();
            }
            None => {
                pending.prepend(token);
                // The comma was only a real separator if the token before it
                // ended an assignment, e.g. `name=,value`.
                let previous = index.checked_sub(1).map(|i| tokens[i].as_str());
                if previous.and_then(|p| p.chars().last()) != Some('=') {
                    pending.prepend(",");
                }
            }
        }
    }

    if !pending.is_empty() {
        log::trace!("Dropping a dangling fragment at the start of a {grammar} header");
    }
}

/// Parses a single header value into cookie candidates, in header order.
///
/// ```rust
/// use amaretti::{parse_header, Grammar};
///
/// let cookies = parse_header("list=a,b,c; path=/, color=blue", Grammar::Rfc2109);
/// assert_eq!(cookies.len(), 2);
/// assert_eq!(cookies[0].name_value(), ("list", "a,b,c"));
/// assert_eq!(cookies[0].path(), Some("/"));
/// assert_eq!(cookies[1].name_value(), ("color", "blue"));
/// ```
pub fn parse_header(header: &str, grammar: Grammar) -> Vec<Cookie> {
    let mut cookies = Vec::new();
    assemble(&tokenize(header), grammar, |cookie| cookies.push(cookie));
    cookies.reverse();
    cookies
}

/// Finds the `=` separating a name from its value in `token`.
///
/// Trailing `==` pairs are ignored: they are far more likely to be the
/// padding of a Base64 value than an assignment.
fn assignment_index(token: &str) -> Option<usize> {
    let mut candidate = token;
    while let Some(shorter) = candidate.strip_suffix("==") {
        candidate = shorter;
    }
    candidate.find('=')
}

/// The value and attributes collected since the last cookie was emitted.
///
/// Fragments arrive back to front: they are stacked and joined in reverse
/// when the value is closed off.
#[derive(Default)]
struct Pending<'a> {
    fragments: Vec<&'a str>,
    attributes: Attributes,
}

impl<'a> Pending<'a> {
    fn prepend(&mut self, fragment: &'a str) {
        self.fragments.push(fragment);
    }

    fn take_value(&mut self) -> String {
        let value = self.fragments.iter().rev().copied().collect();
        self.fragments.clear();
        value
    }

    fn take(&mut self) -> (String, Attributes) {
        let value = self.take_value();
        (value, std::mem::take(&mut self.attributes))
    }

    fn clear(&mut self) {
        self.fragments.clear();
        self.attributes = Attributes::new();
    }

    fn is_empty(&self) -> bool {
        self.fragments.is_empty() && self.attributes.is_empty()
    }
}
