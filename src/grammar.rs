//! The two historical cookie grammars understood by the parser.

use std::fmt;

const RFC2109_ATTRIBUTES: &[&str] = &["path", "domain", "expires", "comment", "max-age", "version"];
const RFC2965_ATTRIBUTES: &[&str] = &[
    "path",
    "domain",
    "comment",
    "commenturl",
    "max-age",
    "version",
    "$version",
    "port",
];

const RFC2109_RESERVED_WORDS: &[&str] = &["secure"];
const RFC2965_RESERVED_WORDS: &[&str] = &["secure", "discard"];

/// The grammar a `Set-Cookie`-like header is interpreted with.
///
/// A grammar decides two things while a header is being reassembled:
///
/// - which `name=value` pairs are cookie attributes rather than new cookies
///   (see [`Grammar::is_attribute()`]);
/// - which bare words act as barriers that discard any half-built value
///   (see [`Grammar::is_reserved_word()`]).
///
/// `Set-Cookie` headers are read with [`Grammar::Rfc2109`], `Set-Cookie2`
/// headers with [`Grammar::Rfc2965`].
///
/// ```rust
/// use amaretti::Grammar;
///
/// assert!(Grammar::Rfc2109.is_attribute("expires"));
/// assert!(!Grammar::Rfc2965.is_attribute("expires"));
/// assert!(Grammar::Rfc2965.is_reserved_word("Discard"));
/// assert_eq!(Grammar::Rfc2965.header_name(), "Set-Cookie2");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum Grammar {
    /// RFC 2109, used for `Set-Cookie`.
    #[cfg_attr(feature = "serde", serde(alias = "rfc2109"))]
    Rfc2109,
    /// RFC 2965, used for `Set-Cookie2`.
    #[cfg_attr(feature = "serde", serde(alias = "rfc2965"))]
    Rfc2965,
}

impl Grammar {
    /// Every grammar, in the order a [`CookieJar`] applies them to a source.
    ///
    /// [`CookieJar`]: crate::CookieJar
    pub const ALL: [Grammar; 2] = [Grammar::Rfc2109, Grammar::Rfc2965];

    /// Returns `true` if `name` is an attribute name in this grammar.
    ///
    /// `name` is expected to be lower-cased already.
    #[inline]
    pub fn is_attribute(&self, name: &str) -> bool {
        self.attributes().contains(&name)
    }

    /// Returns `true` if `token` is a reserved word in this grammar.
    ///
    /// The comparison ignores ASCII case.
    #[inline]
    pub fn is_reserved_word(&self, token: &str) -> bool {
        self.reserved_words()
            .iter()
            .any(|word| word.eq_ignore_ascii_case(token))
    }

    /// The response header whose values are read with this grammar.
    pub fn header_name(&self) -> &'static str {
        match *self {
            Grammar::Rfc2109 => "Set-Cookie",
            Grammar::Rfc2965 => "Set-Cookie2",
        }
    }

    fn attributes(&self) -> &'static [&'static str] {
        match *self {
            Grammar::Rfc2109 => RFC2109_ATTRIBUTES,
            Grammar::Rfc2965 => RFC2965_ATTRIBUTES,
        }
    }

    fn reserved_words(&self) -> &'static [&'static str] {
        match *self {
            Grammar::Rfc2109 => RFC2109_RESERVED_WORDS,
            Grammar::Rfc2965 => RFC2965_RESERVED_WORDS,
        }
    }
}

impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Grammar::Rfc2109 => f.write_str("RFC 2109"),
            Grammar::Rfc2965 => f.write_str("RFC 2965"),
        }
    }
}
