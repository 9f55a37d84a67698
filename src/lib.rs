//! A lenient client-side cookie jar.
//!
//! # Overview
//!
//! You can use `amaretti` to keep track of the cookies a server sets and to send
//! them back on later requests.
//!
//! It has support for:
//!
//! - Parsing `Set-Cookie` (RFC 2109) and `Set-Cookie2` (RFC 2965) headers, via [`CookieJar`]
//! - Validating the `Domain` and `Path` of each cookie against the URL it came from, via [`accept()`]
//! - Building the `Cookie` header for an outgoing request, via [`CookieJar::cookie_header_value()`]
//!
//! In particular:
//!
//! - It repairs values that contain unescaped commas (e.g. `list=a,b,c`)
//! - It keeps a single cookie per name: the most recent one wins
//! - It never fails on a malformed header: whatever can't be made sense of is dropped
//!
//! # Non-goals
//!
//! `amaretti` is not a browser-grade cookie store.
//! It doesn't persist cookies, it doesn't filter on `Secure` or `HttpOnly`, and it
//! doesn't consult the public suffix list.
//! Cookies only expire if you opt in via [`Config::enforce_expiry`].
//!
//! # Quickstart
//!
//! ```rust
//! use amaretti::{CookieJar, ResponseHeaders};
//! use http::header::{HeaderMap, HeaderValue, SET_COOKIE};
//! use url::Url;
//!
//! // Collect the headers of the response you received...
//! let mut headers = HeaderMap::new();
//! headers.append(SET_COOKIE, HeaderValue::from_static("list=a,b,c; path=/; domain=.example.com"));
//! headers.append(SET_COOKIE, HeaderValue::from_static("theme=dark"));
//! let url = Url::parse("http://www.example.com/shop/cart").unwrap();
//! let response = ResponseHeaders::new(url, headers);
//!
//! // ...and pour the cookies they set into a jar.
//! let mut jar = CookieJar::new();
//! jar.extend_from_source(&response);
//! assert_eq!(jar.cookie_value("list"), Some("a,b,c"));
//!
//! // `theme` has no explicit scope: it is only sent back to `www.example.com`,
//! // below `/shop`.
//! let target = Url::parse("http://www.example.com/shop/checkout").unwrap();
//! assert_eq!(jar.cookie_header_value(&target).as_deref(), Some("list=a,b,c; theme=dark"));
//!
//! let target = Url::parse("http://img.example.com/logo.png").unwrap();
//! assert_eq!(jar.cookie_header_value(&target).as_deref(), Some("list=a,b,c"));
//! ```
//!
//! [`Config::enforce_expiry`]: crate::config::Config::enforce_expiry

mod acceptor;
mod assembler;
mod attributes;
mod cookie;
mod cookie_jar;
mod expiration;
mod grammar;
mod source;
mod tokenizer;

pub mod config;
pub mod jar;

pub use acceptor::{accept, parent_path, Rejection, RejectionReason};
pub use assembler::{assemble, parse_header};
pub use attributes::{Attributes, AttributesIter};
pub use config::Config;
pub use cookie::Cookie;
pub use cookie_jar::CookieJar;
pub use expiration::Expiration;
pub use grammar::Grammar;
pub use source::{CookieSource, ResponseHeaders};
pub use tokenizer::tokenize;
pub use time;

/// Errors that can occur when using `amaretti`.
pub mod errors {
    pub use crate::acceptor::{Rejection, RejectionReason};
    pub use crate::cookie::InvalidAttributeError;
    pub use crate::cookie_jar::EmptyNameError;
}
