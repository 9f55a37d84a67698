use crate::expiration::parse_http_date;
use crate::{Attributes, Expiration};
use anyhow::Context;
use std::fmt;
use time::{Duration, OffsetDateTime};

/// A cookie received from a server, or added by hand to a [`CookieJar`].
///
/// A cookie is identified by its name: a [`CookieJar`] holds at most one
/// cookie per name.
///
/// ## Constructing a `Cookie`
///
/// Cookies are usually built by a [`CookieJar`] out of `Set-Cookie` headers.
/// To construct one by hand, use [`Cookie::new()`] and the `set_*` methods:
///
/// ```rust
/// use amaretti::Cookie;
///
/// let cookie = Cookie::new("color", "blue")
///     .set_domain(".example.com")
///     .set_path("/")
///     .set_attribute("Max-Age", "3600");
///
/// assert_eq!(cookie.to_string(), "color=blue");
/// assert_eq!(cookie.domain(), Some(".example.com"));
/// assert_eq!(cookie.attribute("max-age"), Some("3600"));
/// ```
///
/// A cookie with neither a domain nor a path is *unscoped*: a [`CookieJar`]
/// sends it to every URL.
///
/// [`CookieJar`]: crate::CookieJar
#[derive(Debug, Clone)]
pub struct Cookie {
    /// The cookie's name.
    pub(crate) name: String,
    /// The cookie's value.
    pub(crate) value: String,
    /// The cookie's domain, if any.
    pub(crate) domain: Option<String>,
    /// The cookie's path, if any.
    pub(crate) path: Option<String>,
    /// Every other attribute, lower-cased.
    pub(crate) attributes: Attributes,
    /// When the cookie was built.
    pub(crate) received_at: OffsetDateTime,
}

impl Cookie {
    /// Creates a new [`Cookie`] with the given name and value.
    ///
    /// # Example
    ///
    /// ```rust
    /// use amaretti::Cookie;
    ///
    /// let cookie = Cookie::new("name", "value");
    /// assert_eq!(cookie.name_value(), ("name", "value"));
    /// assert!(cookie.is_unscoped());
    /// ```
    pub fn new<N, V>(name: N, value: V) -> Self
    where
        N: Into<String>,
        V: Into<String>,
    {
        Cookie {
            name: name.into(),
            value: value.into(),
            domain: None,
            path: None,
            attributes: Attributes::new(),
            received_at: OffsetDateTime::now_utc(),
        }
    }

    /// Builds a cookie out of the attributes collected for it in a header.
    ///
    /// `domain` and `path` are lifted out of `attributes` into their own fields.
    pub(crate) fn from_parts(name: String, value: String, mut attributes: Attributes) -> Self {
        let domain = attributes.remove("domain");
        let path = attributes.remove("path");
        Cookie {
            name,
            value,
            domain,
            path,
            attributes,
            received_at: OffsetDateTime::now_utc(),
        }
    }

    /// Returns the name of `self`.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the value of `self`.
    #[inline]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Returns the name and value of `self` as a tuple of `(name, value)`.
    #[inline]
    pub fn name_value(&self) -> (&str, &str) {
        (self.name(), self.value())
    }

    /// Returns the `Domain` of `self`, if any.
    ///
    /// Every cookie parsed out of a header has a domain: when the header
    /// doesn't set one, it defaults to the host the header came from.
    #[inline]
    pub fn domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }

    /// Returns the `Path` of `self`, if any.
    ///
    /// Every cookie parsed out of a header has a path: when the header
    /// doesn't set one, it defaults to the parent of the path the header
    /// came from.
    #[inline]
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Returns `true` if `self` has neither a domain nor a path.
    ///
    /// Unscoped cookies are sent to every URL.
    pub fn is_unscoped(&self) -> bool {
        self.domain.is_none() && self.path.is_none()
    }

    /// All the attributes of `self` other than `Domain` and `Path`.
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Returns the raw value of the attribute named `name`, if any.
    ///
    /// The lookup ignores ASCII case.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name)
    }

    /// Returns the `Comment` attribute of `self`, if any.
    pub fn comment(&self) -> Option<&str> {
        self.attribute("comment")
    }

    /// The moment `self` was built: either parsed out of a header or
    /// constructed by hand.
    pub fn received_at(&self) -> OffsetDateTime {
        self.received_at
    }

    /// Returns the `Max-Age` attribute of `self`, if any.
    ///
    /// # Example
    ///
    /// ```rust
    /// use amaretti::Cookie;
    /// use amaretti::time::Duration;
    ///
    /// let cookie = Cookie::new("name", "value").set_attribute("max-age", "60");
    /// assert_eq!(cookie.max_age().unwrap(), Some(Duration::minutes(1)));
    ///
    /// let cookie = Cookie::new("name", "value").set_attribute("max-age", "soon");
    /// assert!(cookie.max_age().is_err());
    /// ```
    pub fn max_age(&self) -> Result<Option<Duration>, InvalidAttributeError> {
        self.typed_attribute("max-age", |raw| {
            let seconds: i64 = raw
                .parse()
                .context("Max-Age must be a whole number of seconds")?;
            Ok(Duration::seconds(seconds))
        })
    }

    /// Returns the expiration of `self`, according to its `Expires` attribute.
    ///
    /// A cookie without an `Expires` attribute is a session cookie.
    ///
    /// # Example
    ///
    /// ```rust
    /// use amaretti::{Cookie, Expiration};
    ///
    /// let cookie = Cookie::new("name", "value");
    /// assert_eq!(cookie.expires().unwrap(), Expiration::Session);
    ///
    /// let cookie = Cookie::new("name", "value")
    ///     .set_attribute("expires", "Wed, 21 Oct 2015 07:28:00 GMT");
    /// assert!(cookie.expires().unwrap().is_datetime());
    /// ```
    pub fn expires(&self) -> Result<Expiration, InvalidAttributeError> {
        let expires = self.typed_attribute("expires", parse_http_date)?;
        Ok(expires.into())
    }

    /// Returns the `Version` attribute of `self`, if any.
    ///
    /// `Set-Cookie2` headers may spell it `$Version`; both are recognised,
    /// `Version` first.
    pub fn version(&self) -> Result<Option<u32>, InvalidAttributeError> {
        let parse = |raw: &str| -> Result<u32, anyhow::Error> {
            raw.parse().context("Version must be a non-negative integer")
        };
        match self.typed_attribute("version", parse)? {
            Some(version) => Ok(Some(version)),
            None => self.typed_attribute("$version", parse),
        }
    }

    /// Returns `true` if `self` is expired at `now`.
    ///
    /// `Max-Age` is counted from [`Cookie::received_at()`] and takes precedence
    /// over `Expires`. Attributes that cannot be parsed never expire a cookie.
    pub fn is_expired_at(&self, now: OffsetDateTime) -> bool {
        if let Ok(Some(max_age)) = self.max_age() {
            return match self.received_at.checked_add(max_age) {
                Some(deadline) => deadline <= now,
                None => max_age.is_negative(),
            };
        }
        match self.expires() {
            Ok(Expiration::DateTime(expires)) => expires <= now,
            Ok(Expiration::Session) | Err(_) => false,
        }
    }

    /// Sets the value of `self` to `value`.
    pub fn set_value<V: Into<String>>(mut self, value: V) -> Self {
        self.value = value.into();
        self
    }

    /// Sets the `domain` of `self` to `domain`.
    ///
    /// The domain is stored as given: a leading `.` is kept.
    pub fn set_domain<D: Into<String>>(mut self, domain: D) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// Removes the `domain` from `self`.
    pub fn unset_domain(mut self) -> Self {
        self.domain = None;
        self
    }

    /// Sets the `path` of `self` to `path`.
    pub fn set_path<P: Into<String>>(mut self, path: P) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Removes the `path` from `self`.
    pub fn unset_path(mut self) -> Self {
        self.path = None;
        self
    }

    /// Sets the attribute `name` to `value`.
    ///
    /// `Domain` and `Path` are routed to [`Cookie::set_domain()`] and
    /// [`Cookie::set_path()`].
    pub fn set_attribute<N, V>(self, name: N, value: V) -> Self
    where
        N: AsRef<str>,
        V: Into<String>,
    {
        let name = name.as_ref();
        if name.eq_ignore_ascii_case("domain") {
            self.set_domain(value)
        } else if name.eq_ignore_ascii_case("path") {
            self.set_path(value)
        } else {
            let mut cookie = self;
            cookie.attributes.insert(name, value);
            cookie
        }
    }

    /// Returns `true` if `self` should be sent along with a request to
    /// `host` and `path`.
    ///
    /// The host must end with the cookie's domain and the path must start
    /// with the cookie's path. A missing domain or path matches anything.
    pub(crate) fn is_sent_to(&self, host: &str, path: &str) -> bool {
        let domain_matches = self.domain().map_or(true, |domain| host.ends_with(domain));
        let path_matches = self.path().map_or(true, |prefix| path.starts_with(prefix));
        domain_matches && path_matches
    }

    fn typed_attribute<T, F>(
        &self,
        name: &'static str,
        parse: F,
    ) -> Result<Option<T>, InvalidAttributeError>
    where
        F: FnOnce(&str) -> Result<T, anyhow::Error>,
    {
        let Some(raw) = self.attribute(name) else {
            return Ok(None);
        };
        parse(raw.trim())
            .map(Some)
            .map_err(|source| InvalidAttributeError {
                cookie: self.name.clone(),
                attribute: name,
                raw_value: raw.to_string(),
                source,
            })
    }
}

impl fmt::Display for Cookie {
    /// Formats `self` the way it is sent back in a `Cookie` header.
    ///
    /// # Example
    ///
    /// ```rust
    /// use amaretti::Cookie;
    ///
    /// let cookie = Cookie::new("foo", "bar").set_path("/");
    /// assert_eq!(cookie.to_string(), "foo=bar");
    /// ```
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)
    }
}

impl PartialEq for Cookie {
    /// Two cookies are equal when their name, value, domain, path and
    /// attributes are equal. When they were received is ignored.
    fn eq(&self, other: &Cookie) -> bool {
        self.name == other.name
            && self.value == other.value
            && self.domain == other.domain
            && self.path == other.path
            && self.attributes == other.attributes
    }
}

impl Eq for Cookie {}

#[derive(Debug, thiserror::Error)]
#[error("The `{attribute}` attribute of the `{cookie}` cookie is invalid: `{raw_value}`")]
/// An attribute of a [`Cookie`] couldn't be parsed into its typed representation.
///
/// The raw attribute text is always available via [`Cookie::attribute()`].
pub struct InvalidAttributeError {
    cookie: String,
    attribute: &'static str,
    raw_value: String,
    #[source]
    source: anyhow::Error,
}

impl InvalidAttributeError {
    /// The name of the attribute that couldn't be parsed.
    pub fn attribute(&self) -> &str {
        self.attribute
    }

    /// The raw text of the attribute.
    pub fn raw_value(&self) -> &str {
        &self.raw_value
    }
}
