//! Configuration for a [`CookieJar`].
//!
//! Check out the [`Config`] struct for more information.
//!
//! [`CookieJar`]: crate::CookieJar

/// `Config` specifies the policies a [`CookieJar`] applies on top of the
/// domain and path rules every cookie goes through.
///
/// ```rust
/// use amaretti::CookieJar;
/// use amaretti::config::Config;
///
/// let mut config = Config::default();
/// config.enforce_expiry = true;
/// let jar = CookieJar::with_config(config);
/// assert!(jar.config().enforce_expiry);
/// ```
///
/// [`CookieJar`]: crate::CookieJar
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[non_exhaustive]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    /// If `true`, expired cookies are left out of the `Cookie` header built
    /// by [`CookieJar::cookie_header_value()`].
    ///
    /// A cookie is expired once its `Max-Age` has elapsed since it was received,
    /// or, without a `Max-Age`, once its `Expires` date has passed.
    /// Expired cookies are never removed from the jar: they are only skipped.
    ///
    /// By default, this field is `false` and cookies never expire.
    ///
    /// [`CookieJar::cookie_header_value()`]: crate::CookieJar::cookie_header_value
    pub enforce_expiry: bool,
}
