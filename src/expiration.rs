use anyhow::Context;
use time::format_description::FormatItem;
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime};

/// A cookie's expiration: either a date-time or session.
///
/// An `Expiration` is constructible with `Expiration::from()` via any of:
///
///   * `None` -> `Expiration::Session`
///   * `Some(OffsetDateTime)` -> `Expiration::DateTime`
///   * `OffsetDateTime` -> `Expiration::DateTime`
///
/// ```rust
/// use amaretti::{Expiration, time::OffsetDateTime};
///
/// let expires = Expiration::from(None);
/// assert_eq!(expires, Expiration::Session);
///
/// let now = OffsetDateTime::now_utc();
/// let expires = Expiration::from(now);
/// assert_eq!(expires, Expiration::DateTime(now));
///
/// let expires = Expiration::from(Some(now));
/// assert_eq!(expires, Expiration::DateTime(now));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Expiration {
    /// Expiration for a "permanent" cookie at a specific date-time.
    DateTime(OffsetDateTime),
    /// Expiration for a "session" cookie. The jar never drops session cookies
    /// on its own: it is up to its owner to decide when a session is over.
    Session,
}

impl Expiration {
    /// Returns `true` if `self` is an `Expiration::DateTime`.
    pub fn is_datetime(&self) -> bool {
        match self {
            Expiration::DateTime(_) => true,
            Expiration::Session => false,
        }
    }

    /// Returns `true` if `self` is an `Expiration::Session`.
    ///
    /// ```rust
    /// use amaretti::Cookie;
    ///
    /// let cookie = Cookie::new("name", "value");
    /// assert!(cookie.expires().unwrap().is_session());
    /// ```
    pub fn is_session(&self) -> bool {
        match self {
            Expiration::DateTime(_) => false,
            Expiration::Session => true,
        }
    }

    /// Returns the inner [`OffsetDateTime`] if `self` is a `DateTime`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use amaretti::{Expiration, time::OffsetDateTime};
    ///
    /// let expires = Expiration::from(None);
    /// assert!(expires.datetime().is_none());
    ///
    /// let now = OffsetDateTime::now_utc();
    /// let expires = Expiration::from(now);
    /// assert_eq!(expires.datetime(), Some(now));
    /// ```
    pub fn datetime(self) -> Option<OffsetDateTime> {
        match self {
            Expiration::Session => None,
            Expiration::DateTime(v) => Some(v),
        }
    }
}

impl<T: Into<Option<OffsetDateTime>>> From<T> for Expiration {
    fn from(option: T) -> Self {
        match option.into() {
            Some(value) => Expiration::DateTime(value),
            None => Expiration::Session,
        }
    }
}

// From http://tools.ietf.org/html/rfc2616#section-3.3.1, without the weekday.
static RFC1123: &[FormatItem<'_>] = format_description!(
    "[day padding:none] [month repr:short case_sensitive:false] [year] [hour]:[minute]:[second] GMT"
);
// The original Netscape cookie draft.
static NETSCAPE: &[FormatItem<'_>] = format_description!(
    "[day padding:none]-[month repr:short case_sensitive:false]-[year] [hour]:[minute]:[second] GMT"
);

/// Parses the value of an `expires` attribute.
///
/// The leading weekday is ignored, together with the comma that follows it.
/// The tokenizer splits dates on that comma and the comma repair glues them
/// back together without the original space, so `Wed,21 Oct 2015 07:28:00 GMT`
/// is accepted as well.
pub(crate) fn parse_http_date(raw: &str) -> Result<OffsetDateTime, anyhow::Error> {
    let date = match raw.split_once(',') {
        Some((_weekday, rest)) => rest.trim(),
        None => raw.trim(),
    };

    let parsed = PrimitiveDateTime::parse(date, RFC1123)
        .or_else(|_| PrimitiveDateTime::parse(date, NETSCAPE))
        .with_context(|| format!("`{raw}` is not a valid HTTP date"))?;
    Ok(parsed.assume_utc())
}

#[cfg(test)]
mod tests {
    use super::parse_http_date;
    use time::macros::datetime;

    #[test]
    fn parses_http_dates() {
        let expected = datetime!(2015-10-21 07:28:00 UTC);
        let cases = [
            "Wed, 21 Oct 2015 07:28:00 GMT",
            "Wed,21 Oct 2015 07:28:00 GMT",
            "21 Oct 2015 07:28:00 GMT",
            "Wed, 21-Oct-2015 07:28:00 GMT",
            "wednesday, 21-oct-2015 07:28:00 GMT",
        ];

        for raw in cases {
            let parsed = parse_http_date(raw).unwrap_or_else(|e| panic!("{raw}: {e}"));
            assert_eq!(parsed, expected, "Failed for: {raw}");
        }

        assert_eq!(
            parse_http_date("Thu, 1 Jan 1970 00:00:00 GMT").unwrap(),
            datetime!(1970-01-01 00:00:00 UTC)
        );
    }

    #[test]
    fn rejects_garbage() {
        let err = parse_http_date("next tuesday").unwrap_err();
        assert_eq!(err.to_string(), "`next tuesday` is not a valid HTTP date");
        assert!(parse_http_date("").is_err());
    }
}
