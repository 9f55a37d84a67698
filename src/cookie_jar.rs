use crate::config::Config;
use crate::jar::{Iter, Names};
use crate::{accept, assemble, tokenize, Cookie, CookieSource, Grammar, Rejection};
use time::OffsetDateTime;
use url::Url;

#[derive(Default, Debug, Clone)]
/// A client-side store for the cookies set by servers.
///
/// A jar holds at most one cookie per name. Cookies are kept in insertion
/// order; inserting a cookie whose name is already taken removes the old
/// cookie and appends the new one at the end.
///
/// # Filling a jar
///
/// Cookies come either from the `Set-Cookie`/`Set-Cookie2` headers of a
/// [`CookieSource`] or are added by hand:
///
/// ```rust
/// use amaretti::{CookieJar, Grammar};
/// use url::Url;
///
/// let source = Url::parse("http://www.example.com/shop").unwrap();
/// let mut jar = CookieJar::new();
/// jar.extend_from_header("color=blue; path=/; domain=.example.com", Grammar::Rfc2109, &source);
/// jar.add_cookie("debug", "1");
///
/// assert_eq!(jar.cookie_names(), vec!["color", "debug"]);
/// ```
///
/// Cookies whose `Domain` or `Path` don't fit the URL they were received
/// from are dropped without further notice. Use
/// [`CookieJar::extend_from_source_with()`] to find out which ones were dropped.
///
/// # Sending cookies back
///
/// [`CookieJar::cookie_header_value()`] builds the `Cookie` header value for a
/// request:
///
/// ```rust
/// use amaretti::{CookieJar, Grammar};
/// use url::Url;
///
/// let source = Url::parse("http://www.example.com/shop").unwrap();
/// let mut jar = CookieJar::new();
/// jar.extend_from_header("color=blue; path=/; domain=.example.com", Grammar::Rfc2109, &source);
///
/// let target = Url::parse("http://static.example.com/logo.png").unwrap();
/// assert_eq!(jar.cookie_header_value(&target).as_deref(), Some("color=blue"));
///
/// let elsewhere = Url::parse("http://example.org/").unwrap();
/// assert_eq!(jar.cookie_header_value(&elsewhere), None);
/// ```
pub struct CookieJar {
    /// Invariant: no two cookies share a name.
    cookies: Vec<Cookie>,
    config: Config,
}

impl CookieJar {
    /// Creates a new, empty [`CookieJar`] with the default [`Config`].
    pub fn new() -> CookieJar {
        Default::default()
    }

    /// Creates a new, empty [`CookieJar`] with the given [`Config`].
    pub fn with_config(config: Config) -> CookieJar {
        CookieJar {
            cookies: Vec::new(),
            config,
        }
    }

    /// Creates a [`CookieJar`] holding the cookies set by `source`.
    ///
    /// See [`CookieJar::extend_from_source()`] for details.
    pub fn from_source<S>(source: &S) -> CookieJar
    where
        S: CookieSource + ?Sized,
    {
        let mut jar = CookieJar::new();
        jar.extend_from_source(source);
        jar
    }

    /// The [`Config`] of `self`.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Parses the cookies set by `source` into `self`.
    ///
    /// Every `Set-Cookie` header is read with [`Grammar::Rfc2109`], then every
    /// `Set-Cookie2` header with [`Grammar::Rfc2965`]. Each header value is
    /// parsed on its own, in the order the source lists them.
    pub fn extend_from_source<S>(&mut self, source: &S)
    where
        S: CookieSource + ?Sized,
    {
        self.extend_from_source_with(source, |_| {})
    }

    /// Like [`CookieJar::extend_from_source()`], but `observer` is told
    /// about every cookie that was dropped because of its domain or path.
    ///
    /// ```rust
    /// use amaretti::{CookieJar, ResponseHeaders};
    /// use http::header::{HeaderMap, HeaderValue, SET_COOKIE};
    /// use url::Url;
    ///
    /// let mut headers = HeaderMap::new();
    /// headers.append(SET_COOKIE, HeaderValue::from_static("color=blue; domain=.other.com"));
    /// let source = ResponseHeaders::new(Url::parse("http://www.example.com/").unwrap(), headers);
    ///
    /// let mut rejected = vec![];
    /// let mut jar = CookieJar::new();
    /// jar.extend_from_source_with(&source, |rejection| {
    ///     rejected.push(rejection.cookie().name().to_string())
    /// });
    ///
    /// assert!(jar.is_empty());
    /// assert_eq!(rejected, vec!["color"]);
    /// ```
    pub fn extend_from_source_with<S, F>(&mut self, source: &S, mut observer: F)
    where
        S: CookieSource + ?Sized,
        F: FnMut(&Rejection),
    {
        let url = source.url();
        for grammar in Grammar::ALL {
            for header in source.header_fields(grammar.header_name()) {
                self.parse_header(&header, grammar, url, &mut observer);
            }
        }
    }

    /// Parses a single header value into `self`, validating every cookie
    /// against `source`, the URL the header was received from.
    pub fn extend_from_header(&mut self, header: &str, grammar: Grammar, source: &Url) {
        self.parse_header(header, grammar, source, &mut |_| {})
    }

    fn parse_header<F>(&mut self, header: &str, grammar: Grammar, source: &Url, observer: &mut F)
    where
        F: FnMut(&Rejection),
    {
        let tokens = tokenize(header);
        assemble(&tokens, grammar, |candidate| match accept(candidate, source) {
            Ok(cookie) => {
                self.add_unique_cookie(cookie);
            }
            Err(rejection) => {
                log::debug!("{rejection} (received from {source})");
                observer(&rejection);
            }
        });
    }

    /// Adds an unscoped cookie: it has neither domain nor path, and it is sent
    /// along with every request no matter the target URL.
    ///
    /// Any cookie named `name` is replaced.
    ///
    /// ```rust
    /// use amaretti::CookieJar;
    /// use url::Url;
    ///
    /// let mut jar = CookieJar::new();
    /// jar.add_cookie("debug", "1");
    ///
    /// let target = Url::parse("https://anywhere.test/at/all").unwrap();
    /// assert_eq!(jar.cookie_header_value(&target).as_deref(), Some("debug=1"));
    /// ```
    pub fn add_cookie<N, V>(&mut self, name: N, value: V)
    where
        N: Into<String>,
        V: Into<String>,
    {
        self.add_unique_cookie(Cookie::new(name, value));
    }

    /// Inserts `cookie` at the end of `self`, removing any cookie with the
    /// same name first.
    ///
    /// # Return value
    ///
    /// Returns `true` if `self` contained a cookie with the same name.
    /// `false` otherwise.
    ///
    /// # Example
    ///
    /// ```rust
    /// use amaretti::{Cookie, CookieJar};
    ///
    /// let mut jar = CookieJar::new();
    /// assert!(!jar.add_unique_cookie(Cookie::new("a", "1")));
    /// jar.add_unique_cookie(Cookie::new("b", "2"));
    /// assert!(jar.add_unique_cookie(Cookie::new("a", "3")));
    ///
    /// assert_eq!(jar.cookie_names(), vec!["b", "a"]);
    /// assert_eq!(jar.cookie_value("a"), Some("3"));
    /// ```
    pub fn add_unique_cookie(&mut self, cookie: Cookie) -> bool {
        let existing = self.position(cookie.name());
        if let Some(index) = existing {
            self.cookies.remove(index);
        }
        self.cookies.push(cookie);
        existing.is_some()
    }

    /// Adds every cookie of `other` to `self` via [`CookieJar::add_unique_cookie()`],
    /// in `other`'s order: cookies from `other` win over cookies with the same name in `self`.
    pub fn update_cookies(&mut self, other: &CookieJar) {
        for cookie in other {
            self.add_unique_cookie(cookie.clone());
        }
    }

    /// Removes every cookie from `self`.
    pub fn clear(&mut self) {
        self.cookies.clear();
    }

    /// The names of the cookies in `self`, in jar order.
    pub fn cookie_names(&self) -> Vec<&str> {
        self.names().collect()
    }

    /// Iterates over the names of the cookies in `self`, in jar order.
    pub fn names(&self) -> Names<'_> {
        Names {
            iter: self.cookies.iter(),
        }
    }

    /// A copy of the cookies in `self`, in jar order.
    ///
    /// The copy is unaffected by later changes to `self`.
    pub fn cookies(&self) -> Vec<Cookie> {
        self.cookies.clone()
    }

    /// Iterates over the cookies in `self`, in jar order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            iter: self.cookies.iter(),
        }
    }

    /// Returns the value of the cookie named `name`, if any.
    pub fn cookie_value(&self, name: &str) -> Option<&str> {
        self.get(name).map(Cookie::value)
    }

    /// Returns the cookie named `name`, if any.
    ///
    /// # Errors
    ///
    /// Asking for a cookie without a name is a mistake on the caller's side:
    /// an empty `name` is reported as an [`EmptyNameError`] rather than
    /// treated as a missing cookie.
    ///
    /// ```rust
    /// use amaretti::CookieJar;
    ///
    /// let mut jar = CookieJar::new();
    /// jar.add_cookie("a", "1");
    ///
    /// assert_eq!(jar.cookie("a").unwrap().unwrap().value(), "1");
    /// assert!(jar.cookie("b").unwrap().is_none());
    /// assert!(jar.cookie("").is_err());
    /// ```
    pub fn cookie(&self, name: &str) -> Result<Option<&Cookie>, EmptyNameError> {
        if name.is_empty() {
            return Err(EmptyNameError);
        }
        Ok(self.get(name))
    }

    /// Builds the value of the `Cookie` header for a request to `target`.
    ///
    /// A cookie is included if `target`'s host ends with its domain and
    /// `target`'s path starts with its path; unscoped cookies are always
    /// included. Cookies are listed in jar order as `name=value` pairs,
    /// separated by `; `.
    ///
    /// Returns `None`, rather than an empty string, if no cookie qualifies.
    pub fn cookie_header_value(&self, target: &Url) -> Option<String> {
        let host = target.host_str().unwrap_or_default();
        let path = target.path();
        let now = self.config.enforce_expiry.then(OffsetDateTime::now_utc);

        let pairs: Vec<String> = self
            .cookies
            .iter()
            .filter(|cookie| cookie.is_sent_to(host, path))
            .filter(|cookie| now.map_or(true, |now| !cookie.is_expired_at(now)))
            .map(Cookie::to_string)
            .collect();

        if pairs.is_empty() {
            None
        } else {
            Some(pairs.join("; "))
        }
    }

    /// The number of cookies in `self`.
    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    /// Returns `true` if `self` holds no cookies.
    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    fn get(&self, name: &str) -> Option<&Cookie> {
        self.cookies.iter().find(|cookie| cookie.name() == name)
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.cookies.iter().position(|cookie| cookie.name() == name)
    }
}

impl<'a> IntoIterator for &'a CookieJar {
    type Item = &'a Cookie;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Extend<Cookie> for CookieJar {
    fn extend<I: IntoIterator<Item = Cookie>>(&mut self, iter: I) {
        for cookie in iter {
            self.add_unique_cookie(cookie);
        }
    }
}

impl FromIterator<Cookie> for CookieJar {
    fn from_iter<I: IntoIterator<Item = Cookie>>(iter: I) -> Self {
        let mut jar = CookieJar::new();
        jar.extend(iter);
        jar
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// The error returned by [`CookieJar::cookie()`] when asked for a cookie
/// with an empty name.
pub struct EmptyNameError;

impl std::fmt::Display for EmptyNameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Cannot look up a cookie without a name")
    }
}

impl std::error::Error for EmptyNameError {}

#[cfg(test)]
mod tests {
    use crate::config::Config;
    use crate::{Cookie, CookieJar, CookieSource, Grammar, RejectionReason};
    use googletest::assert_that;
    use googletest::prelude::{displays_as, eq};
    use url::Url;

    /// A canned response.
    struct Response {
        url: Url,
        set_cookie: Vec<&'static str>,
        set_cookie2: Vec<&'static str>,
    }

    impl Response {
        fn new(url: &str) -> Response {
            Response {
                url: Url::parse(url).unwrap(),
                set_cookie: vec![],
                set_cookie2: vec![],
            }
        }

        fn set_cookie(mut self, header: &'static str) -> Response {
            self.set_cookie.push(header);
            self
        }

        fn set_cookie2(mut self, header: &'static str) -> Response {
            self.set_cookie2.push(header);
            self
        }
    }

    impl CookieSource for Response {
        fn header_fields(&self, name: &str) -> Vec<String> {
            let values = match name {
                "Set-Cookie" => &self.set_cookie,
                "Set-Cookie2" => &self.set_cookie2,
                _ => return vec![],
            };
            values.iter().map(|v| v.to_string()).collect()
        }

        fn url(&self) -> &Url {
            &self.url
        }
    }

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn simple_round_trip() {
        let response = Response::new("http://www.example.com/shop")
            .set_cookie("color=blue; path=/; domain=.example.com");
        let jar = CookieJar::from_source(&response);

        let cookies = jar.cookies();
        assert_eq!(cookies.len(), 1);
        assert_eq!(cookies[0].name_value(), ("color", "blue"));
        assert_eq!(cookies[0].domain(), Some(".example.com"));
        assert_eq!(cookies[0].path(), Some("/"));
    }

    #[test]
    fn comma_in_value_is_repaired() {
        let response = Response::new("http://example.com/").set_cookie("list=a,b,c; path=/");
        let jar = CookieJar::from_source(&response);

        assert_eq!(jar.cookie_names(), vec!["list"]);
        assert_eq!(jar.cookie_value("list"), Some("a,b,c"));
    }

    #[test]
    fn reserved_word_barrier() {
        let response = Response::new("http://example.com/").set_cookie("secure, color=blue");
        let jar = CookieJar::from_source(&response);

        assert_eq!(jar.cookie_names(), vec!["color"]);
        assert_eq!(jar.cookie_value("color"), Some("blue"));
        assert_eq!(jar.cookie_value("secure"), None);
    }

    #[test]
    fn foreign_domain_is_rejected() {
        let response =
            Response::new("http://www.example.com/").set_cookie("color=blue; domain=.other.com");
        let mut rejected = vec![];
        let mut jar = CookieJar::new();
        jar.extend_from_source_with(&response, |rejection| {
            rejected.push(rejection.reason().clone())
        });

        assert_eq!(jar.cookie_value("color"), None);
        assert!(jar.is_empty());
        assert_eq!(
            rejected,
            vec![RejectionReason::DomainMismatch {
                domain: ".other.com".into(),
                host: "www.example.com".into(),
            }]
        );
    }

    #[test]
    fn selection_by_path() {
        let source = url("http://www.example.com/private/area");
        let mut jar = CookieJar::new();
        jar.extend_from_header("public=1; path=/; domain=.example.com", Grammar::Rfc2109, &source);
        jar.extend_from_header(
            "secret=2; path=/private; domain=.example.com",
            Grammar::Rfc2109,
            &source,
        );
        assert_eq!(jar.len(), 2);

        let header = jar.cookie_header_value(&url("http://www.example.com/public"));
        assert_eq!(header.as_deref(), Some("public=1"));

        let header = jar.cookie_header_value(&url("http://www.example.com/private/page"));
        assert_eq!(header.as_deref(), Some("public=1; secret=2"));
    }

    #[test]
    fn selection_by_domain() {
        let mut jar = CookieJar::new();
        jar.extend_from_header("host=1", Grammar::Rfc2109, &url("http://www.example.com/"));
        assert_eq!(jar.cookie("host").unwrap().unwrap().domain(), Some("www.example.com"));

        assert_eq!(
            jar.cookie_header_value(&url("http://www.example.com/x")).as_deref(),
            Some("host=1")
        );
        assert_eq!(jar.cookie_header_value(&url("http://shop.example.com/x")), None);
    }

    #[test]
    fn unsetting_the_scope_makes_a_cookie_unscoped() {
        let mut jar = CookieJar::new();
        jar.extend_from_header(
            "session=abc; path=/app; domain=.example.com",
            Grammar::Rfc2109,
            &url("http://www.example.com/app/login"),
        );
        let elsewhere = url("http://other.org/");
        assert_eq!(jar.cookie_header_value(&elsewhere), None);

        let scoped = jar.cookie("session").unwrap().unwrap().clone();
        let unscoped = scoped.unset_domain().unset_path();
        assert!(unscoped.is_unscoped());
        assert!(jar.add_unique_cookie(unscoped));

        assert_eq!(jar.len(), 1);
        assert_eq!(
            jar.cookie_header_value(&elsewhere).as_deref(),
            Some("session=abc")
        );
    }

    #[test]
    fn unscoped_cookies_go_everywhere() {
        let mut jar = CookieJar::new();
        jar.add_cookie("debug", "1");
        jar.extend_from_header(
            "scoped=2; path=/; domain=.example.com",
            Grammar::Rfc2109,
            &url("http://www.example.com/"),
        );

        for target in [
            "http://www.example.com/",
            "https://unrelated.org/deep/path?q=1",
            "http://localhost:8080",
            "http://192.168.0.1/",
        ] {
            let header = jar.cookie_header_value(&url(target)).unwrap();
            assert!(header.starts_with("debug=1"), "{target}: {header}");
        }
        assert_eq!(
            jar.cookie_header_value(&url("http://www.example.com/")).as_deref(),
            Some("debug=1; scoped=2")
        );
    }

    #[test]
    fn no_header_when_nothing_qualifies() {
        let jar = CookieJar::new();
        assert_eq!(jar.cookie_header_value(&url("http://example.com/")), None);
    }

    #[test]
    fn unique_by_name_last_one_wins() {
        let mut jar = CookieJar::new();
        let inserts = [("a", "1"), ("b", "2"), ("a", "3"), ("c", "4"), ("b", "5"), ("a", "6")];
        for (name, value) in inserts {
            jar.add_unique_cookie(Cookie::new(name, value));
        }

        assert_eq!(jar.cookie_names(), vec!["c", "b", "a"]);
        assert_eq!(jar.cookie_value("a"), Some("6"));
        assert_eq!(jar.cookie_value("b"), Some("5"));
        assert_eq!(jar.cookie_value("c"), Some("4"));
    }

    #[test]
    fn clear_empties_the_jar() {
        let mut jar = CookieJar::new();
        jar.clear();
        assert!(jar.cookies().is_empty());

        jar.add_cookie("a", "1");
        jar.extend_from_header("b=2", Grammar::Rfc2109, &url("http://example.com/"));
        jar.clear();
        assert!(jar.cookies().is_empty());
        jar.clear();
        assert!(jar.cookies().is_empty());
        assert_eq!(jar.cookie_header_value(&url("http://example.com/")), None);
    }

    #[test]
    fn snapshots_are_independent() {
        let mut jar = CookieJar::new();
        jar.add_cookie("a", "1");
        let snapshot = jar.cookies();
        jar.add_cookie("a", "2");
        jar.add_cookie("b", "3");

        assert_eq!(snapshot, vec![Cookie::new("a", "1")]);
    }

    #[test]
    fn update_cookies_lets_the_other_jar_win() {
        let mut jar: CookieJar = [Cookie::new("a", "1"), Cookie::new("b", "2")]
            .into_iter()
            .collect();
        let other: CookieJar = [Cookie::new("b", "20"), Cookie::new("c", "30")]
            .into_iter()
            .collect();

        jar.update_cookies(&other);
        assert_eq!(jar.cookie_names(), vec!["a", "b", "c"]);
        assert_eq!(jar.cookie_value("b"), Some("20"));
        // `other` is left untouched.
        assert_eq!(other.cookie_names(), vec!["b", "c"]);
    }

    #[test]
    fn both_header_kinds_feed_the_same_jar() {
        let response = Response::new("http://www.example.com/app/index")
            .set_cookie("a=1; expires=Wed, 21 Oct 2015 07:28:00 GMT")
            .set_cookie("shared=from-2109")
            .set_cookie2("b=2; Version=1; Discard, shared=from-2965; Port=80");
        let jar = CookieJar::from_source(&response);

        assert_eq!(jar.cookie_names(), vec!["a", "shared", "b"]);
        assert_eq!(jar.cookie_value("shared"), Some("from-2965"));
        assert_eq!(jar.cookie("shared").unwrap().unwrap().attribute("port"), Some("80"));
        assert_eq!(jar.cookie("b").unwrap().unwrap().version().unwrap(), Some(1));
        assert!(jar.cookie("a").unwrap().unwrap().expires().unwrap().is_datetime());
        assert_eq!(jar.cookie("a").unwrap().unwrap().path(), Some("/app"));
    }

    #[test]
    fn cookies_within_a_header_are_stored_back_to_front() {
        let mut jar = CookieJar::new();
        jar.extend_from_header("a=1, b=2, a=3", Grammar::Rfc2109, &url("http://example.com/"));

        // The header is read from its end: the first `a` is the last one stored.
        assert_eq!(jar.cookie_names(), vec!["b", "a"]);
        assert_eq!(jar.cookie_value("a"), Some("1"));
    }

    #[test]
    fn empty_name_lookup_fails_fast() {
        let jar = CookieJar::new();
        let err = jar.cookie("").unwrap_err();
        assert_that!(err, displays_as(eq("Cannot look up a cookie without a name")));
        assert!(jar.cookie("missing").unwrap().is_none());
    }

    #[test]
    fn expiry_is_opt_in() {
        let source = url("http://example.com/");
        let headers = [
            "gone=1; max-age=0",
            "old=2; expires=Thu, 01 Jan 1970 00:00:00 GMT",
            "fresh=3; max-age=3600",
        ];

        let mut lenient = CookieJar::new();
        let mut strict = CookieJar::with_config({
            let mut config = Config::default();
            config.enforce_expiry = true;
            config
        });
        for header in headers {
            lenient.extend_from_header(header, Grammar::Rfc2109, &source);
            strict.extend_from_header(header, Grammar::Rfc2109, &source);
        }

        assert_eq!(
            lenient.cookie_header_value(&source).as_deref(),
            Some("gone=1; old=2; fresh=3")
        );
        assert_eq!(strict.cookie_header_value(&source).as_deref(), Some("fresh=3"));
        // Expired cookies are skipped, not evicted.
        assert_eq!(strict.len(), 3);
    }
}
