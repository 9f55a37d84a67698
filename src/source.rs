use http::HeaderMap;
use url::Url;

/// Something a [`CookieJar`] can pull cookies out of: usually an HTTP response.
///
/// [`CookieJar`]: crate::CookieJar
pub trait CookieSource {
    /// Returns every value of the header named `name`, in the order they were received.
    ///
    /// A [`CookieJar`] asks for `Set-Cookie` and `Set-Cookie2`.
    ///
    /// [`CookieJar`]: crate::CookieJar
    fn header_fields(&self, name: &str) -> Vec<String>;

    /// The URL the headers were received from.
    ///
    /// It is used to default and validate the domain and path of each cookie.
    fn url(&self) -> &Url;
}

impl<T: CookieSource + ?Sized> CookieSource for &T {
    fn header_fields(&self, name: &str) -> Vec<String> {
        (**self).header_fields(name)
    }

    fn url(&self) -> &Url {
        (**self).url()
    }
}

/// A [`CookieSource`] built out of the headers of a response and the URL it came from.
///
/// ```rust
/// use amaretti::{CookieJar, ResponseHeaders};
/// use http::header::{HeaderMap, HeaderValue, SET_COOKIE};
/// use url::Url;
///
/// let mut headers = HeaderMap::new();
/// headers.append(SET_COOKIE, HeaderValue::from_static("color=blue; path=/"));
/// let source = ResponseHeaders::new(Url::parse("http://example.com/shop").unwrap(), headers);
///
/// let jar = CookieJar::from_source(&source);
/// assert_eq!(jar.cookie_value("color"), Some("blue"));
/// ```
#[derive(Debug, Clone)]
pub struct ResponseHeaders {
    url: Url,
    headers: HeaderMap,
}

impl ResponseHeaders {
    pub fn new(url: Url, headers: HeaderMap) -> ResponseHeaders {
        ResponseHeaders { url, headers }
    }
}

impl CookieSource for ResponseHeaders {
    /// Header values that aren't valid UTF-8 are decoded lossily.
    fn header_fields(&self, name: &str) -> Vec<String> {
        self.headers
            .get_all(name)
            .iter()
            .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
            .collect()
    }

    fn url(&self) -> &Url {
        &self.url
    }
}
