//! Scoping a parsed cookie to the URL its header came from.
use crate::Cookie;
use url::Url;

/// Validates `candidate` against the URL of the response it was found in,
/// filling in a default domain and path when the header didn't set them.
///
/// - Without a `Path`, the cookie gets the parent of the source path (see
///   [`parent_path()`]). With one, the source path must start with it.
/// - Without a `Domain`, the cookie gets the source host. With one, the domain
///   must start with a `.`, contain another `.` after that, be a suffix of the
///   source host, and the host must not have more than one label in front of it.
///
/// A cookie that fails any of the checks is handed back inside the [`Rejection`].
///
/// ```rust
/// use amaretti::{accept, Cookie};
/// use url::Url;
///
/// let source = Url::parse("http://www.example.com/shop/cart").unwrap();
///
/// let cookie = accept(Cookie::new("color", "blue"), &source).unwrap();
/// assert_eq!(cookie.domain(), Some("www.example.com"));
/// assert_eq!(cookie.path(), Some("/shop"));
///
/// let foreign = Cookie::new("color", "blue").set_domain(".other.com");
/// assert!(accept(foreign, &source).is_err());
/// ```
pub fn accept(mut candidate: Cookie, source: &Url) -> Result<Cookie, Rejection> {
    let host = source.host_str().unwrap_or_default();
    let source_path = source.path();

    let reason = match candidate.path() {
        None => {
            candidate.path = Some(parent_path(source_path).to_string());
            None
        }
        Some(path) if source_path.is_empty() || source_path.starts_with(path) => None,
        Some(path) => Some(RejectionReason::PathMismatch {
            path: path.to_string(),
            source_path: source_path.to_string(),
        }),
    };
    let reason = reason.or_else(|| match candidate.domain() {
        None => {
            candidate.domain = Some(host.to_string());
            None
        }
        Some(domain) => check_domain(domain, host),
    });

    match reason {
        None => Ok(candidate),
        Some(reason) => Err(Rejection {
            cookie: candidate,
            reason,
        }),
    }
}

fn check_domain(domain: &str, host: &str) -> Option<RejectionReason> {
    let domain_and_host = || (domain.to_string(), host.to_string());

    if !domain.starts_with('.') {
        return Some(RejectionReason::DomainWithoutLeadingDot {
            domain: domain.to_string(),
        });
    }
    if domain.rfind('.') == Some(0) {
        return Some(RejectionReason::DomainTooBroad {
            domain: domain.to_string(),
        });
    }
    if !host.ends_with(domain) {
        let (domain, host) = domain_and_host();
        return Some(RejectionReason::DomainMismatch { domain, host });
    }
    // `www.example.com` may set `.example.com`, `a.b.example.com` may not.
    if let (Some(position), Some(first_dot)) = (host.rfind(domain), host.find('.')) {
        if position > first_dot {
            let (domain, host) = domain_and_host();
            return Some(RejectionReason::HostHasExtraLabels { domain, host });
        }
    }
    None
}

/// The default path of a cookie received from `path`: everything before its
/// last `/`, or `/` if it has none.
///
/// ```rust
/// use amaretti::parent_path;
///
/// assert_eq!(parent_path("/shop/cart"), "/shop");
/// assert_eq!(parent_path("/shop/"), "/shop");
/// assert_eq!(parent_path("/shop"), "");
/// assert_eq!(parent_path("shop"), "/");
/// ```
pub fn parent_path(path: &str) -> &str {
    match path.rfind('/') {
        Some(index) => &path[..index],
        None => "/",
    }
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("The `{}` cookie was rejected: {reason}", .cookie.name())]
/// A cookie that didn't pass [`accept()`], together with the reason why.
pub struct Rejection {
    cookie: Cookie,
    reason: RejectionReason,
}

impl Rejection {
    /// The cookie that was rejected.
    pub fn cookie(&self) -> &Cookie {
        &self.cookie
    }

    /// Why the cookie was rejected.
    pub fn reason(&self) -> &RejectionReason {
        &self.reason
    }

    /// Takes the rejected cookie back.
    pub fn into_cookie(self) -> Cookie {
        self.cookie
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
/// The check that a rejected cookie failed.
pub enum RejectionReason {
    #[error("its path `{path}` is not a prefix of `{source_path}`")]
    PathMismatch { path: String, source_path: String },
    #[error("its domain `{domain}` doesn't start with a `.`")]
    DomainWithoutLeadingDot { domain: String },
    #[error("its domain `{domain}` has a single label")]
    DomainTooBroad { domain: String },
    #[error("its domain `{domain}` doesn't match the host `{host}`")]
    DomainMismatch { domain: String, host: String },
    #[error("the host `{host}` has more than one label in front of its domain `{domain}`")]
    HostHasExtraLabels { domain: String, host: String },
}
