//! Low-level types related to [`CookieJar`].
//!
//! [`CookieJar`]: crate::CookieJar
use crate::Cookie;
use std::slice;

/// An iterator over the cookies in a [`CookieJar`], in jar order.
///
/// This struct is created by the [`CookieJar::iter()`] method.
///
/// [`CookieJar`]: crate::CookieJar
/// [`CookieJar::iter()`]: crate::CookieJar::iter
pub struct Iter<'a> {
    pub(crate) iter: slice::Iter<'a, Cookie>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Cookie;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

/// An iterator over the names of the cookies in a [`CookieJar`], in jar order.
///
/// This struct is created by the [`CookieJar::names()`] method.
///
/// [`CookieJar`]: crate::CookieJar
/// [`CookieJar::names()`]: crate::CookieJar::names
pub struct Names<'a> {
    pub(crate) iter: slice::Iter<'a, Cookie>,
}

impl<'a> Iterator for Names<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(Cookie::name)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl ExactSizeIterator for Names<'_> {}

impl DoubleEndedIterator for Iter<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.iter.next_back()
    }
}

impl DoubleEndedIterator for Names<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.iter.next_back().map(Cookie::name)
    }
}

impl std::iter::FusedIterator for Iter<'_> {}

impl std::iter::FusedIterator for Names<'_> {}
