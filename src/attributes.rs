use std::slice::Iter;

/// The attributes attached to a [`Cookie`], e.g. `max-age`, `version` or `comment`.
///
/// Names are stored lower-cased. Entries keep the order in which they appeared
/// in the header; a name appears at most once.
///
/// [`Cookie`]: crate::Cookie
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    entries: Vec<(String, String)>,
}

impl Attributes {
    /// Creates an empty attribute map.
    pub fn new() -> Attributes {
        Default::default()
    }

    /// Sets `name` to `value`, replacing any previous value for `name`.
    ///
    /// A new name is appended at the end.
    ///
    /// ```rust
    /// use amaretti::Attributes;
    ///
    /// let mut attributes = Attributes::new();
    /// attributes.insert("Max-Age", "10");
    /// attributes.insert("comment", "hi");
    /// attributes.insert("max-age", "20");
    ///
    /// assert_eq!(attributes.get("max-age"), Some("20"));
    /// assert_eq!(attributes.names().collect::<Vec<_>>(), vec!["max-age", "comment"]);
    /// ```
    pub fn insert<N, V>(&mut self, name: N, value: V)
    where
        N: AsRef<str>,
        V: Into<String>,
    {
        let name = name.as_ref().to_ascii_lowercase();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Moves `name` in front of every other entry with `value` as its value.
    ///
    /// The assembler walks a header from its last token to its first, so
    /// prepending keeps header order and the occurrence written first in the
    /// header is the one that survives.
    pub(crate) fn prepend(&mut self, name: String, value: String) {
        self.entries.retain(|(n, _)| *n != name);
        self.entries.insert(0, (name, value));
    }

    /// Returns the value for `name`, if any. The lookup ignores ASCII case.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Returns `true` if an attribute named `name` is present. Ignores ASCII case.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Removes `name` and returns its value, if it was present. Ignores ASCII case.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        let index = self
            .entries
            .iter()
            .position(|(n, _)| n.eq_ignore_ascii_case(name))?;
        Some(self.entries.remove(index).1)
    }

    /// The attribute names, in header order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    /// Iterates over `(name, value)` pairs, in header order.
    pub fn iter(&self) -> AttributesIter<'_> {
        AttributesIter {
            iter: self.entries.iter(),
        }
    }

    /// The number of attributes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no attributes.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Iterator over the entries of an [`Attributes`] map.
pub struct AttributesIter<'a> {
    iter: Iter<'a, (String, String)>,
}

impl<'a> Iterator for AttributesIter<'a> {
    type Item = (&'a str, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl ExactSizeIterator for AttributesIter<'_> {}

impl<'a> IntoIterator for &'a Attributes {
    type Item = (&'a str, &'a str);
    type IntoIter = AttributesIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<N, V> FromIterator<(N, V)> for Attributes
where
    N: AsRef<str>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut attributes = Attributes::new();
        for (name, value) in iter {
            attributes.insert(name, value);
        }
        attributes
    }
}
