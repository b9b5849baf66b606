use bytes::{BufMut, BytesMut};

use super::{
    error::HeaderError,
    matches::{find_crlf, is_token_str},
};
use crate::common::ParseResult;

/// Ordered, case-insensitive HTTP header collection.
///
/// Names are stored in lowercase. Setting a name that is already present appends the new value
/// separated by `", "`, use [`overwrite`][Headers::overwrite] to replace it instead.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Headers {
    fields: Vec<Field>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Field {
    name: String,
    value: String,
}

/// Successful result of [`Headers::parse`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Parsed {
    /// A field line was stored, contains the consumed length including the CRLF.
    Field(usize),
    /// The blank line ending the header section.
    End,
}

impl Parsed {
    /// Returns the number of bytes consumed from the chunk.
    #[inline]
    pub const fn consumed(&self) -> usize {
        match self {
            Self::Field(n) => *n,
            Self::End => 2,
        }
    }
}

impl Headers {
    /// Create new empty [`Headers`].
    ///
    /// This function does not allocate.
    #[inline]
    pub const fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Create new empty [`Headers`] with at least the specified capacity.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self { fields: Vec::with_capacity(capacity) }
    }

    /// Returns the number of distinct header names.
    #[inline]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if there is no header.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.fields
            .iter()
            .position(|field| field.name.eq_ignore_ascii_case(name))
    }

    /// Returns the value for the given name, the lookup is case-insensitive.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.position(name).map(|i| self.fields[i].value.as_str())
    }

    /// Returns `true` if the collection contains the given name.
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Insert a value, merging with any existing value as `old, new`.
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.position(name) {
            Some(i) => {
                let old = &mut self.fields[i].value;
                old.push_str(", ");
                old.push_str(&value);
            }
            None => self.fields.push(Field {
                name: name.to_ascii_lowercase(),
                value,
            }),
        }
    }

    /// Insert a value, replacing any existing value.
    pub fn overwrite(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.position(name) {
            Some(i) => self.fields[i].value = value,
            None => self.fields.push(Field {
                name: name.to_ascii_lowercase(),
                value,
            }),
        }
    }

    /// Remove a header, returning its value if it was present.
    ///
    /// Order of the remaining headers is preserved.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.position(name).map(|i| self.fields.remove(i).value)
    }

    /// Returns an iterator over name and value pairs in insertion order.
    #[inline]
    pub fn iter(&self) -> Iter<'_> {
        Iter { iter: self.fields.iter() }
    }

    /// Parse a single header field line from the start of `chunk`.
    ///
    /// Returns [`ParseResult::Pending`] if `chunk` does not contain a CRLF yet. A CRLF at the very
    /// start marks the end of the header section and returns [`Parsed::End`].
    pub fn parse(&mut self, chunk: &[u8]) -> ParseResult<Parsed, HeaderError> {
        let Some(crlf) = find_crlf(chunk) else {
            return ParseResult::Pending;
        };

        if crlf == 0 {
            return ParseResult::Ok(Parsed::End);
        }

        let line = &chunk[..crlf];

        let Some(colon) = line.iter().position(|&b| b == b':') else {
            return ParseResult::Err(HeaderError::Malformed);
        };

        let (name, value) = (&line[..colon], &line[colon + 1..]);

        // `Host : example.com`
        if name.last().is_some_and(u8::is_ascii_whitespace) {
            return ParseResult::Err(HeaderError::Malformed);
        }

        let name = name.trim_ascii();
        if name.is_empty() {
            return ParseResult::Err(HeaderError::Empty);
        }
        let (true, Ok(name)) = (is_token_str(name), str::from_utf8(name)) else {
            return ParseResult::Err(HeaderError::InvalidToken);
        };

        let Ok(value) = str::from_utf8(value.trim_ascii()) else {
            return ParseResult::Err(HeaderError::InvalidValue);
        };

        self.set(name, value);

        ParseResult::Ok(Parsed::Field(crlf + 2))
    }

    /// Write every field as `name: value\r\n`, followed by the blank line.
    pub(crate) fn write_to(&self, buf: &mut BytesMut) {
        for (name, value) in self {
            buf.put_slice(name.as_bytes());
            buf.put_slice(b": ");
            buf.put_slice(value.as_bytes());
            buf.put_slice(b"\r\n");
        }
        buf.put_slice(b"\r\n");
    }
}

impl std::fmt::Debug for Headers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

// ===== Iter =====

impl<'a> IntoIterator for &'a Headers {
    type Item = (&'a str, &'a str);

    type IntoIter = Iter<'a>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over [`Headers`] name and value pairs.
#[derive(Debug)]
pub struct Iter<'a> {
    iter: std::slice::Iter<'a, Field>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a str);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.iter
            .next()
            .map(|field| (field.name.as_str(), field.value.as_str()))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for Headers {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut headers = Headers::new();
        for (name, value) in iter {
            headers.set(name.as_ref(), value);
        }
        headers
    }
}
