use std::cmp::Ordering;
use std::fmt;
use std::hash::Hash;
use std::hash::Hasher;
use std::ops::Div;
use std::str::FromStr;

/// Separator used when none is configured.
pub const DEFAULT_SEPARATOR: char = '/';

/// Immutable, ordered sequence of non-empty path segments.
///
/// Equality, ordering and hashing only look at the segments. The separator is
/// remembered for display purposes, so `a/b` parsed with `/` equals `a.b`
/// parsed with `.`.
#[derive(Clone)]
pub struct PathKey {
    segments: Vec<String>,
    separator: char,
}

impl PathKey {
    /// Parses `raw` with the default `/` separator.
    pub fn new(raw: &str) -> Self {
        Self::parse(raw, DEFAULT_SEPARATOR)
    }

    /// Splits `raw` on `separator`, dropping every empty segment.
    ///
    /// An empty input yields an empty path rather than an error.
    pub fn parse(
        raw: &str,
        separator: char,
    ) -> Self {
        let segments = raw
            .split(separator)
            .filter(|segment| !segment.is_empty())
            .map(str::to_owned)
            .collect();
        Self { segments, separator }
    }

    /// Builds a path from already split segments. Empty segments are dropped.
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments
                .into_iter()
                .map(Into::into)
                .filter(|segment: &String| !segment.is_empty())
                .collect(),
            separator: DEFAULT_SEPARATOR,
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn separator(&self) -> char {
        self.separator
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.segments.iter()
    }

    /// Returns `self` followed by every segment of `other`.
    pub fn concat(
        &self,
        other: &PathKey,
    ) -> PathKey {
        let mut segments = Vec::with_capacity(self.segments.len() + other.segments.len());
        segments.extend_from_slice(&self.segments);
        segments.extend_from_slice(&other.segments);
        PathKey {
            segments,
            separator: self.separator,
        }
    }

    /// Returns `self` with one more segment. An empty `segment` is ignored.
    pub fn join(
        &self,
        segment: impl Into<String>,
    ) -> PathKey {
        let mut path = self.clone();
        let segment = segment.into();
        if !segment.is_empty() {
            path.segments.push(segment);
        }
        path
    }
}

impl Default for PathKey {
    fn default() -> Self {
        Self {
            segments: Vec::new(),
            separator: DEFAULT_SEPARATOR,
        }
    }
}

impl PartialEq for PathKey {
    fn eq(
        &self,
        other: &Self,
    ) -> bool {
        self.segments == other.segments
    }
}

impl Eq for PathKey {}

impl PartialOrd for PathKey {
    fn partial_cmp(
        &self,
        other: &Self,
    ) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PathKey {
    fn cmp(
        &self,
        other: &Self,
    ) -> Ordering {
        self.segments.cmp(&other.segments)
    }
}

impl Hash for PathKey {
    fn hash<H: Hasher>(
        &self,
        state: &mut H,
    ) {
        self.segments.hash(state);
    }
}

/// Compares against a raw delimited string parsed with this path's separator.
impl PartialEq<str> for PathKey {
    fn eq(
        &self,
        other: &str,
    ) -> bool {
        let mut theirs = other.split(self.separator).filter(|segment| !segment.is_empty());
        let mut ours = self.segments.iter();
        loop {
            match (ours.next(), theirs.next()) {
                (None, None) => return true,
                (Some(a), Some(b)) if a == b => continue,
                _ => return false,
            }
        }
    }
}

impl PartialEq<&str> for PathKey {
    fn eq(
        &self,
        other: &&str,
    ) -> bool {
        *self == **other
    }
}

impl fmt::Display for PathKey {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                write!(f, "{}", self.separator)?;
            }
            f.write_str(segment)?;
        }
        Ok(())
    }
}

impl fmt::Debug for PathKey {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "PathKey({self})")
    }
}

impl From<&str> for PathKey {
    fn from(raw: &str) -> Self {
        PathKey::new(raw)
    }
}

impl From<String> for PathKey {
    fn from(raw: String) -> Self {
        PathKey::new(&raw)
    }
}

impl FromStr for PathKey {
    type Err = std::convert::Infallible;

    fn from_str(raw: &str) -> std::result::Result<Self, Self::Err> {
        Ok(PathKey::new(raw))
    }
}

impl<'a> IntoIterator for &'a PathKey {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}

impl Div<&str> for &PathKey {
    type Output = PathKey;

    fn div(
        self,
        segment: &str,
    ) -> PathKey {
        self.join(segment)
    }
}

impl Div<&str> for PathKey {
    type Output = PathKey;

    fn div(
        mut self,
        segment: &str,
    ) -> PathKey {
        if !segment.is_empty() {
            self.segments.push(segment.to_owned());
        }
        self
    }
}

impl Div<&PathKey> for &PathKey {
    type Output = PathKey;

    fn div(
        self,
        other: &PathKey,
    ) -> PathKey {
        self.concat(other)
    }
}
