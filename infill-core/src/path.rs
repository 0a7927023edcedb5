use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::str::FromStr;

/// One step into a nested value: a named record field or a list index.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PathSegment {
    /// A record field, by canonical name
    Field(String),
    /// A list element, zero-based
    Index(usize),
}

/// The structural address of a location within a (possibly nested) record value.
///
/// Paths render as `address.street` or `items[2].name`. Equality and ordering are
/// structural, so sets of paths iterate in a stable, parent-before-child order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct FieldPath {
    segments: Vec<PathSegment>,
}

impl FieldPath {
    /// The empty path, addressing the root record itself
    pub const fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Returns true if this is the root path
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns a new path with a field segment appended
    pub fn field(&self, name: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Field(name.into()));
        Self { segments }
    }

    /// Returns a new path with an index segment appended
    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Index(index));
        Self { segments }
    }

    /// All segments, outermost first
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Number of segments
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns true if the path has no segments (same as [`FieldPath::is_root`])
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// The innermost segment
    pub fn last(&self) -> Option<&PathSegment> {
        self.segments.last()
    }

    /// The path one level up, or `None` at the root
    pub fn parent(&self) -> Option<Self> {
        let (_, rest) = self.segments.split_last()?;
        Some(Self {
            segments: rest.to_vec(),
        })
    }

    /// Returns true if `self` is `other` or one of its ancestors.
    pub fn is_prefix_of(&self, other: &FieldPath) -> bool {
        other.segments.starts_with(&self.segments)
    }

    /// Prepends `prefix` to this path
    pub fn prefixed(&self, prefix: &FieldPath) -> Self {
        let mut segments = prefix.segments.clone();
        segments.extend(self.segments.iter().cloned());
        Self { segments }
    }

    /// The path with list indices dropped: `items[3].name` becomes `items.name`.
    ///
    /// This is the path into the schema rather than into a value.
    pub fn schema_path(&self) -> Self {
        Self {
            segments: self
                .segments
                .iter()
                .filter(|s| matches!(s, PathSegment::Field(_)))
                .cloned()
                .collect(),
        }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return write!(f, "$");
        }
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Field(name) => {
                    if i > 0 {
                        write!(f, ".")?;
                    }
                    write!(f, "{name}")?;
                }
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

impl<S: Into<String>> FromIterator<S> for FieldPath {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            segments: iter
                .into_iter()
                .map(|s| PathSegment::Field(s.into()))
                .collect(),
        }
    }
}

impl From<Vec<PathSegment>> for FieldPath {
    fn from(segments: Vec<PathSegment>) -> Self {
        Self { segments }
    }
}

/// Error returned when a string can't be parsed as a [`FieldPath`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathParseError {
    /// The input that was being parsed
    pub input: String,
    /// Byte offset of the offending character
    pub offset: usize,
}

impl fmt::Display for PathParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid field path {:?}: unexpected input at byte {}",
            self.input, self.offset
        )
    }
}

impl core::error::Error for PathParseError {}

impl FromStr for FieldPath {
    type Err = PathParseError;

    /// Parses `a.b[0].c`. The empty string and `$` both parse as the root.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = |offset| PathParseError {
            input: s.into(),
            offset,
        };
        let mut segments = Vec::new();
        if s.is_empty() || s == "$" {
            return Ok(Self { segments });
        }

        let bytes = s.as_bytes();
        let mut pos = 0;
        let mut expect_name = true;
        while pos < bytes.len() {
            match bytes[pos] {
                b'.' => {
                    if expect_name || pos + 1 == bytes.len() {
                        return Err(err(pos));
                    }
                    expect_name = true;
                    pos += 1;
                }
                b'[' => {
                    if segments.is_empty() && expect_name {
                        return Err(err(pos));
                    }
                    let close = s[pos..].find(']').ok_or_else(|| err(pos))? + pos;
                    let index = s[pos + 1..close]
                        .parse::<usize>()
                        .map_err(|_| err(pos + 1))?;
                    segments.push(PathSegment::Index(index));
                    expect_name = false;
                    pos = close + 1;
                }
                b']' => return Err(err(pos)),
                _ => {
                    if !expect_name {
                        return Err(err(pos));
                    }
                    let end = s[pos..]
                        .find(['.', '['])
                        .map_or(bytes.len(), |offset| pos + offset);
                    segments.push(PathSegment::Field(s[pos..end].into()));
                    expect_name = false;
                    pos = end;
                }
            }
        }
        Ok(Self { segments })
    }
}
