use serde::Deserialize;
use serde::Serialize;
use std::fmt::Display;
use std::fmt::Formatter;

/// Hierarchical metric identifier.
///
/// Rendered with a leading separator, so `["intel", "dpa", "sql"]` reads
/// `/intel/dpa/sql`. Routing only ever looks at the rendered form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Repr", into = "Vec<String>")]
pub struct Namespace(Vec<String>);

/// Accepted wire shapes: a slash path or a list of segments.
#[derive(Deserialize)]
#[serde(untagged)]
enum Repr {
    Path(String),
    Segments(Vec<String>),
}

impl Namespace {
    pub const SEPARATOR: char = '/';

    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }
    pub fn segments(&self) -> &[String] {
        &self.0
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for Namespace {
    fn from(path: &str) -> Self {
        Self::new(
            path.split(Self::SEPARATOR)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        )
    }
}

impl From<Repr> for Namespace {
    fn from(repr: Repr) -> Self {
        match repr {
            Repr::Path(ref path) => Self::from(path.as_str()),
            Repr::Segments(segments) => Self(segments),
        }
    }
}

impl From<Namespace> for Vec<String> {
    fn from(namespace: Namespace) -> Self {
        namespace.0
    }
}

impl Display for Namespace {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for segment in self.0.iter() {
            write!(f, "{}{}", Self::SEPARATOR, segment)?;
        }
        Ok(())
    }
}
