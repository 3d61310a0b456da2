use std::borrow::Cow;
use std::fmt;
use std::path::Path;

/// The content type of a document, inferred from its name's extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    /// `.txt`: served verbatim.
    Text,
    /// `.md`: rendered to HTML before display.
    Markdown,
}

impl DocumentKind {
    /// Resolve the kind of `name`, or `None` for any other extension.
    ///
    /// Matching is case-sensitive: `NOTES.TXT` has no kind.
    pub fn from_name(name: &str) -> Option<Self> {
        match Path::new(name).extension().and_then(|ext| ext.to_str()) {
            Some("txt") => Some(Self::Text),
            Some("md") => Some(Self::Markdown),
            _ => None,
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Markdown => write!(f, "markdown"),
        }
    }
}

/// A document read back from the store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Document {
    pub name: String,
    pub content: Vec<u8>,
    pub kind: DocumentKind,
}

impl Document {
    /// Content as text. Invalid UTF-8 sequences are replaced.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.content)
    }
}
