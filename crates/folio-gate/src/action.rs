use std::fmt;

/// The guarded operations. Every one of them requires a signed-in user.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    /// Show the new-document form.
    NewForm,
    /// Create a document.
    Create,
    /// Show the edit form for a document.
    EditForm,
    /// Replace a document's content.
    Update,
    /// Delete a document.
    Delete,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NewForm => write!(f, "new-form"),
            Self::Create => write!(f, "create"),
            Self::EditForm => write!(f, "edit-form"),
            Self::Update => write!(f, "update"),
            Self::Delete => write!(f, "delete"),
        }
    }
}
