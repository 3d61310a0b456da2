/// Per-client session state.
///
/// Carries at most a signed-in user and a one-shot status message. The HTTP
/// layer owns storage and transport; the gate only reads and sets these two
/// fields.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Session {
    user_id: Option<String>,
    message: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// The signed-in user, if any.
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    pub fn set_user_id(&mut self, user_id: impl Into<String>) {
        self.user_id = Some(user_id.into());
    }

    pub fn clear_user_id(&mut self) {
        self.user_id = None;
    }

    /// Queue a message for the next rendered page. Replaces any pending one.
    pub fn flash(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
    }

    /// Peek at the pending message without consuming it.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Consume the pending message. A second call returns `None`.
    pub fn take_message(&mut self) -> Option<String> {
        self.message.take()
    }
}
