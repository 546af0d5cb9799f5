use bookshelf_core::UserId;

/// Principal context for a request (the authenticated token subject).
///
/// Inserted by the auth middleware; handlers behind the gate can rely on it.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PrincipalContext {
    user_id: UserId,
}

impl PrincipalContext {
    pub fn new(user_id: UserId) -> Self {
        Self { user_id }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }
}
