use orderlist_core::SessionId;

/// Session context for a request.
///
/// Resolved by the session middleware and present for all order list routes.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SessionContext {
    session_id: SessionId,
    started: bool,
}

impl SessionContext {
    pub fn existing(session_id: SessionId) -> Self {
        Self { session_id, started: false }
    }

    /// A session minted for a request that carried no session header.
    pub fn started(session_id: SessionId) -> Self {
        Self { session_id, started: true }
    }

    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    pub fn is_new(&self) -> bool {
        self.started
    }
}
