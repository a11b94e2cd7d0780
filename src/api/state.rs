use std::sync::Arc;

use crate::services::Recommender;
use crate::session::SessionStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionStore,
    pub recommender: Arc<Recommender>,
}

impl AppState {
    /// Creates state with no sessions
    pub fn new(recommender: Recommender) -> Self {
        Self::with_sessions(SessionStore::new(), recommender)
    }

    pub fn with_sessions(sessions: SessionStore, recommender: Recommender) -> Self {
        Self {
            sessions,
            recommender: Arc::new(recommender),
        }
    }
}
