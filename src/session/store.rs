use std::{collections::HashMap, sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use tokio::{sync::RwLock, task::JoinHandle};
use uuid::Uuid;

use super::machine::{transition, Action, Command, Effect, FetchOutcome, Transition};
use super::state::{SessionSnapshot, SessionState};
use crate::{
    error::{AppError, AppResult},
    services::Recommender,
};

/// Idle time after which an untouched session is discarded
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(60 * 60);

struct SessionEntry {
    state: SessionState,
    updated_at: DateTime<Utc>,
}

impl SessionEntry {
    fn snapshot(&self, id: Uuid) -> SessionSnapshot {
        self.state.snapshot(id, self.updated_at)
    }

    /// A session waiting on a fetch is never idle
    fn is_expired(&self, ttl: Duration, now: DateTime<Utc>) -> bool {
        if self.state.is_loading() {
            return false;
        }
        now.signed_duration_since(self.updated_at)
            .to_std()
            .map_or(false, |idle| idle > ttl)
    }
}

/// In-memory sessions, one state machine per user.
///
/// The map lock is only held while a transition is applied, never across a
/// model call, so a `GET` during a fetch observes the `loading` view.
/// Sessions idle for longer than the TTL are treated as gone.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, SessionEntry>>>,
    ttl: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_ttl(DEFAULT_SESSION_TTL)
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    pub async fn create(&self) -> SessionSnapshot {
        let id = Uuid::new_v4();
        let entry = SessionEntry {
            state: SessionState::new(),
            updated_at: Utc::now(),
        };
        let snapshot = entry.snapshot(id);
        self.sessions.write().await.insert(id, entry);

        tracing::info!(session_id = %id, "Session created");
        snapshot
    }

    pub async fn get(&self, id: Uuid) -> AppResult<SessionSnapshot> {
        self.sessions
            .read()
            .await
            .get(&id)
            .filter(|entry| !entry.is_expired(self.ttl, Utc::now()))
            .map(|entry| entry.snapshot(id))
            .ok_or(AppError::SessionNotFound(id))
    }

    /// Ends the session and discards its state
    pub async fn remove(&self, id: Uuid) -> AppResult<()> {
        let mut sessions = self.sessions.write().await;
        match sessions.remove(&id) {
            Some(entry) if !entry.is_expired(self.ttl, Utc::now()) => {}
            _ => return Err(AppError::SessionNotFound(id)),
        }

        tracing::info!(session_id = %id, "Session ended");
        Ok(())
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Drops every idle session and returns how many were removed
    pub async fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| !entry.is_expired(self.ttl, now));
        before - sessions.len()
    }

    /// Purges idle sessions on a fixed schedule until the runtime shuts down
    pub fn spawn_expiry_sweeper(&self, every: Duration) -> JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            loop {
                ticker.tick().await;
                if store.is_empty().await {
                    continue;
                }
                let purged = store.purge_expired().await;
                if purged > 0 {
                    let remaining = store.len().await;
                    tracing::info!(purged, remaining, "Expired idle sessions");
                }
            }
        })
    }

    /// Applies one action under the write lock and returns any effect to run
    async fn apply(&self, id: Uuid, action: Action) -> AppResult<(SessionSnapshot, Option<Effect>)> {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;
        let entry = sessions
            .get_mut(&id)
            .filter(|entry| !entry.is_expired(self.ttl, now))
            .ok_or(AppError::SessionNotFound(id))?;

        let Transition { state, effect } = transition(&entry.state, action);
        if state != entry.state {
            entry.state = state;
            entry.updated_at = now;
        }

        Ok((entry.snapshot(id), effect))
    }

    /// Runs a user command to completion.
    ///
    /// Submit commands wait for the model call and return the snapshot after
    /// the outcome has been applied; every other command returns at once.
    /// The fetch and its completion run on their own task, so a caller that
    /// goes away mid-fetch cannot leave the session in `loading`.
    pub async fn dispatch(
        &self,
        id: Uuid,
        command: Command,
        recommender: &Arc<Recommender>,
    ) -> AppResult<SessionSnapshot> {
        let (snapshot, effect) = self.apply(id, command.into()).await?;
        let Some(effect) = effect else {
            return Ok(snapshot);
        };

        let store = self.clone();
        let recommender = Arc::clone(recommender);
        let fetch = tokio::spawn(async move {
            let (ticket, outcome) = run_effect(id, effect, &recommender).await;
            let (snapshot, _) = store
                .apply(id, Action::Completed { ticket, outcome })
                .await?;
            Ok::<_, AppError>(snapshot)
        });

        fetch
            .await
            .map_err(|e| AppError::Internal(format!("session fetch task failed: {e}")))?
    }
}

async fn run_effect(id: Uuid, effect: Effect, recommender: &Recommender) -> (u64, FetchOutcome) {
    match effect {
        Effect::FetchRecommendations { ticket, answers } => {
            let outcome = match recommender.fetch_quiz_recommendations(&answers).await {
                Ok(set) => FetchOutcome::Recommendations(set),
                Err(e) => {
                    tracing::error!(session_id = %id, error = %e, "Quiz recommendations failed");
                    FetchOutcome::QuizFailed(e.to_string())
                }
            };
            (ticket, outcome)
        }
        Effect::SearchGame { ticket, query } => {
            let outcome = match recommender.search_game(&query).await {
                Ok(game) => FetchOutcome::GameFound(game),
                Err(e) => {
                    tracing::warn!(session_id = %id, query = %query, error = %e, "Game search failed");
                    FetchOutcome::SearchFailed
                }
            };
            (ticket, outcome)
        }
    }
}
