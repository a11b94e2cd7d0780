use std::{sync::Arc, time::Duration};

use serde_json::Value;
use thiserror::Error;

use crate::{
    models::{GameRecommendation, QuizAnswers, RecommendationSet},
    services::{
        credentials::{ApiKey, CredentialProvider},
        model::{GenerativeModel, ModelError},
        prompts,
    },
};

/// Error types for the recommendation client
#[derive(Debug, Error)]
pub enum RecommenderError {
    /// No API key configured. Raised before any request is made.
    #[error("{var} is not set. Export it or add it to your .env file to enable recommendations.")]
    MissingCredential { var: &'static str },

    #[error("{0}")]
    RecommendationFetch(String),

    #[error("game search failed: {0}")]
    GameSearch(String),
}

pub type RecommenderResult<T> = Result<T, RecommenderError>;

/// Failure inside a single model round trip, before it is mapped to the
/// operation's error
#[derive(Debug, Error)]
enum CallError {
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error("no response from the model within {0:?}")]
    Timeout(Duration),
}

/// Builds prompts, calls the model under a timeout and validates the answer
pub struct Recommender {
    model: Arc<dyn GenerativeModel>,
    credentials: Arc<dyn CredentialProvider>,
    timeout: Duration,
}

impl Recommender {
    pub fn new(
        model: Arc<dyn GenerativeModel>,
        credentials: Arc<dyn CredentialProvider>,
        timeout: Duration,
    ) -> Self {
        Self {
            model,
            credentials,
            timeout,
        }
    }

    fn api_key(&self) -> RecommenderResult<ApiKey> {
        self.credentials
            .api_key()
            .ok_or_else(|| RecommenderError::MissingCredential {
                var: self.credentials.source_name(),
            })
    }

    async fn call(&self, api_key: &ApiKey, prompt: &str, schema: &Value) -> Result<String, CallError> {
        tokio::time::timeout(
            self.timeout,
            self.model.generate_json(api_key, prompt, schema),
        )
        .await
        .map_err(|_| CallError::Timeout(self.timeout))?
        .map_err(CallError::from)
    }

    /// Asks the model for games matching the quiz answers
    pub async fn fetch_quiz_recommendations(
        &self,
        answers: &QuizAnswers,
    ) -> RecommenderResult<RecommendationSet> {
        let api_key = self.api_key()?;
        let prompt = prompts::quiz_prompt(answers);

        tracing::info!(
            genres = %answers.genre_list(),
            playstyle = %answers.playstyle,
            time_availability = %answers.time_availability,
            "Requesting quiz recommendations"
        );

        let text = self
            .call(&api_key, &prompt, &prompts::quiz_schema())
            .await
            .map_err(|e| RecommenderError::RecommendationFetch(e.to_string()))?;

        let set = RecommendationSet::from_response_text(&text).map_err(|e| {
            tracing::error!(error = %e, "Quiz response failed validation");
            RecommenderError::RecommendationFetch(format!("invalid model response: {}", e))
        })?;

        for game in set
            .recommendations
            .iter()
            .filter(|game| !game.has_numeric_app_id())
        {
            tracing::warn!(title = %game.title, steam_app_id = %game.steam_app_id, "Non-numeric Steam App ID");
        }

        tracing::info!(
            recommendations = set.recommendations.len(),
            accuracy = set.accuracy.percentage,
            "Quiz recommendations received"
        );

        Ok(set)
    }

    /// Looks up one game by name
    pub async fn search_game(&self, query: &str) -> RecommenderResult<GameRecommendation> {
        let api_key = self.api_key()?;
        let query = query.trim();
        if query.is_empty() {
            return Err(RecommenderError::GameSearch(
                "search query cannot be empty".to_string(),
            ));
        }

        tracing::info!(query = %query, "Searching for game");

        let text = self
            .call(&api_key, &prompts::search_prompt(query), &prompts::search_schema())
            .await
            .map_err(|e| RecommenderError::GameSearch(e.to_string()))?;

        let game = GameRecommendation::from_search_response(&text)
            .map_err(|e| RecommenderError::GameSearch(format!("invalid model response: {}", e)))?;

        tracing::info!(query = %query, title = %game.title, "Game search matched");

        Ok(game)
    }
}
