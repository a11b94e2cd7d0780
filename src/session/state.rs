use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{AccuracyAssessment, GameRecommendation, QuizAnswers, LAST_QUIZ_STEP};

/// Screen the session is currently showing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    #[default]
    Welcome,
    Quiz,
    Loading,
    Results,
}

/// Everything one user session knows about itself
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub view: View,
    pub quiz_step: u8,
    pub answers: QuizAnswers,
    pub search_query: String,
    pub is_searching: bool,
    pub recommendations: Vec<GameRecommendation>,
    pub accuracy: Option<AccuracyAssessment>,
    /// Empty when there is nothing to show
    pub error_message: String,
    /// Ticket of the fetch whose completion is still awaited
    pub in_flight: Option<u64>,
    pub(crate) next_ticket: u64,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the quiz may move past the current step
    pub fn can_advance(&self) -> bool {
        if self.quiz_step == 0 {
            self.answers.has_genres()
        } else {
            true
        }
    }

    pub fn progress_percentage(&self) -> u8 {
        ((u16::from(self.quiz_step) + 1) * 100 / (u16::from(LAST_QUIZ_STEP) + 1)) as u8
    }

    pub fn is_loading(&self) -> bool {
        self.view == View::Loading
    }

    pub fn snapshot(&self, id: Uuid, updated_at: DateTime<Utc>) -> SessionSnapshot {
        SessionSnapshot {
            id,
            view: self.view,
            quiz_step: self.quiz_step,
            progress_percentage: self.progress_percentage(),
            can_advance: self.can_advance(),
            answers: self.answers.clone(),
            search_query: self.search_query.clone(),
            is_searching: self.is_searching,
            recommendations: self.recommendations.iter().map(GameCard::from).collect(),
            accuracy: self.accuracy.clone(),
            error_message: self.error_message.clone(),
            updated_at,
        }
    }
}

/// A recommendation as rendered on a results card
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameCard {
    #[serde(flatten)]
    pub game: GameRecommendation,
    #[serde(rename = "storeUrl")]
    pub store_url: Option<String>,
}

impl From<&GameRecommendation> for GameCard {
    fn from(game: &GameRecommendation) -> Self {
        Self {
            store_url: game.store_url(),
            game: game.clone(),
        }
    }
}

/// Observable view of a session returned by the API
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub id: Uuid,
    pub view: View,
    pub quiz_step: u8,
    pub progress_percentage: u8,
    pub can_advance: bool,
    pub answers: QuizAnswers,
    pub search_query: String,
    pub is_searching: bool,
    pub recommendations: Vec<GameCard>,
    pub accuracy: Option<AccuracyAssessment>,
    pub error_message: String,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Genre;

    #[test]
    fn test_new_session_starts_on_welcome() {
        let state = SessionState::new();
        assert_eq!(state.view, View::Welcome);
        assert_eq!(state.quiz_step, 0);
        assert!(state.error_message.is_empty());
        assert!(state.in_flight.is_none());
    }

    #[test]
    fn test_can_advance_depends_on_genres_at_step_zero() {
        let mut state = SessionState::new();
        assert!(!state.can_advance());

        state.answers.toggle_genre(Genre::Strategy);
        assert!(state.can_advance());

        state.answers.toggle_genre(Genre::Strategy);
        state.quiz_step = 2;
        assert!(state.can_advance());
    }

    #[test]
    fn test_progress_percentage() {
        let mut state = SessionState::new();
        let progress: Vec<u8> = (0..=LAST_QUIZ_STEP)
            .map(|step| {
                state.quiz_step = step;
                state.progress_percentage()
            })
            .collect();
        assert_eq!(progress, vec![25, 50, 75, 100]);
    }

    #[test]
    fn test_view_serialization() {
        assert_eq!(serde_json::to_string(&View::Loading).unwrap(), "\"loading\"");
    }

    #[test]
    fn test_snapshot_uses_camel_case_keys() {
        let snapshot = SessionState::new().snapshot(Uuid::nil(), Utc::now());
        let value = serde_json::to_value(&snapshot).unwrap();
        for key in [
            "quizStep",
            "progressPercentage",
            "canAdvance",
            "searchQuery",
            "isSearching",
            "errorMessage",
            "updatedAt",
        ] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
        assert!(value.get("error_message").is_none());
        assert_eq!(value["answers"]["timeAvailability"], "medium");
    }
}
