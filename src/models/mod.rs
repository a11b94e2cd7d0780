mod game;
mod quiz;

pub use game::{
    AccuracyAssessment, GameRecommendation, RecommendationSet, ValidationError,
    RECOMMENDATION_REQUIRED_FIELDS, SEARCH_REQUIRED_FIELDS,
};
pub use quiz::{Genre, Playstyle, QuizAnswers, TimeAvailability, LAST_QUIZ_STEP};
