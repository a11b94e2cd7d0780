//! Prompt templates and response schemas for the recommender.
//!
//! Required-field lists come from `models` so the schema sent to the model
//! and the validation applied to its answer cannot drift apart.

use serde_json::{json, Value};

use crate::models::{QuizAnswers, RECOMMENDATION_REQUIRED_FIELDS, SEARCH_REQUIRED_FIELDS};

/// Number of games asked for per quiz. Not enforced on the response.
pub const REQUESTED_RECOMMENDATIONS: usize = 6;

fn game_properties() -> Value {
    json!({
        "id": { "type": "string" },
        "steamAppId": { "type": "string", "description": "The numeric Steam App ID." },
        "title": { "type": "string" },
        "description": { "type": "string" },
        "genres": { "type": "array", "items": { "type": "string" } },
        "tags": { "type": "array", "items": { "type": "string" } },
        "mainStoryTime": { "type": "number", "description": "Hours to finish the main story." },
        "completionistTime": { "type": "number", "description": "Hours to complete everything." },
        "suitabilityScore": { "type": "number", "minimum": 0, "maximum": 100 },
        "imageUrl": { "type": "string" },
        "developer": { "type": "string" },
        "reasonForPick": { "type": "string" }
    })
}

/// Schema for a quiz response: recommendations plus an accuracy assessment
pub fn quiz_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "recommendations": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": game_properties(),
                    "required": RECOMMENDATION_REQUIRED_FIELDS
                }
            },
            "accuracy": {
                "type": "object",
                "properties": {
                    "percentage": { "type": "number", "minimum": 0, "maximum": 100 },
                    "reasoning": { "type": "string" }
                },
                "required": ["percentage", "reasoning"]
            }
        },
        "required": ["recommendations", "accuracy"]
    })
}

/// Schema for a single-game lookup
pub fn search_schema() -> Value {
    json!({
        "type": "object",
        "properties": game_properties(),
        "required": SEARCH_REQUIRED_FIELDS
    })
}

pub fn quiz_prompt(answers: &QuizAnswers) -> String {
    let keywords = answers.specific_keywords.trim();
    let keywords = if keywords.is_empty() { "none" } else { keywords };

    format!(
        "Act as a world-class Steam curator. Suggest {count} real video games that are currently \
         available to buy on Steam.\n\
         Genres: {genres}. Playstyle: {playstyle}. Time available: {time}. Keywords: {keywords}.\n\
         Identify the correct numeric Steam App ID for each game. Estimate playtimes in hours for \
         the main story and for completionists. Calculate a suitabilityScore (0-100) for each pick \
         and explain the pick in reasonForPick. In accuracy, rate from 0 to 100 how well the whole \
         set matches these preferences and explain why.",
        count = REQUESTED_RECOMMENDATIONS,
        genres = answers.genre_list(),
        playstyle = answers.playstyle,
        time = answers.time_availability,
        keywords = keywords,
    )
}

pub fn search_prompt(query: &str) -> String {
    format!(
        "Search for the video game \"{}\". Provide its numeric steamAppId and full metadata \
         including playtimes and description.",
        query
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Genre, Playstyle, TimeAvailability};

    #[test]
    fn test_quiz_prompt_interpolates_answers() {
        let mut answers = QuizAnswers::new();
        answers.toggle_genre(Genre::Rpg);
        answers.toggle_genre(Genre::Indie);
        answers.playstyle = Playstyle::Hardcore;
        answers.time_availability = TimeAvailability::Long;
        answers.specific_keywords = "  pixel art ".to_string();

        let prompt = quiz_prompt(&answers);
        assert!(prompt.contains("Suggest 6 real video games"));
        assert!(prompt.contains("Genres: RPG, Indie."));
        assert!(prompt.contains("Playstyle: hardcore."));
        assert!(prompt.contains("Time available: long."));
        assert!(prompt.contains("Keywords: pixel art."));
    }

    #[test]
    fn test_quiz_prompt_without_keywords() {
        let prompt = quiz_prompt(&QuizAnswers::new());
        assert!(prompt.contains("Keywords: none."));
    }

    #[test]
    fn test_search_prompt_quotes_query() {
        assert!(search_prompt("Portal 2").contains("\"Portal 2\""));
    }

    #[test]
    fn test_schemas_share_required_fields() {
        let quiz = quiz_schema();
        let required = &quiz["properties"]["recommendations"]["items"]["required"];
        assert_eq!(required.as_array().unwrap().len(), RECOMMENDATION_REQUIRED_FIELDS.len());

        let search = search_schema();
        let required: Vec<&str> = search["required"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|v| v.as_str())
            .collect();
        assert!(!required.contains(&"suitabilityScore"));
        assert!(required.contains(&"steamAppId"));
    }
}
