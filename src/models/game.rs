use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Fields every quiz recommendation must carry
pub const RECOMMENDATION_REQUIRED_FIELDS: &[&str] = &[
    "id",
    "steamAppId",
    "title",
    "description",
    "mainStoryTime",
    "completionistTime",
    "suitabilityScore",
    "imageUrl",
    "reasonForPick",
];

/// Fields a single search result must carry (suitability is optional there)
pub const SEARCH_REQUIRED_FIELDS: &[&str] = &[
    "id",
    "steamAppId",
    "title",
    "description",
    "mainStoryTime",
    "completionistTime",
    "imageUrl",
    "reasonForPick",
];

const STEAM_STORE_URL: &str = "https://store.steampowered.com/app";

/// Reasons a model response is rejected
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("response is not valid JSON: {0}")]
    NotJson(String),
    #[error("expected a JSON object but found {0}")]
    NotAnObject(&'static str),
    #[error("missing required field '{0}'")]
    MissingField(String),
    #[error("malformed field: {0}")]
    Malformed(String),
    #[error("recommendation {index}: {reason}")]
    Entry { index: usize, reason: Box<ValidationError> },
}

/// One game suggested by the model
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GameRecommendation {
    pub id: String,
    /// Numeric Steam App ID, kept as the string the model returned
    pub steam_app_id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Hours to finish the main story
    pub main_story_time: f64,
    /// Hours to 100% the game
    pub completionist_time: f64,
    #[serde(default)]
    pub suitability_score: Option<f64>,
    pub image_url: String,
    #[serde(default)]
    pub developer: Option<String>,
    pub reason_for_pick: String,
}

impl GameRecommendation {
    /// Validates a JSON value against `required` and converts it
    pub fn from_value(value: Value, required: &[&str]) -> Result<Self, ValidationError> {
        let object = value
            .as_object()
            .ok_or_else(|| ValidationError::NotAnObject(json_kind(&value)))?;

        if let Some(missing) = required
            .iter()
            .find(|field| object.get(**field).map_or(true, Value::is_null))
        {
            return Err(ValidationError::MissingField(missing.to_string()));
        }

        serde_json::from_value(value).map_err(|e| ValidationError::Malformed(e.to_string()))
    }

    /// Parses the raw text of a single-game lookup
    pub fn from_search_response(text: &str) -> Result<Self, ValidationError> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| ValidationError::NotJson(e.to_string()))?;
        Self::from_value(value, SEARCH_REQUIRED_FIELDS)
    }

    pub fn has_numeric_app_id(&self) -> bool {
        !self.steam_app_id.is_empty() && self.steam_app_id.chars().all(|c| c.is_ascii_digit())
    }

    /// Steam store page, when the app id looks usable
    pub fn store_url(&self) -> Option<String> {
        self.has_numeric_app_id()
            .then(|| format!("{}/{}/", STEAM_STORE_URL, self.steam_app_id))
    }
}

/// How well the model thinks its picks match the answers
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccuracyAssessment {
    #[serde(default)]
    pub percentage: f64,
    #[serde(default = "unknown_reasoning")]
    pub reasoning: String,
}

fn unknown_reasoning() -> String {
    "Unknown".to_string()
}

impl Default for AccuracyAssessment {
    fn default() -> Self {
        Self {
            percentage: 0.0,
            reasoning: unknown_reasoning(),
        }
    }
}

impl AccuracyAssessment {
    /// Assessment attached to a direct search result
    pub fn direct_search_match() -> Self {
        Self {
            percentage: 100.0,
            reasoning: "Direct search match.".to_string(),
        }
    }
}

/// Validated result of a quiz-based fetch
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecommendationSet {
    pub recommendations: Vec<GameRecommendation>,
    pub accuracy: AccuracyAssessment,
}

impl RecommendationSet {
    /// Parses and validates the raw text of a quiz response.
    ///
    /// A missing `recommendations` key yields an empty list and a missing
    /// `accuracy` key yields the "Unknown" assessment. Any entry that lacks a
    /// required field rejects the whole response.
    pub fn from_response_text(text: &str) -> Result<Self, ValidationError> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| ValidationError::NotJson(e.to_string()))?;
        let mut object = match value {
            Value::Object(object) => object,
            other => return Err(ValidationError::NotAnObject(json_kind(&other))),
        };

        let recommendations = match object.remove("recommendations") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items
                .into_iter()
                .enumerate()
                .map(|(index, item)| {
                    GameRecommendation::from_value(item, RECOMMENDATION_REQUIRED_FIELDS).map_err(
                        |reason| ValidationError::Entry {
                            index,
                            reason: Box::new(reason),
                        },
                    )
                })
                .collect::<Result<Vec<_>, _>>()?,
            Some(other) => {
                return Err(ValidationError::Malformed(format!(
                    "'recommendations' must be an array, found {}",
                    json_kind(&other)
                )))
            }
        };

        let accuracy = match object.remove("accuracy") {
            None | Some(Value::Null) => AccuracyAssessment::default(),
            Some(value @ Value::Object(_)) => serde_json::from_value(value)
                .map_err(|e| ValidationError::Malformed(format!("accuracy: {}", e)))?,
            Some(other) => {
                return Err(ValidationError::Malformed(format!(
                    "'accuracy' must be an object, found {}",
                    json_kind(&other)
                )))
            }
        };

        Ok(Self {
            recommendations,
            accuracy,
        })
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn hades() -> Value {
        json!({
            "id": "hades",
            "steamAppId": "1145360",
            "title": "Hades",
            "description": "Defy the god of the dead.",
            "genres": ["Action", "Roguelike"],
            "mainStoryTime": 22.5,
            "completionistTime": 95,
            "suitabilityScore": 92,
            "imageUrl": "https://cdn.akamai.steamstatic.com/steam/apps/1145360/header.jpg",
            "developer": "Supergiant Games",
            "reasonForPick": "Tight runs that fit a medium schedule."
        })
    }

    #[test]
    fn test_parse_full_response() {
        let text = json!({
            "recommendations": [hades()],
            "accuracy": { "percentage": 87, "reasoning": "Strong genre overlap." }
        })
        .to_string();

        let set = RecommendationSet::from_response_text(&text).unwrap();
        assert_eq!(set.recommendations.len(), 1);
        let game = &set.recommendations[0];
        assert_eq!(game.title, "Hades");
        assert_eq!(game.completionist_time, 95.0);
        assert_eq!(game.suitability_score, Some(92.0));
        assert!(game.tags.is_empty());
        assert_eq!(set.accuracy.percentage, 87.0);
        assert_eq!(set.accuracy.reasoning, "Strong genre overlap.");
    }

    #[test]
    fn test_missing_accuracy_defaults_to_unknown() {
        let text = json!({ "recommendations": [hades()] }).to_string();
        let set = RecommendationSet::from_response_text(&text).unwrap();
        assert_eq!(set.accuracy.percentage, 0.0);
        assert_eq!(set.accuracy.reasoning, "Unknown");
    }

    #[test]
    fn test_partial_accuracy_fills_missing_fields() {
        let text = json!({ "accuracy": { "percentage": 40 } }).to_string();
        let set = RecommendationSet::from_response_text(&text).unwrap();
        assert_eq!(set.accuracy.percentage, 40.0);
        assert_eq!(set.accuracy.reasoning, "Unknown");
    }

    #[test]
    fn test_missing_recommendations_yields_empty_list() {
        let text = json!({ "accuracy": { "percentage": 10, "reasoning": "Thin" } }).to_string();
        let set = RecommendationSet::from_response_text(&text).unwrap();
        assert!(set.recommendations.is_empty());
    }

    #[test]
    fn test_non_json_is_rejected() {
        let result = RecommendationSet::from_response_text("Sorry, I can't help with that.");
        assert!(matches!(result, Err(ValidationError::NotJson(_))));
    }

    #[test]
    fn test_non_object_is_rejected() {
        let result = RecommendationSet::from_response_text("[1, 2, 3]");
        assert_eq!(result, Err(ValidationError::NotAnObject("array")));
    }

    #[test]
    fn test_entry_missing_required_field_rejects_response() {
        let mut broken = hades();
        broken.as_object_mut().unwrap().remove("reasonForPick");
        let text = json!({ "recommendations": [hades(), broken] }).to_string();

        let err = RecommendationSet::from_response_text(&text).unwrap_err();
        assert_eq!(
            err,
            ValidationError::Entry {
                index: 1,
                reason: Box::new(ValidationError::MissingField("reasonForPick".to_string())),
            }
        );
    }

    #[test]
    fn test_null_required_field_counts_as_missing() {
        let mut broken = hades();
        broken["steamAppId"] = Value::Null;
        let result = GameRecommendation::from_value(broken, RECOMMENDATION_REQUIRED_FIELDS);
        assert_eq!(
            result,
            Err(ValidationError::MissingField("steamAppId".to_string()))
        );
    }

    #[test]
    fn test_wrong_field_type_is_malformed() {
        let mut broken = hades();
        broken["mainStoryTime"] = json!("about twenty hours");
        let result = GameRecommendation::from_value(broken, RECOMMENDATION_REQUIRED_FIELDS);
        assert!(matches!(result, Err(ValidationError::Malformed(_))));
    }

    #[test]
    fn test_search_response_allows_missing_suitability() {
        let mut game = hades();
        game.as_object_mut().unwrap().remove("suitabilityScore");
        let parsed = GameRecommendation::from_search_response(&game.to_string()).unwrap();
        assert_eq!(parsed.suitability_score, None);
        assert_eq!(parsed.developer.as_deref(), Some("Supergiant Games"));
    }

    #[test]
    fn test_quiz_entry_requires_suitability() {
        let mut game = hades();
        game.as_object_mut().unwrap().remove("suitabilityScore");
        let result = GameRecommendation::from_value(game, RECOMMENDATION_REQUIRED_FIELDS);
        assert_eq!(
            result,
            Err(ValidationError::MissingField("suitabilityScore".to_string()))
        );
    }

    #[test]
    fn test_store_url() {
        let game = GameRecommendation::from_value(hades(), RECOMMENDATION_REQUIRED_FIELDS).unwrap();
        assert_eq!(
            game.store_url().as_deref(),
            Some("https://store.steampowered.com/app/1145360/")
        );

        let mut odd = game.clone();
        odd.steam_app_id = "hades-steam".to_string();
        assert_eq!(odd.store_url(), None);
    }

    #[test]
    fn test_direct_search_sentinel() {
        let accuracy = AccuracyAssessment::direct_search_match();
        assert_eq!(accuracy.percentage, 100.0);
        assert_eq!(accuracy.reasoning, "Direct search match.");
    }
}
