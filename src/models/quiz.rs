use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Last step index of the quiz (steps run 0..=LAST_QUIZ_STEP)
pub const LAST_QUIZ_STEP: u8 = 3;

/// Genres offered on the first quiz step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Genre {
    Action,
    #[serde(rename = "RPG")]
    Rpg,
    Strategy,
    Indie,
    Adventure,
    Simulation,
    Horror,
    Puzzle,
    Sports,
    Racing,
}

impl Genre {
    pub const ALL: [Genre; 10] = [
        Genre::Action,
        Genre::Rpg,
        Genre::Strategy,
        Genre::Indie,
        Genre::Adventure,
        Genre::Simulation,
        Genre::Horror,
        Genre::Puzzle,
        Genre::Sports,
        Genre::Racing,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Genre::Action => "Action",
            Genre::Rpg => "RPG",
            Genre::Strategy => "Strategy",
            Genre::Indie => "Indie",
            Genre::Adventure => "Adventure",
            Genre::Simulation => "Simulation",
            Genre::Horror => "Horror",
            Genre::Puzzle => "Puzzle",
            Genre::Sports => "Sports",
            Genre::Racing => "Racing",
        }
    }
}

impl Display for Genre {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// How the player likes to play
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Playstyle {
    Casual,
    #[default]
    Balanced,
    Hardcore,
}

impl Playstyle {
    pub const ALL: [Playstyle; 3] = [Playstyle::Casual, Playstyle::Balanced, Playstyle::Hardcore];
}

impl Display for Playstyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Playstyle::Casual => "casual",
            Playstyle::Balanced => "balanced",
            Playstyle::Hardcore => "hardcore",
        };
        write!(f, "{}", name)
    }
}

/// How much time the player can put into a game
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeAvailability {
    Short,
    #[default]
    Medium,
    Long,
}

impl TimeAvailability {
    pub const ALL: [TimeAvailability; 3] = [
        TimeAvailability::Short,
        TimeAvailability::Medium,
        TimeAvailability::Long,
    ];
}

impl Display for TimeAvailability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TimeAvailability::Short => "short",
            TimeAvailability::Medium => "medium",
            TimeAvailability::Long => "long",
        };
        write!(f, "{}", name)
    }
}

/// Answers collected across the quiz steps
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuizAnswers {
    /// Selected genres, in selection order, without duplicates
    pub preferred_genres: Vec<Genre>,
    pub playstyle: Playstyle,
    pub time_availability: TimeAvailability,
    pub specific_keywords: String,
}

impl QuizAnswers {
    /// Creates answers with the quiz defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the genre if absent, removes it otherwise
    pub fn toggle_genre(&mut self, genre: Genre) {
        if let Some(pos) = self.preferred_genres.iter().position(|g| *g == genre) {
            self.preferred_genres.remove(pos);
        } else {
            self.preferred_genres.push(genre);
        }
    }

    pub fn has_genres(&self) -> bool {
        !self.preferred_genres.is_empty()
    }

    /// Comma separated genre labels for prompt building
    pub fn genre_list(&self) -> String {
        self.preferred_genres
            .iter()
            .map(Genre::label)
            .collect::<Vec<_>>()
            .join(", ")
    }
}
