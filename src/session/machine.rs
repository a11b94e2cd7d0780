//! View state machine.
//!
//! `transition` is a pure function from the current state and an action to
//! the next state, plus at most one side effect for the caller to run. The
//! caller reports the effect's result back as an [`Action::Completed`]
//! carrying the same ticket.
//!
//! Single-flight policy: while a fetch is in flight (`View::Loading`) new
//! submits and quiz starts are ignored. `Restart` is always honoured and
//! orphans the in-flight fetch, so its completion is dropped.

use serde::{Deserialize, Serialize};

use super::state::{SessionState, View};
use crate::models::{
    AccuracyAssessment, GameRecommendation, Genre, Playstyle, QuizAnswers, RecommendationSet,
    TimeAvailability, LAST_QUIZ_STEP,
};

/// Shown when a quiz fetch fails without a message of its own
pub const QUIZ_FAILURE_FALLBACK: &str =
    "Error loading recommendations. Please ensure your API key is set.";

/// Shown for every failed direct search
pub const SEARCH_FAILURE_MESSAGE: &str = "Game not found or API error.";

/// User commands accepted by a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    StartQuiz,
    GoToStep { step: i32 },
    NextStep,
    PrevStep,
    ToggleGenre { genre: Genre },
    SetPlaystyle { playstyle: Playstyle },
    SetTimeAvailability {
        #[serde(rename = "timeAvailability")]
        time_availability: TimeAvailability,
    },
    SetKeywords { keywords: String },
    SubmitQuiz,
    SetSearchQuery { query: String },
    SubmitSearch,
    Restart,
    RetakeQuiz,
}

/// Result of a fetch effect, fed back into the machine
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Recommendations(RecommendationSet),
    QuizFailed(String),
    GameFound(GameRecommendation),
    SearchFailed,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Command(Command),
    Completed { ticket: u64, outcome: FetchOutcome },
}

impl From<Command> for Action {
    fn from(command: Command) -> Self {
        Action::Command(command)
    }
}

/// Work the caller must perform after a transition
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    FetchRecommendations { ticket: u64, answers: QuizAnswers },
    SearchGame { ticket: u64, query: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: SessionState,
    pub effect: Option<Effect>,
}

impl Transition {
    fn to(state: SessionState) -> Self {
        Self {
            state,
            effect: None,
        }
    }
}

pub fn transition(current: &SessionState, action: Action) -> Transition {
    let mut state = current.clone();
    match action {
        Action::Command(command) => apply_command(state, command),
        Action::Completed { ticket, outcome } => {
            if state.in_flight != Some(ticket) || state.view != View::Loading {
                tracing::debug!(ticket, "Dropping stale fetch completion");
                return Transition::to(state);
            }
            complete_fetch(&mut state, outcome);
            Transition::to(state)
        }
    }
}

fn apply_command(mut state: SessionState, command: Command) -> Transition {
    let in_quiz = state.view == View::Quiz;
    let step = i32::from(state.quiz_step);

    match command {
        Command::StartQuiz => {
            if !state.is_loading() {
                enter_quiz(&mut state);
            }
        }
        Command::RetakeQuiz => {
            if state.view == View::Results {
                enter_quiz(&mut state);
            }
        }
        Command::GoToStep { step: target } if in_quiz => go_to_step(&mut state, target),
        Command::NextStep if in_quiz => go_to_step(&mut state, step + 1),
        Command::PrevStep if in_quiz => go_to_step(&mut state, step - 1),
        Command::ToggleGenre { genre } if in_quiz => state.answers.toggle_genre(genre),
        Command::SetPlaystyle { playstyle } if in_quiz => state.answers.playstyle = playstyle,
        Command::SetTimeAvailability { time_availability } if in_quiz => {
            state.answers.time_availability = time_availability
        }
        Command::SetKeywords { keywords } if in_quiz => state.answers.specific_keywords = keywords,
        Command::SubmitQuiz => {
            if in_quiz && state.answers.has_genres() {
                let ticket = begin_loading(&mut state);
                let answers = state.answers.clone();
                return Transition {
                    state,
                    effect: Some(Effect::FetchRecommendations { ticket, answers }),
                };
            }
        }
        Command::SetSearchQuery { query } => state.search_query = query,
        Command::SubmitSearch => {
            let query = state.search_query.trim().to_string();
            if !query.is_empty() && !state.is_loading() {
                let ticket = begin_loading(&mut state);
                state.is_searching = true;
                return Transition {
                    state,
                    effect: Some(Effect::SearchGame { ticket, query }),
                };
            }
        }
        Command::Restart => {
            state.view = View::Welcome;
            state.in_flight = None;
            state.is_searching = false;
            reset_quiz(&mut state);
        }
        // Quiz edits outside the quiz view
        Command::GoToStep { .. }
        | Command::NextStep
        | Command::PrevStep
        | Command::ToggleGenre { .. }
        | Command::SetPlaystyle { .. }
        | Command::SetTimeAvailability { .. }
        | Command::SetKeywords { .. } => {}
    }

    Transition::to(state)
}

fn reset_quiz(state: &mut SessionState) {
    state.quiz_step = 0;
    state.answers = QuizAnswers::new();
}

fn enter_quiz(state: &mut SessionState) {
    state.view = View::Quiz;
    reset_quiz(state);
}

/// Moves within [0, LAST_QUIZ_STEP]; leaving step 0 needs a genre
fn go_to_step(state: &mut SessionState, step: i32) {
    let target = step.clamp(0, i32::from(LAST_QUIZ_STEP)) as u8;
    if target > state.quiz_step && !state.can_advance() {
        return;
    }
    state.quiz_step = target;
}

fn begin_loading(state: &mut SessionState) -> u64 {
    let ticket = state.next_ticket;
    state.next_ticket += 1;
    state.in_flight = Some(ticket);
    state.view = View::Loading;
    state.error_message.clear();
    state.recommendations.clear();
    state.accuracy = None;
    ticket
}

fn complete_fetch(state: &mut SessionState, outcome: FetchOutcome) {
    state.in_flight = None;
    state.is_searching = false;

    match outcome {
        FetchOutcome::Recommendations(set) => {
            state.recommendations = set.recommendations;
            state.accuracy = Some(set.accuracy);
            state.view = View::Results;
        }
        FetchOutcome::QuizFailed(message) => {
            state.error_message = if message.trim().is_empty() {
                QUIZ_FAILURE_FALLBACK.to_string()
            } else {
                message
            };
            state.view = View::Welcome;
        }
        FetchOutcome::GameFound(game) => {
            state.recommendations = vec![game];
            state.accuracy = Some(AccuracyAssessment::direct_search_match());
            state.search_query.clear();
            state.view = View::Results;
        }
        FetchOutcome::SearchFailed => {
            state.error_message = SEARCH_FAILURE_MESSAGE.to_string();
            state.view = View::Welcome;
        }
    }
}
