mod machine;
mod state;
mod store;

pub use machine::{
    transition, Action, Command, Effect, FetchOutcome, Transition, QUIZ_FAILURE_FALLBACK,
    SEARCH_FAILURE_MESSAGE,
};
pub use state::{GameCard, SessionSnapshot, SessionState, View};
pub use store::SessionStore;
