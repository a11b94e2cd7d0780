pub mod credentials;
pub mod model;
pub mod prompts;
pub mod recommender;

pub use credentials::{ApiKey, CredentialProvider, EnvCredentials, StaticCredentials};
pub use model::{GeminiModel, GenerativeModel, ModelError, ModelResult};
pub use recommender::{Recommender, RecommenderError, RecommenderResult};
