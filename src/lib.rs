//! Steam Quest: a quiz-driven game recommendation service.
//!
//! A session walks through a small state machine (welcome, quiz, loading,
//! results). Quiz answers or a search query are turned into a prompt for a
//! Gemini model that answers with schema-constrained JSON, which is validated
//! before it reaches the session.

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod services;
pub mod session;
