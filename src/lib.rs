pub mod avatar;
pub mod backend;
pub mod commands;
pub mod companion;
pub mod config;
pub mod display;
/// Mood/expression state machine driving the avatar from chat turns.
pub mod engine;
pub mod expression;
pub mod llm;
pub mod metrics;
pub mod mock;
pub mod mood;
pub mod personas;
pub mod reply;
pub mod session;
