//! # Kaji Agent
//!
//! A conversational CLI secretary: free-text requests go to an
//! OpenAI-compatible chat model which may invoke at most one registered
//! tool per turn (todo list, time lookup, Google Calendar insertion),
//! then summarizes the result in natural language.
//!
//! ## Architecture
//!
//! ```text
//! CLI → Agent → Chat API (tools offered)
//!          ↓ at most one call
//!       Tool Invoker → Todo store (JSON file) / Calendar API
//!          ↓
//!       Chat API (no tools) → final answer
//! ```
//!
//! ## Example
//!
//! ```ignore
//! use kaji_agent::{Agent, ChatClient, Config};
//! use kaji_agent::calendar::CalendarClient;
//! use kaji_agent::store::TodoStore;
//! use kaji_agent::tools::ToolContext;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     let chat = ChatClient::new(&config.openai)?;
//!     let calendar = CalendarClient::new(config.calendar.clone())?;
//!     let store = TodoStore::new(config.store.todo_path.clone());
//!     let mut agent = Agent::new(chat, ToolContext { store, calendar }, &config);
//!     let answer = agent.step("牛乳を買うのをTODOに入れて").await?;
//!     println!("{}", answer);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]

/// Single-step conversation orchestrator.
pub mod agent;
/// Google Calendar client and OAuth consent flow.
pub mod calendar;
/// Interactive prompt loop.
pub mod cli;
/// Configuration management from environment variables.
pub mod config;
/// Error types and result aliases.
pub mod error;
/// Conversation history model and wire projection.
pub mod history;
/// OpenAI-compatible chat-completions client and wire types.
pub mod openai;
/// System prompt text.
pub mod prompts;
/// Flat JSON-file todo persistence.
pub mod store;
/// Tool registry and sanitizing invoker.
pub mod tools;

pub use agent::Agent;
pub use config::Config;
pub use error::{AppError, AppResult};
pub use openai::ChatClient;
