//! OpenAI-compatible chat-completions client and wire types.

mod client;
mod types;

pub use client::ChatClient;
pub use types::{
    ChatRequest, ChatResponse, Choice, FunctionCall, FunctionDef, ResponseMessage, Role, ToolCall,
    ToolDef, WireMessage,
};
