//! Single-step orchestrator.
//!
//! One user turn runs through at most two model requests and one tool
//! invocation: completion with tools offered, optional single tool
//! call, then a final completion without tools so the answer is always
//! natural language.

use serde_json::Value;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::AppResult;
use crate::history::{History, Turn};
use crate::openai::{ChatClient, ChatRequest};
use crate::prompts::SYSTEM_PROMPT;
use crate::tools::{call_tool, tool_defs, ToolContext};

/// Localized rejection for empty or oversized user input.
pub const INVALID_INPUT_MESSAGE: &str = "入力が無効です。1000文字以内で入力してください。";

/// Localized message when tool-call arguments fail to parse.
pub const ARGUMENT_PARSE_MESSAGE: &str = "ツール引数の解析に失敗しました。";

/// Placeholder when the model returns an empty message body.
const NO_CONTENT: &str = "(no content)";

/// The conversational agent: owns the history context and collaborators.
pub struct Agent {
    chat: ChatClient,
    tools: ToolContext,
    history: History,
    model: String,
    max_input_chars: usize,
}

impl Agent {
    /// Create an agent with a fresh conversation
    pub fn new(chat: ChatClient, tools: ToolContext, config: &Config) -> Self {
        Self {
            chat,
            tools,
            history: History::new(SYSTEM_PROMPT, config.agent.max_history),
            model: config.openai.model.clone(),
            max_input_chars: config.agent.max_input_chars,
        }
    }

    /// The conversation history (for inspection and tests)
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Process one user utterance and return the final answer.
    ///
    /// Input validation happens before any history mutation or network
    /// call. Transport failures propagate; history appended up to the
    /// failure point is retained.
    pub async fn step(&mut self, input: &str) -> AppResult<String> {
        if input.trim().is_empty() || input.chars().count() > self.max_input_chars {
            return Ok(INVALID_INPUT_MESSAGE.to_string());
        }

        self.history.push(Turn::user(input));
        self.history.trim();

        let request =
            ChatRequest::new(&self.model, self.history.project()).with_tools(tool_defs());
        let message = self.chat.chat(&request).await?;

        let calls = message.requested_calls().to_vec();
        if calls.is_empty() {
            let text = message.content.unwrap_or_else(|| NO_CONTENT.to_string());
            self.history.push(Turn::assistant(text.clone()));
            return Ok(text);
        }

        // At most one tool execution per turn: only the first requested
        // call runs, the rest are recorded in the assistant turn and
        // otherwise ignored.
        let call = calls[0].clone();
        if calls.len() > 1 {
            debug!(
                requested = calls.len(),
                "Model requested multiple tool calls, executing only the first"
            );
        }
        self.history.push(Turn::assistant_with_calls(
            message.content.unwrap_or_default(),
            calls,
        ));

        let args = match parse_call_arguments(&call.function.arguments) {
            Ok(args) => args,
            Err(reason) => {
                warn!(
                    tool = %call.function.name,
                    reason = %reason,
                    "Tool-call arguments failed to parse"
                );
                return Ok(ARGUMENT_PARSE_MESSAGE.to_string());
            }
        };

        let result = call_tool(&self.tools, &call.function.name, &args).await;
        self.history
            .push(Turn::tool(&call.function.name, &call.id, &result));

        // Final completion without tools: forces a natural-language
        // answer and rules out a second tool round.
        let follow = ChatRequest::new(&self.model, self.history.project());
        let final_message = self.chat.chat(&follow).await?;

        let text = final_message
            .content
            .unwrap_or_else(|| NO_CONTENT.to_string());
        self.history.push(Turn::assistant(text.clone()));
        Ok(text)
    }
}

/// Parse a tool call's raw argument payload.
///
/// An empty payload reads as `{}` so no-parameter tools work whatever
/// the model serializes. Anything that is not a JSON object is
/// rejected.
fn parse_call_arguments(raw: &str) -> Result<Value, String> {
    if raw.trim().is_empty() {
        return Ok(Value::Object(serde_json::Map::new()));
    }
    let value: Value = serde_json::from_str(raw).map_err(|e| e.to_string())?;
    if !value.is_object() {
        return Err("arguments are not a JSON object".to_string());
    }
    Ok(value)
}
