//! Conversation history: the ordered turn sequence replayed to the model.

use crate::openai::{Role, ToolCall, WireMessage};

/// One conversation turn, tagged by role.
#[derive(Debug, Clone)]
pub struct Turn {
    pub role: Role,
    pub content: String,
    /// Tool name, set on tool-role turns.
    pub name: Option<String>,
    /// Correlation id, set on tool-role turns.
    pub tool_call_id: Option<String>,
    /// Requested calls, set on assistant turns that asked for tools.
    pub tool_calls: Option<Vec<ToolCall>>,
}

impl Turn {
    /// System prompt turn
    pub fn system(content: impl Into<String>) -> Self {
        Self::plain(Role::System, content)
    }

    /// User utterance turn
    pub fn user(content: impl Into<String>) -> Self {
        Self::plain(Role::User, content)
    }

    /// Plain assistant answer turn
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::plain(Role::Assistant, content)
    }

    /// Assistant turn carrying the full requested-call list
    pub fn assistant_with_calls(content: impl Into<String>, calls: Vec<ToolCall>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            name: None,
            tool_call_id: None,
            tool_calls: Some(calls),
        }
    }

    /// Tool result turn paired to its call by correlation id
    pub fn tool(
        name: impl Into<String>,
        tool_call_id: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            role: Role::Tool,
            content: content.into(),
            name: Some(name.into()),
            tool_call_id: Some(tool_call_id.into()),
            tool_calls: None,
        }
    }

    fn plain(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            name: None,
            tool_call_id: None,
            tool_calls: None,
        }
    }
}

/// Append-only, length-capped conversation history.
///
/// Turn 0 is always the system prompt and is never evicted.
#[derive(Debug, Clone)]
pub struct History {
    turns: Vec<Turn>,
    max_turns: usize,
}

impl History {
    /// Create a history seeded with the system prompt
    pub fn new(system_prompt: impl Into<String>, max_turns: usize) -> Self {
        Self {
            turns: vec![Turn::system(system_prompt)],
            max_turns,
        }
    }

    /// Append one turn
    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// Drop the oldest non-system turns until the cap is met
    pub fn trim(&mut self) {
        while self.turns.len() > self.max_turns && self.turns.len() > 1 {
            self.turns.remove(1);
        }
    }

    /// Number of turns, including the system turn
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// True when only the system turn remains
    pub fn is_empty(&self) -> bool {
        self.turns.len() <= 1
    }

    /// All turns in order
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Project turns into the wire shape the chat API expects.
    ///
    /// Fields that do not apply to a role are omitted: `name` and
    /// `tool_call_id` only accompany tool turns, `tool_calls` only
    /// assistant turns that actually requested tools.
    pub fn project(&self) -> Vec<WireMessage> {
        self.turns
            .iter()
            .map(|turn| {
                let mut msg = WireMessage {
                    role: turn.role,
                    content: turn.content.clone(),
                    name: None,
                    tool_call_id: None,
                    tool_calls: None,
                };
                match turn.role {
                    Role::Tool => {
                        msg.name = turn.name.clone();
                        msg.tool_call_id = turn.tool_call_id.clone();
                    }
                    Role::Assistant => {
                        msg.tool_calls = turn.tool_calls.clone();
                    }
                    Role::System | Role::User => {}
                }
                msg
            })
            .collect()
    }
}
