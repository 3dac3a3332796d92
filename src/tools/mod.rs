//! Tool registry and invoker.
//!
//! The registry is a closed set of four tools resolved by name at
//! dispatch time. The invoker sanitizes failures: validation problems
//! surface their fixed localized message, everything else is logged in
//! full and replaced by a generic failure string so no internal detail
//! reaches the model or the user.

use std::str::FromStr;

use chrono::{SecondsFormat, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{error, info};

use crate::calendar::CalendarClient;
use crate::error::{ToolError, ToolResult};
use crate::openai::{FunctionDef, ToolDef};
use crate::store::TodoStore;

/// Localized message returned whenever a tool fails for an internal reason.
pub const TOOL_FAILURE_MESSAGE: &str = "ツールの実行に失敗しました。";

/// Maximum accepted todo text length in characters.
const MAX_TODO_CHARS: usize = 500;

/// Characters rejected in todo text (downstream markup/injection defense).
const FORBIDDEN_TODO_CHARS: [char; 5] = ['<', '>', '"', '\'', '&'];

/// Collaborators the tool handlers act on
#[derive(Clone)]
pub struct ToolContext {
    pub store: TodoStore,
    pub calendar: CalendarClient,
}

/// The closed set of registered tools
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolName {
    AddTodo,
    ListTodos,
    GetTime,
    AddCalendarEvent,
}

impl ToolName {
    /// Wire name the model addresses this tool by
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolName::AddTodo => "add_todo",
            ToolName::ListTodos => "list_todos",
            ToolName::GetTime => "get_time",
            ToolName::AddCalendarEvent => "add_calendar_event",
        }
    }
}

impl FromStr for ToolName {
    type Err = ToolError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "add_todo" => Ok(ToolName::AddTodo),
            "list_todos" => Ok(ToolName::ListTodos),
            "get_time" => Ok(ToolName::GetTime),
            "add_calendar_event" => Ok(ToolName::AddCalendarEvent),
            _ => Err(ToolError::UnknownTool {
                tool_name: name.to_string(),
            }),
        }
    }
}

/// Declarative definitions for every registered tool
pub fn tool_defs() -> Vec<ToolDef> {
    vec![
        add_todo_def(),
        list_todos_def(),
        get_time_def(),
        add_calendar_event_def(),
    ]
}

fn function_def(name: ToolName, description: &str, parameters: Value) -> ToolDef {
    ToolDef {
        def_type: "function".to_string(),
        function: FunctionDef {
            name: name.as_str().to_string(),
            description: description.to_string(),
            parameters,
        },
    }
}

fn add_todo_def() -> ToolDef {
    function_def(
        ToolName::AddTodo,
        "TODOを1件追加する",
        json!({
            "type": "object",
            "properties": {
                "text": { "type": "string", "description": "TODO内容" }
            },
            "required": ["text"],
            "additionalProperties": false
        }),
    )
}

fn list_todos_def() -> ToolDef {
    function_def(
        ToolName::ListTodos,
        "TODOの一覧を返す",
        json!({
            "type": "object",
            "properties": {},
            "additionalProperties": false
        }),
    )
}

fn get_time_def() -> ToolDef {
    function_def(
        ToolName::GetTime,
        "現在の日時（ISO文字列）を返す",
        json!({
            "type": "object",
            "properties": {},
            "additionalProperties": false
        }),
    )
}

fn add_calendar_event_def() -> ToolDef {
    function_def(
        ToolName::AddCalendarEvent,
        "Googleカレンダーに予定を追加する",
        json!({
            "type": "object",
            "properties": {
                "summary": { "type": "string", "description": "予定タイトル" },
                "start": { "type": "string", "description": "ISO8601 with offset" },
                "end": { "type": "string", "description": "ISO8601 with offset" }
            },
            "required": ["summary", "start", "end"],
            "additionalProperties": false
        }),
    )
}

/// Invoke a tool by name and return its result string.
///
/// Never fails: the sanitizing boundary maps every error to a localized
/// string suitable for the model and the user.
pub async fn call_tool(ctx: &ToolContext, name: &str, args: &Value) -> String {
    match dispatch(ctx, name, args).await {
        Ok(result) => result,
        Err(ToolError::Validation { message }) => message,
        Err(e) => {
            error!(tool = %name, error = %e, "Tool execution failed");
            TOOL_FAILURE_MESSAGE.to_string()
        }
    }
}

async fn dispatch(ctx: &ToolContext, name: &str, args: &Value) -> ToolResult<String> {
    let tool = ToolName::from_str(name)?;

    if !args.is_object() {
        return Err(ToolError::InvalidArguments {
            tool_name: name.to_string(),
            message: "arguments must be a JSON object".to_string(),
        });
    }

    info!(tool = %tool.as_str(), "Invoking tool");

    match tool {
        ToolName::AddTodo => add_todo(ctx, args),
        ToolName::ListTodos => Ok(list_todos(ctx)),
        ToolName::GetTime => Ok(get_time()),
        ToolName::AddCalendarEvent => add_calendar_event(ctx, args).await,
    }
}

#[derive(Debug, Deserialize)]
struct AddTodoArgs {
    #[serde(default)]
    text: String,
}

fn add_todo(ctx: &ToolContext, args: &Value) -> ToolResult<String> {
    let args: AddTodoArgs =
        serde_json::from_value(args.clone()).map_err(|e| ToolError::InvalidArguments {
            tool_name: ToolName::AddTodo.as_str().to_string(),
            message: e.to_string(),
        })?;

    let text = args.text.trim();
    if text.is_empty() {
        return Err(ToolError::Validation {
            message: "TODO内容が空です。".to_string(),
        });
    }
    if text.chars().count() > MAX_TODO_CHARS {
        return Err(ToolError::Validation {
            message: "TODO内容が長すぎます（500文字以内）。".to_string(),
        });
    }
    if text.chars().any(|c| FORBIDDEN_TODO_CHARS.contains(&c)) {
        return Err(ToolError::Validation {
            message: "TODO内容に無効な文字が含まれています。".to_string(),
        });
    }

    let todo = ctx.store.add(text)?;
    Ok(format!("Added #{}: {}", todo.id, todo.text))
}

fn list_todos(ctx: &ToolContext) -> String {
    let todos = ctx.store.load();
    if todos.is_empty() {
        return "No todos.".to_string();
    }
    todos
        .iter()
        .map(|t| format!("#{} {} {}", t.id, if t.done { "[x]" } else { "[ ]" }, t.text))
        .collect::<Vec<_>>()
        .join("\n")
}

fn get_time() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[derive(Debug, Deserialize)]
struct AddCalendarEventArgs {
    summary: String,
    start: String,
    end: String,
}

async fn add_calendar_event(ctx: &ToolContext, args: &Value) -> ToolResult<String> {
    let args: AddCalendarEventArgs =
        serde_json::from_value(args.clone()).map_err(|e| ToolError::InvalidArguments {
            tool_name: ToolName::AddCalendarEvent.as_str().to_string(),
            message: e.to_string(),
        })?;

    let summary = args.summary.trim();
    if summary.is_empty() {
        return Err(ToolError::Validation {
            message: "予定タイトルが空です。".to_string(),
        });
    }
    for (field, value) in [("start", &args.start), ("end", &args.end)] {
        if chrono::DateTime::parse_from_rfc3339(value).is_err() {
            return Err(ToolError::Validation {
                message: format!("{}はISO8601形式（オフセット付き）で指定してください。", field),
            });
        }
    }

    let created = ctx.calendar.insert_event(summary, &args.start, &args.end).await?;
    Ok(format!(
        "{}〜{}に{}をカレンダー追加しました",
        args.start, args.end, created
    ))
}
