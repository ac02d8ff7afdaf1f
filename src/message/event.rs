//! Event bodies refined by event name.
//!
//! The debuggee reports execution state through events. The body shape
//! depends on the `event` field:
//!
//! | Event          | Body                                   |
//! |----------------|----------------------------------------|
//! | `break`        | [`BreakEventBody`]                     |
//! | `exception`    | [`ExceptionEventBody`]                 |
//! | `afterCompile` | [`CompileEventBody`]                   |
//! | `compileError` | [`CompileEventBody`]                   |
//! | *(other)*      | [`EventBody::Other`] with the raw JSON |

use serde::Deserialize;
use serde_json::Value;

/// Event body, refined by event name.
#[derive(Debug, Clone, PartialEq)]
pub enum EventBody {
    /// Execution stopped at a breakpoint or after a step.
    Break(BreakEventBody),
    /// An exception was thrown.
    Exception(ExceptionEventBody),
    /// A script finished compiling.
    AfterCompile(CompileEventBody),
    /// A script failed to compile.
    CompileError(CompileEventBody),
    /// Any other event; `Null` if the event had no body.
    Other(Value),
}

impl EventBody {
    /// Refine a raw JSON body by event name.
    pub fn from_json(name: &str, body: Value) -> Result<Self, serde_json::Error> {
        Ok(match name {
            "break" => EventBody::Break(serde_json::from_value(body)?),
            "exception" => EventBody::Exception(serde_json::from_value(body)?),
            "afterCompile" => EventBody::AfterCompile(serde_json::from_value(body)?),
            "compileError" => EventBody::CompileError(serde_json::from_value(body)?),
            _ => EventBody::Other(body),
        })
    }

    /// Script the event refers to, if any.
    pub fn script(&self) -> Option<&ScriptInfo> {
        match self {
            EventBody::Break(body) => body.script.as_ref(),
            EventBody::Exception(body) => body.script.as_ref(),
            EventBody::AfterCompile(body) | EventBody::CompileError(body) => Some(&body.script),
            EventBody::Other(_) => None,
        }
    }
}

/// Script reference carried by event bodies.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptInfo {
    /// Script id assigned by V8.
    pub id: u64,
    /// Script name, usually a file path. Absent for anonymous scripts.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub line_offset: i64,
    #[serde(default)]
    pub column_offset: i64,
    #[serde(default)]
    pub line_count: u64,
}

/// Body of a `break` event.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakEventBody {
    /// Text of the invocation that stopped (e.g. `"scope()"`).
    #[serde(default)]
    pub invocation_text: String,
    /// Zero-based source line.
    pub source_line: i64,
    /// Zero-based source column.
    pub source_column: i64,
    /// Text of the source line.
    #[serde(default)]
    pub source_line_text: String,
    #[serde(default)]
    pub script: Option<ScriptInfo>,
    /// Ids of the breakpoints hit; empty when stopped by a step.
    #[serde(default)]
    pub breakpoints: Vec<u64>,
}

/// Body of an `exception` event.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExceptionEventBody {
    /// Whether the exception is uncaught.
    #[serde(default)]
    pub uncaught: bool,
    /// The thrown value, as sent by V8.
    #[serde(default)]
    pub exception: Value,
    pub source_line: i64,
    pub source_column: i64,
    #[serde(default)]
    pub source_line_text: String,
    #[serde(default)]
    pub script: Option<ScriptInfo>,
}

/// Body of `afterCompile` and `compileError` events.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CompileEventBody {
    /// The compiled script.
    pub script: ScriptInfo,
}
