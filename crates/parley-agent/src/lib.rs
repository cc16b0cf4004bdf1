//! Conversation engine: transcript-driven model/tool loop, tool catalog
//! and dispatch, user input encoding, and audio playback.

pub mod audio;
pub mod dispatch;
pub mod engine;
pub mod input;
pub mod tools;

pub use audio::{AudioSink, CommandPlayer, NullSink};
pub use dispatch::{CatalogEntry, DispatchError, ToolCatalog};
pub use engine::{Agent, AgentError, AgentSettings, MALFORMED_RESPONSE};
pub use input::UserInput;
pub use tools::{ReadFileTool, TerminalTool, ThinkTool, Tool, WriteFileTool};
