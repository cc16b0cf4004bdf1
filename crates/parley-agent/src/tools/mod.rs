//! Built-in tools.

pub mod base;
pub mod filesystem;
pub mod terminal;
pub mod think;

pub use base::Tool;
pub use filesystem::{ReadFileTool, WriteFileTool};
pub use terminal::TerminalTool;
pub use think::ThinkTool;
