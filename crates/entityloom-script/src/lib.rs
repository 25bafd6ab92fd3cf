//! Embedded Lua scripting bridge: host functions exposed to scripts
//! (`getField`, `getDict`, `regexMatch`, file I/O, template rendering,
//! JSON encode/decode) and the `runScript` entry point.

mod bridge;
mod error;
mod filesystem;
mod json_table;
mod template;

pub use bridge::ScriptBridge;
pub use error::ScriptError;
pub use filesystem::{FileSystem, NativeFileSystem, RecordingFileSystem};
