use std::fmt;

/// Errors raised by the script bridge.
#[derive(Debug)]
#[non_exhaustive]
pub enum ScriptError {
    /// The script file could not be found/read through the file-system abstraction.
    ScriptNotFound { path: String },
    /// The script failed to load or compile.
    SyntaxError { path: String, message: String },
    /// The script raised an error at run time.
    RuntimeError { path: String, message: String },
    /// The script returned a value of the wrong shape (expected `(bool, string)`).
    ScriptReturnShape { path: String },
    /// The script returned `(false, message)`.
    ScriptFailed { path: String, message: String },
    /// A host file-system operation failed.
    FileSystem { path: String, message: String },
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ScriptNotFound { path } => write!(f, "script not found: {path}"),
            Self::SyntaxError { path, message } => write!(f, "script '{path}' failed to load: {message}"),
            Self::RuntimeError { path, message } => write!(f, "script '{path}' runtime error: {message}"),
            Self::ScriptReturnShape { path } => {
                write!(f, "script '{path}' must return (ok: bool, message: string)")
            }
            Self::ScriptFailed { path, message } => write!(f, "script '{path}' failed: {message}"),
            Self::FileSystem { path, message } => write!(f, "file system error at '{path}': {message}"),
        }
    }
}

impl std::error::Error for ScriptError {}
