use std::path::PathBuf;

/// Exit codes for the CLI process (spec §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success = 0,
    UsageError = 1,
    LoadFailure = 2,
    RuntimeFailure = 3,
}

/// Errors returned by the CLI's own argument-parsing and startup-loading
/// layer. Router-level and Engine-level failures never reach here — they
/// are already JSON envelopes by the time the request loop sees them.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("no schema or data files matched {path}")]
    NoFilesMatched { path: PathBuf },

    #[error("IO error for {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },

    #[error("failed to load schemas or data: {message}")]
    StartupLoad { message: String },

    #[error("stdin closed unexpectedly")]
    StdinClosed,
}

impl CliError {
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::NoFilesMatched { .. } => ExitCode::UsageError,
            Self::Io { .. } => ExitCode::UsageError,
            Self::StartupLoad { .. } => ExitCode::LoadFailure,
            Self::StdinClosed => ExitCode::RuntimeFailure,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_files_matched_is_usage_error() {
        let err = CliError::NoFilesMatched { path: PathBuf::from("schemas/") };
        assert_eq!(err.exit_code(), ExitCode::UsageError);
    }

    #[test]
    fn startup_load_is_load_failure() {
        let err = CliError::StartupLoad { message: "bad yaml".into() };
        assert_eq!(err.exit_code(), ExitCode::LoadFailure);
    }

    #[test]
    fn stdin_closed_is_runtime_failure() {
        assert_eq!(CliError::StdinClosed.exit_code(), ExitCode::RuntimeFailure);
    }
}
