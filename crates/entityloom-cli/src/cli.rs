use std::path::PathBuf;

use clap::Parser;

/// Schema-driven, in-memory entity store reachable over a JSON-over-stdio
/// request router.
#[derive(Parser, Debug)]
#[command(
    name = "entityloom",
    version,
    about = "Schema-driven entity store with a JSON-over-stdio router",
    propagate_version = true
)]
pub struct Cli {
    /// Directory or glob of *.yaml/*.yml schema documents, loaded in
    /// filename order before any data. May be repeated.
    #[arg(long = "schema-dir", value_name = "PATH")]
    pub schema_dir: Vec<PathBuf>,

    /// Directory or glob of *.yaml/*.yml data bundles, loaded after all
    /// schemas. May be repeated.
    #[arg(long = "data-dir", value_name = "PATH")]
    pub data_dir: Vec<PathBuf>,

    /// Base directory for the script bridge's file-system abstraction.
    #[arg(long = "scripts-dir", value_name = "PATH")]
    pub scripts_dir: Option<PathBuf>,

    /// Drop into a line-oriented REPL: one JSON request per line on stdin,
    /// one JSON response per line on stdout.
    #[arg(long = "interactive")]
    pub interactive: bool,

    /// Overrides RUST_LOG for this process.
    #[arg(long = "log-level", env = "RUST_LOG", value_name = "LEVEL")]
    pub log_level: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli_structure() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_repeated_schema_dirs() {
        let cli = Cli::try_parse_from([
            "entityloom",
            "--schema-dir",
            "a/",
            "--schema-dir",
            "b/",
            "--interactive",
        ])
        .unwrap();
        assert_eq!(cli.schema_dir, vec![PathBuf::from("a/"), PathBuf::from("b/")]);
        assert!(cli.interactive);
    }

    #[test]
    fn defaults_are_empty() {
        let cli = Cli::try_parse_from(["entityloom"]).unwrap();
        assert!(cli.schema_dir.is_empty());
        assert!(cli.data_dir.is_empty());
        assert!(!cli.interactive);
    }
}
