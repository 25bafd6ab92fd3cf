mod cli;
mod error;
mod loader;

use std::io::{BufRead, Write};

use clap::Parser;
use entityloom_json::{Facade, Router};
use entityloom_script::{NativeFileSystem, ScriptBridge};

use error::{CliError, ExitCode};

fn main() {
    let cli = match cli::Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            std::process::exit(ExitCode::UsageError as i32);
        }
    };

    init_tracing(cli.log_level.as_deref());

    match run(&cli) {
        Ok(()) => std::process::exit(ExitCode::Success as i32),
        Err(e) => {
            tracing::error!(error = %e, "entityloom exiting");
            std::process::exit(e.exit_code() as i32);
        }
    }
}

fn init_tracing(log_level: Option<&str>) {
    let filter = log_level.map(String::from).unwrap_or_else(|| "info".to_string());
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

fn run(cli: &cli::Cli) -> Result<(), CliError> {
    let schemas = loader::load_bundle(&cli.schema_dir)?;
    let data = loader::load_bundle(&cli.data_dir)?;

    let facade = if let Some(scripts_dir) = &cli.scripts_dir {
        let fs = NativeFileSystem::new(scripts_dir.clone());
        Facade::with_script_bridge(ScriptBridge::new(Box::new(fs)))
    } else {
        Facade::new()
    };
    let mut router = Router::new(facade);

    if !schemas.is_empty() {
        let response = router.facade().engine().schema_list();
        tracing::debug!(existing_schemas = ?response, "before loading schemas");
        let result: serde_json::Value = serde_json::from_str(&router_load_schemas(&mut router, &schemas)).expect("envelope is always valid JSON");
        if result["status"] != "ok" {
            return Err(CliError::StartupLoad { message: result["message"].as_str().unwrap_or("schema load failed").to_string() });
        }
    }

    if !data.is_empty() {
        let result: serde_json::Value = serde_json::from_str(&router_load_data(&mut router, &data)).expect("envelope is always valid JSON");
        if result["status"] != "ok" {
            return Err(CliError::StartupLoad { message: result["message"].as_str().unwrap_or("data load failed").to_string() });
        }
    }

    if cli.interactive {
        run_interactive(&mut router)
    } else {
        Ok(())
    }
}

fn router_load_schemas(router: &mut Router, schemas: &std::collections::BTreeMap<String, String>) -> String {
    let request = serde_json::json!({"command": "loadSchemas", "schemas": schemas});
    router.handle(&request.to_string())
}

fn router_load_data(router: &mut Router, data: &std::collections::BTreeMap<String, String>) -> String {
    let request = serde_json::json!({"command": "loadData", "data": data});
    router.handle(&request.to_string())
}

/// Reads one JSON request per line from stdin, writes one JSON response
/// per line to stdout. Exits with `RuntimeFailure` if stdin closes
/// mid-session in a way that looks like a broken pipe rather than a
/// clean EOF.
fn run_interactive(router: &mut Router) -> Result<(), CliError> {
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    for line in stdin.lock().lines() {
        let line = line.map_err(|e| io_err("<stdin>", e))?;
        if line.trim().is_empty() {
            continue;
        }
        let response = router.handle(&line);
        writeln!(stdout, "{response}").map_err(|e| io_err("<stdout>", e))?;
        stdout.flush().map_err(|e| io_err("<stdout>", e))?;
    }
    Ok(())
}

/// A broken pipe means the peer reading our responses (or feeding our
/// requests) is gone mid-session, not a usage mistake — that maps to
/// `StdinClosed` and exit code 3, not the generic `Io` usage error.
fn io_err(path: &'static str, source: std::io::Error) -> CliError {
    if source.kind() == std::io::ErrorKind::BrokenPipe {
        CliError::StdinClosed
    } else {
        CliError::Io { path: path.into(), source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn broken_pipe_maps_to_stdin_closed() {
        let err = io_err("<stdout>", std::io::Error::from(std::io::ErrorKind::BrokenPipe));
        assert!(matches!(err, CliError::StdinClosed));
        assert_eq!(err.exit_code(), ExitCode::RuntimeFailure);
    }

    #[test]
    fn other_io_errors_map_to_generic_io() {
        let err = io_err("<stdin>", std::io::Error::from(std::io::ErrorKind::PermissionDenied));
        assert!(matches!(err, CliError::Io { .. }));
        assert_eq!(err.exit_code(), ExitCode::UsageError);
    }
}
