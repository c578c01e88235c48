//! Shared test utilities.

use std::path::PathBuf;
use std::process::Command;

use tempfile::TempDir;

/// Environment variables the binary reads; cleared so tests are hermetic
/// even when a developer has them set.
const REPOWATCH_ENV: &[&str] = &[
    "REPOWATCH_OWNER",
    "REPOWATCH_REPO",
    "REPOWATCH_TOKEN",
    "REPOWATCH_RECIPIENTS",
    "REPOWATCH_DATABASE_URL",
    "REPOWATCH_API_BASE",
    "REPOWATCH_SOURCE_BACKEND",
    "REPOWATCH_SINK_BACKEND",
    "REPOWATCH_SMTP_HOST",
    "REPOWATCH_SMTP_FROM",
    "GITHUB_TOKEN",
    "RUST_LOG",
];

/// Creates a temporary directory for database tests.
///
/// # Panics
///
/// Panics if the temporary directory cannot be created.
pub fn create_temp_dir() -> TempDir {
    TempDir::new().unwrap_or_else(|error| panic!("failed to create temporary directory: {error}"))
}

/// Returns the path to the built binary.
///
/// # Panics
///
/// Panics if the current executable path cannot be determined.
pub fn binary_path() -> PathBuf {
    if let Some(path) = option_env!("CARGO_BIN_EXE_repowatch") {
        return PathBuf::from(path);
    }
    let mut path = std::env::current_exe()
        .unwrap_or_else(|error| panic!("failed to get current exe path: {error}"));
    path.pop();
    path.pop();
    path.push("repowatch");
    path
}

/// Builds a command running the binary with `args`, a clean environment,
/// and `env` applied on top.
pub fn repowatch_command(args: &[&str], env: &[(&str, Option<&str>)]) -> Command {
    let mut command = Command::new(binary_path());
    command.args(args);
    for key in REPOWATCH_ENV {
        command.env_remove(key);
    }
    for (key, value) in env {
        match value {
            Some(env_value) => {
                command.env(key, env_value);
            }
            None => {
                command.env_remove(key);
            }
        }
    }
    command
}
