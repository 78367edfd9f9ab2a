//! Host invocation contract
//!
//! The tix plugin runner spawns a plugin with the context serialized to a JSON
//! file and a set of environment variables:
//!
//! | Variable | Meaning |
//! |----------|---------|
//! | `TIX_CONTEXT_PATH` | Path to the JSON context file |
//! | `TIX_TICKET_ROOT` | Ticket workspace root |
//! | `TIX_PLUGIN_CACHE_DIR` | Plugin-specific cache directory |
//! | `TIX_PLUGIN_STATE_DIR` | Plugin-specific global state directory |
//! | `TIX_PLUGIN_TICKET_STATE_DIR` | Plugin-specific per-ticket state directory |
//!
//! The runner guarantees all five are set for every invocation. A missing
//! variable means the binary was started outside the runner.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::context::PluginContext;

pub const CONTEXT_PATH_VAR: &str = "TIX_CONTEXT_PATH";
pub const TICKET_ROOT_VAR: &str = "TIX_TICKET_ROOT";
pub const PLUGIN_CACHE_DIR_VAR: &str = "TIX_PLUGIN_CACHE_DIR";
pub const PLUGIN_STATE_DIR_VAR: &str = "TIX_PLUGIN_STATE_DIR";
pub const PLUGIN_TICKET_STATE_DIR_VAR: &str = "TIX_PLUGIN_TICKET_STATE_DIR";

#[derive(Debug, Error)]
pub enum HostError {
    #[error("{0} is not set; run this plugin through the tix plugin runner")]
    MissingVar(&'static str),

    #[error("Failed to read context file {path}")]
    ReadContext {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed context file {path}")]
    ParseContext {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Loads the invocation context from the file named by `TIX_CONTEXT_PATH`.
pub fn load_context() -> Result<PluginContext, HostError> {
    let path = env_path(CONTEXT_PATH_VAR)?;
    load_context_from(&path)
}

/// Loads an invocation context from a JSON file.
pub fn load_context_from(path: &Path) -> Result<PluginContext, HostError> {
    let content = fs::read_to_string(path).map_err(|source| HostError::ReadContext {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&content).map_err(|source| HostError::ParseContext {
        path: path.to_path_buf(),
        source,
    })
}

/// Returns the ticket workspace root the runner advertised.
pub fn ticket_root() -> Result<PathBuf, HostError> {
    env_path(TICKET_ROOT_VAR)
}

/// Returns the plugin-specific cache directory.
pub fn cache_dir() -> Result<PathBuf, HostError> {
    env_path(PLUGIN_CACHE_DIR_VAR)
}

/// Returns the plugin-specific global state directory.
pub fn state_dir() -> Result<PathBuf, HostError> {
    env_path(PLUGIN_STATE_DIR_VAR)
}

/// Returns the plugin-specific per-ticket state directory.
pub fn ticket_state_dir() -> Result<PathBuf, HostError> {
    env_path(PLUGIN_TICKET_STATE_DIR_VAR)
}

fn env_path(var: &'static str) -> Result<PathBuf, HostError> {
    match env::var_os(var) {
        Some(value) if !value.is_empty() => Ok(PathBuf::from(value)),
        _ => Err(HostError::MissingVar(var)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Mutex, OnceLock};
    use tempfile::TempDir;

    // Env vars are process-global; serialize the tests that touch them.
    fn env_lock() -> std::sync::MutexGuard<'static, ()> {
        static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        ENV_LOCK.get_or_init(|| Mutex::new(())).lock().unwrap()
    }

    #[test]
    fn load_context_from_parses_json_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("context.json");
        std::fs::write(
            &path,
            r#"{"plugin_name": "demo", "ticket_root": "/tickets/T-1"}"#,
        )
        .unwrap();

        let ctx = load_context_from(&path).unwrap();
        assert_eq!(ctx.plugin_name, "demo");
    }

    #[test]
    fn load_context_from_reports_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = load_context_from(&dir.path().join("nope.json")).unwrap_err();

        assert!(matches!(err, HostError::ReadContext { .. }));
    }

    #[test]
    fn load_context_from_reports_malformed_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("context.json");
        std::fs::write(&path, "not json").unwrap();

        let err = load_context_from(&path).unwrap_err();
        assert!(matches!(err, HostError::ParseContext { .. }));
    }

    #[test]
    fn load_context_requires_env_var() {
        let _guard = env_lock();
        std::env::remove_var(CONTEXT_PATH_VAR);

        let err = load_context().unwrap_err();
        assert!(err.to_string().contains(CONTEXT_PATH_VAR));
    }

    #[test]
    fn cache_dir_reads_env_var() {
        let _guard = env_lock();
        std::env::set_var(PLUGIN_CACHE_DIR_VAR, "/cache/tix/plugins/demo");

        let dir = cache_dir().unwrap();
        assert_eq!(dir, PathBuf::from("/cache/tix/plugins/demo"));

        std::env::remove_var(PLUGIN_CACHE_DIR_VAR);
    }

    #[test]
    fn empty_env_var_counts_as_missing() {
        let _guard = env_lock();
        std::env::set_var(PLUGIN_STATE_DIR_VAR, "");

        assert!(matches!(state_dir(), Err(HostError::MissingVar(_))));

        std::env::remove_var(PLUGIN_STATE_DIR_VAR);
    }
}
