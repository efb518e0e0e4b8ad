//! Error taxonomy and the process-wide error hook.
//!
//! Mirrors the teacher's `DataError` (trendlab-core/src/data/provider.rs):
//! a flat `thiserror` enum with one variant per failure kind, `Display`
//! messages suitable for both CLI and TUI-style consumers.

use std::sync::{Mutex, OnceLock};
use thiserror::Error;

/// Error taxonomy for the engine core.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    #[error("required parameter was null/missing: {0}")]
    NullParam(String),

    #[error("allocation failed: {0}")]
    Memory(String),

    #[error("config value could not be parsed: {0}")]
    ConfigParse(String),

    #[error("required config key missing: section={section}, key={key}")]
    ConfigMissing { section: String, key: String },

    #[error("rule grammar or range error: {0}")]
    RuleParse(String),

    #[error("rule structurally invalid at evaluation time: {0}")]
    RuleInvalid(String),

    #[error("data source connection failure: {0}")]
    DataConnection(String),

    #[error("data source query failure: {0}")]
    DataQuery(String),

    #[error("no data available for {0}")]
    NoData(String),

    #[error("insufficient data: {code} has {available} bars, need at least {required}")]
    InsufficientData {
        code: String,
        available: usize,
        required: usize,
    },

    #[error("report write failed: {0}")]
    Io(String),
}

impl EngineError {
    /// Short, stable kind name (for CLI-style `error_string(kind)` callers).
    pub fn kind(&self) -> &'static str {
        match self {
            EngineError::NullParam(_) => "NullParam",
            EngineError::Memory(_) => "Memory",
            EngineError::ConfigParse(_) => "ConfigParse",
            EngineError::ConfigMissing { .. } => "ConfigMissing",
            EngineError::RuleParse(_) => "RuleParse",
            EngineError::RuleInvalid(_) => "RuleInvalid",
            EngineError::DataConnection(_) => "DataConnection",
            EngineError::DataQuery(_) => "DataQuery",
            EngineError::NoData(_) => "NoData",
            EngineError::InsufficientData { .. } => "InsufficientData",
            EngineError::Io(_) => "Io",
        }
    }
}

type ErrorHook = Box<dyn Fn(&EngineError) + Send + Sync + 'static>;

static ERROR_HOOK: OnceLock<Mutex<Option<ErrorHook>>> = OnceLock::new();

fn hook_cell() -> &'static Mutex<Option<ErrorHook>> {
    ERROR_HOOK.get_or_init(|| Mutex::new(None))
}

/// Install (or clear, with `None`) the process-wide error callback.
///
/// Per spec: the sole process-wide hook, must be settable to null.
pub fn set_error_hook<F>(hook: Option<F>)
where
    F: Fn(&EngineError) + Send + Sync + 'static,
{
    let mut guard = hook_cell().lock().unwrap_or_else(|p| p.into_inner());
    *guard = hook.map(|f| Box::new(f) as ErrorHook);
}

/// Invoke the installed hook, if any, with the given error. Used internally
/// by fallible entry points before they return `Err`.
pub(crate) fn notify(err: &EngineError) {
    let guard = hook_cell().lock().unwrap_or_else(|p| p.into_inner());
    if let Some(hook) = guard.as_ref() {
        hook(err);
    }
}

/// Convenience: call [`notify`] and return the same error wrapped in `Err`.
pub(crate) fn fail<T>(err: EngineError) -> Result<T, EngineError> {
    notify(&err);
    Err(err)
}

pub type Result<T> = std::result::Result<T, EngineError>;
