use thiserror::Error;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for `depthgate`.
///
/// Only configuration loading can fail outright. Admission rejection,
/// failsafe gating and oracle fallback are ordinary outcomes, and oracle
/// calls report [`OracleError`] to the scorer, which always degrades to the
/// heuristic. The CLI wraps these in `anyhow` for context chains.
#[derive(Debug, Error)]
pub enum DepthgateError {
    // ── Config ───────────────────────────────────────────────────────────
    #[error("config: {0}")]
    Config(#[from] ConfigError),
}

// ─── Config errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load config: {0}")]
    Load(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

// ─── Oracle errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum OracleError {
    #[error("oracle {oracle} request failed: {message}")]
    Request { oracle: String, message: String },

    #[error("oracle {oracle} returned HTTP {status}")]
    Status { oracle: String, status: u16 },

    #[error("oracle {oracle} timed out after {timeout_ms}ms")]
    Timeout { oracle: String, timeout_ms: u64 },

    #[error("oracle {oracle} returned an unparseable answer: {raw}")]
    Parse { oracle: String, raw: String },

    #[error("oracle {oracle} returned a non-finite score")]
    NonFinite { oracle: String },
}

// ─── Convenience re-exports ─────────────────────────────────────────────────

/// Shorthand result type for the crate.
pub type Result<T> = std::result::Result<T, DepthgateError>;
