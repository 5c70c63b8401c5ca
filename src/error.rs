//! Application-wide error types.
//!
//! Library modules use specific error types via `thiserror`
//! ([`IdentifyError`](crate::identify::IdentifyError),
//! [`ConfigError`](crate::config::ConfigError)), while CLI/main uses
//! `anyhow` for convenient error propagation.
//!
//! # Example
//!
//! ```ignore
//! use music_id::error::{Result, ResultExt};
//!
//! async fn bind(addr: SocketAddr) -> Result<TcpListener> {
//!     TcpListener::bind(addr).await.with_context(format!("binding {addr}"))
//! }
//! ```

/// Application-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level application error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// File or socket I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Identification pipeline error
    #[error("Identification error: {0}")]
    Identify(#[from] crate::identify::IdentifyError),

    /// Invalid listen address
    #[error("Invalid address: {0}")]
    Address(String),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Add context to an error.
    pub fn context(self, ctx: impl Into<String>) -> Self {
        Self::WithContext {
            context: ctx.into(),
            source: Box::new(self),
        }
    }
}

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn with_context(self, ctx: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.context(ctx))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Io(e).context(ctx))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, crate::identify::IdentifyError> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Identify(e).context(ctx))
    }
}
