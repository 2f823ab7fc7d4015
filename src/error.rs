//! Error handling for tld-sweep

use thiserror::Error;

/// Main error type for tld-sweep
#[derive(Error, Debug, Clone)]
pub enum SweepError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Lookup error for '{domain}': {message}")]
    Lookup { domain: String, message: String },

    #[error("Network error: {message}")]
    Network {
        message: String,
        url: Option<String>,
    },

    #[error("Timeout error: {operation} timed out after {timeout_secs}s")]
    Timeout {
        operation: String,
        timeout_secs: u64,
    },

    #[error("Parse error: {message}")]
    Parse { message: String },

    #[error("IO error: {message}")]
    Io {
        message: String,
        path: Option<String>,
    },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl SweepError {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a lookup error for a candidate domain
    pub fn lookup(domain: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Lookup {
            domain: domain.into(),
            message: message.into(),
        }
    }

    /// Create a network error
    pub fn network(message: impl Into<String>, url: Option<String>) -> Self {
        Self::Network {
            message: message.into(),
            url,
        }
    }

    /// Create a timeout error
    pub fn timeout(operation: impl Into<String>, timeout_secs: u64) -> Self {
        Self::Timeout {
            operation: operation.into(),
            timeout_secs,
        }
    }

    /// Create a parse error
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Create an IO error
    pub fn io(message: impl Into<String>, path: Option<String>) -> Self {
        Self::Io {
            message: message.into(),
            path,
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Get user-friendly error message with suggestions
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation { message } => {
                format!("❌ {}\n💡 Use only lowercase letters a-z", message)
            }
            Self::Lookup { domain, message } => {
                format!("⚠️  Could not look up '{}': {}", domain, message)
            }
            Self::Network { message, url } => {
                let target = url.as_ref().map_or(String::new(), |u| format!(" ({})", u));
                format!("❌ Network error{}: {}\n💡 Check your internet connection", target, message)
            }
            Self::Timeout { operation, timeout_secs } => {
                format!("⏱️  Operation '{}' timed out after {}s\n💡 Try increasing --timeout", operation, timeout_secs)
            }
            Self::Parse { message } => {
                format!("❌ Parse error: {}", message)
            }
            Self::Io { message, path } => {
                let path_info = path.as_ref().map_or(String::new(), |p| format!(" ({})", p));
                format!("❌ File error{}: {}\n💡 Check file permissions and paths", path_info, message)
            }
            Self::Config { message } => {
                format!("❌ Configuration problem: {}\n💡 Check your flags or .env file", message)
            }
            Self::Internal { message } => {
                format!("❌ Internal error: {}\n💡 This is a bug, please report it", message)
            }
        }
    }
}

impl From<reqwest::Error> for SweepError {
    fn from(err: reqwest::Error) -> Self {
        let url = err.url().map(|u| u.to_string());

        if err.is_timeout() {
            Self::timeout("HTTP request", 30)
        } else if err.is_connect() {
            Self::network("Connection failed", url)
        } else {
            Self::network(err.to_string(), url)
        }
    }
}

impl From<std::io::Error> for SweepError {
    fn from(err: std::io::Error) -> Self {
        Self::io(err.to_string(), None)
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, SweepError>;

#[macro_export]
macro_rules! validation_error {
    ($msg:expr) => {
        $crate::error::SweepError::validation($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::error::SweepError::validation(format!($fmt, $($arg)*))
    };
}

#[macro_export]
macro_rules! lookup_error {
    ($domain:expr, $msg:expr) => {
        $crate::error::SweepError::lookup($domain, $msg)
    };
    ($domain:expr, $fmt:expr, $($arg:tt)*) => {
        $crate::error::SweepError::lookup($domain, format!($fmt, $($arg)*))
    };
}
