//! Categorized dashboard errors
//!
//! Nothing in this crate is fatal to the message loop: every error here is
//! logged, optionally surfaced as a status line, and processing continues
//! with the next message. The categories drive how a frontend presents them.

use std::fmt;

// Re-export StatusLevel from core/session (single source of truth)
pub use crate::core::StatusLevel;

// ============================================================================
// Error Categories
// ============================================================================

/// High-level error categories for frontend error handling.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// User input validation errors (correctable by user)
    Input,
    /// Configuration errors (correctable by modifying settings)
    Config,
    /// Action needs admin controls the session does not have
    Capability,
    /// A render target or record was not found
    NotFound,
    /// Outbound transport failures
    Network,
    /// Malformed payloads and other operation failures
    Operation,
}

impl ErrorCategory {
    /// Get the appropriate status severity for this category.
    #[must_use]
    pub fn status_severity(&self) -> StatusLevel {
        match self {
            Self::Input => StatusLevel::Info,
            Self::Config => StatusLevel::Warning,
            Self::Capability => StatusLevel::Error,
            Self::NotFound => StatusLevel::Warning,
            Self::Network => StatusLevel::Warning,
            Self::Operation => StatusLevel::Error,
        }
    }

    /// Get a short label for this category.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Input => "Input",
            Self::Config => "Config",
            Self::Capability => "Permission",
            Self::NotFound => "Not Found",
            Self::Network => "Network",
            Self::Operation => "Operation",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ============================================================================
// Dashboard Errors
// ============================================================================

/// Categorized dashboard errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DashboardError {
    /// An outbound request did not complete; it may or may not have arrived
    #[error("{action} request failed: {reason}")]
    Transport {
        /// Outbound action name
        action: String,
        /// Transport-reported reason
        reason: String,
    },

    /// A partial re-render addressed a view slot that is not materialised
    #[error("render target `{target}` is not mounted")]
    MissingTarget {
        /// Slot description, e.g. `property-p1`
        target: String,
    },

    /// An expected payload field was absent or had the wrong shape
    #[error("malformed `{data_type}` payload: {detail}")]
    MalformedPayload {
        /// Update discriminant
        data_type: String,
        /// What was wrong
        detail: String,
    },

    /// User input failed validation; the message is the status text
    #[error("{0}")]
    InvalidInput(String),

    /// Admin intent attempted without admin controls
    #[error("`{action}` is only available to administrators")]
    AdminOnly {
        /// Outbound action name
        action: &'static str,
    },

    /// Configuration could not be read or parsed
    #[error("configuration error: {0}")]
    Config(String),
}

impl DashboardError {
    /// Create a transport error
    pub fn transport(action: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Transport {
            action: action.into(),
            reason: reason.into(),
        }
    }

    /// Create a missing-target error
    pub fn missing_target(target: impl Into<String>) -> Self {
        Self::MissingTarget {
            target: target.into(),
        }
    }

    /// Create a malformed-payload error
    pub fn malformed(data_type: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::MalformedPayload {
            data_type: data_type.into(),
            detail: detail.into(),
        }
    }

    /// Create an input validation error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Category of this error
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Transport { .. } => ErrorCategory::Network,
            Self::MissingTarget { .. } => ErrorCategory::NotFound,
            Self::MalformedPayload { .. } => ErrorCategory::Operation,
            Self::InvalidInput(_) => ErrorCategory::Input,
            Self::AdminOnly { .. } => ErrorCategory::Capability,
            Self::Config(_) => ErrorCategory::Config,
        }
    }

    /// Status severity for this error
    pub fn status_level(&self) -> StatusLevel {
        self.category().status_severity()
    }

    /// Get a short error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::Transport { .. } => "NET_TRANSPORT",
            Self::MissingTarget { .. } => "VIEW_MISSING_TARGET",
            Self::MalformedPayload { .. } => "PAYLOAD_MALFORMED",
            Self::InvalidInput(_) => "USER_INPUT",
            Self::AdminOnly { .. } => "ADMIN_ONLY",
            Self::Config(_) => "CONFIG",
        }
    }
}
