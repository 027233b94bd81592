//! CLI error types with exit code handling
//!
//! This module provides a unified error type for CLI operations that maps
//! the core's failure taxonomy to appropriate exit codes.

use miette::Diagnostic;
use thiserror::Error;

use upshift_core::UpgradeError;

use crate::exit_codes;

/// CLI-specific error type that includes exit code information
#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    /// Input rejected before any cluster access
    #[error("{message}")]
    #[diagnostic(code(upshift::cli::usage))]
    Usage {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// Resolution found no eligible update target
    #[error("{message}")]
    #[diagnostic(code(upshift::cli::no_match))]
    NoMatch { message: String },

    /// An eligible target exists but the cluster state blocks it
    #[error("{message}")]
    #[diagnostic(code(upshift::cli::gated))]
    Gated { message: String },

    /// No compatible cluster version resource
    #[error("{message}")]
    #[diagnostic(code(upshift::cli::not_connected))]
    NotConnected { message: String },

    /// Cluster read or write failure
    #[error("{message}")]
    #[diagnostic(code(upshift::cli::api))]
    Api { message: String },

    /// Anything else
    #[error("{message}")]
    #[diagnostic(code(upshift::cli::error))]
    Other { message: String },
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage { .. } => exit_codes::USAGE_ERROR,
            CliError::NoMatch { .. } => exit_codes::NO_MATCH_ERROR,
            CliError::Gated { .. } => exit_codes::GATED_ERROR,
            CliError::NotConnected { .. } => exit_codes::NOT_CONNECTED_ERROR,
            CliError::Api { .. } => exit_codes::API_ERROR,
            CliError::Other { .. } => exit_codes::ERROR,
        }
    }

    /// Create a connection error
    pub fn connect(message: impl Into<String>) -> Self {
        Self::Api {
            message: format!("unable to connect to the cluster: {}", message.into()),
        }
    }
}

impl From<UpgradeError> for CliError {
    fn from(err: UpgradeError) -> Self {
        let message = err.to_string();
        match err {
            UpgradeError::InvalidVersion { .. } | UpgradeError::InvalidPullSpec { .. } => {
                CliError::Usage { message, help: None }
            }
            UpgradeError::UnverifiedTag { .. } => CliError::Usage {
                message,
                help: Some("pass --force to accept a by-tag pull spec anyway".to_string()),
            },
            UpgradeError::UpdatesNotRetrieved { .. }
            | UpgradeError::NoRecommendedTargets { .. }
            | UpgradeError::NoRecommendedOrConditionalTargets { .. }
            | UpgradeError::NotATarget { .. } => CliError::NoMatch { message },
            UpgradeError::NotRecommended { .. } | UpgradeError::Blocked { .. } => {
                CliError::Gated { message }
            }
            UpgradeError::NotConnected => CliError::NotConnected { message },
            UpgradeError::Api { .. } => CliError::Api { message },
            _ => CliError::Other { message },
        }
    }
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
