//! Decision error taxonomy
//!
//! Every failure a decision can produce, from malformed input rejected
//! before any cluster read to wrapped transport errors. The Display output
//! is what the operator sees, so each message carries its own remediation
//! hint.

use thiserror::Error;

/// Result type for decision operations.
pub type Result<T> = std::result::Result<T, UpgradeError>;

#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum UpgradeError {
    /// The requested version is not strict semver. Rejected before any
    /// cluster read.
    #[error("the requested version must be a semantic version (e.g. 4.0.1 or 4.1.0-nightly-20181104): {reason}")]
    InvalidVersion { reason: String },

    /// The requested image is not a structurally valid pull spec.
    #[error("'{spec}' is not a valid image pull spec: {reason}")]
    InvalidPullSpec { spec: String, reason: String },

    /// A by-tag pull spec cannot be verified by the cluster.
    #[error(
        "'{spec}' is a by-tag pull spec and must be passed with --force, because release images that are not accessed via digest cannot be verified by the cluster; prefer a by-digest pull spec even when forcing"
    )]
    UnverifiedTag { spec: String },

    /// The target matched only a conditional update the cluster recommends
    /// against, and the bypass flag was not given.
    #[error(
        "the update {version} is not one of the recommended updates, but is available as a conditional update. To accept the {condition_type}={status} risk and to proceed with the update use --allow-not-recommended.\n  Reason: {reason}\n  Message: {message}"
    )]
    NotRecommended {
        version: String,
        condition_type: String,
        status: String,
        reason: String,
        /// Pre-indented for block display.
        message: String,
    },

    /// The recommendation list itself could not be refreshed.
    #[error("cannot refresh available updates:\n  Reason: {reason}\n  Message: {message}\n\nspecify {next_step}.")]
    UpdatesNotRetrieved {
        reason: String,
        /// Pre-indented for block display.
        message: String,
        next_step: String,
    },

    /// Nothing matched and no candidates were scanned.
    #[error("no recommended updates, specify {next_step} or wait for new updates to be available.")]
    NoRecommendedTargets { next_step: String },

    /// Nothing matched even with conditional updates considered.
    #[error("no recommended or conditional updates, specify {next_step} or wait for new updates to be available.")]
    NoRecommendedOrConditionalTargets { next_step: String },

    /// Nothing matched but other targets exist.
    #[error(
        "the requested update is not one of the possible targets: {}. specify {next_step}.",
        .targets.join(", ")
    )]
    NotATarget {
        /// Sorted, de-duplicated versions that were scanned.
        targets: Vec<String>,
        next_step: String,
    },

    /// Blocking cluster conditions and no override.
    #[error("{}\n\nIf you want to update anyway, use --allow-upgrade-with-warnings.", .blocks.join("\n\n"))]
    Blocked { blocks: Vec<String> },

    /// Terminal status-report failure: the cluster reports Degraded=True.
    #[error("{prefix}:\n\n{block}")]
    ClusterDegraded { prefix: String, block: String },

    /// Degraded without any message to show.
    #[error("the cluster cannot be updated; inspect the cluster version conditions for details")]
    ClusterNotUpgradeable,

    /// The cluster version resource does not exist.
    #[error(
        "no cluster version information available - you must be connected to a cluster that manages updates through a cluster version resource"
    )]
    NotConnected,

    /// A collaborator read or write failed; fatal, never retried.
    #[error("{context}: {message}")]
    Api { context: String, message: String },
}
