//! Cluster version resource types
//!
//! Wire-shaped records for the cluster-scoped `ClusterVersion` resource: the
//! reported status (current release, recommended and conditional updates,
//! health conditions) and the writable spec (the desired update request,
//! channel, and upstream update server).

use serde::{Deserialize, Serialize};

use crate::conditions::Conditions;

/// A named, addressable software version the cluster can run.
///
/// At least one of `version`/`image` is non-empty in practice, but both may
/// be empty on a misbehaving update source; display then falls back to
/// `<unknown>`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Release {
    /// Semantic version string, possibly empty.
    #[serde(default)]
    pub version: String,

    /// Image pull spec, possibly empty.
    #[serde(default)]
    pub image: String,

    /// Channels that carry this release.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub channels: Vec<String>,
}

impl Release {
    /// Version, else image, else `<unknown>`.
    pub fn display_name(&self) -> &str {
        if !self.version.is_empty() {
            &self.version
        } else if !self.image.is_empty() {
            &self.image
        } else {
            "<unknown>"
        }
    }
}

/// The update request written back as desired state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Update {
    #[serde(default)]
    pub version: String,

    #[serde(default)]
    pub image: String,

    /// Disables server-side verification and precondition checks.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub force: bool,
}

impl Update {
    /// Build a request targeting `release`.
    pub fn targeting(release: &Release, force: bool) -> Self {
        Self {
            version: release.version.clone(),
            image: release.image.clone(),
            force,
        }
    }

    /// Version, else image, else `<unknown>`.
    pub fn display_name(&self) -> &str {
        if !self.version.is_empty() {
            &self.version
        } else if !self.image.is_empty() {
            &self.image
        } else {
            "<unknown>"
        }
    }

    /// Whether this request and `release` address the same artifact.
    ///
    /// Images are compared when both are non-empty, otherwise versions are
    /// compared when both are non-empty. Two records with nothing to compare
    /// are never equivalent.
    pub fn is_equivalent(&self, release: &Release) -> bool {
        if !self.image.is_empty() && !release.image.is_empty() {
            self.image == release.image
        } else if !self.version.is_empty() && !release.version.is_empty() {
            self.version == release.version
        } else {
            false
        }
    }
}

/// A reachable release whose safety depends on cluster-specific checks.
///
/// Carries a `Recommended` condition with the verdict and its reasoning.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionalUpdate {
    #[serde(default)]
    pub release: Release,

    #[serde(default, skip_serializing_if = "Conditions::is_empty")]
    pub conditions: Conditions,
}

/// Reported cluster version state. Read-only input to every decision.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterVersionStatus {
    /// The release the cluster currently runs or converges toward.
    #[serde(default)]
    pub desired: Release,

    /// Updates recommended from the current version. Not assumed sorted.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub available_updates: Vec<Release>,

    /// Updates that are reachable but conditionally recommended.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditional_updates: Vec<ConditionalUpdate>,

    /// Cluster-level conditions (Degraded, Progressing, ...).
    #[serde(default, skip_serializing_if = "Conditions::is_empty")]
    pub conditions: Conditions,
}

/// Writable cluster version configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterVersionSpec {
    /// The pending update request, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desired_update: Option<Update>,

    /// The update channel the cluster follows.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub channel: String,

    /// The update server; empty means the built-in default.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub upstream: String,
}

/// A point-in-time snapshot of the cluster version resource.
///
/// Every decision reads one snapshot, decides once, and writes back at most
/// one spec mutation computed from that same snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClusterVersion {
    pub spec: ClusterVersionSpec,

    #[serde(default)]
    pub status: ClusterVersionStatus,
}
