//! Collaborator seam for cluster access
//!
//! The decision core never talks to a cluster directly; it goes through
//! this trait so every decision stays testable against an in-memory
//! implementation. The real implementation lives in `upshift-kube`.

use async_trait::async_trait;
use thiserror::Error;

use crate::cluster::{ClusterVersion, ClusterVersionSpec, Release};

/// Errors a cluster collaborator can report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// No compatible cluster version resource exists.
    #[error("cluster version resource not found")]
    NotFound,

    /// Any other read/write failure, already rendered.
    #[error("{0}")]
    Api(String),
}

/// Read/write access to the cluster version resource.
///
/// One snapshot in, at most one mutation out: implementations must not
/// re-read between `fetch` and a subsequent write, so a decision stays
/// consistent with a single point-in-time view.
#[async_trait]
pub trait ClusterVersionClient: Send + Sync {
    /// Fetch the current cluster version snapshot.
    async fn fetch(&self) -> Result<ClusterVersion, ClientError>;

    /// Null out `spec.desiredUpdate` and return the resulting desired
    /// release.
    async fn clear_desired_update(&self) -> Result<Release, ClientError>;

    /// Submit the computed spec as the new desired configuration.
    async fn apply_spec(&self, spec: &ClusterVersionSpec) -> Result<(), ClientError>;
}
