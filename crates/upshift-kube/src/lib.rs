//! Upshift Kube - Kubernetes integration for Upshift
//!
//! This crate provides:
//! - **Resource schema**: the cluster-scoped `ClusterVersion` resource,
//!   built on the core's spec/status types
//! - **Cluster client**: the `kube`-based implementation of the core's
//!   collaborator trait (fetch once, mutate at most once, never retry)

pub mod client;
pub mod error;
pub mod resource;

pub use client::ClusterClient;
pub use error::{KubeError, Result};
pub use resource::{ClusterVersionResource, GROUP, KIND, PLURAL, RESOURCE_NAME, VERSION};
