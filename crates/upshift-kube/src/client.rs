//! Cluster client for the `ClusterVersion` resource
//!
//! Implements the core's collaborator trait: one fetch per decision, at most
//! one mutation, no retries. Mutations are merge patches computed from the
//! snapshot, so nothing is re-read between read and write.

use async_trait::async_trait;
use kube::api::{Api, Patch, PatchParams};
use serde_json::json;

use upshift_core::{
    ClientError, ClusterVersion, ClusterVersionClient, ClusterVersionSpec, Release,
};

use crate::error::{KubeError, Result};
use crate::resource::{ClusterVersionResource, RESOURCE_NAME};

/// `kube`-backed access to the cluster version singleton.
pub struct ClusterClient {
    api: Api<ClusterVersionResource>,
}

impl ClusterClient {
    /// Connect using the ambient configuration (`KUBECONFIG` or in-cluster).
    pub async fn try_default() -> Result<Self> {
        let client = kube::Client::try_default().await?;
        Ok(Self::with_client(client))
    }

    /// Create with an existing Kubernetes client.
    pub fn with_client(client: kube::Client) -> Self {
        Self {
            api: Api::all(client),
        }
    }
}

#[async_trait]
impl ClusterVersionClient for ClusterClient {
    async fn fetch(&self) -> std::result::Result<ClusterVersion, ClientError> {
        tracing::debug!(name = RESOURCE_NAME, "fetching cluster version");
        let resource = self.api.get(RESOURCE_NAME).await.map_err(client_error)?;
        Ok(resource.into_snapshot())
    }

    async fn clear_desired_update(&self) -> std::result::Result<Release, ClientError> {
        tracing::debug!(name = RESOURCE_NAME, "clearing the desired update");
        let patch = json!({"spec": {"desiredUpdate": null}});
        let updated = self
            .api
            .patch(RESOURCE_NAME, &PatchParams::default(), &Patch::Merge(&patch))
            .await
            .map_err(client_error)?;
        Ok(updated.status.unwrap_or_default().desired)
    }

    async fn apply_spec(&self, spec: &ClusterVersionSpec) -> std::result::Result<(), ClientError> {
        tracing::debug!(name = RESOURCE_NAME, "applying the desired update");
        let patch = json!({"spec": spec});
        self.api
            .patch(RESOURCE_NAME, &PatchParams::default(), &Patch::Merge(&patch))
            .await
            .map_err(client_error)?;
        Ok(())
    }
}

fn client_error(err: kube::Error) -> ClientError {
    ClientError::from(KubeError::Api(err))
}
