//! Error types for upshift-kube

use thiserror::Error;

use upshift_core::ClientError;

/// Result type for upshift-kube operations.
pub type Result<T> = std::result::Result<T, KubeError>;

/// Errors that can occur while talking to the cluster.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum KubeError {
    /// Kubernetes API error
    #[error("Kubernetes API error: {0}")]
    Api(#[from] kube::Error),
}

impl KubeError {
    /// Check if this is a Kubernetes 404 Not Found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, KubeError::Api(kube::Error::Api(resp)) if resp.code == 404)
    }
}

impl From<KubeError> for ClientError {
    fn from(err: KubeError) -> Self {
        if err.is_not_found() {
            ClientError::NotFound
        } else {
            ClientError::Api(err.to_string())
        }
    }
}
