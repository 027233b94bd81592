//! The cluster-scoped `ClusterVersion` resource
//!
//! The resource is a singleton named `version`. Its spec and status schemas
//! are the core's wire types; this module only adds the Kubernetes object
//! envelope and the API coordinates.

use std::borrow::Cow;

use kube::api::ObjectMeta;
use kube::core::{ClusterResourceScope, Resource};
use serde::{Deserialize, Serialize};

use upshift_core::{ClusterVersion, ClusterVersionSpec, ClusterVersionStatus};

pub const GROUP: &str = "update.upshift.dev";
pub const VERSION: &str = "v1";
pub const KIND: &str = "ClusterVersion";
pub const PLURAL: &str = "clusterversions";

/// Name of the singleton resource.
pub const RESOURCE_NAME: &str = "version";

/// The `ClusterVersion` object as it exists on the cluster.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClusterVersionResource {
    pub metadata: ObjectMeta,

    pub spec: ClusterVersionSpec,

    /// Absent until the update controller first reports.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ClusterVersionStatus>,
}

impl Resource for ClusterVersionResource {
    type DynamicType = ();
    type Scope = ClusterResourceScope;

    fn kind(_: &()) -> Cow<'_, str> {
        KIND.into()
    }

    fn group(_: &()) -> Cow<'_, str> {
        GROUP.into()
    }

    fn version(_: &()) -> Cow<'_, str> {
        VERSION.into()
    }

    fn plural(_: &()) -> Cow<'_, str> {
        PLURAL.into()
    }

    fn meta(&self) -> &ObjectMeta {
        &self.metadata
    }

    fn meta_mut(&mut self) -> &mut ObjectMeta {
        &mut self.metadata
    }
}

impl ClusterVersionResource {
    /// Collapse the object envelope into the core's snapshot type.
    pub fn into_snapshot(self) -> ClusterVersion {
        ClusterVersion {
            spec: self.spec,
            status: self.status.unwrap_or_default(),
        }
    }
}
