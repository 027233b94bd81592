//! Status command - report the cluster's update status

use upshift_core::{Intent, UpgradeOptions};

use crate::commands::execute;
use crate::error::Result;

/// Run the status command
pub async fn run(include_not_recommended: bool) -> Result<()> {
    let options = UpgradeOptions {
        include_not_recommended,
        ..UpgradeOptions::default()
    };
    execute(Intent::StatusOnly, options).await
}
