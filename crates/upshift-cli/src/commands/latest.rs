//! Latest command - request an update to the newest available version

use upshift_core::{Intent, UpgradeOptions};

use crate::commands::execute;
use crate::error::Result;

/// Run the latest command
pub async fn run(force: bool, allow_upgrade_with_warnings: bool) -> Result<()> {
    let options = UpgradeOptions {
        force,
        allow_upgrade_with_warnings,
        ..UpgradeOptions::default()
    };
    execute(Intent::ToLatest, options).await
}
