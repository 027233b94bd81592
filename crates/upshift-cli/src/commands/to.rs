//! To command - request an update to an exact version

use upshift_core::{Intent, UpgradeOptions};

use crate::commands::execute;
use crate::error::Result;

/// Run the to command
pub async fn run(
    version: String,
    force: bool,
    allow_not_recommended: bool,
    allow_upgrade_with_warnings: bool,
) -> Result<()> {
    let options = UpgradeOptions {
        force,
        allow_not_recommended,
        allow_upgrade_with_warnings,
        ..UpgradeOptions::default()
    };
    execute(Intent::ToVersion(version), options).await
}
