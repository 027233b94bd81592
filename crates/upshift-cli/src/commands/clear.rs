//! Clear command - cancel a requested update that has not started

use upshift_core::{Intent, UpgradeOptions};

use crate::commands::execute;
use crate::error::Result;

/// Run the clear command
pub async fn run() -> Result<()> {
    execute(Intent::Clear, UpgradeOptions::default()).await
}
