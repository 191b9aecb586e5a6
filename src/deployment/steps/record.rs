use std::path::PathBuf;

use tracing::{info, instrument, warn};

use crate::deployment::DeploymentContext;
use crate::report::DeploymentRecord;
use crate::serde_utils;

/// Replaces the network's record with `record` and clears its pending marker.
#[instrument(skip_all, fields(network = %record.network))]
pub async fn persist(
    context: &DeploymentContext,
    record: &DeploymentRecord,
) -> eyre::Result<PathBuf> {
    let path = context.record_path();

    serde_utils::write_json_atomic(&path, record).await?;

    info!("Deployment info saved to: {}", path.display());

    // The record is durable at this point, a stale marker only costs a
    // confirmation check on the next run
    if let Err(err) = serde_utils::remove_if_exists(context.pending_path()).await {
        warn!("Could not remove pending marker: {err:#}");
    }

    Ok(path)
}
