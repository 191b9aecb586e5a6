use chrono::Utc;
use eyre::eyre;
use tracing::{info, instrument};

use super::environment::{Environment, SignerInfo};
use crate::chain::{Chain, PendingDeployment};
use crate::deployment::{DeploymentContext, DeploymentError};
use crate::report::PendingMarker;
use crate::serde_utils;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Submitted {
    pub pending: PendingDeployment,
    /// Picked up from a previous run's marker instead of broadcast now
    pub resumed: bool,
}

/// Broadcasts the deployment, or resumes one a previous run left pending.
///
/// A pending marker for the network means a transaction from an earlier run
/// may still land, so a second one is only sent with `discard_pending`.
#[instrument(skip_all)]
pub async fn submit_or_resume(
    context: &DeploymentContext,
    environment: &Environment,
    signer: &SignerInfo,
    chain: &impl Chain,
) -> Result<Submitted, DeploymentError> {
    let pending_path = context.pending_path();

    if context.discard_pending {
        serde_utils::remove_if_exists(&pending_path)
            .await
            .map_err(DeploymentError::Config)?;
    } else if let Some(marker) =
        serde_utils::read_json_opt::<PendingMarker>(&pending_path)
            .await
            .map_err(DeploymentError::Config)?
    {
        if marker.chain_id != environment.chain_id
            || marker.deployer_address != signer.address
        {
            return Err(DeploymentError::Config(eyre!(
                "{} holds a pending deployment {:?} from chain {} by {:?}, rerun with --discard-pending to replace it",
                pending_path.display(),
                marker.transaction_hash,
                marker.chain_id,
                marker.deployer_address,
            )));
        }

        info!(
            "Resuming pending deployment {:?} submitted at {}",
            marker.transaction_hash, marker.submitted_at
        );

        return Ok(Submitted {
            pending: PendingDeployment {
                tx_hash: marker.transaction_hash,
                predicted_address: marker.predicted_address,
                nonce: marker.nonce,
            },
            resumed: true,
        });
    }

    let artifact = &context.artifact;
    match artifact.source_name.as_deref() {
        Some(source) => info!("Deploying {} from {source}...", artifact.contract_name),
        None => info!("Deploying {}...", artifact.contract_name),
    }

    let pending = chain
        .submit_deployment(&context.artifact)
        .await
        .map_err(DeploymentError::Submission)?;

    info!("Deployment transaction hash: {:?}", pending.tx_hash);

    let marker = PendingMarker {
        network: environment.network.clone(),
        chain_id: environment.chain_id,
        deployer_address: signer.address,
        transaction_hash: pending.tx_hash,
        predicted_address: pending.predicted_address,
        nonce: pending.nonce,
        submitted_at: Utc::now(),
    };

    serde_utils::write_json_atomic(&pending_path, &marker)
        .await
        .map_err(|cause| DeploymentError::PendingMarker {
            tx_hash: pending.tx_hash,
            cause,
        })?;

    Ok(Submitted {
        pending,
        resumed: false,
    })
}
