use std::time::Duration;

use ethers::types::{Address, H256};
use eyre::{ensure, eyre, ContextCompat};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, instrument, warn};

use crate::chain::{Chain, PendingDeployment};
use crate::types::{BlockNumber, ConfirmationDepth};

/// A creation transaction buried under the required number of blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeploymentReceipt {
    pub contract_address: Address,
    pub transaction_hash: H256,
    pub block_number: BlockNumber,
    pub confirmations: ConfirmationDepth,
}

/// Polls until the transaction has `required` blocks on top of its
/// inclusion block, giving up after `timeout`.
///
/// Provider errors while polling are retried until the deadline. A reverted
/// creation, or one without a contract address, fails right away.
#[instrument(skip(chain, pending), fields(tx_hash = ?pending.tx_hash))]
pub async fn await_confirmation(
    chain: &impl Chain,
    pending: &PendingDeployment,
    required: ConfirmationDepth,
    timeout: Duration,
    poll_interval: Duration,
) -> eyre::Result<DeploymentReceipt> {
    info!("Waiting for {required} confirmations...");

    tokio::time::timeout(timeout, poll(chain, pending, required, poll_interval))
        .await
        .map_err(|_| {
            eyre!("Timed out after {timeout:?} waiting for {required} confirmations")
        })?
}

async fn poll(
    chain: &impl Chain,
    pending: &PendingDeployment,
    required: ConfirmationDepth,
    poll_interval: Duration,
) -> eyre::Result<DeploymentReceipt> {
    let mut interval = tokio::time::interval(poll_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut last_depth = None;

    loop {
        interval.tick().await;

        let head = match chain.block_number().await {
            Ok(head) => head,
            Err(err) => {
                warn!("Fetching block number failed: {err:#}");
                continue;
            }
        };

        let receipt = match chain.receipt(pending.tx_hash).await {
            Ok(Some(receipt)) => receipt,
            Ok(None) => {
                debug!(%head, "Not mined yet");
                continue;
            }
            Err(err) => {
                warn!("Fetching receipt failed: {err:#}");
                continue;
            }
        };

        ensure!(
            receipt.succeeded,
            "Deployment transaction reverted in block {}",
            receipt.block_number
        );

        let contract_address = receipt
            .contract_address
            .context("Receipt carries no contract address")?;

        if contract_address != pending.predicted_address {
            warn!(
                predicted = ?pending.predicted_address,
                actual = ?contract_address,
                "Contract landed at an unexpected address"
            );
        }

        let depth = receipt.block_number.depth_at(head);

        if last_depth != Some(depth) {
            info!(
                block_number = %receipt.block_number,
                "Mined, {depth}/{required} confirmations"
            );
            last_depth = Some(depth);
        }

        if depth >= required {
            return Ok(DeploymentReceipt {
                contract_address,
                transaction_hash: pending.tx_hash,
                block_number: receipt.block_number,
                confirmations: depth,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::tests::rent_artifact;
    use crate::chain::mock::MockChain;

    const POLL: Duration = Duration::from_millis(1);

    #[tokio::test]
    async fn waits_for_required_depth() {
        let chain = MockChain::new(31337);
        let pending = chain.submit_deployment(&rent_artifact()).await.unwrap();

        let receipt = await_confirmation(
            &chain,
            &pending,
            ConfirmationDepth(2),
            Duration::from_secs(5),
            POLL,
        )
        .await
        .unwrap();

        assert_eq!(receipt.contract_address, pending.predicted_address);
        assert_eq!(receipt.transaction_hash, pending.tx_hash);
        assert!(receipt.confirmations >= ConfirmationDepth(2));
        assert!(chain.head() >= BlockNumber(receipt.block_number.0 + 2));
    }

    #[tokio::test]
    async fn deeper_requirements_take_more_blocks() {
        let chain = MockChain::new(31337);
        let pending = chain.submit_deployment(&rent_artifact()).await.unwrap();

        let receipt = await_confirmation(
            &chain,
            &pending,
            ConfirmationDepth(6),
            Duration::from_secs(5),
            POLL,
        )
        .await
        .unwrap();

        assert_eq!(receipt.confirmations, ConfirmationDepth(6));
    }

    #[tokio::test]
    async fn reverted_creation_fails() {
        let mut chain = MockChain::new(31337);
        chain.revert = true;
        let pending = chain.submit_deployment(&rent_artifact()).await.unwrap();

        let err = await_confirmation(
            &chain,
            &pending,
            ConfirmationDepth(2),
            Duration::from_secs(5),
            POLL,
        )
        .await
        .unwrap_err();

        assert!(err.to_string().contains("reverted"));
    }

    #[tokio::test(start_paused = true)]
    async fn stalled_chain_times_out() {
        let mut chain = MockChain::new(31337);
        chain.stalled = true;
        let pending = chain.submit_deployment(&rent_artifact()).await.unwrap();

        let err = await_confirmation(
            &chain,
            &pending,
            ConfirmationDepth(2),
            Duration::from_secs(30),
            Duration::from_secs(1),
        )
        .await
        .unwrap_err();

        assert!(err.to_string().contains("Timed out"));
    }
}
