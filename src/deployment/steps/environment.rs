use ethers::types::{Address, U256};
use ethers::utils::{format_ether, to_checksum};
use eyre::Context;
use tracing::{info, instrument};

use crate::chain::Chain;
use crate::deployment::{DeploymentContext, DeploymentError};
use crate::types::ChainId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    pub network: String,
    pub chain_id: ChainId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignerInfo {
    pub address: Address,
    pub balance: U256,
}

#[instrument(skip_all)]
pub async fn resolve_environment(
    context: &DeploymentContext,
    chain: &impl Chain,
) -> Result<Environment, DeploymentError> {
    let chain_id = chain
        .chain_id()
        .await
        .context("Fetching chain id")
        .map_err(DeploymentError::Config)?;

    if let Some(expected) = context.expected_chain_id {
        if expected != chain_id {
            return Err(DeploymentError::Config(eyre::eyre!(
                "Network '{}' is configured with chain id {expected} but the node reports {chain_id}",
                context.network
            )));
        }
    }

    info!("Network: {}", context.network);
    info!("Chain ID: {chain_id}");

    Ok(Environment {
        network: context.network.clone(),
        chain_id,
    })
}

#[instrument(skip_all)]
pub async fn resolve_signer(
    chain: &impl Chain,
) -> Result<SignerInfo, DeploymentError> {
    let address = chain.deployer();

    info!("Deploying with account: {}", to_checksum(&address, None));

    let balance = chain
        .balance(address)
        .await
        .with_context(|| format!("Fetching balance of {address:?}"))
        .map_err(DeploymentError::Signer)?;

    info!("Account balance: {} ETH", format_ether(balance));

    Ok(SignerInfo { address, balance })
}
