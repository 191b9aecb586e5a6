use async_trait::async_trait;
use ethers::types::{Address, H256, U256};

use crate::artifact::ContractArtifact;
use crate::deployment::steps::constants::ContractConstants;
use crate::types::{BlockNumber, ChainId};

#[cfg(test)]
pub mod mock;
pub mod rpc;

pub use rpc::RpcChain;

/// A broadcast contract creation that has not been mined yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingDeployment {
    pub tx_hash: H256,
    pub predicted_address: Address,
    pub nonce: u64,
}

/// What the node reports once a transaction is part of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InclusionReceipt {
    pub block_number: BlockNumber,
    pub contract_address: Option<Address>,
    pub succeeded: bool,
}

/// Everything the deployment needs from a network, signing included.
#[async_trait]
pub trait Chain: Send + Sync {
    async fn chain_id(&self) -> eyre::Result<ChainId>;

    fn deployer(&self) -> Address;

    async fn balance(&self, address: Address) -> eyre::Result<U256>;

    /// Signs and broadcasts a contract creation built from `artifact`.
    async fn submit_deployment(
        &self,
        artifact: &ContractArtifact,
    ) -> eyre::Result<PendingDeployment>;

    /// `None` until the transaction is mined.
    async fn receipt(
        &self,
        tx_hash: H256,
    ) -> eyre::Result<Option<InclusionReceipt>>;

    async fn block_number(&self) -> eyre::Result<BlockNumber>;

    async fn read_constants(
        &self,
        address: Address,
    ) -> eyre::Result<ContractConstants>;
}
