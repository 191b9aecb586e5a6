use std::sync::Arc;

use async_trait::async_trait;
use ethers::prelude::SignerMiddleware;
use ethers::providers::{Http, Middleware, Provider};
use ethers::signers::{LocalWallet, Signer};
use ethers::types::transaction::eip2718::TypedTransaction;
use ethers::types::{Address, Eip1559TransactionRequest, H256, U256};
use eyre::{Context, ContextCompat};
use reqwest::Url;
use tracing::{info, instrument};

use super::{Chain, InclusionReceipt, PendingDeployment};
use crate::abis::RentPaymentSystemConstants;
use crate::artifact::ContractArtifact;
use crate::cli::PrivateKey;
use crate::deployment::steps::constants::ContractConstants;
use crate::types::{BlockNumber, ChainId};

pub type RpcSigner = SignerMiddleware<Provider<Http>, LocalWallet>;

/// JSON-RPC node plus a local wallet.
pub struct RpcChain {
    signer: Arc<RpcSigner>,
    chain_id: ChainId,
}

impl RpcChain {
    #[instrument(skip(private_key))]
    pub async fn connect(
        rpc_url: &Url,
        private_key: &PrivateKey,
    ) -> eyre::Result<Self> {
        let provider = Provider::try_from(rpc_url.as_str())?;
        let chain_id = provider
            .get_chainid()
            .await
            .with_context(|| format!("Fetching chain id from {rpc_url}"))?;
        let chain_id = ChainId(chain_id.as_u64());

        let wallet = private_key.wallet(chain_id);

        info!(%chain_id, deployer = ?wallet.address(), "Connected");

        let signer = SignerMiddleware::new(provider, wallet);

        Ok(Self {
            signer: Arc::new(signer),
            chain_id,
        })
    }
}

#[async_trait]
impl Chain for RpcChain {
    async fn chain_id(&self) -> eyre::Result<ChainId> {
        Ok(self.chain_id)
    }

    fn deployer(&self) -> Address {
        self.signer.address()
    }

    async fn balance(&self, address: Address) -> eyre::Result<U256> {
        Ok(self.signer.get_balance(address, None).await?)
    }

    async fn submit_deployment(
        &self,
        artifact: &ContractArtifact,
    ) -> eyre::Result<PendingDeployment> {
        let mut tx = TypedTransaction::Eip1559(
            Eip1559TransactionRequest::new()
                .from(self.deployer())
                .data(artifact.bytecode.clone()),
        );

        self.signer
            .fill_transaction(&mut tx, None)
            .await
            .context("Filling deployment transaction")?;

        let nonce = *tx.nonce().context("Filled transaction has no nonce")?;
        let predicted_address =
            ethers::utils::get_contract_address(self.deployer(), nonce);

        let pending = self
            .signer
            .send_transaction(tx, None)
            .await
            .context("Send transaction")?;

        Ok(PendingDeployment {
            tx_hash: pending.tx_hash(),
            predicted_address,
            nonce: nonce.as_u64(),
        })
    }

    async fn receipt(
        &self,
        tx_hash: H256,
    ) -> eyre::Result<Option<InclusionReceipt>> {
        let Some(receipt) =
            self.signer.get_transaction_receipt(tx_hash).await?
        else {
            return Ok(None);
        };

        let Some(block_number) = receipt.block_number else {
            return Ok(None);
        };

        Ok(Some(InclusionReceipt {
            block_number: BlockNumber(block_number.as_u64()),
            contract_address: receipt.contract_address,
            // Receipts from before byzantium carry no status
            succeeded: receipt.status.map_or(true, |status| status.as_u64() == 1),
        }))
    }

    async fn block_number(&self) -> eyre::Result<BlockNumber> {
        let head = self.signer.get_block_number().await?;

        Ok(BlockNumber(head.as_u64()))
    }

    async fn read_constants(
        &self,
        address: Address,
    ) -> eyre::Result<ContractConstants> {
        let contract =
            RentPaymentSystemConstants::new(address, self.signer.clone());

        let late_penalty_rate = contract
            .late_penalty_rate()
            .call()
            .await
            .context("Calling LATE_PENALTY_RATE")?;
        let grace_period = contract
            .grace_period()
            .call()
            .await
            .context("Calling GRACE_PERIOD")?;
        let seconds_in_month = contract
            .seconds_in_month()
            .call()
            .await
            .context("Calling SECONDS_IN_MONTH")?;

        Ok(ContractConstants {
            late_penalty_rate,
            grace_period,
            seconds_in_month,
        })
    }
}
