use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;
use ethers::types::{Address, H256, U256};
use eyre::bail;

use super::{Chain, InclusionReceipt, PendingDeployment};
use crate::artifact::ContractArtifact;
use crate::deployment::steps::constants::ContractConstants;
use crate::types::{BlockNumber, ChainId};

#[derive(Debug, Clone, Copy)]
struct MinedTx {
    block_number: BlockNumber,
    contract_address: Address,
    succeeded: bool,
}

#[derive(Debug, Default)]
struct State {
    head: u64,
    nonce: u64,
    txs: HashMap<H256, MinedTx>,
    submissions: Vec<H256>,
}

/// In-memory chain, every `block_number` call mines a block unless stalled.
pub struct MockChain {
    pub chain_id: ChainId,
    pub deployer: Address,
    pub balance: U256,
    pub fail_submit: bool,
    pub fail_constants: bool,
    pub revert: bool,
    pub stalled: bool,
    /// Directory created right after broadcast, to get in the way of a file
    pub occupy_after_submit: Option<PathBuf>,
    state: Mutex<State>,
}

impl MockChain {
    pub fn new(chain_id: u64) -> Self {
        Self {
            chain_id: ChainId(chain_id),
            deployer: Address::repeat_byte(0xde),
            balance: U256::exp10(18),
            fail_submit: false,
            fail_constants: false,
            revert: false,
            stalled: false,
            occupy_after_submit: None,
            state: Mutex::new(State {
                head: 100,
                ..Default::default()
            }),
        }
    }

    /// Seeds a deployment that was already broadcast by an earlier run.
    pub fn with_mined_tx(
        self,
        tx_hash: H256,
        block_number: u64,
        contract_address: Address,
    ) -> Self {
        self.state.lock().unwrap().txs.insert(
            tx_hash,
            MinedTx {
                block_number: BlockNumber(block_number),
                contract_address,
                succeeded: true,
            },
        );
        self
    }

    pub fn submissions(&self) -> Vec<H256> {
        self.state.lock().unwrap().submissions.clone()
    }

    pub fn head(&self) -> BlockNumber {
        BlockNumber(self.state.lock().unwrap().head)
    }
}

#[async_trait]
impl Chain for MockChain {
    async fn chain_id(&self) -> eyre::Result<ChainId> {
        Ok(self.chain_id)
    }

    fn deployer(&self) -> Address {
        self.deployer
    }

    async fn balance(&self, _address: Address) -> eyre::Result<U256> {
        Ok(self.balance)
    }

    async fn submit_deployment(
        &self,
        _artifact: &ContractArtifact,
    ) -> eyre::Result<PendingDeployment> {
        if self.fail_submit {
            bail!("insufficient funds for gas * price + value");
        }

        let mut state = self.state.lock().unwrap();

        let nonce = state.nonce;
        state.nonce += 1;

        let tx_hash = H256::from_low_u64_be(0x1000 + nonce);
        let predicted_address =
            ethers::utils::get_contract_address(self.deployer, nonce);

        let block_number = BlockNumber(state.head + 1);
        state.txs.insert(
            tx_hash,
            MinedTx {
                block_number,
                contract_address: predicted_address,
                succeeded: !self.revert,
            },
        );
        state.submissions.push(tx_hash);

        if let Some(path) = &self.occupy_after_submit {
            std::fs::create_dir_all(path)?;
        }

        Ok(PendingDeployment {
            tx_hash,
            predicted_address,
            nonce,
        })
    }

    async fn receipt(
        &self,
        tx_hash: H256,
    ) -> eyre::Result<Option<InclusionReceipt>> {
        let state = self.state.lock().unwrap();

        let receipt = state
            .txs
            .get(&tx_hash)
            .filter(|tx| tx.block_number.0 <= state.head)
            .map(|tx| InclusionReceipt {
                block_number: tx.block_number,
                contract_address: tx.succeeded.then_some(tx.contract_address),
                succeeded: tx.succeeded,
            });

        Ok(receipt)
    }

    async fn block_number(&self) -> eyre::Result<BlockNumber> {
        let mut state = self.state.lock().unwrap();

        if !self.stalled {
            state.head += 1;
        }

        Ok(BlockNumber(state.head))
    }

    async fn read_constants(
        &self,
        _address: Address,
    ) -> eyre::Result<ContractConstants> {
        if self.fail_constants {
            bail!("execution reverted: function selector was not recognized");
        }

        Ok(ContractConstants {
            late_penalty_rate: U256::from(5),
            grace_period: U256::from(5 * 86_400),
            seconds_in_month: U256::from(30 * 86_400),
        })
    }
}
