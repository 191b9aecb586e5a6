use std::fmt;
use std::path::PathBuf;

use chrono::Utc;
use ethers::types::U256;
use ethers::utils::{format_ether, to_checksum};
use tracing::{info, instrument};

use self::steps::confirmation::{self, DeploymentReceipt};
use self::steps::constants::{self, ContractConstants};
use self::steps::{environment, guidance, record, submit};
use crate::chain::Chain;
use crate::report::DeploymentRecord;

pub mod deployment_context;
pub mod error;
pub mod steps;

pub use self::deployment_context::DeploymentContext;
pub use self::error::DeploymentError;

/// Result of a run that reached the persisted state.
#[derive(Debug, Clone)]
pub struct DeploymentOutcome {
    pub contract_name: String,
    pub record: DeploymentRecord,
    pub record_path: PathBuf,
    pub receipt: DeploymentReceipt,
    pub deployer_balance: U256,
    pub constants: Option<ContractConstants>,
    pub verification_command: Option<String>,
    pub resumed: bool,
}

/// Drives one deployment from network resolution to the persisted record.
///
/// Stages run strictly in order and the first failure aborts the rest.
/// Nothing broadcast can be taken back, so failures after submission carry
/// the transaction hash for manual follow-up.
#[instrument(name = "deployment", skip_all, fields(network = %context.network))]
pub async fn run_deployment(
    context: &DeploymentContext,
    chain: &impl Chain,
) -> Result<DeploymentOutcome, DeploymentError> {
    let environment =
        environment::resolve_environment(context, chain).await?;
    let signer = environment::resolve_signer(chain).await?;

    let submitted =
        submit::submit_or_resume(context, &environment, &signer, chain)
            .await?;
    let tx_hash = submitted.pending.tx_hash;

    let receipt = confirmation::await_confirmation(
        chain,
        &submitted.pending,
        context.confirmations,
        context.confirmation_timeout,
        context.poll_interval,
    )
    .await
    .map_err(|cause| DeploymentError::Confirmation { tx_hash, cause })?;

    let contract_address = receipt.contract_address;

    info!(
        "{} deployed to: {}",
        context.artifact.contract_name,
        to_checksum(&contract_address, None)
    );

    let constants = constants::read_constants(chain, contract_address).await;

    let deployment_record = DeploymentRecord {
        network: environment.network.clone(),
        chain_id: environment.chain_id,
        contract_address,
        deployer_address: signer.address,
        transaction_hash: tx_hash,
        timestamp: Utc::now(),
        block_number: receipt.block_number,
    };

    let record_path = record::persist(context, &deployment_record)
        .await
        .map_err(|cause| DeploymentError::Persistence {
            tx_hash,
            contract_address,
            cause,
        })?;

    let verification_command =
        guidance::verification_command(&environment.network, contract_address);

    Ok(DeploymentOutcome {
        contract_name: context.artifact.contract_name.clone(),
        record: deployment_record,
        record_path,
        receipt,
        deployer_balance: signer.balance,
        constants,
        verification_command,
        resumed: submitted.resumed,
    })
}

impl fmt::Display for DeploymentOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let record = &self.record;

        writeln!(f, "Contract Information:")?;
        writeln!(f, "==========================================")?;
        writeln!(f, "Contract Name: {}", self.contract_name)?;
        writeln!(
            f,
            "Contract Address: {}",
            to_checksum(&record.contract_address, None)
        )?;
        writeln!(f, "Network: {}", record.network)?;
        writeln!(f, "Chain ID: {}", record.chain_id)?;
        writeln!(
            f,
            "Deployer: {} ({} ETH)",
            to_checksum(&record.deployer_address, None),
            format_ether(self.deployer_balance)
        )?;
        writeln!(f, "Transaction Hash: {:?}", record.transaction_hash)?;
        if self.resumed {
            writeln!(f, "Resumed from a previous run's pending transaction")?;
        }
        writeln!(
            f,
            "Block: {} ({} confirmations)",
            record.block_number, self.receipt.confirmations
        )?;

        if let Some(constants) = &self.constants {
            writeln!(f)?;
            writeln!(f, "Contract Constants:")?;
            writeln!(f, "{constants}")?;
        }

        writeln!(f)?;
        writeln!(f, "Deployment info saved to: {}", self.record_path.display())?;

        if let Some(command) = &self.verification_command {
            writeln!(f)?;
            writeln!(f, "To verify the contract, run:")?;
            writeln!(f, "{command}")?;
        }

        Ok(())
    }
}
