use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use ethers::types::{Address, H256};
use serde::{Deserialize, Serialize};

use crate::serde_utils;
use crate::types::{BlockNumber, ChainId};

/// Durable outcome of a confirmed deployment, one per network.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DeploymentRecord {
    pub network: String,
    pub chain_id: ChainId,
    #[serde(with = "serde_utils::checksum_address")]
    pub contract_address: Address,
    #[serde(with = "serde_utils::checksum_address")]
    pub deployer_address: Address,
    pub transaction_hash: H256,
    pub timestamp: DateTime<Utc>,
    pub block_number: BlockNumber,
}

/// Written between broadcast and confirmation so a later run can pick the
/// transaction up instead of sending a second one. Never a final record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingMarker {
    pub network: String,
    pub chain_id: ChainId,
    #[serde(with = "serde_utils::checksum_address")]
    pub deployer_address: Address,
    pub transaction_hash: H256,
    #[serde(with = "serde_utils::checksum_address")]
    pub predicted_address: Address,
    pub nonce: u64,
    pub submitted_at: DateTime<Utc>,
}

pub fn record_path(deployments_dir: &Path, network: &str) -> PathBuf {
    deployments_dir.join(format!("{network}_deployment.json"))
}

pub fn pending_path(deployments_dir: &Path, network: &str) -> PathBuf {
    deployments_dir.join(format!("{network}_pending.json"))
}
