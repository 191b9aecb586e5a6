use ethers::types::{Address, H256};

/// Exit code for failures that happened before anything was broadcast.
pub const EXIT_FAILURE: i32 = 1;
/// Exit code for failures that left a transaction on chain without a record.
pub const EXIT_UNRECORDED: i32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Stage {
    ResolveEnvironment,
    ResolveSigner,
    Submit,
    AwaitConfirmation,
    Persist,
}

#[derive(Debug, thiserror::Error)]
pub enum DeploymentError {
    #[error("Configuration error: {0:#}")]
    Config(eyre::Report),

    #[error("Could not resolve the deploying account: {0:#}")]
    Signer(eyre::Report),

    #[error("Submitting the deployment failed: {0:#}")]
    Submission(eyre::Report),

    #[error("Deployment transaction {tx_hash:?} was broadcast but its pending marker could not be written: {cause:#}")]
    PendingMarker { tx_hash: H256, cause: eyre::Report },

    #[error("Deployment transaction {tx_hash:?} was not confirmed: {cause:#}")]
    Confirmation { tx_hash: H256, cause: eyre::Report },

    #[error("Contract deployed at {contract_address:?} by {tx_hash:?} but the record could not be written: {cause:#}")]
    Persistence {
        tx_hash: H256,
        contract_address: Address,
        cause: eyre::Report,
    },
}

impl DeploymentError {
    pub fn stage(&self) -> Stage {
        match self {
            Self::Config(_) => Stage::ResolveEnvironment,
            Self::Signer(_) => Stage::ResolveSigner,
            Self::Submission(_) | Self::PendingMarker { .. } => Stage::Submit,
            Self::Confirmation { .. } => Stage::AwaitConfirmation,
            Self::Persistence { .. } => Stage::Persist,
        }
    }

    /// Hash of a transaction that is already on its way, if any.
    pub fn tx_hash(&self) -> Option<H256> {
        match self {
            Self::PendingMarker { tx_hash, .. }
            | Self::Confirmation { tx_hash, .. }
            | Self::Persistence { tx_hash, .. } => Some(*tx_hash),
            _ => None,
        }
    }

    pub fn exit_code(&self) -> i32 {
        if self.tx_hash().is_some() {
            EXIT_UNRECORDED
        } else {
            EXIT_FAILURE
        }
    }
}
