use std::path::{Path, PathBuf};
use std::time::Duration;

use eyre::ensure;

use crate::artifact::ContractArtifact;
use crate::cli::Args;
use crate::report;
use crate::types::{ChainId, ConfirmationDepth};

/// Everything one deployment run needs, resolved once before it starts.
#[derive(Debug, Clone)]
pub struct DeploymentContext {
    pub network: String,
    /// Chain id the network is configured with, if any
    pub expected_chain_id: Option<ChainId>,
    pub artifact: ContractArtifact,
    pub deployments_dir: PathBuf,
    pub confirmations: ConfirmationDepth,
    pub confirmation_timeout: Duration,
    pub poll_interval: Duration,
    pub discard_pending: bool,
}

impl DeploymentContext {
    pub fn new(
        network: impl ToString,
        expected_chain_id: Option<ChainId>,
        artifact: ContractArtifact,
        deployments_dir: impl AsRef<Path>,
    ) -> Self {
        Self {
            network: network.to_string(),
            expected_chain_id,
            artifact,
            deployments_dir: deployments_dir.as_ref().to_owned(),
            confirmations: ConfirmationDepth::MIN,
            confirmation_timeout: Duration::from_secs(600),
            poll_interval: Duration::from_secs(1),
            discard_pending: false,
        }
    }

    pub fn from_args(
        args: &Args,
        expected_chain_id: Option<ChainId>,
        artifact: ContractArtifact,
    ) -> eyre::Result<Self> {
        Ok(Self::new(
            &args.network,
            expected_chain_id,
            artifact,
            &args.deployments_dir,
        )
        .with_confirmations(ConfirmationDepth(args.confirmations))?
        .with_confirmation_timeout(Duration::from_secs(args.confirmation_timeout))
        .with_poll_interval(Duration::from_millis(args.poll_interval_ms))?
        .with_discard_pending(args.discard_pending))
    }

    pub fn with_confirmations(
        mut self,
        confirmations: ConfirmationDepth,
    ) -> eyre::Result<Self> {
        ensure!(
            confirmations >= ConfirmationDepth::MIN,
            "At least {} confirmations are required, got {confirmations}",
            ConfirmationDepth::MIN
        );

        self.confirmations = confirmations;
        Ok(self)
    }

    pub fn with_confirmation_timeout(mut self, timeout: Duration) -> Self {
        self.confirmation_timeout = timeout;
        self
    }

    pub fn with_poll_interval(
        mut self,
        poll_interval: Duration,
    ) -> eyre::Result<Self> {
        ensure!(!poll_interval.is_zero(), "Poll interval must be positive");

        self.poll_interval = poll_interval;
        Ok(self)
    }

    pub fn with_discard_pending(mut self, discard_pending: bool) -> Self {
        self.discard_pending = discard_pending;
        self
    }

    pub fn record_path(&self) -> PathBuf {
        report::record_path(&self.deployments_dir, &self.network)
    }

    pub fn pending_path(&self) -> PathBuf {
        report::pending_path(&self.deployments_dir, &self.network)
    }
}
