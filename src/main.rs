use clap::Parser;
use deployment::{DeploymentContext, DeploymentError, DeploymentOutcome};
use report::PendingMarker;
use tracing_error::ErrorLayer;
use tracing_indicatif::IndicatifLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::artifact::ContractArtifact;
use crate::chain::RpcChain;
use crate::cli::Args;
use crate::config::NetworksConfig;
use crate::deployment::error::EXIT_UNRECORDED;

pub mod serde_utils;

mod abis;
mod artifact;
mod chain;
mod cli;
mod config;
mod deployment;
mod report;
mod types;

/// Exit code when the run is interrupted before anything was broadcast.
const EXIT_INTERRUPTED: i32 = 130;

async fn connect(
    args: &Args,
) -> eyre::Result<(DeploymentContext, RpcChain)> {
    let networks = NetworksConfig::load(&args.networks_config).await?;
    let network = networks.network(&args.network)?;
    let private_key = network.signer_key(args.private_key.as_ref())?;

    let artifact = ContractArtifact::load(&args.artifact).await?;

    let context =
        DeploymentContext::from_args(args, network.chain_id, artifact)?;
    let chain = RpcChain::connect(&network.rpc_url()?, &private_key).await?;

    Ok((context, chain))
}

async fn start(args: Args) -> Result<DeploymentOutcome, DeploymentError> {
    let (context, chain) =
        connect(&args).await.map_err(DeploymentError::Config)?;

    tokio::select! {
        outcome = deployment::run_deployment(&context, &chain) => outcome,
        _ = tokio::signal::ctrl_c() => {
            std::process::exit(interrupted_exit_code(&context).await)
        }
    }
}

/// Picks the exit code for a Ctrl-C, based on whether a broadcast may be in flight.
async fn interrupted_exit_code(context: &DeploymentContext) -> i32 {
    let pending_path = context.pending_path();

    match serde_utils::read_json_opt::<PendingMarker>(&pending_path).await {
        Ok(Some(marker)) => {
            tracing::error!(
                "UNRECORDED_DEPLOYMENT interrupted while {:?} is pending, rerun to resume it",
                marker.transaction_hash
            );
            EXIT_UNRECORDED
        }
        Ok(None) => {
            tracing::error!("Interrupted before anything was broadcast");
            EXIT_INTERRUPTED
        }
        Err(err) => {
            tracing::error!(
                "UNRECORDED_DEPLOYMENT interrupted and {} could not be read, a transaction may be pending: {err:?}",
                pending_path.display()
            );
            EXIT_UNRECORDED
        }
    }
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    color_eyre::install()?;

    dotenv::dotenv().ok();

    let indicatif_layer = IndicatifLayer::new();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(indicatif_layer.get_stderr_writer())
                .with_filter(filter),
        )
        .with(indicatif_layer)
        .with(ErrorLayer::default())
        .init();

    let args = Args::parse();

    match start(args).await {
        Ok(outcome) => {
            println!("{outcome}");
            tracing::info!("Deployment completed successfully!");
            Ok(())
        }
        Err(err) => {
            let stage = err.stage();
            let code = err.exit_code();

            if let Some(tx_hash) = err.tx_hash() {
                tracing::error!(
                    %stage,
                    "UNRECORDED_DEPLOYMENT transaction {tx_hash:?} is on chain without a deployment record, reconcile it manually"
                );
            }

            let report = eyre::Report::new(err);
            tracing::error!(%stage, "Deployment failed: {:?}", report);

            std::process::exit(code)
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use ethers::types::{Address, H256};

    use super::*;
    use crate::artifact::tests::rent_artifact;
    use crate::types::ChainId;

    fn context(dir: &std::path::Path) -> DeploymentContext {
        DeploymentContext::new("sepolia", None, rent_artifact(), dir)
    }

    #[tokio::test]
    async fn interrupt_without_marker_exits_interrupted() {
        let dir = tempfile::tempdir().unwrap();

        assert_eq!(
            interrupted_exit_code(&context(dir.path())).await,
            EXIT_INTERRUPTED
        );
    }

    #[tokio::test]
    async fn interrupt_with_marker_exits_unrecorded() {
        let dir = tempfile::tempdir().unwrap();
        let context = context(dir.path());

        let marker = PendingMarker {
            network: "sepolia".to_string(),
            chain_id: ChainId(11155111),
            deployer_address: Address::repeat_byte(0xde),
            transaction_hash: H256::repeat_byte(0x77),
            predicted_address: Address::repeat_byte(0x88),
            nonce: 0,
            submitted_at: Utc::now(),
        };
        serde_utils::write_json_atomic(context.pending_path(), &marker)
            .await
            .unwrap();

        assert_eq!(interrupted_exit_code(&context).await, EXIT_UNRECORDED);
    }

    #[tokio::test]
    async fn unreadable_marker_exits_unrecorded() {
        let dir = tempfile::tempdir().unwrap();
        let context = context(dir.path());

        std::fs::write(context.pending_path(), "{ not json").unwrap();

        assert_eq!(interrupted_exit_code(&context).await, EXIT_UNRECORDED);
    }
}
