use std::path::PathBuf;

use clap::Parser;

pub mod private_key;

pub use private_key::PrivateKey;

pub const DEFAULT_ARTIFACT: &str =
    "artifacts/contracts/RentPaymentSystem.sol/RentPaymentSystem.json";

#[derive(Debug, Clone, Parser)]
#[clap(rename_all = "kebab-case")]
pub struct Args {
    /// Name of the network to deploy to, as listed in the networks config
    #[clap(short, long, env, default_value = "hardhat")]
    pub network: String,

    /// Path to the networks configuration file
    ///
    /// Missing files are fine as long as the selected network is
    /// `hardhat` or `localhost`
    #[clap(long, env, default_value = "networks.yml")]
    pub networks_config: PathBuf,

    /// Private key to deploy with, overrides the network's configured account
    ///
    /// Usually set as `PRIVATE_KEY` in `.env`. Without it `hardhat` and
    /// `localhost` deploy from the node's first default account, other
    /// networks need `accounts` in the networks config
    #[clap(short, long, env)]
    pub private_key: Option<PrivateKey>,

    /// Compiled contract artifact (Hardhat JSON format)
    #[clap(short, long, env, default_value = DEFAULT_ARTIFACT)]
    pub artifact: PathBuf,

    /// Directory the deployment records are written to
    #[clap(short, long, env, default_value = "deployments")]
    pub deployments_dir: PathBuf,

    /// Blocks that must be mined on top of the inclusion block
    #[clap(short, long, env, default_value_t = 2)]
    pub confirmations: u64,

    /// Seconds to wait for the confirmations before giving up
    #[clap(long, env, default_value_t = 600)]
    pub confirmation_timeout: u64,

    /// Receipt polling interval in milliseconds
    #[clap(long, env, default_value_t = 1000)]
    pub poll_interval_ms: u64,

    /// Forget an unconfirmed deployment from a previous run and submit anew
    #[clap(long, env)]
    pub discard_pending: bool,
}
