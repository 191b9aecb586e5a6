use std::collections::HashMap;
use std::path::Path;

use ethers::prelude::k256::SecretKey;
use eyre::{bail, Context, ContextCompat};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::cli::PrivateKey;
use crate::serde_utils;
use crate::types::ChainId;

/// Networks that only live for the duration of a local node.
pub const LOCAL_NETWORKS: [&str; 2] = ["hardhat", "localhost"];

pub const LOCAL_RPC_URL: &str = "http://127.0.0.1:8545";
pub const LOCAL_CHAIN_ID: ChainId = ChainId(31337);

/// Key of the first account a Hardhat node unlocks, publicly known
pub const LOCAL_DEV_KEY: &str =
    "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NetworksConfig {
    #[serde(default)]
    pub networks: HashMap<String, NetworkConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub url: String,

    /// Expected chain id, checked against the node when present
    #[serde(default)]
    pub chain_id: Option<ChainId>,

    /// Keys usable on this network, the first one deploys
    #[serde(default)]
    pub accounts: Vec<Account>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account(#[serde(with = "serde_utils::secret_key")] pub SecretKey);

pub fn is_local_network(name: &str) -> bool {
    LOCAL_NETWORKS.contains(&name)
}

impl NetworksConfig {
    /// Loads the networks file, treating a missing file as an empty config.
    pub async fn load(path: impl AsRef<Path>) -> eyre::Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            info!("No networks config at {}, using built-in networks", path.display());
            return Ok(Self::default());
        }

        serde_utils::read_deserialize(path).await
    }

    /// Returns the settings for `name`, falling back to the built-in local
    /// networks when the file does not list them.
    pub fn network(&self, name: &str) -> eyre::Result<NetworkConfig> {
        if let Some(network) = self.networks.get(name) {
            return Ok(network.clone());
        }

        if is_local_network(name) {
            let dev_key: PrivateKey = LOCAL_DEV_KEY.parse()?;

            return Ok(NetworkConfig {
                url: LOCAL_RPC_URL.to_string(),
                chain_id: Some(LOCAL_CHAIN_ID),
                accounts: vec![Account(dev_key.key)],
            });
        }

        let mut known: Vec<&str> =
            self.networks.keys().map(String::as_str).collect();
        known.sort_unstable();

        bail!(
            "Network '{name}' is not configured (known networks: {})",
            known.join(", ")
        )
    }
}

impl NetworkConfig {
    pub fn rpc_url(&self) -> eyre::Result<Url> {
        self.url
            .parse()
            .with_context(|| format!("Invalid RPC url '{}'", self.url))
    }

    /// Picks the deploying key, the explicit one wins over configured accounts.
    pub fn signer_key(
        &self,
        explicit: Option<&PrivateKey>,
    ) -> eyre::Result<PrivateKey> {
        if let Some(key) = explicit {
            return Ok(key.clone());
        }

        let account = self
            .accounts
            .first()
            .context("No private key given and no accounts configured for the network")?;

        Ok(PrivateKey {
            key: account.0.clone(),
        })
    }
}
