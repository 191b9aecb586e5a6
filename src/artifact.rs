use std::path::Path;

use ethers::abi::Abi;
use ethers::types::Bytes;
use eyre::{ensure, Context};
use serde::Deserialize;
use tracing::instrument;

/// Compiled contract as emitted by `hardhat compile`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractArtifact {
    pub contract_name: String,
    #[serde(default)]
    pub source_name: Option<String>,
    pub abi: Abi,
    pub bytecode: Bytes,
}

impl ContractArtifact {
    #[instrument(name = "load_artifact")]
    pub async fn load(path: &Path) -> eyre::Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Reading artifact {}", path.display()))?;

        let artifact = Self::from_json(&content)
            .with_context(|| format!("Parsing artifact {}", path.display()))?;

        Ok(artifact)
    }

    pub fn from_json(content: &str) -> eyre::Result<Self> {
        let artifact: Self = serde_json::from_str(content)?;

        ensure!(
            !artifact.bytecode.is_empty(),
            "Artifact for {} has no bytecode, is it abstract or an interface?",
            artifact.contract_name
        );

        Ok(artifact)
    }
}
