use std::io::Write;
use std::path::Path;

use eyre::{Context, ContextCompat};
use serde::de::DeserializeOwned;
use serde::Serialize;

pub mod secret_key {
    use ethers::prelude::k256::SecretKey;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(
        key: &SecretKey,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let gen_arr = key.to_bytes();
        let bytes = gen_arr.as_slice();
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<SecretKey, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let s = s.trim_start_matches("0x");

        let bytes = hex::decode(s).map_err(serde::de::Error::custom)?;

        SecretKey::from_slice(&bytes).map_err(serde::de::Error::custom)
    }
}

/// Addresses as EIP-55 checksummed hex, accepting any case when reading.
pub mod checksum_address {
    use ethers::types::Address;
    use ethers::utils::to_checksum;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(
        address: &Address,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&to_checksum(address, None))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Address, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let s = s.trim_start_matches("0x");

        let bytes = hex::decode(s).map_err(serde::de::Error::custom)?;
        if bytes.len() != Address::len_bytes() {
            return Err(serde::de::Error::custom(format!(
                "expected a 20 byte address, got {} bytes",
                bytes.len()
            )));
        }

        Ok(Address::from_slice(&bytes))
    }
}

pub async fn read_deserialize<T>(path: impl AsRef<Path>) -> eyre::Result<T>
where
    T: DeserializeOwned,
{
    let path = path.as_ref();

    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Reading from {}", path.display()))?;

    let value = serde_yaml::from_str(&content).with_context(|| {
        format!("Parsing {} content was {content}", path.display())
    })?;

    Ok(value)
}

/// Reads a JSON file, `None` when it does not exist.
pub async fn read_json_opt<T>(path: impl AsRef<Path>) -> eyre::Result<Option<T>>
where
    T: DeserializeOwned,
{
    let path = path.as_ref();

    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Ok(None)
        }
        Err(err) => {
            return Err(err)
                .with_context(|| format!("Reading from {}", path.display()))
        }
    };

    let value = serde_json::from_str(&content)
        .with_context(|| format!("Parsing {}", path.display()))?;

    Ok(Some(value))
}

/// Writes `value` as 2-space indented JSON.
///
/// The content goes to a temporary file in the target directory first and
/// is then renamed over `path`, so readers see either the old or the new
/// file and never a partial one. The parent directory is created if needed.
pub async fn write_json_atomic<T>(
    path: impl AsRef<Path>,
    value: &T,
) -> eyre::Result<()>
where
    T: Serialize,
{
    let path = path.as_ref().to_owned();

    let mut content = serde_json::to_string_pretty(value)
        .with_context(|| format!("Serializing {}", path.display()))?;
    content.push('\n');

    let dir = path
        .parent()
        .with_context(|| format!("{} has no parent directory", path.display()))?
        .to_owned();

    tokio::fs::create_dir_all(&dir)
        .await
        .with_context(|| format!("Creating {}", dir.display()))?;

    tokio::task::spawn_blocking(move || -> eyre::Result<()> {
        let mut file = tempfile::NamedTempFile::new_in(&dir)
            .with_context(|| format!("Creating temp file in {}", dir.display()))?;

        file.write_all(content.as_bytes())?;
        file.as_file().sync_all()?;

        file.persist(&path)
            .with_context(|| format!("Writing to {}", path.display()))?;

        Ok(())
    })
    .await?
}

/// Deletes `path`, a missing file is not an error.
pub async fn remove_if_exists(path: impl AsRef<Path>) -> eyre::Result<()> {
    let path = path.as_ref();

    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(err) => {
            Err(err).with_context(|| format!("Removing {}", path.display()))
        }
    }
}
