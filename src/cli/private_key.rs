use std::fmt;
use std::str::FromStr;

use ethers::prelude::k256::SecretKey;
use ethers::signers::{LocalWallet, Signer};
use ethers::types::Address;

use crate::types::ChainId;

/// Secret key of the deploying account.
///
/// `Display` only shows the derived address unless the alternate flag is
/// used, so the key never ends up in logs by accident.
#[derive(Clone)]
pub struct PrivateKey {
    pub key: SecretKey,
}

impl PrivateKey {
    pub fn wallet(&self, chain_id: ChainId) -> LocalWallet {
        LocalWallet::from(self.key.clone()).with_chain_id(chain_id.0)
    }

    pub fn address(&self) -> Address {
        LocalWallet::from(self.key.clone()).address()
    }
}

impl FromStr for PrivateKey {
    type Err = eyre::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().trim_start_matches("0x");

        let bytes = hex::decode(s)?;

        let key = SecretKey::from_slice(&bytes)?;

        Ok(Self { key })
    }
}

impl fmt::Display for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if f.alternate() {
            write!(f, "{}", hex::encode(self.key.to_bytes()))
        } else {
            write!(f, "<key for {:?}>", self.address())
        }
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "PrivateKey({:?})", self.address())
    }
}
