use ethers::types::Address;
use ethers::utils::to_checksum;

use crate::config::is_local_network;

/// Command registering the contract with the block explorer, `None` on
/// networks that disappear with the local node.
pub fn verification_command(network: &str, address: Address) -> Option<String> {
    if is_local_network(network) {
        return None;
    }

    Some(format!(
        "npx hardhat verify --network {network} {}",
        to_checksum(&address, None)
    ))
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;

    use super::*;

    const ADDRESS: [u8; 20] = hex!("5fbdb2315678afecb367f032d93f642f64180aa3");

    #[test]
    fn local_networks_get_no_guidance() {
        let address = Address::from(ADDRESS);

        assert_eq!(verification_command("hardhat", address), None);
        assert_eq!(verification_command("localhost", address), None);
    }

    #[test]
    fn remote_networks_get_the_address() {
        let command =
            verification_command("sepolia", Address::from(ADDRESS)).unwrap();

        assert_eq!(
            command,
            "npx hardhat verify --network sepolia 0x5FbDB2315678afecb367f032d93F642f64180aa3"
        );
    }
}
