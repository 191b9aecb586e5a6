use std::fmt;

use ethers::types::{Address, U256};
use tracing::{instrument, warn};

use crate::chain::Chain;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Fixed configuration baked into the deployed contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContractConstants {
    /// Percent charged on late payments
    pub late_penalty_rate: U256,
    /// Seconds
    pub grace_period: U256,
    /// Seconds
    pub seconds_in_month: U256,
}

fn days(seconds: U256) -> Option<f64> {
    (seconds.bits() <= 64).then(|| seconds.as_u64() as f64 / SECONDS_PER_DAY)
}

fn fmt_duration(f: &mut fmt::Formatter<'_>, seconds: U256) -> fmt::Result {
    match days(seconds) {
        Some(days) => write!(f, "{seconds} seconds ({days} days)"),
        None => write!(f, "{seconds} seconds"),
    }
}

impl fmt::Display for ContractConstants {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Late Penalty Rate: {}%", self.late_penalty_rate)?;
        write!(f, "Grace Period: ")?;
        fmt_duration(f, self.grace_period)?;
        writeln!(f)?;
        write!(f, "Seconds in Month: ")?;
        fmt_duration(f, self.seconds_in_month)
    }
}

/// Reads the constants for display only, failures are logged and dropped.
#[instrument(skip(chain))]
pub async fn read_constants(
    chain: &impl Chain,
    address: Address,
) -> Option<ContractConstants> {
    match chain.read_constants(address).await {
        Ok(constants) => Some(constants),
        Err(err) => {
            warn!("Could not fetch contract constants: {err:#}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use super::*;
    use crate::chain::mock::MockChain;

    #[test]
    fn renders_days_like_the_contract_docs() {
        let constants = ContractConstants {
            late_penalty_rate: U256::from(5),
            grace_period: U256::from(5 * 86_400),
            seconds_in_month: U256::from(2_592_000),
        };

        assert_eq!(
            constants.to_string(),
            indoc! {"
                Late Penalty Rate: 5%
                Grace Period: 432000 seconds (5 days)
                Seconds in Month: 2592000 seconds (30 days)"
            }
        );
    }

    #[test]
    fn fractional_days_are_kept() {
        assert_eq!(days(U256::from(43_200)), Some(0.5));
        assert_eq!(days(U256::MAX), None);
    }

    #[tokio::test]
    async fn failed_read_is_swallowed() {
        let mut chain = MockChain::new(31337);
        chain.fail_constants = true;

        assert_eq!(read_constants(&chain, Address::zero()).await, None);
    }

    #[tokio::test]
    async fn successful_read_is_returned() {
        let chain = MockChain::new(31337);

        let constants = read_constants(&chain, Address::zero()).await.unwrap();

        assert_eq!(constants.late_penalty_rate, U256::from(5));
    }
}
