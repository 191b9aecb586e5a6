use ethers::contract::abigen;

abigen!(
    RentPaymentSystemConstants,
    r#"[
        function LATE_PENALTY_RATE() external view returns (uint256)
        function GRACE_PERIOD() external view returns (uint256)
        function SECONDS_IN_MONTH() external view returns (uint256)
    ]"#
);
