//! AMM factory interface
//! Deploys one exchange per (market, share token, fee) and seeds it
use ethers::prelude::*;
abigen!(
    IAMMFactory,
    r#"[
        function calculateAMMAddress(address _market, address _para, uint256 _fee) external view returns (address)
        function exchanges(address _market, address _para, uint256 _fee) external view returns (address)
        function addAMM(address _market, address _para, uint256 _fee) external returns (address)
        function addAMMWithLiquidity(address _market, address _para, uint256 _fee, uint256 _cash, uint256 _ratioFactor, bool _keepLong, address _recipient) external payable returns (address _ammAddress, uint256 _lpTokens, uint256 _shortShares, uint256 _longShares)
        function addInitialLiquidity(address _market, address _para, uint256 _fee, uint256 _cash, uint256 _ratioFactor, bool _keepLong, address _recipient) external payable returns (uint256 _lpTokens, uint256 _shortShares, uint256 _longShares)
        event AMMCreated(address amm, address market, address shareToken, uint256 fee)
    ]"#,
);
