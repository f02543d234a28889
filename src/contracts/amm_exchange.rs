//! AMM exchange interface (one deployed exchange per market)
//! "long" is the YES side and "short" the NO side in every argument name
use ethers::prelude::*;
abigen!(
    IAMMExchange,
    r#"[
        function addLiquidity(uint256 _cash, address _recipient) external payable returns (uint256 _lpTokens, uint256 _shortShares, uint256 _longShares)
        function rateRemoveLiquidity(uint256 _poolTokensToSell, uint256 _minSetsSold) external view returns (uint256 _shortShare, uint256 _longShare, uint256 _cashShare, uint256 _setsSold)
        function removeLiquidity(uint256 _poolTokensToSell, uint256 _minSetsSold) external returns (uint256 _shortShare, uint256 _longShare, uint256 _cashShare, uint256 _setsSold)
        function swap(uint256 _inputShares, bool _inputLong, uint256 _minOutputShares) external returns (uint256)
        function enterPosition(uint256 _cashCost, bool _buyLong, uint256 _minShares) external payable returns (uint256)
        function exitPosition(uint256 _shortShares, uint256 _longShares, uint256 _minCashPayout) external returns (uint256)
        function rateExitPosition(uint256 _shortShares, uint256 _longShares) external view returns (uint256)
        function shareBalances(address _owner) external view returns (uint256 _invalid, uint256 _no, uint256 _yes)
    ]"#,
);
