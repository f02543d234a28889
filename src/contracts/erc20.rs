//! ERC20 token interface
//! Used for collateral and LP token balances and approvals
use ethers::prelude::*;
abigen!(
    IERC20,
    r#"[
        function totalSupply() external view returns (uint256)
        function balanceOf(address account) external view returns (uint256)
        function allowance(address owner, address spender) external view returns (uint256)
        function approve(address spender, uint256 amount) external returns (bool)
        function decimals() external view returns (uint8)
        event Approval(address indexed owner, address indexed spender, uint256 value)
    ]"#,
);
