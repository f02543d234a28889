use amm_liquidity::config::ClientConfig;
use amm_liquidity::core::{AmmExchange, PoolState};
use amm_liquidity::liquidity::{
    compute_ratio, get_add_breakdown, get_remove_breakdown, lp_for_percent, AddBreakdownParams,
    LiquidityRatio, RemoveBreakdownParams,
};
use amm_liquidity::models::{Amount, CollateralKind, LiquidityBreakdown, MarketKey, Outcome, PriceInputs};
use amm_liquidity::{AmmError, Result};
use clap::{Args, Parser, Subcommand};
use ethers::types::{Address, U256};
use std::path::PathBuf;

/// Quote and inspect liquidity for binary-outcome AMM pools
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON config file; flags override its values
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Node RPC URL
    #[arg(short, long, global = true)]
    rpc: Option<String>,

    /// AMM factory address
    #[arg(short, long, global = true)]
    factory: Option<String>,

    /// Collateral is the chain's native asset
    #[arg(long, global = true)]
    native: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Show verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute the seeding ratio offline
    Ratio {
        /// Cash in base units
        #[arg(long)]
        cash: String,
        /// YES percentage
        #[arg(long)]
        yes: String,
        /// NO percentage (defaults to 100 - yes)
        #[arg(long)]
        no: Option<String>,
    },
    /// Quote adding liquidity
    QuoteAdd {
        #[command(flatten)]
        market: MarketArgs,
        /// Account receiving the LP tokens
        #[arg(long)]
        account: String,
        /// Cash to add, in display units
        #[arg(long)]
        amount: String,
        /// YES price between 0 and 1; NO is its complement
        #[arg(long, default_value = "0.5")]
        yes_price: String,
    },
    /// Quote removing liquidity
    QuoteRemove {
        #[command(flatten)]
        market: MarketArgs,
        #[arg(long)]
        account: String,
        /// LP tokens to burn, in display units
        #[arg(long, required_unless_present = "percent")]
        amount: Option<String>,
        /// Share of the account's LP position to burn, 0-100
        #[arg(long, conflicts_with = "amount")]
        percent: Option<String>,
    },
    /// Show a market's exchange and its LP supply
    Pool {
        #[command(flatten)]
        market: MarketArgs,
        /// Also show this account's LP and share balances
        #[arg(long)]
        account: Option<String>,
    },
}

#[derive(Args, Debug)]
struct MarketArgs {
    /// Market address
    #[arg(long)]
    market: String,
    /// Para share token address
    #[arg(long)]
    share_token: String,
    /// Fee in the factory's raw units
    #[arg(long, default_value = "0")]
    fee: String,
}

impl MarketArgs {
    fn key(&self) -> Result<MarketKey> {
        let fee = U256::from_dec_str(&self.fee)
            .map_err(|e| AmmError::InvalidAmount(format!("fee '{}': {}", self.fee, e)))?;
        Ok(MarketKey::new(parse_address(&self.market)?, parse_address(&self.share_token)?, fee))
    }
}

fn parse_address(input: &str) -> Result<Address> {
    input.parse().map_err(|_| AmmError::InvalidAddress(input.to_string()))
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Setup logging
    let filter = if cli.verbose { "amm_liquidity=debug" } else { "amm_liquidity=info" };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("❌ {}", e);
        let code = match e {
            AmmError::Validation(_) | AmmError::InvalidAddress(_) | AmmError::InvalidAmount(_) => 2,
            _ => 3,
        };
        std::process::exit(code);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => ClientConfig::from_file(path)?,
        None => ClientConfig::default(),
    };
    if let Some(rpc) = &cli.rpc {
        config.rpc_url = rpc.clone();
    }
    if let Some(factory) = &cli.factory {
        config.factory = parse_address(factory)?;
    }
    if cli.native {
        config.collateral = CollateralKind::Native;
    }

    match &cli.command {
        Command::Ratio { cash, yes, no } => {
            let yes = Amount::parse(yes)?;
            let no = match no {
                Some(no) => Amount::parse(no)?,
                None => Amount::ONE_HUNDRED.checked_sub(&yes)
                    .ok_or_else(|| AmmError::Validation(format!("yes percent {} exceeds 100", yes)))?,
            };
            let ratio = compute_ratio(&Amount::parse(cash)?, &yes, &no)?;
            print_ratio(&ratio, cli.json)
        }
        Command::QuoteAdd { market, account, amount, yes_price } => {
            let (_, gateway) = config.connect().await?;
            let mut prices = PriceInputs::default();
            prices.set(Outcome::Yes, yes_price.clone());

            let params = AddBreakdownParams {
                account: Some(parse_address(account)?),
                market: Some(market.key()?),
                amount: amount.clone(),
                prices,
                decimals: config.decimals,
            };
            let breakdown = get_add_breakdown(&gateway, &params).await;
            print_breakdown(breakdown, cli.json)
        }
        Command::QuoteRemove { market, account, amount, percent } => {
            let (_, gateway) = config.connect().await?;
            let account = parse_address(account)?;
            let key = market.key()?;

            let amount = match (amount, percent) {
                (Some(amount), _) => amount.clone(),
                (None, Some(percent)) => {
                    let exchange = AmmExchange::new(gateway.clone(), key);
                    let (balance, _) = exchange.lp_position(account).await?;
                    let lp_tokens = lp_for_percent(balance, &Amount::parse(percent)?)?;
                    Amount::from_raw(lp_tokens, config.decimals.lp_tokens)?.to_string()
                }
                (None, None) => return Err(AmmError::Validation("--amount or --percent is required".into())),
            };

            let params = RemoveBreakdownParams {
                account: Some(account),
                market: Some(key),
                amount,
                decimals: config.decimals,
            };
            let breakdown = get_remove_breakdown(&gateway, &params).await;
            print_breakdown(breakdown, cli.json)
        }
        Command::Pool { market, account } => {
            let (client, gateway) = config.connect().await?;
            println!("✓ Connected to {}", client.chain_name());

            let exchange = AmmExchange::new(gateway, market.key()?);
            match exchange.pool_state().await? {
                PoolState::NotDeployed => {
                    println!("No exchange deployed (would be at {:?})", exchange.amm_address().await?);
                }
                PoolState::Empty { amm } => println!("Exchange {:?} has no liquidity", amm),
                PoolState::Funded { amm, total_supply } => {
                    let supply = Amount::from_raw(total_supply, config.decimals.lp_tokens)?;
                    println!("Exchange {:?}: {} LP tokens", amm, supply);
                }
            }

            if let Some(account) = account {
                let account = parse_address(account)?;
                let lp = exchange.balance_of(account).await?;
                let shares = exchange.share_balances(account).await?;
                let decimals = config.decimals;
                println!("LP tokens:      {}", Amount::from_raw(lp, decimals.lp_tokens)?);
                println!("YES shares:     {}", Amount::from_raw(shares.yes, decimals.shares)?);
                println!("NO shares:      {}", Amount::from_raw(shares.no, decimals.shares)?);
                println!("INVALID shares: {}", Amount::from_raw(shares.invalid, decimals.shares)?);
                if config.collateral.for_native() {
                    let balance = client.native_balance(account).await?;
                    println!("Native balance: {}", Amount::from_raw(balance, decimals.cash)?);
                }
            }
            Ok(())
        }
    }
}

fn print_ratio(ratio: &LiquidityRatio, json: bool) -> Result<()> {
    match ratio {
        LiquidityRatio::Empty => {
            if json {
                println!("{}", serde_json::json!({ "empty": true }));
            } else {
                println!("No cash: the pool is created without liquidity");
            }
        }
        LiquidityRatio::Seeded { cash, ratio, keep_yes } => {
            if json {
                let value = serde_json::json!({
                    "cash": cash.to_string(),
                    "ratio": ratio.to_string(),
                    "keepYes": keep_yes,
                });
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                println!("cash:     {}", cash);
                println!("ratio:    {}", ratio);
                println!("keep:     {}", if *keep_yes { "YES" } else { "NO" });
            }
        }
    }
    Ok(())
}

fn print_breakdown(breakdown: Option<LiquidityBreakdown>, json: bool) -> Result<()> {
    if breakdown.is_none() {
        tracing::warn!("No quote available, showing zero breakdown");
    }
    let breakdown = breakdown.unwrap_or_default();

    if json {
        println!("{}", serde_json::to_string_pretty(&breakdown)?);
    } else {
        print!("{}", breakdown);
    }
    Ok(())
}
