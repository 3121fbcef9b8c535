//! Tidepool CLI - sandbox driver for the constant-product pool engine
//!
//! All state lives in a JSON world file. Every command loads it, runs
//! one engine operation, and writes the result back, so a session can
//! be replayed or inspected between commands.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use tidepool_engine::AccountId;

mod account;
mod config;
mod liquidity;
mod pool;
mod swap;
mod token;
mod world;

use config::SandboxConfig;
use world::World;

#[derive(Parser)]
#[command(name = "tidepool")]
#[command(about = "Tidepool CLI - constant-product liquidity pool sandbox", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to a TOML config file (default: ./tidepool.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// World file to operate on (overrides the config file)
    #[arg(short, long)]
    world: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an empty world file
    Init,

    /// Account operations
    Account {
        #[command(subcommand)]
        command: AccountCommands,
    },

    /// Token ledger operations
    Token {
        #[command(subcommand)]
        command: TokenCommands,
    },

    /// Pool creation and inspection
    Pool {
        #[command(subcommand)]
        command: PoolCommands,
    },

    /// Liquidity provider operations
    Liquidity {
        #[command(subcommand)]
        command: LiquidityCommands,
    },

    /// Execute swaps
    Swap {
        #[command(subcommand)]
        command: SwapCommands,
    },

    /// Read-only price quotes
    Quote {
        #[command(subcommand)]
        command: QuoteCommands,
    },
}

#[derive(Subcommand)]
enum AccountCommands {
    /// Credit native units to an account, creating it if needed
    Fund {
        /// Account name
        name: String,

        /// Native amount to credit
        #[arg(long)]
        native: u128,
    },

    /// Show an account's balances across every ledger
    Show {
        /// Account name
        name: String,
    },
}

#[derive(Subcommand)]
enum TokenCommands {
    /// Create a token and mint its initial supply to an owner
    Create {
        /// Token symbol
        symbol: String,

        /// Initial supply minted to the owner
        #[arg(long)]
        supply: u128,

        /// Owner account name (created if needed)
        #[arg(long)]
        owner: String,
    },

    /// Authorize the token's pool to pull from the acting account
    Approve {
        /// Token symbol
        symbol: String,

        /// Allowance to set
        #[arg(long)]
        amount: u128,

        /// Acting account (defaults to the config's actor)
        #[arg(long = "as")]
        actor: Option<String>,
    },

    /// Show a token balance
    Balance {
        /// Token symbol
        symbol: String,

        /// Account name
        name: String,
    },
}

#[derive(Subcommand)]
enum PoolCommands {
    /// Create an empty pool for a token
    Create {
        /// Token symbol
        symbol: String,
    },

    /// List pools with their reserves
    List,

    /// Show one pool's reserves and share supply
    Status {
        /// Token symbol
        symbol: String,
    },
}

#[derive(Subcommand)]
enum LiquidityCommands {
    /// Deposit native and tokens for pool shares
    Add {
        /// Token symbol
        symbol: String,

        /// Native amount to deposit
        #[arg(long)]
        native: u128,

        /// Token ceiling; at the current ratio only the required
        /// amount is pulled
        #[arg(long)]
        max_tokens: u128,

        /// Acting account (defaults to the config's actor)
        #[arg(long = "as")]
        actor: Option<String>,
    },

    /// Burn shares for a pro-rata slice of both reserves
    Remove {
        /// Token symbol
        symbol: String,

        /// Shares to burn
        #[arg(long)]
        shares: u128,

        /// Acting account (defaults to the config's actor)
        #[arg(long = "as")]
        actor: Option<String>,
    },
}

#[derive(Subcommand)]
enum SwapCommands {
    /// Spend native units for tokens
    NativeToToken {
        /// Token symbol
        symbol: String,

        /// Native amount to spend
        #[arg(long)]
        native: u128,

        /// Reject the swap if fewer tokens would come out
        #[arg(long, default_value = "0")]
        min_out: u128,

        /// Acting account (defaults to the config's actor)
        #[arg(long = "as")]
        actor: Option<String>,
    },

    /// Spend tokens for native units (requires prior approval)
    TokenToNative {
        /// Token symbol
        symbol: String,

        /// Token amount to spend
        #[arg(long)]
        tokens: u128,

        /// Reject the swap if less native would come out
        #[arg(long, default_value = "0")]
        min_out: u128,

        /// Acting account (defaults to the config's actor)
        #[arg(long = "as")]
        actor: Option<String>,
    },
}

#[derive(Subcommand)]
enum QuoteCommands {
    /// Price a native -> token swap at current reserves
    NativeToToken {
        /// Token symbol
        symbol: String,

        /// Native amount
        #[arg(long)]
        amount: u128,
    },

    /// Price a token -> native swap at current reserves
    TokenToNative {
        /// Token symbol
        symbol: String,

        /// Token amount
        #[arg(long)]
        amount: u128,
    },
}

/// `--as` wins over the config file's `actor`. The account must
/// already exist; funding creates it.
fn resolve_actor(world: &World, config: &SandboxConfig, flag: Option<String>) -> Result<AccountId> {
    let name = flag
        .or_else(|| config.actor.clone())
        .context("no acting account: pass --as or set `actor` in the config file")?;
    world.account(&name)
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = SandboxConfig::load(cli.config.as_deref(), cli.world)?;

    if cli.verbose {
        println!(
            "{} {}",
            "World:".bright_cyan(),
            config.world_path.display()
        );
        if let Some(actor) = &config.actor {
            println!("{} {}", "Actor:".bright_cyan(), actor);
        }
    }

    if let Commands::Init = cli.command {
        World::init(&config.world_path)?;
        println!(
            "{} {}",
            "Created world file:".bright_green().bold(),
            config.world_path.display()
        );
        return Ok(());
    }

    let mut world = World::load(&config.world_path)?;

    let mutated = match cli.command {
        Commands::Init => false, // handled above
        Commands::Account { command } => match command {
            AccountCommands::Fund { name, native } => {
                account::fund(&mut world, &name, native)?;
                true
            }
            AccountCommands::Show { name } => {
                account::show(&world, &name)?;
                false
            }
        },
        Commands::Token { command } => match command {
            TokenCommands::Create {
                symbol,
                supply,
                owner,
            } => {
                token::create(&mut world, &symbol, supply, &owner)?;
                true
            }
            TokenCommands::Approve {
                symbol,
                amount,
                actor,
            } => {
                let actor = resolve_actor(&world, &config, actor)?;
                token::approve(&world, &symbol, actor, amount)?;
                true
            }
            TokenCommands::Balance { symbol, name } => {
                token::balance(&world, &symbol, &name)?;
                false
            }
        },
        Commands::Pool { command } => match command {
            PoolCommands::Create { symbol } => {
                pool::create(&mut world, &symbol)?;
                true
            }
            PoolCommands::List => {
                pool::list(&world)?;
                false
            }
            PoolCommands::Status { symbol } => {
                pool::status(&world, &symbol)?;
                false
            }
        },
        Commands::Liquidity { command } => match command {
            LiquidityCommands::Add {
                symbol,
                native,
                max_tokens,
                actor,
            } => {
                let actor = resolve_actor(&world, &config, actor)?;
                liquidity::add(&world, &symbol, actor, native, max_tokens)?;
                true
            }
            LiquidityCommands::Remove {
                symbol,
                shares,
                actor,
            } => {
                let actor = resolve_actor(&world, &config, actor)?;
                liquidity::remove(&world, &symbol, actor, shares)?;
                true
            }
        },
        Commands::Swap { command } => match command {
            SwapCommands::NativeToToken {
                symbol,
                native,
                min_out,
                actor,
            } => {
                let actor = resolve_actor(&world, &config, actor)?;
                swap::native_to_token(&world, &symbol, actor, native, min_out)?;
                true
            }
            SwapCommands::TokenToNative {
                symbol,
                tokens,
                min_out,
                actor,
            } => {
                let actor = resolve_actor(&world, &config, actor)?;
                swap::token_to_native(&world, &symbol, actor, tokens, min_out)?;
                true
            }
        },
        Commands::Quote { command } => match command {
            QuoteCommands::NativeToToken { symbol, amount } => {
                swap::quote_native_to_token(&world, &symbol, amount)?;
                false
            }
            QuoteCommands::TokenToNative { symbol, amount } => {
                swap::quote_token_to_native(&world, &symbol, amount)?;
                false
            }
        },
    };

    if mutated {
        world.save(&config.world_path)?;
    }
    Ok(())
}
