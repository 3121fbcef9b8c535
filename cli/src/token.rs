//! Token ledger operations

use anyhow::Result;
use colored::Colorize;
use tidepool_engine::{AccountId, TokenLedger};

use crate::world::World;

pub fn create(world: &mut World, symbol: &str, supply: u128, owner: &str) -> Result<()> {
    let asset = world.create_token(symbol, supply, owner)?;

    println!("{}", "=== Create Token ===".bright_green().bold());
    println!("{} {} ({asset})", "Symbol:".bright_cyan(), symbol);
    println!("{} {}", "Supply:".bright_cyan(), supply);
    println!("{} {}", "Owner:".bright_cyan(), owner);
    Ok(())
}

/// Authorize the symbol's pool account to pull tokens from `actor`.
/// Deposits and token-side swaps require this up front.
pub fn approve(world: &World, symbol: &str, actor: AccountId, amount: u128) -> Result<()> {
    let (_, token) = world.token(symbol)?;
    let pool = world.pool(symbol)?;
    token.approve(actor, pool.account(), amount);

    println!("{}", "=== Approve ===".bright_green().bold());
    println!("{} {}", "Token:".bright_cyan(), symbol);
    println!("{} {actor}", "Owner:".bright_cyan());
    println!("{} {}", "Spender:".bright_cyan(), pool.account());
    println!("{} {}", "Allowance:".bright_cyan(), amount);
    Ok(())
}

pub fn balance(world: &World, symbol: &str, name: &str) -> Result<()> {
    let id = world.account(name)?;
    let (_, token) = world.token(symbol)?;

    println!("{}", "=== Token Balance ===".bright_green().bold());
    println!("{} {}", "Token:".bright_cyan(), symbol);
    println!("{} {} ({id})", "Account:".bright_cyan(), name);
    println!("{} {}", "Balance:".bright_cyan(), token.balance_of(id));
    Ok(())
}
