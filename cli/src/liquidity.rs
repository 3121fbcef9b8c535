//! Liquidity provider operations

use anyhow::Result;
use colored::Colorize;
use tidepool_engine::AccountId;

use crate::world::World;

pub fn add(
    world: &World,
    symbol: &str,
    provider: AccountId,
    native: u128,
    max_tokens: u128,
) -> Result<()> {
    let pool = world.pool(symbol)?;
    let minted = pool.deposit(provider, max_tokens, native)?;
    let (native_reserve, token_reserve) = pool.reserves();

    println!("{}", "=== Add Liquidity ===".bright_green().bold());
    println!("{} {}", "Pool:".bright_cyan(), symbol);
    println!("{} {provider}", "Provider:".bright_cyan());
    println!("{} {}", "Native in:".bright_cyan(), native);
    println!("{} {}", "Shares minted:".bright_cyan(), minted);
    println!(
        "{} native={} tokens={}",
        "Reserves now:".bright_cyan(),
        native_reserve,
        token_reserve
    );
    Ok(())
}

pub fn remove(world: &World, symbol: &str, provider: AccountId, shares: u128) -> Result<()> {
    let pool = world.pool(symbol)?;
    let (native_out, token_out) = pool.withdraw(provider, shares)?;
    let (native_reserve, token_reserve) = pool.reserves();

    println!("{}", "=== Remove Liquidity ===".bright_green().bold());
    println!("{} {}", "Pool:".bright_cyan(), symbol);
    println!("{} {provider}", "Provider:".bright_cyan());
    println!("{} {}", "Shares burned:".bright_cyan(), shares);
    println!("{} {}", "Native out:".bright_cyan(), native_out);
    println!("{} {}", "Tokens out:".bright_cyan(), token_out);
    println!(
        "{} native={} tokens={}",
        "Reserves now:".bright_cyan(),
        native_reserve,
        token_reserve
    );
    Ok(())
}
