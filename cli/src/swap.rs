//! Swap execution and read-only quotes

use anyhow::Result;
use colored::Colorize;
use tidepool_engine::AccountId;

use crate::world::World;

pub fn native_to_token(
    world: &World,
    symbol: &str,
    trader: AccountId,
    native_in: u128,
    min_out: u128,
) -> Result<()> {
    let pool = world.pool(symbol)?;
    let token_out = pool.swap_native_for_token(trader, native_in, min_out)?;
    let (native_reserve, token_reserve) = pool.reserves();

    println!("{}", "=== Swap Native -> Token ===".bright_green().bold());
    println!("{} {}", "Pool:".bright_cyan(), symbol);
    println!("{} {trader}", "Trader:".bright_cyan());
    println!("{} {}", "Native in:".bright_cyan(), native_in);
    println!("{} {}", "Tokens out:".bright_cyan(), token_out);
    println!(
        "{} native={} tokens={}",
        "Reserves now:".bright_cyan(),
        native_reserve,
        token_reserve
    );
    Ok(())
}

pub fn token_to_native(
    world: &World,
    symbol: &str,
    trader: AccountId,
    token_in: u128,
    min_out: u128,
) -> Result<()> {
    let pool = world.pool(symbol)?;
    let native_out = pool.swap_token_for_native(trader, token_in, min_out)?;
    let (native_reserve, token_reserve) = pool.reserves();

    println!("{}", "=== Swap Token -> Native ===".bright_green().bold());
    println!("{} {}", "Pool:".bright_cyan(), symbol);
    println!("{} {trader}", "Trader:".bright_cyan());
    println!("{} {}", "Tokens in:".bright_cyan(), token_in);
    println!("{} {}", "Native out:".bright_cyan(), native_out);
    println!(
        "{} native={} tokens={}",
        "Reserves now:".bright_cyan(),
        native_reserve,
        token_reserve
    );
    Ok(())
}

pub fn quote_native_to_token(world: &World, symbol: &str, amount: u128) -> Result<()> {
    let pool = world.pool(symbol)?;
    let token_out = pool.quote_native_to_token(amount)?;

    println!("{}", "=== Quote Native -> Token ===".bright_green().bold());
    println!("{} {}", "Pool:".bright_cyan(), symbol);
    println!("{} {}", "Native in:".bright_cyan(), amount);
    println!("{} {}", "Tokens out:".bright_cyan(), token_out);
    Ok(())
}

pub fn quote_token_to_native(world: &World, symbol: &str, amount: u128) -> Result<()> {
    let pool = world.pool(symbol)?;
    let native_out = pool.quote_token_to_native(amount)?;

    println!("{}", "=== Quote Token -> Native ===".bright_green().bold());
    println!("{} {}", "Pool:".bright_cyan(), symbol);
    println!("{} {}", "Tokens in:".bright_cyan(), amount);
    println!("{} {}", "Native out:".bright_cyan(), native_out);
    Ok(())
}
