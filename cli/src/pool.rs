//! Pool creation and inspection

use anyhow::Result;
use colored::Colorize;
use tidepool_engine::TokenLedger;

use crate::world::World;

pub fn create(world: &mut World, symbol: &str) -> Result<()> {
    let pool = world.create_pool(symbol)?;

    println!("{}", "=== Create Pool ===".bright_green().bold());
    println!("{} {} ({})", "Token:".bright_cyan(), symbol, pool.asset());
    println!("{} {}", "Pool account:".bright_cyan(), pool.account());
    println!(
        "\n{}",
        "Pool is empty; the first liquidity add sets the exchange rate".yellow()
    );
    Ok(())
}

pub fn list(world: &World) -> Result<()> {
    println!("{}", "=== Pools ===".bright_green().bold());
    let symbols = world.pool_symbols();
    if symbols.is_empty() {
        println!("{}", "No pools yet".dimmed());
        return Ok(());
    }
    for symbol in symbols {
        let pool = world.pool(&symbol)?;
        let (native_reserve, token_reserve) = pool.reserves();
        println!(
            "{} {} native={} tokens={} shares={}",
            "Pool:".bright_cyan(),
            symbol,
            native_reserve,
            token_reserve,
            pool.total_shares()
        );
    }
    Ok(())
}

pub fn status(world: &World, symbol: &str) -> Result<()> {
    let pool = world.pool(symbol)?;
    let (_, token) = world.token(symbol)?;
    let (native_reserve, token_reserve) = pool.reserves();

    println!("{}", "=== Pool Status ===".bright_green().bold());
    println!("{} {} ({})", "Token:".bright_cyan(), symbol, pool.asset());
    println!("{} {}", "Pool account:".bright_cyan(), pool.account());
    println!("{} {}", "Native reserve:".bright_cyan(), native_reserve);
    println!("{} {}", "Token reserve:".bright_cyan(), token_reserve);
    println!("{} {}", "Total shares:".bright_cyan(), pool.total_shares());
    println!(
        "{} {}",
        "Token balance held:".bright_cyan(),
        token.balance_of(pool.account())
    );
    if pool.total_shares() == 0 {
        println!("\n{}", "Pool is empty".yellow());
    }
    Ok(())
}
