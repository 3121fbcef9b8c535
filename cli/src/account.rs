//! Account funding and inspection

use anyhow::Result;
use colored::Colorize;
use tidepool_engine::{NativeLedger, TokenLedger};

use crate::world::World;

pub fn fund(world: &mut World, name: &str, native: u128) -> Result<()> {
    let id = world.ensure_account(name);
    world.native.mint(id, native);

    println!("{}", "=== Fund Account ===".bright_green().bold());
    println!("{} {} ({id})", "Account:".bright_cyan(), name);
    println!("{} {}", "Credited:".bright_cyan(), native);
    println!(
        "{} {}",
        "Native balance:".bright_cyan(),
        world.native.balance_of(id)
    );
    Ok(())
}

pub fn show(world: &World, name: &str) -> Result<()> {
    let id = world.account(name)?;

    println!("{}", "=== Account ===".bright_green().bold());
    println!("{} {} ({id})", "Name:".bright_cyan(), name);
    println!(
        "{} {}",
        "Native:".bright_cyan(),
        world.native.balance_of(id)
    );
    for symbol in world.token_symbols() {
        let (_, token) = world.token(symbol)?;
        let balance = token.balance_of(id);
        if balance > 0 {
            println!("{} {} = {}", "Token:".bright_cyan(), symbol, balance);
        }
    }
    for symbol in world.pool_symbols() {
        let pool = world.pool(&symbol)?;
        let shares = pool.share_balance_of(id);
        if shares > 0 {
            println!("{} {} = {}", "Pool shares:".bright_cyan(), symbol, shares);
        }
    }
    Ok(())
}
