//! World file: the persisted sandbox state the CLI operates on
//!
//! A world is a JSON snapshot of every ledger and pool. Each CLI
//! invocation loads it, rebuilds the live engine objects, applies one
//! command, and writes the snapshot back.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use tidepool_engine::{
    AccountId, AssetId, InMemoryNative, InMemoryToken, NativeLedger, NativeState, Pool,
    PoolSnapshot, Registry, TokenLedger, TokenState,
};

/// Serialized form of a sandbox world.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct WorldFile {
    pub next_id: u64,
    /// account name -> id
    pub accounts: BTreeMap<String, AccountId>,
    pub native: NativeState,
    /// token symbol -> ledger state
    pub tokens: BTreeMap<String, TokenEntry>,
    /// token symbol -> pool state
    pub pools: BTreeMap<String, PoolSnapshot>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenEntry {
    pub asset: AssetId,
    pub state: TokenState,
}

/// Live sandbox rebuilt from a [`WorldFile`].
pub struct World {
    next_id: u64,
    accounts: BTreeMap<String, AccountId>,
    pub native: Arc<InMemoryNative>,
    tokens: BTreeMap<String, (AssetId, Arc<InMemoryToken>)>,
    registry: Registry,
}

impl World {
    /// Write a fresh, empty world file. Refuses to clobber an existing
    /// one.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            bail!("world file already exists: {}", path.display());
        }
        write_file(path, &WorldFile::default())
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            bail!(
                "world file not found: {} (run `tidepool init` first)",
                path.display()
            );
        }
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read world file: {}", path.display()))?;
        let file: WorldFile = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse world file: {}", path.display()))?;

        let native = Arc::new(InMemoryNative::with_state(file.native));
        let mut tokens = BTreeMap::new();
        for (symbol, entry) in file.tokens {
            tokens.insert(
                symbol,
                (entry.asset, Arc::new(InMemoryToken::with_state(entry.state))),
            );
        }

        let registry = Registry::new();
        for (symbol, snapshot) in file.pools {
            let (_, token) = tokens
                .get(&symbol)
                .with_context(|| format!("pool references unknown token: {symbol}"))?;
            let pool = Pool::restore(
                snapshot,
                Arc::clone(token) as Arc<dyn TokenLedger>,
                Arc::clone(&native) as Arc<dyn NativeLedger>,
            );
            registry
                .insert(Arc::new(pool))
                .with_context(|| format!("duplicate pool in world file: {symbol}"))?;
        }

        Ok(Self {
            next_id: file.next_id,
            accounts: file.accounts,
            native,
            tokens,
            registry,
        })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let mut tokens = BTreeMap::new();
        let mut pools = BTreeMap::new();
        for (symbol, (asset, token)) in &self.tokens {
            tokens.insert(
                symbol.clone(),
                TokenEntry {
                    asset: *asset,
                    state: token.snapshot(),
                },
            );
            if let Ok(pool) = self.registry.pool(*asset) {
                pools.insert(symbol.clone(), pool.snapshot());
            }
        }
        let file = WorldFile {
            next_id: self.next_id,
            accounts: self.accounts.clone(),
            native: self.native.snapshot(),
            tokens,
            pools,
        };
        write_file(path, &file)
    }

    fn alloc_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Look up a named account, failing on unknown names.
    pub fn account(&self, name: &str) -> Result<AccountId> {
        self.accounts
            .get(name)
            .copied()
            .with_context(|| format!("unknown account: {name}"))
    }

    /// Look up a named account, creating it on first use.
    pub fn ensure_account(&mut self, name: &str) -> AccountId {
        if let Some(id) = self.accounts.get(name) {
            return *id;
        }
        let id = AccountId(self.alloc_id());
        self.accounts.insert(name.to_string(), id);
        id
    }

    pub fn account_names(&self) -> impl Iterator<Item = (&String, AccountId)> {
        self.accounts.iter().map(|(name, id)| (name, *id))
    }

    /// Reverse lookup for display purposes.
    pub fn account_name(&self, id: AccountId) -> Option<&str> {
        self.accounts
            .iter()
            .find(|(_, candidate)| **candidate == id)
            .map(|(name, _)| name.as_str())
    }

    pub fn token(&self, symbol: &str) -> Result<(AssetId, Arc<InMemoryToken>)> {
        self.tokens
            .get(symbol)
            .map(|(asset, token)| (*asset, Arc::clone(token)))
            .with_context(|| format!("unknown token: {symbol}"))
    }

    pub fn token_symbols(&self) -> impl Iterator<Item = &String> {
        self.tokens.keys()
    }

    pub fn create_token(&mut self, symbol: &str, supply: u128, owner: &str) -> Result<AssetId> {
        if self.tokens.contains_key(symbol) {
            bail!("token already exists: {symbol}");
        }
        let owner = self.ensure_account(owner);
        let asset = AssetId(self.alloc_id());
        let token = Arc::new(InMemoryToken::new());
        token.mint(owner, supply);
        self.tokens.insert(symbol.to_string(), (asset, token));
        Ok(asset)
    }

    pub fn pool(&self, symbol: &str) -> Result<Arc<Pool>> {
        let (asset, _) = self.token(symbol)?;
        self.registry
            .pool(asset)
            .with_context(|| format!("no pool for token: {symbol} (run `tidepool pool create`)"))
    }

    pub fn create_pool(&mut self, symbol: &str) -> Result<Arc<Pool>> {
        let (asset, token) = self.token(symbol)?;
        let account = self.ensure_account(&format!("pool:{symbol}"));
        self.registry
            .create_pool(
                asset,
                account,
                token as Arc<dyn TokenLedger>,
                Arc::clone(&self.native) as Arc<dyn NativeLedger>,
            )
            .with_context(|| format!("pool already exists for token: {symbol}"))
    }

    /// Symbols that currently have a pool.
    pub fn pool_symbols(&self) -> Vec<String> {
        self.tokens
            .iter()
            .filter(|(_, (asset, _))| self.registry.pool(*asset).is_ok())
            .map(|(symbol, _)| symbol.clone())
            .collect()
    }
}

fn write_file(path: &Path, file: &WorldFile) -> Result<()> {
    let raw = serde_json::to_string_pretty(file).context("failed to serialize world")?;
    std::fs::write(path, raw)
        .with_context(|| format!("failed to write world file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn world_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("world.json");
        World::init(&path).unwrap();

        {
            let mut world = World::load(&path).unwrap();
            let alice = world.ensure_account("alice");
            world.native.mint(alice, 1_000);
            world.create_token("TKN", 5_000, "alice").unwrap();
            let (_, token) = world.token("TKN").unwrap();
            let pool = world.create_pool("TKN").unwrap();
            token.approve(alice, pool.account(), u128::MAX);
            pool.deposit(alice, 200, 100).unwrap();
            world.save(&path).unwrap();
        }

        let world = World::load(&path).unwrap();
        let alice = world.account("alice").unwrap();
        let pool = world.pool("TKN").unwrap();
        assert_eq!(pool.reserves(), (100, 200));
        assert_eq!(pool.share_balance_of(alice), 100);
        let (_, token) = world.token("TKN").unwrap();
        assert_eq!(token.balance_of(alice), 4_800);
        assert_eq!(world.native.balance_of(alice), 900);
        assert_eq!(world.pool_symbols(), vec!["TKN".to_string()]);
    }

    #[test]
    fn init_refuses_to_clobber() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("world.json");
        World::init(&path).unwrap();
        assert!(World::init(&path).is_err());
    }
}
