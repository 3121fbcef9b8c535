//! Registry mapping traded assets to their pool instances

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::{
    error::PoolError,
    ledger::{NativeLedger, TokenLedger},
    pool::Pool,
    AccountId, AssetId,
};

/// Creates and looks up one [`Pool`] per traded asset. Duplicate
/// registrations are rejected.
#[derive(Default)]
pub struct Registry {
    pools: RwLock<BTreeMap<AssetId, Arc<Pool>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty pool for `asset`, holding funds under `account`.
    pub fn create_pool(
        &self,
        asset: AssetId,
        account: AccountId,
        token: Arc<dyn TokenLedger>,
        native: Arc<dyn NativeLedger>,
    ) -> Result<Arc<Pool>, PoolError> {
        let mut pools = self.pools.write();
        if pools.contains_key(&asset) {
            return Err(PoolError::PoolExists);
        }
        let pool = Arc::new(Pool::new(asset, account, token, native));
        pools.insert(asset, Arc::clone(&pool));
        Ok(pool)
    }

    /// Register an already-built pool (the snapshot restore path).
    pub fn insert(&self, pool: Arc<Pool>) -> Result<(), PoolError> {
        let mut pools = self.pools.write();
        if pools.contains_key(&pool.asset()) {
            return Err(PoolError::PoolExists);
        }
        pools.insert(pool.asset(), pool);
        Ok(())
    }

    pub fn pool(&self, asset: AssetId) -> Result<Arc<Pool>, PoolError> {
        self.pools
            .read()
            .get(&asset)
            .cloned()
            .ok_or(PoolError::UnknownPool)
    }

    pub fn assets(&self) -> Vec<AssetId> {
        self.pools.read().keys().copied().collect()
    }
}
