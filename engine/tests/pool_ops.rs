//! End-to-end pool scenarios at wei scale (1e18 minimum units),
//! pinned to exact values.

use std::sync::Arc;

use tidepool_engine::{
    AccountId, AssetId, InMemoryNative, InMemoryToken, LedgerError, NativeLedger, Pool, PoolError,
    TokenLedger,
};

const WEI: u128 = 1_000_000_000_000_000_000;
const ALICE: AccountId = AccountId(1);
const BOB: AccountId = AccountId(2);
const POOL: AccountId = AccountId(100);

fn setup() -> (Pool, Arc<InMemoryToken>, Arc<InMemoryNative>) {
    let token = Arc::new(InMemoryToken::new());
    let native = Arc::new(InMemoryNative::new());
    for account in [ALICE, BOB] {
        token.mint(account, 1_000_000 * WEI);
        native.mint(account, 1_000_000 * WEI);
        token.approve(account, POOL, u128::MAX);
    }
    let pool = Pool::new(
        AssetId(1),
        POOL,
        Arc::clone(&token) as Arc<dyn TokenLedger>,
        Arc::clone(&native) as Arc<dyn NativeLedger>,
    );
    (pool, token, native)
}

#[test]
fn quotes_match_reference_values() {
    let (pool, _, _) = setup();
    pool.deposit(ALICE, 2000 * WEI, 1000 * WEI).unwrap();

    assert_eq!(
        pool.quote_native_to_token(WEI).unwrap(),
        1_992_013_962_079_806_432
    );
    assert_eq!(
        pool.quote_native_to_token(100 * WEI).unwrap(),
        181_322_178_776_029_826_316
    );
    assert_eq!(
        pool.quote_native_to_token(1000 * WEI).unwrap(),
        998_497_746_619_929_894_842
    );

    assert_eq!(
        pool.quote_token_to_native(2 * WEI).unwrap(),
        996_006_981_039_903_216
    );
    assert_eq!(
        pool.quote_token_to_native(100 * WEI).unwrap(),
        47_482_973_758_155_927_037
    );
    assert_eq!(
        pool.quote_token_to_native(2000 * WEI).unwrap(),
        499_248_873_309_964_947_421
    );
}

#[test]
fn swap_native_updates_reserves_exactly() {
    let (pool, token, native) = setup();
    pool.deposit(ALICE, 2000 * WEI, 1000 * WEI).unwrap();

    let out = pool
        .swap_native_for_token(BOB, WEI, 199 * WEI / 100)
        .unwrap();
    assert_eq!(out, 1_992_013_962_079_806_432);
    assert_eq!(
        pool.reserves(),
        (1001 * WEI, 1_998_007_986_037_920_193_568)
    );
    assert_eq!(token.balance_of(BOB), 1_000_000 * WEI + out);
    assert_eq!(native.balance_of(BOB), 1_000_000 * WEI - WEI);
}

#[test]
fn swap_token_updates_reserves_exactly() {
    let (pool, _, native) = setup();
    pool.deposit(ALICE, 2000 * WEI, 1000 * WEI).unwrap();

    let out = pool
        .swap_token_for_native(BOB, 2 * WEI, 9 * WEI / 10)
        .unwrap();
    assert_eq!(out, 996_006_981_039_903_216);
    assert_eq!(pool.reserves(), (1000 * WEI - out, 2002 * WEI));
    assert_eq!(native.balance_of(BOB), 1_000_000 * WEI + out);
}

#[test]
fn providers_capture_swap_fees_on_exit() {
    let (pool, token, native) = setup();
    pool.deposit(ALICE, 200 * WEI, 100 * WEI).unwrap();

    let traded = pool
        .swap_native_for_token(BOB, 10 * WEI, 18 * WEI)
        .unwrap();
    assert_eq!(traded, 18_132_217_877_602_982_631);

    let (native_out, token_out) = pool.withdraw(ALICE, 100 * WEI).unwrap();
    // The provider exits with the trader's 10 native plus the
    // remaining tokens; the price moved in their favor.
    assert_eq!(native_out, 110 * WEI);
    assert_eq!(token_out, 181_867_782_122_397_017_369);
    assert_eq!(pool.reserves(), (0, 0));
    assert_eq!(pool.total_shares(), 0);
    assert_eq!(native.balance_of(POOL), 0);
    assert_eq!(token.balance_of(POOL), 0);
}

#[test]
fn min_out_guard_rejects_at_exact_boundary() {
    let (pool, _, _) = setup();
    pool.deposit(ALICE, 2000 * WEI, 1000 * WEI).unwrap();

    // The quote for 1 native is just under 2 tokens, so a 2-token
    // minimum must fail.
    let err = pool.swap_native_for_token(BOB, WEI, 2 * WEI).unwrap_err();
    assert!(matches!(err, PoolError::InsufficientOutput { .. }));
    assert_eq!(pool.reserves(), (1000 * WEI, 2000 * WEI));
}

/// Token ledger that accepts inbound pulls but refuses every payout,
/// for exercising the fail-atomic path.
struct PayoutRefusingToken {
    inner: InMemoryToken,
}

impl TokenLedger for PayoutRefusingToken {
    fn transfer(&self, _: AccountId, _: AccountId, _: u128) -> Result<(), LedgerError> {
        Err(LedgerError::InsufficientBalance)
    }

    fn transfer_from(
        &self,
        spender: AccountId,
        owner: AccountId,
        to: AccountId,
        amount: u128,
    ) -> Result<(), LedgerError> {
        self.inner.transfer_from(spender, owner, to, amount)
    }

    fn approve(&self, owner: AccountId, spender: AccountId, amount: u128) {
        self.inner.approve(owner, spender, amount);
    }

    fn balance_of(&self, account: AccountId) -> u128 {
        self.inner.balance_of(account)
    }

    fn allowance(&self, owner: AccountId, spender: AccountId) -> u128 {
        self.inner.allowance(owner, spender)
    }
}

#[test]
fn failed_payout_rolls_back_the_inbound_leg() {
    let token = Arc::new(PayoutRefusingToken {
        inner: InMemoryToken::new(),
    });
    let native = Arc::new(InMemoryNative::new());
    token.inner.mint(ALICE, 1000 * WEI);
    native.mint(ALICE, 1000 * WEI);
    native.mint(BOB, 100 * WEI);
    token.inner.approve(ALICE, POOL, u128::MAX);

    let pool = Pool::new(
        AssetId(1),
        POOL,
        Arc::clone(&token) as Arc<dyn TokenLedger>,
        Arc::clone(&native) as Arc<dyn NativeLedger>,
    );
    pool.deposit(ALICE, 200 * WEI, 100 * WEI).unwrap();

    let err = pool.swap_native_for_token(BOB, 10 * WEI, 0).unwrap_err();
    assert_eq!(
        err,
        PoolError::ExternalTransferFailed(LedgerError::InsufficientBalance)
    );
    // Reserves untouched, and the trader's native was refunded.
    assert_eq!(pool.reserves(), (100 * WEI, 200 * WEI));
    assert_eq!(native.balance_of(BOB), 100 * WEI);
    assert_eq!(native.balance_of(POOL), 100 * WEI);
}
