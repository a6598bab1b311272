//! Coin suite: only the coin owner mints and burns `sdm`, and a transfer
//! credits the recipient's store.

use move_e2e_transport::LocalAccount;

use crate::chain::Chain;
use crate::contracts::coin::{Coin, MODULE};
use crate::fixtures::{access_denied, Fixtures, COIN_AMOUNT};
use crate::harness::{check_eq, require, Harness, HarnessError};
use crate::scenario::Scenario;

pub const STEPS: [&str; 7] = [
    "unauthorized mint is rejected",
    "owner mints coins",
    "unauthorized burn is rejected",
    "owner burns coins",
    "unauthorized identity registers a coin store",
    "snapshot recipient balance",
    "transfer credits the recipient",
];

/// Skip reason when no coin owner key is configured.
pub const NO_COIN_OWNER: &str = "MOVE_E2E_COIN_KEY is not set";

pub struct CoinCtx {
    fx: Fixtures,
    owner: LocalAccount,
    coin: Coin,
    recipient_balance: Option<u64>,
}

impl CoinCtx {
    pub fn new(fx: &Fixtures, owner: LocalAccount) -> Self {
        Self {
            coin: Coin::new(fx.coin_address, fx.coin_type.clone()),
            fx: fx.clone(),
            owner,
            recipient_balance: None,
        }
    }
}

pub fn scenario<C: Chain>() -> Scenario<C, CoinCtx> {
    Scenario::new("coin")
        .step(STEPS[0], mint_unauthorized)
        .step(STEPS[1], mint)
        .step(STEPS[2], burn_unauthorized)
        .step(STEPS[3], burn)
        .step(STEPS[4], register)
        .step(STEPS[5], snapshot_recipient)
        .step(STEPS[6], transfer)
}

fn mint_unauthorized<C: Chain>(h: &Harness<C>, ctx: &mut CoinCtx) -> Result<(), HarnessError> {
    let expected = access_denied(ctx.fx.coin_address, MODULE);
    h.expect_failure_with_code(ctx.fx.unauthorized(), &ctx.coin.mint(COIN_AMOUNT)?, &expected)?;
    Ok(())
}

fn mint<C: Chain>(h: &Harness<C>, ctx: &mut CoinCtx) -> Result<(), HarnessError> {
    h.expect_success(&ctx.owner, &ctx.coin.mint(COIN_AMOUNT)?)?;
    Ok(())
}

fn burn_unauthorized<C: Chain>(h: &Harness<C>, ctx: &mut CoinCtx) -> Result<(), HarnessError> {
    let expected = access_denied(ctx.fx.coin_address, MODULE);
    h.expect_failure_with_code(ctx.fx.unauthorized(), &ctx.coin.burn(COIN_AMOUNT)?, &expected)?;
    Ok(())
}

fn burn<C: Chain>(h: &Harness<C>, ctx: &mut CoinCtx) -> Result<(), HarnessError> {
    let owner = ctx.owner.address();
    let before = ctx.coin.balance(h, owner)?;
    h.expect_success(&ctx.owner, &ctx.coin.burn(COIN_AMOUNT)?)?;
    let after = ctx.coin.balance(h, owner)?;
    check_eq(before.checked_sub(after), Some(COIN_AMOUNT), "owner balance decrease")
}

fn register<C: Chain>(h: &Harness<C>, ctx: &mut CoinCtx) -> Result<(), HarnessError> {
    h.expect_success(ctx.fx.unauthorized(), &ctx.coin.register()?)?;
    Ok(())
}

fn snapshot_recipient<C: Chain>(h: &Harness<C>, ctx: &mut CoinCtx) -> Result<(), HarnessError> {
    let recipient = ctx.fx.unauthorized().address();
    ctx.recipient_balance = Some(ctx.coin.balance(h, recipient)?);
    Ok(())
}

fn transfer<C: Chain>(h: &Harness<C>, ctx: &mut CoinCtx) -> Result<(), HarnessError> {
    let before = require(ctx.recipient_balance, "recipient balance snapshot")?;
    let recipient = ctx.fx.unauthorized().address();
    h.expect_success(&ctx.owner, &ctx.coin.transfer(recipient, COIN_AMOUNT)?)?;
    let after = ctx.coin.balance(h, recipient)?;
    check_eq(after.checked_sub(before), Some(COIN_AMOUNT), "recipient balance increase")
}
