//! Staking suite: stake then unstake the same tokens and end where we started.

use serde_json::Value;

use crate::chain::Chain;
use crate::contracts::staking::{staked_token_names, Staking};
use crate::contracts::token::TokenReader;
use crate::fixtures::{
    insufficient_token_balance, Fixtures, COLLECTION_NAME, TOKENS_TO_STAKE,
    TOKEN_WITHDRAW_INSUFFICIENT, UNOWNED_TOKEN,
};
use crate::harness::{check, check_eq, require, Harness, HarnessError};
use crate::scenario::Scenario;

pub const STEPS: [&str; 7] = [
    "snapshot staked tokens",
    "dev stakes owned tokens",
    "staking an unowned token is rejected",
    "staked tokens are listed and leave the wallet",
    "dev unstakes the tokens",
    "unstaking a token that was never staked is rejected",
    "staked list is restored and tokens are owned again",
];

pub struct StakingCtx {
    fx: Fixtures,
    staking: Staking,
    tokens: TokenReader,
    snapshot: Option<Vec<Value>>,
}

impl StakingCtx {
    pub fn new(fx: &Fixtures) -> Self {
        Self {
            staking: Staking::new(fx.contract_address),
            tokens: TokenReader::new(fx.collection_creator, COLLECTION_NAME),
            fx: fx.clone(),
            snapshot: None,
        }
    }
}

pub fn scenario<C: Chain>() -> Scenario<C, StakingCtx> {
    Scenario::new("staking")
        .step(STEPS[0], snapshot)
        .step(STEPS[1], stake)
        .step(STEPS[2], stake_unowned)
        .step(STEPS[3], staked_tokens_listed)
        .step(STEPS[4], unstake)
        .step(STEPS[5], unstake_never_staked)
        .step(STEPS[6], staked_list_restored)
}

fn snapshot<C: Chain>(h: &Harness<C>, ctx: &mut StakingCtx) -> Result<(), HarnessError> {
    let dev = ctx.fx.dev().address();
    ctx.snapshot = Some(ctx.staking.get_staked_tokens(h, dev)?);
    Ok(())
}

fn stake<C: Chain>(h: &Harness<C>, ctx: &mut StakingCtx) -> Result<(), HarnessError> {
    let call = ctx.staking.stake_tokens(&TOKENS_TO_STAKE)?;
    h.expect_success(ctx.fx.dev(), &call)?;
    Ok(())
}

fn stake_unowned<C: Chain>(h: &Harness<C>, ctx: &mut StakingCtx) -> Result<(), HarnessError> {
    let call = ctx
        .staking
        .stake_tokens(&[UNOWNED_TOKEN, TOKENS_TO_STAKE[0]])?;
    let expected = insufficient_token_balance(TOKEN_WITHDRAW_INSUFFICIENT);
    h.expect_failure_with_code(ctx.fx.dev(), &call, &expected)?;
    Ok(())
}

fn staked_tokens_listed<C: Chain>(h: &Harness<C>, ctx: &mut StakingCtx) -> Result<(), HarnessError> {
    let dev = ctx.fx.dev().address();
    let staked = ctx.staking.get_staked_tokens(h, dev)?;
    let names = staked_token_names(&staked)?;
    check(
        names.len() >= TOKENS_TO_STAKE.len(),
        format!("expected at least {} staked tokens, got {:?}", TOKENS_TO_STAKE.len(), names),
    )?;
    let tail = &names[names.len() - TOKENS_TO_STAKE.len()..];
    check_eq(tail, &TOKENS_TO_STAKE.map(String::from)[..], "last staked tokens")?;

    for name in TOKENS_TO_STAKE {
        check(
            !ctx.tokens.owns_token(h, dev, name)?,
            format!("dev still holds staked token {}", name),
        )?;
    }
    Ok(())
}

fn unstake<C: Chain>(h: &Harness<C>, ctx: &mut StakingCtx) -> Result<(), HarnessError> {
    let call = ctx.staking.unstake_tokens(&TOKENS_TO_STAKE)?;
    h.expect_success(ctx.fx.dev(), &call)?;
    Ok(())
}

fn unstake_never_staked<C: Chain>(h: &Harness<C>, ctx: &mut StakingCtx) -> Result<(), HarnessError> {
    let call = ctx.staking.unstake_tokens(&[UNOWNED_TOKEN])?;
    let expected = insufficient_token_balance(TOKEN_WITHDRAW_INSUFFICIENT);
    h.expect_failure_with_code(ctx.fx.dev(), &call, &expected)?;
    Ok(())
}

fn staked_list_restored<C: Chain>(h: &Harness<C>, ctx: &mut StakingCtx) -> Result<(), HarnessError> {
    let before = require(ctx.snapshot.as_ref(), "staked tokens snapshot")?;
    let dev = ctx.fx.dev().address();
    let after = ctx.staking.get_staked_tokens(h, dev)?;
    check_eq(&after, before, "staked tokens after unstake")?;

    for name in TOKENS_TO_STAKE {
        check(
            ctx.tokens.owns_token(h, dev, name)?,
            format!("dev does not hold unstaked token {}", name),
        )?;
    }
    Ok(())
}
