//! Unpacking suite: a freshly minted card pack unpacks into five card
//! templates, and claiming empties the pending list.

use serde_json::Value;

use crate::chain::Chain;
use crate::contracts::minter::{minted_token_name, Minter};
use crate::contracts::templates::{TemplateKind, Templates};
use crate::contracts::unpacking::{template_ids, Unpacking};
use crate::fixtures::{
    insufficient_token_balance, Fixtures, CARD_PACK_TEMPLATE_ID, TOKENS_PER_PACK,
    TOKEN_NOT_FOUND_INSUFFICIENT, UNOWNED_TOKEN,
};
use crate::harness::{check, check_eq, require, Harness, HarnessError};
use crate::scenario::Scenario;

pub const STEPS: [&str; 8] = [
    "snapshot unpacked tokens",
    "dev mints and unpacks a card pack",
    "unpacking an unowned pack is rejected",
    "unpacking adds five tokens",
    "card pack yields card templates",
    "hero pack yields hero templates",
    "dev claims unpacked tokens",
    "claim empties the unpacked list",
];

const NO_HERO_PACK: &str = "no hero pack is minted to the dev identity";

pub struct UnpackingCtx {
    fx: Fixtures,
    minter: Minter,
    templates: Templates,
    unpacking: Unpacking,
    snapshot: Option<Vec<Value>>,
    unpacked: Option<Vec<Value>>,
}

impl UnpackingCtx {
    pub fn new(fx: &Fixtures) -> Self {
        Self {
            minter: Minter::new(fx.contract_address),
            templates: Templates::new(fx.contract_address),
            unpacking: Unpacking::new(fx.contract_address),
            fx: fx.clone(),
            snapshot: None,
            unpacked: None,
        }
    }
}

pub fn scenario<C: Chain>() -> Scenario<C, UnpackingCtx> {
    Scenario::new("unpacking")
        .step(STEPS[0], snapshot)
        .step(STEPS[1], mint_and_unpack)
        .step(STEPS[2], unpack_unowned)
        .step(STEPS[3], unpacked_five)
        .step(STEPS[4], card_templates)
        .skip(STEPS[5], NO_HERO_PACK)
        .step(STEPS[6], claim)
        .step(STEPS[7], unpacked_empty)
}

fn snapshot<C: Chain>(h: &Harness<C>, ctx: &mut UnpackingCtx) -> Result<(), HarnessError> {
    let dev = ctx.fx.dev().address();
    ctx.snapshot = Some(ctx.unpacking.get_unpacked_tokens(h, dev)?);
    Ok(())
}

fn mint_and_unpack<C: Chain>(h: &Harness<C>, ctx: &mut UnpackingCtx) -> Result<(), HarnessError> {
    let dev = ctx.fx.dev();
    let mint = ctx.minter.mint_template(dev.address(), CARD_PACK_TEMPLATE_ID)?;
    let outcome = h.expect_success(dev, &mint)?;
    let pack = minted_token_name(&h.transaction_events(&outcome.hash)?)?;
    h.expect_success(dev, &ctx.unpacking.unpack(&pack)?)?;
    Ok(())
}

fn unpack_unowned<C: Chain>(h: &Harness<C>, ctx: &mut UnpackingCtx) -> Result<(), HarnessError> {
    let call = ctx.unpacking.unpack(UNOWNED_TOKEN)?;
    let expected = insufficient_token_balance(TOKEN_NOT_FOUND_INSUFFICIENT);
    h.expect_failure_with_code(ctx.fx.dev(), &call, &expected)?;
    Ok(())
}

fn unpacked_five<C: Chain>(h: &Harness<C>, ctx: &mut UnpackingCtx) -> Result<(), HarnessError> {
    let before = require(ctx.snapshot.as_ref(), "unpacked tokens snapshot")?.len();
    let unpacked = ctx.unpacking.get_unpacked_tokens(h, ctx.fx.dev().address())?;
    check_eq(
        unpacked.len() as i64 - before as i64,
        TOKENS_PER_PACK as i64,
        "unpacked token count growth",
    )?;
    ctx.unpacked = Some(unpacked);
    Ok(())
}

fn card_templates<C: Chain>(h: &Harness<C>, ctx: &mut UnpackingCtx) -> Result<(), HarnessError> {
    let unpacked = require(ctx.unpacked.as_ref(), "unpacked tokens")?;
    let newest = &unpacked[unpacked.len().saturating_sub(TOKENS_PER_PACK)..];
    for template_id in template_ids(newest)? {
        let template = ctx.templates.get_template(h, template_id)?;
        check(
            template.kind() == TemplateKind::Card,
            format!("template {} is not a card", template_id),
        )?;
    }
    Ok(())
}

fn claim<C: Chain>(h: &Harness<C>, ctx: &mut UnpackingCtx) -> Result<(), HarnessError> {
    h.expect_success(ctx.fx.dev(), &ctx.unpacking.claim()?)?;
    Ok(())
}

fn unpacked_empty<C: Chain>(h: &Harness<C>, ctx: &mut UnpackingCtx) -> Result<(), HarnessError> {
    let unpacked = ctx.unpacking.get_unpacked_tokens(h, ctx.fx.dev().address())?;
    check_eq(unpacked.len(), 0, "unpacked tokens after claim")
}
