//! Drops suite: the full life of one sale, ending with the sales list
//! exactly as it was before the sale was created.

use serde_json::Value;

use crate::chain::Chain;
use crate::contracts::drops::{sale_id, Drops};
use crate::fixtures::{access_denied, sale_unavailable, test_sale, Fixtures, UNKNOWN_SALE_ID};
use crate::harness::{check_eq, require, Harness, HarnessError};
use crate::scenario::Scenario;

pub const STEPS: [&str; 12] = [
    "snapshot sales",
    "dev creates a sale",
    "new sale is listed last",
    "dev renames the sale",
    "unauthorized rename is rejected",
    "dev buys one token",
    "buying from an unknown sale is rejected",
    "buying past the remaining supply is rejected",
    "dev buys the remaining three",
    "unauthorized delete is rejected",
    "dev deletes the sale",
    "sales list is restored",
];

const NEW_SALE_NAME: &str = "New Name";

pub struct DropsCtx {
    fx: Fixtures,
    drops: Drops,
    snapshot: Option<Vec<Value>>,
    sale_id: Option<u64>,
}

impl DropsCtx {
    pub fn new(fx: &Fixtures) -> Self {
        Self {
            drops: Drops::new(fx.contract_address),
            fx: fx.clone(),
            snapshot: None,
            sale_id: None,
        }
    }

    /// Id of the sale created by this run, once listed.
    pub fn sale_id(&self) -> Option<u64> {
        self.sale_id
    }
}

pub fn scenario<C: Chain>() -> Scenario<C, DropsCtx> {
    Scenario::new("drops")
        .step(STEPS[0], snapshot)
        .step(STEPS[1], create_sale)
        .step(STEPS[2], capture_sale_id)
        .step(STEPS[3], rename)
        .step(STEPS[4], rename_unauthorized)
        .step(STEPS[5], buy_one)
        .step(STEPS[6], buy_unknown_sale)
        .step(STEPS[7], buy_too_many)
        .step(STEPS[8], buy_remaining)
        .step(STEPS[9], delete_unauthorized)
        .step(STEPS[10], delete)
        .step(STEPS[11], sales_restored)
}

fn snapshot<C: Chain>(h: &Harness<C>, ctx: &mut DropsCtx) -> Result<(), HarnessError> {
    ctx.snapshot = Some(ctx.drops.get_sales(h)?);
    Ok(())
}

fn create_sale<C: Chain>(h: &Harness<C>, ctx: &mut DropsCtx) -> Result<(), HarnessError> {
    h.expect_success(ctx.fx.dev(), &ctx.drops.create_sale(&test_sale())?)?;
    Ok(())
}

fn capture_sale_id<C: Chain>(h: &Harness<C>, ctx: &mut DropsCtx) -> Result<(), HarnessError> {
    let sales = ctx.drops.get_sales(h)?;
    let last = sales
        .last()
        .ok_or_else(|| HarnessError::Assertion("no sales listed after create_sale".into()))?;
    ctx.sale_id = Some(sale_id(last)?);
    Ok(())
}

fn current_sale(ctx: &DropsCtx) -> Result<u64, HarnessError> {
    require(ctx.sale_id, "created sale id")
}

fn rename<C: Chain>(h: &Harness<C>, ctx: &mut DropsCtx) -> Result<(), HarnessError> {
    let call = ctx.drops.update_sale_name(current_sale(ctx)?, NEW_SALE_NAME)?;
    h.expect_success(ctx.fx.dev(), &call)?;
    Ok(())
}

fn rename_unauthorized<C: Chain>(h: &Harness<C>, ctx: &mut DropsCtx) -> Result<(), HarnessError> {
    let call = ctx.drops.update_sale_name(current_sale(ctx)?, NEW_SALE_NAME)?;
    let expected = access_denied(ctx.fx.contract_address, "drops");
    h.expect_failure_with_code(ctx.fx.unauthorized(), &call, &expected)?;
    Ok(())
}

fn buy_one<C: Chain>(h: &Harness<C>, ctx: &mut DropsCtx) -> Result<(), HarnessError> {
    h.expect_success(ctx.fx.dev(), &ctx.drops.buy(current_sale(ctx)?)?)?;
    Ok(())
}

fn buy_unknown_sale<C: Chain>(h: &Harness<C>, ctx: &mut DropsCtx) -> Result<(), HarnessError> {
    let call = ctx.drops.buy(UNKNOWN_SALE_ID)?;
    h.expect_failure_with_code(ctx.fx.dev(), &call, &sale_unavailable(ctx.fx.contract_address))?;
    Ok(())
}

fn buy_too_many<C: Chain>(h: &Harness<C>, ctx: &mut DropsCtx) -> Result<(), HarnessError> {
    let call = ctx.drops.buy_multiple(current_sale(ctx)?, 4)?;
    h.expect_failure_with_code(ctx.fx.dev(), &call, &sale_unavailable(ctx.fx.contract_address))?;
    Ok(())
}

fn buy_remaining<C: Chain>(h: &Harness<C>, ctx: &mut DropsCtx) -> Result<(), HarnessError> {
    h.expect_success(ctx.fx.dev(), &ctx.drops.buy_multiple(current_sale(ctx)?, 3)?)?;
    Ok(())
}

fn delete_unauthorized<C: Chain>(h: &Harness<C>, ctx: &mut DropsCtx) -> Result<(), HarnessError> {
    let call = ctx.drops.delete_sale(current_sale(ctx)?)?;
    let expected = access_denied(ctx.fx.contract_address, "drops");
    h.expect_failure_with_code(ctx.fx.unauthorized(), &call, &expected)?;
    Ok(())
}

fn delete<C: Chain>(h: &Harness<C>, ctx: &mut DropsCtx) -> Result<(), HarnessError> {
    h.expect_success(ctx.fx.dev(), &ctx.drops.delete_sale(current_sale(ctx)?)?)?;
    Ok(())
}

fn sales_restored<C: Chain>(h: &Harness<C>, ctx: &mut DropsCtx) -> Result<(), HarnessError> {
    let before = require(ctx.snapshot.as_ref(), "sales snapshot")?;
    let after = ctx.drops.get_sales(h)?;
    check_eq(&after, before, "sales after delete")
}
