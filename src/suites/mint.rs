//! Mint suite: minting from a template, the resulting token data, and the
//! two rejection paths (wrong sender, unknown template).

use move_e2e_types::encoding::{decode_bcs_bool, decode_bcs_u64};

use crate::chain::Chain;
use crate::contracts::minter::{minted_token_name, Minter};
use crate::contracts::templates::Templates;
use crate::contracts::token::{TokenReader, BURNABLE_PROPERTY, TEMPLATE_PROPERTY};
use crate::fixtures::{
    access_denied, table_entry_missing, Fixtures, CARD_PACK_TEMPLATE_ID, COLLECTION_NAME,
    UNKNOWN_TEMPLATE_ID,
};
use crate::harness::{check_eq, require, Harness, HarnessError};
use crate::scenario::Scenario;

pub const STEPS: [&str; 5] = [
    "dev mints template 355",
    "minted token name is read from the receipt",
    "minted token matches its template",
    "unauthorized mint is rejected",
    "minting an unknown template is rejected",
];

pub struct MintCtx {
    fx: Fixtures,
    minter: Minter,
    templates: Templates,
    tokens: TokenReader,
    mint_hash: Option<String>,
    minted: Option<String>,
}

impl MintCtx {
    pub fn new(fx: &Fixtures) -> Self {
        Self {
            minter: Minter::new(fx.contract_address),
            templates: Templates::new(fx.contract_address),
            tokens: TokenReader::new(fx.collection_creator, COLLECTION_NAME),
            fx: fx.clone(),
            mint_hash: None,
            minted: None,
        }
    }

    pub fn minted(&self) -> Option<&str> {
        self.minted.as_deref()
    }
}

pub fn scenario<C: Chain>() -> Scenario<C, MintCtx> {
    Scenario::new("mint")
        .step(STEPS[0], mint)
        .step(STEPS[1], recover_token_name)
        .step(STEPS[2], token_matches_template)
        .step(STEPS[3], mint_unauthorized)
        .step(STEPS[4], mint_unknown_template)
}

fn mint<C: Chain>(h: &Harness<C>, ctx: &mut MintCtx) -> Result<(), HarnessError> {
    let dev = ctx.fx.dev().address();
    let call = ctx.minter.mint_template(dev, CARD_PACK_TEMPLATE_ID)?;
    let outcome = h.expect_success(ctx.fx.dev(), &call)?;
    ctx.mint_hash = Some(outcome.hash);
    Ok(())
}

fn recover_token_name<C: Chain>(h: &Harness<C>, ctx: &mut MintCtx) -> Result<(), HarnessError> {
    let hash = require(ctx.mint_hash.as_deref(), "mint transaction hash")?;
    let events = h.transaction_events(hash)?;
    ctx.minted = Some(minted_token_name(&events)?);
    Ok(())
}

fn token_matches_template<C: Chain>(h: &Harness<C>, ctx: &mut MintCtx) -> Result<(), HarnessError> {
    let name = require(ctx.minted.as_deref(), "minted token name")?;
    let data = ctx.tokens.token_data(h, name)?;
    let template = ctx.templates.get_template(h, CARD_PACK_TEMPLATE_ID)?;

    let mut properties = data.properties();
    let (burn_key, burn_value) = properties
        .pop()
        .ok_or_else(|| HarnessError::Assertion("token has no properties".into()))?;
    let (template_key, template_value) = properties
        .pop()
        .ok_or_else(|| HarnessError::Assertion("token has no template property".into()))?;

    check_eq(burn_key.as_str(), BURNABLE_PROPERTY, "last property key")?;
    let burnable =
        decode_bcs_bool(&burn_value).map_err(|e| HarnessError::Decode(format!("{:#}", e)))?;
    check_eq(burnable, true, "burnable flag")?;
    check_eq(template_key.as_str(), TEMPLATE_PROPERTY, "second to last property key")?;
    let template_id =
        decode_bcs_u64(&template_value).map_err(|e| HarnessError::Decode(format!("{:#}", e)))?;
    check_eq(template_id, CARD_PACK_TEMPLATE_ID, "template property")?;

    check_eq(data.name.as_str(), name, "token name")?;
    check_eq(&data.description, &template.description, "token description")?;
    check_eq(&data.uri, &template.uri, "token uri")?;
    let (keys, values): (Vec<String>, Vec<String>) = properties.into_iter().unzip();
    check_eq(&keys, &template.property_names, "token property keys")?;
    check_eq(&values, &template.property_values_bytes, "token property values")
}

fn mint_unauthorized<C: Chain>(h: &Harness<C>, ctx: &mut MintCtx) -> Result<(), HarnessError> {
    let call = ctx
        .minter
        .mint_template(ctx.fx.dev().address(), CARD_PACK_TEMPLATE_ID)?;
    let expected = access_denied(ctx.fx.contract_address, "minter");
    h.expect_failure_with_code(ctx.fx.unauthorized(), &call, &expected)?;
    Ok(())
}

fn mint_unknown_template<C: Chain>(h: &Harness<C>, ctx: &mut MintCtx) -> Result<(), HarnessError> {
    let call = ctx
        .minter
        .mint_template(ctx.fx.dev().address(), UNKNOWN_TEMPLATE_ID)?;
    h.expect_failure_with_code(ctx.fx.dev(), &call, &table_entry_missing())?;
    Ok(())
}
