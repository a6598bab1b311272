//! Templates suite: `add_template` is guarded, `get_template` returns what was added.

use crate::chain::Chain;
use crate::contracts::templates::{Templates, STRING_TYPE};
use crate::fixtures::{access_denied, test_template, Fixtures};
use crate::harness::{check, check_eq, Harness, HarnessError};
use crate::scenario::Scenario;

pub const STEPS: [&str; 3] = [
    "dev adds template 1000",
    "unauthorized add_template is rejected",
    "get_template returns the added template",
];

pub struct TemplatesCtx {
    fx: Fixtures,
    templates: Templates,
}

impl TemplatesCtx {
    pub fn new(fx: &Fixtures) -> Self {
        Self {
            templates: Templates::new(fx.contract_address),
            fx: fx.clone(),
        }
    }
}

pub fn scenario<C: Chain>() -> Scenario<C, TemplatesCtx> {
    Scenario::new("templates")
        .step(STEPS[0], add_template)
        .step(STEPS[1], add_template_unauthorized)
        .step(STEPS[2], get_template)
}

fn add_template<C: Chain>(h: &Harness<C>, ctx: &mut TemplatesCtx) -> Result<(), HarnessError> {
    let call = ctx.templates.add_template(&test_template())?;
    h.expect_success(ctx.fx.dev(), &call)?;
    Ok(())
}

fn add_template_unauthorized<C: Chain>(
    h: &Harness<C>,
    ctx: &mut TemplatesCtx,
) -> Result<(), HarnessError> {
    let call = ctx.templates.add_template(&test_template())?;
    let expected = access_denied(ctx.fx.contract_address, "templates");
    h.expect_failure_with_code(ctx.fx.unauthorized(), &call, &expected)?;
    Ok(())
}

fn get_template<C: Chain>(h: &Harness<C>, ctx: &mut TemplatesCtx) -> Result<(), HarnessError> {
    let spec = test_template();
    let template = ctx.templates.get_template(h, spec.template_id)?;

    check_eq(template.id, spec.template_id, "template id")?;
    check_eq(&template.name, &spec.name, "template name")?;
    check_eq(&template.description, &spec.description, "template description")?;
    check_eq(&template.uri, &spec.uri, "template uri")?;
    check_eq(&template.property_names, &spec.property_names, "property names")?;
    check(
        template.property_types.len() == spec.property_names.len()
            && template.property_types.iter().all(|t| t == STRING_TYPE),
        format!(
            "property types: expected {} x {}, got {:?}",
            spec.property_names.len(),
            STRING_TYPE,
            template.property_types
        ),
    )?;
    check_eq(
        template.decoded_string_values()?,
        spec.property_values,
        "decoded property values",
    )
}
