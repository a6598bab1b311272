//! `templates` module: token templates used by the minter.

use move_core_types::account_address::AccountAddress;
use serde::{Deserialize, Serialize};

use move_e2e_types::encoding::decode_bcs_string;
use move_e2e_types::{EntryFunctionCall, MoveArg, ViewCall};

use super::{deserialize_u64, function_id};
use crate::chain::Chain;
use crate::harness::{Harness, HarnessError};

pub const MODULE: &str = "templates";

/// Type tag of every string-valued template property.
pub const STRING_TYPE: &str = "0x1::string::String";

/// Templates with exactly this many properties are cards.
const CARD_PROPERTY_COUNT: usize = 3;

/// Arguments of `add_template`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSpec {
    pub template_id: u64,
    pub name: String,
    pub description: String,
    pub uri: String,
    pub property_names: Vec<String>,
    pub property_values: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TemplateKind {
    Card,
    Hero,
}

/// A template as returned by `get_template`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Template {
    #[serde(deserialize_with = "deserialize_u64")]
    pub id: u64,
    pub name: String,
    pub description: String,
    pub uri: String,
    pub property_names: Vec<String>,
    pub property_types: Vec<String>,
    /// BCS-encoded property values, hex.
    pub property_values_bytes: Vec<String>,
}

impl Template {
    pub fn kind(&self) -> TemplateKind {
        if self.property_names.len() == CARD_PROPERTY_COUNT {
            TemplateKind::Card
        } else {
            TemplateKind::Hero
        }
    }

    /// Property values decoded as BCS strings.
    pub fn decoded_string_values(&self) -> Result<Vec<String>, HarnessError> {
        self.property_values_bytes
            .iter()
            .map(|hex| decode_bcs_string(hex).map_err(|e| HarnessError::Decode(format!("{:#}", e))))
            .collect()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Templates {
    address: AccountAddress,
}

impl Templates {
    pub fn new(address: AccountAddress) -> Self {
        Self { address }
    }

    pub fn address(&self) -> AccountAddress {
        self.address
    }

    pub fn add_template(&self, spec: &TemplateSpec) -> Result<EntryFunctionCall, HarnessError> {
        Ok(
            EntryFunctionCall::new(function_id(self.address, MODULE, "add_template")?)
                .arg(spec.template_id)
                .arg(spec.name.as_str())
                .arg(spec.description.as_str())
                .arg(spec.uri.as_str())
                .arg(MoveArg::strings(spec.property_names.iter().cloned()))
                .arg(MoveArg::strings(spec.property_values.iter().cloned())),
        )
    }

    pub fn get_template<C: Chain>(
        &self,
        harness: &Harness<C>,
        template_id: u64,
    ) -> Result<Template, HarnessError> {
        let call = ViewCall::new(function_id(self.address, MODULE, "get_template")?).arg(template_id);
        harness.view_first(&call)
    }
}
