//! Reads against the legacy `0x3::token` framework.
//!
//! Token data lives in a table owned by the collection creator
//! (`Collections.token_data`), and balances in a table owned by each holder
//! (`TokenStore.tokens`). Both are reached through the node's table item
//! lookup.

use move_core_types::account_address::AccountAddress;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use move_e2e_types::TableItemRequest;

use crate::chain::Chain;
use crate::harness::{Harness, HarnessError};

pub const COLLECTIONS_RESOURCE: &str = "0x3::token::Collections";
pub const TOKEN_STORE_RESOURCE: &str = "0x3::token::TokenStore";

/// Property the minter appends with the BCS `u64` template id.
pub const TEMPLATE_PROPERTY: &str = "Template";
/// Property the minter appends last, BCS `true`.
pub const BURNABLE_PROPERTY: &str = "TOKEN_BURNABLE_BY_OWNER";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PropertyValue {
    #[serde(rename = "type")]
    pub type_tag: String,
    /// BCS bytes, hex.
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PropertyEntry {
    pub key: String,
    pub value: PropertyValue,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
struct PropertyMapData {
    data: Vec<PropertyEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
struct PropertyMap {
    map: PropertyMapData,
}

/// `0x3::token::TokenData`, reduced to what the suites compare.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenData {
    pub name: String,
    pub description: String,
    pub uri: String,
    default_properties: PropertyMap,
}

impl TokenData {
    /// `(key, hex value)` pairs in map order.
    pub fn properties(&self) -> Vec<(String, String)> {
        self.default_properties
            .map
            .data
            .iter()
            .map(|e| (e.key.clone(), e.value.value.clone()))
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct TokenReader {
    collection_creator: AccountAddress,
    collection: String,
}

impl TokenReader {
    pub fn new(collection_creator: AccountAddress, collection: impl Into<String>) -> Self {
        Self {
            collection_creator,
            collection: collection.into(),
        }
    }

    fn token_data_id(&self, name: &str) -> Value {
        json!({
            "creator": self.collection_creator.to_hex_literal(),
            "collection": self.collection,
            "name": name,
        })
    }

    fn table_handle<C: Chain>(
        harness: &Harness<C>,
        owner: &AccountAddress,
        resource: &str,
        field: &str,
    ) -> Result<Option<String>, HarnessError> {
        let Some(data) = harness.account_resource(owner, resource)? else {
            return Ok(None);
        };
        data.get(field)
            .and_then(|t| t.get("handle"))
            .and_then(Value::as_str)
            .map(|h| Some(h.to_string()))
            .ok_or_else(|| HarnessError::Decode(format!("{} has no {}.handle", resource, field)))
    }

    pub fn token_data<C: Chain>(
        &self,
        harness: &Harness<C>,
        name: &str,
    ) -> Result<TokenData, HarnessError> {
        let handle = Self::table_handle(
            harness,
            &self.collection_creator,
            COLLECTIONS_RESOURCE,
            "token_data",
        )?
        .ok_or_else(|| {
            HarnessError::Decode(format!(
                "{} holds no {}",
                self.collection_creator.to_hex_literal(),
                COLLECTIONS_RESOURCE
            ))
        })?;
        let request = TableItemRequest {
            key_type: "0x3::token::TokenDataId".to_string(),
            value_type: "0x3::token::TokenData".to_string(),
            key: self.token_data_id(name),
        };
        let item = harness
            .table_item(&handle, &request)?
            .ok_or_else(|| HarnessError::Assertion(format!("no token data for {}", name)))?;
        serde_json::from_value(item).map_err(|e| HarnessError::Decode(format!("token data {}: {}", name, e)))
    }

    /// Whether `owner` holds the token. Only a missing table key (or a
    /// missing token store) means "no"; other errors propagate.
    pub fn owns_token<C: Chain>(
        &self,
        harness: &Harness<C>,
        owner: AccountAddress,
        name: &str,
    ) -> Result<bool, HarnessError> {
        let Some(handle) = Self::table_handle(harness, &owner, TOKEN_STORE_RESOURCE, "tokens")? else {
            debug!(owner = %owner.to_hex_literal(), "no token store");
            return Ok(false);
        };
        let request = TableItemRequest {
            key_type: "0x3::token::TokenId".to_string(),
            value_type: "0x3::token::Token".to_string(),
            key: json!({
                "token_data_id": self.token_data_id(name),
                "property_version": "0",
            }),
        };
        Ok(harness.table_item(&handle, &request)?.is_some())
    }
}
