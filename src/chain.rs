//! The seam between the harness and a node.
//!
//! Suites only ever talk to a [`Chain`]. The production implementation is
//! [`RestClient`]; tests plug in a scripted in-memory chain.

use move_core_types::account_address::AccountAddress;
use serde_json::Value;

use move_e2e_transport::{LocalAccount, RestClient, TransportError};
use move_e2e_types::{EntryFunctionCall, TableItemRequest, TransactionOutcome, ViewCall};

pub trait Chain {
    /// Sign, submit, and block until the transaction is committed.
    fn submit_and_wait(
        &self,
        sender: &LocalAccount,
        call: &EntryFunctionCall,
    ) -> Result<TransactionOutcome, TransportError>;

    fn view(&self, call: &ViewCall) -> Result<Vec<Value>, TransportError>;

    /// Raw transaction JSON, `None` if the node does not know the hash.
    fn transaction_by_hash(&self, hash: &str) -> Result<Option<Value>, TransportError>;

    /// Resource `data`, `None` if the account does not hold the resource.
    fn account_resource(
        &self,
        address: &AccountAddress,
        resource_type: &str,
    ) -> Result<Option<Value>, TransportError>;

    /// Table value, `None` only when the key is not in the table.
    fn table_item(
        &self,
        handle: &str,
        request: &TableItemRequest,
    ) -> Result<Option<Value>, TransportError>;
}

impl Chain for RestClient {
    fn submit_and_wait(
        &self,
        sender: &LocalAccount,
        call: &EntryFunctionCall,
    ) -> Result<TransactionOutcome, TransportError> {
        RestClient::submit_and_wait(self, sender, call)
    }

    fn view(&self, call: &ViewCall) -> Result<Vec<Value>, TransportError> {
        RestClient::view(self, call)
    }

    fn transaction_by_hash(&self, hash: &str) -> Result<Option<Value>, TransportError> {
        RestClient::transaction_by_hash(self, hash)
    }

    fn account_resource(
        &self,
        address: &AccountAddress,
        resource_type: &str,
    ) -> Result<Option<Value>, TransportError> {
        RestClient::account_resource(self, address, resource_type)
    }

    fn table_item(
        &self,
        handle: &str,
        request: &TableItemRequest,
    ) -> Result<Option<Value>, TransportError> {
        RestClient::table_item(self, handle, request)
    }
}
