//! Move E2E Transport Layer
//!
//! Blocking access to an Aptos-style node over its REST API.
//!
//! This crate provides:
//! - [`rest`]: REST client for reads, views, and signed submissions
//! - [`account`]: local Ed25519 accounts and address derivation
//! - [`network`]: well-known networks and endpoint resolution
//!
//! # Example
//!
//! ```ignore
//! use move_e2e_transport::{LocalAccount, Network, RestClient};
//!
//! let client = RestClient::for_network(Network::Testnet);
//! let dev = LocalAccount::from_private_key_hex(&std::env::var("MOVE_E2E_DEV_KEY")?)?;
//! let seq = client.sequence_number(&dev.address())?;
//! ```

pub mod account;
pub mod error;
pub mod network;
pub mod rest;

// Re-export main types for convenience
pub use account::LocalAccount;
pub use error::TransportError;
pub use network::{resolve_rest_endpoint, Network};
pub use rest::{GasConfig, LedgerInfo, RestClient};
