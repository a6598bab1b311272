//! Local Ed25519 accounts.
//!
//! An account is a private key plus the address derived from it the way the
//! chain does for single-key accounts: `sha3_256(public_key || 0x00)`.

use anyhow::{anyhow, bail, Result};
use ed25519_dalek::{Signer, SigningKey};
use move_core_types::account_address::AccountAddress;
use sha3::{Digest, Sha3_256};
use std::fmt;

use move_e2e_types::encoding::hex_literal;

/// Scheme byte appended to the public key for single Ed25519 keys.
const ED25519_SCHEME: u8 = 0x00;

/// AIP-80 prefix some tools put in front of exported keys.
const AIP80_PREFIX: &str = "ed25519-priv-";

#[derive(Clone)]
pub struct LocalAccount {
    signing_key: SigningKey,
    address: AccountAddress,
}

impl LocalAccount {
    pub fn from_signing_key(signing_key: SigningKey) -> Self {
        let address = derive_address(&signing_key.verifying_key().to_bytes());
        Self {
            signing_key,
            address,
        }
    }

    /// Parse a 32-byte private key given as hex, optionally `0x`- or
    /// `ed25519-priv-0x`-prefixed.
    pub fn from_private_key_hex(key: &str) -> Result<Self> {
        let key = key.trim();
        let key = key.strip_prefix(AIP80_PREFIX).unwrap_or(key);
        let key = key.strip_prefix("0x").unwrap_or(key);
        let bytes = hex::decode(key).map_err(|e| anyhow!("private key is not valid hex: {}", e))?;
        if bytes.len() != 32 {
            bail!("private key must be 32 bytes, got {}", bytes.len());
        }
        let mut secret = [0u8; 32];
        secret.copy_from_slice(&bytes);
        Ok(Self::from_signing_key(SigningKey::from_bytes(&secret)))
    }

    pub fn address(&self) -> AccountAddress {
        self.address
    }

    pub fn public_key_bytes(&self) -> [u8; 32] {
        self.signing_key.verifying_key().to_bytes()
    }

    pub fn public_key_hex(&self) -> String {
        hex_literal(&self.public_key_bytes())
    }

    pub fn sign(&self, message: &[u8]) -> [u8; 64] {
        self.signing_key.sign(message).to_bytes()
    }
}

impl fmt::Debug for LocalAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalAccount")
            .field("address", &self.address.to_hex_literal())
            .finish_non_exhaustive()
    }
}

/// Authentication key (and initial address) of a single Ed25519 public key.
pub fn derive_address(public_key: &[u8; 32]) -> AccountAddress {
    let mut hasher = Sha3_256::new();
    hasher.update(public_key);
    hasher.update([ED25519_SCHEME]);
    let digest: [u8; 32] = hasher.finalize().into();
    AccountAddress::new(digest)
}
