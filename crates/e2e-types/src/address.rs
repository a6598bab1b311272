//! Address normalization utilities.
//!
//! Aptos addresses are 32-byte values, but they show up in several shapes:
//! - Short form: "0x3" (framework addresses, and how `vm_status` prints them)
//! - Full form: "0x0000000000000000000000000000000000000000000000000000000000000003"
//! - Without prefix: "3"
//!
//! Comparisons across those shapes go through the helpers here.

use move_core_types::account_address::AccountAddress;

/// Framework addresses (move-stdlib / aptos-framework, legacy token, token objects).
pub const FRAMEWORK_ADDRESSES: [&str; 3] = [
    "0x0000000000000000000000000000000000000000000000000000000000000001",
    "0x0000000000000000000000000000000000000000000000000000000000000003",
    "0x0000000000000000000000000000000000000000000000000000000000000004",
];

/// Normalize an address to lowercase with 0x prefix and full 64 hex characters.
///
/// # Examples
///
/// ```
/// use move_e2e_types::address::normalize_address;
///
/// assert_eq!(
///     normalize_address("0x3"),
///     "0x0000000000000000000000000000000000000000000000000000000000000003"
/// );
/// ```
pub fn normalize_address(addr: &str) -> String {
    let addr = addr.trim();
    let hex = addr
        .strip_prefix("0x")
        .or_else(|| addr.strip_prefix("0X"))
        .unwrap_or(addr)
        .to_lowercase();
    if hex.len() < 64 {
        format!("0x{:0>64}", hex)
    } else {
        format!("0x{}", &hex[..64])
    }
}

/// Normalize an address, returning None if it's not a valid hex address.
pub fn normalize_address_checked(addr: &str) -> Option<String> {
    let normalized = normalize_address(addr);
    AccountAddress::from_hex_literal(&normalized).ok()?;
    Some(normalized)
}

/// Parse a string address into an AccountAddress. Accepts short and full forms.
pub fn parse_address(addr: &str) -> Option<AccountAddress> {
    normalize_address_checked(addr).and_then(|n| AccountAddress::from_hex_literal(&n).ok())
}

/// Convert an AccountAddress to its normalized full-form string.
pub fn address_to_string(addr: &AccountAddress) -> String {
    format!("0x{}", hex::encode(addr.as_ref()))
}

/// Check if an address is one of the framework addresses (0x1, 0x3, 0x4).
pub fn is_framework_address(addr: &str) -> bool {
    let normalized = normalize_address(addr);
    FRAMEWORK_ADDRESSES.contains(&normalized.as_str())
}
