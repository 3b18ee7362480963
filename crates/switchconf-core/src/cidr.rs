//! Subnet mask / prefix length conversion
//!
//! The two conversions are deliberately permissive: [`mask_to_prefix_len`]
//! sums the leading one-run of every byte without checking contiguity, and
//! [`prefix_len_to_mask`] assumes `prefix <= 32`. Input coming from outside
//! the process goes through [`validate_mask`], [`validate_prefix_len`] or
//! [`parse_cidr`] first.

use crate::error::{Error, Result};
use std::net::Ipv4Addr;

/// Largest valid IPv4 prefix length
pub const MAX_PREFIX_LEN: u8 = 32;

/// Count the prefix length of a subnet mask
///
/// Each byte contributes the number of consecutive one-bits starting at its
/// most significant bit. A non-contiguous mask such as `0.255.0.0` yields a
/// non-standard but deterministic count (8 in that case).
pub fn mask_to_prefix_len(mask: Ipv4Addr) -> u8 {
    mask.octets()
        .iter()
        .map(|byte| byte.leading_ones() as u8)
        .sum()
}

/// Build the subnet mask for a prefix length
///
/// `prefix` must be in `0..=32`; larger values saturate to a full mask.
pub fn prefix_len_to_mask(prefix: u8) -> Ipv4Addr {
    if prefix == 0 {
        return Ipv4Addr::UNSPECIFIED;
    }
    let shift = u32::from(MAX_PREFIX_LEN.saturating_sub(prefix));
    Ipv4Addr::from(u32::MAX << shift)
}

/// Validate a prefix length coming from configuration
pub fn validate_prefix_len(prefix: u32) -> Result<u8> {
    if prefix > u32::from(MAX_PREFIX_LEN) {
        return Err(Error::invalid_input(format!(
            "prefix length {} is outside 0..={}",
            prefix, MAX_PREFIX_LEN
        )));
    }
    Ok(prefix as u8)
}

/// Validate that a subnet mask has contiguous leading ones
///
/// Returns the prefix length on success.
pub fn validate_mask(mask: Ipv4Addr) -> Result<u8> {
    let bits = u32::from(mask);
    let ones = bits.leading_ones();
    if bits.checked_shl(ones).unwrap_or(0) != 0 {
        return Err(Error::invalid_input(format!(
            "subnet mask {} is not contiguous",
            mask
        )));
    }
    Ok(ones as u8)
}

/// Parse `address/prefix` notation into an address and its subnet mask
pub fn parse_cidr(cidr: &str) -> Result<(Ipv4Addr, Ipv4Addr)> {
    let (address, prefix) = cidr
        .split_once('/')
        .ok_or_else(|| Error::invalid_input(format!("missing prefix length in {}", cidr)))?;

    let address: Ipv4Addr = address
        .trim()
        .parse()
        .map_err(|_| Error::invalid_input(format!("invalid IPv4 address in {}", cidr)))?;
    let prefix: u32 = prefix
        .trim()
        .parse()
        .map_err(|_| Error::invalid_input(format!("invalid prefix length in {}", cidr)))?;

    let prefix = validate_prefix_len(prefix)?;
    Ok((address, prefix_len_to_mask(prefix)))
}

/// Render `address/prefix` for an address and subnet mask
pub fn to_cidr_string(address: Ipv4Addr, mask: Ipv4Addr) -> String {
    format!("{}/{}", address, mask_to_prefix_len(mask))
}
