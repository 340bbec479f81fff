//! Memory model for the allocation narrative
//!
//! This module provides the value objects the walk and the scene share:
//! - [`heap`]: Heap blocks with capacity/occupancy and the caller-owned
//!   reservation table
//! - [`stack`]: Stack slots, one of which receives the allocated pointer
//!
//! # Addresses
//!
//! Addresses are opaque 64-bit identifiers. They are never dereferenced; they
//! only label blocks and slots, and are shown as eight hex digits
//! (`0x55a13000`) to match how the panels print them.

pub mod heap;
pub mod stack;

/// Memory address type (64-bit)
pub type Address = u64;

/// Format an address the way every pane prints it
pub fn format_address(addr: Address) -> String {
    format!("0x{:08x}", addr)
}

/// Parse an address literal such as `0x55a13000` (the `0x` prefix is optional)
pub fn parse_address(text: &str) -> Result<Address, String> {
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    if digits.is_empty() {
        return Err(format!("Invalid address '{}'", text));
    }
    Address::from_str_radix(digits, 16).map_err(|_| format!("Invalid address '{}'", text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_address_pads_to_eight_digits() {
        assert_eq!(format_address(0x55a1_3000), "0x55a13000");
        assert_eq!(format_address(0x10), "0x00000010");
    }

    #[test]
    fn test_parse_address() {
        assert_eq!(parse_address("0x7ffd1230"), Ok(0x7ffd_1230));
        assert_eq!(parse_address("55a11000"), Ok(0x55a1_1000));
        assert!(parse_address("0x").is_err());
        assert!(parse_address("0xnothex").is_err());
    }
}
