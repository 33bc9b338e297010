//! Hex string helpers shared by the encoder and the transaction assembler.

/// Prefix carried by every hex quantity on the wire.
pub const HEX_PREFIX: &str = "0x";

/// Whether the string starts with `0x` or `0X`.
pub fn is_hex_prefixed(value: &str) -> bool {
    value.starts_with("0x") || value.starts_with("0X")
}

/// Strip an optional `0x`/`0X` prefix.
pub fn strip_hex_prefix(value: &str) -> &str {
    if is_hex_prefixed(value) {
        &value[2..]
    } else {
        value
    }
}

/// Encode bytes as a `0x`-prefixed lowercase hex string.
pub fn to_prefixed_hex(bytes: &[u8]) -> String {
    format!("{}{}", HEX_PREFIX, hex::encode(bytes))
}

/// Whether `value` is a `0x`-prefixed 20-byte address.
///
/// Checksum casing is accepted but not verified.
pub fn is_valid_address(value: &str) -> bool {
    if !is_hex_prefixed(value) {
        return false;
    }
    let body = &value[2..];
    body.len() == 40 && body.bytes().all(|b| b.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_prefix() {
        assert_eq!(strip_hex_prefix("0xabcd"), "abcd");
        assert_eq!(strip_hex_prefix("0Xabcd"), "abcd");
        assert_eq!(strip_hex_prefix("abcd"), "abcd");
    }

    #[test]
    fn test_prefixed_hex() {
        assert_eq!(to_prefixed_hex(&[0x00, 0xff]), "0x00ff");
    }

    #[test]
    fn test_address_validation() {
        assert!(is_valid_address(
            "0x32328bfaea51ce120db44f7755a1170e9cc43653"
        ));
        assert!(is_valid_address(
            "0x32328BFAEA51CE120DB44F7755A1170E9CC43653"
        ));
        assert!(!is_valid_address(
            "32328bfaea51ce120db44f7755a1170e9cc43653"
        ));
        assert!(!is_valid_address("0x1234"));
        assert!(!is_valid_address(
            "0x32328bfaea51ce120db44f7755a1170e9cc4365z"
        ));
    }
}
