//! Shared utilities for NSA.

/// Placeholder rendered for absent values in diagnostics.
pub const NONE_PLACEHOLDER: &str = "<none>";

/// Mask a secret before it is logged or printed.
///
/// Values longer than eight characters keep their last four characters so
/// operators can tell two keys apart; anything shorter is fully hidden.
pub fn mask_secret(secret: &str) -> String {
    if secret.is_empty() {
        return "<empty>".to_string();
    }
    let count = secret.chars().count();
    if count <= 8 {
        return "***".to_string();
    }
    let tail: String = secret.chars().skip(count - 4).collect();
    format!("***{tail}")
}

/// Mask an optional secret, rendering `None` as [`NONE_PLACEHOLDER`].
pub fn mask_optional_secret(secret: Option<&str>) -> String {
    secret.map_or_else(|| NONE_PLACEHOLDER.to_string(), mask_secret)
}

/// Render an optional string, using [`NONE_PLACEHOLDER`] for `None`.
pub fn display_optional(value: Option<&str>) -> &str {
    value.unwrap_or(NONE_PLACEHOLDER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_secret_short_values_fully_hidden() {
        assert_eq!(mask_secret("token"), "***");
        assert_eq!(mask_secret("12345678"), "***");
        assert_eq!(mask_secret(""), "<empty>");
    }

    #[test]
    fn test_mask_secret_long_values_keep_tail() {
        let masked = mask_secret("abcdefghijkl");
        assert_eq!(masked, "***ijkl");
        assert!(!masked.contains("abcd"));
    }

    #[test]
    fn test_mask_secret_multibyte() {
        assert_eq!(mask_secret("ääääääääåååå"), "***åååå");
    }

    #[test]
    fn test_optional_helpers() {
        assert_eq!(mask_optional_secret(None), "<none>");
        assert_eq!(mask_optional_secret(Some("pass")), "***");
        assert_eq!(display_optional(None), "<none>");
        assert_eq!(display_optional(Some("bill")), "bill");
    }
}
