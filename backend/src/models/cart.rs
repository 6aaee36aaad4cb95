use std::collections::BTreeMap;

use serde::Deserialize;

/// Per-session cart: product id -> accumulated quantity.
pub type Cart = BTreeMap<i32, i64>;

/// Bucket shared by every client that sends no session header.
pub const ANONYMOUS_SESSION: &str = "anonymous";

/// Cache key of the hash holding a session's cart.
pub fn cart_key(session_id: &str) -> String {
    format!("cart:{session_id}")
}

// ── Request payloads ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCart {
    pub product_id: i32,
    #[serde(default = "default_quantity")]
    pub quantity: i64,
}

fn default_quantity() -> i64 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantity_defaults_to_one() {
        let payload: AddToCart = serde_json::from_str(r#"{"productId": 3}"#).unwrap();
        assert_eq!(payload.product_id, 3);
        assert_eq!(payload.quantity, 1);
    }

    #[test]
    fn explicit_quantity_is_kept() {
        let payload: AddToCart =
            serde_json::from_str(r#"{"productId": 7, "quantity": 4}"#).unwrap();
        assert_eq!(payload.quantity, 4);
    }

    #[test]
    fn missing_product_id_is_rejected() {
        assert!(serde_json::from_str::<AddToCart>(r#"{"quantity": 2}"#).is_err());
    }

    #[test]
    fn cart_serializes_with_string_keys() {
        let cart = Cart::from([(7, 5), (2, 1)]);
        assert_eq!(serde_json::to_string(&cart).unwrap(), r#"{"2":1,"7":5}"#);
    }

    #[test]
    fn key_is_scoped_by_session() {
        assert_eq!(cart_key("s1"), "cart:s1");
        assert_eq!(cart_key(ANONYMOUS_SESSION), "cart:anonymous");
    }
}
