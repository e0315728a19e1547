use serde::{Deserialize, Serialize};

use super::Money;

/// Body for `POST /cart`.
#[derive(Debug, Clone, Serialize)]
pub struct AddToCart<'a> {
    #[serde(rename = "itemId")]
    pub item_id: &'a str,
    pub quantity: u32,
}

/// The slice of an item that cart and order lines carry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductSummary {
    pub id: String,
    pub name: String,
    pub price: Money,
    #[serde(rename = "imageUrl")]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLine {
    pub id: String,
    pub quantity: u32,
    pub item: ProductSummary,
}

impl CartLine {
    pub fn line_total(&self) -> Money {
        self.item.price * self.quantity
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cart {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub items: Vec<CartLine>,
}

impl Cart {
    pub fn total(&self) -> Money {
        self.items.iter().map(CartLine::line_total).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn item_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0u32, |count, line| count.saturating_add(line.quantity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(name: &str, price: &str, quantity: u32) -> CartLine {
        CartLine {
            id: format!("line-{}", name),
            quantity,
            item: ProductSummary {
                id: format!("item-{}", name),
                name: name.to_string(),
                price: price.parse().expect("valid price"),
                image_url: None,
            },
        }
    }

    #[test]
    fn test_cart_total() {
        let cart = Cart {
            id: "c1".to_string(),
            items: vec![line("Burger", "10.00", 2), line("Fries", "5.50", 1)],
        };
        assert_eq!(cart.total(), Money::from_cents(2550));
        assert_eq!(cart.total().to_string(), "$25.50");
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn test_empty_cart() {
        let cart = Cart::default();
        assert!(cart.is_empty());
        assert_eq!(cart.total(), Money::ZERO);
    }

    #[test]
    fn test_parse_cart() {
        let json = r#"{"id":"c1","userId":"u1","items":[
            {"id":"l1","quantity":2,"item":{"id":"i1","name":"Burger","price":10,"imageUrl":null}}
        ]}"#;
        let cart: Cart = serde_json::from_str(json).expect("valid cart json");
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].line_total(), Money::from_cents(2000));
    }

    #[test]
    fn test_huge_amounts_do_not_overflow() {
        let json = r#"{"id":"c1","items":[
            {"id":"l1","quantity":1000,"item":{"id":"i1","name":"Yacht","price":1e15,"imageUrl":null}},
            {"id":"l2","quantity":4294967295,"item":{"id":"i2","name":"Gold","price":"99999.99","imageUrl":null}}
        ]}"#;
        let cart: Cart = serde_json::from_str(json).expect("valid cart json");
        assert_eq!(cart.total(), Money::from_cents(i64::MAX));
        assert_eq!(cart.item_count(), u32::MAX);

        let too_big = r#"{"id":"c1","items":[
            {"id":"l1","quantity":1,"item":{"id":"i1","name":"Moon","price":1e17,"imageUrl":null}}
        ]}"#;
        assert!(serde_json::from_str::<Cart>(too_big).is_err());
    }

    #[test]
    fn test_add_to_cart_body() {
        let body = serde_json::to_value(AddToCart { item_id: "i1", quantity: 1 })
            .expect("serializable");
        assert_eq!(body, serde_json::json!({"itemId": "i1", "quantity": 1}));
    }
}
