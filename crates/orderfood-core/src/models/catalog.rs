use serde::{Deserialize, Serialize};

use super::Money;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub price: Money,
    #[serde(rename = "imageUrl")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub stock: u32,
    #[serde(rename = "categoryId")]
    pub category_id: String,
    pub category: Category,
}

impl Item {
    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }

    pub fn stock_label(&self) -> String {
        if self.in_stock() {
            format!("{} in stock", self.stock)
        } else {
            "Out of Stock".to_string()
        }
    }
}

/// Which category the menu is showing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Named(String),
}

impl CategoryFilter {
    pub fn label(&self) -> &str {
        match self {
            CategoryFilter::All => "All",
            CategoryFilter::Named(name) => name,
        }
    }

    pub fn matches(&self, item: &Item) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Named(name) => item.category.name == *name,
        }
    }

    /// Apply the filter, keeping the backend's ordering.
    pub fn apply<'a>(&self, items: &'a [Item]) -> Vec<&'a Item> {
        items.iter().filter(|item| self.matches(item)).collect()
    }

    /// The filter list shown above the menu: "All" then each category.
    pub fn options(categories: &[Category]) -> Vec<CategoryFilter> {
        std::iter::once(CategoryFilter::All)
            .chain(categories.iter().map(|c| CategoryFilter::Named(c.name.clone())))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, category: &str, stock: u32) -> Item {
        Item {
            id: format!("id-{}", name),
            name: name.to_string(),
            description: None,
            price: Money::from_cents(500),
            image_url: None,
            stock,
            category_id: format!("cat-{}", category),
            category: Category {
                id: format!("cat-{}", category),
                name: category.to_string(),
            },
        }
    }

    #[test]
    fn test_parse_item() {
        let json = r#"{
            "id": "i1", "name": "Burger", "description": null, "price": "8.99",
            "imageUrl": null, "stock": 3, "categoryId": "c1",
            "category": {"id": "c1", "name": "Mains"}
        }"#;
        let item: Item = serde_json::from_str(json).expect("valid item json");
        assert_eq!(item.price, Money::from_cents(899));
        assert_eq!(item.category.name, "Mains");
        assert_eq!(item.stock_label(), "3 in stock");
    }

    #[test]
    fn test_out_of_stock() {
        let sold_out = item("Pie", "Desserts", 0);
        assert!(!sold_out.in_stock());
        assert_eq!(sold_out.stock_label(), "Out of Stock");
    }

    #[test]
    fn test_filter_by_category() {
        let items = vec![
            item("Burger", "Mains", 1),
            item("Pie", "Desserts", 1),
            item("Steak", "Mains", 1),
        ];

        assert_eq!(CategoryFilter::All.apply(&items).len(), 3);

        let mains = CategoryFilter::Named("Mains".to_string()).apply(&items);
        let names: Vec<&str> = mains.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Burger", "Steak"]);

        assert!(CategoryFilter::Named("Drinks".to_string()).apply(&items).is_empty());
    }

    #[test]
    fn test_filter_options() {
        let categories = vec![
            Category { id: "c1".into(), name: "Mains".into() },
            Category { id: "c2".into(), name: "Desserts".into() },
        ];
        let labels: Vec<String> = CategoryFilter::options(&categories)
            .iter()
            .map(|f| f.label().to_string())
            .collect();
        assert_eq!(labels, vec!["All", "Mains", "Desserts"]);
    }
}
