//! Product search and name suggestions for the Products view.

use crate::types::Product;

/// Names offered while typing a new product, grouped by shelf.
pub const PRODUCT_SUGGESTIONS: &[&str] = &[
    // Bakery & snacks
    "Supa Loaf Bread",
    "Festive Bread",
    "Ringoz",
    "Nuvita Biscuits",
    "Bites",
    "Mandazi",
    "Big G",
    "PK Chewing Gum",
    "Orbit",
    "Cadbury Chocolate",
    "Tropical Mint",
    "Lollipops",
    // Beverages
    "Coca-Cola",
    "Fanta",
    "Sprite",
    "Azam Juice",
    "Delmonte Juice",
    "Dasani Water",
    "Raha Drinking Water",
    "Kericho Gold Tea",
    "Nescafe",
    "Milo",
    // Staples
    "Jogoo Maize Flour",
    "Ajab Wheat Flour",
    "Pembe Maize Flour",
    "Mumias Sugar",
    "Dola Rice",
    "Pearl Rice",
    "Fortune Cooking Oil",
    "Elianto Cooking Oil",
    "Salt",
    "Royco",
    "Tea Leaves",
    // Toiletries
    "Sunlight Soap",
    "Menengai Bar Soap",
    "Geisha Soap",
    "Colgate Toothpaste",
    "Always Pads",
    "Tissue Paper",
    "Vaseline Jelly",
    "Dettol",
    // Household
    "Omo",
    "Ariel",
    "Jik",
    "Harpic",
    "Matchbox",
    "Scouring Pads",
    "Plastic Cups",
    "Brooms",
    "Mops",
    // Dairy
    "Tuzo Milk",
    "Brookside Milk",
    "KCC Butter",
    "Eggs",
    "Yogurt",
];

/// Number of suggestions shown under the name field.
pub const SUGGESTION_LIMIT: usize = 5;

/// Case-insensitive substring match on name or brand.
///
/// A blank term matches everything.
pub fn filter_products<'a>(products: &'a [Product], term: &str) -> Vec<&'a Product> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return products.iter().collect();
    }
    products
        .iter()
        .filter(|p| {
            p.name.to_lowercase().contains(&needle) || p.brand.to_lowercase().contains(&needle)
        })
        .collect()
}

pub fn find_product(products: &[Product], id: i64) -> Option<&Product> {
    products.iter().find(|p| p.id == id)
}

/// First `limit` built-in names containing `text`, ignoring case.
///
/// ## Example
/// ```rust
/// use milka_core::catalog::suggest_names;
///
/// assert_eq!(suggest_names("milk", 5), vec!["Tuzo Milk", "Brookside Milk"]);
/// assert!(suggest_names("", 5).is_empty());
/// ```
pub fn suggest_names(text: &str, limit: usize) -> Vec<&'static str> {
    let needle = text.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    PRODUCT_SUGGESTIONS
        .iter()
        .copied()
        .filter(|name| name.to_lowercase().contains(&needle))
        .take(limit)
        .collect()
}
